use crate::domain::errors::ModelError;
use crate::domain::ports::ArtifactSource;
use crate::infrastructure::core::http_client_factory::HttpClientFactory;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Downloads the artifact with a single HTTP GET.
pub struct HttpArtifactSource {
    client: ClientWithMiddleware,
    url: String,
}

impl HttpArtifactSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: HttpClientFactory::create_client(timeout),
            url: url.into(),
        }
    }

    fn download_error(&self, reason: impl Into<String>) -> ModelError {
        ModelError::Download {
            url: self.url.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ArtifactSource for HttpArtifactSource {
    async fn download(&self, destination: &Path) -> Result<(), ModelError> {
        info!("HttpArtifactSource: GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.download_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.download_error(format!("HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.download_error(e.to_string()))?;
        if bytes.is_empty() {
            return Err(self.download_error("empty response body"));
        }

        let io_error = |e: std::io::Error| ModelError::Io {
            path: destination.to_path_buf(),
            reason: e.to_string(),
        };

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
            }
        }

        // The target path only ever holds a complete artifact.
        let partial = destination.with_extension("part");
        tokio::fs::write(&partial, &bytes).await.map_err(io_error)?;
        tokio::fs::rename(&partial, destination)
            .await
            .map_err(io_error)?;

        info!(
            "HttpArtifactSource: Saved {} bytes to {:?}",
            bytes.len(),
            destination
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_writes_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/model.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("model.json");
        let source = HttpArtifactSource::new(format!("{}/model.json", server.uri()), Duration::from_secs(5));

        source.download(&dest).await.unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "{\"ok\":true}");
        assert!(!dest.with_extension("part").exists());
    }

    #[tokio::test]
    async fn test_http_error_leaves_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("model.json");
        let source = HttpArtifactSource::new(format!("{}/model.json", server.uri()), Duration::from_secs(5));

        let err = source.download(&dest).await.unwrap_err();
        assert!(matches!(err, ModelError::Download { .. }));
        assert!(err.to_string().contains("404"));
        assert!(!dest.exists());
    }
}
