use super::artifact::ModelArtifact;
use super::predictor::Classifier;
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_schema::{FeatureSchema, SchemaFile};
use crate::domain::ports::ArtifactSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

/// A classifier paired with the schema its inputs must follow.
/// Construction checks that the two agree on width.
pub struct LoadedModel {
    schema: FeatureSchema,
    classifier: Arc<dyn Classifier>,
}

impl LoadedModel {
    pub fn new(schema: FeatureSchema, classifier: Arc<dyn Classifier>) -> Result<Self, ModelError> {
        if schema.len() != classifier.input_width() {
            return Err(ModelError::SchemaMismatch {
                schema_width: schema.len(),
                input_width: classifier.input_width(),
            });
        }
        Ok(Self { schema, classifier })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("schema", &self.schema)
            .field("classifier", &self.classifier.name())
            .field("version", &self.classifier.version())
            .finish()
    }
}

/// Loads the classifier artifact once per loader and hands out the same
/// instance afterwards.
///
/// The first outcome is cached whether it succeeded or not: a failed download
/// is not attempted again, and every later `load` reports the original error.
pub struct ModelLoader {
    artifact_path: PathBuf,
    schema_path: Option<PathBuf>,
    source: Option<Arc<dyn ArtifactSource>>,
    cell: OnceCell<Result<Arc<LoadedModel>, ModelError>>,
}

impl ModelLoader {
    pub fn new(
        artifact_path: impl Into<PathBuf>,
        schema_path: Option<PathBuf>,
        source: Option<Arc<dyn ArtifactSource>>,
    ) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            schema_path,
            source,
            cell: OnceCell::new(),
        }
    }

    /// A loader whose model is already in memory.
    pub fn preloaded(model: LoadedModel) -> Self {
        Self {
            artifact_path: PathBuf::new(),
            schema_path: None,
            source: None,
            cell: OnceCell::new_with(Some(Ok(Arc::new(model)))),
        }
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Whether a load has been attempted yet.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn load(&self) -> Result<Arc<LoadedModel>, ModelError> {
        self.cell
            .get_or_init(|| async {
                let outcome = self.load_uncached().await;
                if let Err(e) = &outcome {
                    error!("ModelLoader: {}", e);
                }
                outcome
            })
            .await
            .clone()
    }

    async fn load_uncached(&self) -> Result<Arc<LoadedModel>, ModelError> {
        let path = &self.artifact_path;

        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            let source = self
                .source
                .as_ref()
                .ok_or_else(|| ModelError::MissingSource { path: path.clone() })?;
            info!("ModelLoader: No local artifact at {:?}, downloading...", path);
            source.download(path).await?;
            info!("ModelLoader: Artifact stored at {:?}", path);
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| ModelError::Io {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let artifact =
            ModelArtifact::from_slice(&bytes).map_err(|reason| ModelError::Deserialization {
                path: path.clone(),
                reason,
            })?;
        let (embedded_schema, classifier) = artifact.into_parts();

        let schema = match &self.schema_path {
            Some(schema_path) => read_schema_file(schema_path).await?,
            None => embedded_schema.unwrap_or_else(|| {
                warn!("ModelLoader: Artifact carries no feature schema, assuming canonical OHLCV");
                FeatureSchema::canonical()
            }),
        };

        let model = LoadedModel::new(schema, Arc::new(classifier))?;
        info!(
            "ModelLoader: Loaded {} {} with schema {}",
            model.classifier().name(),
            model.classifier().version(),
            model.schema()
        );
        Ok(Arc::new(model))
    }
}

async fn read_schema_file(path: &Path) -> Result<FeatureSchema, ModelError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| ModelError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let file: SchemaFile =
        serde_json::from_slice(&bytes).map_err(|e| ModelError::Deserialization {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok(file.into_schema())
}
