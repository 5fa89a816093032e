use crate::application::ml::model_loader::ModelLoader;
use crate::config::{Config, DataProvider};
use crate::domain::errors::MarketDataError;
use crate::domain::ports::{ArtifactSource, MarketDataService};
use crate::infrastructure::alpaca::AlpacaMarketDataService;
use crate::infrastructure::artifact_download::HttpArtifactSource;
use crate::infrastructure::mock::MockMarketDataService;
use crate::infrastructure::yahoo::YahooMarketDataService;
use std::sync::Arc;
use tracing::info;

pub struct ServiceFactory;

impl ServiceFactory {
    pub fn create_market_data(
        config: &Config,
    ) -> Result<Arc<dyn MarketDataService>, MarketDataError> {
        info!("ServiceFactory: Using {:?} market data", config.provider);
        match config.provider {
            DataProvider::Yahoo => Ok(Arc::new(YahooMarketDataService::new(
                config.yahoo_base_url.clone(),
                config.http_timeout,
            ))),
            DataProvider::Alpaca => {
                let service = AlpacaMarketDataService::builder()
                    .api_key(config.alpaca_api_key.clone())
                    .api_secret(config.alpaca_secret_key.clone())
                    .data_base_url(config.alpaca_data_url.clone())
                    .feed(config.alpaca_feed.clone())
                    .timeout(config.http_timeout)
                    .build()?;
                Ok(Arc::new(service))
            }
            DataProvider::Mock => Ok(Arc::new(MockMarketDataService::synthetic())),
        }
    }

    /// The process-wide loader. Nothing is read or downloaded until the first `load`.
    pub fn create_model_loader(config: &Config) -> ModelLoader {
        let source = config.model_url.as_ref().map(|url| {
            Arc::new(HttpArtifactSource::new(url.clone(), config.http_timeout))
                as Arc<dyn ArtifactSource>
        });
        ModelLoader::new(
            config.model_path.clone(),
            config.model_schema_path.clone(),
            source,
        )
    }
}
