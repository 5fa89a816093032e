pub mod alpaca;
pub mod artifact_download;
pub mod core;
pub mod factory;
pub mod mock;
pub mod yahoo;

pub use factory::ServiceFactory;
