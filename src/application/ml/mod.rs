pub mod artifact;
pub mod model_loader;
pub mod predictor;
pub mod smartcore_predictor;

pub use model_loader::{LoadedModel, ModelLoader};
pub use predictor::{Classifier, predict_labels};
