pub mod prediction_view_model;

pub use prediction_view_model::{BarRow, PredictionRow};
