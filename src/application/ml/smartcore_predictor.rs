use super::predictor::Classifier;
use crate::domain::errors::PredictionError;
use crate::domain::ml::feature_registry::FeatureVector;
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::linalg::basic::matrix::DenseMatrix;

pub type ForestModel = RandomForestClassifier<f64, i64, DenseMatrix<f64>, Vec<i64>>;

pub struct SmartCoreClassifier {
    model: ForestModel,
    input_width: usize,
    version: String,
}

impl SmartCoreClassifier {
    pub fn new(model: ForestModel, input_width: usize, version: impl Into<String>) -> Self {
        Self {
            model,
            input_width,
            version: version.into(),
        }
    }
}

impl Classifier for SmartCoreClassifier {
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<i64>, PredictionError> {
        let matrix: Vec<Vec<f64>> = rows.iter().map(|r| r.values.clone()).collect();
        let input_matrix = DenseMatrix::from_2d_vec(&matrix)
            .map_err(|e| PredictionError::Backend(format!("Matrix creation failed: {}", e)))?;

        self.model
            .predict(&input_matrix)
            .map_err(|e| PredictionError::Backend(format!("Prediction failed: {}", e)))
    }

    fn input_width(&self) -> usize {
        self.input_width
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }

    fn version(&self) -> &str {
        &self.version
    }
}
