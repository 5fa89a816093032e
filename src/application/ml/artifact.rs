//! Serialized classifier artifact.
//!
//! The file is JSON: a small envelope describing the model plus the smartcore
//! forest itself. The feature schema is optional so artifacts produced before
//! schemas were embedded still load (they fall back to a side file or the
//! canonical OHLCV schema).

use super::smartcore_predictor::{ForestModel, SmartCoreClassifier};
use crate::domain::ml::feature_schema::FeatureSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default)]
    pub version: String,
    pub input_width: usize,
    #[serde(default)]
    pub schema: Option<FeatureSchema>,
    pub model: ForestModel,
}

impl ModelArtifact {
    pub fn new(model: ForestModel, schema: FeatureSchema, version: impl Into<String>) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            version: version.into(),
            input_width: schema.len(),
            schema: Some(schema),
            model,
        }
    }

    /// Parses and validates an artifact. The declared `input_width` must match
    /// the number of features the forest was trained on.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, String> {
        let raw: Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        let trained_width = trained_width(&raw["model"]);
        let artifact: ModelArtifact = serde_json::from_value(raw).map_err(|e| e.to_string())?;
        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(format!(
                "unsupported artifact format version {} (expected {})",
                artifact.format_version, ARTIFACT_FORMAT_VERSION
            ));
        }

        let trained_width = trained_width?;
        if trained_width != artifact.input_width {
            return Err(format!(
                "artifact declares input width {} but its forest was trained on {} features",
                artifact.input_width, trained_width
            ));
        }
        Ok(artifact)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Splits the envelope into the embedded schema (if any) and a ready classifier.
    pub fn into_parts(self) -> (Option<FeatureSchema>, SmartCoreClassifier) {
        let classifier = SmartCoreClassifier::new(self.model, self.input_width, self.version);
        (self.schema, classifier)
    }
}

/// Feature count shared by every tree of a serialized forest.
/// Split nodes must only reference columns below that count.
fn trained_width(model: &Value) -> Result<usize, String> {
    let trees = model["trees"]
        .as_array()
        .filter(|trees| !trees.is_empty())
        .ok_or("forest contains no trees")?;

    let mut width = None;
    for (i, tree) in trees.iter().enumerate() {
        let features = tree["num_features"]
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| format!("tree {} does not record its feature count", i))?;
        if width.is_some_and(|w| w != features) {
            return Err(format!("tree {} was trained on {} features, others differ", i, features));
        }
        width = Some(features);

        let nodes = tree["nodes"].as_array().map(Vec::as_slice).unwrap_or_default();
        let out_of_range = nodes
            .iter()
            .filter(|node| !node["split_value"].is_null())
            .filter_map(|node| node["split_feature"].as_u64())
            .find(|&f| f >= features as u64);
        if let Some(f) = out_of_range {
            return Err(format!(
                "tree {} splits on feature {} of {}",
                i, f, features
            ));
        }
    }

    width.ok_or_else(|| "forest contains no trees".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::predictor::Classifier;
    use smartcore::ensemble::random_forest_classifier::{
        RandomForestClassifier, RandomForestClassifierParameters,
    };
    use smartcore::linalg::basic::matrix::DenseMatrix;

    fn tiny_forest() -> ForestModel {
        let rows = vec![
            vec![1.0, 2.0],
            vec![2.0, 1.0],
            vec![1.5, 3.0],
            vec![3.0, 1.5],
            vec![1.0, 4.0],
            vec![4.0, 1.0],
        ];
        let x = DenseMatrix::from_2d_vec(&rows).unwrap();
        let y: Vec<i64> = vec![1, 0, 1, 0, 1, 0];
        RandomForestClassifier::fit(&x, &y, RandomForestClassifierParameters::default()).unwrap()
    }

    #[test]
    fn test_artifact_restores_schema_and_width() {
        let schema = FeatureSchema::from_names(1, &["open", "close"]);
        let bytes = ModelArtifact::new(tiny_forest(), schema.clone(), "unit")
            .to_vec()
            .unwrap();

        let (restored, classifier) = ModelArtifact::from_slice(&bytes).unwrap().into_parts();
        assert_eq!(restored, Some(schema));
        assert_eq!(classifier.input_width(), 2);
        assert_eq!(classifier.version(), "unit");
    }

    #[test]
    fn test_rejects_unknown_format_version() {
        let mut artifact = ModelArtifact::new(tiny_forest(), FeatureSchema::from_names(1, &["a", "b"]), "x");
        artifact.format_version = 99;
        let bytes = artifact.to_vec().unwrap();
        let err = ModelArtifact::from_slice(&bytes).err().unwrap();
        assert!(err.contains("format version 99"));
    }

    #[test]
    fn test_rejects_declared_width_below_trained_width() {
        let mut artifact = ModelArtifact::new(tiny_forest(), FeatureSchema::from_names(1, &["a", "b"]), "x");
        artifact.input_width = 1;
        let bytes = artifact.to_vec().unwrap();
        let err = ModelArtifact::from_slice(&bytes).err().unwrap();
        assert!(err.contains("trained on 2 features"));
    }

    #[test]
    fn test_rejects_declared_width_above_trained_width() {
        let mut artifact = ModelArtifact::new(tiny_forest(), FeatureSchema::from_names(1, &["a", "b"]), "x");
        artifact.input_width = 5;
        let bytes = artifact.to_vec().unwrap();
        assert!(ModelArtifact::from_slice(&bytes).is_err());
    }

    #[test]
    fn test_trained_width_requires_trees() {
        let empty = serde_json::json!({ "trees": [] });
        assert!(trained_width(&empty).is_err());
        assert!(trained_width(&Value::Null).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(ModelArtifact::from_slice(b"\x80\x04\x95 not json").is_err());
    }
}
