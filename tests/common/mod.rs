#![allow(dead_code)]

use chrono::NaiveDate;
use dowcast::application::ml::artifact::ModelArtifact;
use dowcast::application::ml::smartcore_predictor::ForestModel;
use dowcast::domain::market::ticker::universe;
use dowcast::domain::ml::feature_registry::assemble;
use dowcast::domain::ml::feature_schema::FeatureSchema;
use dowcast::infrastructure::mock::synthetic_bar;
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::path::{Path, PathBuf};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Friday 2025-03-14.
pub fn trading_day() -> NaiveDate {
    d(2025, 3, 14)
}

/// Saturday 2025-03-15.
pub fn weekend_day() -> NaiveDate {
    d(2025, 3, 15)
}

/// Fits a small forest on synthetic bars, labelled 1 when close > open.
pub fn fit_forest(schema: &FeatureSchema) -> ForestModel {
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for day in 10..=14 {
        for &ticker in universe() {
            let bar = synthetic_bar(ticker, d(2025, 3, day)).unwrap();
            rows.push(assemble(&bar, schema).values);
            labels.push(i64::from(bar.close > bar.open));
        }
    }
    let x = DenseMatrix::from_2d_vec(&rows).unwrap();
    RandomForestClassifier::fit(&x, &labels, RandomForestClassifierParameters::default()).unwrap()
}

pub fn artifact_bytes(schema: FeatureSchema, embed_schema: bool) -> Vec<u8> {
    let mut artifact = ModelArtifact::new(fit_forest(&schema), schema, "test");
    if !embed_schema {
        artifact.schema = None;
    }
    artifact.to_vec().unwrap()
}

pub fn write_artifact(dir: &Path, schema: FeatureSchema, embed_schema: bool) -> PathBuf {
    let path = dir.join("final_time_series_model.json");
    std::fs::write(&path, artifact_bytes(schema, embed_schema)).unwrap();
    path
}
