use crate::domain::errors::PredictionError;
use crate::domain::ml::feature_registry::FeatureVector;
use crate::domain::prediction::PredictionLabel;

/// Interface for pretrained binary classifiers
pub trait Classifier: Send + Sync {
    /// Raw labels, one per row, in input order.
    /// Callers go through [`predict_labels`], which enforces the contract.
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<i64>, PredictionError>;

    /// Number of features each row must carry
    fn input_width(&self) -> usize;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}

/// Rejects the batch if any row's width differs from `expected`.
pub fn validate_rows(rows: &[FeatureVector], expected: usize) -> Result<(), PredictionError> {
    match rows.iter().position(|r| r.len() != expected) {
        Some(row) => Err(PredictionError::SchemaMismatch {
            row,
            expected,
            actual: rows[row].len(),
        }),
        None => Ok(()),
    }
}

/// Runs the classifier with the checks on both sides of the call:
/// row widths before, output length and label range after.
pub fn predict_labels(
    classifier: &dyn Classifier,
    rows: &[FeatureVector],
) -> Result<Vec<PredictionLabel>, PredictionError> {
    validate_rows(rows, classifier.input_width())?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let raw = classifier.predict(rows)?;
    if raw.len() != rows.len() {
        return Err(PredictionError::ContractViolation(format!(
            "{} returned {} labels for {} rows",
            classifier.name(),
            raw.len(),
            rows.len()
        )));
    }

    raw.into_iter().map(PredictionLabel::from_raw).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOutput {
        width: usize,
        output: Vec<i64>,
    }

    impl Classifier for FixedOutput {
        fn predict(&self, _rows: &[FeatureVector]) -> Result<Vec<i64>, PredictionError> {
            Ok(self.output.clone())
        }
        fn input_width(&self) -> usize {
            self.width
        }
        fn name(&self) -> &str {
            "fixed"
        }
        fn version(&self) -> &str {
            "test"
        }
    }

    fn row(n: usize) -> FeatureVector {
        FeatureVector {
            schema_version: 1,
            values: vec![1.0; n],
        }
    }

    #[test]
    fn test_labels_follow_input_order() {
        let clf = FixedOutput {
            width: 5,
            output: vec![1, 0, 1],
        };
        let labels = predict_labels(&clf, &[row(5), row(5), row(5)]).unwrap();
        assert_eq!(
            labels,
            vec![
                PredictionLabel::Rises,
                PredictionLabel::Falls,
                PredictionLabel::Rises
            ]
        );
    }

    #[test]
    fn test_row_width_mismatch_fails_before_predict() {
        let clf = FixedOutput {
            width: 5,
            output: vec![1, 1],
        };
        let err = predict_labels(&clf, &[row(5), row(4)]).unwrap_err();
        match err {
            PredictionError::SchemaMismatch {
                row,
                expected,
                actual,
            } => {
                assert_eq!(row, 1);
                assert_eq!(expected, 5);
                assert_eq!(actual, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_output_is_contract_violation() {
        let clf = FixedOutput {
            width: 2,
            output: vec![1],
        };
        let err = predict_labels(&clf, &[row(2), row(2)]).unwrap_err();
        assert!(matches!(err, PredictionError::ContractViolation(_)));
    }

    #[test]
    fn test_non_binary_label_is_contract_violation() {
        let clf = FixedOutput {
            width: 2,
            output: vec![0, 3],
        };
        let err = predict_labels(&clf, &[row(2), row(2)]).unwrap_err();
        assert!(matches!(err, PredictionError::ContractViolation(_)));
    }

    #[test]
    fn test_empty_batch_skips_classifier() {
        let clf = FixedOutput {
            width: 2,
            output: vec![9],
        };
        assert!(predict_labels(&clf, &[]).unwrap().is_empty());
    }
}
