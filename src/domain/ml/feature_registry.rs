use super::feature_schema::{FeatureKind, FeatureSchema};
use crate::domain::market::bar::DailyBar;

/// Value substituted for any schema field the bar does not carry.
pub const MISSING_FEATURE_VALUE: f64 = 0.0;

/// Numeric model input assembled from exactly one bar.
/// `values[i]` always corresponds to `schema.fields[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub schema_version: u32,
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Projects a bar onto the schema, field by field, in schema order.
/// Derived fields and unknown names fall back to [`MISSING_FEATURE_VALUE`].
/// This never fails; rejecting incomplete inputs is the caller's job.
pub fn assemble(bar: &DailyBar, schema: &FeatureSchema) -> FeatureVector {
    let values = schema
        .fields
        .iter()
        .map(|field| match field.kind {
            FeatureKind::Derived => MISSING_FEATURE_VALUE,
            FeatureKind::Price | FeatureKind::Volume => {
                bar.field(&field.name).unwrap_or(MISSING_FEATURE_VALUE)
            }
        })
        .collect();

    FeatureVector {
        schema_version: schema.version,
        values,
    }
}

/// Names of the schema fields that [`assemble`] will zero-fill for a raw bar.
pub fn missing_fields<'a>(bar: &DailyBar, schema: &'a FeatureSchema) -> Vec<&'a str> {
    schema
        .fields
        .iter()
        .filter(|f| f.kind == FeatureKind::Derived || bar.field(&f.name).is_none())
        .map(|f| f.name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::feature_schema::FeatureField;
    use chrono::NaiveDate;

    fn bar() -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            open: 101.0,
            high: 105.0,
            low: 99.0,
            close: 104.0,
            volume: 2_500_000.0,
        }
    }

    #[test]
    fn test_feature_vector_length() {
        let schema = FeatureSchema::canonical();
        let vec = assemble(&bar(), &schema);
        assert_eq!(vec.len(), schema.len());
        assert_eq!(vec.schema_version, schema.version);
    }

    #[test]
    fn test_feature_consistency() {
        let vec = assemble(&bar(), &FeatureSchema::canonical());
        assert_eq!(vec.values, vec![101.0, 105.0, 99.0, 104.0, 2_500_000.0]);
    }

    #[test]
    fn test_order_follows_schema_not_bar() {
        let schema = FeatureSchema::from_names(1, &["Volume", "Close", "Open"]);
        let vec = assemble(&bar(), &schema);
        assert_eq!(vec.values, vec![2_500_000.0, 104.0, 101.0]);
    }

    #[test]
    fn test_absent_fields_are_zero_filled() {
        let schema = FeatureSchema::from_names(1, &["Open", "return_5d", "Close", "rsi"]);
        let vec = assemble(&bar(), &schema);
        assert_eq!(vec.values, vec![101.0, 0.0, 104.0, 0.0]);
        assert_eq!(missing_fields(&bar(), &schema), vec!["return_5d", "rsi"]);
    }

    #[test]
    fn test_price_kind_with_unknown_name_is_zero() {
        let schema = FeatureSchema::new(1, vec![FeatureField::new("adj_close", FeatureKind::Price)]);
        assert_eq!(assemble(&bar(), &schema).values, vec![0.0]);
    }

    #[test]
    fn test_empty_schema_gives_empty_vector() {
        let schema = FeatureSchema::new(1, vec![]);
        assert!(assemble(&bar(), &schema).is_empty());
    }
}
