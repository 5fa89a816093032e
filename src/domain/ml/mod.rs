pub mod feature_registry;
pub mod feature_schema;

pub use feature_registry::{FeatureVector, assemble};
pub use feature_schema::{FeatureField, FeatureKind, FeatureSchema};
