use serde::{Deserialize, Serialize};
use std::fmt;

/// Version tag of the canonical OHLCV schema.
pub const CANONICAL_SCHEMA_VERSION: u32 = 1;

/// What a schema field measures. Price and volume fields are read from the bar;
/// derived fields are computed upstream and are never present on a raw bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Price,
    Volume,
    Derived,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureField {
    pub name: String,
    pub kind: FeatureKind,
}

impl FeatureField {
    pub fn new(name: impl Into<String>, kind: FeatureKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered list of inputs a classifier was trained on.
///
/// The order is part of the model contract: a permutation still produces
/// labels, just wrong ones. Schemas travel with the artifact and are checked
/// against the classifier's input width when the model is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub fields: Vec<FeatureField>,
}

impl FeatureSchema {
    pub fn new(version: u32, fields: Vec<FeatureField>) -> Self {
        Self { version, fields }
    }

    /// `[open, high, low, close, volume]`.
    pub fn canonical() -> Self {
        Self::new(
            CANONICAL_SCHEMA_VERSION,
            vec![
                FeatureField::new("open", FeatureKind::Price),
                FeatureField::new("high", FeatureKind::Price),
                FeatureField::new("low", FeatureKind::Price),
                FeatureField::new("close", FeatureKind::Price),
                FeatureField::new("volume", FeatureKind::Volume),
            ],
        )
    }

    /// Builds a schema from a bare name list, the shape of the side files
    /// some models ship with. Known OHLCV names get their kind, the rest are derived.
    pub fn from_names<S: AsRef<str>>(version: u32, names: &[S]) -> Self {
        let fields = names
            .iter()
            .map(|n| {
                let name = n.as_ref();
                let kind = match name.to_ascii_lowercase().as_str() {
                    "open" | "high" | "low" | "close" => FeatureKind::Price,
                    "volume" => FeatureKind::Volume,
                    _ => FeatureKind::Derived,
                };
                FeatureField::new(name, kind)
            })
            .collect();
        Self::new(version, fields)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::canonical()
    }
}

impl fmt::Display for FeatureSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names().collect();
        write!(f, "v{} [{}]", self.version, names.join(", "))
    }
}

/// On-disk shape of a schema side file. Either a full schema or a plain name list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SchemaFile {
    Full(FeatureSchema),
    Names(Vec<String>),
}

impl SchemaFile {
    pub fn into_schema(self) -> FeatureSchema {
        match self {
            SchemaFile::Full(schema) => schema,
            SchemaFile::Names(names) => FeatureSchema::from_names(CANONICAL_SCHEMA_VERSION, &names),
        }
    }
}
