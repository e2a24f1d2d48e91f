use crate::core::identifiers::AttributeCode;
use serde::{Deserialize, Serialize};

/// Catalog attribute definition.
///
/// The two axis flags decide how a value is addressed on a product:
/// a scopable attribute holds one value per channel, a localizable one
/// holds one value per locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub code: AttributeCode,
    #[serde(default)]
    pub localizable: bool,
    #[serde(default)]
    pub scopable: bool,
}

impl Attribute {
    pub fn new(code: impl Into<AttributeCode>) -> Self {
        Self {
            code: code.into(),
            localizable: false,
            scopable: false,
        }
    }

    pub fn localizable(mut self) -> Self {
        self.localizable = true;
        self
    }

    pub fn scopable(mut self) -> Self {
        self.scopable = true;
        self
    }
}
