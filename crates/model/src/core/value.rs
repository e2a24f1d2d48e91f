use serde::{Deserialize, Serialize};

/// A single attribute value carried by a product.
///
/// Completeness only cares whether a value is filled, so the variants stay
/// close to what the catalog actually stores and expose [`is_empty`].
///
/// [`is_empty`]: AttributeValue::is_empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AttributeValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    /// A single option code of a select attribute.
    Option(String),
    /// Option codes of a multi-select attribute.
    Options(Vec<String>),
    Metric {
        amount: f64,
        unit: String,
    },
    Price {
        amount: f64,
        currency: String,
    },
}

impl AttributeValue {
    /// Whether the value counts as filled for completeness purposes.
    /// Blank text and empty option sets do not.
    pub fn is_empty(&self) -> bool {
        match self {
            AttributeValue::Text(s) => s.trim().is_empty(),
            AttributeValue::Option(code) => code.is_empty(),
            AttributeValue::Options(codes) => codes.is_empty(),
            AttributeValue::Number(_)
            | AttributeValue::Boolean(_)
            | AttributeValue::Metric { .. }
            | AttributeValue::Price { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_empty() {
        assert!(AttributeValue::Text("   ".into()).is_empty());
        assert!(!AttributeValue::Text("blue".into()).is_empty());
    }

    #[test]
    fn empty_option_set_is_empty() {
        assert!(AttributeValue::Options(vec![]).is_empty());
        assert!(!AttributeValue::Options(vec!["xl".into()]).is_empty());
    }

    #[test]
    fn scalar_values_are_filled() {
        assert!(!AttributeValue::Number(0.0).is_empty());
        assert!(!AttributeValue::Boolean(false).is_empty());
    }
}
