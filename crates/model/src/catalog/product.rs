use crate::core::identifiers::{
    AttributeCode, ChannelCode, FamilyCode, LocaleCode, ProductIdentifier, ProductKey,
};
use crate::core::value::AttributeValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One value of the product value collection, addressed by attribute and,
/// depending on the attribute axes, channel and/or locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductValue {
    pub attribute: AttributeCode,
    #[serde(default)]
    pub channel: Option<ChannelCode>,
    #[serde(default)]
    pub locale: Option<LocaleCode>,
    pub data: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub key: ProductKey,
    pub identifier: ProductIdentifier,
    #[serde(default)]
    pub family: Option<FamilyCode>,
    #[serde(default)]
    pub values: Vec<ProductValue>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub updated_at: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

impl Product {
    pub fn new(identifier: impl Into<ProductIdentifier>, family: Option<FamilyCode>) -> Self {
        Self {
            key: ProductKey::generate(),
            identifier: identifier.into(),
            family,
            values: Vec::new(),
            enabled: true,
            updated_at: Utc::now(),
        }
    }

    /// Looks up the value stored at the exact (attribute, channel, locale)
    /// address. Value collections are small, a scan is fine.
    pub fn value(
        &self,
        attribute: &AttributeCode,
        channel: Option<&ChannelCode>,
        locale: Option<&LocaleCode>,
    ) -> Option<&AttributeValue> {
        self.values
            .iter()
            .find(|v| {
                &v.attribute == attribute
                    && v.channel.as_ref() == channel
                    && v.locale.as_ref() == locale
            })
            .map(|v| &v.data)
    }

    pub fn set_value(&mut self, value: ProductValue) {
        self.values.retain(|v| {
            !(v.attribute == value.attribute
                && v.channel == value.channel
                && v.locale == value.locale)
        });
        self.values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_lookup_respects_axes() {
        let mut product = Product::new("sku-1", Some("shoes".into()));
        product.set_value(ProductValue {
            attribute: "name".into(),
            channel: None,
            locale: Some("en_US".into()),
            data: AttributeValue::Text("Sneaker".into()),
        });

        assert!(
            product
                .value(&"name".into(), None, Some(&"en_US".into()))
                .is_some()
        );
        assert!(
            product
                .value(&"name".into(), None, Some(&"fr_FR".into()))
                .is_none()
        );
        assert!(product.value(&"name".into(), None, None).is_none());
    }

    #[test]
    fn set_value_replaces_same_address() {
        let mut product = Product::new("sku-1", None);
        let value = |text: &str| ProductValue {
            attribute: "name".into(),
            channel: None,
            locale: None,
            data: AttributeValue::Text(text.into()),
        };

        product.set_value(value("first"));
        product.set_value(value("second"));

        assert_eq!(product.values.len(), 1);
        assert_eq!(
            product.value(&"name".into(), None, None),
            Some(&AttributeValue::Text("second".into()))
        );
    }
}
