use crate::core::identifiers::{AttributeCode, ChannelCode, FamilyCode};
use serde::{Deserialize, Serialize};

/// A family groups products sharing an attribute set and declares, per
/// channel, which attributes a product must fill to be complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub code: FamilyCode,
    pub attributes: Vec<AttributeCode>,
    #[serde(default)]
    pub requirements: Vec<AttributeRequirement>,
}

/// Required attributes of one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRequirement {
    pub channel: ChannelCode,
    pub attributes: Vec<AttributeCode>,
}

impl Family {
    pub fn new(code: impl Into<FamilyCode>) -> Self {
        Self {
            code: code.into(),
            attributes: Vec::new(),
            requirements: Vec::new(),
        }
    }

    /// Required attribute codes for the given channel. Empty when the
    /// family declares nothing for it, in which case the channel yields
    /// no completeness result.
    pub fn required_for(&self, channel: &ChannelCode) -> &[AttributeCode] {
        self.requirements
            .iter()
            .find(|req| &req.channel == channel)
            .map(|req| req.attributes.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_for_unknown_channel_is_empty() {
        let mut family = Family::new("shoes");
        family.requirements.push(AttributeRequirement {
            channel: "ecommerce".into(),
            attributes: vec!["name".into(), "size".into()],
        });

        assert_eq!(family.required_for(&"ecommerce".into()).len(), 2);
        assert!(family.required_for(&"print".into()).is_empty());
    }
}
