use crate::core::identifiers::{AttributeCode, ChannelCode, LocaleCode, ProductKey};
use serde::{Deserialize, Serialize};

/// Completeness of one product on one (channel, locale) pair.
///
/// `required` counts the attributes the family demands for the channel;
/// `missing` lists the ones whose value is absent or empty. The ratio is an
/// integer percent, floored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessResult {
    pub product: ProductKey,
    pub channel: ChannelCode,
    pub locale: LocaleCode,
    pub required: u32,
    pub missing: Vec<AttributeCode>,
}

impl CompletenessResult {
    pub fn filled(&self) -> u32 {
        self.required.saturating_sub(self.missing.len() as u32)
    }

    pub fn ratio(&self) -> u8 {
        if self.required == 0 {
            return 100;
        }
        (self.filled() as u64 * 100 / self.required as u64) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}
