use crate::core::identifiers::{ChannelCode, LocaleCode};
use serde::{Deserialize, Serialize};

/// A distribution channel (scope) and the locales it activates.
/// Completeness is computed once per (channel, activated locale) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub code: ChannelCode,
    pub locales: Vec<LocaleCode>,
}

impl Channel {
    pub fn new(code: impl Into<ChannelCode>, locales: Vec<LocaleCode>) -> Self {
        Self {
            code: code.into(),
            locales,
        }
    }
}
