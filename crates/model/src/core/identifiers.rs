use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

macro_rules! code_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(Arc::from(value.into()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

code_type!(
    /// Identifier of one job execution.
    JobId
);

code_type!(
    /// Name of a step inside a job.
    StepName
);

code_type!(
    /// Code of a product family.
    FamilyCode
);

code_type!(
    /// Code of an attribute.
    AttributeCode
);

code_type!(
    /// Code of a channel (scope).
    ChannelCode
);

code_type!(
    /// Code of a locale, e.g. `en_US`.
    LocaleCode
);

code_type!(
    /// External identifier of a product (SKU). Opaque to the engine;
    /// resolved to a [`ProductKey`] before any computation.
    ProductIdentifier
);

/// Internal storage key of a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductKey(uuid::Uuid);

impl ProductKey {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl From<uuid::Uuid> for ProductKey {
    fn from(id: uuid::Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
