use async_trait::async_trait;
use engine_core::error::StoreError;
use engine_core::store::{CalculateCompleteness, CatalogRead};
use model::catalog::attribute::Attribute;
use model::catalog::family::Family;
use model::catalog::product::Product;
use model::completeness::result::CompletenessResult;
use model::core::identifiers::{AttributeCode, FamilyCode, ProductKey};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Computes completeness from current catalog state.
///
/// One result per (product, channel, activated locale), restricted to
/// channels the product's family declares requirements for. Reads catalog
/// data through [`CatalogRead`] and mutates nothing, so batches could be
/// computed concurrently; the pipeline runs them sequentially.
pub struct CompletenessCalculator {
    catalog: Arc<dyn CatalogRead>,
}

impl CompletenessCalculator {
    pub fn new(catalog: Arc<dyn CatalogRead>) -> Self {
        Self { catalog }
    }

    fn missing_attributes(
        product: &Product,
        required: &[AttributeCode],
        attributes: &HashMap<AttributeCode, Attribute>,
        channel: &model::core::identifiers::ChannelCode,
        locale: &model::core::identifiers::LocaleCode,
    ) -> Vec<AttributeCode> {
        required
            .iter()
            .filter(|code| {
                let (scopable, localizable) = match attributes.get(*code) {
                    Some(attribute) => (attribute.scopable, attribute.localizable),
                    None => {
                        warn!(attribute = %code, "Required attribute has no definition, assuming no axes");
                        (false, false)
                    }
                };
                let value = product.value(
                    code,
                    scopable.then_some(channel),
                    localizable.then_some(locale),
                );
                value.is_none_or(|v| v.is_empty())
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CalculateCompleteness for CompletenessCalculator {
    async fn from_product_keys(
        &self,
        keys: &[ProductKey],
    ) -> Result<Vec<CompletenessResult>, StoreError> {
        let products = self.catalog.products_by_keys(keys).await?;
        let channels = self.catalog.channels().await?;
        let attributes = self.catalog.attributes().await?;

        let mut families: HashMap<FamilyCode, Family> = HashMap::new();
        let mut results = Vec::new();

        for product in &products {
            let Some(family_code) = &product.family else {
                // Familyless products have no requirements to measure.
                continue;
            };

            if !families.contains_key(family_code) {
                let family = self.catalog.family(family_code).await?.ok_or_else(|| {
                    StoreError::UnknownResource {
                        kind: "family",
                        code: family_code.to_string(),
                    }
                })?;
                families.insert(family_code.clone(), family);
            }
            let family = &families[family_code];

            for channel in &channels {
                let required = family.required_for(&channel.code);
                if required.is_empty() {
                    continue;
                }

                for locale in &channel.locales {
                    let missing = Self::missing_attributes(
                        product,
                        required,
                        &attributes,
                        &channel.code,
                        locale,
                    );
                    results.push(CompletenessResult {
                        product: product.key,
                        channel: channel.code.clone(),
                        locale: locale.clone(),
                        required: required.len() as u32,
                        missing,
                    });
                }
            }
        }

        Ok(results)
    }
}
