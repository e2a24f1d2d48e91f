use engine_core::error::QueryError;
use engine_core::query::{DocumentKind, IdentifierResult, Operator, ProductQuery, QueryField};
use model::catalog::product::Product;
use std::collections::HashSet;

/// Evaluates a product query over materialized product records. Filters
/// combine with AND; the result is ordered by identifier so runs over the
/// same catalog state batch identically.
pub(crate) fn execute_query(
    products: Vec<Product>,
    query: &ProductQuery,
) -> Result<Vec<IdentifierResult>, QueryError> {
    let mut matched: Vec<&Product> = products.iter().collect();

    for filter in &query.filters {
        let values: HashSet<&str> = filter.values.iter().map(String::as_str).collect();
        match (filter.field, filter.operator) {
            (QueryField::Family, Operator::InList) => {
                matched.retain(|p| {
                    p.family
                        .as_ref()
                        .is_some_and(|family| values.contains(family.as_str()))
                });
            }
            (QueryField::Identifier, Operator::InList) => {
                matched.retain(|p| values.contains(p.identifier.as_str()));
            }
        }
    }

    let mut results: Vec<IdentifierResult> = matched
        .into_iter()
        .map(|p| IdentifierResult {
            identifier: p.identifier.clone(),
            kind: DocumentKind::Product,
        })
        .collect();
    results.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::query::ProductQueryBuilder;

    fn product(identifier: &str, family: Option<&str>) -> Product {
        Product::new(identifier, family.map(Into::into))
    }

    #[test]
    fn family_filter_excludes_familyless_products() {
        let products = vec![
            product("a", Some("shoes")),
            product("b", None),
            product("c", Some("mugs")),
        ];
        let query = ProductQueryBuilder::new()
            .add_filter(
                QueryField::Family,
                Operator::InList,
                vec!["shoes".into(), "mugs".into()],
            )
            .build();

        let results = execute_query(products, &query).unwrap();
        let identifiers: Vec<_> = results.iter().map(|r| r.identifier.to_string()).collect();
        assert_eq!(identifiers, vec!["a", "c"]);
    }

    #[test]
    fn empty_query_matches_everything() {
        let products = vec![product("a", None), product("b", Some("shoes"))];
        let results = execute_query(products, &ProductQuery::default()).unwrap();
        assert_eq!(results.len(), 2);
    }
}
