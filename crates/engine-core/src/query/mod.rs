use crate::error::QueryError;
use crate::query::cursor::IdentifierCursor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod cursor;

/// Queryable product fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryField {
    Family,
    Identifier,
}

impl QueryField {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryField::Family => "family",
            QueryField::Identifier => "identifier",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    InList,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::InList => "IN",
        }
    }
}

/// One filter predicate: field, operator, value set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub field: QueryField,
    pub operator: Operator,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub filters: Vec<QueryFilter>,
}

/// Builds a product query predicate by predicate.
#[derive(Debug, Default)]
pub struct ProductQueryBuilder {
    filters: Vec<QueryFilter>,
}

impl ProductQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_filter(
        mut self,
        field: QueryField,
        operator: Operator,
        values: Vec<String>,
    ) -> Self {
        self.filters.push(QueryFilter {
            field,
            operator,
            values,
        });
        self
    }

    pub fn build(self) -> ProductQuery {
        ProductQuery {
            filters: self.filters,
        }
    }
}

/// What kind of document an identifier points at. The completeness pipeline
/// only accepts plain products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Product,
    ProductModel,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Product => "product",
            DocumentKind::ProductModel => "product_model",
        }
    }
}

/// One hit of a product query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierResult {
    pub identifier: model::core::identifiers::ProductIdentifier,
    pub kind: DocumentKind,
}

/// Executes product queries against an index or store.
#[async_trait]
pub trait ProductQuerySource: Send + Sync {
    async fn execute(
        &self,
        query: &ProductQuery,
    ) -> Result<Box<dyn IdentifierCursor>, QueryError>;
}
