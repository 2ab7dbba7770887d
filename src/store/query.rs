use super::value::{encode_value, FieldValue};
use super::StoreError;
use serde::Serialize;

/// Comparison operators supported by Firestore field filters.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    ArrayContains,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Ascending,
    Descending,
}

/// A query over a single collection: field filters (combined with AND),
/// optional ordering and an optional limit.
#[derive(Debug, Clone)]
pub struct Query {
    collection_id: String,
    filters: Vec<FieldFilter>,
    order_by: Vec<Order>,
    limit: Option<i32>,
}

impl Query {
    pub fn collection(id: impl Into<String>) -> Self {
        Self {
            collection_id: id.into(),
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Adds a field filter. Multiple filters are ANDed together.
    pub fn filter<T: Serialize>(
        mut self,
        field: &str,
        op: FieldOp,
        value: T,
    ) -> Result<Self, StoreError> {
        let value = encode_value(serde_json::to_value(value)?)?;
        self.filters.push(FieldFilter {
            field: FieldReference {
                field_path: field.to_string(),
            },
            op,
            value,
        });
        Ok(self)
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by.push(Order {
            field: FieldReference {
                field_path: field.to_string(),
            },
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn structured(&self) -> StructuredQuery {
        let filter = match self.filters.len() {
            0 => None,
            1 => Some(QueryFilter::FieldFilter(self.filters[0].clone())),
            _ => Some(QueryFilter::CompositeFilter(CompositeFilter {
                op: CompositeOp::And,
                filters: self
                    .filters
                    .iter()
                    .cloned()
                    .map(QueryFilter::FieldFilter)
                    .collect(),
            })),
        };

        StructuredQuery {
            from: vec![CollectionSelector {
                collection_id: self.collection_id.clone(),
            }],
            filter,
            order_by: if self.order_by.is_empty() {
                None
            } else {
                Some(self.order_by.clone())
            },
            limit: self.limit,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StructuredQuery {
    from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    filter: Option<QueryFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_by: Option<Vec<Order>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<i32>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct CollectionSelector {
    collection_id: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
enum QueryFilter {
    FieldFilter(FieldFilter),
    CompositeFilter(CompositeFilter),
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct FieldFilter {
    field: FieldReference,
    op: FieldOp,
    value: FieldValue,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct CompositeFilter {
    op: CompositeOp,
    filters: Vec<QueryFilter>,
}

#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum CompositeOp {
    And,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct FieldReference {
    field_path: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct Order {
    field: FieldReference,
    direction: Direction,
}
