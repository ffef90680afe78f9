//! Statistics API access
//!
//! [`ProfileApi`] is the boundary to the remote service. [`HttpApi`] talks to
//! the real endpoints; tests plug in their own implementations.

pub mod client;
pub mod fold;

pub use client::HttpApi;
pub use fold::{fold, Record};

use crate::error::Result;
use serde::Serialize;

/// The remote calls this crate makes
pub trait ProfileApi: Send + Sync {
    /// `GET attrs/search/?q=<query>`, folded into result items
    fn search(&self, query: &str) -> Result<Vec<ResultItem>>;

    /// `GET attrs/<kind>/`, folded into records
    fn attrs(&self, kind: &str) -> Result<Vec<Record>>;

    /// `GET join/?geo=..&show=..&required=..&sumlevel=..`, folded into records
    fn join(&self, query: &JoinQuery) -> Result<Vec<Record>>;
}

/// One search hit: an entity id and its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub id: String,
    pub name: String,
}

impl ResultItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Build from a folded record; `None` if `id` or `name` is missing.
    ///
    /// Numeric ids are accepted and rendered as strings.
    pub fn from_record(record: &Record) -> Option<Self> {
        let id = match record.get("id")? {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let name = record.get("name")?.as_str()?.to_string();
        Some(Self { id, name })
    }

    /// Route path this result navigates to
    pub fn target(&self) -> String {
        format!("/profile/{}", self.id)
    }
}

/// Convert folded search records into result items, preserving order
pub fn results_from_records(records: &[Record]) -> Vec<ResultItem> {
    records.iter().filter_map(ResultItem::from_record).collect()
}

/// A section's static declaration of the join data it needs.
///
/// `key` names the dataset inside the page data context; two sections that
/// declare the same key share one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataNeed {
    pub key: &'static str,
    pub show: &'static [&'static str],
    pub required: &'static [&'static str],
    pub sumlevel: &'static [&'static str],
}

impl DataNeed {
    /// Bind this declaration to an entity
    pub fn join_query(&self, geo: &str) -> JoinQuery {
        JoinQuery {
            geo: geo.to_string(),
            show: self.show.iter().map(|s| s.to_string()).collect(),
            required: self.required.iter().map(|s| s.to_string()).collect(),
            sumlevel: self.sumlevel.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A concrete `join/` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinQuery {
    pub geo: String,
    pub show: Vec<String>,
    pub required: Vec<String>,
    pub sumlevel: Vec<String>,
}

impl JoinQuery {
    /// Query-string pairs in the order the endpoint documents them
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("geo", self.geo.clone()),
            ("show", self.show.join(",")),
            ("required", self.required.join(",")),
            ("sumlevel", self.sumlevel.join(",")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn result_items_accept_numeric_ids_and_skip_incomplete_rows() {
        let records = vec![
            record(json!({"id": "GH0101", "name": "Keta", "level": "adm2"})),
            record(json!({"id": 42, "name": "Numeric"})),
            record(json!({"id": "GH0103"})),
        ];
        let items = results_from_records(&records);
        assert_eq!(
            items,
            vec![ResultItem::new("GH0101", "Keta"), ResultItem::new("42", "Numeric")]
        );
        assert_eq!(items[0].target(), "/profile/GH0101");
    }

    #[test]
    fn data_need_binds_entity() {
        const NEED: DataNeed = DataNeed {
            key: "healthByGender",
            show: &["year", "condition", "gender"],
            required: &["proportion_of_children"],
            sumlevel: &["all", "all", "all"],
        };
        let query = NEED.join_query("040AF00079");
        assert_eq!(
            query.params(),
            vec![
                ("geo", "040AF00079".to_string()),
                ("show", "year,condition,gender".to_string()),
                ("required", "proportion_of_children".to_string()),
                ("sumlevel", "all,all,all".to_string()),
            ]
        );
    }
}
