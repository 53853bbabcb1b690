use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

pub const VALUE_KEY: &str = "value";
pub const COUNT_KEY: &str = "@odata.count";
pub const NEXT_LINK_KEY: &str = "@odata.nextLink";

/// One page of a collection as seen by table UIs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub has_more: bool,
}

impl<T> QueryResult<T> {
    /// Create a new result with items and counters
    pub fn new(items: Vec<T>, total_count: u64, has_more: bool) -> Self {
        Self {
            items,
            total_count,
            has_more,
        }
    }

    /// Create an empty result
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, false)
    }

    /// Map items while preserving counters (wire -> view model convenience)
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> QueryResult<U> {
        QueryResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            has_more: self.has_more,
        }
    }
}

impl<T> Default for QueryResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Parse an OData collection envelope into a [`QueryResult`].
///
/// Never fails:
/// - missing or non-array `value` yields no items;
/// - items that do not deserialize into `T` are skipped;
/// - `@odata.count` (number or numeric string) is authoritative, otherwise
///   the number of items is used;
/// - `has_more` is true iff `@odata.nextLink` is a string.
pub fn normalize_response<T: DeserializeOwned>(body: Json) -> QueryResult<T> {
    let Json::Object(mut envelope) = body else {
        tracing::warn!("OData response is not a JSON object, treating as empty");
        return QueryResult::empty();
    };

    let items: Vec<T> = match envelope.remove(VALUE_KEY) {
        Some(Json::Array(raw)) => {
            let total = raw.len();
            let items: Vec<T> = raw
                .into_iter()
                .filter_map(|item| match serde_json::from_value(item) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping undecodable OData item");
                        None
                    }
                })
                .collect();
            if items.len() != total {
                tracing::debug!(kept = items.len(), total, "some OData items were dropped");
            }
            items
        }
        Some(other) => {
            tracing::warn!(
                kind = json_kind(&other),
                "OData `value` is not an array, treating as empty"
            );
            Vec::new()
        }
        None => Vec::new(),
    };

    let total_count = envelope
        .get(COUNT_KEY)
        .and_then(parse_count)
        .unwrap_or(items.len() as u64);

    let has_more = matches!(envelope.get(NEXT_LINK_KEY), Some(Json::String(_)));

    QueryResult::new(items, total_count, has_more)
}

fn parse_count(v: &Json) -> Option<u64> {
    match v {
        Json::Number(n) => n.as_u64(),
        Json::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_kind(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Role {
        id: String,
        name: String,
    }

    #[test]
    fn count_defaults_to_item_count() {
        let res: QueryResult<Json> = normalize_response(json!({
            "value": [{"id": 1}, {"id": 2}]
        }));
        assert_eq!(res.items.len(), 2);
        assert_eq!(res.total_count, 2);
        assert!(!res.has_more);
    }

    #[test]
    fn empty_object_is_empty_result() {
        let res: QueryResult<Json> = normalize_response(json!({}));
        assert_eq!(res, QueryResult::empty());
    }

    #[test]
    fn server_count_and_next_link_win() {
        let res: QueryResult<Role> = normalize_response(json!({
            "@odata.context": "https://api.example.com/$metadata#Roles",
            "@odata.count": 57,
            "@odata.nextLink": "https://api.example.com/Roles?$skip=10",
            "value": [{"id": "r1", "name": "admin"}]
        }));
        assert_eq!(
            res.items,
            vec![Role {
                id: "r1".into(),
                name: "admin".into()
            }]
        );
        assert_eq!(res.total_count, 57);
        assert!(res.has_more);
    }

    #[test]
    fn numeric_string_count_is_accepted() {
        let res: QueryResult<Json> = normalize_response(json!({
            "@odata.count": "12",
            "value": []
        }));
        assert_eq!(res.total_count, 12);
    }

    #[test]
    fn garbage_count_falls_back_to_items() {
        let res: QueryResult<Json> = normalize_response(json!({
            "@odata.count": -3,
            "value": [1]
        }));
        assert_eq!(res.total_count, 1);
    }

    #[test]
    fn null_next_link_means_no_more() {
        let res: QueryResult<Json> = normalize_response(json!({
            "@odata.nextLink": null,
            "value": []
        }));
        assert!(!res.has_more);
    }

    #[test]
    fn non_array_value_degrades_to_empty() {
        let res: QueryResult<Json> = normalize_response(json!({ "value": "oops" }));
        assert!(res.items.is_empty());
        assert_eq!(res.total_count, 0);
    }

    #[test]
    fn non_object_body_degrades_to_empty() {
        let res: QueryResult<Json> = normalize_response(json!([1, 2, 3]));
        assert_eq!(res, QueryResult::empty());
    }

    #[test]
    fn undecodable_items_are_skipped() {
        let res: QueryResult<Role> = normalize_response(json!({
            "value": [
                {"id": "r1", "name": "admin"},
                {"id": 7},
                {"id": "r2", "name": "viewer"}
            ]
        }));
        assert_eq!(res.items.len(), 2);
        assert_eq!(res.total_count, 2);
    }

    #[test]
    fn map_items_keeps_counters() {
        let res = QueryResult::new(vec![1, 2], 40, true).map_items(|n| n * 10);
        assert_eq!(res, QueryResult::new(vec![10, 20], 40, true));
    }

    #[test]
    fn serializes_camel_case_for_ui() {
        let res = QueryResult::new(vec!["a"], 1, false);
        assert_eq!(
            serde_json::to_value(&res).unwrap(),
            json!({"items": ["a"], "totalCount": 1, "hasMore": false})
        );
    }
}
