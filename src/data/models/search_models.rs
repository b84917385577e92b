use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::sync::Arc;

/// Identifier of a result item. The backend may send it as a number or a string,
/// and it is sent back in whichever shape it arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
    /// Numbers outside `i64`, kept exactly as received.
    Wide(Number),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
            ItemId::Wide(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "Query")]
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "Results", default)]
    pub results: Vec<SearchResult>,
}

// Fields other than ID/Title/Done are carried through untouched. A malformed ID or
// Done flag degrades that one item instead of failing the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(
        rename = "ID",
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<ItemId>,
    #[serde(rename = "Title", default, deserialize_with = "lenient_title")]
    pub title: String,
    #[serde(rename = "Done", default, deserialize_with = "lenient_done")]
    pub done: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ItemId>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => Some(n.as_i64().map(ItemId::Number).unwrap_or(ItemId::Wide(n))),
        Value::String(s) => Some(ItemId::Text(s)),
        Value::Null => None,
        other => {
            log::warn!("Ignoring unusable result ID {}", other);
            None
        }
    })
}

fn lenient_title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_done<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Null => false,
        other => {
            log::warn!("Treating Done={} as false", other);
            false
        }
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleRequest {
    #[serde(rename = "ID")]
    pub id: ItemId,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Done")]
    pub done: bool,
}

impl ToggleRequest {
    /// Request that flips the item's `Done` flag. `None` if the item has no ID.
    pub fn flipping(item: &SearchResult) -> Option<Self> {
        Some(ToggleRequest {
            id: item.id.clone()?,
            title: item.title.clone(),
            done: !item.done,
        })
    }
}

/// Immutable list of results. Updates build a new list, so a snapshot handed to the
/// renderer never changes under it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultList(Arc<[SearchResult]>);

impl ResultList {
    pub fn empty() -> Self {
        ResultList::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn find(&self, id: &ItemId) -> Option<&SearchResult> {
        self.0.iter().find(|item| item.id.as_ref() == Some(id))
    }

    /// Looks an item up by the textual form of its ID, as it appears in a URL path.
    pub fn find_by_key(&self, key: &str) -> Option<&SearchResult> {
        self.0
            .iter()
            .find(|item| item.id.as_ref().is_some_and(|id| id.to_string() == key))
    }

    /// Copy of the list with `Done` set on the item(s) carrying `id`.
    /// `None` when no such item is present.
    pub fn with_done(&self, id: &ItemId, done: bool) -> Option<Self> {
        self.find(id)?;
        Some(
            self.0
                .iter()
                .map(|item| {
                    if item.id.as_ref() == Some(id) {
                        SearchResult { done, ..item.clone() }
                    } else {
                        item.clone()
                    }
                })
                .collect(),
        )
    }
}

impl From<Vec<SearchResult>> for ResultList {
    fn from(items: Vec<SearchResult>) -> Self {
        ResultList(items.into())
    }
}

impl FromIterator<SearchResult> for ResultList {
    fn from_iter<I: IntoIterator<Item = SearchResult>>(iter: I) -> Self {
        ResultList(iter.into_iter().collect())
    }
}

impl std::ops::Index<usize> for ResultList {
    type Output = SearchResult;

    fn index(&self, index: usize) -> &SearchResult {
        &self.0[index]
    }
}

impl Serialize for ResultList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: i64, title: &str, done: bool) -> SearchResult {
        SearchResult {
            id: Some(ItemId::Number(id)),
            title: title.to_string(),
            done,
            extra: Map::new(),
        }
    }

    #[test]
    fn unknown_fields_pass_through() {
        let raw = json!({"ID": 7, "Title": "fmt", "Done": false, "Path": "pkg/fmt", "Rank": 1.5});
        let parsed: SearchResult = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.id, Some(ItemId::Number(7)));
        assert_eq!(parsed.extra.get("Path"), Some(&json!("pkg/fmt")));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), raw);
    }

    #[test]
    fn result_without_known_fields_still_decodes() {
        let raw = json!({"Results": [{"Pack": "http", "Path": "net/http", "Name": "get"}]});
        let parsed: SearchResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].id, None);
        assert_eq!(parsed.results[0].title, "");
        assert!(!parsed.results[0].done);
    }

    #[test]
    fn string_ids_are_accepted() {
        let parsed: SearchResult = serde_json::from_value(json!({"ID": "abc"})).unwrap();
        assert_eq!(parsed.id, Some(ItemId::Text("abc".into())));
        assert_eq!(parsed.id.unwrap().to_string(), "abc");
    }

    #[test]
    fn malformed_fields_degrade_a_single_item() {
        let raw = json!({"Results": [
            {"ID": 18446744073709551615u64, "Title": "wide", "Done": null},
            {"ID": 2.5, "Title": null, "Done": "yes"},
            {"ID": {"nested": true}, "Title": 7, "Done": true},
        ]});
        let parsed: SearchResponse = serde_json::from_value(raw).unwrap();

        assert_eq!(parsed.results.len(), 3);
        let wide = &parsed.results[0];
        assert_eq!(wide.id.as_ref().unwrap().to_string(), "18446744073709551615");
        assert!(!wide.done);
        assert_eq!(
            serde_json::to_value(wide).unwrap()["ID"],
            json!(18446744073709551615u64)
        );
        assert_eq!(parsed.results[1].id.as_ref().unwrap().to_string(), "2.5");
        assert_eq!(parsed.results[1].title, "");
        assert!(!parsed.results[1].done);
        assert_eq!(parsed.results[2].id, None);
        assert_eq!(parsed.results[2].title, "7");
        assert!(parsed.results[2].done);
    }

    #[test]
    fn lookup_by_key_ignores_id_shape() {
        let mut text = item(0, "text", false);
        text.id = Some(ItemId::Text("42".into()));
        let list = ResultList::from(vec![item(7, "number", false), text]);

        assert_eq!(list.find_by_key("42").unwrap().title, "text");
        assert_eq!(list.find_by_key("7").unwrap().title, "number");
        assert!(list.find_by_key("8").is_none());
    }

    #[test]
    fn toggle_request_inverts_done() {
        let req = ToggleRequest::flipping(&item(1, "a", false)).unwrap();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"ID": 1, "Title": "a", "Done": true})
        );

        let mut anonymous = item(1, "a", false);
        anonymous.id = None;
        assert!(ToggleRequest::flipping(&anonymous).is_none());
    }

    #[test]
    fn with_done_leaves_original_list_untouched() {
        let list = ResultList::from(vec![item(1, "a", false), item(2, "b", false)]);
        let updated = list.with_done(&ItemId::Number(2), true).unwrap();

        assert!(!list[1].done);
        assert!(updated[1].done);
        assert!(!updated[0].done);
        assert!(list.with_done(&ItemId::Number(3), true).is_none());
    }
}
