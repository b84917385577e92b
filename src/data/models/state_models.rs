use serde::Serialize;

use crate::data::models::ResultList;

/// Point-in-time copy of a controller's state, as handed to templates and the JSON API.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ControllerState {
    #[serde(rename = "LastQuery")]
    pub last_query: String,
    #[serde(rename = "Working")]
    pub is_working: bool,
    #[serde(rename = "Results")]
    pub results: ResultList,
}
