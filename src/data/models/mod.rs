pub mod error_models;
pub mod search_models;
pub mod state_models;

pub use error_models::{BackendError, ConfigError, ViewError};
pub use search_models::{
    ItemId, ResultList, SearchRequest, SearchResponse, SearchResult, ToggleRequest,
};
pub use state_models::ControllerState;
