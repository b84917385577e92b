pub mod search;
pub mod view;
