//! HTTP client functionality

pub mod http;

pub use http::{is_json_content_type, Dispatcher};
