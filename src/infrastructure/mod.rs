//! Infrastructure layer: the library service's HTTP contract and sandbox paths.
//!
//! Nothing here talks to the Zellij host directly. [`api`] only describes
//! requests as [`HttpRequest`] values and decodes response bodies; the plugin
//! shim performs the actual `web_request` call.

pub mod api;
pub mod paths;

pub use api::{reservation_url, ApiClient, HttpMethod, HttpRequest, RequestContext};
pub use paths::{expand_tilde, get_data_dir};
