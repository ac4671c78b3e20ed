//! URL builder core for an Imaginary image-processing service.
//!
//! # Overview
//! Renders fetch URLs of the form
//! `<url>/<client>/images/fetch/[w_100,h_100,...]/<source>` without touching
//! the network. The host executes the request described by
//! `Client::build_request` and hands the response to `Client::parse_image`.
//!
//! # Design
//! - `ManipulationSet` stores code/value pairs in first-insertion order and
//!   renders them as the comma-separated manipulation segment.
//! - `RequestBuilder` binds one set to one source key; `Client::fetch`
//!   replaces it so requests never share manipulations.
//! - `Client::invoke` resolves names against the built-in `Operation`s first
//!   and the registered macros second.
//! - Configuration is validated lazily, when a URL is rendered.

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod manipulations;
pub mod types;

pub use builder::{Operation, RequestBuilder};
pub use client::{Client, Macro};
pub use config::Config;
pub use error::{ConfigKey, ImaginaryError, Result};
pub use http::{HttpRequest, HttpResponse};
pub use manipulations::{Code, ManipulationSet};
pub use types::{Image, Value};
