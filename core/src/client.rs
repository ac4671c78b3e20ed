//! Fluent URL builder for an Imaginary image service.
//!
//! # Design
//! `Client` holds the configuration, a registry of named macros and the
//! active `RequestBuilder`. `fetch` replaces the builder, so one client can
//! serve any number of fetch → manipulate → url sequences without state
//! leaking between them.
//!
//! Named calls go through `invoke`, which resolves built-in operations first
//! and macros second. A macro can therefore never shadow `width`, `height`,
//! `fit` or `circle`. Anything else is `DefinitionNotFound`.
//!
//! Configuration is validated when a URL is rendered, not at construction.
//! The client is not meant to be shared between concurrent callers; use one
//! instance per sequence.

use std::collections::HashMap;
use std::fmt;

use crate::builder::{Operation, RequestBuilder};
use crate::config::Config;
use crate::error::{ImaginaryError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Image, Value};

/// Resource segment. Only images are supported.
const RESOURCE_KEY: &str = "images";
/// Type segment. Only remote fetches are supported.
const TYPE_KEY: &str = "fetch";

/// A caller-defined preset, applied to the active builder with the
/// arguments passed to `invoke`.
pub type Macro = Box<dyn Fn(&mut RequestBuilder, &[Value])>;

pub struct Client {
    config: Config,
    macros: HashMap<String, Macro>,
    active: Option<RequestBuilder>,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            macros: HashMap::new(),
            active: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register `definition` under `name`, replacing any earlier macro with
    /// the same name.
    pub fn define<F>(&mut self, name: impl Into<String>, definition: F) -> &mut Self
    where
        F: Fn(&mut RequestBuilder, &[Value]) + 'static,
    {
        let name = name.into();
        tracing::debug!(name = %name, "defining macro");
        self.macros.insert(name, Box::new(definition));
        self
    }

    pub fn has_definition(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Start a new request for `source`, discarding the previous one.
    pub fn fetch(&mut self, source: impl Into<String>) -> &mut Self {
        let builder = RequestBuilder::new(source);
        tracing::debug!(source = builder.source_key(), "starting fetch request");
        self.active = Some(builder);
        self
    }

    pub fn active(&self) -> Option<&RequestBuilder> {
        self.active.as_ref()
    }

    pub fn circle(&mut self, radius: impl Into<Value>) -> &mut Self {
        let radius = radius.into();
        self.with_active(Operation::Circle, |b| {
            b.circle(radius);
        })
    }

    pub fn circle_max(&mut self) -> &mut Self {
        self.with_active(Operation::Circle, |b| {
            b.circle_max();
        })
    }

    pub fn fit(&mut self, gravity: Option<&str>) -> &mut Self {
        self.with_active(Operation::Fit, |b| {
            b.fit(gravity);
        })
    }

    pub fn height(&mut self, height: u32) -> &mut Self {
        self.with_active(Operation::Height, |b| {
            b.height(height);
        })
    }

    pub fn width(&mut self, width: u32) -> &mut Self {
        self.with_active(Operation::Width, |b| {
            b.width(width);
        })
    }

    /// Call `name` on the active request: a built-in operation if one has
    /// that name, otherwise a registered macro.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> Result<&mut Self> {
        match name.parse::<Operation>() {
            Ok(operation) => {
                let builder = self.active.as_mut().ok_or(ImaginaryError::NoActiveRequest)?;
                tracing::debug!(name, "resolved built-in operation");
                operation.apply(builder, args)?;
            }
            Err(_) => {
                let definition = self
                    .macros
                    .get(name)
                    .ok_or_else(|| ImaginaryError::DefinitionNotFound(name.to_string()))?;
                let builder = self.active.as_mut().ok_or(ImaginaryError::NoActiveRequest)?;
                tracing::debug!(name, args = args.len(), "resolved macro");
                definition(builder, args);
            }
        }
        Ok(self)
    }

    /// Render the URL for the active request.
    ///
    /// Segments are joined with `/`; empty ones (notably an empty
    /// manipulation list) are skipped rather than producing `//`.
    pub fn url(&self) -> Result<String> {
        let base = self.config.require_url()?;
        let client = self.config.require_client()?;
        let builder = self.active.as_ref().ok_or(ImaginaryError::NoActiveRequest)?;
        let manipulations = builder.render_manipulations();

        let url = [
            base,
            client,
            RESOURCE_KEY,
            TYPE_KEY,
            manipulations.as_str(),
            builder.source_key(),
        ]
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
        Ok(url)
    }

    pub fn build_request(&self) -> Result<HttpRequest> {
        Ok(HttpRequest {
            url: self.url()?,
            headers: vec![("accept".to_string(), "image/*".to_string())],
        })
    }

    pub fn parse_image(&self, response: HttpResponse) -> Result<Image> {
        check_status(&response, 200)?;
        Ok(Image {
            content_type: response.header("content-type").map(str::to_string),
            bytes: response.body,
        })
    }

    fn with_active(&mut self, operation: Operation, f: impl FnOnce(&mut RequestBuilder)) -> &mut Self {
        match self.active.as_mut() {
            Some(builder) => f(builder),
            None => {
                tracing::debug!(operation = operation.name(), "no active request, manipulation dropped");
            }
        }
        self
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.macros.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("macros", &names)
            .field("active", &self.active)
            .finish()
    }
}

impl TryFrom<&Client> for String {
    type Error = ImaginaryError;

    fn try_from(client: &Client) -> Result<Self> {
        client.url()
    }
}

/// Map non-success status codes to the appropriate `ImaginaryError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<()> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ImaginaryError::NotFound);
    }
    Err(ImaginaryError::Http {
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    })
}
