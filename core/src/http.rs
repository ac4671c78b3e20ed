//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! The core renders a URL and describes the GET request for it as plain
//! data; the host executes it and hands the response back to
//! `Client::parse_image`. Nothing here touches the network.
//!
//! Response bodies are raw bytes since the service answers with image data.

/// A GET request for a processed image, described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the caller after executing an `HttpRequest`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
