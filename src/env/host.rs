//! Host inputs available when building initial state.

use std::collections::HashMap;

use super::Runtime;

/// What the runtime hands the ducks when a store is created.
#[derive(Debug, Clone)]
pub enum Host {
    /// Server rendering, usually for an incoming request.
    Server { request: Option<ServerRequest> },
    /// Hydrated client window.
    Browser(BrowserWindow),
}

impl Host {
    pub fn runtime(&self) -> Runtime {
        match self {
            Host::Server { .. } => Runtime::Server,
            Host::Browser(_) => Runtime::Browser,
        }
    }

    pub fn request(&self) -> Option<&ServerRequest> {
        match self {
            Host::Server { request } => request.as_ref(),
            Host::Browser(_) => None,
        }
    }
}

/// Proxy-provided host and protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forwarded {
    pub host: Option<String>,
    pub proto: Option<String>,
}

/// Incoming server request, reduced to what the ducks read.
#[derive(Debug, Clone, Default)]
pub struct ServerRequest {
    pub cookies: HashMap<String, String>,
    /// Header names are stored lowercased.
    headers: HashMap<String, String>,
    pub forwarded: Option<Forwarded>,
    /// Request protocol without the colon, e.g. "https".
    pub protocol: String,
}

impl ServerRequest {
    pub fn new(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn with_forwarded(mut self, forwarded: Forwarded) -> Self {
        self.forwarded = Some(forwarded);
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Languages from `Accept-Language`, most preferred first.
    ///
    /// Entries with `q=0` are dropped; equal weights keep header order.
    pub fn accepts_languages(&self) -> Vec<String> {
        self.header("accept-language")
            .map(parse_accept_language)
            .unwrap_or_default()
    }
}

/// Parse an `Accept-Language` value into tags ordered by quality.
pub(crate) fn parse_accept_language(value: &str) -> Vec<String> {
    let mut weighted: Vec<(String, f32)> = value
        .split(',')
        .filter_map(|item| {
            let mut parts = item.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() {
                return None;
            }
            let quality = parts
                .filter_map(|param| param.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (quality > 0.0).then(|| (tag.to_string(), quality))
        })
        .collect();

    // sort_by is stable, so ties keep their header order
    weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    weighted.into_iter().map(|(tag, _)| tag).collect()
}

/// `window.location` fields the ducks read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowLocation {
    pub origin: Option<String>,
    /// Protocol including the colon, e.g. "https:".
    pub protocol: String,
    pub host: String,
    pub href: Option<String>,
}

/// Browser globals the ducks read.
#[derive(Debug, Clone, Default)]
pub struct BrowserWindow {
    pub navigator_language: Option<String>,
    pub user_agent: Option<String>,
    pub location: WindowLocation,
    /// Raw `document.cookie` string.
    pub document_cookie: String,
}

impl BrowserWindow {
    /// Cookies parsed from `document.cookie`.
    pub fn cookies(&self) -> HashMap<String, String> {
        self.document_cookie
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                let name = name.trim();
                (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
            })
            .collect()
    }
}
