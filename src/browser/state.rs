use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::env::Host;
use crate::store::DuckState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserLocation {
    pub origin: Option<String>,
    pub host: Option<String>,
    /// Protocol including the colon, e.g. "https:".
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowserState {
    pub cookies: Option<HashMap<String, String>>,
    pub location: BrowserLocation,
    pub user_agent: Option<String>,
}

impl DuckState for BrowserState {}

impl BrowserState {
    /// Initial state from the incoming request or the browser window.
    ///
    /// Behind a proxy the forwarded host and protocol take precedence over
    /// the request's own.
    pub fn build_initial_state(host: &Host) -> Self {
        match host {
            Host::Browser(window) => {
                let location = &window.location;
                let origin = location
                    .origin
                    .clone()
                    .unwrap_or_else(|| format!("{}//{}", location.protocol, location.host));
                Self {
                    cookies: Some(window.cookies()),
                    location: BrowserLocation {
                        origin: Some(origin),
                        host: Some(location.host.clone()),
                        protocol: Some(location.protocol.clone()),
                    },
                    user_agent: window.user_agent.clone(),
                }
            }
            Host::Server {
                request: Some(request),
            } => {
                let forwarded = request.forwarded.as_ref();
                let host = forwarded
                    .and_then(|f| f.host.clone())
                    .or_else(|| request.header("host").map(str::to_string));
                let protocol = forwarded
                    .and_then(|f| f.proto.clone())
                    .unwrap_or_else(|| request.protocol.clone());

                Self {
                    cookies: Some(request.cookies.clone()),
                    location: BrowserLocation {
                        origin: host.as_ref().map(|host| format!("{}://{}", protocol, host)),
                        host,
                        protocol: Some(format!("{}:", protocol)),
                    },
                    user_agent: request.header("user-agent").map(str::to_string),
                }
            }
            Host::Server { request: None } => Self::default(),
        }
    }

    /// Cookies known for the page; empty when none were captured.
    pub fn get_cookies(&self) -> HashMap<String, String> {
        self.cookies.clone().unwrap_or_default()
    }
}
