//! Module registry lookup for component base URLs.

use std::collections::HashMap;

/// Resolves the base URL a component's assets are served from.
pub trait ModuleRegistry: Send + Sync {
    /// Base URL without a trailing slash, or `None` for unknown components.
    fn module_base_url(&self, component_key: &str) -> Option<String>;
}

/// In-memory registry of component key → bundle URL.
#[derive(Debug, Clone, Default)]
pub struct ModuleMap {
    modules: HashMap<String, String>,
}

impl ModuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component with the URL of its bundle or its base directory.
    pub fn insert(&mut self, component_key: impl Into<String>, url: impl Into<String>) {
        self.modules.insert(component_key.into(), url.into());
    }

    pub fn with_module(mut self, component_key: impl Into<String>, url: impl Into<String>) -> Self {
        self.insert(component_key, url);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ModuleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ModuleMap::new();
        for (key, url) in iter {
            map.insert(key, url);
        }
        map
    }
}

impl ModuleRegistry for ModuleMap {
    fn module_base_url(&self, component_key: &str) -> Option<String> {
        self.modules.get(component_key).map(|url| base_url(url))
    }
}

/// Strip a trailing `*.js` file name, then one trailing slash.
fn base_url(url: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or(url);
    let is_script = last.len() > 3 && last.to_ascii_lowercase().ends_with(".js");
    let dir = if is_script {
        &url[..url.len() - last.len()]
    } else {
        url
    };
    dir.strip_suffix('/').unwrap_or(dir).to_string()
}
