//! Shared client/server state ducks with a caching, fallback-aware
//! language pack loader.

pub mod application_error;
pub mod browser;
pub mod config;
pub mod ducks;
pub mod env;
pub mod error_reporting;
pub mod fetch;
pub mod intl;
pub mod logging;
pub mod modules;
pub mod redirection;
pub mod rendering;
pub mod store;

pub use ducks::Ducks;
