//! Redux-style store primitives shared by every duck.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Reducer ──→ State ──→ Selectors
//!    ↑                                 │
//!    └──── loaders / thunks ───────────┘
//! ```
//!
//! - **State**: cloneable snapshot of one duck
//! - **Action**: event dispatched by loaders or the host
//! - **Reducer**: pure function that transforms state based on actions
//! - **Store**: shared, lock-protected state plus dispatch and listeners

mod action;
mod reducer;
mod state;
mod store;

pub use action::Action;
pub use reducer::Reducer;
pub use state::DuckState;
pub use store::{Listener, Store};

/// Scope prefixed to every action type name.
pub const TYPE_SCOPE: &str = "app-ducks";
