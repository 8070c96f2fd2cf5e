//! Runtime environment descriptor.
//!
//! Everything that differs between server rendering and the browser is
//! injected through [`Environment`] instead of being probed from global state,
//! so both branches can be exercised side by side in one process.

mod host;
mod scheduler;

use std::fmt;
use std::sync::Arc;

pub use host::{BrowserWindow, Forwarded, Host, ServerRequest, WindowLocation};
pub use scheduler::{
    DeferredTimer, IdleQueue, IdleScheduler, IdleTask, DEFAULT_IDLE_FALLBACK_DELAY,
};

/// Where the ducks are executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Runtime {
    /// Server-side rendering.
    Server,
    /// Hydrated client.
    Browser,
}

/// Injected capabilities of the current runtime.
#[derive(Clone)]
pub struct Environment {
    runtime: Runtime,
    scheduler: Arc<dyn IdleScheduler>,
}

impl Environment {
    /// Server runtime. Low-priority work falls back to a long timer.
    pub fn server() -> Self {
        Self {
            runtime: Runtime::Server,
            scheduler: Arc::new(DeferredTimer::default()),
        }
    }

    /// Browser runtime with the given idle-work scheduler.
    pub fn browser(scheduler: Arc<dyn IdleScheduler>) -> Self {
        Self {
            runtime: Runtime::Browser,
            scheduler,
        }
    }

    pub fn runtime(&self) -> Runtime {
        self.runtime
    }

    pub fn is_server(&self) -> bool {
        self.runtime == Runtime::Server
    }

    pub fn is_browser(&self) -> bool {
        self.runtime == Runtime::Browser
    }

    /// Scheduler for work that should run when the host is idle.
    pub fn scheduler(&self) -> &Arc<dyn IdleScheduler> {
        &self.scheduler
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("runtime", &self.runtime)
            .field("scheduler", &self.scheduler.name())
            .finish()
    }
}
