//! Low-priority work scheduling.
//!
//! Browsers run deferred work from an idle callback when one exists and from a
//! long timer otherwise. Both behaviours sit behind [`IdleScheduler`].

use std::collections::VecDeque;
use std::time::Duration;

use futures_util::future::BoxFuture;
use parking_lot::Mutex;

/// Unit of deferred work.
pub type IdleTask = BoxFuture<'static, ()>;

/// Delay used when no idle callback is available (10 000 seconds).
pub const DEFAULT_IDLE_FALLBACK_DELAY: Duration = Duration::from_secs(10_000);

/// Port for "run this when nothing more important is happening".
pub trait IdleScheduler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Queue a task. It may never run if the host never becomes idle.
    fn schedule(&self, task: IdleTask);
}

/// Idle-callback style scheduler: the host signals idle periods.
#[derive(Default)]
pub struct IdleQueue {
    tasks: Mutex<VecDeque<IdleTask>>,
}

impl IdleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting for the next idle period.
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Run the tasks queued before this idle period began.
    ///
    /// Tasks scheduled while the period runs wait for the next one.
    /// Returns how many tasks ran.
    pub async fn run_idle(&self) -> usize {
        let batch: Vec<IdleTask> = self.tasks.lock().drain(..).collect();
        let count = batch.len();
        for task in batch {
            task.await;
        }
        count
    }
}

impl IdleScheduler for IdleQueue {
    fn name(&self) -> &'static str {
        "idle-queue"
    }

    fn schedule(&self, task: IdleTask) {
        self.tasks.lock().push_back(task);
    }
}

/// Timer fallback: runs each task on the tokio runtime after a fixed delay.
pub struct DeferredTimer {
    delay: Duration,
}

impl DeferredTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for DeferredTimer {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_FALLBACK_DELAY)
    }
}

impl IdleScheduler for DeferredTimer {
    fn name(&self) -> &'static str {
        "deferred-timer"
    }

    fn schedule(&self, task: IdleTask) {
        let delay = self.delay;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    task.await;
                });
            }
            Err(_) => {
                tracing::warn!(
                    delay_secs = delay.as_secs(),
                    "No tokio runtime available, dropping deferred task"
                );
            }
        }
    }
}
