//! Mock progress source for tests.
//!
//! Serves canned snapshots keyed by train, optionally after a per-train
//! delay so tests can force completion order, and fails on demand.
//! Errors given to [`MockProgressSource::with_error`] are answered once,
//! since `ViaggiaTrenoError` cannot be cloned.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::{TrainKey, TrainProgress};

use super::error::ViaggiaTrenoError;
use super::source::ProgressSource;

#[derive(Default)]
pub struct MockProgressSource {
    progress: HashMap<TrainKey, TrainProgress>,
    delays: HashMap<TrainKey, Duration>,
    failing: HashSet<TrainKey>,
    errors: Mutex<HashMap<TrainKey, ViaggiaTrenoError>>,
    call_count: Mutex<usize>,
}

impl MockProgressSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `progress` for its own key.
    pub fn with_progress(mut self, progress: TrainProgress) -> Self {
        self.progress.insert(progress.key(), progress);
        self
    }

    /// Sleep before answering for `key`.
    pub fn with_delay(mut self, key: TrainKey, delay: Duration) -> Self {
        self.delays.insert(key, delay);
        self
    }

    /// Answer `key` with an upstream 503.
    pub fn with_failure(mut self, key: TrainKey) -> Self {
        self.failing.insert(key);
        self
    }

    /// Answer the next request for `key` with `error`.
    pub fn with_error(self, key: TrainKey, error: ViaggiaTrenoError) -> Self {
        self.errors.lock().unwrap().insert(key, error);
        self
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl ProgressSource for MockProgressSource {
    async fn train_progress(
        &self,
        key: &TrainKey,
    ) -> Result<Option<TrainProgress>, ViaggiaTrenoError> {
        *self.call_count.lock().unwrap() += 1;

        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }

        let injected = self.errors.lock().unwrap().remove(key);
        if let Some(error) = injected {
            return Err(error);
        }

        if self.failing.contains(key) {
            return Err(ViaggiaTrenoError::Upstream {
                status: 503,
                body: "Service Unavailable".to_string(),
            });
        }

        Ok(self.progress.get(key).cloned())
    }
}
