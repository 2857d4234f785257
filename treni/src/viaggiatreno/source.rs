//! Abstraction over where train progress comes from.

use std::future::Future;

use crate::domain::{TrainKey, TrainProgress};

use super::client::ViaggiaTrenoClient;
use super::error::ViaggiaTrenoError;

/// Trait for fetching the real-time progress of a journey.
///
/// This abstraction allows the timetable builder to be tested with mock
/// data.
pub trait ProgressSource: Sync {
    /// Fetch the progress of the journey identified by `key`.
    ///
    /// `Ok(None)` means upstream has no real-time data, which is normal.
    fn train_progress(
        &self,
        key: &TrainKey,
    ) -> impl Future<Output = Result<Option<TrainProgress>, ViaggiaTrenoError>> + Send;
}

impl ProgressSource for ViaggiaTrenoClient {
    async fn train_progress(
        &self,
        key: &TrainKey,
    ) -> Result<Option<TrainProgress>, ViaggiaTrenoError> {
        ViaggiaTrenoClient::train_progress(self, key).await
    }
}
