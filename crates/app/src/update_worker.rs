//! Update worker — the single consumer of a driver's change queue.
//!
//! Anything that may have mutated a device (a control, a poll tick, a delayed
//! transition) pushes the device onto the queue. The worker drains it in
//! arrival order, takes the sparse update, reconciles faults against it and
//! publishes it.

use std::sync::Arc;

use tokio::sync::mpsc;

use monika_domain::device::Device;

use crate::ports::{ErrorSink, UpdateSink};
use crate::reconciler::{ErrorReconciler, ReconcileSummary};

/// Producer half of the change queue.
pub type UpdateSender = mpsc::UnboundedSender<Arc<Device>>;
/// Consumer half of the change queue.
pub type UpdateReceiver = mpsc::UnboundedReceiver<Arc<Device>>;

/// Create a change queue.
#[must_use]
pub fn channel() -> (UpdateSender, UpdateReceiver) {
    mpsc::unbounded_channel()
}

/// Outcome of processing one queued device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processed {
    /// Nothing in the device changed since the last pass.
    Unchanged,
    /// An update was produced; `published` tells whether the gateway took it.
    Updated {
        faults: ReconcileSummary,
        published: bool,
    },
}

pub struct UpdateWorker<E, U> {
    reconciler: ErrorReconciler<E>,
    updates: U,
}

impl<E, U> UpdateWorker<E, U>
where
    E: ErrorSink + Send + Sync,
    U: UpdateSink + Send + Sync,
{
    pub fn new(reconciler: ErrorReconciler<E>, updates: U) -> Self {
        Self {
            reconciler,
            updates,
        }
    }

    #[must_use]
    pub fn reconciler(&self) -> &ErrorReconciler<E> {
        &self.reconciler
    }

    /// Take the device's pending changes, reconcile faults, then publish.
    pub async fn process(&mut self, device: &Device) -> Processed {
        let Some(update) = device.updated() else {
            return Processed::Unchanged;
        };
        tracing::debug!(device_id = %update.id, modules = update.modules.len(), "device changed");

        let faults = self.reconciler.reconcile(&update).await;
        let published = match self.updates.publish_update(&update).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(device_id = %update.id, error = %err, "failed to publish update");
                false
            }
        };
        Processed::Updated { faults, published }
    }

    /// Drain `queue` until every sender is gone.
    pub async fn run(mut self, mut queue: UpdateReceiver) {
        tracing::info!("update worker started");
        while let Some(device) = queue.recv().await {
            self.process(&device).await;
        }
        tracing::info!("update worker stopped");
    }
}
