//! Error reconciliation — keep the gateway's view of live faults in line with
//! what the checkers currently see.
//!
//! Three registries (device, module, iolet) record the fault last acknowledged
//! by the gateway for each entity. Every sparse update is walked top-down; for
//! each entity present in it the matching checker produces a candidate and the
//! transition below is applied:
//!
//! | recorded | candidate                                   | action             |
//! |----------|---------------------------------------------|--------------------|
//! | no       | none                                        | nothing            |
//! | no       | some                                        | report             |
//! | yes      | none                                        | delete             |
//! | yes      | same message                                | nothing            |
//! | yes      | other message, higher severity              | delete then report |
//! | yes      | other message, equal or lower severity      | nothing            |
//!
//! A rising severity with an unchanged message is deliberately not escalated.
//!
//! Gateway failures are logged and dropped. A failed report leaves nothing
//! recorded; a failed delete leaves the old record in place.
//!
//! Modules and iolets are only unique within their parent, so registry keys
//! carry the full ancestor path.

use std::collections::HashMap;
use std::hash::Hash;

use monika_domain::fault::{ErrorReport, FaultCandidate, LiveFault};
use monika_domain::id::{DeviceId, IoletId, ModuleId};
use monika_domain::update::{DeviceUpdate, IoletUpdate, ModuleUpdate};

use crate::ports::ErrorSink;

/// Checker over device snapshots.
pub type DeviceChecker = Box<dyn Fn(&DeviceUpdate) -> Option<FaultCandidate> + Send + Sync>;
/// Checker over module snapshots.
pub type ModuleChecker = Box<dyn Fn(&ModuleUpdate) -> Option<FaultCandidate> + Send + Sync>;
/// Checker over iolet snapshots.
pub type IoletChecker = Box<dyn Fn(&IoletUpdate) -> Option<FaultCandidate> + Send + Sync>;

/// Registry key of a module fault.
pub type ModuleKey = (DeviceId, ModuleId);
/// Registry key of an iolet fault.
pub type IoletKey = (DeviceId, ModuleId, IoletId);

/// Remote calls made by one [`ErrorReconciler::reconcile`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Faults the gateway accepted.
    pub reported: usize,
    /// Faults the gateway withdrew.
    pub deleted: usize,
    /// Report or delete calls that failed.
    pub failed: usize,
}

/// What to do for one entity in one pass.
#[derive(Debug, PartialEq, Eq)]
enum Transition {
    Keep,
    Report(FaultCandidate),
    Delete,
    Replace(FaultCandidate),
}

fn transition(recorded: Option<&LiveFault>, candidate: Option<FaultCandidate>) -> Transition {
    match (recorded, candidate) {
        (None, None) => Transition::Keep,
        (None, Some(candidate)) => Transition::Report(candidate),
        (Some(_), None) => Transition::Delete,
        (Some(live), Some(candidate)) => {
            if live.message != candidate.message && candidate.severity > live.severity {
                Transition::Replace(candidate)
            } else {
                Transition::Keep
            }
        }
    }
}

/// Owns the live fault registries of one driver.
pub struct ErrorReconciler<S> {
    sink: S,
    check_device: DeviceChecker,
    check_module: ModuleChecker,
    check_iolet: IoletChecker,
    device_faults: HashMap<DeviceId, LiveFault>,
    module_faults: HashMap<ModuleKey, LiveFault>,
    iolet_faults: HashMap<IoletKey, LiveFault>,
}

impl<S> std::fmt::Debug for ErrorReconciler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorReconciler")
            .field("device_faults", &self.device_faults)
            .field("module_faults", &self.module_faults)
            .field("iolet_faults", &self.iolet_faults)
            .finish_non_exhaustive()
    }
}

impl<S: ErrorSink + Sync> ErrorReconciler<S> {
    /// Create a reconciler whose checkers never report anything.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            check_device: Box::new(|_| None),
            check_module: Box::new(|_| None),
            check_iolet: Box::new(|_| None),
            device_faults: HashMap::new(),
            module_faults: HashMap::new(),
            iolet_faults: HashMap::new(),
        }
    }

    pub fn set_device_checker<F>(&mut self, checker: F)
    where
        F: Fn(&DeviceUpdate) -> Option<FaultCandidate> + Send + Sync + 'static,
    {
        self.check_device = Box::new(checker);
    }

    pub fn set_module_checker<F>(&mut self, checker: F)
    where
        F: Fn(&ModuleUpdate) -> Option<FaultCandidate> + Send + Sync + 'static,
    {
        self.check_module = Box::new(checker);
    }

    pub fn set_iolet_checker<F>(&mut self, checker: F)
    where
        F: Fn(&IoletUpdate) -> Option<FaultCandidate> + Send + Sync + 'static,
    {
        self.check_iolet = Box::new(checker);
    }

    #[must_use]
    pub fn device_fault(&self, device: &DeviceId) -> Option<&LiveFault> {
        self.device_faults.get(device)
    }

    #[must_use]
    pub fn module_fault(&self, device: &DeviceId, module: &ModuleId) -> Option<&LiveFault> {
        self.module_faults.get(&(device.clone(), module.clone()))
    }

    #[must_use]
    pub fn iolet_fault(
        &self,
        device: &DeviceId,
        module: &ModuleId,
        iolet: &IoletId,
    ) -> Option<&LiveFault> {
        self.iolet_faults
            .get(&(device.clone(), module.clone(), iolet.clone()))
    }

    /// Number of faults currently believed live on the gateway.
    #[must_use]
    pub fn live_faults(&self) -> usize {
        self.device_faults.len() + self.module_faults.len() + self.iolet_faults.len()
    }

    /// Run the checkers over every entity present in `update` and bring the
    /// gateway in line.
    #[tracing::instrument(skip_all, fields(device_id = %update.id))]
    pub async fn reconcile(&mut self, update: &DeviceUpdate) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        let candidate = (self.check_device)(update);
        apply(
            &self.sink,
            &mut self.device_faults,
            update.id.clone(),
            candidate,
            |candidate| device_report(update, candidate),
            &mut summary,
        )
        .await;

        for module in &update.modules {
            let candidate = (self.check_module)(module);
            apply(
                &self.sink,
                &mut self.module_faults,
                (update.id.clone(), module.id.clone()),
                candidate,
                |candidate| module_report(update, module, candidate),
                &mut summary,
            )
            .await;

            for iolet in &module.iolets {
                let candidate = (self.check_iolet)(iolet);
                apply(
                    &self.sink,
                    &mut self.iolet_faults,
                    (update.id.clone(), module.id.clone(), iolet.id.clone()),
                    candidate,
                    |candidate| iolet_report(update, module, iolet, candidate),
                    &mut summary,
                )
                .await;
            }
        }

        if summary != ReconcileSummary::default() {
            tracing::debug!(?summary, "faults reconciled");
        }
        summary
    }
}

async fn apply<S, K>(
    sink: &S,
    registry: &mut HashMap<K, LiveFault>,
    key: K,
    candidate: Option<FaultCandidate>,
    report: impl FnOnce(&FaultCandidate) -> ErrorReport,
    summary: &mut ReconcileSummary,
) where
    S: ErrorSink,
    K: Eq + Hash + std::fmt::Debug,
{
    let candidate = match transition(registry.get(&key), candidate) {
        Transition::Keep => return,
        Transition::Report(candidate) => candidate,
        Transition::Delete => {
            delete(sink, registry, &key, summary).await;
            return;
        }
        Transition::Replace(candidate) => {
            delete(sink, registry, &key, summary).await;
            candidate
        }
    };

    let report = report(&candidate);
    match sink.report_error(&report).await {
        Ok(remote_id) => {
            tracing::info!(?key, %remote_id, message = %candidate.message, "fault reported");
            summary.reported += 1;
            registry.insert(
                key,
                LiveFault {
                    remote_id,
                    severity: candidate.severity,
                    message: candidate.message,
                },
            );
        }
        Err(err) => {
            tracing::warn!(?key, error = %err, "failed to report fault");
            summary.failed += 1;
        }
    }
}

async fn delete<S, K>(
    sink: &S,
    registry: &mut HashMap<K, LiveFault>,
    key: &K,
    summary: &mut ReconcileSummary,
) where
    S: ErrorSink,
    K: Eq + Hash + std::fmt::Debug,
{
    let Some(live) = registry.get(key) else {
        return;
    };
    match sink.delete_error(&live.remote_id).await {
        Ok(()) => {
            tracing::info!(?key, remote_id = %live.remote_id, "fault withdrawn");
            summary.deleted += 1;
            registry.remove(key);
        }
        Err(err) => {
            tracing::warn!(?key, remote_id = %live.remote_id, error = %err, "failed to withdraw fault");
            summary.failed += 1;
        }
    }
}

fn device_report(device: &DeviceUpdate, candidate: &FaultCandidate) -> ErrorReport {
    ErrorReport {
        device_id: device.id.clone(),
        device_type: device.kind,
        device_name: device.name.clone(),
        module_id: None,
        module_type: None,
        module_name: None,
        iolet_id: None,
        iolet_type: None,
        iolet_name: None,
        severity: candidate.severity,
        message: candidate.message.clone(),
    }
}

fn module_report(
    device: &DeviceUpdate,
    module: &ModuleUpdate,
    candidate: &FaultCandidate,
) -> ErrorReport {
    ErrorReport {
        module_id: Some(module.id.clone()),
        module_type: Some(module.kind),
        module_name: Some(module.name.clone()),
        ..device_report(device, candidate)
    }
}

fn iolet_report(
    device: &DeviceUpdate,
    module: &ModuleUpdate,
    iolet: &IoletUpdate,
    candidate: &FaultCandidate,
) -> ErrorReport {
    ErrorReport {
        iolet_id: Some(iolet.id.clone()),
        iolet_type: Some(iolet.kind),
        iolet_name: Some(iolet.name.clone()),
        ..module_report(device, module, candidate)
    }
}
