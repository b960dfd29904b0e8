//! Gateway ports — everything the driver tells the monika gateway.

use std::future::Future;
use std::sync::Arc;

use monika_domain::driver::DriverRegistration;
use monika_domain::error::MonikaError;
use monika_domain::fault::{ErrorReport, RemoteErrorId};
use monika_domain::update::DeviceUpdate;

/// Remote error tracking.
///
/// Implementations must tolerate being called again for the same fault
/// after a failure.
pub trait ErrorSink {
    /// Announce a fault; the gateway answers with the id it filed it under.
    fn report_error(
        &self,
        report: &ErrorReport,
    ) -> impl Future<Output = Result<RemoteErrorId, MonikaError>> + Send;

    /// Withdraw a previously reported fault.
    fn delete_error(
        &self,
        id: &RemoteErrorId,
    ) -> impl Future<Output = Result<(), MonikaError>> + Send;
}

/// Receives sparse change updates.
pub trait UpdateSink {
    /// Publish one non-empty update.
    fn publish_update(
        &self,
        update: &DeviceUpdate,
    ) -> impl Future<Output = Result<(), MonikaError>> + Send;
}

/// Driver session handshake.
pub trait DriverRegistry {
    /// Announce the driver. Must succeed before any other gateway traffic.
    fn connect(
        &self,
        registration: &DriverRegistration,
    ) -> impl Future<Output = Result<(), MonikaError>> + Send;

    /// Withdraw the driver.
    fn disconnect(
        &self,
        registration: &DriverRegistration,
    ) -> impl Future<Output = Result<(), MonikaError>> + Send;
}

impl<T: ErrorSink + Send + Sync> ErrorSink for Arc<T> {
    fn report_error(
        &self,
        report: &ErrorReport,
    ) -> impl Future<Output = Result<RemoteErrorId, MonikaError>> + Send {
        (**self).report_error(report)
    }

    fn delete_error(
        &self,
        id: &RemoteErrorId,
    ) -> impl Future<Output = Result<(), MonikaError>> + Send {
        (**self).delete_error(id)
    }
}

impl<T: UpdateSink + Send + Sync> UpdateSink for Arc<T> {
    fn publish_update(
        &self,
        update: &DeviceUpdate,
    ) -> impl Future<Output = Result<(), MonikaError>> + Send {
        (**self).publish_update(update)
    }
}

impl<T: DriverRegistry + Send + Sync> DriverRegistry for Arc<T> {
    fn connect(
        &self,
        registration: &DriverRegistration,
    ) -> impl Future<Output = Result<(), MonikaError>> + Send {
        (**self).connect(registration)
    }

    fn disconnect(
        &self,
        registration: &DriverRegistration,
    ) -> impl Future<Output = Result<(), MonikaError>> + Send {
        (**self).disconnect(registration)
    }
}
