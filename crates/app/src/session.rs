//! Driver session — all gateway traffic happens between connect and disconnect.

use std::future::Future;

use monika_domain::driver::DriverRegistration;
use monika_domain::error::MonikaError;

use crate::ports::DriverRegistry;

pub struct DriverSession<R> {
    registry: R,
    registration: DriverRegistration,
}

impl<R: DriverRegistry + Sync> DriverSession<R> {
    pub fn new(registry: R, registration: DriverRegistration) -> Self {
        Self {
            registry,
            registration,
        }
    }

    #[must_use]
    pub fn registration(&self) -> &DriverRegistration {
        &self.registration
    }

    /// Announce the driver to the gateway.
    ///
    /// # Errors
    ///
    /// Returns the registry's error; the driver must not start traffic then.
    #[tracing::instrument(skip(self), fields(device_type = %self.registration.device_type, port = self.registration.port))]
    pub async fn connect(&self) -> Result<(), MonikaError> {
        self.registry.connect(&self.registration).await?;
        tracing::info!("driver connected to gateway");
        Ok(())
    }

    /// Withdraw the driver from the gateway.
    ///
    /// # Errors
    ///
    /// Returns the registry's error.
    #[tracing::instrument(skip(self), fields(device_type = %self.registration.device_type))]
    pub async fn disconnect(&self) -> Result<(), MonikaError> {
        self.registry.disconnect(&self.registration).await?;
        tracing::info!("driver disconnected from gateway");
        Ok(())
    }

    /// Connect, drive `traffic` to completion, then disconnect.
    ///
    /// `traffic` only starts once the gateway accepted the driver. The
    /// disconnect is attempted whatever `traffic` returned; its failure is
    /// logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns the connect error, in which case `traffic` never runs.
    pub async fn run<F, T>(&self, traffic: F) -> Result<T, MonikaError>
    where
        F: Future<Output = T>,
    {
        self.connect().await?;
        let output = traffic.await;
        if let Err(err) = self.disconnect().await {
            tracing::warn!(error = %err, "failed to disconnect from gateway");
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monika_domain::kind::DeviceType;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct RecordingRegistry {
        calls: Mutex<Vec<&'static str>>,
        refuse_connect: AtomicBool,
        refuse_disconnect: AtomicBool,
    }

    impl RecordingRegistry {
        fn answer(&self, call: &'static str, refuse: &AtomicBool) -> Result<(), MonikaError> {
            self.calls.lock().unwrap().push(call);
            if refuse.load(Ordering::SeqCst) {
                Err(MonikaError::Gateway(format!("{call} refused").into()))
            } else {
                Ok(())
            }
        }
    }

    impl DriverRegistry for RecordingRegistry {
        fn connect(
            &self,
            _registration: &DriverRegistration,
        ) -> impl Future<Output = Result<(), MonikaError>> + Send {
            let result = self.answer("connect", &self.refuse_connect);
            async { result }
        }

        fn disconnect(
            &self,
            _registration: &DriverRegistration,
        ) -> impl Future<Output = Result<(), MonikaError>> + Send {
            let result = self.answer("disconnect", &self.refuse_disconnect);
            async { result }
        }
    }

    fn registration() -> DriverRegistration {
        DriverRegistration::new(DeviceType::GenericDummy, 8090)
    }

    #[tokio::test]
    async fn should_bracket_traffic_between_connect_and_disconnect() {
        let session = DriverSession::new(RecordingRegistry::default(), registration());

        let output = session
            .run(async {
                session.registry.calls.lock().unwrap().push("traffic");
                42
            })
            .await
            .unwrap();

        assert_eq!(output, 42);
        assert_eq!(
            *session.registry.calls.lock().unwrap(),
            vec!["connect", "traffic", "disconnect"]
        );
    }

    #[tokio::test]
    async fn should_not_start_traffic_when_connect_fails() {
        let registry = RecordingRegistry::default();
        registry.refuse_connect.store(true, Ordering::SeqCst);
        let session = DriverSession::new(registry, registration());
        let started = AtomicBool::new(false);

        let result = session
            .run(async { started.store(true, Ordering::SeqCst) })
            .await;

        assert!(result.is_err());
        assert!(!started.load(Ordering::SeqCst));
        assert_eq!(*session.registry.calls.lock().unwrap(), vec!["connect"]);
    }

    #[tokio::test]
    async fn should_attempt_disconnect_when_traffic_failed() {
        let session = DriverSession::new(RecordingRegistry::default(), registration());

        let output: Result<(), &str> = session.run(async { Err("publish failed") }).await.unwrap();

        assert!(output.is_err());
        assert_eq!(
            *session.registry.calls.lock().unwrap(),
            vec!["connect", "disconnect"]
        );
    }

    #[tokio::test]
    async fn should_swallow_disconnect_failure() {
        let registry = RecordingRegistry::default();
        registry.refuse_disconnect.store(true, Ordering::SeqCst);
        let session = DriverSession::new(registry, registration());

        assert!(session.run(async {}).await.is_ok());
    }
}
