//! Status-change notification fan-out
//!
//! Every registered handler sees every event, in registration order. A
//! failing handler does not stop the others; the first failure is reported
//! once all handlers have run. Retrying is left to the handlers.

use std::sync::Arc;

use async_trait::async_trait;
use contractx_core::errors::{ExError, ExErrorKind};
use contractx_core::model::{AuditRecord, ContractStatusChangeEvent};
use contractx_core::ports::{AuditSink, MessagePublisher};

use crate::Result;

#[async_trait]
pub trait NotificationHandler: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &ContractStatusChangeEvent) -> Result<()>;
}

#[derive(Default)]
pub struct NotificationDispatcher {
    handlers: Vec<Arc<dyn NotificationHandler>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, handler: Arc<dyn NotificationHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Deliver `event` to every handler
    ///
    /// # Errors
    /// `ERR_EXTERNAL_SERVICE` wrapping the first handler failure.
    pub async fn dispatch(&self, event: &ContractStatusChangeEvent) -> Result<()> {
        let mut first_failure: Option<ExError> = None;

        for handler in &self.handlers {
            if let Err(e) = handler.handle(event).await {
                tracing::warn!(
                    handler = handler.name(),
                    contract_number = %event.contract_number,
                    contract_version = event.contract_version,
                    err_code = e.code(),
                    err = %e,
                    "notification handler failed"
                );
                if first_failure.is_none() {
                    first_failure = Some(
                        ExError::new(ExErrorKind::ExternalService)
                            .with_op("dispatch_notification")
                            .with_contract_number(event.contract_number.clone())
                            .with_contract_version(event.contract_version)
                            .with_message(format!("Handler '{}' failed", handler.name()))
                            .with_source(e),
                    );
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Writes an audit record for each event
pub struct AuditNotificationHandler {
    sink: Arc<dyn AuditSink>,
}

impl AuditNotificationHandler {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl NotificationHandler for AuditNotificationHandler {
    fn name(&self) -> &'static str {
        "audit"
    }

    async fn handle(&self, event: &ContractStatusChangeEvent) -> Result<()> {
        self.sink.write(AuditRecord::from_event(event)).await
    }
}

/// Publishes each event to the message bus
pub struct BusNotificationHandler {
    publisher: Arc<dyn MessagePublisher>,
}

impl BusNotificationHandler {
    pub fn new(publisher: Arc<dyn MessagePublisher>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl NotificationHandler for BusNotificationHandler {
    fn name(&self) -> &'static str {
        "message_bus"
    }

    async fn handle(&self, event: &ContractStatusChangeEvent) -> Result<()> {
        self.publisher.publish(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractx_core::model::{Contract, ContractAction};
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        fail: bool,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl NotificationHandler for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn handle(&self, _event: &ContractStatusChangeEvent) -> Result<()> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                Err(ExError::new(ExErrorKind::Io).with_message("bus down"))
            } else {
                Ok(())
            }
        }
    }

    fn event() -> ContractStatusChangeEvent {
        ContractStatusChangeEvent::for_contract(
            &Contract::new("C-1", 1, 1),
            None,
            ContractAction::Created,
        )
    }

    fn recorder(
        name: &'static str,
        fail: bool,
        log: &Arc<Mutex<Vec<&'static str>>>,
    ) -> Arc<dyn NotificationHandler> {
        Arc::new(Recorder {
            name,
            fail,
            log: log.clone(),
        })
    }

    #[tokio::test]
    async fn test_handlers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = NotificationDispatcher::new()
            .with_handler(recorder("first", false, &log))
            .with_handler(recorder("second", false, &log));

        dispatcher.dispatch(&event()).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_handlers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = NotificationDispatcher::new()
            .with_handler(recorder("broken", true, &log))
            .with_handler(recorder("audit", false, &log))
            .with_handler(recorder("also_broken", true, &log));

        let err = dispatcher.dispatch(&event()).await.unwrap_err();
        assert_eq!(*log.lock().unwrap(), vec!["broken", "audit", "also_broken"]);
        assert_eq!(err.kind(), ExErrorKind::ExternalService);
        assert!(err.message().contains("broken"));
        assert_eq!(err.source_error().unwrap().kind(), ExErrorKind::Io);
    }

    #[tokio::test]
    async fn test_empty_dispatcher_is_a_noop() {
        let dispatcher = NotificationDispatcher::new();
        assert!(dispatcher.is_empty());
        dispatcher.dispatch(&event()).await.unwrap();
    }
}
