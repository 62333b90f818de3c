//! Receiving side: named message handlers.

use crate::error::BusError;
use crate::message::BusMessage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, warn};

/// Handles every incoming message registered under one name.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: BusMessage) -> Result<(), BusError>;
}

/// Adapts an async closure into a [`MessageHandler`].
pub struct FnHandler<F> {
    handler: F,
}

#[async_trait]
impl<F, Fut> MessageHandler for FnHandler<F>
where
    F: Fn(BusMessage) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BusError>> + Send,
{
    async fn handle(&self, message: BusMessage) -> Result<(), BusError> {
        (self.handler)(message).await
    }
}

/// Name → handler table.
///
/// Messages are dispatched one at a time in arrival order. A failing
/// handler is logged and does not stop the dispatch of later messages.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for messages named `name`, replacing any previous one.
    pub fn on(&mut self, name: &str, handler: impl MessageHandler + 'static) -> &mut Self {
        self.handlers.insert(name.to_string(), Arc::new(handler));
        self
    }

    /// Registers an async closure.
    pub fn on_fn<F, Fut>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: Fn(BusMessage) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BusError>> + Send + 'static,
    {
        self.on(name, FnHandler { handler })
    }

    pub fn handles(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub async fn dispatch(&self, message: BusMessage) {
        let Some(handler) = self.handlers.get(&message.name) else {
            warn!("Ignoring unknown bus message '{}'", message.name);
            return;
        };

        let name = message.name.clone();
        if let Err(e) = handler.handle(message).await {
            error!("Bus handler for '{}' failed: {}", name, e);
        }
    }
}
