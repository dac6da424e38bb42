//! Service state wiring
//!
//! Builds the collaborator set and the lifecycle on top of it, and registers
//! the background sweeper. Embedding services (HTTP layer, message bus)
//! receive a [`ServerState`] and drive [`OrderLifecycle`] directly.

use super::config::Config;
use super::tasks::{BackgroundTasks, TaskKind};
use crate::cart::{CartSource, MemoryCart};
use crate::lifecycle::{OrderLifecycle, TimeoutSweeper};
use crate::notify::NotificationSink;
use crate::payment::{PaymentGateway, StubGateway};
use crate::store::{MemoryOrderStore, OrderStore};
use std::sync::Arc;

/// Shared service state.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: Arc<dyn OrderStore>,
    pub cart: Arc<dyn CartSource>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub sink: NotificationSink,
    pub lifecycle: Arc<OrderLifecycle>,
}

impl ServerState {
    /// Wire the default collaborators: in-memory store and cart, stub
    /// gateway. Production embeddings swap these via
    /// [`ServerState::with_collaborators`].
    pub fn initialize(config: &Config) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(MemoryOrderStore::new()),
            Arc::new(MemoryCart::new()),
            Arc::new(StubGateway::new()),
        )
    }

    /// Wire the state around externally provided collaborators.
    pub fn with_collaborators(
        config: &Config,
        store: Arc<dyn OrderStore>,
        cart: Arc<dyn CartSource>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let sink = NotificationSink::new();
        let lifecycle = Arc::new(OrderLifecycle::new(
            store.clone(),
            cart.clone(),
            gateway.clone(),
            sink.clone(),
            config.lifecycle(),
        ));
        tracing::info!(environment = %config.environment, "Server state initialized");
        Self {
            config: config.clone(),
            store,
            cart,
            gateway,
            sink,
            lifecycle,
        }
    }

    /// Register the recurring background work (currently the timeout sweep).
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let sweeper = TimeoutSweeper::new(
            self.store.clone(),
            self.config.sweep(),
            tasks.shutdown_token(),
        );
        tasks.spawn("timeout_sweeper", TaskKind::Periodic, sweeper.run());
    }
}
