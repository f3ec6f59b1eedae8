//! A running player session: attach, poll, queue.
//!
//! `GameConnection` owns the engine and the poll scheduler. It is driven by
//! a single task, so none of its state needs locking; the network side
//! talks to it through the queue methods or the optional outbound channel.

use std::collections::VecDeque;

use lootbridge_engine::{
    CycleOutcome, PassOutcome, PickupSource, ReconciliationEngine, SessionPolicy, SourceError,
};
use lootbridge_inventory::{Inventory, InventorySnapshot};
use lootbridge_poll::PollScheduler;
use lootbridge_protocol::OutboundMessage;
use tokio::sync::mpsc;

use crate::{SessionConfig, SessionError, ShutdownSignal};

/// Channel the session forwards outbound messages into.
pub type OutboundSender = mpsc::UnboundedSender<OutboundMessage>;

/// Channel peers' items arrive on while [`GameConnection::run`] is active.
pub type InboundReceiver = mpsc::UnboundedReceiver<OutboundMessage>;

/// One player's session around a [`PickupSource`].
pub struct GameConnection<S: PickupSource> {
    engine: ReconciliationEngine<S>,
    scheduler: PollScheduler,
    config: SessionConfig,
    /// Reconciled messages the network has not picked up yet.
    items_to_send: Vec<OutboundMessage>,
    /// Items from peers waiting to be applied to the local game.
    items_to_process: VecDeque<OutboundMessage>,
    outbound: Option<OutboundSender>,
    inbound: Option<InboundReceiver>,
}

impl<S: PickupSource> GameConnection<S> {
    /// Builds a session with an empty inventory.
    ///
    /// # Errors
    /// [`SessionError::Config`] if the config fails validation.
    pub fn new(source: S, config: SessionConfig) -> Result<Self, SessionError> {
        let inventory = Inventory::new(config.item_caps.clone());
        Self::build(source, config, inventory)
    }

    /// Builds a session whose inventory is restored from `snapshot`.
    ///
    /// # Errors
    /// [`SessionError::Inventory`] if the snapshot exceeds a cap, plus the
    /// errors of [`new`](Self::new).
    pub fn restore(
        source: S,
        config: SessionConfig,
        snapshot: InventorySnapshot,
    ) -> Result<Self, SessionError> {
        let inventory = Inventory::from_snapshot(snapshot, config.item_caps.clone())?;
        Self::build(source, config, inventory)
    }

    fn build(source: S, config: SessionConfig, inventory: Inventory) -> Result<Self, SessionError> {
        let config = config.validated()?;
        let policy = SessionPolicy::new(config.mode, config.world_id, config.player_name.clone());
        let span = tracing::info_span!(
            "session",
            mode = %config.mode,
            world = %config.world_id,
            player = %config.player_name,
        );
        let engine = ReconciliationEngine::with_span(source, policy, inventory, span);
        let scheduler = PollScheduler::new(config.poll_config());

        Ok(Self {
            engine,
            scheduler,
            config,
            items_to_send: Vec::new(),
            items_to_process: VecDeque::new(),
            outbound: None,
            inbound: None,
        })
    }

    /// Forwards every reconciled message into `tx` instead of keeping it
    /// queued.
    pub fn with_outbound(mut self, tx: OutboundSender) -> Self {
        self.outbound = Some(tx);
        self
    }

    /// Queues every message received on `rx` for processing. Only read
    /// while [`run`](Self::run) is active; otherwise use
    /// [`push_item_to_process`](Self::push_item_to_process).
    pub fn with_inbound(mut self, rx: InboundReceiver) -> Self {
        self.inbound = Some(rx);
        self
    }

    // -----------------------------------------------------------------
    // Attaching
    // -----------------------------------------------------------------

    /// Attaches to the game, retrying every `attach_retry_ms`.
    ///
    /// Returns as soon as the source reports itself attached.
    ///
    /// # Errors
    /// [`SessionError::AttachFailed`] after `max_attach_attempts` failed
    /// attempts (never, if that is 0).
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        let max = self.config.max_attach_attempts;
        let mut attempts = 0u32;
        let mut last_error = SourceError::Detached("never attached".into());

        loop {
            if self.engine.source().is_attached().await {
                tracing::info!(attempts, "pickup source attached");
                return Ok(());
            }
            if max > 0 && attempts >= max {
                tracing::error!(attempts, error = %last_error, "giving up on pickup source");
                return Err(SessionError::AttachFailed {
                    attempts,
                    last_error,
                });
            }

            attempts += 1;
            match self.engine.source_mut().attach().await {
                Ok(()) if self.engine.source().is_attached().await => {
                    tracing::info!(attempts, "pickup source attached");
                    return Ok(());
                }
                Ok(()) => {
                    tracing::warn!(attempt = attempts, "attach returned but source still detached");
                }
                Err(err) => {
                    tracing::warn!(attempt = attempts, error = %err, "attach failed, retrying");
                    last_error = err;
                }
            }
            tokio::time::sleep(self.config.attach_retry()).await;
        }
    }

    // -----------------------------------------------------------------
    // Polling
    // -----------------------------------------------------------------

    /// Runs one full poll: applies queued peer items, then reconciles the
    /// pending pickup and queues the resulting message.
    pub async fn poll_once(&mut self) -> CycleOutcome {
        self.process_items().await;

        let outcome = self.engine.reconcile().await;
        if let Some(msg) = outcome.message() {
            self.items_to_send.push(msg.clone());
            self.flush_outbound();
        }
        outcome
    }

    /// Attaches, then polls on the configured interval until `shutdown`
    /// fires.
    ///
    /// A source that drops its hook mid-session is re-attached with the
    /// same retry rules as the initial attach.
    ///
    /// # Errors
    /// Only attach failures end the loop with an error.
    pub async fn run(&mut self, mut shutdown: ShutdownSignal) -> Result<(), SessionError> {
        tokio::select! {
            result = self.connect() => result?,
            _ = shutdown.cancelled() => return Ok(()),
        }

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!(polls = self.scheduler.poll_count(), "session shutting down");
                    return Ok(());
                }
                msg = recv_inbound(&mut self.inbound) => match msg {
                    Some(msg) => self.push_item_to_process(msg),
                    None => {
                        tracing::debug!("inbound channel closed");
                        self.inbound = None;
                    }
                },
                _ = self.scheduler.wait_for_poll() => {
                    let outcome = self.poll_once().await;
                    self.scheduler.record_poll_end();

                    if matches!(outcome, CycleOutcome::Deferred(SourceError::Detached(_))) {
                        tracing::warn!("pickup source detached, reattaching");
                        tokio::select! {
                            result = self.connect() => result?,
                            _ = shutdown.cancelled() => return Ok(()),
                        }
                    }
                }
            }
        }
    }

    // -----------------------------------------------------------------
    // Inbound queue
    // -----------------------------------------------------------------

    /// Queues an item received from a peer.
    pub fn push_item_to_process(&mut self, msg: OutboundMessage) {
        self.items_to_process.push_back(msg);
    }

    /// Applies queued peer items in arrival order.
    ///
    /// Stops at the first item the game cannot take yet; it and everything
    /// behind it stay queued for the next poll.
    pub async fn process_items(&mut self) {
        while let Some(msg) = self.items_to_process.front() {
            let item = msg.item_id();
            match self.engine.pass_item(item).await {
                PassOutcome::Deferred(_) => break,
                PassOutcome::Applied | PassOutcome::AlreadyMaxed | PassOutcome::Reserved => {
                    self.items_to_process.pop_front();
                }
            }
        }
    }

    pub fn items_to_process(&self) -> impl Iterator<Item = &OutboundMessage> {
        self.items_to_process.iter()
    }

    // -----------------------------------------------------------------
    // Outbound queue
    // -----------------------------------------------------------------

    /// Messages waiting for the network.
    pub fn items_to_send(&self) -> &[OutboundMessage] {
        &self.items_to_send
    }

    /// Removes the first queued message equal to `msg`, typically after the
    /// network confirmed delivery. Returns `false` if none matched.
    pub fn remove_item_to_send(&mut self, msg: &OutboundMessage) -> bool {
        match self.items_to_send.iter().position(|queued| queued == msg) {
            Some(index) => {
                self.items_to_send.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drains every queued message.
    pub fn take_items_to_send(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.items_to_send)
    }

    fn flush_outbound(&mut self) {
        let Some(tx) = &self.outbound else {
            return;
        };
        if tx.is_closed() {
            tracing::warn!("outbound receiver dropped, keeping messages queued");
            self.outbound = None;
            return;
        }
        for msg in self.items_to_send.drain(..) {
            // Only fails if the receiver vanished mid-drain.
            let _ = tx.send(msg);
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn engine(&self) -> &ReconciliationEngine<S> {
        &self.engine
    }

    pub fn inventory(&self) -> &Inventory {
        self.engine.inventory()
    }

    pub fn scheduler(&self) -> &PollScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

async fn recv_inbound(inbound: &mut Option<InboundReceiver>) -> Option<OutboundMessage> {
    match inbound {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
