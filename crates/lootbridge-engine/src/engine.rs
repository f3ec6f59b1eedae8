//! The reconciliation engine: one pending pickup in, one decision out.
//!
//! # Cycle
//!
//! ```text
//! read slot ──(0,0)──→ Idle
//!     │
//!     ▼
//! decide ──Take──→ clear slot ──┐
//!     ├──Give──→ credit item ───┼──→ build message ──→ Reconciled
//!     └──Ignore─────────────────┘
//! ```
//!
//! Any source failure before the inventory is touched ends the cycle as
//! `Deferred`. The next poll reads the same slot again, so nothing is lost.

use lootbridge_inventory::Inventory;
use lootbridge_protocol::{ItemId, OutboundMessage, PendingPickup};
use tracing::Instrument;

use crate::{Decision, ModePolicy, PickupSource, SessionPolicy, SourceError};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// A pickup that went through the full cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// The slot contents as read at the start of the cycle.
    pub pickup: PendingPickup,
    /// What the policy decided.
    pub decision: Decision,
    /// The report for peers, built from the original ids.
    pub message: OutboundMessage,
}

/// Result of one [`ReconciliationEngine::reconcile`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The slot held the `(0, 0)` sentinel.
    Idle,
    /// The pickup was handled and produced a message.
    Reconciled(Reconciled),
    /// The source failed mid-cycle; nothing was mutated.
    Deferred(SourceError),
}

impl CycleOutcome {
    /// The outbound message, if this cycle produced one.
    pub fn message(&self) -> Option<&OutboundMessage> {
        match self {
            Self::Reconciled(r) => Some(&r.message),
            Self::Idle | Self::Deferred(_) => None,
        }
    }

    pub fn into_message(self) -> Option<OutboundMessage> {
        match self {
            Self::Reconciled(r) => Some(r.message),
            Self::Idle | Self::Deferred(_) => None,
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

/// Result of [`ReconciliationEngine::pass_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// The item took effect in the game and was credited.
    Applied,
    /// The player already holds the maximum; nothing to do.
    AlreadyMaxed,
    /// The reserved item id; dropped.
    Reserved,
    /// The game could not take the item right now; retry later.
    Deferred(SourceError),
}

impl PassOutcome {
    /// `true` unless the item has to be retried.
    pub fn is_done(&self) -> bool {
        !matches!(self, Self::Deferred(_))
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Reconciles pickups for one player.
///
/// The engine owns its source, its policy and its inventory outright.
/// Calls are expected to be serialized by a single driver (see
/// `lootbridge-session`); `&mut self` on every operation enforces that.
pub struct ReconciliationEngine<S: PickupSource> {
    source: S,
    policy: SessionPolicy,
    inventory: Inventory,
    span: tracing::Span,
}

impl<S: PickupSource> ReconciliationEngine<S> {
    /// Creates an engine logging under a span named after the policy.
    pub fn new(source: S, policy: SessionPolicy, inventory: Inventory) -> Self {
        let span = tracing::info_span!("reconcile", mode = %policy.mode());
        Self::with_span(source, policy, inventory, span)
    }

    /// Creates an engine that emits every log event inside `span`.
    ///
    /// Sessions pass a span carrying their player or world so that logs
    /// from several engines in one process stay distinguishable.
    pub fn with_span(
        source: S,
        policy: SessionPolicy,
        inventory: Inventory,
        span: tracing::Span,
    ) -> Self {
        Self {
            source,
            policy,
            inventory,
            span,
        }
    }

    /// Runs one reconcile cycle against the pending pickup slot.
    ///
    /// Never fails: source errors come back as [`CycleOutcome::Deferred`].
    pub async fn reconcile(&mut self) -> CycleOutcome {
        let span = self.span.clone();
        self.reconcile_inner().instrument(span).await
    }

    async fn reconcile_inner(&mut self) -> CycleOutcome {
        let pickup = match self.source.read_pending_pickup().await {
            Ok(pickup) => pickup,
            Err(err) => return defer("read pending pickup", err),
        };

        if pickup.is_empty() {
            tracing::trace!("no pending pickup");
            return CycleOutcome::Idle;
        }

        let PendingPickup {
            target_world,
            item_id,
        } = pickup;
        let decision = self.policy.decide(pickup, &self.inventory);

        match decision {
            Decision::Take => {
                if let Err(err) = self.source.clear_pending_pickup().await {
                    return defer("clear pending pickup", err);
                }
                tracing::debug!(%item_id, %target_world, "removed item addressed to another world");
            }
            Decision::Give => match self.inventory.give_item(item_id) {
                Ok(count) => {
                    tracing::debug!(%item_id, %target_world, count, "credited item to inventory");
                }
                Err(err) => {
                    // decide() already checked the cap; reaching this means
                    // the policy and the inventory disagree.
                    tracing::warn!(error = %err, "give decision rejected by inventory");
                }
            },
            Decision::Ignore => {
                tracing::debug!(
                    %item_id,
                    %target_world,
                    "item already maxed, leaving pickup in place"
                );
            }
        }

        let message = self.policy.build_message(item_id, target_world);
        CycleOutcome::Reconciled(Reconciled {
            pickup,
            decision,
            message,
        })
    }

    /// Applies an item received from a peer.
    ///
    /// The game effect is applied first and the inventory only credited
    /// once that succeeded, so a title-screen failure leaves no trace.
    pub async fn pass_item(&mut self, item: ItemId) -> PassOutcome {
        let span = self.span.clone();
        self.pass_item_inner(item).instrument(span).await
    }

    async fn pass_item_inner(&mut self, item: ItemId) -> PassOutcome {
        if item.is_reserved() {
            tracing::debug!("dropping incoming item with reserved id");
            return PassOutcome::Reserved;
        }
        if self.inventory.item_maxed(item) {
            tracing::trace!(%item, "incoming item already maxed");
            return PassOutcome::AlreadyMaxed;
        }

        if let Err(err) = self.source.apply_item_effect(item).await {
            if err.is_transient() {
                tracing::debug!(%item, error = %err, "game not ready for incoming item");
            } else {
                tracing::warn!(%item, error = %err, "failed to apply incoming item");
            }
            return PassOutcome::Deferred(err);
        }

        match self.inventory.give_item(item) {
            Ok(count) => tracing::debug!(%item, count, "incoming item applied"),
            Err(err) => tracing::warn!(error = %err, "incoming item applied past cap"),
        }
        PassOutcome::Applied
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn span(&self) -> &tracing::Span {
        &self.span
    }
}

fn defer(step: &'static str, err: SourceError) -> CycleOutcome {
    if err.is_transient() {
        tracing::debug!(step, error = %err, "cycle deferred");
    } else {
        tracing::warn!(step, error = %err, "cycle deferred");
    }
    CycleOutcome::Deferred(err)
}
