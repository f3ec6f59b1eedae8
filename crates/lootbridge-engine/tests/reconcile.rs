//! Integration tests for the reconcile cycle, driven through a scripted
//! `MemorySource`.

use lootbridge_engine::{
    CycleOutcome, Decision, GameMode, MemorySource, PassOutcome, ReconciliationEngine,
    SessionPolicy, SourceError,
};
use lootbridge_inventory::{Inventory, ItemCaps};
use lootbridge_protocol::{ItemId, OutboundMessage, PendingPickup, WorldId};

// =========================================================================
// Helpers
// =========================================================================

const LOCAL: WorldId = WorldId(1);
const OTHER: WorldId = WorldId(2);

fn single_copy_caps() -> ItemCaps {
    (1..=50).map(|i| (ItemId(i), 1)).collect()
}

fn coop_engine(source: MemorySource) -> ReconciliationEngine<MemorySource> {
    ReconciliationEngine::new(
        source,
        SessionPolicy::new(GameMode::Coop, LOCAL, "Alice"),
        Inventory::new(single_copy_caps()),
    )
}

fn multiworld_engine(source: MemorySource) -> ReconciliationEngine<MemorySource> {
    ReconciliationEngine::new(
        source,
        SessionPolicy::new(GameMode::Multiworld, LOCAL, "Alice"),
        Inventory::new(single_copy_caps()),
    )
}

fn expect_reconciled(outcome: CycleOutcome) -> lootbridge_engine::Reconciled {
    match outcome {
        CycleOutcome::Reconciled(r) => r,
        other => panic!("expected Reconciled, got {other:?}"),
    }
}

// =========================================================================
// Sentinel
// =========================================================================

#[tokio::test]
async fn test_reconcile_sentinel_is_idle_without_mutation() {
    let source = MemorySource::attached();
    let mut engine = multiworld_engine(source.clone());

    let outcome = engine.reconcile().await;

    assert_eq!(outcome, CycleOutcome::Idle);
    assert!(outcome.message().is_none());
    assert!(engine.inventory().is_empty());
    assert_eq!(source.clear_count(), 0);
}

#[tokio::test]
async fn test_reconcile_sentinel_repeated_stays_idle() {
    let source = MemorySource::attached();
    let mut engine = coop_engine(source.clone());

    for _ in 0..5 {
        assert_eq!(engine.reconcile().await, CycleOutcome::Idle);
    }
    assert!(engine.inventory().is_empty());
}

// =========================================================================
// Coop
// =========================================================================

#[tokio::test]
async fn test_reconcile_coop_not_maxed_credits_once() {
    let source = MemorySource::attached();
    source.set_pending(PendingPickup::new(OTHER, ItemId(3)));
    let mut engine = coop_engine(source.clone());

    let r = expect_reconciled(engine.reconcile().await);

    assert_eq!(r.decision, Decision::Give);
    assert_eq!(engine.inventory().count(ItemId(3)), 1);
    assert_eq!(source.clear_count(), 0, "coop never clears the slot");
}

#[tokio::test]
async fn test_reconcile_coop_repoll_reports_again_without_crediting() {
    // Alice picks up item 7 (capped at one copy). The game has not cleared
    // the slot by the next poll, so the same pickup is read twice.
    let source = MemorySource::attached();
    source.set_pending(PendingPickup::new(LOCAL, ItemId(7)));
    let mut engine = coop_engine(source.clone());

    let first = expect_reconciled(engine.reconcile().await);
    assert_eq!(engine.inventory().count(ItemId(7)), 1);
    assert_eq!(first.message, OutboundMessage::coop("Alice", ItemId(7)));

    let second = expect_reconciled(engine.reconcile().await);
    assert_eq!(second.decision, Decision::Ignore);
    assert_eq!(engine.inventory().count(ItemId(7)), 1);
    assert_eq!(
        second.message,
        OutboundMessage::coop("Alice", ItemId(7)),
        "duplicates are still reported; peers deduplicate"
    );
}

// =========================================================================
// Multiworld
// =========================================================================

#[tokio::test]
async fn test_reconcile_multiworld_local_item_gives_without_clear() {
    let source = MemorySource::attached();
    source.set_pending(PendingPickup::new(LOCAL, ItemId(12)));
    let mut engine = multiworld_engine(source.clone());

    let r = expect_reconciled(engine.reconcile().await);

    assert_eq!(r.decision, Decision::Give);
    assert_eq!(engine.inventory().count(ItemId(12)), 1);
    assert_eq!(source.clear_count(), 0);
    assert_eq!(
        r.message,
        OutboundMessage::multiworld(LOCAL, LOCAL, ItemId(12))
    );
}

#[tokio::test]
async fn test_reconcile_multiworld_foreign_item_takes_and_clears_once() {
    let source = MemorySource::attached();
    source.set_pending(PendingPickup::new(OTHER, ItemId(12)));
    let mut engine = multiworld_engine(source.clone());

    let r = expect_reconciled(engine.reconcile().await);

    assert_eq!(r.decision, Decision::Take);
    assert!(engine.inventory().is_empty());
    assert_eq!(source.clear_count(), 1);
    assert_eq!(source.pending(), PendingPickup::EMPTY);
    assert_eq!(r.message.item_id(), ItemId(12));
    assert_eq!(r.message.target_world(), Some(OTHER));

    // The slot is empty now, so the next poll is idle.
    assert_eq!(engine.reconcile().await, CycleOutcome::Idle);
    assert_eq!(source.clear_count(), 1);
}

#[tokio::test]
async fn test_reconcile_multiworld_maxed_foreign_item_is_left_pending() {
    // Pins the current behaviour: an item that is maxed locally and
    // addressed elsewhere is neither cleared nor credited, yet reported.
    let source = MemorySource::attached();
    let mut engine = multiworld_engine(source.clone());
    source.set_pending(PendingPickup::new(LOCAL, ItemId(9)));
    expect_reconciled(engine.reconcile().await);
    assert!(engine.inventory().item_maxed(ItemId(9)));

    source.set_pending(PendingPickup::new(OTHER, ItemId(9)));
    let r = expect_reconciled(engine.reconcile().await);

    assert_eq!(r.decision, Decision::Ignore);
    assert_eq!(source.clear_count(), 0);
    assert_eq!(source.pending(), PendingPickup::new(OTHER, ItemId(9)));
    assert_eq!(engine.inventory().count(ItemId(9)), 1);
    assert_eq!(r.message, OutboundMessage::multiworld(LOCAL, OTHER, ItemId(9)));
}

// =========================================================================
// Failures
// =========================================================================

#[tokio::test]
async fn test_reconcile_transient_read_failure_defers() {
    let source = MemorySource::attached();
    source.set_pending(PendingPickup::new(LOCAL, ItemId(4)));
    source.fail_next_read(SourceError::TransientState("menu".into()));
    let mut engine = multiworld_engine(source.clone());

    let outcome = engine.reconcile().await;

    assert!(outcome.is_deferred());
    assert!(engine.inventory().is_empty());

    // Retried on the next poll.
    let r = expect_reconciled(engine.reconcile().await);
    assert_eq!(r.decision, Decision::Give);
    assert_eq!(engine.inventory().count(ItemId(4)), 1);
}

#[tokio::test]
async fn test_reconcile_failed_clear_defers_and_retries() {
    let source = MemorySource::attached();
    source.set_pending(PendingPickup::new(OTHER, ItemId(4)));
    source.fail_next_clear(SourceError::TransientState("loading".into()));
    let mut engine = multiworld_engine(source.clone());

    assert!(engine.reconcile().await.is_deferred());
    assert_eq!(source.clear_count(), 0);

    let r = expect_reconciled(engine.reconcile().await);
    assert_eq!(r.decision, Decision::Take);
    assert_eq!(source.clear_count(), 1);
}

#[tokio::test]
async fn test_reconcile_detached_source_defers() {
    let source = MemorySource::default();
    let mut engine = coop_engine(source);

    let outcome = engine.reconcile().await;

    assert!(matches!(
        outcome,
        CycleOutcome::Deferred(SourceError::Detached(_))
    ));
}

// =========================================================================
// pass_item()
// =========================================================================

#[tokio::test]
async fn test_pass_item_applies_and_credits() {
    let source = MemorySource::attached();
    let mut engine = multiworld_engine(source.clone());

    assert_eq!(engine.pass_item(ItemId(20)).await, PassOutcome::Applied);

    assert_eq!(source.applied_items(), vec![ItemId(20)]);
    assert_eq!(engine.inventory().count(ItemId(20)), 1);
}

#[tokio::test]
async fn test_pass_item_title_screen_defers_without_mutation() {
    let source = MemorySource::attached();
    source.set_title_screen(true);
    let mut engine = multiworld_engine(source.clone());

    let outcome = engine.pass_item(ItemId(20)).await;

    assert!(matches!(
        outcome,
        PassOutcome::Deferred(SourceError::TransientState(_))
    ));
    assert!(!outcome.is_done());
    assert!(engine.inventory().is_empty());
    assert!(source.applied_items().is_empty());
}

#[tokio::test]
async fn test_pass_item_maxed_is_done_without_applying() {
    let source = MemorySource::attached();
    let mut engine = multiworld_engine(source.clone());
    engine.pass_item(ItemId(20)).await;

    let outcome = engine.pass_item(ItemId(20)).await;

    assert_eq!(outcome, PassOutcome::AlreadyMaxed);
    assert!(outcome.is_done());
    assert_eq!(source.applied_items().len(), 1);
}

#[tokio::test]
async fn test_pass_item_reserved_id_is_dropped() {
    let source = MemorySource::attached();
    let mut engine = coop_engine(source.clone());

    assert_eq!(engine.pass_item(ItemId(0)).await, PassOutcome::Reserved);
    assert!(source.applied_items().is_empty());
}
