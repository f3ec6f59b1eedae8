//! Two Multiworld sessions wired together through in-process channels.

use std::time::Duration;

use lootbridge::prelude::*;
use tokio::sync::mpsc;

const FIRST: WorldId = WorldId(1);
const SECOND: WorldId = WorldId(2);
const BOW: ItemId = ItemId(5);

fn config(world: WorldId) -> SessionConfig {
    SessionConfig {
        mode: GameMode::Multiworld,
        world_id: world,
        poll_interval_ms: 100,
        item_caps: ItemCaps::new().with(BOW, 1),
        ..SessionConfig::default()
    }
}

/// Delivers each Multiworld message to the world it names. Messages a
/// world addressed to itself were already credited locally.
async fn route(
    mut rx: mpsc::UnboundedReceiver<OutboundMessage>,
    peers: Vec<(WorldId, OutboundSender)>,
    mut shutdown: ShutdownSignal,
) -> usize {
    let mut delivered = 0;
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return delivered,
            Some(msg) = rx.recv() => {
                let OutboundMessage::Multiworld(mw) = &msg else { continue };
                if mw.source_player_world_id == mw.target_player_world_id {
                    continue;
                }
                let target = mw.target_player_world_id;
                if let Some((_, tx)) = peers.iter().find(|(world, _)| *world == target) {
                    let _ = tx.send(msg);
                    delivered += 1;
                }
            }
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_taken_item_reaches_its_world() {
    let first_game = MemorySource::attached();
    let second_game = MemorySource::attached();
    first_game.set_pending(PendingPickup::new(SECOND, BOW));

    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (first_in_tx, first_in_rx) = mpsc::unbounded_channel();
    let (second_in_tx, second_in_rx) = mpsc::unbounded_channel();

    let mut first = GameConnection::new(first_game.clone(), config(FIRST))
        .unwrap()
        .with_outbound(out_tx.clone())
        .with_inbound(first_in_rx);
    let mut second = GameConnection::new(second_game.clone(), config(SECOND))
        .unwrap()
        .with_outbound(out_tx)
        .with_inbound(second_in_rx);

    let (handle, signal) = shutdown_channel();
    let router_signal = handle.subscribe();
    let peers = vec![(FIRST, first_in_tx), (SECOND, second_in_tx)];

    let (first_result, second_result, delivered, ()) = tokio::join!(
        first.run(signal.clone()),
        second.run(signal),
        route(out_rx, peers, router_signal),
        async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            handle.shutdown();
        },
    );

    first_result.unwrap();
    second_result.unwrap();
    assert_eq!(delivered, 1);

    // The first world gave the bow away without keeping it...
    assert!(first_game.pending().is_empty());
    assert_eq!(first.inventory().count(BOW), 0);
    // ...and the second world received it.
    assert_eq!(second_game.applied_items(), vec![BOW]);
    assert_eq!(second.inventory().count(BOW), 1);
}

#[tokio::test(start_paused = true)]
async fn test_local_item_is_kept_and_not_forwarded() {
    let game = MemorySource::attached();
    game.set_pending(PendingPickup::new(FIRST, BOW));

    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let mut session = GameConnection::new(game.clone(), config(FIRST))
        .unwrap()
        .with_outbound(out_tx);

    session.poll_once().await;

    assert_eq!(session.inventory().count(BOW), 1);
    assert_eq!(
        out_rx.try_recv().unwrap(),
        OutboundMessage::multiworld(FIRST, FIRST, BOW)
    );
    // A give leaves the slot for the game to consume.
    assert_eq!(game.clear_count(), 0);
}
