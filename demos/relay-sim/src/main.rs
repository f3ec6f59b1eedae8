//! Two simulated Multiworld players sharing items over in-process channels.
//!
//! Each player's game is a `MemorySource`. A scripted "player" task keeps
//! opening chests with random items for random worlds; a router task plays
//! the network and delivers every forwarded item to the world it names.
//!
//! Run with `RUST_LOG=debug cargo run -p relay-sim` to watch every cycle.

use std::time::Duration;

use lootbridge::prelude::*;
use rand::Rng;
use tokio::sync::mpsc;

const WORLDS: [WorldId; 2] = [WorldId(1), WorldId(2)];
const ITEM_POOL: std::ops::RangeInclusive<u32> = 1..=12;
const RUN_FOR: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const CHEST_EVERY: Duration = Duration::from_millis(300);

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

fn item_caps() -> ItemCaps {
    // Odd items are unique upgrades, even items stack up to 3.
    ITEM_POOL
        .map(|i| (ItemId(i), if i % 2 == 1 { 1 } else { 3 }))
        .collect()
}

fn session_config(world: WorldId) -> SessionConfig {
    SessionConfig {
        mode: GameMode::Multiworld,
        world_id: world,
        player_name: format!("player-{}", world.0),
        poll_interval_ms: POLL_INTERVAL.as_millis() as u64,
        poll_jitter_ms: 20,
        attach_retry_ms: 250,
        max_attach_attempts: 10,
        item_caps: item_caps(),
    }
}

/// Opens a chest every so often while the slot is free.
///
/// Items for the player's own world stay in the slot after the session
/// credits them; the game consumes them itself about one poll later.
async fn play(world: WorldId, game: MemorySource, mut shutdown: ShutdownSignal) {
    let mut chests = tokio::time::interval(CHEST_EVERY);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = chests.tick() => {
                if !game.pending().is_empty() {
                    continue;
                }
                let pickup = {
                    let mut rng = rand::rng();
                    let item = ItemId(rng.random_range(ITEM_POOL));
                    let target = WORLDS[rng.random_range(0..WORLDS.len())];
                    PendingPickup::new(target, item)
                };
                game.set_pending(pickup);

                if pickup.target_world == world {
                    tokio::time::sleep(POLL_INTERVAL).await;
                    if game.pending() == pickup {
                        game.set_pending(PendingPickup::EMPTY);
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

async fn route(
    mut outbound: mpsc::UnboundedReceiver<OutboundMessage>,
    peers: Vec<(WorldId, OutboundSender)>,
    mut shutdown: ShutdownSignal,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            Some(msg) = outbound.recv() => {
                let OutboundMessage::Multiworld(mw) = &msg else {
                    continue;
                };
                let (source, target) = (mw.source_player_world_id, mw.target_player_world_id);
                if source == target {
                    tracing::info!(world = %source, item = %mw.item_id, "kept own item");
                    continue;
                }
                match peers.iter().find(|(world, _)| *world == target) {
                    Some((_, tx)) => {
                        tracing::info!(from = %source, to = %target, item = %mw.item_id, "relaying item");
                        let _ = tx.send(msg);
                    }
                    None => tracing::warn!(to = %target, "no session for world"),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    lootbridge::init_tracing("info");

    let (handle, signal) = shutdown_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel();

    let mut peers = Vec::new();
    let mut sessions = Vec::new();
    let mut players = Vec::new();

    for (i, world) in WORLDS.into_iter().enumerate() {
        // The second game "starts late" to show attach retries.
        let game = if i == 0 {
            MemorySource::attached()
        } else {
            MemorySource::refusing_attach(3)
        };
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        peers.push((world, in_tx));

        let mut session = GameConnection::new(game.clone(), session_config(world))?
            .with_outbound(out_tx.clone())
            .with_inbound(in_rx);
        let session_signal = signal.clone();
        sessions.push(tokio::spawn(async move {
            let result = session.run(session_signal).await;
            (world, session.inventory().snapshot(), result)
        }));
        players.push(tokio::spawn(play(world, game, handle.subscribe())));
    }
    drop(out_tx);

    let router = tokio::spawn(route(out_rx, peers, handle.subscribe()));

    tokio::select! {
        _ = tokio::time::sleep(RUN_FOR) => tracing::info!("simulation finished"),
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
    }
    handle.shutdown();

    for session in sessions {
        let (world, snapshot, result) = session.await?;
        if let Err(e) = result {
            tracing::error!(%world, error = %e, "session failed");
        }
        let held: Vec<String> = snapshot
            .counts
            .iter()
            .map(|(item, count)| format!("{item}x{count}"))
            .collect();
        tracing::info!(%world, items = %held.join(" "), "final inventory");
    }
    for player in players {
        player.await?;
    }
    router.await?;

    Ok(())
}
