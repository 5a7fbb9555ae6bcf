//! Mole Rush Simulator
//!
//! Drives the deterministic game core through a scripted round, then
//! replays the recorded input trace to verify determinism. Pass a path
//! argument to also save the recorded trace as JSON.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mole_rush::{
    game::{
        events::{GameEvent, GameEventData},
        input::InputTrace,
        tick::{replay, GameConfig, ReactionGame},
    },
    TICK_RATE, VERSION,
};

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Mole Rush Core v{}", VERSION);
    info!("Hardware tick rate: {} Hz", TICK_RATE);

    demo_round()
}

/// Demo function to test the simulation.
fn demo_round() -> Result<()> {
    info!("=== Starting Demo Round ===");

    // Simulator pace rather than board pace, so the log stays readable:
    // 4-tick debounce, 10k-tick rounds, 400-tick penalties, 250-tick blink
    let config = GameConfig::new(4, 10_000, 400, 250)?;
    let mut game = ReactionGame::new(config.clone());
    let mut trace = InputTrace::new(game.seed);

    info!("Generator seed: {:#06x}", game.seed);

    let mut total_events = 0;

    // First ticks arm the first mole
    total_events += idle(&mut game, &mut trace, 4);

    // Whack three moles in a row
    for _ in 0..3 {
        let target = game
            .current_frame()
            .lit_segment()
            .expect("a mole is up while playing");
        info!("Mole up on segment {}", target);
        total_events += press(&mut game, &mut trace, target);
    }
    info!("Score after three hits: {}", game.score());

    // Channel 7 is never a target, so slapping it draws a penalty
    total_events += press(&mut game, &mut trace, 7);

    // The offender stays masked while the penalty runs
    total_events += press(&mut game, &mut trace, 7);

    // A clean hit lands even while channel 7 is locked out, and arming the
    // next mole resets the penalty slot
    let target = game
        .current_frame()
        .lit_segment()
        .expect("a mole is up while playing");
    total_events += press(&mut game, &mut trace, target);

    // Another wrong press, left to expire on its own this time
    total_events += press(&mut game, &mut trace, 7);
    total_events += idle(&mut game, &mut trace, 400);

    // Let the round clock run out
    info!("Waiting out the round timer...");
    loop {
        trace.record(game.tick, 0);
        let output = game.advance(0);
        total_events += report(&output.events);
        if output.round_ended {
            break;
        }
    }
    let frame = game.current_frame();
    info!(
        "Game over at tick {}: score {} (segments {:#09b}, dp {})",
        game.tick,
        game.score(),
        frame.segments,
        frame.dp
    );

    // The start button brings the board back to a fresh round
    total_events += press(&mut game, &mut trace, 0);
    let target = game
        .current_frame()
        .lit_segment()
        .expect("a mole is up while playing");
    info!("New round, mole up on segment {}", target);
    total_events += press(&mut game, &mut trace, target);

    trace.finalize(game.tick - 1);

    // Print final results
    info!("=== Round Results ===");
    info!("Ticks simulated: {}", game.tick);
    info!("Total events: {}", total_events);
    info!(
        "Input trace: {} edges ({} bytes estimated)",
        trace.delta_count(),
        trace.estimated_size()
    );
    info!("Trace content hash: {}", hex::encode(trace.content_hash()));

    let live_hash = game.state_hash();
    info!("Final State Hash: {}", hex::encode(live_hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay(&trace, &config);
    let replay_hash = replayed.state_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if live_hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        info!("DETERMINISM FAILURE: Hashes differ!");
    }

    if let Some(path) = std::env::args().nth(1) {
        std::fs::write(&path, serde_json::to_string_pretty(&trace)?)?;
        info!("Trace written to {}", path);
    }

    Ok(())
}

/// Advance one recorded tick with the bus idle.
fn idle(game: &mut ReactionGame, trace: &mut InputTrace, ticks: u32) -> usize {
    let mut logged = 0;
    for _ in 0..ticks {
        trace.record(game.tick, 0);
        logged += report(&game.advance(0).events);
    }
    logged
}

/// Hold one channel down long enough to clear the debounce window, then
/// release it long enough to register the fall.
fn press(game: &mut ReactionGame, trace: &mut InputTrace, channel: u8) -> usize {
    let hold = u32::from(game.config().debounce_ticks) + 2;
    let mut logged = 0;
    for _ in 0..hold {
        trace.record(game.tick, 1 << channel);
        logged += report(&game.advance(1 << channel).events);
    }
    for _ in 0..hold {
        trace.record(game.tick, 0);
        logged += report(&game.advance(0).events);
    }
    logged
}

/// Log every event from one tick, returning how many there were.
fn report(events: &[GameEvent]) -> usize {
    for event in events {
        match &event.data {
            GameEventData::TargetArmed { target, .. } => {
                info!("Tick {}: mole armed on segment {}", event.tick, target);
            }
            GameEventData::TargetHit { channel, new_score } => {
                info!(
                    "Tick {}: hit on channel {}, score {}",
                    event.tick, channel, new_score
                );
            }
            GameEventData::LockoutStarted {
                channels,
                duration_ticks,
            } => {
                info!(
                    "Tick {}: wrong press, channels {:#010b} locked for {} ticks",
                    event.tick, channels, duration_ticks
                );
            }
            GameEventData::LockoutCleared { channels } => {
                info!(
                    "Tick {}: lockout cleared on channels {:#010b}",
                    event.tick, channels
                );
            }
            GameEventData::RoundEnded { final_score } => {
                info!("Tick {}: round over, final score {}", event.tick, final_score);
            }
            GameEventData::RoundStarted => {
                info!("Tick {}: round restarted", event.tick);
            }
        }
    }
    events.len()
}
