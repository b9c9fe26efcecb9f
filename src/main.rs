//! Demo frame loop: a scripted detection source drives a full match from registration to the
//! mutual stop sign.
//!
//! The real application would put a webcam and a sign classifier where the scripted source sits;
//! the handoff shape is the same: the source produces one complete, immutable [`SignsById`] per
//! frame on its own worker, and all match state is mutated on this thread only.

use std::time::{Duration, Instant};

use pawawwewism::{promise, Promise, Worker};

use janken::detection::{signs_from_labels, SignsById};
use janken::game::{Match, Phase};

/// One segment of the scripted session: who is visible and what they show until `until` elapsed.
struct Scene {
    until: f32,
    hands: &'static [(u64, &'static str)],
}

const SCRIPT: &[Scene] = &[
    // Two hands wander in and register by holding Ok.
    Scene { until: 1.0, hands: &[(10, "Ok")] },
    Scene { until: 4.0, hands: &[(10, "Ok"), (11, "Ok")] },
    // Round one: Rock beats Scissor.
    Scene { until: 7.0, hands: &[(10, "Rock"), (11, "Scissor")] },
    // Round two: a tie, with a brief wobble from player 2.
    Scene { until: 7.5, hands: &[(10, "Paper"), (11, "Rock")] },
    Scene { until: 11.0, hands: &[(10, "Paper"), (11, "Paper")] },
    // Round three: Scissor loses to Rock.
    Scene { until: 14.0, hands: &[(10, "Scissor"), (11, "Rock")] },
    // Both players call it a day.
    Scene { until: 17.5, hands: &[(10, "Stop"), (11, "Stop")] },
];

fn scripted_frame(t: Duration) -> SignsById {
    let secs = t.as_secs_f32();
    let scene = SCRIPT.iter().find(|scene| secs < scene.until);
    match scene {
        Some(scene) => signs_from_labels(scene.hands.iter().copied()),
        None => SignsById::new(),
    }
}

fn main() -> anyhow::Result<()> {
    janken::init_logger!();

    let mut source = Worker::builder().name("detection source").spawn(
        move |(t, promise): (Duration, Promise<SignsById>)| {
            promise.fulfill(scripted_frame(t));
        },
    )?;

    let start = Instant::now();
    let mut game = Match::new(start);
    let mut help_visible = false;

    let step = Duration::from_millis(100);
    let end = Duration::from_secs_f32(SCRIPT.last().map(|scene| scene.until).unwrap_or(0.0));

    let mut last_phase = game.phase();
    let mut last_result = String::new();

    let mut t = Duration::ZERO;
    while t <= end {
        let (frame, frame_handle) = promise();
        source.send((t, frame));
        let Ok(signs) = frame_handle.block() else { break };

        // The surrounding application injects control commands between frames; the script
        // exercises the help toggle once, right after the game starts.
        if game.phase() == Phase::Game && !help_visible {
            help_visible = true;
            log::debug!("help overlay enabled");
        }

        let now = start + t;
        game.advance(&signs, now);

        if game.phase() != last_phase {
            last_phase = game.phase();
            log::info!("phase is now {:?}", last_phase);
        }
        if game.round_result() != last_result {
            last_result = game.round_result().to_string();
            if !last_result.is_empty() {
                let [p1, p2] = game.scores();
                log::info!("{last_result} (score {p1}:{p2})");
            }
        }
        print_hud(&game, now);

        t += step;
    }

    log::info!("script finished, shutting down");
    Ok(())
}

/// Logs the values a HUD would render for this frame.
fn print_hud(game: &Match, now: Instant) {
    for hand in game.pending_hands() {
        log::debug!(
            "pending {:?}: {} ({:?}, {:.0}%)",
            hand.id(),
            hand.sign(),
            hand.lock_state(game.confirm_sign(), game.lock_duration(), now),
            hand.lock_progress(game.lock_duration(), now),
        );
    }

    for (i, slot) in game.slots().iter().enumerate() {
        if let Some(track) = slot.track_id() {
            let lock = match slot.lock_remaining(game.lock_duration(), now) {
                Some(remaining) => format!(", locking ({:.01}s left)", remaining.as_secs_f32()),
                None => String::new(),
            };
            log::debug!(
                "player {} ({track:?}): {}{lock}, score {}",
                i + 1,
                slot.sign().map(|s| s.to_string()).unwrap_or_default(),
                slot.score(),
            );
        }
    }

    if game.timeout().should_warn(now) {
        log::warn!(
            "players gone, resetting in {:.0}s",
            game.timeout().remaining(now).as_secs_f32()
        );
    }
}
