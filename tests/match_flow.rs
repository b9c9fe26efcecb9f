//! End-to-end scenarios driving a [`Match`] through the public API only.

use std::time::{Duration, Instant};

use janken::detection::{signs_from_labels, SignsById, TrackId};
use janken::game::{Match, Phase};

fn secs(s: f32) -> Duration {
    Duration::from_secs_f32(s)
}

/// Feeds the same frame every 100 ms over `[from, to]` seconds after `t0`.
fn hold(game: &mut Match, signs: &SignsById, t0: Instant, from: f32, to: f32) {
    let mut t = from;
    while t <= to + 1e-6 {
        game.advance(signs, t0 + secs(t));
        t += 0.1;
    }
}

#[test]
fn full_match() {
    let t0 = Instant::now();
    let mut game = Match::new(t0);
    assert_eq!(game.phase(), Phase::Detection);

    // Track 10 holds the confirm sign past the lock duration and takes slot 1.
    hold(&mut game, &signs_from_labels([(10, "Ok")]), t0, 0.0, 2.3);
    assert_eq!(game.slots()[0].track_id(), Some(TrackId(10)));
    assert_eq!(game.phase(), Phase::Detection);

    // Track 11 follows and takes slot 2; the game starts with fresh scores.
    let both = signs_from_labels([(10, "Ok"), (11, "Ok")]);
    hold(&mut game, &both, t0, 2.4, 5.0);
    assert_eq!(game.slots()[1].track_id(), Some(TrackId(11)));
    assert_eq!(game.phase(), Phase::Game);
    assert_eq!(game.scores(), [0, 0]);
    assert!(game.game_active());

    // Rock vs Scissor held for the lock duration resolves the round.
    let round = signs_from_labels([(10, "Rock"), (11, "Scissor")]);
    hold(&mut game, &round, t0, 5.1, 7.5);
    assert_eq!(game.round_result(), "Rock vs Scissor - Player 1 Wins");
    assert_eq!(game.scores(), [1, 0]);

    // Both players hold Stop; the match returns to detection with cleared slots.
    let stop = signs_from_labels([(10, "Stop"), (11, "Stop")]);
    hold(&mut game, &stop, t0, 7.6, 10.5);
    assert_eq!(game.phase(), Phase::Detection);
    assert!(!game.slots()[0].is_occupied());
    assert!(!game.slots()[1].is_occupied());
    assert_eq!(game.scores(), [0, 0]);
}

#[test]
fn mutual_absence_times_out_the_game() {
    let t0 = Instant::now();
    let mut game = Match::new(t0);

    let both = signs_from_labels([(10, "Ok"), (11, "Ok")]);
    hold(&mut game, &both, t0, 0.0, 3.0);
    assert_eq!(game.phase(), Phase::Game);

    // The default disconnect timeout (120 s) is far longer than the mutual-absence timeout, so
    // the presence timeout is what ends this game.
    let empty = SignsById::new();
    game.advance(&empty, t0 + secs(4.0));
    assert!(game.timeout().is_active());

    // Coming back just before the minute is up cancels the countdown.
    game.advance(&both, t0 + secs(63.0));
    assert!(!game.timeout().is_active());
    assert_eq!(game.phase(), Phase::Game);

    // Gone again, and this time for the full minute.
    game.advance(&empty, t0 + secs(64.0));
    assert!(game.timeout().should_warn(t0 + secs(120.0)));
    game.advance(&empty, t0 + secs(124.0));
    assert_eq!(game.phase(), Phase::Detection);
    assert!(!game.slots()[0].is_occupied());
    assert!(!game.slots()[1].is_occupied());
}

#[test]
fn reset_command_restarts_from_scratch() {
    let t0 = Instant::now();
    let mut game = Match::new(t0);

    let both = signs_from_labels([(10, "Ok"), (11, "Ok")]);
    hold(&mut game, &both, t0, 0.0, 3.0);
    let round = signs_from_labels([(10, "Paper"), (11, "Rock")]);
    hold(&mut game, &round, t0, 3.1, 5.5);
    assert_eq!(game.scores(), [1, 0]);

    // An injected reset takes effect immediately; the pending detections of the current frame
    // have no further effect.
    game.reset(t0 + secs(5.6));
    assert_eq!(game.phase(), Phase::Detection);
    assert_eq!(game.round_result(), "");
    assert_eq!(game.scores(), [0, 0]);
    assert!(!game.slots()[0].is_occupied());

    // The same hands can register again afterwards.
    hold(&mut game, &both, t0, 5.7, 8.5);
    assert_eq!(game.phase(), Phase::Game);
}

#[test]
fn track_id_reuse_after_absence_is_harmless() {
    let t0 = Instant::now();
    let mut game = Match::new(t0);
    game.set_disconnect_timeout(secs(2.0));

    hold(&mut game, &signs_from_labels([(7, "Ok")]), t0, 0.0, 2.3);
    assert_eq!(game.slots()[0].track_id(), Some(TrackId(7)));

    // The hand disappears long enough for its slot to be vacated...
    let empty = SignsById::new();
    hold(&mut game, &empty, t0, 2.4, 5.0);
    assert!(!game.slots()[0].is_occupied());

    // ...and the tracker hands out the same id to a new hand, which registers normally.
    hold(&mut game, &signs_from_labels([(7, "Ok")]), t0, 5.1, 7.5);
    assert_eq!(game.slots()[0].track_id(), Some(TrackId(7)));
}

#[test]
fn garbage_labels_never_panic_or_register() {
    let mut rng = fastrand::Rng::with_seed(0x6a616e6b656e);
    let labels = ["Blimp", "rock", "OK", "", "🖖", "Scissors"];

    let t0 = Instant::now();
    let mut game = Match::new(t0);

    for frame in 0..600u64 {
        let signs = signs_from_labels(
            (0..rng.usize(0..4)).map(|i| (rng.u64(0..6) + i as u64, *rng.choice(&labels).unwrap())),
        );
        game.advance(&signs, t0 + Duration::from_millis(frame * 100));
    }

    // None of these labels is the confirm sign, so nobody ever registers.
    assert_eq!(game.phase(), Phase::Detection);
    assert!(!game.slots()[0].is_occupied());
    assert!(!game.slots()[1].is_occupied());
}
