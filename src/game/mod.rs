//! Match state and the per-frame update entry point.
//!
//! A [`Match`] runs in one of two phases: during [`Phase::Detection`] unassigned hands register
//! as players (see [`registration`][self]), during [`Phase::Game`] the two registered players
//! throw rounds. Every decision the engine commits to — registering a player, resolving a round,
//! stopping the match — is debounced through the same lock mechanism: a sign has to be held
//! unchanged for the configured lock duration before it counts.

mod registration;
mod round;
mod timeout;

pub use timeout::TimeoutManager;

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::detection::{SignsById, TrackId};
use crate::sign::Sign;

/// Match phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for two hands to register by holding the confirm sign.
    Detection,
    /// Two players assigned, rounds are being played.
    Game,
}

/// Lock state of a pending hand, derived from its timestamps on every query (never stored, so it
/// cannot diverge from the underlying record).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// No lock attempt in progress.
    None,
    /// Holding the confirm sign, but not yet for the full lock duration.
    Locking,
    /// Confirm sign held for the full lock duration; the hand is ready to be promoted.
    Confirmed,
    /// Holding some sign other than the confirm sign steadily. Does not register a player.
    Invalid,
}

/// A sign held steadily over consecutive frames.
#[derive(Debug, Clone, Copy, Default)]
struct Lock {
    sign: Option<Sign>,
    since: Option<Instant>,
}

impl Lock {
    /// Feeds one frame's observation into the lock.
    ///
    /// Holding the locked sign starts (or continues) the countdown; any other sign restarts the
    /// attempt with the new sign. `since` is only ever set while `sign` matches the most recent
    /// observation.
    fn observe(&mut self, sign: Sign, now: Instant) {
        if self.sign == Some(sign) {
            if self.since.is_none() {
                self.since = Some(now);
            }
        } else {
            self.sign = Some(sign);
            self.since = None;
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn held_for(&self, now: Instant) -> Option<Duration> {
        self.since.map(|since| now.duration_since(since))
    }
}

/// One of the two player slots.
///
/// A vacant slot has no track id. Slots are recreated whole on every match reset so that no
/// stale lock or timestamp survives a phase change.
#[derive(Debug, Default)]
pub struct PlayerSlot {
    track: Option<TrackId>,
    sign: Option<Sign>,
    last_seen: Option<Instant>,
    score: u32,
    lock: Lock,
}

impl PlayerSlot {
    pub fn is_occupied(&self) -> bool {
        self.track.is_some()
    }

    pub fn track_id(&self) -> Option<TrackId> {
        self.track
    }

    /// The sign most recently observed for this player.
    pub fn sign(&self) -> Option<Sign> {
        self.sign
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Whether a lock attempt is currently counting down.
    pub fn lock_in_progress(&self) -> bool {
        self.lock.since.is_some()
    }

    /// Time left until the current lock attempt completes, `None` if no attempt is counting.
    pub fn lock_remaining(&self, lock_duration: Duration, now: Instant) -> Option<Duration> {
        self.lock
            .held_for(now)
            .map(|held| lock_duration.saturating_sub(held))
    }
}

/// A tracked hand that has not been promoted to a player slot yet.
///
/// Exists only during the detection phase; created on first sighting of an unowned track id,
/// destroyed on promotion or after going unseen past the disconnect timeout.
#[derive(Debug)]
pub struct PendingHand {
    id: TrackId,
    sign: Sign,
    last_seen: Instant,
    lock: Lock,
}

impl PendingHand {
    fn new(id: TrackId, sign: Sign, now: Instant) -> Self {
        Self {
            id,
            sign,
            last_seen: now,
            lock: Lock::default(),
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Derives the lock state of this hand.
    pub fn lock_state(&self, confirm: Sign, lock_duration: Duration, now: Instant) -> LockState {
        if self.lock.sign != Some(self.sign) {
            return LockState::None;
        }

        if self.sign != confirm {
            return LockState::Invalid;
        }

        match self.lock.held_for(now) {
            Some(held) if held >= lock_duration => LockState::Confirmed,
            _ => LockState::Locking,
        }
    }

    /// Lock progress in percent (0–100), for progress bars. 0 if no lock attempt is counting.
    pub fn lock_progress(&self, lock_duration: Duration, now: Instant) -> f32 {
        match self.lock.held_for(now) {
            Some(held) => (held.as_secs_f32() / lock_duration.as_secs_f32() * 100.0).min(100.0),
            None => 0.0,
        }
    }
}

/// Complete state of a Rock-Paper-Scissors match.
///
/// The match is owned by the frame loop and advanced once per frame with [`Match::advance`]. All
/// timers are wall-clock timestamps compared against the `now` passed in, so the caller controls
/// time completely (which also makes the engine trivial to test).
#[derive(Debug)]
pub struct Match {
    phase: Phase,
    lock_duration: Duration,
    disconnect_timeout: Duration,
    confirm_sign: Sign,
    stop_sign: Sign,
    game_active: bool,
    start_time: Instant,
    round_result: String,
    slots: [PlayerSlot; 2],
    pending: Vec<PendingHand>,
    timeout: TimeoutManager,
}

impl Match {
    /// How long a sign must be held unchanged before it counts as a decision.
    pub const DEFAULT_LOCK_DURATION: Duration = Duration::from_secs(2);

    /// How long a tracked entity may go unseen before its slot or pending entry is cleared.
    pub const DEFAULT_DISCONNECT_TIMEOUT: Duration = Duration::from_secs(120);

    /// Creates a fresh match in the detection phase.
    pub fn new(now: Instant) -> Self {
        debug!("initializing new match state");
        Self {
            phase: Phase::Detection,
            lock_duration: Self::DEFAULT_LOCK_DURATION,
            disconnect_timeout: Self::DEFAULT_DISCONNECT_TIMEOUT,
            confirm_sign: Sign::Ok,
            stop_sign: Sign::Stop,
            game_active: false,
            start_time: now,
            round_result: String::new(),
            slots: [PlayerSlot::default(), PlayerSlot::default()],
            pending: Vec::new(),
            timeout: TimeoutManager::new(),
        }
    }

    /// Sets how long a sign must be held to lock in a decision.
    pub fn set_lock_duration(&mut self, duration: Duration) {
        self.lock_duration = duration;
    }

    /// Sets how long a player or pending hand may go unseen before it is dropped.
    pub fn set_disconnect_timeout(&mut self, timeout: Duration) {
        self.disconnect_timeout = timeout;
    }

    /// Sets the sign a new hand must hold to register as a player.
    pub fn set_confirm_sign(&mut self, sign: Sign) {
        self.confirm_sign = sign;
    }

    /// Sets the sign both players must hold simultaneously to end the match.
    pub fn set_stop_sign(&mut self, sign: Sign) {
        self.stop_sign = sign;
    }

    /// Processes one frame of detector output.
    ///
    /// An empty mapping simply means nobody is visible this frame.
    pub fn advance(&mut self, signs: &SignsById, now: Instant) {
        match self.phase {
            Phase::Detection => self.update_detection(signs, now),
            Phase::Game => self.update_game(signs, now),
        }

        debug_assert!(
            self.slots[0].track.is_none() || self.slots[0].track != self.slots[1].track,
            "one track id owns both player slots"
        );
    }

    /// Resets the match back to the detection phase.
    ///
    /// Both slots are recreated, pending hands and the timeout timer are cleared. This is also
    /// the handler for an externally injected reset command.
    pub fn reset(&mut self, now: Instant) {
        debug!("resetting match state");
        self.phase = Phase::Detection;
        self.game_active = false;
        self.start_time = now;
        self.round_result.clear();
        self.slots = [PlayerSlot::default(), PlayerSlot::default()];
        self.pending.clear();
        self.timeout.reset();
    }

    /// Switches to the game phase with fresh scores. Called by the registration step once both
    /// slots are occupied.
    fn start_game(&mut self, now: Instant) {
        info!("both players assigned, starting game phase");
        self.phase = Phase::Game;
        self.game_active = true;
        self.start_time = now;
        self.round_result.clear();
        for slot in &mut self.slots {
            slot.score = 0;
            slot.lock.clear();
        }
        self.pending.clear();
        self.timeout.reset();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn lock_duration(&self) -> Duration {
        self.lock_duration
    }

    pub fn disconnect_timeout(&self) -> Duration {
        self.disconnect_timeout
    }

    pub fn confirm_sign(&self) -> Sign {
        self.confirm_sign
    }

    pub fn stop_sign(&self) -> Sign {
        self.stop_sign
    }

    pub fn game_active(&self) -> bool {
        self.game_active
    }

    /// When the match (or the current game) started.
    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Human-readable outcome of the last resolved round, empty if none has been resolved yet.
    pub fn round_result(&self) -> &str {
        &self.round_result
    }

    pub fn slots(&self) -> &[PlayerSlot; 2] {
        &self.slots
    }

    pub fn scores(&self) -> [u32; 2] {
        [self.slots[0].score, self.slots[1].score]
    }

    /// Hands seen during the detection phase that are not assigned to a slot yet, in the order
    /// they were first sighted.
    pub fn pending_hands(&self) -> impl Iterator<Item = &PendingHand> {
        self.pending.iter()
    }

    pub fn timeout(&self) -> &TimeoutManager {
        &self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn lock_keeps_start_while_sign_is_held() {
        let t0 = Instant::now();
        let mut lock = Lock::default();

        lock.observe(Sign::Ok, t0);
        assert_eq!(lock.sign, Some(Sign::Ok));
        assert_eq!(lock.since, None);

        lock.observe(Sign::Ok, t0 + secs(0.1));
        assert_eq!(lock.since, Some(t0 + secs(0.1)));

        lock.observe(Sign::Ok, t0 + secs(1.5));
        assert_eq!(lock.since, Some(t0 + secs(0.1)));
    }

    #[test]
    fn lock_resets_on_sign_change() {
        let t0 = Instant::now();
        let mut lock = Lock::default();

        lock.observe(Sign::Ok, t0);
        lock.observe(Sign::Ok, t0 + secs(0.1));
        lock.observe(Sign::Rock, t0 + secs(1.9));
        assert_eq!(lock.sign, Some(Sign::Rock));
        assert_eq!(lock.since, None);

        lock.observe(Sign::Rock, t0 + secs(2.0));
        assert_eq!(lock.since, Some(t0 + secs(2.0)));
    }

    #[test]
    fn pending_hand_lock_states() {
        let t0 = Instant::now();
        let duration = secs(2.0);
        let mut hand = PendingHand::new(TrackId(1), Sign::Ok, t0);

        // Fresh hand, no lock attempt yet.
        assert_eq!(hand.lock_state(Sign::Ok, duration, t0), LockState::None);

        hand.lock.observe(Sign::Ok, t0);
        hand.lock.observe(Sign::Ok, t0 + secs(0.1));
        assert_eq!(
            hand.lock_state(Sign::Ok, duration, t0 + secs(1.0)),
            LockState::Locking
        );
        assert_eq!(
            hand.lock_state(Sign::Ok, duration, t0 + secs(2.1)),
            LockState::Confirmed
        );
    }

    #[test]
    fn holding_a_non_confirm_sign_is_invalid() {
        let t0 = Instant::now();
        let duration = secs(2.0);
        let mut hand = PendingHand::new(TrackId(1), Sign::Rock, t0);

        hand.lock.observe(Sign::Rock, t0);
        hand.lock.observe(Sign::Rock, t0 + secs(0.1));
        assert_eq!(
            hand.lock_state(Sign::Ok, duration, t0 + secs(5.0)),
            LockState::Invalid
        );
    }

    #[test]
    fn lock_progress_saturates_at_100() {
        let t0 = Instant::now();
        let duration = secs(2.0);
        let mut hand = PendingHand::new(TrackId(1), Sign::Ok, t0);

        assert_eq!(hand.lock_progress(duration, t0), 0.0);

        hand.lock.observe(Sign::Ok, t0);
        hand.lock.observe(Sign::Ok, t0);
        approx::assert_relative_eq!(hand.lock_progress(duration, t0 + secs(1.0)), 50.0);
        approx::assert_relative_eq!(hand.lock_progress(duration, t0 + secs(10.0)), 100.0);
    }
}
