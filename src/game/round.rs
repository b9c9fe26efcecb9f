//! Round engine for the game phase.
//!
//! Each frame refreshes both players' signs, runs the joint lock check over the observed pair,
//! and resolves the round once the pair has been held for the full lock duration. Players that
//! vanish past the disconnect timeout, or a mutual stop sign, send the match back to the
//! detection phase.

use std::time::Instant;

use log::{info, warn};

use super::{Match, Phase};
use crate::detection::SignsById;
use crate::sign::{self, Outcome, Sign};

impl Match {
    /// Game-phase update: refresh signs, check the joint lock, resolve, then run the presence
    /// timeout over this frame's visibility.
    pub(super) fn update_game(&mut self, signs: &SignsById, now: Instant) {
        let visible = [0, 1].map(|i| {
            self.slots[i]
                .track
                .is_some_and(|track| signs.contains_key(&track))
        });

        let Some(observed) = self.refresh_players(signs, now) else {
            // A player stayed gone past the disconnect timeout; the match has been reset.
            return;
        };

        if self.check_and_lock(observed, now) {
            if self.game_active {
                self.process_locked_round(now);
            }
            // Unconditionally clear the locks so a new cycle can begin. After a mutual stop this
            // runs on freshly reset slots, which is a no-op.
            for slot in &mut self.slots {
                slot.lock.clear();
            }
        }

        if self.phase == Phase::Game && self.timeout.update(visible[0], visible[1], now) {
            warn!("player timeout reached, resetting match");
            self.reset(now);
        }
    }

    /// Refreshes both slots from this frame's detections and returns the pair of signs observed
    /// this frame (`None` per slot when its player is not visible).
    ///
    /// Returns `None` if a player exceeded the disconnect timeout; the whole match is reset in
    /// that case and the frame must not be processed further.
    fn refresh_players(&mut self, signs: &SignsById, now: Instant) -> Option<[Option<Sign>; 2]> {
        let mut observed = [None, None];
        let mut disconnected = None;

        for (i, slot) in self.slots.iter_mut().enumerate() {
            let Some(track) = slot.track else { continue };

            if let Some(&sign) = signs.get(&track) {
                slot.sign = Some(sign);
                slot.last_seen = Some(now);
                observed[i] = Some(sign);
            } else if slot
                .last_seen
                .is_some_and(|seen| now.duration_since(seen) > self.disconnect_timeout)
            {
                disconnected = Some(i);
                break;
            }
        }

        if let Some(i) = disconnected {
            info!("player {} disconnected, returning to detection phase", i + 1);
            self.reset(now);
            return None;
        }

        Some(observed)
    }

    /// Joint lock check: both players must hold the same pair of signs, unchanged since the
    /// current attempt began. Any change on either side (including a sign going unobserved)
    /// restarts the attempt with the newly observed pair.
    fn check_and_lock(&mut self, observed: [Option<Sign>; 2], now: Instant) -> bool {
        let [o1, o2] = observed;
        let [s1, s2] = &mut self.slots;

        if o1.is_some() && o2.is_some() && o1 == s1.lock.sign && o2 == s2.lock.sign {
            if s1.lock.since.is_none() {
                info!("positions locked: p1={:?} p2={:?}", o1, o2);
                s1.lock.since = Some(now);
                s2.lock.since = Some(now);
            }

            s1.lock
                .held_for(now)
                .is_some_and(|held| held >= self.lock_duration)
        } else {
            s1.lock.sign = o1;
            s2.lock.sign = o2;
            s1.lock.since = None;
            s2.lock.since = None;
            false
        }
    }

    /// Resolves a locked pair: mutual stop ends the match, a playable pair scores, anything else
    /// is silently skipped so play can continue.
    fn process_locked_round(&mut self, now: Instant) {
        let (Some(lock1), Some(lock2)) = (self.slots[0].lock.sign, self.slots[1].lock.sign) else {
            return;
        };

        if lock1 == self.stop_sign && lock2 == self.stop_sign {
            info!("both players showed {}, stopping the game", self.stop_sign);
            self.reset(now);
        } else if lock1.is_playable() && lock2.is_playable() {
            let outcome = sign::resolve(lock1, lock2);
            match outcome {
                Outcome::Player1 => self.slots[0].score += 1,
                Outcome::Player2 => self.slots[1].score += 1,
                Outcome::Tie => {}
            }
            self.round_result = format!("{lock1} vs {lock2} - {outcome}");
            info!("round result: {}", self.round_result);
        }
    }
}
