//! Hand registration during the detection phase.
//!
//! Every hand the tracker reports is either assigned to a player slot already or kept as a
//! pending hand. Pending hands debounce the confirm sign through the lock mechanism; once a hand
//! has held it for the full lock duration it is promoted into the next vacant slot. When both
//! slots are occupied the match switches to the game phase.

use std::time::Instant;

use itertools::Itertools;
use log::{debug, info};

use super::{LockState, Match, PendingHand};
use crate::detection::SignsById;

impl Match {
    /// Detection-phase update: refresh what is known, register newcomers, promote confirmed
    /// hands, and start the game once both slots are filled.
    pub(super) fn update_detection(&mut self, signs: &SignsById, now: Instant) {
        self.refresh_slots(signs, now);
        self.refresh_pending(signs, now);
        self.register_new(signs, now);
        self.promote_confirmed(now);

        if self.slots.iter().all(|slot| slot.is_occupied()) {
            self.start_game(now);
        }
    }

    /// Updates occupied slots from this frame's detections. A slot whose owner stays unseen past
    /// the disconnect timeout is vacated; the rest of the match is untouched.
    fn refresh_slots(&mut self, signs: &SignsById, now: Instant) {
        let disconnect_timeout = self.disconnect_timeout;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let Some(track) = slot.track else { continue };

            if let Some(&sign) = signs.get(&track) {
                slot.sign = Some(sign);
                slot.last_seen = Some(now);
            } else if slot
                .last_seen
                .is_some_and(|seen| now.duration_since(seen) > disconnect_timeout)
            {
                info!("player {} ({track:?}) disconnected during detection", i + 1);
                slot.track = None;
                slot.sign = None;
            }
        }
    }

    /// Updates pending hands from this frame's detections, advancing their locks, and drops
    /// hands that have gone unseen past the disconnect timeout.
    fn refresh_pending(&mut self, signs: &SignsById, now: Instant) {
        let disconnect_timeout = self.disconnect_timeout;
        self.pending.retain_mut(|hand| match signs.get(&hand.id) {
            Some(&sign) => {
                hand.sign = sign;
                hand.last_seen = now;
                hand.lock.observe(sign, now);
                true
            }
            None if now.duration_since(hand.last_seen) > disconnect_timeout => {
                debug!("dropping unseen hand {:?}", hand.id);
                false
            }
            None => true,
        });
    }

    /// Starts tracking hands that own no slot and have no pending entry yet.
    fn register_new(&mut self, signs: &SignsById, now: Instant) {
        // Map iteration order is unspecified; sort so that several hands appearing in the same
        // frame enqueue in a deterministic order.
        for (&id, &sign) in signs.iter().sorted_by_key(|&(&id, _)| id) {
            let assigned = self.slots.iter().any(|slot| slot.track == Some(id));
            let pending = self.pending.iter().any(|hand| hand.id == id);
            if !assigned && !pending {
                info!("tracking new hand {id:?}");
                self.pending.push(PendingHand::new(id, sign, now));
            }
        }
    }

    /// Promotes confirmed pending hands into vacant slots, slots in ascending order, hands in
    /// the order they were first sighted. Confirmed hands that find no vacancy stay pending.
    fn promote_confirmed(&mut self, now: Instant) {
        let confirm = self.confirm_sign;
        let lock_duration = self.lock_duration;

        for i in 0..self.slots.len() {
            if self.slots[i].is_occupied() {
                continue;
            }

            let confirmed = self
                .pending
                .iter()
                .position(|hand| hand.lock_state(confirm, lock_duration, now) == LockState::Confirmed);
            let Some(pos) = confirmed else { break };

            let hand = self.pending.remove(pos);
            info!("assigned player {} to {:?}", i + 1, hand.id);
            let slot = &mut self.slots[i];
            slot.track = Some(hand.id);
            slot.sign = Some(hand.sign);
            slot.last_seen = Some(now);
        }
    }
}
