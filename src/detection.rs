//! The boundary to the upstream detector/tracker.
//!
//! The detector itself is an external collaborator; all this crate sees of it is a per-frame
//! mapping from stable track ids to sign labels.

use std::collections::HashMap;

use crate::sign::Sign;

/// ID of a tracked hand.
///
/// Assigned by the upstream tracker, which keeps the id stable for as long as it can follow the
/// hand across frames. Ids may be reused after a long absence; the engine needs no special
/// handling for that since stale owners are cleared by the disconnect timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u64);

/// One frame of detector output: every currently tracked hand and the sign it shows.
///
/// An empty map means nobody is visible this frame.
pub type SignsById = HashMap<TrackId, Sign>;

/// Builds a [`SignsById`] from raw `(track id, label)` pairs as they come out of a classifier.
pub fn signs_from_labels<'a, I>(pairs: I) -> SignsById
where
    I: IntoIterator<Item = (u64, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(id, label)| (TrackId(id), Sign::from_label(label)))
        .collect()
}
