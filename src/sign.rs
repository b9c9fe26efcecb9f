//! The hand-sign vocabulary and the round resolution rules.

use std::fmt;

/// A hand sign reported by the upstream classifier.
///
/// The variants mirror the classifier's label set. Labels outside the vocabulary parse to
/// [`Sign::Unknown`], which is neither playable nor a confirm/stop sign: an unknown sign can
/// occupy a lock attempt, but it can never register a player or resolve a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Gun,
    Ok,
    Paper,
    Restart,
    Rock,
    Scissor,
    Start,
    Stop,
    Unknown,
}

impl Sign {
    /// Parses a classifier output label.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Gun" => Sign::Gun,
            "Ok" => Sign::Ok,
            "Paper" => Sign::Paper,
            "Restart" => Sign::Restart,
            "Rock" => Sign::Rock,
            "Scissor" => Sign::Scissor,
            "Start" => Sign::Start,
            "Stop" => Sign::Stop,
            _ => Sign::Unknown,
        }
    }

    /// Whether this sign participates in round resolution.
    pub fn is_playable(self) -> bool {
        matches!(self, Sign::Rock | Sign::Paper | Sign::Scissor)
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sign::Gun => "Gun",
            Sign::Ok => "Ok",
            Sign::Paper => "Paper",
            Sign::Restart => "Restart",
            Sign::Rock => "Rock",
            Sign::Scissor => "Scissor",
            Sign::Start => "Start",
            Sign::Stop => "Stop",
            Sign::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// The result of resolving one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Tie,
    Player1,
    Player2,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Tie => "Tie",
            Outcome::Player1 => "Player 1 Wins",
            Outcome::Player2 => "Player 2 Wins",
        })
    }
}

/// Resolves a round of Rock-Paper-Scissors.
///
/// Both arguments are expected to be playable signs; the caller checks that with
/// [`Sign::is_playable`] before resolving.
pub fn resolve(sign1: Sign, sign2: Sign) -> Outcome {
    if sign1 == sign2 {
        return Outcome::Tie;
    }

    match (sign1, sign2) {
        (Sign::Rock, Sign::Scissor) | (Sign::Paper, Sign::Rock) | (Sign::Scissor, Sign::Paper) => {
            Outcome::Player1
        }
        _ => Outcome::Player2,
    }
}
