use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SeatingError {
    #[error("player {0} is seated more than once")]
    DuplicatePlayer(PlayerId),
}

/// Stable handle for a drafter.
///
/// Whatever a front end knows about a player (a social handle, a database
/// row) is reduced to this identifier before it reaches the draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(handle: &str) -> Self {
        Self::new(handle)
    }
}

impl From<String> for PlayerId {
    fn from(handle: String) -> Self {
        Self(handle)
    }
}

/// Which neighbor receives a passed pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Direction {
    /// To the next seat (index + 1, wrapping).
    Left,
    /// To the previous seat (index - 1, wrapping).
    Right,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Pass direction for a zero-based round: left, right, left, ...
    pub fn for_round(round: usize) -> Self {
        if round % 2 == 0 {
            Direction::Left
        } else {
            Direction::Right
        }
    }
}

/// The players at the table and their seat order.
///
/// ```
/// use booster_draft::seating::{Direction, PlayerId, Seating};
///
/// let seating = Seating::try_new(["@ann", "@bo", "@cy"].map(PlayerId::from)).unwrap();
/// assert_eq!(seating.num_players(), 3);
/// assert_eq!(seating.neighbor(0, Direction::Right), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seating {
    seats: Vec<PlayerId>,
}

impl Seating {
    pub fn try_new(players: impl IntoIterator<Item = PlayerId>) -> Result<Self, SeatingError> {
        let seats: Vec<PlayerId> = players.into_iter().collect();
        let mut seen = HashSet::with_capacity(seats.len());
        for player in &seats {
            if !seen.insert(player) {
                return Err(SeatingError::DuplicatePlayer(player.clone()));
            }
        }
        Ok(Self { seats })
    }

    pub fn num_players(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Seat order used for pass arithmetic.
    pub fn player_order(&self) -> &[PlayerId] {
        &self.seats
    }

    pub fn seat_of(&self, player: &PlayerId) -> Option<usize> {
        self.seats.iter().position(|p| p == player)
    }

    /// Seat index receiving a pack passed from `seat`.
    pub fn neighbor(&self, seat: usize, direction: Direction) -> Option<usize> {
        let n = self.seats.len();
        if seat >= n {
            return None;
        }
        Some(match direction {
            Direction::Left => (seat + 1) % n,
            Direction::Right => (seat + n - 1) % n,
        })
    }

    /// Recompute the seat order, shuffling when `randomize` is set.
    pub fn seat_players<R: Rng + ?Sized>(&mut self, randomize: bool, rng: &mut R) -> &[PlayerId] {
        if randomize {
            self.seats.shuffle(rng);
        }
        &self.seats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn players(n: usize) -> Vec<PlayerId> {
        (0..n).map(|i| PlayerId::new(format!("@player{i}"))).collect()
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut list = players(3);
        list.push(PlayerId::from("@player1"));
        assert_eq!(
            Seating::try_new(list),
            Err(SeatingError::DuplicatePlayer(PlayerId::from("@player1")))
        );
    }

    #[test]
    fn non_random_seating_keeps_order() {
        let mut seating = Seating::try_new(players(8)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(seating.seat_players(false, &mut rng), players(8).as_slice());
    }

    #[test]
    fn random_seating_is_a_permutation() {
        let mut seating = Seating::try_new(players(8)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seated = seating.seat_players(true, &mut rng).to_vec();
        assert_ne!(seated, players(8), "seed 3 should move at least one seat");
        seated.sort();
        assert_eq!(seated, players(8));
    }

    #[test]
    fn neighbors_wrap_in_both_directions() {
        let seating = Seating::try_new(players(8)).unwrap();
        assert_eq!(seating.neighbor(0, Direction::Left), Some(1));
        assert_eq!(seating.neighbor(7, Direction::Left), Some(0));
        assert_eq!(seating.neighbor(0, Direction::Right), Some(7));
        assert_eq!(seating.neighbor(8, Direction::Right), None);

        let solo = Seating::try_new(players(1)).unwrap();
        assert_eq!(solo.neighbor(0, Direction::Left), Some(0));
        assert_eq!(solo.neighbor(0, Direction::Right), Some(0));
    }

    #[test]
    fn rounds_alternate_direction() {
        assert_eq!(Direction::for_round(0), Direction::Left);
        assert_eq!(Direction::for_round(1), Direction::Right);
        assert_eq!(Direction::for_round(2), Direction::Left);
    }
}
