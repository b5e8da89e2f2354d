// Minimal draft engine API boundary. Agents and front ends drive a draft
// through this trait so they never reach into its queues directly. It is
// implemented for the core `Draft` type.

use crate::cards::Card;
use crate::draft::{Draft, DraftError, DraftStatus, PickRecord};
use crate::pool::Pack;
use crate::seating::{Direction, PlayerId};

pub trait DraftEngine {
    // Actions
    fn open(&mut self, player: &PlayerId) -> Result<(), DraftError>;
    fn pick_and_pass(
        &mut self,
        player: &PlayerId,
        card: &Card,
        direction: Direction,
    ) -> Result<(), DraftError>;

    // Queries
    fn status(&self) -> DraftStatus;
    fn round(&self) -> Option<usize>;
    fn player_order(&self) -> &[PlayerId];
    fn on_deck(&self, seat: usize) -> Option<&Pack>;
    fn opened_count(&self, seat: usize) -> usize;
    fn unopened_count(&self, seat: usize) -> usize;
    fn picks_at(&self, seat: usize) -> &[PickRecord];

    fn num_players(&self) -> usize {
        self.player_order().len()
    }

    /// Nobody has a pack open, so the table is between rounds.
    fn between_rounds(&self) -> bool {
        (0..self.num_players()).all(|seat| self.opened_count(seat) == 0)
    }
}

impl DraftEngine for Draft {
    fn open(&mut self, player: &PlayerId) -> Result<(), DraftError> {
        Draft::open(self, player)
    }
    fn pick_and_pass(
        &mut self,
        player: &PlayerId,
        card: &Card,
        direction: Direction,
    ) -> Result<(), DraftError> {
        Draft::pick_and_pass(self, player, card, direction)
    }

    fn status(&self) -> DraftStatus {
        Draft::status(self)
    }
    fn round(&self) -> Option<usize> {
        Draft::round(self)
    }
    fn player_order(&self) -> &[PlayerId] {
        Draft::player_order(self)
    }
    fn on_deck(&self, seat: usize) -> Option<&Pack> {
        self.queue_at(seat).and_then(|q| q.on_deck())
    }
    fn opened_count(&self, seat: usize) -> usize {
        self.queue_at(seat).map(|q| q.opened().len()).unwrap_or(0)
    }
    fn unopened_count(&self, seat: usize) -> usize {
        self.queue_at(seat).map(|q| q.unopened().len()).unwrap_or(0)
    }
    fn picks_at(&self, seat: usize) -> &[PickRecord] {
        Draft::picks_at(self, seat).unwrap_or(&[])
    }
}
