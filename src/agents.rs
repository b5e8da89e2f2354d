//! Agents: pluggable drafters (bots, humans via a front end).
//!
//! A small trait `DraftAgent` chooses a card for one seat, and `AgentTable`
//! drives a whole table of them: it opens the next round when every pack of
//! the current one is used up, and otherwise lets each seat with a pack on
//! deck pick and pass in the round's direction. UIs stay thin and never
//! implement round logic themselves.

use crate::cards::Card;
use crate::draft::{DraftError, DraftStatus};
use crate::engine::DraftEngine;
use crate::seating::Direction;
use core::fmt;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Kinds of agents attached to seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentKind {
    Human,
    Bot,
}

/// A seat controller that picks for a player whenever a pack is on deck.
pub trait DraftAgent {
    /// Called when `seat` has a pack on deck. `None` means "not yet".
    fn choose(&mut self, engine: &dyn DraftEngine, seat: usize) -> Option<Card>;
    /// The kind of this agent (human, bot, etc.).
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
    /// Optionally receive a pick intent; default is to ignore and return false.
    fn receive(&mut self, _card: Card) -> bool {
        false
    }
}

mod bots;

pub use bots::{BotAgent, BotProfile, PickStyle};

/// Picks whatever card the user last asked for.
pub struct HumanAgent {
    pending: Option<Card>,
}

impl HumanAgent {
    pub fn new() -> Self {
        Self { pending: None }
    }
}

impl Default for HumanAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftAgent for HumanAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
    fn receive(&mut self, card: Card) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(card);
        true
    }
    fn choose(&mut self, engine: &dyn DraftEngine, seat: usize) -> Option<Card> {
        engine.on_deck(seat)?;
        self.pending.take()
    }
}

/// One optional agent per seat, plus the round logic that drives them.
pub struct AgentTable {
    seats: Vec<Option<Box<dyn DraftAgent>>>,
    min_action_delay: Duration,
    next_action_at: Option<Instant>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: String = self
            .seats
            .iter()
            .map(|a| match a.as_deref().map(|ag| ag.kind()) {
                Some(AgentKind::Bot) => 'B',
                Some(AgentKind::Human) => 'H',
                None => '-',
            })
            .collect();
        write!(f, "AgentTable({flags})")
    }
}

impl AgentTable {
    /// Create a table with `n` seats, all empty.
    pub fn for_seats(n: usize) -> Self {
        let mut seats = Vec::with_capacity(n);
        seats.resize_with(n, || None);
        Self { seats, min_action_delay: Duration::from_millis(0), next_action_at: None }
    }

    /// A table where every seat is a bot built from `profile`; seeded
    /// profiles get a distinct seed per seat.
    pub fn all_bots(n: usize, profile: &BotProfile) -> Self {
        let mut table = Self::for_seats(n);
        for seat in 0..n {
            let mut p = profile.clone();
            p.rng_seed = profile.rng_seed.map(|s| s.wrapping_add(seat as u64));
            table.set_agent(seat, Some(Box::new(BotAgent::new(p))));
        }
        table
    }

    /// Ensure the table has exactly `n` seats.
    pub fn ensure_len(&mut self, n: usize) {
        if self.seats.len() < n {
            self.seats.resize_with(n, || None);
        }
        if self.seats.len() > n {
            self.seats.truncate(n);
        }
    }

    /// Assign an agent to a seat (or remove when `None`).
    pub fn set_agent(&mut self, seat: usize, agent: Option<Box<dyn DraftAgent>>) {
        if seat >= self.seats.len() {
            self.ensure_len(seat + 1);
        }
        self.seats[seat] = agent;
    }

    /// Return the kind of agent at a seat, if any.
    pub fn agent_kind(&self, seat: usize) -> Option<AgentKind> {
        self.seats.get(seat).and_then(|a| a.as_deref().map(|ag| ag.kind()))
    }

    /// Send a pick intent to a specific seat agent, if any.
    pub fn receive(&mut self, seat: usize, card: Card) -> bool {
        if let Some(Some(agent)) = self.seats.get_mut(seat) {
            return agent.receive(card);
        }
        false
    }

    pub fn has_agent(&self, seat: usize) -> bool {
        self.seats.get(seat).map(|a| a.is_some()).unwrap_or(false)
    }

    /// Whether any non-human (bot) agents are assigned.
    pub fn any_bots(&self) -> bool {
        self.seats.iter().filter_map(|a| a.as_deref()).any(|ag| matches!(ag.kind(), AgentKind::Bot))
    }

    /// Set a global minimum delay between table ticks that did something.
    pub fn set_min_action_delay_ms(&mut self, delay_ms: u64) {
        self.min_action_delay = Duration::from_millis(delay_ms);
    }

    /// Advance the table by one tick.
    ///
    /// Between rounds every player opens their next pack. Otherwise each seat
    /// with a pack on deck and an agent ready to choose picks and passes in
    /// the round's direction. Returns whether anything changed; the first
    /// rejected pick is returned as an error after the other seats have had
    /// their turn.
    pub fn on_turn(&mut self, engine: &mut dyn DraftEngine) -> Result<bool, DraftError> {
        if matches!(engine.status(), DraftStatus::Unstarted | DraftStatus::Complete) {
            return Ok(false);
        }
        let now = Instant::now();
        if let Some(next) = self.next_action_at {
            if now < next {
                return Ok(false);
            }
        }

        if engine.between_rounds() {
            let players = engine.player_order().to_vec();
            for player in &players {
                engine.open(player)?;
            }
            info!(round = engine.round().unwrap_or(0), "opened next round of packs");
            self.schedule(now);
            return Ok(true);
        }

        let direction = Direction::for_round(engine.round().unwrap_or(0));
        let mut acted = false;
        let mut rejected = None;
        for seat in 0..engine.num_players() {
            if engine.on_deck(seat).is_none() {
                continue;
            }
            let Some(Some(agent)) = self.seats.get_mut(seat) else {
                continue;
            };
            let Some(card) = agent.choose(&*engine, seat) else {
                continue;
            };
            let player = engine.player_order()[seat].clone();
            match engine.pick_and_pass(&player, &card, direction) {
                Ok(()) => acted = true,
                Err(err) => {
                    warn!(%player, %card, %err, "pick rejected");
                    rejected.get_or_insert(err);
                }
            }
        }
        if acted {
            self.schedule(now);
        }
        match rejected {
            Some(err) => Err(err),
            None => Ok(acted),
        }
    }

    /// Tick until the draft completes. Returns `false` if a tick makes no
    /// progress (a seat without an agent, or a human with nothing queued),
    /// or after `max_ticks`.
    pub fn run_to_completion(
        &mut self,
        engine: &mut dyn DraftEngine,
        max_ticks: usize,
    ) -> Result<bool, DraftError> {
        for _ in 0..max_ticks {
            if matches!(engine.status(), DraftStatus::Complete) {
                return Ok(true);
            }
            if !self.on_turn(engine)? {
                return Ok(matches!(engine.status(), DraftStatus::Complete));
            }
        }
        Ok(matches!(engine.status(), DraftStatus::Complete))
    }

    /// Remove all agents.
    pub fn clear(&mut self) {
        for a in &mut self.seats {
            *a = None;
        }
        self.next_action_at = None;
    }

    fn schedule(&mut self, now: Instant) {
        if self.min_action_delay > Duration::from_millis(0) {
            self.next_action_at = Some(now + self.min_action_delay);
        }
    }
}
