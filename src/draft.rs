use crate::cards::Card;
use crate::pool::{Pack, Pool, PoolError};
use crate::seating::{Direction, PlayerId, Seating, SeatingError};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, info};

/// Every player opens this many packs over the course of a draft.
pub const PACKS_PER_PLAYER: usize = 3;

pub const DEFAULT_CARDS_PER_PACK: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueKind {
    Unopened,
    Opened,
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueueKind::Unopened => "unopened",
            QueueKind::Opened => "opened",
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DraftError {
    #[error("{player} has no {queue} packs")]
    EmptyQueue { player: PlayerId, queue: QueueKind },
    #[error("{card} is not in the pack {player} has on deck")]
    CardNotInPack { player: PlayerId, card: Card },
    #[error("{0} is not seated at this draft")]
    UnknownPlayer(PlayerId),
    #[error("a draft needs at least one player")]
    NoPlayers,
    #[error("packs have already been distributed")]
    AlreadyDistributed,
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Seating(#[from] SeatingError),
}

/// Knobs for a single draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct DraftConfig {
    pub cards_per_pack: usize,
    /// Shuffle the pool before cutting packs.
    pub randomize_packs: bool,
    /// Shuffle the seat order when the draft is created.
    pub randomize_seats: bool,
    /// Seed for every shuffle this draft performs; OS entropy when `None`.
    pub seed: Option<u64>,
}

impl DraftConfig {
    pub fn with_cards_per_pack(mut self, cards_per_pack: usize) -> Self {
        self.cards_per_pack = cards_per_pack;
        self
    }

    pub fn with_randomize_packs(mut self, randomize: bool) -> Self {
        self.randomize_packs = randomize;
        self
    }

    pub fn with_randomize_seats(mut self, randomize: bool) -> Self {
        self.randomize_seats = randomize;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cards a full draft deals for `num_players`.
    pub fn cards_needed(&self, num_players: usize) -> usize {
        PACKS_PER_PLAYER * num_players * self.cards_per_pack
    }

    pub(crate) fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(v) => ChaCha8Rng::seed_from_u64(v),
            None => {
                let mut seed = [0u8; 32];
                rand::rng().fill_bytes(&mut seed);
                ChaCha8Rng::from_seed(seed)
            }
        }
    }
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            cards_per_pack: DEFAULT_CARDS_PER_PACK,
            randomize_packs: true,
            randomize_seats: false,
            seed: None,
        }
    }
}

/// Packs waiting on one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerQueue {
    pub(crate) opened: VecDeque<Pack>,
    pub(crate) unopened: VecDeque<Pack>,
}

impl PlayerQueue {
    /// Packs available to pick from; the front one is on deck.
    pub fn opened(&self) -> &VecDeque<Pack> {
        &self.opened
    }

    /// Packs still sealed, opened front first.
    pub fn unopened(&self) -> &VecDeque<Pack> {
        &self.unopened
    }

    pub fn on_deck(&self) -> Option<&Pack> {
        self.opened.front()
    }

    pub fn is_empty(&self) -> bool {
        self.opened.is_empty() && self.unopened.is_empty()
    }

    /// Cards held across both queues.
    pub fn card_count(&self) -> usize {
        self.opened.iter().chain(self.unopened.iter()).map(Pack::len).sum()
    }
}

/// One pick: the card taken and what was left in the pack afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRecord {
    pub drafted: Card,
    pub passed: Pack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DraftStatus {
    Unstarted,
    /// Packs dealt, nothing opened or picked yet.
    Distributed,
    Drafting,
    Complete,
}

/// A running booster draft.
///
/// ```
/// use booster_draft::cards::numbered_cards;
/// use booster_draft::draft::{Draft, DraftConfig, DraftStatus};
/// use booster_draft::pool::Pool;
/// use booster_draft::seating::{PlayerId, Seating};
///
/// let seating = Seating::try_new(["@ann", "@bo"].map(PlayerId::from)).unwrap();
/// let config = DraftConfig::default().with_cards_per_pack(2).with_randomize_packs(false);
/// let mut draft = Draft::with_config(seating, Pool::new(numbered_cards(12)), config);
/// draft.distribute().unwrap();
///
/// let ann = PlayerId::from("@ann");
/// draft.open(&ann).unwrap();
/// let first = draft.queue(&ann).unwrap().on_deck().unwrap().as_slice()[0].clone();
/// draft.pick_and_pass_left(&ann, &first).unwrap();
/// assert_eq!(draft.status(), DraftStatus::Drafting);
/// ```
#[derive(Debug, Clone)]
pub struct Draft {
    pub(crate) config: DraftConfig,
    pub(crate) seating: Seating,
    pub(crate) pool: Pool,
    /// Indexed by seat.
    pub(crate) queues: Vec<PlayerQueue>,
    /// Indexed by seat.
    pub(crate) picks: Vec<Vec<PickRecord>>,
    pub(crate) distributed: bool,
    pub(crate) revision: u64,
    rng: ChaCha8Rng,
}

impl Draft {
    pub fn new(seating: Seating, pool: Pool) -> Self {
        Self::with_config(seating, pool, DraftConfig::default())
    }

    pub fn with_config(mut seating: Seating, pool: Pool, config: DraftConfig) -> Self {
        let mut rng = config.rng();
        seating.seat_players(config.randomize_seats, &mut rng);
        let n = seating.num_players();
        Self {
            config,
            seating,
            pool,
            queues: vec![PlayerQueue::default(); n],
            picks: vec![Vec::new(); n],
            distributed: false,
            revision: 0,
            rng,
        }
    }

    pub(crate) fn from_parts(
        config: DraftConfig,
        seating: Seating,
        pool: Pool,
        queues: Vec<PlayerQueue>,
        picks: Vec<Vec<PickRecord>>,
        distributed: bool,
        revision: u64,
    ) -> Self {
        let rng = config.rng();
        Self { config, seating, pool, queues, picks, distributed, revision, rng }
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn seating(&self) -> &Seating {
        &self.seating
    }

    pub fn num_players(&self) -> usize {
        self.seating.num_players()
    }

    pub fn player_order(&self) -> &[PlayerId] {
        self.seating.player_order()
    }

    /// Bumped on every successful mutation; storage can compare it to decide
    /// whether a draft needs saving.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_distributed(&self) -> bool {
        self.distributed
    }

    pub fn queue(&self, player: &PlayerId) -> Option<&PlayerQueue> {
        self.seating.seat_of(player).map(|seat| &self.queues[seat])
    }

    pub fn queue_at(&self, seat: usize) -> Option<&PlayerQueue> {
        self.queues.get(seat)
    }

    /// Every player's queues in seat order.
    pub fn player_queues(&self) -> impl Iterator<Item = (&PlayerId, &PlayerQueue)> + '_ {
        self.seating.player_order().iter().zip(self.queues.iter())
    }

    pub fn picks(&self, player: &PlayerId) -> Option<&[PickRecord]> {
        self.seating.seat_of(player).map(|seat| self.picks[seat].as_slice())
    }

    pub fn picks_at(&self, seat: usize) -> Option<&[PickRecord]> {
        self.picks.get(seat).map(Vec::as_slice)
    }

    /// Every player's picks in seat order.
    pub fn player_picks(&self) -> impl Iterator<Item = (&PlayerId, &[PickRecord])> + '_ {
        self.seating.player_order().iter().zip(self.picks.iter().map(Vec::as_slice))
    }

    pub fn status(&self) -> DraftStatus {
        if !self.distributed {
            DraftStatus::Unstarted
        } else if self.queues.iter().all(PlayerQueue::is_empty) {
            DraftStatus::Complete
        } else if self.picks.iter().all(Vec::is_empty)
            && self.queues.iter().all(|q| q.opened.is_empty())
        {
            DraftStatus::Distributed
        } else {
            DraftStatus::Drafting
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.status(), DraftStatus::Complete)
    }

    /// Zero-based round: how many packs the furthest-along player has
    /// opened, less one. `None` before anyone opens a pack.
    pub fn round(&self) -> Option<usize> {
        if !self.distributed {
            return None;
        }
        let opened =
            self.queues.iter().map(|q| PACKS_PER_PLAYER - q.unopened.len().min(PACKS_PER_PLAYER));
        opened.max().and_then(|n| n.checked_sub(1))
    }

    /// Cards still sitting in any queue.
    pub fn cards_in_queues(&self) -> usize {
        self.queues.iter().map(PlayerQueue::card_count).sum()
    }

    pub fn cards_drafted(&self) -> usize {
        self.picks.iter().map(Vec::len).sum()
    }

    /// Cards this draft dealt: queued plus drafted. Fixed once distributed.
    pub fn cards_dealt(&self) -> usize {
        self.cards_in_queues() + self.cards_drafted()
    }

    /// Recompute seat order and throw away all queues and picks.
    pub fn seat_players(&mut self, randomize: bool) -> &[PlayerId] {
        self.seating.seat_players(randomize, &mut self.rng);
        self.reset();
        self.seating.player_order()
    }

    /// Back to `Unstarted` with empty queues and pick lists.
    pub fn reset(&mut self) {
        let n = self.seating.num_players();
        self.queues = vec![PlayerQueue::default(); n];
        self.picks = vec![Vec::new(); n];
        self.distributed = false;
        self.bump();
        debug!(players = n, "draft reset");
    }

    /// Deal three packs per player, round-robin in seat order.
    pub fn distribute(&mut self) -> Result<(), DraftError> {
        if self.distributed {
            return Err(DraftError::AlreadyDistributed);
        }
        let n = self.seating.num_players();
        if n == 0 {
            return Err(DraftError::NoPlayers);
        }
        let packs = self.pool.deal(
            PACKS_PER_PLAYER * n,
            self.config.cards_per_pack,
            self.config.randomize_packs,
            &mut self.rng,
        )?;
        assert!(!packs.is_empty(), "pool dealt no packs for {n} players");

        // Pack r*n + i lands in seat i's queue during round r.
        for (idx, pack) in packs.into_iter().enumerate() {
            self.queues[idx % n].unopened.push_back(pack);
        }
        self.distributed = true;
        self.bump();
        info!(players = n, cards_per_pack = self.config.cards_per_pack, "packs distributed");
        Ok(())
    }

    /// Move the next sealed pack onto the player's opened queue.
    pub fn open(&mut self, player: &PlayerId) -> Result<(), DraftError> {
        let seat = self.seat(player)?;
        let queue = &mut self.queues[seat];
        let pack = queue.unopened.pop_front().ok_or_else(|| DraftError::EmptyQueue {
            player: player.clone(),
            queue: QueueKind::Unopened,
        })?;
        queue.opened.push_back(pack);
        self.bump();
        debug!(%player, "opened pack");
        Ok(())
    }

    /// Take `card` from the pack on deck. The pack stays put until passed.
    pub fn pick(&mut self, player: &PlayerId, card: &Card) -> Result<(), DraftError> {
        let seat = self.seat(player)?;
        let pack = self.queues[seat].opened.front_mut().ok_or_else(|| DraftError::EmptyQueue {
            player: player.clone(),
            queue: QueueKind::Opened,
        })?;
        let drafted = pack.take(card).ok_or_else(|| DraftError::CardNotInPack {
            player: player.clone(),
            card: card.clone(),
        })?;
        let passed = pack.clone();
        self.picks[seat].push(PickRecord { drafted, passed });
        self.bump();
        debug!(%player, %card, "picked");
        Ok(())
    }

    /// Hand the on-deck pack to the neighbor in `direction`.
    ///
    /// A pack with nothing left in it is discarded rather than passed on.
    pub fn pass(&mut self, player: &PlayerId, direction: Direction) -> Result<(), DraftError> {
        let seat = self.seat(player)?;
        let Some(target) = self.seating.neighbor(seat, direction) else {
            return Err(DraftError::UnknownPlayer(player.clone()));
        };
        let pack = self.queues[seat].opened.pop_front().ok_or_else(|| DraftError::EmptyQueue {
            player: player.clone(),
            queue: QueueKind::Opened,
        })?;
        if pack.is_empty() {
            debug!(%player, "discarded empty pack");
        } else {
            debug!(%player, direction = direction.label(), remaining = pack.len(), "passed pack");
            self.queues[target].opened.push_back(pack);
        }
        self.bump();
        if self.is_complete() {
            info!(picks = self.cards_drafted(), "draft complete");
        }
        Ok(())
    }

    pub fn pass_left(&mut self, player: &PlayerId) -> Result<(), DraftError> {
        self.pass(player, Direction::Left)
    }

    pub fn pass_right(&mut self, player: &PlayerId) -> Result<(), DraftError> {
        self.pass(player, Direction::Right)
    }

    pub fn pick_and_pass(
        &mut self,
        player: &PlayerId,
        card: &Card,
        direction: Direction,
    ) -> Result<(), DraftError> {
        self.pick(player, card)?;
        self.pass(player, direction)
    }

    pub fn pick_and_pass_left(&mut self, player: &PlayerId, card: &Card) -> Result<(), DraftError> {
        self.pick_and_pass(player, card, Direction::Left)
    }

    pub fn pick_and_pass_right(
        &mut self,
        player: &PlayerId,
        card: &Card,
    ) -> Result<(), DraftError> {
        self.pick_and_pass(player, card, Direction::Right)
    }

    fn seat(&self, player: &PlayerId) -> Result<usize, DraftError> {
        self.seating.seat_of(player).ok_or_else(|| DraftError::UnknownPlayer(player.clone()))
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
