//! Serializable draft state for whatever stores drafts between requests.
//!
//! A snapshot carries the seat order, every player's queues and picks, and
//! the draft's revision. The pool itself is not included; callers keep it
//! alongside and hand it back to [`Draft::restore`].

use crate::cards::Card;
use crate::draft::{Draft, DraftConfig, PickRecord, PlayerQueue, PACKS_PER_PLAYER};
use crate::pool::Pool;
use crate::seating::{PlayerId, Seating, SeatingError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error(transparent)]
    Seating(#[from] SeatingError),
    #[error("no {what} recorded for {player}")]
    MissingPlayer { player: PlayerId, what: &'static str },
    #[error("{player} has {what} but is not seated")]
    UnexpectedPlayer { player: PlayerId, what: &'static str },
    #[error("undistributed draft holds cards or picks")]
    NotDistributed,
    #[error("{player} holds {packs} sealed packs")]
    TooManyPacks { player: PlayerId, packs: usize },
    #[error("{found} packs in play, at most {limit}")]
    PackCount { limit: usize, found: usize },
    #[error("{player} holds a pack of {size} cards ({cards_per_pack} per pack)")]
    BadPackSize { player: PlayerId, size: usize, cards_per_pack: usize },
    #[error("{0} appears more often than the pool holds it")]
    DuplicateCard(Card),
    #[error("{0} is not in the pool")]
    CardNotInPool(Card),
    #[error("expected {expected} cards across queues and picks, found {found}")]
    CardCount { expected: usize, found: usize },
    #[error("snapshot json: {0}")]
    Json(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub revision: u64,
    pub config: DraftConfig,
    pub distributed: bool,
    pub player_order: Vec<PlayerId>,
    pub player_queues: BTreeMap<PlayerId, PlayerQueue>,
    pub player_picks: BTreeMap<PlayerId, Vec<PickRecord>>,
}

impl DraftSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Json(e.to_string()))
    }

    pub fn from_json(input: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(input).map_err(|e| SnapshotError::Json(e.to_string()))
    }
}

impl Draft {
    /// Copy out the current state. Reading never changes the draft.
    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            revision: self.revision,
            config: self.config.clone(),
            distributed: self.distributed,
            player_order: self.seating.player_order().to_vec(),
            player_queues: self.player_queues().map(|(p, q)| (p.clone(), q.clone())).collect(),
            player_picks: self.player_picks().map(|(p, picks)| (p.clone(), picks.to_vec())).collect(),
        }
    }

    /// Rebuild a draft from a snapshot, checking it is internally consistent.
    ///
    /// Sealed packs must be full and no more than three per player. Opened
    /// packs hold between one card and a full pack; only the pack on deck may
    /// be empty, after its last card was picked. Every queued or drafted card
    /// has to come out of `pool`, no more often than the pool holds it.
    pub fn restore(snapshot: DraftSnapshot, pool: Pool) -> Result<Self, SnapshotError> {
        let DraftSnapshot {
            revision,
            config,
            distributed,
            player_order,
            mut player_queues,
            mut player_picks,
        } = snapshot;
        let seating = Seating::try_new(player_order)?;

        let mut queues = Vec::with_capacity(seating.num_players());
        let mut picks = Vec::with_capacity(seating.num_players());
        for player in seating.player_order() {
            let queue = player_queues.remove(player).ok_or_else(|| {
                SnapshotError::MissingPlayer { player: player.clone(), what: "queues" }
            })?;
            let list = player_picks.remove(player).ok_or_else(|| {
                SnapshotError::MissingPlayer { player: player.clone(), what: "picks" }
            })?;
            queues.push(queue);
            picks.push(list);
        }
        if let Some(player) = player_queues.into_keys().next() {
            return Err(SnapshotError::UnexpectedPlayer { player, what: "queues" });
        }
        if let Some(player) = player_picks.into_keys().next() {
            return Err(SnapshotError::UnexpectedPlayer { player, what: "picks" });
        }

        let queued: usize = queues.iter().map(PlayerQueue::card_count).sum();
        let drafted: usize = picks.iter().map(Vec::len).sum();
        if !distributed {
            let untouched = queues.iter().all(PlayerQueue::is_empty) && drafted == 0;
            if !untouched {
                return Err(SnapshotError::NotDistributed);
            }
        } else {
            check_packs(&seating, &queues, config.cards_per_pack)?;
            let expected = PACKS_PER_PLAYER * seating.num_players() * config.cards_per_pack;
            if queued + drafted != expected {
                return Err(SnapshotError::CardCount { expected, found: queued + drafted });
            }
            let in_play = queues
                .iter()
                .flat_map(|q| q.opened.iter().chain(&q.unopened))
                .flat_map(|pack| pack.as_slice())
                .chain(picks.iter().flatten().map(|record| &record.drafted));
            check_cards(&pool, in_play)?;
        }

        Ok(Draft::from_parts(config, seating, pool, queues, picks, distributed, revision))
    }
}

fn check_packs(
    seating: &Seating,
    queues: &[PlayerQueue],
    cards_per_pack: usize,
) -> Result<(), SnapshotError> {
    let mut packs = 0;
    for (player, queue) in seating.player_order().iter().zip(queues) {
        if queue.unopened.len() > PACKS_PER_PLAYER {
            return Err(SnapshotError::TooManyPacks {
                player: player.clone(),
                packs: queue.unopened.len(),
            });
        }
        let bad_size =
            |size| SnapshotError::BadPackSize { player: player.clone(), size, cards_per_pack };
        for (i, pack) in queue.opened.iter().enumerate() {
            if pack.len() > cards_per_pack || (pack.is_empty() && i > 0) {
                return Err(bad_size(pack.len()));
            }
        }
        if let Some(pack) = queue.unopened.iter().find(|p| p.len() != cards_per_pack) {
            return Err(bad_size(pack.len()));
        }
        packs += queue.opened.len() + queue.unopened.len();
    }
    let limit = PACKS_PER_PLAYER * seating.num_players();
    if packs > limit {
        return Err(SnapshotError::PackCount { limit, found: packs });
    }
    Ok(())
}

/// Match cards in play against the pool, copy for copy.
fn check_cards<'a>(
    pool: &Pool,
    in_play: impl IntoIterator<Item = &'a Card>,
) -> Result<(), SnapshotError> {
    let mut remaining: HashMap<&Card, usize> = HashMap::new();
    for card in pool.cards() {
        *remaining.entry(card).or_default() += 1;
    }
    for card in in_play {
        match remaining.get_mut(card) {
            Some(0) => return Err(SnapshotError::DuplicateCard(card.clone())),
            Some(left) => *left -= 1,
            None => return Err(SnapshotError::CardNotInPool(card.clone())),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::numbered_cards;
    use crate::pool::Pack;

    fn started() -> Draft {
        let seating =
            Seating::try_new((0..3).map(|i| PlayerId::new(format!("@p{i}")))).unwrap();
        let config = DraftConfig::default().with_cards_per_pack(4).with_seed(9);
        let mut d = Draft::with_config(seating, Pool::new(numbered_cards(40)), config);
        d.distribute().unwrap();
        for p in d.player_order().to_vec() {
            d.open(&p).unwrap();
        }
        d
    }

    #[test]
    fn snapshot_is_a_pure_read() {
        let d = started();
        let rev = d.revision();
        assert_eq!(d.snapshot(), d.snapshot());
        assert_eq!(d.revision(), rev);
    }

    #[test]
    fn json_keys_are_player_handles() {
        let json = started().snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let queues = value["player_queues"].as_object().unwrap();
        assert!(queues.contains_key("@p0"));
        assert_eq!(queues["@p0"]["opened"].as_array().unwrap().len(), 1);
        assert_eq!(queues["@p0"]["unopened"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn restore_rejects_lost_cards() {
        let mut snap = started().snapshot();
        let queue = snap.player_queues.get_mut(&PlayerId::from("@p1")).unwrap();
        queue.unopened.pop_back();
        let err = Draft::restore(snap, Pool::new(numbered_cards(40))).unwrap_err();
        assert_eq!(err, SnapshotError::CardCount { expected: 36, found: 32 });
    }

    fn on_deck_mut<'a>(snap: &'a mut DraftSnapshot, player: &str) -> &'a mut Pack {
        let queue = snap.player_queues.get_mut(&PlayerId::from(player)).unwrap();
        queue.opened.front_mut().unwrap()
    }

    fn restore(snap: DraftSnapshot) -> Result<Draft, SnapshotError> {
        Draft::restore(snap, Pool::new(numbered_cards(40)))
    }

    #[test]
    fn restore_rejects_extra_sealed_packs() {
        let mut snap = started().snapshot();
        let queue = snap.player_queues.get_mut(&PlayerId::from("@p0")).unwrap();
        let sealed = queue.unopened[0].clone();
        queue.unopened.push_back(sealed.clone());
        queue.unopened.push_back(sealed);
        assert_eq!(
            restore(snap).unwrap_err(),
            SnapshotError::TooManyPacks { player: PlayerId::from("@p0"), packs: 4 }
        );
    }

    #[test]
    fn restore_rejects_stacked_packs_that_balance_the_count() {
        let seating = Seating::try_new(["@a", "@b"].map(PlayerId::from)).unwrap();
        let config = DraftConfig::default().with_cards_per_pack(3).with_randomize_packs(false);
        let mut d = Draft::with_config(seating, Pool::new(numbered_cards(18)), config);
        d.distribute().unwrap();
        d.open(&PlayerId::from("@a")).unwrap();

        let mut snap = d.snapshot();
        snap.player_queues.get_mut(&PlayerId::from("@b")).unwrap().unopened.pop_back();
        *on_deck_mut(&mut snap, "@a") = Pack::new(vec![Card::new("Card 0"); 6]);
        snap.player_queues.get_mut(&PlayerId::from("@a")).unwrap().opened.push_back(Pack::default());
        assert_eq!(
            Draft::restore(snap, Pool::new(numbered_cards(18))).unwrap_err(),
            SnapshotError::BadPackSize { player: PlayerId::from("@a"), size: 6, cards_per_pack: 3 }
        );
    }

    #[test]
    fn restore_rejects_empty_packs_behind_the_deck() {
        let mut snap = started().snapshot();
        let queue = snap.player_queues.get_mut(&PlayerId::from("@p1")).unwrap();
        queue.opened.push_back(Pack::default());
        assert_eq!(
            restore(snap).unwrap_err(),
            SnapshotError::BadPackSize { player: PlayerId::from("@p1"), size: 0, cards_per_pack: 4 }
        );

        let mut snap = started().snapshot();
        let queue = snap.player_queues.get_mut(&PlayerId::from("@p2")).unwrap();
        queue.unopened.push_back(Pack::default());
        assert_eq!(
            restore(snap).unwrap_err(),
            SnapshotError::BadPackSize { player: PlayerId::from("@p2"), size: 0, cards_per_pack: 4 }
        );
    }

    #[test]
    fn restore_rejects_cards_drafted_twice() {
        let mut d = started();
        let p0 = PlayerId::from("@p0");
        let card = d.queue(&p0).unwrap().on_deck().unwrap().as_slice()[0].clone();
        d.pick(&p0, &card).unwrap();

        let mut snap = d.snapshot();
        let pack = on_deck_mut(&mut snap, "@p1");
        let mut cards = pack.as_slice().to_vec();
        cards[0] = card.clone();
        *pack = Pack::new(cards);
        assert_eq!(restore(snap).unwrap_err(), SnapshotError::DuplicateCard(card));
    }

    #[test]
    fn restore_rejects_cards_from_elsewhere() {
        let mut snap = started().snapshot();
        let pack = on_deck_mut(&mut snap, "@p2");
        let mut cards = pack.as_slice().to_vec();
        cards[1] = Card::new("Black Lotus");
        *pack = Pack::new(cards);
        assert_eq!(
            restore(snap).unwrap_err(),
            SnapshotError::CardNotInPool(Card::new("Black Lotus"))
        );
    }

    #[test]
    fn restore_accepts_packs_waiting_mid_round() {
        let mut d = started();
        let p0 = PlayerId::from("@p0");
        let card = d.queue(&p0).unwrap().on_deck().unwrap().as_slice()[0].clone();
        d.pick_and_pass_left(&p0, &card).unwrap();
        let p1 = d.queue(&PlayerId::from("@p1")).unwrap();
        assert_eq!(p1.opened().len() + p1.unopened().len(), 4);

        let restored = restore(d.snapshot()).unwrap();
        assert_eq!(restored.snapshot(), d.snapshot());
    }

    #[test]
    fn restore_accepts_an_emptied_pack_on_deck() {
        let seating = Seating::try_new(["@a", "@b"].map(PlayerId::from)).unwrap();
        let config = DraftConfig::default().with_cards_per_pack(1).with_seed(3);
        let mut d = Draft::with_config(seating, Pool::new(numbered_cards(6)), config);
        d.distribute().unwrap();
        let a = PlayerId::from("@a");
        d.open(&a).unwrap();
        let card = d.queue(&a).unwrap().on_deck().unwrap().as_slice()[0].clone();
        d.pick(&a, &card).unwrap();
        assert!(d.queue(&a).unwrap().on_deck().unwrap().is_empty());

        let restored = Draft::restore(d.snapshot(), Pool::new(numbered_cards(6))).unwrap();
        assert_eq!(restored.cards_drafted(), 1);
    }

    #[test]
    fn restore_rejects_mismatched_players() {
        let mut snap = started().snapshot();
        let queue = snap.player_queues.remove(&PlayerId::from("@p2")).unwrap();
        snap.player_queues.insert(PlayerId::from("@ghost"), queue);
        let err = Draft::restore(snap, Pool::new(numbered_cards(40))).unwrap_err();
        assert_eq!(
            err,
            SnapshotError::MissingPlayer { player: PlayerId::from("@p2"), what: "queues" }
        );
    }

    #[test]
    fn restore_rejects_picks_before_distribution() {
        let mut snap = started().snapshot();
        snap.distributed = false;
        assert_eq!(
            Draft::restore(snap, Pool::new(numbered_cards(40))).unwrap_err(),
            SnapshotError::NotDistributed
        );
    }

    #[test]
    fn bad_json_is_reported() {
        let err = DraftSnapshot::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));
    }
}
