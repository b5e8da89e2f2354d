use crate::cards::{parse_cards, Card, CardParseError};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PoolError {
    #[error("require {required} cards ({packs} x {cards_per_pack}), have {available}")]
    InsufficientCards { required: usize, packs: usize, cards_per_pack: usize, available: usize },
    #[error("require {packs} boosters, have {available}")]
    InsufficientBoosters { packs: usize, available: usize },
    #[error("booster {index} holds {size} cards, need {cards_per_pack}")]
    BoosterTooSmall { index: usize, size: usize, cards_per_pack: usize },
    #[error("packs must hold at least one card")]
    ZeroPackSize,
    #[error(transparent)]
    InvalidCard(#[from] CardParseError),
    #[error("pool json: {0}")]
    Json(String),
}

/// An ordered run of cards still available to pick from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pack {
    cards: Vec<Card>,
}

impl Pack {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn first(&self) -> Option<&Card> {
        self.cards.first()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    /// Remove the first copy of `card`, keeping the order of the rest.
    pub(crate) fn take(&mut self, card: &Card) -> Option<Card> {
        let idx = self.cards.iter().position(|c| c == card)?;
        Some(self.cards.remove(idx))
    }
}

impl From<Vec<Card>> for Pack {
    fn from(cards: Vec<Card>) -> Self {
        Self::new(cards)
    }
}

impl FromIterator<Card> for Pack {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Pool file layout: a flat list of names, or boosters of names.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Set(Vec<String>),
    Boosters(Vec<Vec<String>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Contents {
    /// A flat card list; packs are cut from it.
    Set(Vec<Card>),
    /// Pre-made boosters, handed out whole.
    Boosters(Vec<Pack>),
}

/// Every card that could end up in this draft.
///
/// Dealing never consumes the pool: each deal works on a fresh copy of the
/// full contents, so the same pool can deal any number of times.
///
/// ```
/// use booster_draft::cards::numbered_cards;
/// use booster_draft::pool::Pool;
///
/// let pool = Pool::new(numbered_cards(45));
/// let packs = pool.deal_in_order(3, 15).unwrap();
/// assert_eq!(packs.len(), 3);
/// assert_eq!(pool.len(), 45);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    contents: Contents,
}

impl Pool {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self { contents: Contents::Set(cards.into_iter().collect()) }
    }

    pub fn from_boosters(boosters: impl IntoIterator<Item = Pack>) -> Self {
        Self { contents: Contents::Boosters(boosters.into_iter().collect()) }
    }

    /// Read a pool from text.
    ///
    /// A JSON array of names gives a flat pool and a JSON array of arrays
    /// gives boosters. Anything else is read as names separated by commas,
    /// semicolons or newlines.
    ///
    /// ```
    /// use booster_draft::pool::Pool;
    ///
    /// let boosters = Pool::parse(r#"[["Shock", "Opt"], ["Duress", "Ponder"]]"#).unwrap();
    /// assert!(boosters.is_boosters());
    /// assert_eq!(Pool::parse("Shock, Opt\nDuress").unwrap().len(), 3);
    /// ```
    pub fn parse(input: &str) -> Result<Self, PoolError> {
        if !input.trim_start().starts_with('[') {
            return Ok(Self::new(parse_cards(input)?));
        }
        let listing: Listing =
            serde_json::from_str(input).map_err(|e| PoolError::Json(e.to_string()))?;
        let pool = match listing {
            Listing::Set(names) => Self::new(parse_names(&names)?),
            Listing::Boosters(boosters) => {
                let packs = boosters
                    .iter()
                    .map(|names| parse_names(names).map(Pack::new))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::from_boosters(packs)
            }
        };
        Ok(pool)
    }

    /// Total number of cards in the pool.
    pub fn len(&self) -> usize {
        match &self.contents {
            Contents::Set(cards) => cards.len(),
            Contents::Boosters(boosters) => boosters.iter().map(Pack::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every card in the pool, booster by booster for booster pools.
    pub fn cards(&self) -> Box<dyn Iterator<Item = &Card> + '_> {
        match &self.contents {
            Contents::Set(cards) => Box::new(cards.iter()),
            Contents::Boosters(boosters) => Box::new(boosters.iter().flat_map(|b| b.as_slice())),
        }
    }

    pub fn is_boosters(&self) -> bool {
        matches!(self.contents, Contents::Boosters(_))
    }

    /// Deal packs, shuffling first when `randomize` is set.
    pub fn deal<R: Rng + ?Sized>(
        &self,
        num_packs: usize,
        cards_per_pack: usize,
        randomize: bool,
        rng: &mut R,
    ) -> Result<Vec<Pack>, PoolError> {
        if cards_per_pack == 0 {
            return Err(PoolError::ZeroPackSize);
        }
        let packs = match &self.contents {
            Contents::Set(cards) => deal_from_set(cards, num_packs, cards_per_pack, randomize, rng)?,
            Contents::Boosters(boosters) => {
                deal_from_boosters(boosters, num_packs, cards_per_pack, randomize, rng)?
            }
        };
        debug!(num_packs, cards_per_pack, randomize, "dealt packs");
        Ok(packs)
    }

    /// Cut packs from the pool in its original order.
    pub fn deal_in_order(
        &self,
        num_packs: usize,
        cards_per_pack: usize,
    ) -> Result<Vec<Pack>, PoolError> {
        // The RNG is never touched when not randomizing.
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        self.deal(num_packs, cards_per_pack, false, &mut rng)
    }

    /// Shuffle using the provided RNG, then cut packs.
    pub fn deal_shuffled<R: Rng + ?Sized>(
        &self,
        num_packs: usize,
        cards_per_pack: usize,
        rng: &mut R,
    ) -> Result<Vec<Pack>, PoolError> {
        self.deal(num_packs, cards_per_pack, true, rng)
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn deal_seeded(
        &self,
        num_packs: usize,
        cards_per_pack: usize,
        seed: u64,
    ) -> Result<Vec<Pack>, PoolError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.deal_shuffled(num_packs, cards_per_pack, &mut rng)
    }
}

fn parse_names(names: &[String]) -> Result<Vec<Card>, CardParseError> {
    names.iter().map(|name| name.parse()).collect()
}

fn deal_from_set<R: Rng + ?Sized>(
    cards: &[Card],
    num_packs: usize,
    cards_per_pack: usize,
    randomize: bool,
    rng: &mut R,
) -> Result<Vec<Pack>, PoolError> {
    let required = num_packs.saturating_mul(cards_per_pack);
    if required > cards.len() {
        return Err(PoolError::InsufficientCards {
            required,
            packs: num_packs,
            cards_per_pack,
            available: cards.len(),
        });
    }
    let mut cards = cards.to_vec();
    if randomize {
        cards.shuffle(rng);
    }
    cards.truncate(required);
    Ok(cards.chunks(cards_per_pack).map(|chunk| Pack::new(chunk.to_vec())).collect())
}

fn deal_from_boosters<R: Rng + ?Sized>(
    boosters: &[Pack],
    num_packs: usize,
    cards_per_pack: usize,
    randomize: bool,
    rng: &mut R,
) -> Result<Vec<Pack>, PoolError> {
    if num_packs > boosters.len() {
        return Err(PoolError::InsufficientBoosters {
            packs: num_packs,
            available: boosters.len(),
        });
    }
    let mut order: Vec<usize> = (0..boosters.len()).collect();
    if randomize {
        order.shuffle(rng);
    }
    order
        .into_iter()
        .take(num_packs)
        .map(|index| {
            let booster = &boosters[index];
            if booster.len() < cards_per_pack {
                return Err(PoolError::BoosterTooSmall {
                    index,
                    size: booster.len(),
                    cards_per_pack,
                });
            }
            Ok(Pack::new(booster.as_slice()[..cards_per_pack].to_vec()))
        })
        .collect()
}
