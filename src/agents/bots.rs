use crate::cards::Card;
use crate::engine::DraftEngine;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::time::{Duration, Instant};

use super::{AgentKind, DraftAgent};

/// How a bot chooses from the pack on deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PickStyle {
    /// Always the first card; every pack "wheels" predictably.
    First,
    /// Uniformly random card.
    Random,
    /// Prefer cards whose name shares a first word with an earlier pick,
    /// falling back to random.
    Collector,
}

impl PickStyle {
    pub fn label(self) -> &'static str {
        match self {
            PickStyle::First => "First",
            PickStyle::Random => "Random",
            PickStyle::Collector => "Collector",
        }
    }

    pub fn next(self) -> Self {
        match self {
            PickStyle::First => PickStyle::Random,
            PickStyle::Random => PickStyle::Collector,
            PickStyle::Collector => PickStyle::First,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            PickStyle::First => PickStyle::Collector,
            PickStyle::Random => PickStyle::First,
            PickStyle::Collector => PickStyle::Random,
        }
    }
}

/// Configuration for a bot's pick style and pacing.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct BotProfile {
    pub style: PickStyle,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub rng_seed: Option<u64>,
}

impl BotProfile {
    pub fn for_style(style: PickStyle) -> Self {
        Self { style, min_delay_ms: 0, max_delay_ms: 0, rng_seed: None }
    }

    /// Set a deterministic RNG seed for reproducible picks.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_delay_ms(mut self, min: u64, max: u64) -> Self {
        self.min_delay_ms = min;
        self.max_delay_ms = max;
        self
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        Self::for_style(PickStyle::Random)
    }
}

#[derive(Debug)]
struct BotState {
    rng: StdRng,
}

impl BotState {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(v) => StdRng::seed_from_u64(v),
            None => {
                let mut seed = [0u8; 32];
                rand::rng().fill_bytes(&mut seed);
                StdRng::from_seed(seed)
            }
        };
        Self { rng }
    }
}

#[derive(Debug)]
pub struct BotAgent {
    profile: BotProfile,
    state: BotState,
    next_action_at: Option<Instant>,
}

impl BotAgent {
    pub fn new(profile: BotProfile) -> Self {
        let state = BotState::new(profile.rng_seed);
        Self { profile, state, next_action_at: None }
    }
}

impl DraftAgent for BotAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }

    fn choose(&mut self, engine: &dyn DraftEngine, seat: usize) -> Option<Card> {
        let pack = engine.on_deck(seat)?;
        if pack.is_empty() {
            return None;
        }
        let now = Instant::now();
        let delay = choose_delay_ms(&self.profile, &mut self.state);
        if delay > 0 {
            match self.next_action_at {
                None => {
                    self.next_action_at = Some(now + Duration::from_millis(delay));
                    return None;
                }
                Some(next) if now < next => return None,
                Some(_) => {}
            }
        }
        self.next_action_at = None;

        let cards = pack.as_slice();
        let idx = match self.profile.style {
            PickStyle::First => 0,
            PickStyle::Random => self.state.rng.random_range(0..cards.len()),
            PickStyle::Collector => {
                let taken: Vec<&str> =
                    engine.picks_at(seat).iter().filter_map(|p| first_word(&p.drafted)).collect();
                cards
                    .iter()
                    .position(|c| first_word(c).is_some_and(|w| taken.contains(&w)))
                    .unwrap_or_else(|| self.state.rng.random_range(0..cards.len()))
            }
        };
        cards.get(idx).cloned()
    }
}

fn first_word(card: &Card) -> Option<&str> {
    card.name().split_whitespace().next()
}

fn choose_delay_ms(profile: &BotProfile, state: &mut BotState) -> u64 {
    let min = profile.min_delay_ms;
    let max = profile.max_delay_ms.max(min);
    if max == min {
        min
    } else {
        state.rng.random_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::numbered_cards;
    use crate::draft::{Draft, DraftConfig};
    use crate::pool::Pool;
    use crate::seating::{PlayerId, Seating};
    use std::thread;

    fn opened_draft(cards: Vec<Card>, per_pack: usize) -> (Draft, PlayerId) {
        let p0 = PlayerId::from("@p0");
        let seating = Seating::try_new([p0.clone()]).unwrap();
        let config =
            DraftConfig::default().with_cards_per_pack(per_pack).with_randomize_packs(false);
        let mut d = Draft::with_config(seating, Pool::new(cards), config);
        d.distribute().unwrap();
        d.open(&p0).unwrap();
        (d, p0)
    }

    #[test]
    fn first_style_takes_the_top_card() {
        let (d, _) = opened_draft(numbered_cards(15), 5);
        let mut bot = BotAgent::new(BotProfile::for_style(PickStyle::First));
        assert_eq!(bot.choose(&d, 0), Some(Card::new("Card 0")));
    }

    #[test]
    fn seeded_random_bots_agree() {
        let (d, _) = opened_draft(numbered_cards(30), 10);
        let profile = BotProfile::for_style(PickStyle::Random).with_seed(5);
        let mut a = BotAgent::new(profile.clone());
        let mut b = BotAgent::new(profile);
        let pick = a.choose(&d, 0).unwrap();
        assert_eq!(b.choose(&d, 0), Some(pick.clone()));
        assert!(d.queue_at(0).unwrap().on_deck().unwrap().contains(&pick));
    }

    #[test]
    fn collector_follows_earlier_picks() {
        let names = [
            "Goblin Guide", "Elvish Mystic", "Goblin Bushwhacker", "Shock", "Opt", "Brainstorm",
        ];
        let cards: Vec<Card> = names.iter().map(|n| Card::new(*n)).collect();
        let (mut d, p0) = opened_draft(cards, 2);
        d.pick(&p0, &Card::new("Goblin Guide")).unwrap();
        d.pass_left(&p0).unwrap();
        d.open(&p0).unwrap();
        // Rotate the leftover Elvish Mystic behind the freshly opened pack.
        d.pass_left(&p0).unwrap();
        let mut bot = BotAgent::new(BotProfile::for_style(PickStyle::Collector).with_seed(1));
        assert_eq!(bot.choose(&d, 0), Some(Card::new("Goblin Bushwhacker")));
    }

    #[test]
    fn delay_defers_the_pick() {
        let (d, _) = opened_draft(numbered_cards(15), 5);
        let profile = BotProfile::for_style(PickStyle::First).with_delay_ms(15, 15);
        let mut bot = BotAgent::new(profile);
        assert_eq!(bot.choose(&d, 0), None, "first call only schedules");
        thread::sleep(Duration::from_millis(20));
        assert_eq!(bot.choose(&d, 0), Some(Card::new("Card 0")));
    }

    #[test]
    fn style_cycles_both_ways() {
        let mut style = PickStyle::First;
        for _ in 0..3 {
            style = style.next();
        }
        assert_eq!(style, PickStyle::First);
        assert_eq!(PickStyle::First.prev().next(), PickStyle::First);
    }
}
