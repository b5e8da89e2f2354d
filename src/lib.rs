//! booster-draft: a booster draft state machine
//!
//! Goals:
//! - Deterministic dealing and passing, with an injectable RNG
//! - Small, well-documented public API
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! A [`pool::Pool`] of cards is dealt into packs, three per player. Each
//! player opens a pack, drafts one card and passes the rest to a neighbor
//! until every pack is empty.
//!
//! ## Quick start: draft one pick
//! ```
//! use booster_draft::cards::numbered_cards;
//! use booster_draft::draft::{Draft, DraftConfig};
//! use booster_draft::pool::Pool;
//! use booster_draft::seating::{PlayerId, Seating};
//!
//! let players = ["@ann", "@bo"].map(PlayerId::from);
//! let seating = Seating::try_new(players.clone()).unwrap();
//! let config = DraftConfig::default().with_cards_per_pack(5).with_randomize_packs(false);
//! let mut draft = Draft::with_config(seating, Pool::new(numbered_cards(30)), config);
//!
//! draft.distribute().unwrap();
//! draft.open(&players[0]).unwrap();
//! let card = draft.queue(&players[0]).unwrap().on_deck().unwrap().as_slice()[2].clone();
//! draft.pick_and_pass_left(&players[0], &card).unwrap();
//!
//! assert_eq!(draft.picks(&players[0]).unwrap()[0].drafted, card);
//! assert_eq!(draft.queue(&players[1]).unwrap().opened().len(), 1);
//! ```
//!
//! ## TUI
//! Run the interactive TUI with:
//! ```sh
//! cargo run --bin booster-draft
//! ```
//! or simulate an all-bot draft with `--headless`.

pub mod agents;
pub mod cards;
pub mod draft;
pub mod engine;
pub mod pool;
pub mod seating;
pub mod snapshot;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
