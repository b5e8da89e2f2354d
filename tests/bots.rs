use booster_draft::agents::{AgentTable, BotProfile, HumanAgent, PickStyle};
use booster_draft::cards::numbered_cards;
use booster_draft::draft::{Draft, DraftConfig, DraftStatus};
use booster_draft::engine::DraftEngine;
use booster_draft::pool::Pool;
use booster_draft::seating::{PlayerId, Seating};
use std::collections::BTreeSet;

fn mk_draft(n: usize, k: usize, seed: u64) -> Draft {
    let seating = Seating::try_new((0..n).map(|i| PlayerId::new(format!("@p{i}")))).unwrap();
    let config = DraftConfig::default().with_cards_per_pack(k).with_seed(seed);
    let mut d = Draft::with_config(seating, Pool::new(numbered_cards(3 * n * k)), config);
    d.distribute().unwrap();
    d
}

#[test]
fn all_bot_draft_completes() {
    for style in [PickStyle::First, PickStyle::Random, PickStyle::Collector] {
        let (n, k) = (8, 15);
        let mut d = mk_draft(n, k, 4);
        let mut table = AgentTable::all_bots(n, &BotProfile::for_style(style).with_seed(4));
        assert!(table.run_to_completion(&mut d, 1000).unwrap(), "{style:?} stalled");
        assert_eq!(d.status(), DraftStatus::Complete);
        assert!(d.player_picks().all(|(_, picks)| picks.len() == 3 * k));

        let drafted: BTreeSet<_> =
            d.player_picks().flat_map(|(_, picks)| picks.iter().map(|r| r.drafted.clone())).collect();
        assert_eq!(drafted.len(), 3 * n * k, "every card drafted exactly once");
    }
}

#[test]
fn seeded_tables_draft_identically() {
    let profile = BotProfile::for_style(PickStyle::Random).with_seed(99);
    let mut a = mk_draft(5, 6, 7);
    let mut b = mk_draft(5, 6, 7);
    AgentTable::all_bots(5, &profile).run_to_completion(&mut a, 500).unwrap();
    AgentTable::all_bots(5, &profile).run_to_completion(&mut b, 500).unwrap();
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn rounds_alternate_pass_direction() {
    let (n, k) = (3, 2);
    let mut d = mk_draft(n, k, 1);
    let mut table = AgentTable::all_bots(n, &BotProfile::for_style(PickStyle::First));
    // Round 0: open, then two picks per seat passing left.
    for _ in 0..3 {
        table.on_turn(&mut d).unwrap();
    }
    assert!(d.between_rounds());
    assert_eq!(d.round(), Some(0));
    table.on_turn(&mut d).unwrap();
    assert_eq!(d.round(), Some(1));

    // Passing right, seat 0 is handed what seat 1 left behind.
    table.on_turn(&mut d).unwrap();
    assert_eq!(d.picks_at(0).unwrap().len(), 3);
    let from_seat1 = &d.picks_at(1).unwrap()[2].passed;
    assert_eq!(d.queue_at(0).unwrap().on_deck(), Some(from_seat1));
    assert_eq!(d.queue_at(2).unwrap().opened().len(), 1);
}

#[test]
fn stalled_human_stops_the_run() {
    let mut d = mk_draft(2, 3, 2);
    let mut table = AgentTable::all_bots(2, &BotProfile::for_style(PickStyle::First));
    table.set_agent(0, Some(Box::new(HumanAgent::new())));
    assert!(!table.run_to_completion(&mut d, 100).unwrap());
    assert_ne!(d.status(), DraftStatus::Complete);
    assert!(d.picks_at(0).unwrap().is_empty());
}
