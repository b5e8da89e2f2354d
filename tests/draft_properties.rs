use booster_draft::cards::numbered_cards;
use booster_draft::draft::{Draft, DraftConfig};
use booster_draft::pool::Pool;
use booster_draft::seating::{Direction, PlayerId, Seating};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Step {
    Open(usize),
    Pick(usize, usize),
    Pass(usize, Direction),
    PickAndPass(usize, usize, Direction),
}

fn any_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Left), Just(Direction::Right)]
}

fn any_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..8).prop_map(Step::Open),
        (0usize..8, 0usize..20).prop_map(|(s, c)| Step::Pick(s, c)),
        (0usize..8, any_direction()).prop_map(|(s, d)| Step::Pass(s, d)),
        (0usize..8, 0usize..20, any_direction()).prop_map(|(s, c, d)| Step::PickAndPass(s, c, d)),
    ]
}

prop_compose! {
    fn any_draft()(n in 1usize..=6, k in 1usize..=8, seed in any::<u64>()) -> Draft {
        let seating = Seating::try_new((0..n).map(|i| PlayerId::new(format!("@p{i}")))).unwrap();
        let config = DraftConfig::default().with_cards_per_pack(k).with_seed(seed);
        let mut d = Draft::with_config(seating, Pool::new(numbered_cards(3 * n * k + 5)), config);
        d.distribute().unwrap();
        d
    }
}

fn apply(d: &mut Draft, step: Step) -> bool {
    let order = d.player_order().to_vec();
    let n = order.len();
    let player = |seat: usize| order[seat % n].clone();
    // Card indices past the end of the pack name a card that is not in it.
    let card_at = |d: &Draft, seat: usize, idx: usize| {
        d.queue_at(seat % n)
            .and_then(|q| q.on_deck())
            .and_then(|p| p.as_slice().get(idx).cloned())
            .unwrap_or_else(|| "Not In Any Pack".into())
    };
    let result = match step {
        Step::Open(s) => {
            let p = player(s);
            d.open(&p)
        }
        Step::Pick(s, c) => {
            let (p, card) = (player(s), card_at(d, s, c));
            d.pick(&p, &card)
        }
        Step::Pass(s, dir) => {
            let p = player(s);
            d.pass(&p, dir)
        }
        Step::PickAndPass(s, c, dir) => {
            let (p, card) = (player(s), card_at(d, s, c));
            d.pick_and_pass(&p, &card, dir)
        }
    };
    result.is_ok()
}

proptest! {
    #[test]
    fn cards_are_conserved(mut d in any_draft(), steps in prop::collection::vec(any_step(), 0..200)) {
        let dealt = 3 * d.num_players() * d.config().cards_per_pack;
        prop_assert_eq!(d.cards_in_queues(), dealt);
        for step in steps {
            let before = d.snapshot();
            if apply(&mut d, step) {
                prop_assert!(d.revision() > before.revision);
            } else {
                prop_assert_eq!(&d.snapshot(), &before);
            }
            prop_assert_eq!(d.cards_in_queues() + d.cards_drafted(), dealt);
        }
    }

    #[test]
    fn in_order_deal_cuts_contiguous_slices(packs in 1usize..10, k in 1usize..10, extra in 0usize..10) {
        let cards = numbered_cards(packs * k + extra);
        let dealt = Pool::new(cards.clone()).deal_in_order(packs, k).unwrap();
        prop_assert_eq!(dealt.len(), packs);
        for (i, pack) in dealt.iter().enumerate() {
            prop_assert_eq!(pack.as_slice(), &cards[i * k..(i + 1) * k]);
        }
    }

    #[test]
    fn shuffled_deal_is_a_draw_without_replacement(
        packs in 1usize..10,
        k in 1usize..10,
        extra in 0usize..10,
        seed in any::<u64>(),
    ) {
        let cards = numbered_cards(packs * k + extra);
        let pool = Pool::new(cards.clone());
        let dealt = pool.deal_seeded(packs, k, seed).unwrap();
        prop_assert_eq!(&dealt, &pool.deal_seeded(packs, k, seed).unwrap());
        let mut drawn: Vec<_> = dealt.iter().flat_map(|p| p.as_slice().iter().cloned()).collect();
        prop_assert_eq!(drawn.len(), packs * k);
        drawn.sort();
        drawn.dedup();
        prop_assert_eq!(drawn.len(), packs * k);
        prop_assert!(drawn.iter().all(|c| cards.contains(c)));
        prop_assert_eq!(pool.len(), cards.len());
    }
}
