//! Property-based tests for dice, card sets, and whole-game invariants.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

use risk_engine::cards::{evaluate_tradein, is_valid_set, set_patterns, tier_value};
use risk_engine::combat::{battle, compare_dice, resolve_attack};
use risk_engine::invariants::check_invariants;
use risk_engine::map::classic;
use risk_engine::setup::create_initial_state;
use risk_engine::*;

fn symbol() -> impl Strategy<Value = CardSymbol> {
    prop_oneof![
        Just(CardSymbol::Infantry),
        Just(CardSymbol::Cavalry),
        Just(CardSymbol::Artillery),
        Just(CardSymbol::Wildcard),
    ]
}

fn sorted_desc(mut v: Vec<u8>) -> Vec<u8> {
    v.sort_unstable_by(|a, b| b.cmp(a));
    v
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Each compared pair costs exactly one army, never more.
    #[test]
    fn prop_dice_losses_match_pairs(
        att in prop::collection::vec(1u8..=6, 1..=3),
        def in prop::collection::vec(1u8..=6, 1..=2),
    ) {
        let (al, dl) = compare_dice(&att, &def);
        prop_assert_eq!(al + dl, att.len().min(def.len()) as u32);
        prop_assert!(al as usize <= att.len());
        prop_assert!(dl as usize <= def.len());
    }

    /// Input order does not matter: dice are sorted before comparing.
    #[test]
    fn prop_dice_order_irrelevant(
        att in prop::collection::vec(1u8..=6, 1..=3),
        def in prop::collection::vec(1u8..=6, 1..=2),
    ) {
        let sorted = compare_dice(&sorted_desc(att.clone()), &sorted_desc(def.clone()));
        prop_assert_eq!(compare_dice(&att, &def), sorted);
    }

    /// Identical dice on both sides always go to the defender.
    #[test]
    fn prop_equal_dice_favor_defender(face in 1u8..=6, n in 1usize..=2) {
        let dice = vec![face; n];
        prop_assert_eq!(compare_dice(&dice, &dice), (n as u32, 0));
    }

    /// A battle always ends with one side wiped out and never adds armies.
    #[test]
    fn prop_battle_terminates(a in 0u32..60, d in 0u32..60, seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (sa, sd) = battle(a, d, &mut rng);
        prop_assert!(sa <= a && sd <= d);
        prop_assert!(sa == 0 || sd == 0);
    }

    /// Any three cards with at least one wildcard form a set; without
    /// wildcards exactly the triple and one-of-each patterns do.
    #[test]
    fn prop_set_validity(a in symbol(), b in symbol(), c in symbol()) {
        let syms = [a, b, c];
        let wild = syms.iter().filter(|s| s.is_wild()).count();
        let valid = is_valid_set(syms);
        if wild >= 1 {
            prop_assert!(valid);
        } else {
            let all_same = a == b && b == c;
            let all_diff = a != b && b != c && a != c;
            prop_assert_eq!(valid, all_same || all_diff);
        }
        prop_assert_eq!(valid, !set_patterns(syms).is_empty());
    }

    /// Escalating values never decrease from one trade to the next.
    #[test]
    fn prop_tier_monotonic(tier in 0u32..500, increment in 0u32..20) {
        let values = [4, 6, 8, 10, 12, 15];
        prop_assert!(tier_value(&values, increment, tier + 1) >= tier_value(&values, increment, tier));
    }

    /// Evaluating a trade never changes the hand it was given.
    #[test]
    fn prop_evaluate_is_pure(syms in prop::collection::vec(symbol(), 3..8), pick in prop::collection::vec(0usize..8, 3)) {
        let hand: Vec<Card> = syms.iter().enumerate()
            .map(|(i, &s)| Card { id: CardId(i as u16), symbol: s, territory: None })
            .collect();
        let before = hand.clone();
        let chosen = [CardId(pick[0] as u16), CardId(pick[1] as u16), CardId(pick[2] as u16)];
        let _ = evaluate_tradein(&hand, chosen, &TradeScoring::default(), 0);
        prop_assert_eq!(hand, before);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A single attack on the classic board never creates armies and
    /// either fails cleanly or keeps the board valid.
    #[test]
    fn prop_attack_keeps_invariants(seed in any::<u64>(), pick in 0usize..42, armies in 1u32..10) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut state = create_initial_state(Arc::new(classic().unwrap()), &names, RulesConfig::default(), &mut rng).unwrap();
        let from = TerritoryId(pick as u16);
        let Some(&to) = state.map.neighbors(from).iter()
            .find(|n| state.territory(**n).owner != state.territory(from).owner) else {
            return Ok(());
        };

        let before = state.clone();
        let total = state.total_armies();
        match resolve_attack(&mut state, from, to, armies, &mut rng) {
            Ok(result) => {
                prop_assert_eq!(state.total_armies(), total - result.attacker_losses - result.defender_losses);
                prop_assert!(check_invariants(&state).is_empty());
            }
            Err(_) => prop_assert_eq!(state.territories, before.territories),
        }
    }
}
