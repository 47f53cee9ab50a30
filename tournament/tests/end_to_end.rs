//! Full games driven through the runner with real agents.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::sync::Arc;

use risk_agents::{Agent, AgentKind, PassiveAgent};
use risk_engine::engine::Action;
use risk_engine::invariants::check_invariants;
use risk_engine::map::{classic, MapDefinition, MapGraph};
use risk_engine::setup::{create_initial_state, create_state_with_assignment};
use risk_engine::{GameEvent, GameState, Phase, PlayerId, RulesConfig};
use risk_tournament::{make_agents, run_game, run_game_observed, Lineup, RunLimits, StopReason};

fn six_island() -> Arc<MapGraph> {
    let mut def = MapDefinition::default();
    def.add_continent("Isle", 2, &["A", "B", "C", "D", "E", "F"])
        .add_border("A", "B")
        .add_border("B", "C")
        .add_border("C", "D")
        .add_border("D", "E")
        .add_border("E", "F")
        .add_border("F", "A");
    Arc::new(MapGraph::from_definition(&def).unwrap())
}

fn names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("player-{i}")).collect()
}

fn owners(state: &GameState) -> Vec<Option<PlayerId>> {
    state.territories.iter().map(|t| t.owner).collect()
}

// ════════════════════════════════════════════════════════════════════
// PASSIVE SCENARIO
// ════════════════════════════════════════════════════════════════════

#[test]
fn passive_players_never_change_the_board_and_always_draft_everything() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let assignment = [0, 1, 0, 1, 0, 1].map(PlayerId);
    let mut state = create_state_with_assignment(six_island(), &names(2), &assignment, RulesConfig::default(), &mut rng).unwrap();
    let start_owners = owners(&state);
    let start_armies = state.total_armies();

    let mut agents: Vec<Box<dyn Agent>> = vec![
        Box::new(PassiveAgent::new(PlayerId(0), 1)),
        Box::new(PassiveAgent::new(PlayerId(1), 2)),
    ];

    let mut attacks_declared = 0;
    let summary = run_game_observed(&mut state, &mut agents, &mut rng, RunLimits::rounds(3), |state, action| {
        match action {
            Action::Attack(Some(_)) => attacks_declared += 1,
            // Anything after the draft means the pool was used up.
            Action::Attack(None) | Action::Fortify(_) => {
                assert_eq!(state.player(state.current_player).pool, 0);
            }
            _ => {}
        }
        assert!(check_invariants(state).is_empty());
    })
    .unwrap();

    assert_eq!(summary.stop, StopReason::RoundLimit);
    assert_eq!(summary.rounds_completed, 3);
    assert_eq!(summary.turns, 6);
    assert_eq!(summary.rejections, 0);
    assert_eq!(attacks_declared, 0);
    assert_eq!(owners(&state), start_owners);

    // Each of the six turns ends its draft with an empty pool.
    let mut last_remaining: BTreeMap<u32, u32> = BTreeMap::new();
    for record in state.log.iter().filter(|r| r.round <= 3) {
        if let GameEvent::ArmiesDrafted { remaining, armies, .. } = record.event {
            assert_eq!(armies, 1);
            last_remaining.insert(record.turn, remaining);
        }
    }
    assert_eq!(last_remaining.len(), 6);
    assert!(last_remaining.values().all(|&r| r == 0));

    // Three territories, no continent: three armies per turn.
    assert_eq!(state.total_armies(), start_armies + 6 * 3);
    assert!(!state.log.iter().any(|r| matches!(r.event, GameEvent::AttackResolved { .. })));
}

// ════════════════════════════════════════════════════════════════════
// MIXED GAMES ON THE CLASSIC BOARD
// ════════════════════════════════════════════════════════════════════

fn play_checked(seed: u64, players: usize, lineup: &Lineup, rounds: u32) -> (GameState, risk_tournament::GameSummary) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = create_initial_state(Arc::new(classic().unwrap()), &names(players), RulesConfig::default(), &mut rng).unwrap();
    let mut agents = make_agents(lineup, players, seed);
    let total_cards = state.total_cards;

    let summary = run_game_observed(&mut state, &mut agents, &mut rng, RunLimits::rounds(rounds), |state, _| {
        let violations = check_invariants(state);
        assert!(violations.is_empty(), "{:?}", violations);
        assert_eq!(state.cards_in_play(), total_cards);
    })
    .unwrap();
    (state, summary)
}

#[test]
fn aggressive_beats_passive_on_territory() {
    let lineup = Lineup::Custom(vec![AgentKind::Aggressive, AgentKind::Passive]);
    let (state, summary) = play_checked(21, 2, &lineup, 15);

    assert!(state.territory_count(PlayerId(0)) > state.territory_count(PlayerId(1)) || state.player(PlayerId(1)).eliminated);
    assert_eq!(summary.leader().map(|s| s.player), Some(PlayerId(0)));
    assert!(state.log.iter().any(|r| matches!(r.event, GameEvent::TerritoryOccupied { .. } | GameEvent::AttackResolved { conquered: true, .. })));
}

#[test]
fn random_agents_keep_the_engine_consistent() {
    for seed in 0..5 {
        let (_, summary) = play_checked(seed, 4, &Lineup::Uniform(AgentKind::Random), 20);
        assert!(summary.decisions > 0);
    }
}

#[test]
fn mixed_six_player_games_run_clean() {
    for seed in 100..103 {
        let (state, summary) = play_checked(seed, 6, &Lineup::Mixed, 25);
        assert_eq!(summary.standings.len(), 6);
        let board: usize = summary.standings.iter().map(|s| s.territories).sum();
        assert_eq!(board, state.map.territory_count());
    }
}

#[test]
fn aggressive_table_runs_to_a_stop() {
    let (state, summary) = play_checked(5, 3, &Lineup::Uniform(AgentKind::Aggressive), 200);
    let eliminated = state.players.iter().filter(|p| p.eliminated).count();
    if summary.stop == StopReason::LastPlayerStanding {
        assert_eq!(state.alive_players().len(), 1);
        assert_eq!(eliminated, 2);
    }
    assert!(state.log.iter().any(|r| r.phase == Phase::Attack));
}

// ════════════════════════════════════════════════════════════════════
// DETERMINISM
// ════════════════════════════════════════════════════════════════════

#[test]
fn same_seed_same_game() {
    let run = |seed| {
        let (state, summary) = play_checked(seed, 3, &Lineup::Mixed, 12);
        (serde_json::to_string(&state.log).unwrap(), summary.decisions, owners(&state))
    };
    assert_eq!(run(77), run(77));
}

#[test]
fn missing_seat_is_an_error() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut state = create_initial_state(six_island(), &names(2), RulesConfig::default(), &mut rng).unwrap();
    let mut agents: Vec<Box<dyn Agent>> = vec![Box::new(PassiveAgent::new(PlayerId(0), 0))];
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let err = run_game(&mut state, &mut agents, &mut rng, RunLimits::rounds(2));
    assert!(matches!(err, Err(risk_tournament::RunError::MissingAgent(PlayerId(1)))));
}
