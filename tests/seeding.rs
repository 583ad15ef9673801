//! Integration tests for knockout seeding and round naming.

use fls_tournament_web::logic::{
    generate_knockout_bracket, pair_round, seed_knockout, stage_name, total_playoff_rounds, DRAWN_FIRST_ID,
    SEEDED_FIRST_ID,
};
use fls_tournament_web::models::{TeamStats, TournamentError, BYE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;

fn names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("T{i}")).collect()
}

fn stats(name: &str, group: Option<char>, points: u32) -> TeamStats {
    let mut row = TeamStats::new(name, group);
    row.points = points;
    row
}

fn entrants(bracket: &[fls_tournament_web::GameMatch]) -> BTreeSet<String> {
    bracket
        .iter()
        .flat_map(|m| [m.home.clone(), m.away.clone()])
        .filter(|t| t != BYE)
        .collect()
}

#[test]
fn playoff_rounds_and_names() {
    assert_eq!(total_playoff_rounds(1), 0);
    assert_eq!(total_playoff_rounds(2), 1);
    assert_eq!(total_playoff_rounds(6), 3);
    assert_eq!(total_playoff_rounds(8), 3);
    assert_eq!(total_playoff_rounds(16), 4);

    assert_eq!(stage_name(3, 3), "Final");
    assert_eq!(stage_name(2, 3), "Semi-finals");
    assert_eq!(stage_name(1, 3), "Quarter-finals");
    assert_eq!(stage_name(1, 4), "Round of 16");
    assert_eq!(stage_name(5, 4), "Round 5");
}

#[test]
fn odd_team_out_gets_a_bye() {
    let round = pair_round(&names(5), 2, 10);
    assert_eq!(round.len(), 3);
    assert_eq!(round.iter().map(|m| m.id).collect::<Vec<_>>(), vec![10, 11, 12]);
    assert!(round.iter().all(|m| m.round == Some(2)));
    assert!(round[2].is_bye());
    assert_eq!(round[2].home, "T5");
    assert_eq!(round[2].winner(), Some("T5"));
}

#[test]
fn drawn_bracket_uses_every_team_once() {
    let teams = names(8);
    let bracket = generate_knockout_bracket(&teams, &mut StdRng::seed_from_u64(3));
    assert_eq!(bracket.len(), 4);
    assert_eq!(bracket[0].id, DRAWN_FIRST_ID);
    assert!(bracket.iter().all(|m| m.round == Some(1) && !m.is_bye()));
    assert_eq!(entrants(&bracket), teams.into_iter().collect());
}

#[test]
fn ungrouped_table_sends_the_top_teams() {
    let ranked: Vec<TeamStats> = (1..=6).map(|i| stats(&format!("T{i}"), None, 20 - i)).collect();
    let bracket = seed_knockout(&ranked, 4, false, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(bracket.len(), 2);
    assert_eq!(bracket[0].id, SEEDED_FIRST_ID);
    assert_eq!(entrants(&bracket), names(4).into_iter().collect());
}

#[test]
fn groups_send_winners_runners_up_and_best_thirds() {
    // Three groups of three, in standings order within each group.
    let ranked = vec![
        stats("A1", Some('A'), 6),
        stats("A2", Some('A'), 3),
        stats("A3", Some('A'), 2),
        stats("B1", Some('B'), 6),
        stats("B2", Some('B'), 3),
        stats("B3", Some('B'), 0),
        stats("C1", Some('C'), 6),
        stats("C2", Some('C'), 3),
        stats("C3", Some('C'), 1),
    ];
    let bracket = seed_knockout(&ranked, 8, true, &mut StdRng::seed_from_u64(9)).unwrap();
    assert_eq!(bracket.len(), 4);
    let expected: BTreeSet<String> = ["A1", "A2", "A3", "B1", "B2", "C1", "C2", "C3"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(entrants(&bracket), expected);

    let without_thirds = seed_knockout(&ranked, 8, false, &mut StdRng::seed_from_u64(9)).unwrap();
    assert_eq!(without_thirds.len(), 3);
    assert!(!entrants(&without_thirds).contains("A3"));
}

#[test]
fn not_enough_ranked_teams_is_a_configuration_error() {
    let ranked = vec![stats("A", None, 3), stats("B", None, 0)];
    assert!(matches!(
        seed_knockout(&ranked, 4, false, &mut StdRng::seed_from_u64(0)),
        Err(TournamentError::ConfigurationError(_))
    ));
}
