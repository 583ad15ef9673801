//! Integration tests for whole tournaments: phase transitions from selection to champion.

use fls_tournament_web::{
    active_matches, advance_phase, builtin_catalog, champion, confirm_teams, league_tables, select_competition,
    set_selected_teams, submit_score, tournament_view, Competition, GameMatch, MatchId, Phase, Tournament,
    TournamentError,
};
use serde_json::json;
use std::collections::BTreeSet;

fn competition(value: serde_json::Value) -> Competition {
    serde_json::from_value(value).unwrap()
}

fn started(value: serde_json::Value) -> Tournament {
    let mut t = Tournament::new();
    select_competition(&mut t, competition(value)).unwrap();
    t
}

fn names(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix}{i}")).collect()
}

/// Submit a score for every open match, computed from the match.
fn enter_scores(t: &mut Tournament, score: impl Fn(&GameMatch) -> (u32, u32)) {
    let entries: Vec<(MatchId, u32, u32)> = active_matches(t)
        .into_iter()
        .map(|m| {
            let (home, away) = score(m);
            (m.id, home, away)
        })
        .collect();
    for (id, home, away) in entries {
        submit_score(t, id, home, away).unwrap();
    }
}

fn play_round(t: &mut Tournament, score: impl Fn(&GameMatch) -> (u32, u32)) {
    enter_scores(t, score);
    advance_phase(t).unwrap();
}

fn home_wins(_: &GameMatch) -> (u32, u32) {
    (2, 1)
}

/// The alphabetically earlier team always wins 1-0.
fn earlier_name_wins(m: &GameMatch) -> (u32, u32) {
    if m.home < m.away {
        (1, 0)
    } else {
        (0, 1)
    }
}

fn active_teams(t: &Tournament) -> BTreeSet<String> {
    active_matches(t)
        .into_iter()
        .flat_map(|m| [m.home.clone(), m.away.clone()])
        .collect()
}

#[test]
fn league_runs_from_pre_season_to_champion() {
    let mut t = started(json!({
        "id": "mini", "name": "Mini League", "format": "league", "repetitions": 1,
        "teamCount": 4, "teams": ["A", "B", "C", "D"]
    }));
    assert_eq!(t.phase, Phase::League);
    assert_eq!(t.round, 0);
    assert_eq!(t.fixtures.len(), 6);
    assert!(active_matches(&t).is_empty());

    advance_phase(&mut t).unwrap();
    assert_eq!(t.round, 1);
    assert_eq!(active_matches(&t).len(), 2);

    for _ in 0..3 {
        play_round(&mut t, home_wins);
    }
    assert_eq!(t.phase, Phase::Finished);
    assert!(t.fixtures.iter().all(GameMatch::is_played));
    assert!(t.scores.is_empty());

    let tables = league_tables(&t);
    let table = &tables[0];
    assert_eq!(table[0].name, "A");
    assert_eq!(table[0].points, 9);
    let winner = champion(&t).unwrap();
    assert_eq!((winner.name.as_str(), winner.title.as_str()), ("A", "Champion"));
}

#[test]
fn missing_score_blocks_the_round_without_changes() {
    let mut t = started(json!({
        "id": "mini", "name": "Mini League", "format": "league", "repetitions": 1,
        "teamCount": 4, "teams": ["A", "B", "C", "D"]
    }));
    advance_phase(&mut t).unwrap();
    let first = active_matches(&t)[0].id;
    submit_score(&mut t, first, 1, 1).unwrap();

    let before = t.clone();
    assert_eq!(advance_phase(&mut t), Err(TournamentError::IncompleteInput));
    assert_eq!(t, before);
    assert!(t.fixtures.iter().all(|m| !m.is_played()));
}

#[test]
fn scores_only_for_open_matches_and_in_range() {
    let mut t = started(json!({
        "id": "mini", "name": "Mini League", "format": "league", "repetitions": 1,
        "teamCount": 4, "teams": ["A", "B", "C", "D"]
    }));
    // Pre-season: nothing open yet.
    assert_eq!(submit_score(&mut t, 1, 1, 0), Err(TournamentError::MatchNotFound(1)));

    advance_phase(&mut t).unwrap();
    let later = t.fixtures.iter().find(|m| m.round == Some(3)).unwrap().id;
    assert_eq!(submit_score(&mut t, later, 1, 0), Err(TournamentError::MatchNotFound(later)));

    let open = active_matches(&t)[0].id;
    submit_score(&mut t, open, 15, 0).unwrap();
    assert_eq!((t.scores[&open].home, t.scores[&open].away), (15, 0));

    // A too-high score is refused and the previous entry stays.
    assert_eq!(
        submit_score(&mut t, open, 20, 16),
        Err(TournamentError::ScoreOutOfRange { home: 20, away: 16 })
    );
    assert_eq!((t.scores[&open].home, t.scores[&open].away), (15, 0));
}

#[test]
fn out_of_range_knockout_score_is_not_turned_into_a_draw() {
    let mut t = started(json!({
        "id": "cup", "name": "Cup", "format": "knockout", "teamCount": 2, "teams": ["A", "B"]
    }));
    let id = active_matches(&t)[0].id;
    assert!(matches!(
        submit_score(&mut t, id, 20, 16),
        Err(TournamentError::ScoreOutOfRange { .. })
    ));
    assert!(t.scores.is_empty());
    assert_eq!(advance_phase(&mut t), Err(TournamentError::IncompleteInput));
}

#[test]
fn eight_team_knockout_has_three_rounds() {
    let mut t = started(json!({
        "id": "cup", "name": "Cup", "format": "knockout", "teamCount": 8, "teams": names("K", 8)
    }));
    assert_eq!(t.phase, Phase::Knockout);
    assert_eq!(t.playoff_round, 1);

    let view = serde_json::to_value(tournament_view(&t)).unwrap();
    assert_eq!(view["stage"], "knockout");
    assert_eq!(view["stageName"], "Quarter-finals");
    assert_eq!(view["totalRounds"], 3);

    let mut expected_matches = 4;
    for round in 1..=3 {
        assert_eq!(t.playoff_round, round);
        let open: Vec<GameMatch> = active_matches(&t).into_iter().cloned().collect();
        assert_eq!(open.len(), expected_matches);
        let winners: BTreeSet<String> = open.iter().map(|m| m.home.clone()).collect();

        play_round(&mut t, home_wins);
        if round < 3 {
            assert_eq!(active_teams(&t), winners, "only winners go through");
        }
        expected_matches /= 2;
    }

    assert_eq!(t.phase, Phase::Finished);
    let final_match = t.bracket.last().unwrap();
    assert_eq!(final_match.round, Some(3));
    let winner = champion(&t).unwrap();
    assert_eq!(winner.name, final_match.home);
    assert_eq!(winner.title, "Champion");
}

#[test]
fn drawn_knockout_match_is_refused() {
    let mut t = started(json!({
        "id": "cup", "name": "Cup", "format": "knockout", "teamCount": 4, "teams": names("K", 4)
    }));
    enter_scores(&mut t, |_| (1, 1));
    let before = t.clone();
    assert!(matches!(advance_phase(&mut t), Err(TournamentError::InvalidOutcome { .. })));
    assert_eq!(t, before);
}

#[test]
fn six_team_knockout_uses_byes() {
    let mut t = started(json!({
        "id": "cup6", "name": "Cup of Six", "format": "knockout", "teamCount": 6, "teams": names("K", 6)
    }));
    assert_eq!(active_matches(&t).len(), 3);
    play_round(&mut t, home_wins);

    // Three winners: one match and one bye.
    assert_eq!(t.playoff_round, 2);
    let round_2: Vec<&GameMatch> = t.bracket.iter().filter(|m| m.round == Some(2)).collect();
    assert_eq!(round_2.len(), 2);
    assert_eq!(round_2.iter().filter(|m| m.is_bye()).count(), 1);
    assert_eq!(active_matches(&t).len(), 1);

    play_round(&mut t, home_wins);
    assert_eq!(t.playoff_round, 3);
    assert_eq!(active_matches(&t).len(), 1);

    play_round(&mut t, home_wins);
    assert_eq!(t.phase, Phase::Finished);
    assert!(champion(&t).is_some());
}

#[test]
fn qualifying_appends_the_top_two_of_each_group() {
    let mut t = started(json!({
        "id": "cl", "name": "Continental League", "format": "league", "repetitions": 1,
        "teamCount": 8, "teams": ["D1", "D2", "D3", "D4"],
        "qualifying": { "pool": names("Q", 8), "groups": 2, "advance": 2 }
    }));
    assert_eq!(t.phase, Phase::Qualifying);
    assert_eq!(t.qualifying_round, 1);
    assert_eq!(t.qualifying_fixtures.len(), 24);

    for _ in 0..6 {
        assert_eq!(t.phase, Phase::Qualifying);
        assert_eq!(active_matches(&t).len(), 4);
        play_round(&mut t, earlier_name_wins);
    }

    assert_eq!(t.phase, Phase::League);
    assert_eq!(t.round, 0);
    assert!(t.teams_confirmed);
    let comp = t.selected_comp.as_ref().unwrap();
    assert_eq!(comp.teams.len(), 8);
    assert_eq!(&comp.teams[..4], &["D1", "D2", "D3", "D4"]);

    let qualifiers = &comp.teams[4..];
    let groups: BTreeSet<char> = qualifiers
        .iter()
        .map(|q| t.qualifying_fixtures.iter().find(|m| m.involves(q)).unwrap().group.unwrap())
        .collect();
    assert_eq!(groups, BTreeSet::from(['A', 'B']));
    assert_eq!(t.fixtures.len(), 28);
}

#[test]
fn qualifying_fills_an_empty_team_list() {
    let mut t = started(json!({
        "id": "open", "name": "Open League", "format": "league", "repetitions": 1,
        "teamCount": 4, "teams": [],
        "qualifying": { "pool": names("Q", 8), "groups": 2, "advance": 2 }
    }));
    while t.phase == Phase::Qualifying {
        play_round(&mut t, earlier_name_wins);
    }
    let comp = t.selected_comp.as_ref().unwrap();
    assert_eq!(comp.teams.len(), 4);
    assert_eq!(t.actual_teams(), comp.teams);
    assert_eq!(t.phase, Phase::League);
}

#[test]
fn league_playoffs_decide_the_winner() {
    let mut t = started(json!({
        "id": "d2", "name": "Second Division", "format": "league", "repetitions": 1,
        "leaguePlayoffs": { "positions": "3-6", "winners": 1 },
        "teamCount": 6, "teams": names("T", 6)
    }));
    advance_phase(&mut t).unwrap();
    while t.phase == Phase::League {
        play_round(&mut t, earlier_name_wins);
    }
    assert_eq!(t.phase, Phase::LeaguePlayoffs);

    let semis: Vec<(&str, &str)> = t
        .league_playoff_bracket
        .iter()
        .map(|m| (m.home.as_str(), m.away.as_str()))
        .collect();
    assert_eq!(semis, vec![("T3", "T6"), ("T4", "T5")]);

    enter_scores(&mut t, |_| (0, 0));
    assert!(matches!(advance_phase(&mut t), Err(TournamentError::InvalidOutcome { .. })));
    assert_eq!(t.league_playoff_round, 0);

    play_round(&mut t, |_| (3, 0));
    assert_eq!(t.league_playoff_round, 1);
    let final_match = t.league_playoff_bracket.last().unwrap();
    assert_eq!((final_match.home.as_str(), final_match.away.as_str()), ("T3", "T4"));
    assert_eq!(final_match.id, 3002);

    play_round(&mut t, |_| (0, 1));
    assert_eq!(t.phase, Phase::Knockout);
    let view = serde_json::to_value(tournament_view(&t)).unwrap();
    assert_eq!(view["stageName"], "Playoff Final");

    advance_phase(&mut t).unwrap();
    assert_eq!(t.phase, Phase::Finished);
    let winner = champion(&t).unwrap();
    assert_eq!((winner.name.as_str(), winner.title.as_str()), ("T4", "Playoff Winner"));
}

#[test]
fn mixed_format_goes_from_groups_to_knockout() {
    let mut t = started(json!({
        "id": "mini-cup", "name": "Mini World Cup", "format": "mixed", "groupCount": 2, "repetitions": 1,
        "playoffTeams": 4, "teamCount": 8, "teams": names("W", 8)
    }));
    assert_eq!(t.fixtures.len(), 12);
    assert!(t.fixtures.iter().all(|m| m.group.is_some()));

    advance_phase(&mut t).unwrap();
    while t.phase == Phase::League {
        play_round(&mut t, earlier_name_wins);
    }
    assert_eq!(t.phase, Phase::Knockout);
    assert_eq!(t.playoff_round, 1);
    assert_eq!(t.bracket.len(), 2);
    assert_eq!(t.bracket[0].id, 1001);

    let tables = league_tables(&t);
    assert_eq!(tables.len(), 2);
    let expected: BTreeSet<String> = tables
        .iter()
        .flat_map(|table| table.iter().take(2).map(|row| row.name.clone()))
        .collect();
    assert_eq!(active_teams(&t), expected);

    play_round(&mut t, home_wins);
    play_round(&mut t, home_wins);
    assert_eq!(t.phase, Phase::Finished);
    assert!(champion(&t).is_some());
}

#[test]
fn team_selection_needs_exact_distinct_teams() {
    let mut t = started(json!({
        "id": "five", "name": "Five-a-side", "format": "league", "repetitions": 1,
        "teamCount": 4, "teams": []
    }));
    assert_eq!(t.phase, Phase::TeamSelection);

    set_selected_teams(&mut t, vec!["A".into(), "B".into(), " ".into(), "C".into()]).unwrap();
    assert_eq!(t.selected_teams.len(), 3);
    assert!(matches!(confirm_teams(&mut t), Err(TournamentError::ConfigurationError(_))));

    set_selected_teams(&mut t, vec!["A".into(), "B".into(), "C".into(), "A".into()]).unwrap();
    assert!(matches!(confirm_teams(&mut t), Err(TournamentError::ConfigurationError(_))));
    assert_eq!(t.phase, Phase::TeamSelection);

    set_selected_teams(&mut t, vec!["A".into(), "B".into(), "C".into(), "D".into()]).unwrap();
    confirm_teams(&mut t).unwrap();
    assert_eq!(t.phase, Phase::League);
    assert!(t.teams_confirmed);
    assert_eq!(t.actual_teams(), vec!["A", "B", "C", "D"]);
    assert_eq!(t.fixtures.len(), 6);
}

#[test]
fn actions_outside_their_phase_are_refused() {
    let mut t = Tournament::new();
    assert_eq!(advance_phase(&mut t), Err(TournamentError::InvalidState));
    assert_eq!(confirm_teams(&mut t), Err(TournamentError::InvalidState));

    let comp = competition(json!({
        "id": "mini", "name": "Mini", "format": "league", "teamCount": 2, "teams": ["A", "B"]
    }));
    select_competition(&mut t, comp.clone()).unwrap();
    assert_eq!(select_competition(&mut t, comp), Err(TournamentError::InvalidState));

    t.reset();
    assert_eq!(t, Tournament::new());
}

#[test]
fn invalid_competition_creates_nothing() {
    let mut t = Tournament::new();
    let comp = competition(json!({
        "id": "bad", "name": "Bad Groups", "format": "groups", "groupCount": 3,
        "teamCount": 8, "teams": names("G", 8)
    }));
    assert!(matches!(
        select_competition(&mut t, comp),
        Err(TournamentError::ConfigurationError(_))
    ));
    assert_eq!(t, Tournament::new());
}

#[test]
fn short_team_list_is_refused_before_play() {
    // Four listed teams for an eight-team competition would leave the knockout short.
    let mut t = Tournament::new();
    let comp = competition(json!({
        "id": "short", "name": "Short Cup", "format": "mixed", "groupCount": 2, "playoffTeams": 8,
        "teamCount": 8, "teams": names("S", 4)
    }));
    assert!(matches!(
        select_competition(&mut t, comp),
        Err(TournamentError::ConfigurationError(_))
    ));
    assert_eq!(t, Tournament::new());

    let playoffs = competition(json!({
        "id": "short-d2", "name": "Short Division", "format": "league",
        "leaguePlayoffs": { "positions": "3-6" }, "teamCount": 6, "teams": names("S", 4)
    }));
    assert!(matches!(
        select_competition(&mut t, playoffs),
        Err(TournamentError::ConfigurationError(_))
    ));
}

#[test]
fn qualifiers_must_fill_the_competition() {
    // 4 direct teams + 2 qualifiers = 6, not the 8 the four groups need.
    let mut t = Tournament::new();
    let comp = competition(json!({
        "id": "odd", "name": "Odd Groups", "format": "groups", "groupCount": 4,
        "teamCount": 8, "teams": names("D", 4),
        "qualifying": { "pool": names("Q", 6), "groups": 2, "advance": 1 }
    }));
    assert!(matches!(
        select_competition(&mut t, comp),
        Err(TournamentError::ConfigurationError(_))
    ));
    assert_eq!(t, Tournament::new());

    // The same setup with the right qualifier count plays through.
    let mut t = started(json!({
        "id": "even", "name": "Even Groups", "format": "groups", "groupCount": 4, "repetitions": 1,
        "teamCount": 8, "teams": names("D", 6),
        "qualifying": { "pool": names("Q", 6), "groups": 2, "advance": 1 }
    }));
    while t.phase == Phase::Qualifying {
        play_round(&mut t, earlier_name_wins);
    }
    assert_eq!(t.phase, Phase::League);
    advance_phase(&mut t).unwrap();
    while t.phase == Phase::League {
        play_round(&mut t, earlier_name_wins);
    }
    assert_eq!(t.phase, Phase::Finished);
}

#[test]
fn qualifying_pool_cannot_repeat_direct_entrants() {
    let comp = competition(json!({
        "id": "overlap", "name": "Overlap League", "format": "league",
        "teamCount": 4, "teams": ["A", "B"],
        "qualifying": { "pool": ["A", "Q1", "Q2", "Q3"], "groups": 2, "advance": 1 }
    }));
    let mut t = Tournament::new();
    assert!(matches!(
        select_competition(&mut t, comp),
        Err(TournamentError::ConfigurationError(_))
    ));
    assert_eq!(t.phase, Phase::Menu);
}

#[test]
fn every_builtin_competition_can_start() {
    let catalog = builtin_catalog().unwrap();
    assert!(!catalog.is_empty());
    for comp in catalog {
        let mut t = Tournament::new();
        select_competition(&mut t, comp.clone()).unwrap();
        assert_ne!(t.phase, Phase::Menu, "{} did not start", comp.id);
    }
}
