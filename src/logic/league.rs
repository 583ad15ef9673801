//! League (and group stage) rounds, and the hand-over to playoffs or knockout.

use crate::logic::progress::{require_scores, with_committed_scores};
use crate::logic::seeding::seed_knockout;
use crate::logic::standings::{compute_stats, group_tables};
use crate::models::{GameMatch, MatchId, Phase, TeamStats, Tournament, TournamentError};

/// First id of the league-playoff semi-finals.
pub const LEAGUE_PLAYOFF_FIRST_ID: MatchId = 3000;

/// Standings tables up to the current round: one table, or one per group (each capped at the
/// configured group size).
pub fn league_tables(tournament: &Tournament) -> Vec<Vec<TeamStats>> {
    let Some(comp) = tournament.selected_comp.as_ref() else {
        return Vec::new();
    };
    let teams = tournament.actual_teams();
    if teams.is_empty() {
        return Vec::new();
    }
    tables_for(tournament, &teams, &tournament.fixtures, tournament.round)
        .into_iter()
        .map(|mut table| {
            if comp.has_groups() {
                table.truncate(comp.teams_per_group());
            }
            table
        })
        .collect()
}

fn tables_for(tournament: &Tournament, teams: &[String], fixtures: &[GameMatch], up_to: u32) -> Vec<Vec<TeamStats>> {
    let grouped = tournament.is_grouped();
    let stats = compute_stats(teams, fixtures, up_to, grouped);
    if grouped {
        group_tables(&stats)
    } else {
        vec![stats]
    }
}

/// Semi-finals among four consecutive table places: 1st v 4th and 2nd v 3rd of the slice.
fn league_playoff_semis(slice: &[TeamStats]) -> Vec<GameMatch> {
    let home = [&slice[0], &slice[1]];
    let away = [&slice[3], &slice[2]];
    home.iter()
        .zip(away.iter())
        .zip(LEAGUE_PLAYOFF_FIRST_ID..)
        .map(|((h, a), id)| GameMatch::new(id, h.name.as_str(), a.name.as_str(), None))
        .collect()
}

/// Commit the current league round and move to the next (League only).
///
/// Round 0 has no matches, so advancing from it starts the season. Once the last round is
/// committed the competition moves on to league playoffs, the knockout stage, or finishes.
pub fn advance_league(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.phase != Phase::League {
        return Err(TournamentError::InvalidState);
    }
    let comp = tournament.competition()?.clone();
    let round = tournament.round;
    let games = tournament.fixtures.iter().filter(|m| m.round == Some(round));
    require_scores(games, &tournament.scores, false)?;

    let fixtures = with_committed_scores(&tournament.fixtures, &tournament.scores);
    let next_round = round + 1;

    if next_round <= comp.total_league_rounds() {
        tournament.fixtures = fixtures;
        tournament.round = next_round;
        tournament.scores.clear();
        log::debug!("League round {} of {}", next_round, comp.total_league_rounds());
        return Ok(());
    }

    let teams = tournament.actual_teams();
    let final_tables = tables_for(tournament, &teams, &fixtures, next_round);

    if let Some(po) = comp.league_playoffs() {
        let table = final_tables.first().map(Vec::as_slice).unwrap_or_default();
        let slice = table
            .get(po.positions.start - 1..po.positions.end)
            .filter(|s| s.len() == 4)
            .ok_or_else(|| {
                TournamentError::ConfigurationError(format!(
                    "League playoff positions {} are outside the table",
                    po.positions
                ))
            })?;
        tournament.league_playoff_bracket = league_playoff_semis(slice);
        tournament.league_playoff_round = 0;
        tournament.phase = Phase::LeaguePlayoffs;
    } else if comp.has_knockout() {
        let flat: Vec<TeamStats> = final_tables.concat();
        tournament.bracket = seed_knockout(
            &flat,
            comp.knockout_team_count() as usize,
            comp.allow_third_place(),
            &mut rand::thread_rng(),
        )?;
        tournament.playoff_round = 1;
        tournament.phase = Phase::Knockout;
    } else {
        tournament.phase = Phase::Finished;
    }

    tournament.fixtures = fixtures;
    tournament.round = next_round;
    tournament.scores.clear();
    log::info!("League stage of {} complete, phase {:?}", comp.name, tournament.phase);
    Ok(())
}
