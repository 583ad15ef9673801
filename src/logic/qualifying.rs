//! Qualifying stage: pre-league groups whose top teams join the competition.

use crate::logic::progress::{require_scores, with_committed_scores};
use crate::logic::setup::enter_main_stage;
use crate::logic::standings::{compute_stats, group_tables};
use crate::models::{Phase, TeamStats, Tournament, TournamentError};

/// Qualifying group tables up to the last committed round.
pub fn qualifying_tables(tournament: &Tournament) -> Vec<Vec<TeamStats>> {
    let Some(q) = tournament.selected_comp.as_ref().and_then(|c| c.qualifying.as_ref()) else {
        return Vec::new();
    };
    let stats = compute_stats(
        &q.pool,
        &tournament.qualifying_fixtures,
        tournament.qualifying_round,
        true,
    );
    group_tables(&stats)
}

/// Commit the current qualifying round (Qualifying only).
///
/// Every match of the round needs a score. After the last round (a double round-robin per
/// group) the top `advance` teams of each group are appended to the competition's teams, the
/// selection is confirmed and the main stage starts at round 0.
pub fn advance_qualifying(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.phase != Phase::Qualifying {
        return Err(TournamentError::InvalidState);
    }
    let mut comp = tournament.competition()?.clone();
    let q = comp.qualifying.clone().ok_or(TournamentError::InvalidState)?;
    let round = tournament.qualifying_round;
    let games = tournament
        .qualifying_fixtures
        .iter()
        .filter(|m| m.round == Some(round));
    require_scores(games, &tournament.scores, false)?;

    let fixtures = with_committed_scores(&tournament.qualifying_fixtures, &tournament.scores);

    if round < q.total_rounds() {
        tournament.qualifying_fixtures = fixtures;
        tournament.qualifying_round += 1;
        tournament.scores.clear();
        return Ok(());
    }

    let stats = compute_stats(&q.pool, &fixtures, round, true);
    let qualifiers: Vec<String> = group_tables(&stats)
        .into_iter()
        .flat_map(|table| table.into_iter().take(q.advance as usize).map(|t| t.name))
        .collect();
    log::info!("Qualifying finished, qualifiers: {:?}", qualifiers);

    comp.teams.extend(qualifiers);

    let mut next = tournament.clone();
    next.selected_comp = Some(comp);
    next.qualifying_fixtures = fixtures;
    next.teams_confirmed = true;
    next.round = 0;
    enter_main_stage(&mut next)?;
    *tournament = next;
    Ok(())
}
