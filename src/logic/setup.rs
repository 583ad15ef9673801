//! Setup: choosing a competition, team selection, and entering the first stage.

use crate::logic::fixtures::{make_group_fixtures, make_league_fixtures};
use crate::logic::seeding::generate_knockout_bracket;
use crate::models::{Competition, Phase, Tournament, TournamentError};
use std::collections::HashSet;

/// Menu -> custom competition form.
pub fn open_custom_creation(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.phase != Phase::Menu {
        return Err(TournamentError::InvalidState);
    }
    tournament.phase = Phase::CustomCreation;
    Ok(())
}

/// Custom competition form -> menu.
pub fn back_to_menu(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.phase != Phase::CustomCreation {
        return Err(TournamentError::InvalidState);
    }
    tournament.phase = Phase::Menu;
    Ok(())
}

/// Start a tournament for `competition` (Menu or CustomCreation only).
///
/// - qualifying configured: qualifying groups over the pool, round 1;
/// - no entrants listed: team selection;
/// - knockout only: bracket drawn, knockout round 1;
/// - otherwise: fixtures generated, league round 0 (pre-season).
pub fn select_competition(tournament: &mut Tournament, competition: Competition) -> Result<(), TournamentError> {
    if !matches!(tournament.phase, Phase::Menu | Phase::CustomCreation) {
        return Err(TournamentError::InvalidState);
    }
    competition.validate()?;

    let mut next = Tournament::new();
    let qualifying = competition.qualifying.clone();
    let needs_selection = competition.teams.is_empty();
    next.selected_comp = Some(competition);

    if let Some(q) = qualifying {
        next.qualifying_fixtures = make_group_fixtures(&q.pool, q.groups, 2, &mut rand::thread_rng());
        next.qualifying_round = 1;
        next.phase = Phase::Qualifying;
    } else if needs_selection {
        next.phase = Phase::TeamSelection;
    } else {
        enter_main_stage(&mut next)?;
    }

    log::info!(
        "Selected competition {:?}, phase {:?}",
        next.selected_comp.as_ref().map(|c| c.name.as_str()),
        next.phase
    );
    *tournament = next;
    Ok(())
}

/// Replace the pending team selection (TeamSelection only). Names are trimmed; blanks dropped.
pub fn set_selected_teams(tournament: &mut Tournament, teams: Vec<String>) -> Result<(), TournamentError> {
    if tournament.phase != Phase::TeamSelection {
        return Err(TournamentError::InvalidState);
    }
    tournament.selected_teams = teams
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    Ok(())
}

/// Lock in the selected teams and start the main stage.
/// Requires exactly the competition's team count, all distinct.
pub fn confirm_teams(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.phase != Phase::TeamSelection {
        return Err(TournamentError::InvalidState);
    }
    let required = tournament.competition()?.team_count as usize;
    let selected = &tournament.selected_teams;
    if selected.len() != required {
        return Err(TournamentError::ConfigurationError(format!(
            "Select exactly {} teams (selected {})",
            required,
            selected.len()
        )));
    }
    let distinct: HashSet<&String> = selected.iter().collect();
    if distinct.len() != selected.len() {
        return Err(TournamentError::ConfigurationError(
            "Team names must be unique".to_string(),
        ));
    }

    let mut next = tournament.clone();
    next.teams_confirmed = true;
    enter_main_stage(&mut next)?;
    *tournament = next;
    Ok(())
}

/// Generate the main stage for the current entrants: a knockout bracket at round 1, or the
/// league/group fixtures at round 0.
pub(crate) fn enter_main_stage(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let teams = tournament.actual_teams();
    let comp = tournament.competition()?;
    if teams.len() < 2 {
        return Err(TournamentError::ConfigurationError(format!(
            "{} needs at least 2 teams",
            comp.name
        )));
    }
    let (knockout_only, grouped) = (comp.is_knockout_only(), comp.has_groups());
    let (group_count, repetitions) = (comp.group_count(), comp.repetitions());
    if grouped && teams.len() % group_count as usize != 0 {
        return Err(TournamentError::ConfigurationError(format!(
            "Number of teams ({}) must be divisible by number of groups ({})",
            teams.len(),
            group_count
        )));
    }
    let mut rng = rand::thread_rng();

    if knockout_only {
        tournament.bracket = generate_knockout_bracket(&teams, &mut rng);
        tournament.playoff_round = 1;
        tournament.phase = Phase::Knockout;
    } else {
        tournament.fixtures = if grouped {
            make_group_fixtures(&teams, group_count, repetitions, &mut rng)
        } else {
            make_league_fixtures(&teams, repetitions)
        };
        tournament.round = 0;
        tournament.phase = Phase::League;
    }
    tournament.scores.clear();
    Ok(())
}
