//! Save files: the whole tournament state as JSON.

use crate::models::{GameMatch, Tournament, TournamentError};
use std::collections::HashSet;

/// Serialize the full state (pretty JSON, camelCase field names).
pub fn to_snapshot(tournament: &Tournament) -> Result<String, TournamentError> {
    serde_json::to_string_pretty(tournament).map_err(|e| TournamentError::MalformedSnapshot(e.to_string()))
}

fn check_matches(list_name: &str, matches: &[GameMatch]) -> Result<(), String> {
    let mut ids = HashSet::new();
    for m in matches {
        if !ids.insert(m.id) {
            return Err(format!("duplicate match id {} in {list_name}", m.id));
        }
        if m.home_score.is_some() != m.away_score.is_some() {
            return Err(format!("match {} in {list_name} has only one score", m.id));
        }
        if m.is_bye() && m.is_played() {
            return Err(format!("bye {} in {list_name} has a score", m.id));
        }
    }
    Ok(())
}

fn check_structure(tournament: &Tournament) -> Result<(), String> {
    if tournament.phase.needs_competition() && tournament.selected_comp.is_none() {
        return Err(format!("phase {:?} without a competition", tournament.phase));
    }
    check_matches("fixtures", &tournament.fixtures)?;
    check_matches("bracket", &tournament.bracket)?;
    check_matches("qualifyingFixtures", &tournament.qualifying_fixtures)?;
    check_matches("leaguePlayoffBracket", &tournament.league_playoff_bracket)?;
    Ok(())
}

/// Parse and check a save file. Nothing is touched on failure.
pub fn from_snapshot(text: &str) -> Result<Tournament, TournamentError> {
    let tournament: Tournament =
        serde_json::from_str(text).map_err(|e| TournamentError::MalformedSnapshot(e.to_string()))?;
    check_structure(&tournament).map_err(TournamentError::MalformedSnapshot)?;
    Ok(tournament)
}

/// Replace the whole state with a save file. The current state is kept if the file is invalid.
pub fn load_snapshot(tournament: &mut Tournament, text: &str) -> Result<(), TournamentError> {
    let loaded = from_snapshot(text)?;
    log::info!("Loaded snapshot in phase {:?}", loaded.phase);
    *tournament = loaded;
    Ok(())
}
