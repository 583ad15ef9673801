//! Custom competitions built from the creation form.

use crate::logic::setup::select_competition;
use crate::models::{round_robin_rounds, Competition, Format, Phase, PositionStyle, Tournament, TournamentError};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Formats offered by the creation form.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomFormat {
    #[default]
    League,
    Knockout,
    Mixed,
}

/// Creation form input. Unset numbers fall back to the form defaults.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CustomCompetitionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub format: CustomFormat,
    /// Team names, one per line. Quoted names may contain commas.
    pub teams: String,
    /// League: 1 = single round-robin, 2 = double (default 2, at most 4).
    pub repetitions: Option<u32>,
    /// Mixed: number of groups (default 4).
    pub group_count: Option<u32>,
    /// Mixed: teams advancing from each group (default 2).
    pub advance_count: Option<u32>,
}

/// A built custom competition plus an optional notice for the user.
#[derive(Clone, Debug)]
pub struct CustomCompetition {
    pub competition: Competition,
    pub warning: Option<String>,
}

/// Parse a team list: one team per line, first column only, trimmed, blanks skipped.
pub fn parse_team_list(text: &str) -> Result<Vec<String>, TournamentError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let mut teams = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| TournamentError::ConfigurationError(format!("Invalid team list: {e}")))?;
        if let Some(name) = record.get(0).filter(|n| !n.is_empty()) {
            teams.push(name.to_string());
        }
    }
    Ok(teams)
}

fn default_position_styles() -> BTreeMap<String, PositionStyle> {
    BTreeMap::from([
        (
            "1".to_string(),
            PositionStyle {
                bg: "bg-yellow-900/40".to_string(),
                border: "border-yellow-500/60".to_string(),
                icon: "🏆".to_string(),
                label: Some("Champion".to_string()),
            },
        ),
        (
            "2-4".to_string(),
            PositionStyle {
                bg: "bg-blue-900/40".to_string(),
                border: "border-blue-500/60".to_string(),
                icon: "🥈".to_string(),
                label: Some("Top Finish".to_string()),
            },
        ),
    ])
}

/// Build a competition from the creation form.
///
/// League rounds come from the repetitions; mixed competitions play a double round-robin per
/// group and send `group_count * advance_count` teams to the knockout. A knockout whose team
/// count is not a power of two is allowed, with a warning (some teams get byes).
pub fn build_custom_competition(request: &CustomCompetitionRequest) -> Result<CustomCompetition, TournamentError> {
    let teams = parse_team_list(&request.teams)?;
    let n = teams.len();
    if n < 2 {
        return Err(TournamentError::ConfigurationError(
            "Please enter at least 2 teams".to_string(),
        ));
    }
    let name = match request.name.trim() {
        "" => "Custom Tournament".to_string(),
        trimmed => trimmed.to_string(),
    };

    let mut warning = None;
    let format = match request.format {
        CustomFormat::League => {
            let repetitions = request.repetitions.unwrap_or(2).clamp(1, 4);
            Format::League {
                rounds: Some(round_robin_rounds(n, repetitions)),
                repetitions,
                league_playoffs: None,
            }
        }
        CustomFormat::Mixed => {
            let group_count = request.group_count.unwrap_or(4);
            let advance = request.advance_count.unwrap_or(2);
            if group_count == 0 || n % group_count as usize != 0 {
                return Err(TournamentError::ConfigurationError(format!(
                    "Number of teams ({n}) must be divisible by number of groups ({group_count})"
                )));
            }
            Format::Mixed {
                group_count,
                rounds: Some(round_robin_rounds(n / group_count as usize, 2)),
                repetitions: 2,
                playoff_teams: group_count * advance,
                allow_third_place: false,
            }
        }
        CustomFormat::Knockout => {
            if !n.is_power_of_two() {
                let msg = format!(
                    "You have {n} teams. A balanced knockout uses a power of 2 (2, 4, 8, 16, ...); some teams will get byes."
                );
                log::warn!("{}", msg);
                warning = Some(msg);
            }
            Format::Knockout
        }
    };

    let competition = Competition {
        id: "custom".to_string(),
        name,
        emoji: "🏆".to_string(),
        format,
        team_count: n as u32,
        teams,
        position_styles: default_position_styles(),
        qualifying: None,
    };
    competition.validate()?;
    Ok(CustomCompetition { competition, warning })
}

/// Create a custom competition and start it (CustomCreation only). Returns the warning, if any.
pub fn create_custom_tournament(
    tournament: &mut Tournament,
    request: &CustomCompetitionRequest,
) -> Result<Option<String>, TournamentError> {
    if tournament.phase != Phase::CustomCreation {
        return Err(TournamentError::InvalidState);
    }
    let CustomCompetition { competition, warning } = build_custom_competition(request)?;
    select_competition(tournament, competition)?;
    Ok(warning)
}
