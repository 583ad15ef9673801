//! Tournament (the whole mutable state), Phase, and TournamentError.

use crate::models::competition::Competition;
use crate::models::game::{GameMatch, MatchId, ScoreEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during tournament operations. None of them leave partial changes behind.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// A match in the active round has no submitted score.
    #[error("Please fill in all scores for the current round")]
    IncompleteInput,
    /// A knockout or playoff match was entered as a draw.
    #[error("A winner must be decided for the match: {home} vs {away}")]
    InvalidOutcome { home: String, away: String },
    /// Snapshot text could not be parsed or is structurally wrong.
    #[error("The save file is corrupted or not a valid format: {0}")]
    MalformedSnapshot(String),
    /// Competition setup is not playable.
    #[error("{0}")]
    ConfigurationError(String),
    /// Tournament is not in a phase that allows this action.
    #[error("Invalid state for this action")]
    InvalidState,
    /// Score outside the accepted goal range.
    #[error("Scores must be between 0 and {max} goals (got {home}-{away})", max = crate::models::MAX_GOALS)]
    ScoreOutOfRange { home: u32, away: u32 },
    /// Score submitted for a match outside the active round.
    #[error("Match {0} is not open for scores")]
    MatchNotFound(MatchId),
}

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Choosing a competition from the catalog.
    #[default]
    Menu,
    /// Building a custom competition.
    CustomCreation,
    /// Competition has no fixed entrants yet; picking teams.
    TeamSelection,
    /// Pre-league qualifying groups.
    Qualifying,
    /// League or group stage, round by round. Round 0 is pre-season.
    League,
    /// Semi-finals and final among a slice of the league table.
    LeaguePlayoffs,
    /// Single-elimination bracket (also shown once league playoffs are decided).
    Knockout,
    /// Champion decided.
    Finished,
}

impl Phase {
    /// Phases that only exist once a competition is selected.
    pub fn needs_competition(&self) -> bool {
        !matches!(self, Phase::Menu | Phase::CustomCreation)
    }
}

/// Full tournament state. Serialized as-is for save files.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    #[serde(rename = "currentPhase")]
    pub phase: Phase,
    pub selected_comp: Option<Competition>,
    /// League or group-stage schedule.
    pub fixtures: Vec<GameMatch>,
    /// Current league round (0 before the first round starts).
    pub round: u32,
    /// Pending results for the active round, keyed by match id. Cleared on every advance.
    pub scores: BTreeMap<MatchId, ScoreEntry>,
    pub bracket: Vec<GameMatch>,
    pub playoff_round: u32,
    /// Entrants picked by the user when the competition ships without teams.
    pub selected_teams: Vec<String>,
    pub teams_confirmed: bool,
    pub qualifying_fixtures: Vec<GameMatch>,
    pub qualifying_round: u32,
    pub league_playoff_bracket: Vec<GameMatch>,
    pub league_playoff_round: u32,
}

impl Tournament {
    /// Fresh state at the competition menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the menu, dropping everything ("new tournament").
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn competition(&self) -> Result<&Competition, TournamentError> {
        self.selected_comp.as_ref().ok_or(TournamentError::InvalidState)
    }

    /// Teams playing the main stage: the competition's own list, else the confirmed selection.
    pub fn actual_teams(&self) -> Vec<String> {
        match &self.selected_comp {
            Some(comp) if !comp.teams.is_empty() => comp.teams.clone(),
            Some(_) if self.teams_confirmed => self.selected_teams.clone(),
            _ => Vec::new(),
        }
    }

    pub fn is_grouped(&self) -> bool {
        self.selected_comp.as_ref().is_some_and(Competition::has_groups)
    }
}
