//! Competition configuration: format variants, league playoffs, qualifying, position styles.

use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Number of rounds a round-robin needs: one per opponent (plus an idle round for odd counts),
/// times the number of repetitions.
pub fn round_robin_rounds(team_count: usize, repetitions: u32) -> u32 {
    let per_cycle = if team_count % 2 == 0 {
        team_count.saturating_sub(1)
    } else {
        team_count
    };
    per_cycle as u32 * repetitions.max(1)
}

fn default_repetitions() -> u32 {
    1
}

/// Inclusive 1-based table positions, written `"3-6"` (or `"1"` for a single position).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PositionRange {
    pub start: usize,
    pub end: usize,
}

impl PositionRange {
    pub fn contains(&self, position: usize) -> bool {
        (self.start..=self.end).contains(&position)
    }

    /// Number of positions covered.
    pub fn size(&self) -> usize {
        self.end + 1 - self.start
    }
}

impl TryFrom<String> for PositionRange {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for PositionRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid position range: {s:?}"))
        };
        let (start, end) = match s.split_once('-') {
            Some((a, b)) => (parse(a)?, parse(b)?),
            None => {
                let p = parse(s)?;
                (p, p)
            }
        };
        if start == 0 || end < start {
            return Err(format!("invalid position range: {s:?}"));
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for PositionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl From<PositionRange> for String {
    fn from(range: PositionRange) -> Self {
        range.to_string()
    }
}

/// End-of-season playoff among a slice of the final league table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeaguePlayoffs {
    /// Table positions taking part; exactly four teams.
    pub positions: PositionRange,
    /// Number of playoff winners (one final).
    #[serde(default = "default_repetitions")]
    pub winners: u32,
}

/// Pre-league qualifying groups over a pool of teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Qualifying {
    pub pool: Vec<String>,
    pub groups: u32,
    /// Teams taken from the top of each qualifying group.
    pub advance: u32,
}

impl Qualifying {
    pub fn teams_per_group(&self) -> usize {
        self.pool.len() / self.groups.max(1) as usize
    }

    /// Qualifying is always a double round-robin.
    pub fn total_rounds(&self) -> u32 {
        round_robin_rounds(self.teams_per_group(), 2)
    }
}

/// Presentation hint for a table position (colours and icon). Not interpreted by the engine.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PositionStyle {
    pub bg: String,
    pub border: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Structure of the main stage, with the fields that only make sense for that structure.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum Format {
    League {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rounds: Option<u32>,
        #[serde(default = "default_repetitions")]
        repetitions: u32,
        #[serde(default, rename = "leaguePlayoffs", skip_serializing_if = "Option::is_none")]
        league_playoffs: Option<LeaguePlayoffs>,
    },
    Knockout,
    Groups {
        #[serde(rename = "groupCount")]
        group_count: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rounds: Option<u32>,
        #[serde(default = "default_repetitions")]
        repetitions: u32,
    },
    Mixed {
        #[serde(rename = "groupCount")]
        group_count: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rounds: Option<u32>,
        #[serde(default = "default_repetitions")]
        repetitions: u32,
        #[serde(rename = "playoffTeams")]
        playoff_teams: u32,
        #[serde(default, rename = "allowThirdPlace")]
        allow_third_place: bool,
    },
}

/// A competition definition, from the catalog or created by the user.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(flatten)]
    pub format: Format,
    pub team_count: u32,
    /// Direct entrants. Qualifying appends its qualifiers here.
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub position_styles: BTreeMap<String, PositionStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifying: Option<Qualifying>,
}

impl Competition {
    pub fn has_groups(&self) -> bool {
        matches!(self.format, Format::Groups { .. } | Format::Mixed { .. })
    }

    pub fn has_knockout(&self) -> bool {
        matches!(self.format, Format::Knockout | Format::Mixed { .. })
    }

    pub fn is_knockout_only(&self) -> bool {
        matches!(self.format, Format::Knockout)
    }

    pub fn group_count(&self) -> u32 {
        match self.format {
            Format::Groups { group_count, .. } | Format::Mixed { group_count, .. } => group_count.max(1),
            Format::League { .. } | Format::Knockout => 1,
        }
    }

    pub fn repetitions(&self) -> u32 {
        match self.format {
            Format::League { repetitions, .. }
            | Format::Groups { repetitions, .. }
            | Format::Mixed { repetitions, .. } => repetitions.max(1),
            Format::Knockout => 1,
        }
    }

    pub fn teams_per_group(&self) -> usize {
        self.team_count as usize / self.group_count() as usize
    }

    /// Rounds in the league or group stage; 0 for a knockout-only competition.
    pub fn total_league_rounds(&self) -> u32 {
        match self.format {
            Format::League { rounds, .. } | Format::Groups { rounds, .. } | Format::Mixed { rounds, .. } => {
                rounds.unwrap_or_else(|| round_robin_rounds(self.teams_per_group(), self.repetitions()))
            }
            Format::Knockout => 0,
        }
    }

    /// Teams entering the knockout bracket.
    pub fn knockout_team_count(&self) -> u32 {
        match self.format {
            Format::Knockout => self.team_count,
            Format::Mixed { playoff_teams, .. } => playoff_teams,
            Format::League { .. } | Format::Groups { .. } => 0,
        }
    }

    pub fn allow_third_place(&self) -> bool {
        matches!(self.format, Format::Mixed { allow_third_place: true, .. })
    }

    pub fn league_playoffs(&self) -> Option<&LeaguePlayoffs> {
        match &self.format {
            Format::League { league_playoffs, .. } => league_playoffs.as_ref(),
            _ => None,
        }
    }

    /// Style for a 1-based table position: `"all"` wins, then an exact key, then a `"start-end"` key.
    pub fn position_style(&self, position: usize) -> Option<&PositionStyle> {
        if let Some(style) = self.position_styles.get("all") {
            return Some(style);
        }
        if let Some(style) = self.position_styles.get(&position.to_string()) {
            return Some(style);
        }
        self.position_styles.iter().find_map(|(key, style)| {
            let range: PositionRange = key.parse().ok()?;
            range.contains(position).then_some(style)
        })
    }

    /// Check the configuration can be played. Nothing is created when this fails.
    pub fn validate(&self) -> Result<(), TournamentError> {
        let invalid = |msg: String| Err(TournamentError::ConfigurationError(msg));
        if self.team_count < 2 {
            return invalid(format!("{} needs at least 2 teams", self.name));
        }
        if !all_distinct(&self.teams) {
            return invalid("Team names must be unique".to_string());
        }
        match &self.format {
            Format::League { league_playoffs: Some(po), .. } => {
                if po.positions.size() != 4 {
                    return invalid(format!(
                        "League playoffs need exactly 4 positions (got {})",
                        po.positions
                    ));
                }
                if po.positions.end > self.team_count as usize {
                    return invalid(format!(
                        "League playoff positions {} exceed the {} teams",
                        po.positions, self.team_count
                    ));
                }
            }
            Format::Groups { group_count, .. } | Format::Mixed { group_count, .. } => {
                if *group_count == 0 || self.team_count % group_count != 0 {
                    return invalid(format!(
                        "Number of teams ({}) must be divisible by number of groups ({})",
                        self.team_count, group_count
                    ));
                }
            }
            Format::League { .. } | Format::Knockout => {}
        }
        if let Format::Mixed { playoff_teams, .. } = self.format {
            if playoff_teams < 2 || playoff_teams > self.team_count {
                return invalid(format!(
                    "Playoff teams ({playoff_teams}) must be between 2 and {}",
                    self.team_count
                ));
            }
        }
        if let Some(q) = &self.qualifying {
            if q.groups == 0 || q.pool.len() % q.groups as usize != 0 {
                return invalid(format!(
                    "Qualifying pool ({}) must be divisible by number of groups ({})",
                    q.pool.len(),
                    q.groups
                ));
            }
            if q.advance == 0 || q.advance as usize > q.teams_per_group() {
                return invalid(format!(
                    "Qualifying advance count ({}) must be between 1 and the group size ({})",
                    q.advance,
                    q.teams_per_group()
                ));
            }
            if q.teams_per_group() < 2 || !all_distinct(&q.pool) {
                return invalid("Qualifying groups need at least 2 distinct teams".to_string());
            }
            if let Some(dup) = q.pool.iter().find(|t| self.teams.contains(t)) {
                return invalid(format!("{dup} is both a direct entrant and in the qualifying pool"));
            }
        }
        // Direct entrants plus qualifiers must fill the competition exactly. An empty list without
        // qualifying means the teams are picked later.
        let qualifiers = self.qualifying.as_ref().map_or(0, |q| (q.groups * q.advance) as usize);
        let entrants = self.teams.len() + qualifiers;
        if entrants > 0 && entrants != self.team_count as usize {
            return invalid(match qualifiers {
                0 => format!(
                    "{} lists {} teams but is configured for {}",
                    self.name,
                    self.teams.len(),
                    self.team_count
                ),
                _ => format!(
                    "{} direct teams plus {} qualifiers do not make the {} teams of {}",
                    self.teams.len(),
                    qualifiers,
                    self.team_count,
                    self.name
                ),
            });
        }
        Ok(())
    }
}

fn all_distinct(names: &[String]) -> bool {
    let mut seen = HashSet::new();
    names.iter().all(|n| seen.insert(n.as_str()))
}
