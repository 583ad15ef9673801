//! Match (fixture or bracket slot) and the provisional score entry.

use serde::{Deserialize, Serialize};

/// Identifier of a match, unique within its owning list (fixtures, bracket, ...).
pub type MatchId = u32;

/// Placeholder opponent used for odd team counts (round-robin idle slot, knockout bye).
pub const BYE: &str = "BYE";

/// Most goals a single side can be entered with.
pub const MAX_GOALS: u32 = 15;

/// A user-entered result that has not been committed to its match yet.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub home: u32,
    pub away: u32,
}

impl ScoreEntry {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    pub fn in_range(&self) -> bool {
        self.home <= MAX_GOALS && self.away <= MAX_GOALS
    }

    pub fn is_draw(&self) -> bool {
        self.home == self.away
    }
}

/// A single match between two teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMatch {
    pub id: MatchId,
    pub home: String,
    pub away: String,
    /// Set together with `away_score`; both `None` while pending.
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    /// `None` only for single-leg league playoff matches.
    pub round: Option<u32>,
    #[serde(default)]
    pub group: Option<char>,
}

impl GameMatch {
    pub fn new(id: MatchId, home: impl Into<String>, away: impl Into<String>, round: Option<u32>) -> Self {
        Self {
            id,
            home: home.into(),
            away: away.into(),
            home_score: None,
            away_score: None,
            round,
            group: None,
        }
    }

    /// Knockout slot where `team` advances without playing.
    pub fn bye(id: MatchId, team: impl Into<String>, round: u32) -> Self {
        Self::new(id, team, BYE, Some(round))
    }

    pub fn is_bye(&self) -> bool {
        self.away == BYE
    }

    pub fn is_played(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }

    pub fn score(&self) -> Option<ScoreEntry> {
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) => Some(ScoreEntry { home, away }),
            _ => None,
        }
    }

    /// Commit a result; both sides are always written together.
    pub fn record(&mut self, score: ScoreEntry) {
        self.home_score = Some(score.home);
        self.away_score = Some(score.away);
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }

    /// Team that goes through: the home side of a bye, otherwise the higher scorer.
    /// `None` while pending or drawn.
    pub fn winner(&self) -> Option<&str> {
        if self.is_bye() {
            return Some(&self.home);
        }
        let score = self.score()?;
        if score.home > score.away {
            Some(&self.home)
        } else if score.away > score.home {
            Some(&self.away)
        } else {
            None
        }
    }
}
