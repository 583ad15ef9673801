//! TeamStats: one row of a standings table.

use serde::{Deserialize, Serialize};

/// Accumulated record of a team. Derived from matches on demand, never persisted.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
    pub group: Option<char>,
}

impl TeamStats {
    /// Empty record for a team. Group is `None` for ungrouped tables.
    pub fn new(name: impl Into<String>, group: Option<char>) -> Self {
        Self {
            name: name.into(),
            group,
            ..Self::default()
        }
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    /// Record one match from this team's point of view.
    pub fn record(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        if scored > conceded {
            self.add_win();
        } else if scored < conceded {
            self.add_loss();
        } else {
            self.add_draw();
        }
    }

    fn add_win(&mut self) {
        self.wins += 1;
        self.points += 3;
    }

    fn add_draw(&mut self) {
        self.draws += 1;
        self.points += 1;
    }

    fn add_loss(&mut self) {
        self.losses += 1;
    }
}
