//! Standings: reduce played matches into ranked team records.

use crate::models::{GameMatch, TeamStats};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Table order: points, goal difference, goals for (all descending), then name ascending.
pub fn standings_order(a: &TeamStats, b: &TeamStats) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| a.name.cmp(&b.name))
}

/// Ranked standings of `teams` from every played match with a round up to `up_to_round`.
///
/// Matches without a round (league playoffs) and pending matches are ignored, as are matches
/// involving a team not in `teams`. When `grouped`, each row takes the group of the first
/// fixture involving that team.
pub fn compute_stats(teams: &[String], fixtures: &[GameMatch], up_to_round: u32, grouped: bool) -> Vec<TeamStats> {
    let mut table: Vec<TeamStats> = teams
        .iter()
        .map(|t| {
            let group = if grouped {
                fixtures.iter().find(|m| m.involves(t)).and_then(|m| m.group)
            } else {
                None
            };
            TeamStats::new(t.as_str(), group)
        })
        .collect();
    let index: HashMap<String, usize> = teams.iter().cloned().zip(0..).collect();

    for m in fixtures {
        let Some(round) = m.round else { continue };
        if round > up_to_round {
            continue;
        }
        let Some(score) = m.score() else { continue };
        let (Some(&h), Some(&a)) = (index.get(&m.home), index.get(&m.away)) else {
            continue;
        };
        table[h].record(score.home, score.away);
        table[a].record(score.away, score.home);
    }

    table.sort_by(standings_order);
    table
}

/// Split a grouped table into one table per group, in group-label order.
/// Rows keep their relative (standings) order; rows without a group are left out.
pub fn group_tables(stats: &[TeamStats]) -> Vec<Vec<TeamStats>> {
    let mut groups: BTreeMap<char, Vec<TeamStats>> = BTreeMap::new();
    for row in stats {
        if let Some(g) = row.group {
            groups.entry(g).or_default().push(row.clone());
        }
    }
    groups.into_values().collect()
}
