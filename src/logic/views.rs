//! What a front end needs to draw the current phase: matches, tables, bracket, champion.

use crate::logic::knockout::{champion, Champion};
use crate::logic::league::league_tables;
use crate::logic::progress::{active_matches, league_playoff_slice};
use crate::logic::qualifying::qualifying_tables;
use crate::logic::seeding::{stage_name, total_playoff_rounds};
use crate::models::{Competition, GameMatch, MatchId, Phase, PositionStyle, ScoreEntry, TeamStats, Tournament};
use serde::Serialize;
use std::collections::BTreeMap;

/// One standings row with its 1-based position and display style.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub position: usize,
    #[serde(flatten)]
    pub stats: TeamStats,
    pub goal_difference: i64,
    pub style: Option<PositionStyle>,
}

/// Matches of one knockout round.
#[derive(Clone, Debug, Serialize)]
pub struct BracketRound {
    pub round: u32,
    pub name: String,
    pub matches: Vec<GameMatch>,
}

/// Phase-specific part of the view.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum StageView {
    Empty,
    TeamSelection {
        team_count: u32,
        selected: Vec<String>,
    },
    Qualifying {
        round: u32,
        total_rounds: u32,
        matches: Vec<GameMatch>,
        tables: Vec<Vec<TableRow>>,
    },
    League {
        /// 0 before the season starts.
        round: u32,
        total_rounds: u32,
        /// Fixtures of the current round (round 1 during pre-season).
        matches: Vec<GameMatch>,
        tables: Vec<Vec<TableRow>>,
    },
    LeaguePlayoffs {
        stage_name: String,
        matches: Vec<GameMatch>,
        bracket: Vec<GameMatch>,
    },
    Knockout {
        stage_name: String,
        round: u32,
        total_rounds: u32,
        matches: Vec<GameMatch>,
        rounds: Vec<BracketRound>,
    },
    Finished {
        champion: Option<Champion>,
        tables: Vec<Vec<TableRow>>,
    },
}

/// Everything the front end draws for the current state.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentView {
    pub phase: Phase,
    pub competition: Option<String>,
    pub emoji: Option<String>,
    pub pending_scores: BTreeMap<MatchId, ScoreEntry>,
    #[serde(flatten)]
    pub stage: StageView,
}

fn qualifies_style() -> PositionStyle {
    PositionStyle {
        bg: "bg-green-900/40".to_string(),
        border: "border-green-500/60".to_string(),
        icon: "✔️".to_string(),
        label: Some("Qualifies".to_string()),
    }
}

fn rows(tables: Vec<Vec<TeamStats>>, style_for: impl Fn(usize) -> Option<PositionStyle>) -> Vec<Vec<TableRow>> {
    tables
        .into_iter()
        .map(|table| {
            table
                .into_iter()
                .enumerate()
                .map(|(i, stats)| TableRow {
                    position: i + 1,
                    goal_difference: stats.goal_difference(),
                    stats,
                    style: style_for(i + 1),
                })
                .collect()
        })
        .collect()
}

fn competition_rows(tournament: &Tournament, comp: &Competition) -> Vec<Vec<TableRow>> {
    rows(league_tables(tournament), |pos| comp.position_style(pos).cloned())
}

fn cloned(matches: Vec<&GameMatch>) -> Vec<GameMatch> {
    matches.into_iter().cloned().collect()
}

/// Bracket grouped by round, with every round up to the final listed (future rounds empty).
fn bracket_rounds(bracket: &[GameMatch], total_rounds: u32) -> Vec<BracketRound> {
    let last_round = bracket.iter().filter_map(|m| m.round).max().unwrap_or(0);
    (1..=total_rounds.max(last_round))
        .map(|round| BracketRound {
            round,
            name: stage_name(round, total_rounds),
            matches: bracket.iter().filter(|m| m.round == Some(round)).cloned().collect(),
        })
        .collect()
}

fn league_playoff_rounds(bracket: &[GameMatch]) -> Vec<BracketRound> {
    let split = bracket.len().min(2);
    vec![
        BracketRound {
            round: 1,
            name: "Playoff Semi-Finals".to_string(),
            matches: bracket[..split].to_vec(),
        },
        BracketRound {
            round: 2,
            name: "Playoff Final".to_string(),
            matches: bracket[split..].to_vec(),
        },
    ]
}

fn stage_view(tournament: &Tournament, comp: &Competition) -> StageView {
    match tournament.phase {
        Phase::Menu | Phase::CustomCreation => StageView::Empty,
        Phase::TeamSelection => StageView::TeamSelection {
            team_count: comp.team_count,
            selected: tournament.selected_teams.clone(),
        },
        Phase::Qualifying => {
            let (total_rounds, advance) = comp
                .qualifying
                .as_ref()
                .map_or((0, 0), |q| (q.total_rounds(), q.advance as usize));
            StageView::Qualifying {
                round: tournament.qualifying_round,
                total_rounds,
                matches: cloned(active_matches(tournament)),
                tables: rows(qualifying_tables(tournament), |pos| (pos <= advance).then(qualifies_style)),
            }
        }
        Phase::League => {
            let display_round = tournament.round.max(1);
            StageView::League {
                round: tournament.round,
                total_rounds: comp.total_league_rounds(),
                matches: tournament
                    .fixtures
                    .iter()
                    .filter(|m| m.round == Some(display_round))
                    .cloned()
                    .collect(),
                tables: competition_rows(tournament, comp),
            }
        }
        Phase::LeaguePlayoffs => StageView::LeaguePlayoffs {
            stage_name: if tournament.league_playoff_round == 0 {
                "Playoff Semi-Finals".to_string()
            } else {
                "Playoff Final".to_string()
            },
            matches: league_playoff_slice(tournament).to_vec(),
            bracket: tournament.league_playoff_bracket.clone(),
        },
        Phase::Knockout if tournament.bracket.is_empty() && !tournament.league_playoff_bracket.is_empty() => {
            StageView::Knockout {
                stage_name: "Playoff Final".to_string(),
                round: 2,
                total_rounds: 2,
                matches: Vec::new(),
                rounds: league_playoff_rounds(&tournament.league_playoff_bracket),
            }
        }
        Phase::Knockout => {
            let total_rounds = total_playoff_rounds(comp.knockout_team_count());
            StageView::Knockout {
                stage_name: stage_name(tournament.playoff_round, total_rounds),
                round: tournament.playoff_round,
                total_rounds,
                matches: cloned(active_matches(tournament)),
                rounds: bracket_rounds(&tournament.bracket, total_rounds),
            }
        }
        Phase::Finished => StageView::Finished {
            champion: champion(tournament),
            tables: if comp.is_knockout_only() {
                Vec::new()
            } else {
                competition_rows(tournament, comp)
            },
        },
    }
}

/// View of the current state.
pub fn tournament_view(tournament: &Tournament) -> TournamentView {
    let comp = tournament.selected_comp.as_ref();
    TournamentView {
        phase: tournament.phase,
        competition: comp.map(|c| c.name.clone()),
        emoji: comp.map(|c| c.emoji.clone()),
        pending_scores: tournament.scores.clone(),
        stage: match comp {
            Some(comp) => stage_view(tournament, comp),
            None => StageView::Empty,
        },
    }
}
