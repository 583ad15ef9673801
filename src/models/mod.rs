//! Data structures for the tournament engine: matches, standings rows, competitions, state.

mod competition;
mod game;
mod stats;
mod tournament;

pub use competition::{
    round_robin_rounds, Competition, Format, LeaguePlayoffs, PositionRange, PositionStyle, Qualifying,
};
pub use game::{GameMatch, MatchId, ScoreEntry, BYE, MAX_GOALS};
pub use stats::TeamStats;
pub use tournament::{Phase, Tournament, TournamentError};
