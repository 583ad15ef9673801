//! Football league simulator: library with the tournament engine (models and business logic).

pub mod catalog;
pub mod logic;
pub mod models;

pub use catalog::{builtin_catalog, find_competition, parse_catalog};
pub use logic::{
    active_matches, advance_league, advance_league_playoff, advance_phase, advance_playoff,
    advance_qualifying, back_to_menu, champion, confirm_teams, create_custom_tournament,
    from_snapshot, league_tables, load_snapshot, open_custom_creation, qualifying_tables,
    select_competition, set_selected_teams, submit_score, to_snapshot, tournament_view, Champion,
    CustomCompetitionRequest, CustomFormat, TournamentView,
};
pub use models::{
    Competition, Format, GameMatch, MatchId, Phase, ScoreEntry, TeamStats, Tournament,
    TournamentError,
};
