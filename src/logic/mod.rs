//! Tournament business logic: fixtures, standings, seeding, and the phase transitions.

mod custom;
mod fixtures;
mod knockout;
mod league;
mod playoffs;
mod progress;
mod qualifying;
mod seeding;
mod setup;
mod snapshot;
mod standings;
mod views;

pub use custom::{
    build_custom_competition, create_custom_tournament, parse_team_list, CustomCompetition,
    CustomCompetitionRequest, CustomFormat,
};
pub use fixtures::{group_label, make_group_fixtures, make_league_fixtures};
pub use knockout::{advance_playoff, champion, Champion};
pub use league::{advance_league, league_tables, LEAGUE_PLAYOFF_FIRST_ID};
pub use playoffs::advance_league_playoff;
pub use progress::{active_matches, advance_phase, submit_score};
pub use qualifying::{advance_qualifying, qualifying_tables};
pub use seeding::{
    generate_knockout_bracket, pair_round, seed_knockout, stage_name, total_playoff_rounds,
    DRAWN_FIRST_ID, MAX_BEST_THIRDS, SEEDED_FIRST_ID,
};
pub use setup::{back_to_menu, confirm_teams, open_custom_creation, select_competition, set_selected_teams};
pub use snapshot::{from_snapshot, load_snapshot, to_snapshot};
pub use standings::{compute_stats, group_tables, standings_order};
pub use views::{tournament_view, BracketRound, StageView, TableRow, TournamentView};
