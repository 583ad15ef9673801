//! League playoffs: two semi-finals and a final among a slice of the final table.

use crate::logic::progress::{league_playoff_slice, require_scores, with_committed_scores};
use crate::models::{GameMatch, Phase, Tournament, TournamentError};

/// Commit the current playoff round (LeaguePlayoffs only). Draws are refused.
///
/// After the semi-finals the two winners meet in a final (next id after the last match).
/// After the final the tournament moves to the bracket display (`Knockout`), from which the
/// next advance finishes it.
pub fn advance_league_playoff(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.phase != Phase::LeaguePlayoffs {
        return Err(TournamentError::InvalidState);
    }
    let matches = league_playoff_slice(tournament);
    if matches.is_empty() {
        return Err(TournamentError::InvalidState);
    }
    require_scores(matches, &tournament.scores, true)?;

    let committed = with_committed_scores(matches, &tournament.scores);
    let winners: Vec<String> = committed
        .iter()
        .filter_map(|m| m.winner().map(str::to_string))
        .collect();
    let bracket = with_committed_scores(&tournament.league_playoff_bracket, &tournament.scores);

    if tournament.league_playoff_round == 0 {
        let [home, away] = <[String; 2]>::try_from(winners).map_err(|_| TournamentError::InvalidState)?;
        let next_id = bracket.last().map_or(4001, |m| m.id + 1);
        tournament.league_playoff_bracket = bracket;
        tournament
            .league_playoff_bracket
            .push(GameMatch::new(next_id, home, away, None));
        tournament.league_playoff_round = 1;
        log::debug!("League playoff final scheduled as match {}", next_id);
    } else {
        tournament.league_playoff_bracket = bracket;
        tournament.phase = Phase::Knockout;
        log::info!("League playoff final decided: {:?}", winners.first());
    }
    tournament.scores.clear();
    Ok(())
}
