//! Knockout rounds: advancing winners through the bracket, and the champion.

use crate::logic::league::league_tables;
use crate::logic::progress::{require_scores, with_committed_scores};
use crate::logic::seeding::pair_round;
use crate::models::{Phase, Tournament, TournamentError};
use serde::Serialize;

/// Winner of a finished tournament and how they won it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Champion {
    pub name: String,
    /// "Playoff Winner" for league playoffs, otherwise "Champion".
    pub title: String,
}

/// Commit the current bracket round (Knockout only). Draws are refused.
///
/// Winners are paired in bracket order into the next round (an odd one out gets a bye), with
/// ids continuing from the last bracket match. With one winner left the tournament is finished.
pub fn advance_playoff(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.phase != Phase::Knockout {
        return Err(TournamentError::InvalidState);
    }
    let round = tournament.playoff_round;
    let current: Vec<_> = tournament
        .bracket
        .iter()
        .filter(|m| m.round == Some(round))
        .cloned()
        .collect();
    require_scores(&current, &tournament.scores, true)?;

    let winners: Vec<String> = with_committed_scores(&current, &tournament.scores)
        .iter()
        .filter_map(|m| m.winner().map(str::to_string))
        .collect();
    let mut bracket = with_committed_scores(&tournament.bracket, &tournament.scores);

    if winners.len() > 1 {
        let next_round = round + 1;
        let next_id = bracket.last().map_or(2001, |m| m.id + 1);
        bracket.extend(pair_round(&winners, next_round, next_id));
        tournament.playoff_round = next_round;
        log::debug!("Knockout round {} drawn: {:?}", next_round, winners);
    } else {
        tournament.phase = Phase::Finished;
        log::info!("Knockout finished, winner {:?}", winners.first());
    }
    tournament.bracket = bracket;
    tournament.scores.clear();
    Ok(())
}

/// Champion of a finished tournament: the league playoff winner, else the winner of the last
/// bracket match, else the top of the (first) final table.
pub fn champion(tournament: &Tournament) -> Option<Champion> {
    if tournament.phase != Phase::Finished {
        return None;
    }
    if let Some(last) = tournament.league_playoff_bracket.last() {
        return last.winner().map(|name| Champion {
            name: name.to_string(),
            title: "Playoff Winner".to_string(),
        });
    }
    let name = match tournament.bracket.last() {
        Some(last) => last.winner()?.to_string(),
        None => league_tables(tournament).first()?.first()?.name.clone(),
    };
    Some(Champion {
        name,
        title: "Champion".to_string(),
    })
}
