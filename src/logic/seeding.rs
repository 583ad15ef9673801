//! Knockout seeding: first-round brackets from standings or a raw team pool.

use crate::models::{GameMatch, MatchId, TeamStats, TournamentError};
use crate::logic::standings::standings_order;
use rand::seq::SliceRandom;
use rand::Rng;

/// First id of a bracket seeded from standings.
pub const SEEDED_FIRST_ID: MatchId = 1001;
/// First id of a bracket drawn from the whole team list.
pub const DRAWN_FIRST_ID: MatchId = 1000;
/// Best third-placed teams that can go through from a group stage.
pub const MAX_BEST_THIRDS: usize = 4;

/// Pair teams consecutively into matches of `round`, ids from `first_id`.
/// A trailing unpaired team gets a bye instead of being dropped.
pub fn pair_round(teams: &[String], round: u32, first_id: MatchId) -> Vec<GameMatch> {
    teams
        .chunks(2)
        .zip(first_id..)
        .map(|(pair, id)| match pair {
            [home, away] => GameMatch::new(id, home.as_str(), away.as_str(), Some(round)),
            [team] => GameMatch::bye(id, team.as_str(), round),
            _ => unreachable!("chunks(2) yields one or two teams"),
        })
        .collect()
}

/// Teams going through from a group stage: winners, runners-up and optionally the best thirds.
/// `ranked` is a flattened table whose groups each appear in standings order.
fn group_qualifiers(ranked: &[TeamStats], allow_third_place: bool) -> Vec<String> {
    let mut groups: Vec<char> = Vec::new();
    for g in ranked.iter().filter_map(|t| t.group) {
        if !groups.contains(&g) {
            groups.push(g);
        }
    }

    let mut winners = Vec::new();
    let mut runners = Vec::new();
    let mut thirds = Vec::new();
    for g in groups {
        let mut slice = ranked.iter().filter(|t| t.group == Some(g));
        winners.extend(slice.next());
        runners.extend(slice.next());
        thirds.extend(slice.next());
    }

    let mut qualified: Vec<&TeamStats> = winners.into_iter().chain(runners).collect();
    if allow_third_place {
        thirds.sort_by(|a, b| standings_order(a, b));
        qualified.extend(thirds.into_iter().take(MAX_BEST_THIRDS));
    }
    qualified.into_iter().map(|t| t.name.clone()).collect()
}

/// Round-1 bracket from final standings.
///
/// Ungrouped tables send their top `playoff_teams`; grouped tables send group winners and
/// runners-up (and the best thirds when allowed), truncated to `playoff_teams`. Qualifiers are
/// shuffled before pairing, so the draw is random rather than seeded by rank.
pub fn seed_knockout<R: Rng + ?Sized>(
    ranked: &[TeamStats],
    playoff_teams: usize,
    allow_third_place: bool,
    rng: &mut R,
) -> Result<Vec<GameMatch>, TournamentError> {
    if ranked.len() < playoff_teams {
        return Err(TournamentError::ConfigurationError(format!(
            "Need {} teams for the knockout stage but only {} are ranked",
            playoff_teams,
            ranked.len()
        )));
    }
    let mut qualified: Vec<String> = match ranked.first() {
        Some(top) if top.group.is_some() => group_qualifiers(ranked, allow_third_place),
        _ => ranked.iter().map(|t| t.name.clone()).collect(),
    };
    qualified.truncate(playoff_teams);
    qualified.shuffle(rng);
    let bracket = pair_round(&qualified, 1, SEEDED_FIRST_ID);
    log::debug!("Seeded knockout bracket: {:?}", bracket);
    Ok(bracket)
}

/// Round-1 bracket for a knockout-only competition: the whole list shuffled and paired.
pub fn generate_knockout_bracket<R: Rng + ?Sized>(teams: &[String], rng: &mut R) -> Vec<GameMatch> {
    let mut shuffled = teams.to_vec();
    shuffled.shuffle(rng);
    let bracket = pair_round(&shuffled, 1, DRAWN_FIRST_ID);
    log::debug!("Generated knockout bracket with {} teams: {:?}", teams.len(), bracket);
    bracket
}

/// Rounds needed to reduce `team_count` entrants to one: ceil(log2 n).
pub fn total_playoff_rounds(team_count: u32) -> u32 {
    if team_count <= 1 {
        0
    } else {
        u32::BITS - (team_count - 1).leading_zeros()
    }
}

/// Display name of a knockout round counted from the final.
pub fn stage_name(round: u32, total_rounds: u32) -> String {
    if round == 0 || round > total_rounds {
        return format!("Round {round}");
    }
    match total_rounds - round {
        0 => "Final".to_string(),
        1 => "Semi-finals".to_string(),
        2 => "Quarter-finals".to_string(),
        d => format!("Round of {}", 1u64 << (d + 1)),
    }
}
