//! Score entry for the active round and phase-independent advancing.

use crate::logic::{advance_league, advance_league_playoff, advance_playoff, advance_qualifying};
use crate::models::{GameMatch, MatchId, Phase, ScoreEntry, Tournament, TournamentError};
use std::collections::BTreeMap;

/// League-playoff matches of the current playoff round: the two semi-finals, then the final.
pub(crate) fn league_playoff_slice(tournament: &Tournament) -> &[GameMatch] {
    let bracket = &tournament.league_playoff_bracket;
    let split = bracket.len().min(2);
    if tournament.league_playoff_round == 0 {
        &bracket[..split]
    } else {
        &bracket[split..]
    }
}

/// Matches open for score entry in the current phase and round. Byes never need a score.
pub fn active_matches(tournament: &Tournament) -> Vec<&GameMatch> {
    fn in_round(list: &[GameMatch], round: u32) -> Vec<&GameMatch> {
        list.iter().filter(|m| m.round == Some(round)).collect()
    }
    match tournament.phase {
        Phase::Qualifying => in_round(&tournament.qualifying_fixtures, tournament.qualifying_round),
        Phase::League => in_round(&tournament.fixtures, tournament.round),
        Phase::LeaguePlayoffs => league_playoff_slice(tournament).iter().collect(),
        Phase::Knockout => tournament
            .bracket
            .iter()
            .filter(|m| m.round == Some(tournament.playoff_round) && !m.is_bye())
            .collect(),
        Phase::Menu | Phase::CustomCreation | Phase::TeamSelection | Phase::Finished => Vec::new(),
    }
}

/// Store a pending score for a match of the active round. Either side above `MAX_GOALS` is
/// refused. Nothing is committed to the match until the round is advanced.
pub fn submit_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    home: u32,
    away: u32,
) -> Result<(), TournamentError> {
    if !active_matches(tournament).iter().any(|m| m.id == match_id) {
        return Err(TournamentError::MatchNotFound(match_id));
    }
    let score = ScoreEntry::new(home, away);
    if !score.in_range() {
        return Err(TournamentError::ScoreOutOfRange { home, away });
    }
    tournament.scores.insert(match_id, score);
    Ok(())
}

/// Every non-bye match needs a pending score; when `decisive`, none may be a draw.
pub(crate) fn require_scores<'a>(
    matches: impl IntoIterator<Item = &'a GameMatch>,
    scores: &BTreeMap<MatchId, ScoreEntry>,
    decisive: bool,
) -> Result<(), TournamentError> {
    for m in matches.into_iter().filter(|m| !m.is_bye()) {
        let score = scores.get(&m.id).ok_or(TournamentError::IncompleteInput)?;
        if decisive && score.is_draw() {
            return Err(TournamentError::InvalidOutcome {
                home: m.home.clone(),
                away: m.away.clone(),
            });
        }
    }
    Ok(())
}

/// Copy of `list` with every pending score written into its match.
pub(crate) fn with_committed_scores(list: &[GameMatch], scores: &BTreeMap<MatchId, ScoreEntry>) -> Vec<GameMatch> {
    list.iter()
        .cloned()
        .map(|mut m| {
            if let Some(score) = scores.get(&m.id) {
                m.record(*score);
            }
            m
        })
        .collect()
}

/// Advance whichever stage is in play.
pub fn advance_phase(tournament: &mut Tournament) -> Result<(), TournamentError> {
    match tournament.phase {
        Phase::Qualifying => advance_qualifying(tournament),
        Phase::League => advance_league(tournament),
        Phase::LeaguePlayoffs => advance_league_playoff(tournament),
        Phase::Knockout => advance_playoff(tournament),
        Phase::Menu | Phase::CustomCreation | Phase::TeamSelection | Phase::Finished => {
            Err(TournamentError::InvalidState)
        }
    }
}
