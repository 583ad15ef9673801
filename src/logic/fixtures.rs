//! Fixture generation: round-robin leagues (circle method) and grouped round-robins.

use crate::models::{round_robin_rounds, GameMatch, BYE};
use rand::seq::SliceRandom;
use rand::Rng;

/// Label of the group at `index`: 'A', 'B', ...
pub fn group_label(index: usize) -> char {
    char::from_u32('A' as u32 + index as u32).unwrap_or('?')
}

/// Round-robin schedule where every pair meets `repetitions` times.
///
/// 1. Odd counts get a `BYE` slot; matches against it are dropped (that team is idle).
/// 2. Slot 0 stays fixed; each round the last slot moves into slot 1.
/// 3. Within a round slot `i` hosts slot `n - 1 - i`.
/// 4. Further repetitions replay the first one, swapping venues on odd repetitions.
///
/// Ids run from 1; rounds from 1.
pub fn make_league_fixtures(teams: &[String], repetitions: u32) -> Vec<GameMatch> {
    if teams.len() < 2 {
        return Vec::new();
    }
    let mut sched: Vec<&str> = teams.iter().map(String::as_str).collect();
    if sched.len() % 2 == 1 {
        sched.push(BYE);
    }
    let n = sched.len();
    let mut id = 1;
    let mut fx = Vec::with_capacity(n / 2 * (n - 1));

    for r in 0..n - 1 {
        for i in 0..n / 2 {
            let (h, a) = (sched[i], sched[n - 1 - i]);
            if h != BYE && a != BYE {
                fx.push(GameMatch::new(id, h, a, Some(r as u32 + 1)));
                id += 1;
            }
        }
        if let Some(last) = sched.pop() {
            sched.insert(1, last);
        }
    }

    let rounds_in_first_half = round_robin_rounds(teams.len(), 1);
    let first_half_len = fx.len();
    for rep in 1..repetitions.max(1) {
        for k in 0..first_half_len {
            let m = &fx[k];
            let (home, away) = if rep % 2 == 0 {
                (m.home.clone(), m.away.clone())
            } else {
                (m.away.clone(), m.home.clone())
            };
            let round = m.round.map(|r| r + rounds_in_first_half * rep);
            fx.push(GameMatch::new(id, home, away, round));
            id += 1;
        }
    }
    fx
}

/// Shuffle teams into `group_count` equal groups ('A', 'B', ...) and schedule each as its own league.
/// Ids are renumbered from 1 across all groups; each match carries its group label.
///
/// `teams.len()` must be divisible by `group_count` (checked when the competition is validated).
pub fn make_group_fixtures<R: Rng + ?Sized>(
    teams: &[String],
    group_count: u32,
    repetitions: u32,
    rng: &mut R,
) -> Vec<GameMatch> {
    let mut shuffled = teams.to_vec();
    shuffled.shuffle(rng);
    let group_count = group_count.max(1) as usize;
    let per_group = shuffled.len() / group_count;

    let mut id = 1;
    let mut fx = Vec::new();
    for gi in 0..group_count {
        let group_teams = &shuffled[gi * per_group..(gi + 1) * per_group];
        let label = group_label(gi);
        for mut m in make_league_fixtures(group_teams, repetitions) {
            m.id = id;
            m.group = Some(label);
            id += 1;
            fx.push(m);
        }
    }
    log::debug!(
        "Generated {} group fixtures for {} groups of {}",
        fx.len(),
        group_count,
        per_group
    );
    fx
}
