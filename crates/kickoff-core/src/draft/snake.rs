// Outfield drafting: rating-ordered, position-weighted pool fed through a
// snake traversal of the teams.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::formation::{FormationCaps, TeamSheet};
use crate::player::{Line, Player};
use crate::rating::overall_rating;

/// Direction the snake cursor is moving through the team list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Cursor over team indices that bounces off both ends: 0, 1, 2, 2, 1, 0, 0, 1...
///
/// Hitting an end clamps to it and flips direction, so the team at the turn
/// picks twice in a row, which is what evens out access to the top picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnakeCursor {
    current: usize,
    direction: Direction,
    len: usize,
}

impl SnakeCursor {
    /// `len` must be non-zero; `start` is clamped into range.
    pub fn new(start: usize, direction: Direction, len: usize) -> Self {
        let last = len.saturating_sub(1);
        SnakeCursor {
            current: start.min(last),
            direction,
            len,
        }
    }

    /// Random start team and random direction.
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let start = if len == 0 { 0 } else { rng.gen_range(0..len) };
        let direction = if rng.gen_bool(0.5) {
            Direction::Forward
        } else {
            Direction::Backward
        };
        SnakeCursor::new(start, direction, len)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Step once, clamping and flipping at either end.
    pub fn advance(&mut self) {
        let last = self.len.saturating_sub(1);
        match self.direction {
            Direction::Forward => {
                if self.current >= last {
                    self.current = last;
                    self.direction = Direction::Backward;
                } else {
                    self.current += 1;
                }
            }
            Direction::Backward => {
                if self.current == 0 {
                    self.direction = Direction::Forward;
                } else {
                    self.current -= 1;
                }
            }
        }
    }
}

/// Rating used to order the pool: overall plus optional jitter.
fn effective_rating<R: Rng + ?Sized>(player: &Player, jitter_amplitude: f64, rng: &mut R) -> f64 {
    let base = f64::from(overall_rating(player));
    if jitter_amplitude > 0.0 {
        base + rng.gen_range(-jitter_amplitude..=jitter_amplitude)
    } else {
        base
    }
}

/// Build the draft pool: per-line candidate groups capped at
/// `num_teams * capacity`, concatenated and shuffled. A player may appear
/// under several lines. Returns the pool and how many entries were cut.
fn build_pool<R: Rng + ?Sized>(
    players: &[Player],
    ranked: &[usize],
    num_teams: usize,
    caps: &FormationCaps,
    rng: &mut R,
) -> (Vec<(usize, Line)>, usize) {
    let mut pool = Vec::new();
    let mut deferred = 0;

    for line in Line::OUTFIELD {
        let mut group: Vec<usize> = ranked
            .iter()
            .copied()
            .filter(|&i| players[i].plays_line(line))
            .collect();
        group.shuffle(rng);

        let cap = num_teams * caps.capacity(line);
        if group.len() > cap {
            deferred += group.len() - cap;
            group.truncate(cap);
        }
        pool.extend(group.into_iter().map(|i| (i, line)));
    }

    pool.shuffle(rng);
    (pool, deferred)
}

/// Pick the line to slot `player` into on `team`: the pool line if it has
/// room, else any other eligible line with room, defence first.
fn choose_line(player: &Player, pool_line: Line, team: &TeamSheet, caps: &FormationCaps) -> Option<Line> {
    if team.has_room(pool_line, caps) {
        return Some(pool_line);
    }
    Line::OUTFIELD
        .into_iter()
        .filter(|&l| l != pool_line)
        .find(|&l| player.plays_line(l) && team.has_room(l, caps))
}

/// Place outfield players with a snake draft.
///
/// Each pooled player gets up to one attempt per team. Full teams and teams
/// without a fitting slot are skipped by advancing the cursor. Players that
/// run out of attempts stay unassigned for the leftover sweep.
pub(crate) fn draft_outfield<R: Rng + ?Sized>(
    players: &[Player],
    teams: &mut [TeamSheet],
    assigned: &mut [bool],
    caps: &FormationCaps,
    jitter_amplitude: f64,
    rng: &mut R,
) {
    let num_teams = teams.len();
    if num_teams == 0 {
        return;
    }

    let mut ranked: Vec<(usize, f64)> = (0..players.len())
        .filter(|&i| !assigned[i])
        .map(|i| (i, effective_rating(&players[i], jitter_amplitude, rng)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let ranked: Vec<usize> = ranked.into_iter().map(|(i, _)| i).collect();

    let (pool, deferred) = build_pool(players, &ranked, num_teams, caps, rng);
    debug!(
        "draft pool: {} entries for {} players, {} deferred past line caps",
        pool.len(),
        ranked.len(),
        deferred
    );

    let mut cursor = SnakeCursor::random(num_teams, rng);
    let mut placed = 0usize;

    for (idx, pool_line) in pool {
        if assigned[idx] {
            continue;
        }
        let player = &players[idx];

        for _ in 0..num_teams {
            let team = &mut teams[cursor.current()];
            if !team.is_full() {
                if let Some(line) = choose_line(player, pool_line, team, caps) {
                    team.place_in_line(idx, line, player.position_in_line(line));
                    assigned[idx] = true;
                    placed += 1;
                    cursor.advance();
                    break;
                }
            }
            cursor.advance();
        }
    }

    debug!("snake draft placed {} players", placed);
}
