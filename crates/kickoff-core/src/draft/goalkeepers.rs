// Goalkeeper allocation: one keeper per team, in random team order.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::formation::TeamSheet;
use crate::player::Player;

/// Hand out goalkeeper-capable players, at most one per team.
///
/// Players whose preferred position is GK go first, then those who can keep
/// goal but prefer another role; each group is shuffled on its own. Teams are
/// visited in a shuffled order so the best keeper does not keep landing on
/// the same team across regenerations. Teams with a zero quota are skipped.
///
/// Returns the indices of the players consumed, in allocation order.
pub(crate) fn assign_goalkeepers<R: Rng + ?Sized>(
    players: &[Player],
    teams: &mut [TeamSheet],
    assigned: &mut [bool],
    rng: &mut R,
) -> Vec<usize> {
    let (mut preferred, mut alternative): (Vec<usize>, Vec<usize>) = (0..players.len())
        .filter(|&i| !assigned[i] && players[i].is_goalkeeper_capable())
        .partition(|&i| players[i].prefers_goalkeeper());

    preferred.shuffle(rng);
    alternative.shuffle(rng);

    let mut team_order: Vec<usize> = (0..teams.len()).collect();
    team_order.shuffle(rng);
    team_order.retain(|&t| !teams[t].is_full() && teams[t].goalkeeper.is_none());

    let mut consumed = Vec::new();
    for (idx, team_idx) in preferred.into_iter().chain(alternative).zip(team_order) {
        if teams[team_idx].place_goalkeeper(idx) {
            assigned[idx] = true;
            consumed.push(idx);
        }
    }

    debug!(
        "assigned {} goalkeepers across {} teams",
        consumed.len(),
        teams.len()
    );
    consumed
}
