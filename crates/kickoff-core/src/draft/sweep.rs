// Flexible leftover sweep: place whoever the earlier phases could not.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use super::formation::{FormationCaps, TeamSheet};
use crate::player::{Line, Player};

/// Line a leftover player takes on `team`: the first line with room in
/// defence, midfield, attack order. Eligibility is not consulted; the
/// specific position is still resolved from the player's own positions.
fn flexible_line(team: &TeamSheet, caps: &FormationCaps) -> Option<Line> {
    Line::OUTFIELD
        .into_iter()
        .find(|&l| team.has_room(l, caps))
}

/// Greedily place every unassigned player into the least-filled teams.
///
/// Teams are considered smallest first among those still under quota. The
/// first one with formation room takes the player into its first open line
/// (defence first); if none has
/// room, the smallest team takes them as an unslotted substitute. Once every
/// team is at quota the remaining players are dropped.
///
/// Returns the indices of dropped players.
pub(crate) fn sweep_leftovers<R: Rng + ?Sized>(
    players: &[Player],
    teams: &mut [TeamSheet],
    assigned: &mut [bool],
    caps: &FormationCaps,
    rng: &mut R,
) -> Vec<usize> {
    let mut leftovers: Vec<usize> = (0..players.len()).filter(|&i| !assigned[i]).collect();
    if leftovers.is_empty() {
        return Vec::new();
    }
    leftovers.shuffle(rng);
    debug!("sweeping {} leftover players", leftovers.len());

    for (n, &idx) in leftovers.iter().enumerate() {
        let mut candidates: Vec<usize> = (0..teams.len()).filter(|&t| !teams[t].is_full()).collect();
        if candidates.is_empty() {
            let dropped = leftovers[n..].to_vec();
            warn!(
                "all team capacity exhausted; {} players left out of the result",
                dropped.len()
            );
            return dropped;
        }
        candidates.sort_by_key(|&t| teams[t].len());

        let player = &players[idx];
        let slotted = candidates
            .iter()
            .find_map(|&t| flexible_line(&teams[t], caps).map(|line| (t, line)));

        match slotted {
            Some((t, line)) => {
                teams[t].place_in_line(idx, line, player.position_in_line(line));
            }
            None => teams[candidates[0]].add_substitute(idx),
        }
        assigned[idx] = true;
    }

    Vec::new()
}
