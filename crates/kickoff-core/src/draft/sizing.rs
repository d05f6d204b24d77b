// Per-team target sizes.

/// Split `total_players` into `num_teams` quotas that differ by at most one.
///
/// The first `total_players % num_teams` teams get the extra player. When
/// there are more teams than players, the trailing quotas are zero. A zero
/// team count yields an empty plan.
pub fn plan_sizes(total_players: usize, num_teams: usize) -> Vec<usize> {
    if num_teams == 0 {
        return Vec::new();
    }
    let base = total_players / num_teams;
    let extra = total_players % num_teams;
    (0..num_teams)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}
