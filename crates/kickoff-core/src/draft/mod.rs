// Team assignment: size planning, goalkeepers, snake draft, leftover sweep.

pub mod formation;
mod goalkeepers;
pub mod sizing;
pub mod snake;
mod sweep;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::player::Player;
use formation::{FormationCaps, Team, TeamSheet};

/// Jitter amplitude used when regenerating, in rating points.
pub const DEFAULT_JITTER_AMPLITUDE: f64 = 5.0;

/// Largest accepted jitter amplitude, in rating points.
pub const MAX_JITTER_AMPLITUDE: f64 = 20.0;

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("no players to assign")]
    EmptyPool,

    #[error("team count must be at least 1")]
    NoTeams,

    #[error("size plan has {actual} entries for {expected} teams")]
    SizePlanMismatch { expected: usize, actual: usize },

    #[error("jitter amplitude must be finite and within 0..={max}, got {0}", max = MAX_JITTER_AMPLITUDE)]
    InvalidJitter(f64),
}

/// Knobs for a single assignment run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftSettings {
    pub formation: FormationCaps,
    /// Half-width of the uniform noise added to ratings before sorting.
    /// Zero on first generation.
    pub jitter_amplitude: f64,
}

impl Default for DraftSettings {
    fn default() -> Self {
        DraftSettings {
            formation: FormationCaps::default(),
            jitter_amplitude: 0.0,
        }
    }
}

impl DraftSettings {
    pub fn with_jitter(mut self, amplitude: f64) -> Self {
        self.jitter_amplitude = amplitude;
        self
    }
}

/// Split `players` into `num_teams` teams with the given per-team quotas.
///
/// Runs goalkeeper allocation, the outfield snake draft, and the leftover
/// sweep, then aggregates ratings. Players are never mutated; the output is a
/// fresh set of teams. All randomness comes from `rng`, so a seeded generator
/// reproduces the same partition.
///
/// Players that do not fit once every team is at quota are left out of the
/// result (logged, not an error).
pub fn assign_teams<R: Rng + ?Sized>(
    players: &[Player],
    num_teams: usize,
    sizes: &[usize],
    settings: &DraftSettings,
    rng: &mut R,
) -> Result<Vec<Team>, DraftError> {
    if players.is_empty() {
        return Err(DraftError::EmptyPool);
    }
    if num_teams == 0 {
        return Err(DraftError::NoTeams);
    }
    if sizes.len() != num_teams {
        return Err(DraftError::SizePlanMismatch {
            expected: num_teams,
            actual: sizes.len(),
        });
    }
    let jitter = settings.jitter_amplitude;
    if !jitter.is_finite() || !(0.0..=MAX_JITTER_AMPLITUDE).contains(&jitter) {
        return Err(DraftError::InvalidJitter(jitter));
    }

    let mut sheets: Vec<TeamSheet> = sizes.iter().map(|&s| TeamSheet::new(s)).collect();
    let mut assigned = vec![false; players.len()];

    let keepers = goalkeepers::assign_goalkeepers(players, &mut sheets, &mut assigned, rng);
    snake::draft_outfield(
        players,
        &mut sheets,
        &mut assigned,
        &settings.formation,
        settings.jitter_amplitude,
        rng,
    );
    let dropped = sweep::sweep_leftovers(players, &mut sheets, &mut assigned, &settings.formation, rng);

    let teams: Vec<Team> = sheets
        .into_iter()
        .enumerate()
        .map(|(i, sheet)| sheet.into_team(i as u32 + 1, players))
        .collect();

    for team in &teams {
        debug!(
            "{}: {}/{} players, total {}, avg {:.1}",
            team.name,
            team.len(),
            team.target_size,
            team.total_rating,
            team.average_rating
        );
    }
    info!(
        "assigned {} players to {} teams ({} keepers, {} dropped)",
        players.len() - dropped.len(),
        num_teams,
        keepers.len(),
        dropped.len()
    );

    Ok(teams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::sizing::plan_sizes;
    use crate::player::{GoalkeeperStats, OutfieldStats, PlayerId, PlayerKind, Position};
    use crate::rating::overall_rating;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn squad() -> Vec<Player> {
        let outfield = [
            ("cb1", vec![Position::CentreBack], 78),
            ("cb2", vec![Position::CentreBack, Position::RightBack], 74),
            ("lb1", vec![Position::LeftBack, Position::LeftMidfield], 71),
            ("rb1", vec![Position::RightBack], 69),
            ("cdm1", vec![Position::DefensiveMidfield, Position::CentreBack], 80),
            ("cm1", vec![Position::CentralMidfield], 76),
            ("cm2", vec![Position::CentralMidfield, Position::AttackingMidfield], 73),
            ("cam1", vec![Position::AttackingMidfield], 82),
            ("lm1", vec![Position::LeftMidfield, Position::LeftWing], 68),
            ("rm1", vec![Position::RightMidfield], 66),
            ("lw1", vec![Position::LeftWing], 79),
            ("rw1", vec![Position::RightWing, Position::Striker], 75),
            ("st1", vec![Position::Striker], 85),
            ("st2", vec![Position::Striker], 72),
        ];
        let mut players: Vec<Player> = outfield
            .into_iter()
            .map(|(id, positions, overall)| {
                let preferred = positions[0];
                Player::new(
                    id,
                    id.to_uppercase(),
                    positions,
                    preferred,
                    PlayerKind::OutfieldOnly {
                        outfield: OutfieldStats::flat(overall),
                    },
                )
            })
            .collect();
        players.push(Player::new(
            "gk1",
            "GK1",
            vec![Position::Goalkeeper],
            Position::Goalkeeper,
            PlayerKind::GoalkeeperOnly {
                goalkeeper: GoalkeeperStats::flat(81),
            },
        ));
        players.push(Player::new(
            "gk2",
            "GK2",
            vec![Position::Goalkeeper, Position::CentreBack],
            Position::Goalkeeper,
            PlayerKind::DualRole {
                goalkeeper: GoalkeeperStats::flat(77),
                outfield: OutfieldStats::flat(65),
            },
        ));
        players
    }

    fn run(players: &[Player], num_teams: usize, seed: u64) -> Vec<Team> {
        let sizes = plan_sizes(players.len(), num_teams);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        assign_teams(players, num_teams, &sizes, &DraftSettings::default(), &mut rng).unwrap()
    }

    #[test]
    fn rejects_empty_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = assign_teams(&[], 2, &[0, 0], &DraftSettings::default(), &mut rng).unwrap_err();
        assert_eq!(err, DraftError::EmptyPool);
    }

    #[test]
    fn rejects_zero_teams() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = assign_teams(&squad(), 0, &[], &DraftSettings::default(), &mut rng).unwrap_err();
        assert_eq!(err, DraftError::NoTeams);
    }

    #[test]
    fn rejects_mismatched_size_plan() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = assign_teams(&squad(), 3, &[8, 8], &DraftSettings::default(), &mut rng).unwrap_err();
        assert_eq!(
            err,
            DraftError::SizePlanMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_unusable_jitter() {
        let players = squad();
        let sizes = plan_sizes(players.len(), 2);
        for amplitude in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, -1.0, 1e300] {
            let settings = DraftSettings::default().with_jitter(amplitude);
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            let err = assign_teams(&players, 2, &sizes, &settings, &mut rng).unwrap_err();
            assert!(
                matches!(err, DraftError::InvalidJitter(_)),
                "amplitude {amplitude} gave {err:?}"
            );
        }
    }

    #[test]
    fn accepts_jitter_at_the_bound() {
        let players = squad();
        let sizes = plan_sizes(players.len(), 2);
        let settings = DraftSettings::default().with_jitter(MAX_JITTER_AMPLITUDE);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(assign_teams(&players, 2, &sizes, &settings, &mut rng).is_ok());
    }

    #[test]
    fn everyone_placed_exactly_once_when_quotas_cover_pool() {
        let players = squad();
        for seed in 0..25 {
            let teams = run(&players, 2, seed);
            let ids: Vec<&PlayerId> = teams
                .iter()
                .flat_map(|t| t.players.iter().map(|m| &m.player_id))
                .collect();
            let unique: HashSet<&PlayerId> = ids.iter().copied().collect();
            assert_eq!(ids.len(), unique.len(), "double assignment (seed {seed})");
            // Quotas sum to the pool size, so nobody is dropped.
            assert_eq!(ids.len(), players.len(), "dropped players (seed {seed})");
        }
    }

    #[test]
    fn each_team_gets_a_keeper_when_enough_exist() {
        let players = squad();
        for seed in 0..25 {
            let teams = run(&players, 2, seed);
            assert!(teams.iter().all(|t| t.formation.goalkeeper.is_some()));
        }
    }

    #[test]
    fn sizes_match_plan() {
        let players = squad();
        let teams = run(&players, 3, 17);
        let sizes: Vec<usize> = teams.iter().map(|t| t.len()).collect();
        assert_eq!(sizes, plan_sizes(players.len(), 3));
    }

    #[test]
    fn totals_are_sums_of_overall_ratings() {
        let players = squad();
        let teams = run(&players, 3, 5);
        for team in &teams {
            let expected: u32 = team
                .players
                .iter()
                .map(|m| {
                    let p = players.iter().find(|p| p.id == m.player_id).unwrap();
                    u32::from(overall_rating(p))
                })
                .sum();
            assert_eq!(team.total_rating, expected);
        }
    }

    #[test]
    fn same_seed_same_partition() {
        let players = squad();
        let sizes = plan_sizes(players.len(), 3);
        let settings = DraftSettings::default().with_jitter(DEFAULT_JITTER_AMPLITUDE);

        let mut rng_a = ChaCha8Rng::seed_from_u64(1234);
        let mut rng_b = ChaCha8Rng::seed_from_u64(1234);
        let a = assign_teams(&players, 3, &sizes, &settings, &mut rng_a).unwrap();
        let b = assign_teams(&players, 3, &sizes, &settings, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn teams_are_numbered_from_one() {
        let teams = run(&squad(), 3, 2);
        let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Team 1", "Team 2", "Team 3"]);
        assert_eq!(teams[2].id, 3);
    }
}
