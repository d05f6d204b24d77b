// Rating lookups used for balancing and by callers displaying a lineup.

use crate::player::{Line, Player, PlayerKind, RoleCategory};

/// Points deducted when a player is rated in a role they have no block for.
pub const ROLE_PENALTY: u8 = 20;

/// A penalised rating never drops below this.
pub const ROLE_PENALTY_FLOOR: u8 = 40;

/// The overall rating the engine balances on.
///
/// Dual-role players are rated with the block matching their preferred
/// position: goalkeeper stats when they prefer GK, outfield stats otherwise.
pub fn overall_rating(player: &Player) -> u8 {
    match &player.kind {
        PlayerKind::OutfieldOnly { outfield } => outfield.overall,
        PlayerKind::GoalkeeperOnly { goalkeeper } => goalkeeper.overall,
        PlayerKind::DualRole {
            goalkeeper,
            outfield,
        } => {
            if player.prefers_goalkeeper() {
                goalkeeper.overall
            } else {
                outfield.overall
            }
        }
    }
}

/// Rating of a player once placed in a given role category.
///
/// Outfield roles use the outfield overall whenever the player has one,
/// whatever specific position they were given. A goalkeeper-only player
/// pushed into an outfield role is rated `max(gk - ROLE_PENALTY, FLOOR)`;
/// an outfield-only player pushed into goal is penalised the same way.
pub fn rating_for_role(player: &Player, role: RoleCategory) -> u8 {
    match (role, &player.kind) {
        (Line::Goalkeeper, PlayerKind::GoalkeeperOnly { goalkeeper })
        | (Line::Goalkeeper, PlayerKind::DualRole { goalkeeper, .. }) => goalkeeper.overall,
        (Line::Goalkeeper, PlayerKind::OutfieldOnly { outfield }) => penalised(outfield.overall),
        (_, PlayerKind::OutfieldOnly { outfield }) | (_, PlayerKind::DualRole { outfield, .. }) => {
            outfield.overall
        }
        (_, PlayerKind::GoalkeeperOnly { goalkeeper }) => penalised(goalkeeper.overall),
    }
}

fn penalised(overall: u8) -> u8 {
    overall
        .saturating_sub(ROLE_PENALTY)
        .max(ROLE_PENALTY_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{GoalkeeperStats, OutfieldStats, Position};

    fn dual_role_keeper() -> Player {
        Player::new(
            "dual",
            "Dual Role",
            vec![Position::Goalkeeper, Position::CentreBack],
            Position::Goalkeeper,
            PlayerKind::DualRole {
                goalkeeper: GoalkeeperStats::flat(90),
                outfield: OutfieldStats::flat(78),
            },
        )
    }

    fn keeper_only(overall: u8) -> Player {
        Player::new(
            "gk",
            "Keeper Only",
            vec![Position::Goalkeeper],
            Position::Goalkeeper,
            PlayerKind::GoalkeeperOnly {
                goalkeeper: GoalkeeperStats::flat(overall),
            },
        )
    }

    #[test]
    fn dual_role_preferring_gk_uses_gk_block() {
        assert_eq!(overall_rating(&dual_role_keeper()), 90);
    }

    #[test]
    fn dual_role_preferring_outfield_uses_outfield_block() {
        let mut p = dual_role_keeper();
        p.preferred_position = Position::CentreBack;
        assert_eq!(overall_rating(&p), 78);
    }

    #[test]
    fn dual_role_in_attack_uses_outfield_overall() {
        // Even if drafted as ST, the outfield block exists and wins.
        let p = dual_role_keeper();
        assert_eq!(rating_for_role(&p, Line::Attack), 78);
        assert_eq!(rating_for_role(&p, Line::Defence), 78);
        assert_eq!(rating_for_role(&p, Line::Goalkeeper), 90);
    }

    #[test]
    fn keeper_only_forced_outfield_is_penalised() {
        let p = keeper_only(90);
        assert_eq!(rating_for_role(&p, Line::Attack), 70);
        assert_eq!(rating_for_role(&p, Line::Goalkeeper), 90);
    }

    #[test]
    fn penalty_is_floored() {
        let p = keeper_only(50);
        assert_eq!(rating_for_role(&p, Line::Midfield), ROLE_PENALTY_FLOOR);
    }

    #[test]
    fn outfield_only_in_goal_is_penalised() {
        let p = Player::new(
            "st",
            "Striker",
            vec![Position::Striker],
            Position::Striker,
            PlayerKind::OutfieldOnly {
                outfield: OutfieldStats::flat(85),
            },
        );
        assert_eq!(overall_rating(&p), 85);
        assert_eq!(rating_for_role(&p, Line::Attack), 85);
        assert_eq!(rating_for_role(&p, Line::Goalkeeper), 65);
    }
}
