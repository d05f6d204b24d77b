// Team-assignment engine: splits a pool of rated, multi-position players
// into balanced teams shaped like a soccer formation.

pub mod draft;
pub mod player;
pub mod rating;

pub use draft::formation::{Formation, FormationCaps, Team, TeamMember};
pub use draft::sizing::plan_sizes;
pub use draft::{
    assign_teams, DraftError, DraftSettings, DEFAULT_JITTER_AMPLITUDE, MAX_JITTER_AMPLITUDE,
};
pub use player::{
    GoalkeeperStats, Line, OutfieldStats, Player, PlayerId, PlayerKind, Position, RoleCategory,
};
pub use rating::{overall_rating, rating_for_role};
