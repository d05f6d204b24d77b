// Player records: position vocabulary, formation lines, and stat blocks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rating used when a source record carries no stat block at all.
pub const DEFAULT_RATING: u8 = 75;

/// Lowest and highest value any sub-rating or overall may take.
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 99;

/// The fixed 12-symbol position vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "CB")]
    CentreBack,
    #[serde(rename = "LB")]
    LeftBack,
    #[serde(rename = "RB")]
    RightBack,
    #[serde(rename = "CDM")]
    DefensiveMidfield,
    #[serde(rename = "CM")]
    CentralMidfield,
    #[serde(rename = "CAM")]
    AttackingMidfield,
    #[serde(rename = "LM")]
    LeftMidfield,
    #[serde(rename = "RM")]
    RightMidfield,
    #[serde(rename = "LW")]
    LeftWing,
    #[serde(rename = "RW")]
    RightWing,
    #[serde(rename = "ST")]
    Striker,
}

impl Position {
    pub const ALL: [Position; 12] = [
        Position::Goalkeeper,
        Position::CentreBack,
        Position::LeftBack,
        Position::RightBack,
        Position::DefensiveMidfield,
        Position::CentralMidfield,
        Position::AttackingMidfield,
        Position::LeftMidfield,
        Position::RightMidfield,
        Position::LeftWing,
        Position::RightWing,
        Position::Striker,
    ];

    /// Parse a position code. Case-insensitive, surrounding whitespace ignored.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GK" => Some(Position::Goalkeeper),
            "CB" => Some(Position::CentreBack),
            "LB" => Some(Position::LeftBack),
            "RB" => Some(Position::RightBack),
            "CDM" => Some(Position::DefensiveMidfield),
            "CM" => Some(Position::CentralMidfield),
            "CAM" => Some(Position::AttackingMidfield),
            "LM" => Some(Position::LeftMidfield),
            "RM" => Some(Position::RightMidfield),
            "LW" => Some(Position::LeftWing),
            "RW" => Some(Position::RightWing),
            "ST" => Some(Position::Striker),
            _ => None,
        }
    }

    /// Return the display code for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::CentreBack => "CB",
            Position::LeftBack => "LB",
            Position::RightBack => "RB",
            Position::DefensiveMidfield => "CDM",
            Position::CentralMidfield => "CM",
            Position::AttackingMidfield => "CAM",
            Position::LeftMidfield => "LM",
            Position::RightMidfield => "RM",
            Position::LeftWing => "LW",
            Position::RightWing => "RW",
            Position::Striker => "ST",
        }
    }

    /// The formation line this position belongs to.
    pub fn line(&self) -> Line {
        match self {
            Position::Goalkeeper => Line::Goalkeeper,
            Position::CentreBack | Position::LeftBack | Position::RightBack => Line::Defence,
            Position::DefensiveMidfield
            | Position::CentralMidfield
            | Position::AttackingMidfield
            | Position::LeftMidfield
            | Position::RightMidfield => Line::Midfield,
            Position::LeftWing | Position::RightWing | Position::Striker => Line::Attack,
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Position::Goalkeeper)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// One of the four structural lines of a formation. Doubles as the role
/// category a player is rated for once placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defence,
    #[serde(rename = "MID")]
    Midfield,
    #[serde(rename = "ATT")]
    Attack,
}

/// Alias used by rating lookups, which speak in role categories.
pub type RoleCategory = Line;

impl Line {
    /// Outfield lines in slot-priority order (defence first).
    pub const OUTFIELD: [Line; 3] = [Line::Defence, Line::Midfield, Line::Attack];

    pub fn code(&self) -> &'static str {
        match self {
            Line::Goalkeeper => "GK",
            Line::Defence => "DEF",
            Line::Midfield => "MID",
            Line::Attack => "ATT",
        }
    }

    /// Position used when a player lands in this line without owning any of
    /// its positions.
    pub fn default_position(&self) -> Position {
        match self {
            Line::Goalkeeper => Position::Goalkeeper,
            Line::Defence => Position::CentreBack,
            Line::Midfield => Position::CentralMidfield,
            Line::Attack => Position::Striker,
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Stat blocks
// ---------------------------------------------------------------------------

/// Outfield sub-ratings plus the overall used for balancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfieldStats {
    pub pace: u8,
    pub shooting: u8,
    pub passing: u8,
    pub dribbling: u8,
    pub defending: u8,
    pub physical: u8,
    pub overall: u8,
}

impl OutfieldStats {
    /// Build a block whose overall is derived from the six sub-ratings.
    pub fn from_attributes(
        pace: u8,
        shooting: u8,
        passing: u8,
        dribbling: u8,
        defending: u8,
        physical: u8,
    ) -> Self {
        OutfieldStats {
            pace,
            shooting,
            passing,
            dribbling,
            defending,
            physical,
            overall: derive_overall([pace, shooting, passing, dribbling, defending, physical]),
        }
    }

    /// A block with every value set to `rating`.
    pub fn flat(rating: u8) -> Self {
        OutfieldStats {
            pace: rating,
            shooting: rating,
            passing: rating,
            dribbling: rating,
            defending: rating,
            physical: rating,
            overall: rating,
        }
    }
}

/// Goalkeeping sub-ratings plus the overall used for balancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalkeeperStats {
    pub diving: u8,
    pub handling: u8,
    pub kicking: u8,
    pub reflexes: u8,
    pub speed: u8,
    pub positioning: u8,
    pub overall: u8,
}

impl GoalkeeperStats {
    /// Build a block whose overall is derived from the six sub-ratings.
    pub fn from_attributes(
        diving: u8,
        handling: u8,
        kicking: u8,
        reflexes: u8,
        speed: u8,
        positioning: u8,
    ) -> Self {
        GoalkeeperStats {
            diving,
            handling,
            kicking,
            reflexes,
            speed,
            positioning,
            overall: derive_overall([diving, handling, kicking, reflexes, speed, positioning]),
        }
    }

    /// A block with every value set to `rating`.
    pub fn flat(rating: u8) -> Self {
        GoalkeeperStats {
            diving: rating,
            handling: rating,
            kicking: rating,
            reflexes: rating,
            speed: rating,
            positioning: rating,
            overall: rating,
        }
    }
}

/// Rounded mean of six sub-ratings, clamped to the rating range.
pub fn derive_overall(values: [u8; 6]) -> u8 {
    let sum: u32 = values.iter().map(|&v| u32::from(v)).sum();
    let mean = (f64::from(sum) / 6.0).round() as u8;
    mean.clamp(MIN_RATING, MAX_RATING)
}

/// Which stat blocks a player carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerKind {
    OutfieldOnly {
        outfield: OutfieldStats,
    },
    GoalkeeperOnly {
        goalkeeper: GoalkeeperStats,
    },
    DualRole {
        goalkeeper: GoalkeeperStats,
        outfield: OutfieldStats,
    },
}

impl PlayerKind {
    /// Combine optional blocks as a source record delivers them.
    /// Returns `None` when neither block is present.
    pub fn from_blocks(
        outfield: Option<OutfieldStats>,
        goalkeeper: Option<GoalkeeperStats>,
    ) -> Option<Self> {
        match (outfield, goalkeeper) {
            (Some(outfield), Some(goalkeeper)) => Some(PlayerKind::DualRole {
                goalkeeper,
                outfield,
            }),
            (Some(outfield), None) => Some(PlayerKind::OutfieldOnly { outfield }),
            (None, Some(goalkeeper)) => Some(PlayerKind::GoalkeeperOnly { goalkeeper }),
            (None, None) => None,
        }
    }

    /// Flat `DEFAULT_RATING` block for a record that carried no stats.
    /// Keepers-only get a goalkeeper block, everyone else an outfield block.
    pub fn fallback(positions: &[Position]) -> Self {
        if !positions.is_empty() && positions.iter().all(Position::is_goalkeeper) {
            PlayerKind::GoalkeeperOnly {
                goalkeeper: GoalkeeperStats::flat(DEFAULT_RATING),
            }
        } else {
            PlayerKind::OutfieldOnly {
                outfield: OutfieldStats::flat(DEFAULT_RATING),
            }
        }
    }

    pub fn outfield(&self) -> Option<&OutfieldStats> {
        match self {
            PlayerKind::OutfieldOnly { outfield } | PlayerKind::DualRole { outfield, .. } => {
                Some(outfield)
            }
            PlayerKind::GoalkeeperOnly { .. } => None,
        }
    }

    pub fn goalkeeper(&self) -> Option<&GoalkeeperStats> {
        match self {
            PlayerKind::GoalkeeperOnly { goalkeeper } | PlayerKind::DualRole { goalkeeper, .. } => {
                Some(goalkeeper)
            }
            PlayerKind::OutfieldOnly { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Opaque player identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_string())
    }
}

/// A rated player as handed to the engine. Never mutated during assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Positions the player can play. Non-empty, no duplicates.
    pub positions: Vec<Position>,
    /// The player's stated preference; a member of `positions`.
    pub preferred_position: Position,
    #[serde(flatten)]
    pub kind: PlayerKind,
}

impl Player {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        positions: Vec<Position>,
        preferred_position: Position,
        kind: PlayerKind,
    ) -> Self {
        let mut unique: Vec<Position> = Vec::with_capacity(positions.len());
        for pos in positions {
            if !unique.contains(&pos) {
                unique.push(pos);
            }
        }
        Player {
            id: PlayerId::new(id),
            name: name.into(),
            positions: unique,
            preferred_position,
            kind,
        }
    }

    pub fn can_play(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    /// Whether any of the player's positions belongs to `line`.
    pub fn plays_line(&self, line: Line) -> bool {
        self.positions.iter().any(|p| p.line() == line)
    }

    pub fn is_goalkeeper_capable(&self) -> bool {
        self.can_play(Position::Goalkeeper)
    }

    pub fn prefers_goalkeeper(&self) -> bool {
        self.preferred_position.is_goalkeeper()
    }

    /// Specific position for a player placed in `line`: the preferred
    /// position if it sits on that line, else the first owned position on
    /// the line, else the line's default.
    pub fn position_in_line(&self, line: Line) -> Position {
        if self.preferred_position.line() == line {
            return self.preferred_position;
        }
        self.positions
            .iter()
            .copied()
            .find(|p| p.line() == line)
            .unwrap_or_else(|| line.default_position())
    }
}
