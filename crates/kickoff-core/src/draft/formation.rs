// Team output types and the working sheet each team is built on.

use serde::{Deserialize, Serialize};

use crate::player::{Line, Player, PlayerId, Position};
use crate::rating::overall_rating;

/// Soft per-team capacity of each outfield line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormationCaps {
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

impl Default for FormationCaps {
    /// A 4-4-3 shape behind one goalkeeper.
    fn default() -> Self {
        FormationCaps {
            defenders: 4,
            midfielders: 4,
            forwards: 3,
        }
    }
}

impl FormationCaps {
    pub fn capacity(&self, line: Line) -> usize {
        match line {
            Line::Goalkeeper => 1,
            Line::Defence => self.defenders,
            Line::Midfield => self.midfielders,
            Line::Attack => self.forwards,
        }
    }
}

/// A player on a generated team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub player_id: PlayerId,
    pub name: String,
    /// Where the player lines up. `None` for an unslotted substitute.
    pub assigned_position: Option<Position>,
}

impl TeamMember {
    pub fn is_substitute(&self) -> bool {
        self.assigned_position.is_none()
    }
}

/// The four structural lines of a generated team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub goalkeeper: Option<PlayerId>,
    pub defenders: Vec<PlayerId>,
    pub midfielders: Vec<PlayerId>,
    pub forwards: Vec<PlayerId>,
}

impl Formation {
    /// Number of players slotted on `line`.
    pub fn line_len(&self, line: Line) -> usize {
        match line {
            Line::Goalkeeper => usize::from(self.goalkeeper.is_some()),
            Line::Defence => self.defenders.len(),
            Line::Midfield => self.midfielders.len(),
            Line::Attack => self.forwards.len(),
        }
    }

    /// Total players slotted into any line.
    pub fn slotted(&self) -> usize {
        usize::from(self.goalkeeper.is_some())
            + self.defenders.len()
            + self.midfielders.len()
            + self.forwards.len()
    }
}

/// A generated team with its aggregate ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// 1-based team number.
    pub id: u32,
    pub name: String,
    pub players: Vec<TeamMember>,
    pub formation: Formation,
    /// Sum of each member's overall rating.
    pub total_rating: u32,
    /// `total_rating / players.len()` to one decimal, 0 for an empty team.
    pub average_rating: f64,
    /// The quota the size planner gave this team.
    pub target_size: usize,
}

impl Team {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.target_size
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.iter().any(|m| &m.player_id == id)
    }

    /// Members that were not slotted into any formation line.
    pub fn substitutes(&self) -> impl Iterator<Item = &TeamMember> {
        self.players.iter().filter(|m| m.is_substitute())
    }
}

/// Round to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Working sheet
// ---------------------------------------------------------------------------

/// A team under construction. Members are indices into the player slice the
/// run was started with, so player records are never touched.
#[derive(Debug, Clone)]
pub(crate) struct TeamSheet {
    pub target_size: usize,
    pub goalkeeper: Option<usize>,
    pub defenders: Vec<usize>,
    pub midfielders: Vec<usize>,
    pub forwards: Vec<usize>,
    /// Placement order, with the position each member lines up in.
    pub members: Vec<(usize, Option<Position>)>,
}

impl TeamSheet {
    pub fn new(target_size: usize) -> Self {
        TeamSheet {
            target_size,
            goalkeeper: None,
            defenders: Vec::new(),
            midfielders: Vec::new(),
            forwards: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// A zero-quota team is full from the start.
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.target_size
    }

    pub fn line_len(&self, line: Line) -> usize {
        match line {
            Line::Goalkeeper => usize::from(self.goalkeeper.is_some()),
            Line::Defence => self.defenders.len(),
            Line::Midfield => self.midfielders.len(),
            Line::Attack => self.forwards.len(),
        }
    }

    pub fn has_room(&self, line: Line, caps: &FormationCaps) -> bool {
        self.line_len(line) < caps.capacity(line)
    }

    /// Fill the goalkeeper slot. Returns `false` if it is already taken.
    pub fn place_goalkeeper(&mut self, idx: usize) -> bool {
        if self.goalkeeper.is_some() {
            return false;
        }
        self.goalkeeper = Some(idx);
        self.members.push((idx, Some(Position::Goalkeeper)));
        true
    }

    /// Slot a player into an outfield line. Capacity is the caller's check.
    pub fn place_in_line(&mut self, idx: usize, line: Line, position: Position) {
        match line {
            Line::Goalkeeper => {
                self.place_goalkeeper(idx);
                return;
            }
            Line::Defence => self.defenders.push(idx),
            Line::Midfield => self.midfielders.push(idx),
            Line::Attack => self.forwards.push(idx),
        }
        self.members.push((idx, Some(position)));
    }

    /// Add a player outside every formation line.
    pub fn add_substitute(&mut self, idx: usize) {
        self.members.push((idx, None));
    }

    /// Resolve indices against `players` and aggregate ratings.
    pub fn into_team(self, id: u32, players: &[Player]) -> Team {
        let ids = |indices: &[usize]| -> Vec<PlayerId> {
            indices.iter().map(|&i| players[i].id.clone()).collect()
        };

        let formation = Formation {
            goalkeeper: self.goalkeeper.map(|i| players[i].id.clone()),
            defenders: ids(&self.defenders),
            midfielders: ids(&self.midfielders),
            forwards: ids(&self.forwards),
        };

        let total_rating: u32 = self
            .members
            .iter()
            .map(|&(i, _)| u32::from(overall_rating(&players[i])))
            .sum();
        let average_rating = if self.members.is_empty() {
            0.0
        } else {
            round_to_tenth(f64::from(total_rating) / self.members.len() as f64)
        };

        let members = self
            .members
            .into_iter()
            .map(|(i, assigned_position)| TeamMember {
                player_id: players[i].id.clone(),
                name: players[i].name.clone(),
                assigned_position,
            })
            .collect();

        Team {
            id,
            name: format!("Team {id}"),
            players: members,
            formation,
            total_rating,
            average_rating,
            target_size: self.target_size,
        }
    }
}
