// Generation sessions: resolve a request against the squad, run the engine,
// and remember the request so it can be re-rolled.

use chrono::{DateTime, Utc};
use kickoff_core::{
    assign_teams, plan_sizes, DraftError, DraftSettings, FormationCaps, Player, PlayerId, Team,
    DEFAULT_JITTER_AMPLITUDE,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("number of teams must be at least 1")]
    NoTeams,

    #[error("no players selected")]
    EmptySelection,

    #[error("unknown player ids in selection: {}", format_ids(.0))]
    UnknownPlayers(Vec<PlayerId>),

    #[error("nothing to regenerate; generate teams first")]
    NothingToRegenerate,

    #[error(transparent)]
    Draft(#[from] DraftError),
}

fn format_ids(ids: &[PlayerId]) -> String {
    ids.iter().map(PlayerId::as_str).collect::<Vec<_>>().join(", ")
}

/// Which players take part in a generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "ids", rename_all = "snake_case")]
pub enum SelectionMode {
    All,
    Selected(Vec<PlayerId>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub num_teams: usize,
    pub selection: SelectionMode,
}

impl GenerationRequest {
    pub fn all(num_teams: usize) -> Self {
        GenerationRequest {
            num_teams,
            selection: SelectionMode::All,
        }
    }

    pub fn selected(num_teams: usize, ids: Vec<PlayerId>) -> Self {
        GenerationRequest {
            num_teams,
            selection: SelectionMode::Selected(ids),
        }
    }
}

/// One complete set of teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub teams: Vec<Team>,
    pub generated_at: DateTime<Utc>,
    pub num_teams: usize,
    /// True when produced by a re-roll of the previous request.
    pub regenerated: bool,
    /// Players in the pool that no team had room for.
    pub dropped: Vec<PlayerId>,
}

/// A squad plus the last request and result made against it.
///
/// Each call builds fresh teams; the previous result is replaced, never
/// updated in place.
#[derive(Debug, Clone)]
pub struct Session {
    players: Vec<Player>,
    formation: FormationCaps,
    jitter_amplitude: f64,
    last_request: Option<GenerationRequest>,
    last_result: Option<GenerationResult>,
}

impl Session {
    pub fn new(players: Vec<Player>, formation: FormationCaps) -> Self {
        Session {
            players,
            formation,
            jitter_amplitude: DEFAULT_JITTER_AMPLITUDE,
            last_request: None,
            last_result: None,
        }
    }

    /// Jitter amplitude applied on regenerate.
    pub fn with_jitter(mut self, amplitude: f64) -> Self {
        self.jitter_amplitude = amplitude;
        self
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn last_request(&self) -> Option<&GenerationRequest> {
        self.last_request.as_ref()
    }

    pub fn last_result(&self) -> Option<&GenerationResult> {
        self.last_result.as_ref()
    }

    /// Generate teams for `request` without jitter.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        request: GenerationRequest,
        rng: &mut R,
    ) -> Result<&GenerationResult, SessionError> {
        let result = self.run(&request, 0.0, false, rng)?;
        self.last_request = Some(request);
        Ok(self.last_result.insert(result))
    }

    /// Re-run the previous request with jittered ratings for variety.
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<&GenerationResult, SessionError> {
        let request = self
            .last_request
            .clone()
            .ok_or(SessionError::NothingToRegenerate)?;
        let result = self.run(&request, self.jitter_amplitude, true, rng)?;
        Ok(self.last_result.insert(result))
    }

    fn run<R: Rng + ?Sized>(
        &self,
        request: &GenerationRequest,
        jitter_amplitude: f64,
        regenerated: bool,
        rng: &mut R,
    ) -> Result<GenerationResult, SessionError> {
        if request.num_teams == 0 {
            return Err(SessionError::NoTeams);
        }
        let pool = self.resolve(&request.selection)?;

        let sizes = plan_sizes(pool.len(), request.num_teams);
        let settings = DraftSettings {
            formation: self.formation,
            jitter_amplitude,
        };
        let teams = assign_teams(&pool, request.num_teams, &sizes, &settings, rng)?;

        let placed: HashSet<&PlayerId> = teams
            .iter()
            .flat_map(|t| t.players.iter().map(|m| &m.player_id))
            .collect();
        let dropped: Vec<PlayerId> = pool
            .iter()
            .filter(|p| !placed.contains(&p.id))
            .map(|p| p.id.clone())
            .collect();

        info!(
            "{} {} teams from {} players",
            if regenerated { "regenerated" } else { "generated" },
            request.num_teams,
            pool.len()
        );

        Ok(GenerationResult {
            teams,
            generated_at: Utc::now(),
            num_teams: request.num_teams,
            regenerated,
            dropped,
        })
    }

    /// Players taking part, in squad order.
    fn resolve(&self, selection: &SelectionMode) -> Result<Vec<Player>, SessionError> {
        match selection {
            SelectionMode::All => {
                if self.players.is_empty() {
                    return Err(SessionError::EmptySelection);
                }
                Ok(self.players.clone())
            }
            SelectionMode::Selected(ids) => {
                if ids.is_empty() {
                    return Err(SessionError::EmptySelection);
                }
                let wanted: HashSet<&PlayerId> = ids.iter().collect();
                let known: HashSet<&PlayerId> = self.players.iter().map(|p| &p.id).collect();

                let mut unknown: Vec<PlayerId> = wanted
                    .iter()
                    .filter(|id| !known.contains(*id))
                    .map(|id| (*id).clone())
                    .collect();
                if !unknown.is_empty() {
                    unknown.sort();
                    return Err(SessionError::UnknownPlayers(unknown));
                }

                Ok(self
                    .players
                    .iter()
                    .filter(|p| wanted.contains(&p.id))
                    .cloned()
                    .collect())
            }
        }
    }
}
