// Squad loading from CSV.
//
// One row per player. Positions are a `|`-separated list of codes
// (`GK|CB`). Outfield and goalkeeper stat columns are both optional; a row
// with neither block falls back to a flat default rating.

use kickoff_core::player::{DEFAULT_RATING, MAX_RATING, MIN_RATING};
use kickoff_core::{GoalkeeperStats, OutfieldStats, Player, PlayerId, PlayerKind, Position};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Players read from a squad file, plus the ids flagged as selected.
#[derive(Debug, Clone, Default)]
pub struct LoadedSquad {
    pub players: Vec<Player>,
    /// Ids whose `selected` column was truthy, in file order.
    pub selected: Vec<PlayerId>,
}

#[derive(Debug, thiserror::Error)]
pub enum SquadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPlayer {
    id: String,
    name: String,
    positions: String,
    #[serde(default)]
    preferred: Option<String>,

    #[serde(default)]
    pace: Option<u32>,
    #[serde(default)]
    shooting: Option<u32>,
    #[serde(default)]
    passing: Option<u32>,
    #[serde(default)]
    dribbling: Option<u32>,
    #[serde(default)]
    defending: Option<u32>,
    #[serde(default)]
    physical: Option<u32>,
    #[serde(default)]
    overall: Option<u32>,

    #[serde(default)]
    diving: Option<u32>,
    #[serde(default)]
    handling: Option<u32>,
    #[serde(default)]
    kicking: Option<u32>,
    #[serde(default)]
    reflexes: Option<u32>,
    #[serde(default)]
    speed: Option<u32>,
    #[serde(default)]
    positioning: Option<u32>,
    #[serde(default)]
    gk_overall: Option<u32>,

    #[serde(default)]
    selected: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_positions(raw: &str) -> Result<Vec<Position>, String> {
    let mut positions = Vec::new();
    for code in raw.split('|').map(str::trim).filter(|c| !c.is_empty()) {
        match Position::from_str_pos(code) {
            Some(pos) if !positions.contains(&pos) => positions.push(pos),
            Some(_) => {}
            None => return Err(format!("unknown position '{code}'")),
        }
    }
    if positions.is_empty() {
        return Err("no positions listed".into());
    }
    Ok(positions)
}

fn check_rating(field: &str, value: u32) -> Result<u8, String> {
    if (u32::from(MIN_RATING)..=u32::from(MAX_RATING)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(format!("{field} {value} outside {MIN_RATING}..={MAX_RATING}"))
    }
}

/// Build a stat block from six optional sub-ratings and an optional overall.
///
/// All six present: derived block, with a supplied overall taking
/// precedence. Only the overall present: a flat block. Nothing present:
/// no block. Anything else is an incomplete row.
fn stat_block(
    names: [&str; 6],
    values: [Option<u32>; 6],
    overall: Option<u32>,
    overall_name: &str,
) -> Result<Option<([u8; 6], u8)>, String> {
    let present = values.iter().filter(|v| v.is_some()).count();
    let overall = overall.map(|v| check_rating(overall_name, v)).transpose()?;

    match (present, overall) {
        (0, None) => Ok(None),
        (0, Some(o)) => Ok(Some(([o; 6], o))),
        (6, _) => {
            let mut attrs = [0u8; 6];
            for (i, (name, value)) in names.iter().zip(values).enumerate() {
                // All six are Some here.
                attrs[i] = check_rating(name, value.unwrap_or_default())?;
            }
            let overall = overall.unwrap_or_else(|| kickoff_core::player::derive_overall(attrs));
            Ok(Some((attrs, overall)))
        }
        _ => Err(format!(
            "incomplete stat block: {present} of {} given",
            names.join("/")
        )),
    }
}

fn outfield_block(raw: &RawPlayer) -> Result<Option<OutfieldStats>, String> {
    let block = stat_block(
        ["pace", "shooting", "passing", "dribbling", "defending", "physical"],
        [
            raw.pace,
            raw.shooting,
            raw.passing,
            raw.dribbling,
            raw.defending,
            raw.physical,
        ],
        raw.overall,
        "overall",
    )?;
    Ok(block.map(|(a, overall)| OutfieldStats {
        pace: a[0],
        shooting: a[1],
        passing: a[2],
        dribbling: a[3],
        defending: a[4],
        physical: a[5],
        overall,
    }))
}

fn goalkeeper_block(raw: &RawPlayer) -> Result<Option<GoalkeeperStats>, String> {
    let block = stat_block(
        ["diving", "handling", "kicking", "reflexes", "speed", "positioning"],
        [
            raw.diving,
            raw.handling,
            raw.kicking,
            raw.reflexes,
            raw.speed,
            raw.positioning,
        ],
        raw.gk_overall,
        "gk_overall",
    )?;
    Ok(block.map(|(a, overall)| GoalkeeperStats {
        diving: a[0],
        handling: a[1],
        kicking: a[2],
        reflexes: a[3],
        speed: a[4],
        positioning: a[5],
        overall,
    }))
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "y" | "x")
    )
}

/// Validate one raw row into a player. Errors carry a reason for the log.
fn player_from_raw(raw: &RawPlayer) -> Result<Player, String> {
    let id = raw.id.trim();
    let name = raw.name.trim();
    if id.is_empty() {
        return Err("empty id".into());
    }
    if name.is_empty() {
        return Err("empty name".into());
    }

    let positions = parse_positions(&raw.positions)?;
    let preferred = match raw.preferred.as_deref().map(str::trim) {
        None | Some("") => positions[0],
        Some(code) => {
            let pos = Position::from_str_pos(code)
                .ok_or_else(|| format!("unknown preferred position '{code}'"))?;
            if !positions.contains(&pos) {
                return Err(format!("preferred position {pos} is not among its positions"));
            }
            pos
        }
    };

    let mut outfield = outfield_block(raw)?;
    let goalkeeper = goalkeeper_block(raw)?;

    if outfield.is_some() && positions.iter().all(Position::is_goalkeeper) {
        warn!("player '{}': ignoring outfield stats for a keeper-only player", id);
        outfield = None;
    }

    let kind = match PlayerKind::from_blocks(outfield, goalkeeper) {
        Some(kind) => kind,
        None => {
            warn!(
                "player '{}': no stats given, using flat rating {}",
                id, DEFAULT_RATING
            );
            PlayerKind::fallback(&positions)
        }
    };

    Ok(Player::new(id, name, positions, preferred, kind))
}

// ---------------------------------------------------------------------------
// Reader-based loader (enables testing without temp files)
// ---------------------------------------------------------------------------

pub fn load_squad_from_reader<R: Read>(rdr: R) -> Result<LoadedSquad, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);
    let mut squad = LoadedSquad::default();
    let mut seen: HashSet<PlayerId> = HashSet::new();

    for result in reader.deserialize::<RawPlayer>() {
        match result {
            Ok(raw) => match player_from_raw(&raw) {
                Ok(player) => {
                    if !seen.insert(player.id.clone()) {
                        warn!("skipping duplicate player id '{}'", player.id);
                        continue;
                    }
                    if is_truthy(raw.selected.as_deref()) {
                        squad.selected.push(player.id.clone());
                    }
                    squad.players.push(player);
                }
                Err(reason) => {
                    warn!("skipping player '{}': {}", raw.id.trim(), reason);
                }
            },
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(squad)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load a squad from a CSV file. Fails if no row survives validation.
pub fn load_squad(path: &Path) -> Result<LoadedSquad, SquadError> {
    let file = std::fs::File::open(path).map_err(|e| SquadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let squad = load_squad_from_reader(file).map_err(|e| SquadError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;

    if squad.players.is_empty() {
        return Err(SquadError::Validation(format!(
            "{} produced zero valid players",
            path.display()
        )));
    }

    info!(
        "loaded {} players ({} selected) from {}",
        squad.players.len(),
        squad.selected.len(),
        path.display()
    );
    Ok(squad)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use kickoff_core::overall_rating;

    const HEADER: &str = "id,name,positions,preferred,pace,shooting,passing,dribbling,defending,physical,overall,diving,handling,kicking,reflexes,speed,positioning,gk_overall,selected";

    fn load(rows: &[&str]) -> LoadedSquad {
        let data = format!("{HEADER}\n{}", rows.join("\n"));
        load_squad_from_reader(data.as_bytes()).unwrap()
    }

    #[test]
    fn outfield_row_with_sub_ratings() {
        let squad = load(&["p1,Ana Ruiz,CM|CAM,CAM,70,72,80,78,60,64,,,,,,,,,yes"]);
        assert_eq!(squad.players.len(), 1);
        let p = &squad.players[0];
        assert_eq!(p.id.as_str(), "p1");
        assert_eq!(p.positions, vec![Position::CentralMidfield, Position::AttackingMidfield]);
        assert_eq!(p.preferred_position, Position::AttackingMidfield);
        // (70+72+80+78+60+64) / 6 = 70.67
        assert_eq!(overall_rating(p), 71);
        assert_eq!(squad.selected, vec![PlayerId::from("p1")]);
    }

    #[test]
    fn supplied_overall_wins_over_derived() {
        let squad = load(&["p1,Ana,ST,,70,70,70,70,70,70,88,,,,,,,,"]);
        assert_eq!(overall_rating(&squad.players[0]), 88);
    }

    #[test]
    fn dual_role_row() {
        let squad = load(&["g1,Bo,GK|CB,GK,,,,,,,78,,,,,,,90,"]);
        let p = &squad.players[0];
        assert!(matches!(p.kind, PlayerKind::DualRole { .. }));
        assert_eq!(overall_rating(p), 90);
        assert!(squad.selected.is_empty());
    }

    #[test]
    fn preferred_defaults_to_first_position() {
        let squad = load(&["p1,Cy,LB|LM,,,,,,,,70,,,,,,,,"]);
        assert_eq!(squad.players[0].preferred_position, Position::LeftBack);
    }

    #[test]
    fn row_without_stats_uses_fallback() {
        let squad = load(&["k1,Dee,GK,,,,,,,,,,,,,,,,", "o1,Eli,RW,,,,,,,,,,,,,,,,"]);
        assert_eq!(squad.players.len(), 2);
        assert!(matches!(squad.players[0].kind, PlayerKind::GoalkeeperOnly { .. }));
        assert!(matches!(squad.players[1].kind, PlayerKind::OutfieldOnly { .. }));
        assert_eq!(overall_rating(&squad.players[0]), DEFAULT_RATING);
        assert_eq!(overall_rating(&squad.players[1]), DEFAULT_RATING);
    }

    #[test]
    fn keeper_only_player_drops_outfield_block() {
        let squad = load(&["k1,Fay,GK,,,,,,,,70,,,,,,,82,"]);
        assert!(matches!(
            squad.players[0].kind,
            PlayerKind::GoalkeeperOnly { .. }
        ));
    }

    #[test]
    fn invalid_rows_are_skipped() {
        let squad = load(&[
            "ok,Good,CB,,,,,,,,70,,,,,,,,",
            "bad1,Unknown Pos,XX,,,,,,,,70,,,,,,,,",
            "bad2,Out Of Range,CB,,,,,,,,120,,,,,,,,",
            "bad3,Wrong Pref,CB,ST,,,,,,,70,,,,,,,,",
            "bad4,Partial,CB,,70,70,,,,,,,,,,,,,",
            ",No Id,CB,,,,,,,,70,,,,,,,,",
            "bad5,,CB,,,,,,,,70,,,,,,,,",
            "bad6,Not A Number,CB,,,,,,,,abc,,,,,,,,",
        ]);
        assert_eq!(squad.players.len(), 1);
        assert_eq!(squad.players[0].id.as_str(), "ok");
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let squad = load(&["p1,First,CB,,,,,,,,70,,,,,,,,", "p1,Second,ST,,,,,,,,80,,,,,,,,"]);
        assert_eq!(squad.players.len(), 1);
        assert_eq!(squad.players[0].name, "First");
    }

    #[test]
    fn minimal_columns_are_enough() {
        let data = "id,name,positions\np1,Gil,cb|rb\n";
        let squad = load_squad_from_reader(data.as_bytes()).unwrap();
        assert_eq!(squad.players[0].positions, vec![Position::CentreBack, Position::RightBack]);
    }

    #[test]
    fn truthy_values() {
        for v in ["1", "true", "YES", "y", "x"] {
            assert!(is_truthy(Some(v)), "{v}");
        }
        for v in ["", "0", "no", "false"] {
            assert!(!is_truthy(Some(v)), "{v}");
        }
        assert!(!is_truthy(None));
    }

    #[test]
    fn load_squad_missing_file_is_io_error() {
        let err = load_squad(Path::new("/nonexistent/kickoff/players.csv")).unwrap_err();
        assert!(matches!(err, SquadError::Io { .. }));
    }
}
