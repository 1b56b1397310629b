// Player records and validated ingestion from the raw JSON pool.
//
// The data source delivers a JSON array of loosely typed player objects.
// Everything optional is resolved here, once, so the rest of the engine only
// ever sees a fully populated `PlayerRecord`.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use super::position::Position;

/// Club assigned to players whose record carries no club.
pub const FREE_AGENT: &str = "Free Agent";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A validated, immutable player from the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub name: String,
    pub position: Position,
    pub rating: u32,
    pub price: u64,
    pub club: String,
    pub nationality: String,
    pub league: String,
    pub is_hero: bool,
    pub is_icon: bool,
}

/// The loaded player pool. Records are shared with the squad, never copied.
pub type PlayerPool = Vec<Arc<PlayerRecord>>;

/// Special card badge shown next to a player's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Hero,
    Icon,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::Hero => "HERO",
            Badge::Icon => "ICON",
        }
    }
}

impl PlayerRecord {
    /// Hero takes precedence when a record is flagged as both.
    pub fn badge(&self) -> Option<Badge> {
        if self.is_hero {
            Some(Badge::Hero)
        } else if self.is_icon {
            Some(Badge::Icon)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("player data is not a valid JSON array of players: {0}")]
    Json(#[from] serde_json::Error),

    #[error("player #{index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("player #{index} ({name}) has unknown position `{code}`")]
    UnknownPosition {
        index: usize,
        name: String,
        code: String,
    },
}

// ---------------------------------------------------------------------------
// Raw serde struct (private)
// ---------------------------------------------------------------------------

/// One player object as found in the source JSON. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawPlayer {
    name: Option<String>,
    position: Option<String>,
    rating: Option<u32>,
    price: Option<u64>,
    club: Option<String>,
    nationality: Option<String>,
    league: Option<String>,
    is_hero: Option<bool>,
    is_icon: Option<bool>,
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

fn required<T>(value: Option<T>, index: usize, field: &'static str) -> Result<T, PlayerError> {
    value.ok_or(PlayerError::MissingField { index, field })
}

/// Absent, null and empty strings all count as missing.
fn required_text(
    value: Option<String>,
    index: usize,
    field: &'static str,
) -> Result<String, PlayerError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(PlayerError::MissingField { index, field }),
    }
}

impl RawPlayer {
    fn into_record(self, index: usize) -> Result<PlayerRecord, PlayerError> {
        let name = required_text(self.name, index, "name")?;
        let code = required_text(self.position, index, "position")?;
        let position = Position::from_code(&code).ok_or_else(|| PlayerError::UnknownPosition {
            index,
            name: name.clone(),
            code: code.clone(),
        })?;

        let club = match self.club {
            Some(club) if !club.trim().is_empty() => club,
            _ => FREE_AGENT.to_string(),
        };

        Ok(PlayerRecord {
            name,
            position,
            rating: required(self.rating, index, "rating")?,
            price: required(self.price, index, "price")?,
            club,
            nationality: required_text(self.nationality, index, "nationality")?,
            league: required_text(self.league, index, "league")?,
            is_hero: self.is_hero.unwrap_or(false),
            is_icon: self.is_icon.unwrap_or(false),
        })
    }
}

/// Parse and validate a JSON array of player objects into a pool.
///
/// The first invalid record aborts ingestion; nothing is silently coerced
/// apart from the documented club / hero / icon defaults.
pub fn parse_players(json: &str) -> Result<PlayerPool, PlayerError> {
    let raw: Vec<RawPlayer> = serde_json::from_str(json)?;
    raw.into_iter()
        .enumerate()
        .map(|(i, p)| p.into_record(i).map(Arc::new))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"[{
        "name": "Kylian Mbappe", "position": "ST", "rating": 91, "price": 1250000,
        "club": "Real Madrid", "nationality": "France", "league": "LALIGA EA SPORTS",
        "is_hero": false, "is_icon": false
    }]"#;

    #[test]
    fn parses_complete_record() {
        let pool = parse_players(FULL).unwrap();
        assert_eq!(pool.len(), 1);
        let p = &pool[0];
        assert_eq!(p.name, "Kylian Mbappe");
        assert_eq!(p.position, Position::Striker);
        assert_eq!(p.rating, 91);
        assert_eq!(p.price, 1_250_000);
        assert_eq!(p.club, "Real Madrid");
        assert_eq!(p.badge(), None);
    }

    #[test]
    fn applies_defaults_for_club_and_flags() {
        let json = r#"[{
            "name": "Unattached", "position": "CB", "rating": 70, "price": 500,
            "nationality": "Spain", "league": "Free"
        }]"#;
        let pool = parse_players(json).unwrap();
        assert_eq!(pool[0].club, FREE_AGENT);
        assert!(!pool[0].is_hero);
        assert!(!pool[0].is_icon);
    }

    #[test]
    fn null_or_empty_club_becomes_free_agent() {
        let json = r#"[
            {"name": "A", "position": "GK", "rating": 60, "price": 1, "club": null,
             "nationality": "X", "league": "Y"},
            {"name": "B", "position": "GK", "rating": 60, "price": 1, "club": "",
             "nationality": "X", "league": "Y"}
        ]"#;
        let pool = parse_players(json).unwrap();
        assert!(pool.iter().all(|p| p.club == FREE_AGENT));
    }

    #[test]
    fn missing_rating_is_an_error() {
        let json = r#"[{"name": "A", "position": "GK", "price": 1,
                        "nationality": "X", "league": "Y"}]"#;
        match parse_players(json).unwrap_err() {
            PlayerError::MissingField { index, field } => {
                assert_eq!(index, 0);
                assert_eq!(field, "rating");
            }
            other => panic!("expected MissingField, got: {other}"),
        }
    }

    #[test]
    fn missing_nationality_reports_record_index() {
        let json = r#"[
            {"name": "A", "position": "GK", "rating": 60, "price": 1,
             "nationality": "X", "league": "Y"},
            {"name": "B", "position": "GK", "rating": 60, "price": 1, "league": "Y"}
        ]"#;
        match parse_players(json).unwrap_err() {
            PlayerError::MissingField { index, field } => {
                assert_eq!(index, 1);
                assert_eq!(field, "nationality");
            }
            other => panic!("expected MissingField, got: {other}"),
        }
    }

    #[test]
    fn empty_name_is_missing() {
        let json = r#"[{"name": "  ", "position": "GK", "rating": 60, "price": 1,
                        "nationality": "X", "league": "Y"}]"#;
        assert!(matches!(
            parse_players(json).unwrap_err(),
            PlayerError::MissingField { field: "name", .. }
        ));
    }

    #[test]
    fn unknown_position_is_an_error() {
        let json = r#"[{"name": "Libero", "position": "SW", "rating": 80, "price": 1,
                        "nationality": "X", "league": "Y"}]"#;
        match parse_players(json).unwrap_err() {
            PlayerError::UnknownPosition { name, code, .. } => {
                assert_eq!(name, "Libero");
                assert_eq!(code, "SW");
            }
            other => panic!("expected UnknownPosition, got: {other}"),
        }
    }

    #[test]
    fn position_is_read_from_its_code_not_its_name() {
        let json = r#"[{"name": "Nine", "position": "Striker", "rating": 80, "price": 1,
                        "nationality": "X", "league": "Y"}]"#;
        assert!(matches!(
            parse_players(json).unwrap_err(),
            PlayerError::UnknownPosition { .. }
        ));

        let json = r#"[{"name": "Nine", "position": "st", "rating": 80, "price": 1,
                        "nationality": "X", "league": "Y"}]"#;
        assert_eq!(parse_players(json).unwrap()[0].position, Position::Striker);
    }

    #[test]
    fn non_array_is_json_error() {
        assert!(matches!(
            parse_players(r#"{"players": []}"#).unwrap_err(),
            PlayerError::Json(_)
        ));
    }

    #[test]
    fn extra_keys_are_ignored() {
        let json = r#"[{"name": "A", "position": "cm", "rating": 60, "price": 1,
                        "nationality": "X", "league": "Y", "pace": 88}]"#;
        let pool = parse_players(json).unwrap();
        assert_eq!(pool[0].position, Position::CentralMidfield);
    }

    #[test]
    fn hero_badge_wins_over_icon() {
        let json = r#"[{"name": "A", "position": "CM", "rating": 88, "price": 1,
                        "nationality": "X", "league": "Y", "is_hero": true, "is_icon": true}]"#;
        let pool = parse_players(json).unwrap();
        assert_eq!(pool[0].badge(), Some(Badge::Hero));
        assert_eq!(Badge::Icon.label(), "ICON");
    }
}
