//! Location records and the static dataset they are loaded from.
//!
//! A dataset is loaded once and never mutated afterwards. Cloning a
//! [`Dataset`] is cheap: all clones share the same records.

use crate::error::{DatasetError, ParseEnumError};
use crate::geo::Coord;
use crate::scoring::Difficulty;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// The dataset compiled into the binary.
const BUILTIN_DATASET: &str = include_str!("../data/locations.json");

/// Display language for location text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Ukrainian.
    Uk,
}

impl FromStr for Locale {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "uk" => Ok(Self::Uk),
            _ => Err(ParseEnumError::new("locale", s)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::En => "en",
            Self::Uk => "uk",
        })
    }
}

/// A piece of text with an English original and optional translations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Localized {
    /// English text, always present.
    pub en: String,
    /// Ukrainian text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uk: Option<String>,
}

impl Localized {
    /// Text for `locale`, falling back to English when untranslated.
    #[must_use]
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Uk => self.uk.as_deref().unwrap_or(&self.en),
        }
    }
}

/// A place a round can be played at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Stable identifier, unique within a dataset.
    pub id: String,
    /// Tier used when building a session pool.
    pub difficulty: Difficulty,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Panorama image reference, if any.
    #[serde(default)]
    pub pano_url: Option<String>,
    /// Broad region, e.g. "Europe".
    pub region: Localized,
    /// Place name shown after the round.
    pub name: Localized,
    /// Hint shown while guessing.
    pub clue: Localized,
}

impl Location {
    /// Position of this location.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord::new(self.lat, self.lon)
    }
}

/// Immutable, shared list of locations.
#[derive(Debug, Clone)]
pub struct Dataset {
    locations: Arc<[Location]>,
}

impl Dataset {
    /// Build a dataset from already validated records.
    ///
    /// # Errors
    ///
    /// Returns an error if any record is invalid (see [`Dataset::validate`]).
    pub fn new(locations: Vec<Location>) -> Result<Self, DatasetError> {
        Self::validate(&locations)?;
        Ok(Self {
            locations: locations.into(),
        })
    }

    /// The dataset shipped with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded JSON is broken.
    pub fn builtin() -> Result<Self, DatasetError> {
        Self::from_json(BUILTIN_DATASET)
    }

    /// Parse a dataset from a JSON array of location records.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a record is invalid.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let locations: Vec<Location> = serde_json::from_str(json)?;
        debug!(count = locations.len(), "parsed location dataset");
        Self::new(locations)
    }

    /// Load a dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let json = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Check ids are non-empty and unique and coordinates are in range.
    ///
    /// An empty list is valid; it produces an unplayable session.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(locations: &[Location]) -> Result<(), DatasetError> {
        let mut seen = HashSet::with_capacity(locations.len());
        for (index, loc) in locations.iter().enumerate() {
            if loc.id.trim().is_empty() {
                return Err(DatasetError::EmptyId { index });
            }
            if !seen.insert(loc.id.as_str()) {
                return Err(DatasetError::DuplicateId(loc.id.clone()));
            }
            if !loc.coord().is_valid() {
                return Err(DatasetError::InvalidCoord {
                    id: loc.id.clone(),
                    lat: loc.lat,
                    lon: loc.lon,
                });
            }
        }
        Ok(())
    }

    /// Number of locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the dataset has no locations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Location at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Location> {
        self.locations.get(index)
    }

    /// All locations in dataset order.
    #[must_use]
    pub fn as_slice(&self) -> &[Location] {
        &self.locations
    }

    /// Find a location by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|loc| loc.id == id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal location for tests.
    pub(crate) fn location(id: &str, difficulty: Difficulty, lat: f64, lon: f64) -> Location {
        Location {
            id: id.to_string(),
            difficulty,
            lat,
            lon,
            pano_url: None,
            region: Localized {
                en: "Testland".to_string(),
                uk: None,
            },
            name: Localized {
                en: id.to_string(),
                uk: None,
            },
            clue: Localized {
                en: format!("Somewhere called {id}"),
                uk: Some(format!("Десь під назвою {id}")),
            },
        }
    }

    #[test]
    fn test_builtin_dataset_loads() {
        let dataset = Dataset::builtin().unwrap();
        assert_eq!(dataset.len(), 17);
        let paris = dataset.find("paris_eiffel").unwrap();
        assert_eq!(paris.difficulty, Difficulty::Easy);
        assert_eq!(paris.name.get(Locale::En), "Paris, France");
        assert_eq!(paris.name.get(Locale::Uk), "Париж, Франція");
    }

    #[test]
    fn test_builtin_dataset_has_every_tier() {
        let dataset = Dataset::builtin().unwrap();
        for tier in Difficulty::ALL {
            assert!(
                dataset.as_slice().iter().any(|loc| loc.difficulty == tier),
                "no {tier} locations"
            );
        }
    }

    #[test]
    fn test_missing_pano_url_is_none() {
        let dataset = Dataset::builtin().unwrap();
        let zocalo = dataset.find("mexico_city_zocalo").unwrap();
        assert!(zocalo.pano_url.is_none());
    }

    #[test]
    fn test_localized_falls_back_to_english() {
        let text = Localized {
            en: "hello".to_string(),
            uk: None,
        };
        assert_eq!(text.get(Locale::Uk), "hello");
    }

    #[test]
    fn test_empty_dataset_is_valid() {
        let dataset = Dataset::from_json("[]").unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let locs = vec![
            location("a", Difficulty::Easy, 0.0, 0.0),
            location("a", Difficulty::Hard, 1.0, 1.0),
        ];
        assert!(matches!(
            Dataset::new(locs),
            Err(DatasetError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn test_out_of_range_coord_rejected() {
        let locs = vec![location("bad", Difficulty::Easy, 123.0, 0.0)];
        assert!(matches!(
            Dataset::new(locs),
            Err(DatasetError::InvalidCoord { .. })
        ));
    }

    #[test]
    fn test_empty_id_rejected() {
        let locs = vec![location(" ", Difficulty::Easy, 0.0, 0.0)];
        assert!(matches!(
            Dataset::new(locs),
            Err(DatasetError::EmptyId { index: 0 })
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            Dataset::from_json("{not json"),
            Err(DatasetError::Json(_))
        ));
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!("UK".parse::<Locale>(), Ok(Locale::Uk));
        assert!("fr".parse::<Locale>().is_err());
    }
}
