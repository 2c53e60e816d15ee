use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of catalog record being resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Team,
    Fixture,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::Fixture => "fixture",
        }
    }

    /// Prefix the catalog prepends to raw ids before base64-encoding them.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Team => "GSLSearchableTeam",
            Self::Fixture => "GSLSearchableFixture",
        }
    }

    /// Root query field of the catalog for this entity type.
    pub fn search_field(&self) -> &'static str {
        match self {
            Self::Team => "searchableTeams",
            Self::Fixture => "searchableFixtures",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "team" => Ok(Self::Team),
            "fixture" => Ok(Self::Fixture),
            _ => Err(format!("unknown entity type: {value}")),
        }
    }
}

/// Whether a rubric awards partial credit or is all-or-nothing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMethod {
    Weighted,
    Binary,
}

impl ScoringMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weighted => "weighted",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "weighted" => Ok(Self::Weighted),
            "binary" => Ok(Self::Binary),
            _ => Err(format!("unknown scoring method: {value}")),
        }
    }
}
