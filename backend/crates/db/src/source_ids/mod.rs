//! Where batch runs get their source ids from.

pub mod csv_repository;
pub mod pg_repository;
pub mod repositories;

use std::fmt;
use std::str::FromStr;

pub use csv_repository::CsvSourceIdRepository;
pub use pg_repository::PgSourceIdRepository;
pub use repositories::SourceIdRepository;

/// Ids fetched when no explicit limit is given.
pub const DEFAULT_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Csv,
    Postgres,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "postgres" => Ok(Self::Postgres),
            other => Err(format!("unknown data source: {other} (expected csv or postgres)")),
        }
    }
}
