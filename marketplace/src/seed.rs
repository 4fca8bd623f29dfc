//! Initial listings the store starts with.
//!
//! By default the marketplace opens with a small built-in catalog. A JSON
//! file with the same shape (an array of tickets, prices in cents) can
//! replace it, or the store can start empty.

use crate::types::{MarketState, Ticket, TicketId};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../seed/catalog.json");

/// Where the initial listings come from
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SeedSource {
    /// The catalog compiled into the binary
    #[default]
    Builtin,
    /// No listings
    Empty,
    /// A JSON file on disk
    File(PathBuf),
}

impl SeedSource {
    /// `"builtin"`, `"none"` / `"empty"`, or anything else as a file path
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "builtin" => Self::Builtin,
            "none" | "empty" => Self::Empty,
            path => Self::File(PathBuf::from(path)),
        }
    }
}

/// Errors loading seed listings
#[derive(Error, Debug)]
pub enum SeedError {
    /// The seed file could not be read
    #[error("failed to read seed file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The seed data is not a valid ticket array
    #[error("invalid seed data from {origin}: {source}")]
    Parse {
        /// Where the data came from
        origin: String,
        /// Underlying error
        source: serde_json::Error,
    },

    /// Two seed listings share an id
    #[error("seed data lists ticket {0} more than once")]
    DuplicateId(TicketId),
}

/// Parses a JSON array of tickets, rejecting repeated ids
///
/// # Errors
///
/// Returns [`SeedError::Parse`] for malformed JSON and
/// [`SeedError::DuplicateId`] when two tickets share an id.
pub fn parse_catalog(json: &str, origin: &str) -> Result<Vec<Ticket>, SeedError> {
    let tickets: Vec<Ticket> = serde_json::from_str(json).map_err(|source| SeedError::Parse {
        origin: origin.to_string(),
        source,
    })?;

    let mut seen = HashSet::with_capacity(tickets.len());
    if let Some(duplicate) = tickets.iter().find(|t| !seen.insert(t.id)) {
        return Err(SeedError::DuplicateId(duplicate.id));
    }

    Ok(tickets)
}

/// The catalog compiled into the binary
///
/// # Errors
///
/// Only if the embedded catalog is malformed.
pub fn builtin_catalog() -> Result<Vec<Ticket>, SeedError> {
    parse_catalog(BUILTIN_CATALOG, "built-in catalog")
}

fn read_catalog(path: &Path) -> Result<Vec<Ticket>, SeedError> {
    let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&json, &path.display().to_string())
}

/// Builds the initial store state from `source`
///
/// # Errors
///
/// Returns a [`SeedError`] if the listings cannot be read or parsed.
pub fn load(source: &SeedSource) -> Result<MarketState, SeedError> {
    let tickets = match source {
        SeedSource::Builtin => builtin_catalog()?,
        SeedSource::Empty => Vec::new(),
        SeedSource::File(path) => read_catalog(path)?,
    };

    tracing::info!(count = tickets.len(), source = ?source, "Seed listings loaded");
    Ok(MarketState::with_tickets(tickets))
}
