//! Predefined competitions shown on the menu.

use crate::models::{Competition, TournamentError};

/// Catalog shipped with the binary.
const BUILTIN_CATALOG: &str = include_str!("../data/competitions.json");

/// Parse a catalog (JSON array of competitions). Every entry must be playable.
pub fn parse_catalog(text: &str) -> Result<Vec<Competition>, TournamentError> {
    let catalog: Vec<Competition> = serde_json::from_str(text)
        .map_err(|e| TournamentError::ConfigurationError(format!("Invalid competition catalog: {e}")))?;
    for comp in &catalog {
        comp.validate()?;
    }
    Ok(catalog)
}

/// The built-in catalog.
pub fn builtin_catalog() -> Result<Vec<Competition>, TournamentError> {
    parse_catalog(BUILTIN_CATALOG)
}

pub fn find_competition<'a>(catalog: &'a [Competition], id: &str) -> Option<&'a Competition> {
    catalog.iter().find(|c| c.id == id)
}
