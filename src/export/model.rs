// src/export/model.rs

use crate::models::Item;
use serde::Serialize;

/// One row of a per-batch yes/no snapshot. Field names follow the import CSV.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GameExport {
    pub name: String,
    pub developers: String,
    pub release_date: String,
    pub steam_page_url: String,
}

/// One row of a "new yes votes" export.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct NewVoteExport {
    pub name: String,
    pub developers: String,
    pub release_date: String,
    pub steam_page_url: String,
    pub batch_name: String,
    pub timestamp: String,
}

pub(crate) const GAME_HEADERS: [&str; 4] = ["name", "developers", "release_date", "steam_page_url"];

pub(crate) const NEW_VOTE_HEADERS: [&str; 6] = [
    "name",
    "developers",
    "release_date",
    "steam_page_url",
    "batch_name",
    "timestamp",
];

impl From<&Item> for GameExport {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            developers: item.developer.clone(),
            release_date: item.release_date.clone(),
            steam_page_url: item.source_url.clone(),
        }
    }
}

impl NewVoteExport {
    pub fn new(item: &Item, recorded_at: &str) -> Self {
        Self {
            name: item.name.clone(),
            developers: item.developer.clone(),
            release_date: item.release_date.clone(),
            steam_page_url: item.source_url.clone(),
            batch_name: item.batch_name.clone(),
            timestamp: recorded_at.to_string(),
        }
    }
}
