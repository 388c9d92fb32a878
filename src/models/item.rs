use serde::Serialize;

/// A catalog entry. Identity is `(source_url, batch_name)`; `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: i64,              // ⇔ items.id
    pub name: String,         // ⇔ items.name
    pub developer: String,    // ⇔ items.developer ("developers" column in CSV)
    pub release_date: String, // ⇔ items.release_date (free text, as Steam prints it)
    pub source_url: String,   // ⇔ items.source_url ("steam_page_url" in CSV)
    pub batch_name: String,   // ⇔ items.batch_name
}

/// An item about to be inserted by the importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub developer: String,
    pub release_date: String,
    pub source_url: String,
    pub batch_name: String,
}

impl NewItem {
    pub fn new(
        name: &str,
        developer: &str,
        release_date: &str,
        source_url: &str,
        batch_name: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            developer: developer.to_string(),
            release_date: release_date.to_string(),
            source_url: source_url.to_string(),
            batch_name: batch_name.to_string(),
        }
    }
}
