/// Loader for the pre-built resource dataset.
///
/// The build pipeline exports the curated table as JSON:
/// `{"records": [{"id": "...", "fields": {...}}]}` with the source column names
/// (`Name`, `ZIP`, `Who`, `Category`, ...). Everything except the name is optional;
/// records without a name are skipped with a warning. The loader never panics on
/// malformed field values.
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::AppError;
use crate::model::{sort_by_level, LevelPriority, Resource};

/// The in-memory dataset: resources in display order, an id lookup, and a
/// fingerprint of the source file for change detection.
pub struct Catalog {
    pub resources: Vec<Resource>,
    index: HashMap<String, usize>,
    pub fingerprint: String,
}

impl Catalog {
    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.index.get(id).map(|&i| &self.resources[i])
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Read and parse the dataset file.
pub fn load(path: &Path, priority: &LevelPriority) -> Result<Catalog, AppError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::Catalog(format!("failed to read {}: {e}", path.display())))?;
    parse(&raw, priority)
}

/// Parse raw export JSON into a sorted catalog.
pub fn parse(raw: &str, priority: &LevelPriority) -> Result<Catalog, AppError> {
    let export: Export = serde_json::from_str(raw)
        .map_err(|e| AppError::Catalog(format!("invalid dataset JSON: {e}")))?;

    let mut resources: Vec<Resource> = Vec::with_capacity(export.records.len());
    for record in export.records {
        let fields = record.fields;
        let Some(name) = fields.name else {
            warn!(record_id = %record.id, "record has no name, skipping");
            continue;
        };
        resources.push(Resource {
            id: record.id,
            name,
            link: fields.link,
            phone: fields.phone,
            email: fields.email,
            hours: fields.hours,
            address: fields.address,
            zip: fields.zip,
            description: fields.description,
            description_es: fields.description_es,
            who: fields.who,
            what: fields.what,
            languages: fields.languages,
            qualifications: fields.qualifications,
            level: fields.level,
            last_updated: fields.last_updated,
        });
    }

    // Sorted once per dataset load; filtering later preserves this order.
    sort_by_level(&mut resources, priority);

    let mut index = HashMap::with_capacity(resources.len());
    for (i, resource) in resources.iter().enumerate() {
        if index.insert(resource.id.clone(), i).is_some() {
            warn!(record_id = %resource.id, "duplicate record id, later occurrence wins");
        }
    }

    Ok(Catalog {
        resources,
        index,
        fingerprint: fingerprint(raw),
    })
}

/// SHA-256 hex digest of the raw dataset file.
pub fn fingerprint(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Deserialize)]
struct Export {
    records: Vec<ExportRecord>,
}

#[derive(Debug, Deserialize)]
struct ExportRecord {
    id: String,
    #[serde(default)]
    fields: ExportFields,
}

#[derive(Debug, Default, Deserialize)]
struct ExportFields {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Link")]
    link: Option<String>,
    #[serde(rename = "Phone")]
    phone: Option<String>,
    #[serde(rename = "Email")]
    email: Option<String>,
    #[serde(rename = "Hours")]
    hours: Option<String>,
    #[serde(rename = "Address")]
    address: Option<String>,
    // Zips sometimes come through as bare numbers.
    #[serde(rename = "ZIP", default, deserialize_with = "lenient_string")]
    zip: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "Description_ES")]
    description_es: Option<String>,
    #[serde(rename = "Who", default)]
    who: Vec<String>,
    #[serde(rename = "Category", default)]
    what: Vec<String>,
    #[serde(rename = "Languages", default)]
    languages: Vec<String>,
    #[serde(rename = "Qualifications")]
    qualifications: Option<String>,
    #[serde(rename = "Level")]
    level: Option<String>,
    #[serde(rename = "Last_Updated")]
    last_updated: Option<String>,
}

/// Accept a string or a number; anything else degrades to `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}
