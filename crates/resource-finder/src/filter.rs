/// Query-parameter filters over the resource catalog.
///
/// Two halves:
/// - extraction: a raw query string becomes a `FilterState` (recognized keys only,
///   defaults for anything missing or malformed, never an error)
/// - application: the non-empty entries (`ActiveFilterSet`) are matched against the
///   sorted resource list as a pure function
use regex::Regex;
use serde::Serialize;

use crate::model::Resource;

/// Current value of every recognized filter key. Derived from the URL; recomputed
/// on navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub zip: String,
    pub who: Vec<String>,
    pub what: Vec<String>,
    pub languages: Vec<String>,
}

impl FilterState {
    /// Build filter state from a raw query string.
    ///
    /// Recognized keys: `search`, `zip`, `who`, `what`, `languages`. Unrecognized
    /// keys are ignored. A zip that is not five digits degrades to unset.
    /// List-valued keys accept repeated occurrences and comma-delimited values.
    pub fn from_query(query: &str) -> Self {
        let zip_re = Regex::new(r"^\d{5}$").expect("valid regex");

        let mut state = FilterState::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "search" => state.search = value.trim().to_string(),
                "zip" => {
                    let value = value.trim();
                    if zip_re.is_match(value) {
                        state.zip = value.to_string();
                    }
                }
                "who" => state.who.extend(split_multi(&value)),
                "what" => state.what.extend(split_multi(&value)),
                "languages" => state.languages.extend(split_multi(&value)),
                _ => {}
            }
        }
        state
    }

    /// The subset of entries with non-empty values; only these constrain matching.
    pub fn active(&self) -> ActiveFilterSet {
        ActiveFilterSet {
            search: non_empty(&self.search),
            zip: non_empty(&self.zip),
            who: non_empty_list(&self.who),
            what: non_empty_list(&self.what),
            languages: non_empty_list(&self.languages),
        }
    }
}

fn split_multi(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn non_empty_list(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

/// Filters that actually constrain the result set. Serialized into listing
/// responses (so embedders can echo what was applied) and into cache keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveFilterSet {
    pub search: Option<String>,
    pub zip: Option<String>,
    pub who: Option<Vec<String>>,
    pub what: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
}

impl ActiveFilterSet {
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.zip.is_none()
            && self.who.is_none()
            && self.what.is_none()
            && self.languages.is_none()
    }
}

/// How a requested zip is matched against a resource's zip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZipMatch {
    #[default]
    Exact,
    Prefix,
}

impl ZipMatch {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exact" => Some(ZipMatch::Exact),
            "prefix" => Some(ZipMatch::Prefix),
            _ => None,
        }
    }
}

/// Return the resources satisfying every active filter, in input order.
///
/// AND across filter keys; OR within a list-valued filter (a resource matches when
/// its tag list contains at least one requested value). Search matches
/// case-insensitively against name and both description locales.
pub fn apply_filters<'a>(
    filters: &ActiveFilterSet,
    resources: &'a [Resource],
    zip_match: ZipMatch,
) -> Vec<&'a Resource> {
    resources
        .iter()
        .filter(|r| matches(filters, r, zip_match))
        .collect()
}

fn matches(filters: &ActiveFilterSet, resource: &Resource, zip_match: ZipMatch) -> bool {
    if let Some(search) = &filters.search {
        let needle = search.to_lowercase();
        let found = [
            Some(resource.name.as_str()),
            resource.description.as_deref(),
            resource.description_es.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(&needle));
        if !found {
            return false;
        }
    }

    if let Some(zip) = &filters.zip {
        let Some(resource_zip) = resource.zip.as_deref() else {
            return false;
        };
        let matched = match zip_match {
            ZipMatch::Exact => resource_zip == zip,
            ZipMatch::Prefix => resource_zip.starts_with(zip.as_str()),
        };
        if !matched {
            return false;
        }
    }

    if let Some(who) = &filters.who {
        if !intersects(&resource.who, who) {
            return false;
        }
    }
    if let Some(what) = &filters.what {
        if !intersects(&resource.what, what) {
            return false;
        }
    }
    if let Some(languages) = &filters.languages {
        if !intersects(&resource.languages, languages) {
            return false;
        }
    }

    true
}

fn intersects(have: &[String], requested: &[String]) -> bool {
    requested.iter().any(|value| have.contains(value))
}
