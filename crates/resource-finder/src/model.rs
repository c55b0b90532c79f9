use serde::{Deserialize, Serialize};

/// A single community-service record (e.g. a food shelf or a legal-aid provider).
/// Immutable once the catalog is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Record identifier from the source dataset, e.g. "recA1b2C3"
    pub id: String,
    /// Display name of the provider or program
    pub name: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    /// English description
    #[serde(default)]
    pub description: Option<String>,
    /// Spanish description
    #[serde(default)]
    pub description_es: Option<String>,
    /// Audience tags, e.g. "Youth", "Elderly"
    #[serde(default)]
    pub who: Vec<String>,
    /// Category tags, e.g. "Food", "Legal Aid"
    #[serde(default)]
    pub what: Vec<String>,
    /// Languages the service is offered in
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub qualifications: Option<String>,
    /// Ordinal display priority, e.g. "City", "State"
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Display-priority order for resource levels.
///
/// Resources are shown most-local first; a level that does not appear in the order
/// ranks after every level that does.
#[derive(Debug, Clone)]
pub struct LevelPriority {
    order: Vec<String>,
}

impl LevelPriority {
    pub fn new(order: Vec<String>) -> Self {
        Self { order }
    }

    pub fn rank(&self, level: Option<&str>) -> usize {
        level
            .and_then(|l| self.order.iter().position(|o| o == l))
            .unwrap_or(self.order.len())
    }
}

impl Default for LevelPriority {
    fn default() -> Self {
        Self::new(
            ["Neighborhood", "City", "County", "State", "National"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }
}

/// Order resources by level priority, ascending. Stable: resources with equal or
/// unranked levels keep their relative input order. Run once per catalog load, not
/// per filter change.
pub fn sort_by_level(resources: &mut [Resource], priority: &LevelPriority) {
    resources.sort_by_key(|r| priority.rank(r.level.as_deref()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: &str, level: Option<&str>) -> Resource {
        Resource {
            id: id.to_string(),
            name: format!("Resource {id}"),
            link: None,
            phone: None,
            email: None,
            hours: None,
            address: None,
            zip: None,
            description: None,
            description_es: None,
            who: Vec::new(),
            what: Vec::new(),
            languages: Vec::new(),
            qualifications: None,
            level: level.map(String::from),
            last_updated: None,
        }
    }

    #[test]
    fn test_rank_follows_order() {
        let priority = LevelPriority::default();
        assert!(priority.rank(Some("City")) < priority.rank(Some("State")));
        assert!(priority.rank(Some("Neighborhood")) < priority.rank(Some("City")));
    }

    #[test]
    fn test_unknown_level_ranks_last() {
        let priority = LevelPriority::default();
        assert_eq!(priority.rank(Some("Galactic")), priority.rank(None));
        assert!(priority.rank(Some("National")) < priority.rank(Some("Galactic")));
    }

    #[test]
    fn test_sort_by_level_orders_ascending() {
        let priority = LevelPriority::default();
        let mut resources = vec![
            resource("a", Some("State")),
            resource("b", Some("City")),
            resource("c", None),
            resource("d", Some("Neighborhood")),
        ];
        sort_by_level(&mut resources, &priority);
        let ids: Vec<&str> = resources.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_levels() {
        let priority = LevelPriority::default();
        let mut resources = vec![
            resource("first", Some("City")),
            resource("second", Some("City")),
            resource("third", Some("City")),
        ];
        sort_by_level(&mut resources, &priority);
        let ids: Vec<&str> = resources.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }
}
