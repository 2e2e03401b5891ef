use serde::{Deserialize, Serialize};

/// Parameters for one aggregation pass.
///
/// Identity for caching purposes is the (origins, from_date, to_date)
/// tuple; `limit` only bounds how many raw records a provider is asked
/// for and never participates in the cache key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// IATA origin airport codes, e.g. `["CNF"]`.
    pub origins: Vec<String>,
    /// Start of the departure window, ISO date (`YYYY-MM-DD`).
    pub from_date: String,
    /// End of the departure window, ISO date (`YYYY-MM-DD`).
    pub to_date: String,
    /// Upper bound on raw records requested from a provider.
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn new(
        origins: Vec<String>,
        from_date: impl Into<String>,
        to_date: impl Into<String>,
    ) -> Self {
        Self {
            origins,
            from_date: from_date.into(),
            to_date: to_date.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_deserialization() {
        let json = r#"
            {
                "origins": ["CNF", "GRU"],
                "from_date": "2026-04-01",
                "to_date": "2026-04-30",
                "limit": 200
            }
        "#;
        let query: SearchQuery = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(query.origins, vec!["CNF", "GRU"]);
        assert_eq!(query.from_date, "2026-04-01");
        assert_eq!(query.limit, Some(200));
    }
}
