use std::path::PathBuf;

/// All tunables for one preparation run. Defaults reproduce the production
/// corpus exactly; tests construct smaller variants.
#[derive(Debug, Clone)]
pub struct PrepConfig {
    /// Article-header API root. Pagination appends `?page=<n>`, per-group
    /// fetches append the slug.
    pub base_url: String,
    /// Sent on every request; the API rejects default library agents.
    pub user_agent: String,
    /// Only groups in this language are kept.
    pub language: String,
    /// Groups skipped regardless of language.
    pub excluded_slugs: Vec<String>,
    /// Grade categories with fewer rows than this are dropped.
    pub min_category_count: usize,
    /// Fraction of rows assigned to the test split.
    pub test_fraction: f64,
    /// Seed for the split shuffle.
    pub seed: u64,
    /// Cap on groups fetched; `None` fetches everything.
    pub group_limit: Option<usize>,
    /// Output store location.
    pub store_path: PathBuf,
}

impl Default for PrepConfig {
    fn default() -> Self {
        PrepConfig {
            base_url: "https://newsela.com/api/v2/articleheader/".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) \
                         AppleWebKit/537.36 (KHTML, like Gecko) Chrome/39.0.2171.95 \
                         Safari/537.36"
                .to_string(),
            language: "en".to_string(),
            // US-Constitution breaks downstream parsing, see
            // https://github.com/nikitakit/self-attentive-parser/issues/5
            excluded_slugs: vec!["US-Constitution".to_string()],
            min_category_count: 30,
            test_fraction: 0.2,
            seed: 42,
            group_limit: None,
            store_path: PathBuf::from("data/newsela.sqlite"),
        }
    }
}
