//! Service Finder: client core for a local-services marketplace.
//!
//! Users browse service listings by category, search them with a fuzzy filter,
//! open a listing with its reviews and contact the provider, and post new
//! listings and reviews. This crate is everything below the rendering layer:
//!
//! - an HTTP client for the marketplace REST API,
//! - a state container holding the catalog and reviews as resource triples
//!   (`data`, `loading`, `error`), driven by events and actions,
//! - a client-side fuzzy search filter,
//! - device capability adapters (location, reverse geocoding, image picking,
//!   contact intents, authentication),
//! - screen controllers that compute plain view models.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI front-end (main.rs)                            │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Screens (screens/)          Device (device/)       │  ← Controllers
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, race resolution                  │
//! │  - Action dispatching, async Store façade           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Search        │   │ Worker        │   │ API           │
//! │ (search/)     │   │ (worker/)     │   │ (api/)        │
//! │ - Scorers     │   │ - Requests    │   │ - HTTP client │
//! │ - Filter      │   │ - Responses   │   │ - Fixture     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Infrastructure, Observability              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```toml
//! # ~/.local/share/service-finder/config.toml
//! base_url = "http://localhost:5000"
//! timeout_ms = 10000
//! completion_policy = "last_settled_wins"
//! search_threshold = 0.3
//! search_scorer = "approximate"
//! trace_level = "debug"
//! trace_file = "/tmp/service-finder-trace.jsonl"
//! ```
//!
//! Every key can also be set through a `SERVICE_FINDER_<KEY>` environment
//! variable, for example `SERVICE_FINDER_BASE_URL`.
//!
//! # Example
//!
//! ```rust
//! use service_finder::api::{FixtureApi, FixtureData};
//! use service_finder::{CompletionPolicy, NewService, Store};
//!
//! # #[tokio::main]
//! # async fn main() -> service_finder::Result<()> {
//! let store = Store::new(FixtureApi::new(FixtureData::default()), CompletionPolicy::default());
//!
//! let created = store
//!     .create_service(NewService {
//!         name: "Home Tutor".into(),
//!         description: "Maths and physics".into(),
//!         price: "500".into(),
//!         category: "education".into(),
//!         image_urls: vec!["https://img.example.com/tutor.jpg".into()],
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! store.fetch_all_services().await?;
//! let names = store.read(|s| s.services.data.iter().map(|x| x.name.clone()).collect::<Vec<_>>())?;
//! assert_eq!(names, vec![created.name]);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod api;
pub mod app;
pub mod device;
pub mod domain;
pub mod infrastructure;
pub mod screens;
pub mod search;
pub mod worker;

pub mod observability;

pub use api::{FixtureApi, HttpClient, MarketplaceApi};
pub use app::{handle_event, Action, AppState, CompletionPolicy, Event, Resource, Store};
pub use domain::{NewReview, NewService, Result, Review, Service, ServiceFinderError};
pub use search::SearchFilter;

use search::{ApproximateScorer, ScorerKind, SkimScorer};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of the environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "SERVICE_FINDER_";

/// Client configuration.
///
/// Every field has a default, so a partial TOML file or an empty map is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the marketplace API. Default: `http://localhost:5000`
    pub base_url: String,

    /// Timeout applied to every backend request, in milliseconds. Default: 10000
    pub timeout_ms: u64,

    /// Filter directive for logging and spans (`trace`, `debug`, `info`, …).
    /// `RUST_LOG` takes precedence. Default: `info`
    pub trace_level: Option<String>,

    /// When set, finished spans are exported to this file as JSON lines.
    pub trace_file: Option<PathBuf>,

    /// How concurrent fetches of the same resource are resolved.
    pub completion_policy: CompletionPolicy,

    /// Maximum normalized distance for a search match, 0.0 (exact) to 1.0. Default: 0.3
    pub search_threshold: f64,

    /// Matching algorithm of the search filter: `approximate` (default) or `skim`.
    pub search_scorer: ScorerKind,

    /// Reverse-geocoding service used for city prefill.
    pub geocoder_url: String,

    /// Identity provider REST root.
    pub auth_url: String,

    /// API key sent to the identity provider.
    pub auth_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_ms: 10_000,
            trace_level: None,
            trace_file: None,
            completion_policy: CompletionPolicy::default(),
            search_threshold: search::DEFAULT_THRESHOLD,
            search_scorer: ScorerKind::default(),
            geocoder_url: "https://nominatim.openstreetmap.org".to_string(),
            auth_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            auth_api_key: None,
        }
    }
}

impl Config {
    /// Builds a configuration from a string key/value map over the defaults.
    ///
    /// # Parsing Rules
    ///
    /// - `timeout_ms`, `search_threshold`: parsed; unparseable values keep the default
    /// - `completion_policy`: `last_settled_wins` or `latest_issued_wins`; anything
    ///   else keeps the default
    /// - `search_scorer`: `approximate` or `skim`; anything else keeps the default
    /// - `search_threshold` outside 0.0–1.0 keeps the default
    /// - `trace_file`, `trace_level`, `auth_api_key`: taken as is
    /// - unknown keys are ignored
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use service_finder::{CompletionPolicy, Config};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("base_url".to_string(), "https://api.example.com".to_string());
    /// map.insert("timeout_ms".to_string(), "not-a-number".to_string());
    /// map.insert("completion_policy".to_string(), "latest_issued_wins".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.base_url, "https://api.example.com");
    /// assert_eq!(config.timeout_ms, 10_000);
    /// assert_eq!(config.completion_policy, CompletionPolicy::LatestIssuedWins);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::default().with_overrides(map)
    }

    /// Applies the keys present in `map` on top of `self`.
    #[must_use]
    pub fn with_overrides(mut self, map: &BTreeMap<String, String>) -> Self {
        if let Some(url) = map.get("base_url").filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(ms) = map.get("timeout_ms").and_then(|v| v.trim().parse().ok()) {
            self.timeout_ms = ms;
        }
        if let Some(level) = map.get("trace_level") {
            self.trace_level = Some(level.clone());
        }
        if let Some(file) = map.get("trace_file") {
            self.trace_file = Some(PathBuf::from(file));
        }
        if let Some(policy) = map.get("completion_policy") {
            match policy.parse() {
                Ok(policy) => self.completion_policy = policy,
                Err(e) => tracing::debug!(error = %e, "ignoring completion_policy"),
            }
        }
        if let Some(threshold) = map
            .get("search_threshold")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|t| (0.0..=1.0).contains(t))
        {
            self.search_threshold = threshold;
        }
        if let Some(scorer) = map.get("search_scorer") {
            match scorer.parse() {
                Ok(scorer) => self.search_scorer = scorer,
                Err(e) => tracing::debug!(error = %e, "ignoring search_scorer"),
            }
        }
        if let Some(url) = map.get("geocoder_url") {
            self.geocoder_url = url.clone();
        }
        if let Some(url) = map.get("auth_url") {
            self.auth_url = url.clone();
        }
        if let Some(key) = map.get("auth_api_key") {
            self.auth_api_key = Some(key.clone());
        }
        self
    }

    /// Reads a TOML configuration file.
    ///
    /// A `search_threshold` outside 0.0–1.0 keeps the default.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Io`] if the file cannot be read and
    /// [`ServiceFinderError::Config`] if it is not valid TOML for this struct.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)
            .map_err(|e| ServiceFinderError::Config(format!("{}: {e}", path.display())))?;

        if !(0.0..=1.0).contains(&config.search_threshold) {
            tracing::debug!(threshold = config.search_threshold, "ignoring search_threshold");
            config.search_threshold = search::DEFAULT_THRESHOLD;
        }
        Ok(config)
    }

    /// Loads the effective configuration.
    ///
    /// Layers, lowest precedence first: defaults, the TOML file (`path`, or
    /// [`infrastructure::default_config_path`] when it exists), then
    /// `SERVICE_FINDER_*` environment variables.
    ///
    /// # Errors
    ///
    /// Fails if an explicitly given file is missing or invalid, or if the default
    /// file exists but is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = infrastructure::default_config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(base.with_overrides(&env_overrides()))
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The search filter selected by [`Config::search_scorer`].
    #[must_use]
    pub fn search_filter(&self) -> SearchFilter {
        match self.search_scorer {
            ScorerKind::Approximate => SearchFilter::new(ApproximateScorer::new(self.search_threshold)),
            ScorerKind::Skim => SearchFilter::new(SkimScorer::default()),
        }
    }
}

fn env_overrides() -> BTreeMap<String, String> {
    std::env::vars()
        .filter_map(|(key, value)| {
            key.strip_prefix(ENV_PREFIX)
                .map(|name| (name.to_ascii_lowercase(), value))
        })
        .collect()
}

/// Builds the HTTP-backed store for `config`.
///
/// Tracing is not touched; call [`observability::init_tracing`] first if wanted.
///
/// # Errors
///
/// Returns [`ServiceFinderError::Config`] if `base_url` is not a valid URL, or
/// [`ServiceFinderError::Network`] if the HTTP client cannot be built.
///
/// # Example
///
/// ```rust
/// use service_finder::{initialize, Config};
///
/// let store = initialize(&Config::default())?;
/// assert!(!store.read(|s| s.services.loading)?);
/// # Ok::<(), service_finder::ServiceFinderError>(())
/// ```
pub fn initialize(config: &Config) -> Result<Store<HttpClient>> {
    tracing::debug!(base_url = %config.base_url, policy = ?config.completion_policy, "initializing store");
    let client = HttpClient::new(&config.base_url, config.timeout())?;
    Ok(Store::new(client, config.completion_policy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = \"http://10.0.2.2:5000\"\nsearch_threshold = 0.5\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.base_url, "http://10.0.2.2:5000");
        assert!((config.search_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.completion_policy, CompletionPolicy::LastSettledWins);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_ms = \"soon\"").unwrap();

        assert!(matches!(Config::from_file(&path), Err(ServiceFinderError::Config(_))));
    }

    #[test]
    fn map_overrides_only_present_keys() {
        let base = Config {
            trace_level: Some("warn".into()),
            ..Config::default()
        };
        let map = BTreeMap::from([
            ("timeout_ms".to_string(), "2500".to_string()),
            ("search_threshold".to_string(), "7".to_string()),
        ]);

        let config = base.with_overrides(&map);
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.trace_level.as_deref(), Some("warn"));
        assert!((config.search_threshold - search::DEFAULT_THRESHOLD).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_toml_threshold_keeps_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "search_threshold = 5.0\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!((config.search_threshold - search::DEFAULT_THRESHOLD).abs() < f64::EPSILON);

        let services: Vec<Service> = serde_json::from_str(
            r#"[{"service_id": 1, "name": "Plumbing Fix", "category": "plumbing"}]"#,
        )
        .unwrap();
        assert!(config.search_filter().apply(&services, "xyz123notfound").is_empty());
    }

    #[test]
    fn scorer_is_selectable_from_toml_and_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "search_scorer = \"skim\"\n").unwrap();
        assert_eq!(Config::from_file(&path).unwrap().search_scorer, ScorerKind::Skim);

        let map = BTreeMap::from([("search_scorer".to_string(), "skim".to_string())]);
        let config = Config::from_map(&map);
        assert_eq!(config.search_scorer, ScorerKind::Skim);

        let services: Vec<Service> = serde_json::from_str(
            r#"[
                {"service_id": 1, "name": "Plumbing Fix", "category": "plumbing"},
                {"service_id": 2, "name": "House Cleaning", "category": "cleaning"}
            ]"#,
        )
        .unwrap();
        let ids: Vec<i64> = config
            .search_filter()
            .apply(&services, "pl fx")
            .iter()
            .map(|s| s.service_id)
            .collect();
        assert_eq!(ids, vec![1]);

        let unknown = BTreeMap::from([("search_scorer".to_string(), "regex".to_string())]);
        assert_eq!(Config::from_map(&unknown).search_scorer, ScorerKind::Approximate);
    }

    #[test]
    fn missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(dir.path().join("absent.toml").as_path())).is_err());
    }
}
