use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Application configuration (server side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
        }
    }
}

impl AppConfig {
    /// Load server settings from environment variables.
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
        }
    }
}

/// One-to-many policy when a left record clears the threshold against
/// several right records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Keep every above-threshold match, sorted best-first.
    #[default]
    KeepAll,
    /// Keep only the single best match per left record.
    BestOnly,
}

/// Weights of the three scoring terms. Tunable, not an invariant;
/// the sum is clamped to [0, 1] after weighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub token_overlap: f64,
    pub pack_compatibility: f64,
    pub code_prefix: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            token_overlap: 0.6,
            pack_compatibility: 0.25,
            code_prefix: 0.15,
        }
    }
}

/// Pack-size term tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackScoring {
    /// Relative quantity tolerance for "same pack" (0.1 = ±10%).
    pub quantity_tolerance: f64,
    /// Term value when both sides parsed but units or quantities disagree.
    pub partial_score: f64,
    /// Term value when either side failed to parse.
    pub unparsed_score: f64,
}

impl Default for PackScoring {
    fn default() -> Self {
        Self {
            quantity_tolerance: 0.10,
            partial_score: 0.5,
            unparsed_score: 0.3,
        }
    }
}

/// Matcher configuration: threshold, weights and the static lookup tables.
/// Injected at service construction; immutable for the life of the service,
/// so concurrent runs with different configs never interfere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default)]
    pub pack: PackScoring,
    #[serde(default)]
    pub selection: SelectionPolicy,
    /// Tokens dropped during normalization (articles, filler words).
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,
    /// Abbreviation expansions applied token-by-token ("frzn" -> "frozen").
    #[serde(default = "default_synonyms")]
    pub synonyms: HashMap<String, String>,
    /// Unit aliases collapsed to canonical units ("pounds" -> "lb").
    #[serde(default = "default_unit_aliases")]
    pub unit_aliases: HashMap<String, String>,
    /// vendor_id -> item-code prefix -> category tag. May be empty.
    /// Two codes whose prefixes resolve to the same tag earn the prefix bonus.
    #[serde(default)]
    pub prefix_categories: HashMap<String, HashMap<String, String>>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            weights: ScoringWeights::default(),
            pack: PackScoring::default(),
            selection: SelectionPolicy::default(),
            stopwords: default_stopwords(),
            synonyms: default_synonyms(),
            unit_aliases: default_unit_aliases(),
            prefix_categories: HashMap::new(),
        }
    }
}

impl MatcherConfig {
    /// Load from an optional TOML file layered over the built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;
        cfg.try_deserialize()
    }
}

fn default_threshold() -> f64 {
    0.5
}

fn default_stopwords() -> Vec<String> {
    [
        "a", "an", "the", "of", "and", "or", "with", "per", "pack", "fresh",
        "premium", "choice", "fancy", "select", "grade", "brand", "imported",
        "style",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_synonyms() -> HashMap<String, String> {
    [
        ("frzn", "frozen"),
        ("froz", "frozen"),
        ("grnd", "ground"),
        ("gr", "ground"),
        ("blk", "black"),
        ("wht", "white"),
        ("whl", "whole"),
        ("chkn", "chicken"),
        ("bnls", "boneless"),
        ("sknls", "skinless"),
        ("veg", "vegetable"),
        ("choc", "chocolate"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_unit_aliases() -> HashMap<String, String> {
    [
        ("lb", "lb"),
        ("lbs", "lb"),
        ("pound", "lb"),
        ("pounds", "lb"),
        ("#", "lb"),
        ("oz", "oz"),
        ("ozs", "oz"),
        ("ounce", "oz"),
        ("ounces", "oz"),
        ("gal", "gal"),
        ("gallon", "gal"),
        ("gallons", "gal"),
        ("qt", "qt"),
        ("quart", "qt"),
        ("pt", "pt"),
        ("pint", "pt"),
        ("ea", "ea"),
        ("each", "ea"),
        ("ct", "ea"),
        ("count", "ea"),
        ("cs", "cs"),
        ("case", "cs"),
        ("cases", "cs"),
        ("kg", "kg"),
        ("g", "g"),
        ("l", "l"),
        ("liter", "l"),
        ("ml", "ml"),
        ("doz", "doz"),
        ("dozen", "doz"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
