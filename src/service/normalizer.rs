use indexmap::IndexSet;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::config::MatcherConfig;
use crate::models::{NormalizedProduct, PackSize, ProductRecord};

/// "6/1LB", "6 x 1 lb" — leading multiplier, inner size, trailing unit.
static RE_PACK_MULTI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)\s*(?:/|x)\s*(\d+(?:\.\d+)?)\s*([a-z#]+)\.?$")
        .expect("Invalid regex")
});

/// "50 LB", "1EA" — bare quantity and unit.
static RE_PACK_SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*([a-z#]+)\.?$").expect("Invalid regex"));

/// Characters kept during tokenization besides alphanumerics:
/// size-indicating punctuation only.
fn keep_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '/' || c == '#' || c == '.'
}

/// Turns raw product records into their normalized form for one match run.
/// All lookup tables come from the injected config; nothing here is mutable.
pub struct Normalizer {
    stopwords: HashSet<String>,
    synonyms: HashMap<String, String>,
    unit_aliases: HashMap<String, String>,
}

impl Normalizer {
    pub fn new(config: &MatcherConfig) -> Self {
        Self {
            stopwords: config.stopwords.iter().cloned().collect(),
            synonyms: config.synonyms.clone(),
            unit_aliases: config.unit_aliases.clone(),
        }
    }

    /// Never fails: an empty or punctuation-only description yields an
    /// empty token set, and an unparseable pack size is simply left unset.
    pub fn normalize<'a>(&self, record: &'a ProductRecord) -> NormalizedProduct<'a> {
        NormalizedProduct {
            source: record,
            tokens: self.tokenize(&record.description),
            pack: self.parse_pack_size(&record.pack_size),
        }
    }

    /// Lowercase, strip punctuation (keeping `/`, digits, `#`, `.`), split on
    /// whitespace, expand abbreviations, canonicalize units, drop stopwords.
    /// De-duplicated, first-occurrence order preserved.
    pub fn tokenize(&self, text: &str) -> IndexSet<String> {
        let lowered = text.to_lowercase();
        let cleaned: String = lowered
            .chars()
            .map(|c| if keep_char(c) { c } else { ' ' })
            .collect();

        let mut tokens = IndexSet::new();
        for raw in cleaned.split_whitespace() {
            let trimmed = raw.trim_matches(|c| c == '.' || c == '/');
            if trimmed.is_empty() || trimmed.chars().all(|c| c == '#') {
                continue;
            }
            let token = if let Some(expanded) = self.synonyms.get(trimmed) {
                expanded.as_str()
            } else if let Some(unit) = self.unit_aliases.get(trimmed) {
                unit.as_str()
            } else {
                trimmed
            };
            if self.stopwords.contains(token) {
                continue;
            }
            tokens.insert(token.to_string());
        }
        tokens
    }

    /// Best-effort pack-size parse: leading multiplier + trailing unit.
    /// Returns None on anything it does not recognize; the caller treats
    /// that as degraded confidence, never as an error.
    pub fn parse_pack_size(&self, raw: &str) -> Option<PackSize> {
        let cleaned = raw.trim().to_lowercase();
        if cleaned.is_empty() {
            return None;
        }

        if let Some(caps) = RE_PACK_MULTI.captures(&cleaned) {
            let quantity: f64 = caps[1].parse().ok()?;
            let unit = self.canonical_unit(&caps[3])?;
            return Some(PackSize { quantity, unit });
        }

        if let Some(caps) = RE_PACK_SINGLE.captures(&cleaned) {
            let quantity: f64 = caps[1].parse().ok()?;
            let unit = self.canonical_unit(&caps[2])?;
            return Some(PackSize { quantity, unit });
        }

        None
    }

    fn canonical_unit(&self, token: &str) -> Option<String> {
        self.unit_aliases.get(token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn normalizer() -> Normalizer {
        Normalizer::new(&MatcherConfig::default())
    }

    fn record(description: &str, pack_size: &str) -> ProductRecord {
        ProductRecord {
            vendor_id: "SYSCO".to_string(),
            item_code: "1001".to_string(),
            description: description.to_string(),
            pack_size: pack_size.to_string(),
            unit_price: Some(BigDecimal::from_str("45.99").unwrap()),
            category: None,
        }
    }

    #[test]
    fn tokenize_lowercases_and_orders() {
        let tokens = normalizer().tokenize("Black Pepper Ground");
        let expected: Vec<&str> = vec!["black", "pepper", "ground"];
        assert_eq!(tokens.iter().map(String::as_str).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn tokenize_strips_stopwords_and_expands_abbreviations() {
        let tokens = normalizer().tokenize("Fresh Frzn Chkn Breast, Bnls");
        assert!(tokens.contains("frozen"));
        assert!(tokens.contains("chicken"));
        assert!(tokens.contains("boneless"));
        assert!(!tokens.contains("fresh"));
    }

    #[test]
    fn tokenize_canonicalizes_units() {
        let tokens = normalizer().tokenize("Ground Pepper 5 Lbs");
        assert!(tokens.contains("lb"));
        assert!(!tokens.contains("lbs"));
    }

    #[test]
    fn tokenize_handles_empty_and_punctuation_only() {
        let n = normalizer();
        assert!(n.tokenize("").is_empty());
        assert!(n.tokenize("!!! --- ,,,").is_empty());
    }

    #[test]
    fn tokenize_deduplicates() {
        let tokens = normalizer().tokenize("pepper pepper pepper");
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn parse_pack_slash_form() {
        let pack = normalizer().parse_pack_size("6/1LB").unwrap();
        assert_eq!(pack.quantity, 6.0);
        assert_eq!(pack.unit, "lb");
    }

    #[test]
    fn parse_pack_x_form() {
        let pack = normalizer().parse_pack_size("6 x 1 lb").unwrap();
        assert_eq!(pack.quantity, 6.0);
        assert_eq!(pack.unit, "lb");
    }

    #[test]
    fn parse_pack_single_form() {
        let pack = normalizer().parse_pack_size("50 LB").unwrap();
        assert_eq!(pack.quantity, 50.0);
        assert_eq!(pack.unit, "lb");
        let each = normalizer().parse_pack_size("1 EA").unwrap();
        assert_eq!(each.unit, "ea");
    }

    #[test]
    fn parse_pack_rejects_garbage() {
        let n = normalizer();
        assert!(n.parse_pack_size("").is_none());
        assert!(n.parse_pack_size("assorted sizes").is_none());
        assert!(n.parse_pack_size("6/1 XYZZY").is_none());
    }

    #[test]
    fn normalize_never_fails_on_degenerate_record() {
        let rec = record("", "???");
        let norm = normalizer().normalize(&rec);
        assert!(norm.tokens.is_empty());
        assert!(norm.pack.is_none());
    }

    #[test]
    fn pack_compatibility_tolerance() {
        let a = PackSize { quantity: 6.0, unit: "lb".to_string() };
        let b = PackSize { quantity: 6.5, unit: "lb".to_string() };
        let c = PackSize { quantity: 50.0, unit: "lb".to_string() };
        assert!(a.is_compatible(&b, 0.10));
        assert!(!a.is_compatible(&c, 0.10));
    }
}
