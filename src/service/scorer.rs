use indexmap::IndexSet;
use std::collections::HashMap;

use crate::config::{MatcherConfig, PackScoring};
use crate::models::{NormalizedProduct, PackSize, ProductRecord};

/// Heuristic similarity in [0, 1]: weighted sum of token overlap, pack-size
/// compatibility and the code-prefix bonus, clamped. Pure and deterministic;
/// monotonic in token overlap for fixed pack/prefix terms.
pub fn score(a: &NormalizedProduct, b: &NormalizedProduct, config: &MatcherConfig) -> f64 {
    let token = token_overlap(&a.tokens, &b.tokens);
    let pack = pack_compatibility(a.pack.as_ref(), b.pack.as_ref(), &config.pack);
    let prefix = prefix_affinity(a.source, b.source, &config.prefix_categories);

    let w = &config.weights;
    let total = token * w.token_overlap + pack * w.pack_compatibility + prefix * w.code_prefix;
    total.clamp(0.0, 1.0)
}

/// Jaccard similarity of the two token sets. Empty-vs-anything is 0.
pub fn token_overlap(a: &IndexSet<String>, b: &IndexSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Pack-size term: 1.0 for same canonical unit with quantities inside the
/// tolerance; the partial score when both sides parsed but disagree; the
/// unparsed score when either side failed to parse.
pub fn pack_compatibility(a: Option<&PackSize>, b: Option<&PackSize>, tuning: &PackScoring) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a.is_compatible(b, tuning.quantity_tolerance) => 1.0,
        (Some(_), Some(_)) => tuning.partial_score,
        _ => tuning.unparsed_score,
    }
}

/// Code-prefix term: 1.0 when both item codes resolve, through their vendor's
/// prefix table, to the same category tag. The table may be empty.
pub fn prefix_affinity(
    left: &ProductRecord,
    right: &ProductRecord,
    table: &HashMap<String, HashMap<String, String>>,
) -> f64 {
    let Some(left_tag) = category_for(table, &left.vendor_id, &left.item_code) else {
        return 0.0;
    };
    let Some(right_tag) = category_for(table, &right.vendor_id, &right.item_code) else {
        return 0.0;
    };
    if left_tag == right_tag {
        1.0
    } else {
        0.0
    }
}

/// Longest configured prefix of the item code wins.
fn category_for<'a>(
    table: &'a HashMap<String, HashMap<String, String>>,
    vendor_id: &str,
    item_code: &str,
) -> Option<&'a str> {
    table
        .get(vendor_id)?
        .iter()
        .filter(|(prefix, _)| item_code.starts_with(prefix.as_str()))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, tag)| tag.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::Normalizer;

    fn record(vendor: &str, code: &str, description: &str, pack: &str) -> ProductRecord {
        ProductRecord {
            vendor_id: vendor.to_string(),
            item_code: code.to_string(),
            description: description.to_string(),
            pack_size: pack.to_string(),
            unit_price: None,
            category: None,
        }
    }

    fn tokens(words: &[&str]) -> IndexSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn token_overlap_is_jaccard() {
        let a = tokens(&["black", "pepper", "ground"]);
        let b = tokens(&["ground", "black", "pepper"]);
        assert_eq!(token_overlap(&a, &b), 1.0);

        let c = tokens(&["black", "pepper"]);
        let d = tokens(&["white", "pepper"]);
        // intersection 1, union 3
        assert!((token_overlap(&c, &d) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn token_overlap_empty_sets() {
        let empty = IndexSet::new();
        let some = tokens(&["pepper"]);
        assert_eq!(token_overlap(&empty, &empty), 0.0);
        assert_eq!(token_overlap(&empty, &some), 0.0);
    }

    #[test]
    fn pack_term_levels() {
        let tuning = PackScoring::default();
        let lb6 = PackSize { quantity: 6.0, unit: "lb".to_string() };
        let lb6b = PackSize { quantity: 6.0, unit: "lb".to_string() };
        let lb50 = PackSize { quantity: 50.0, unit: "lb".to_string() };
        let oz6 = PackSize { quantity: 6.0, unit: "oz".to_string() };

        assert_eq!(pack_compatibility(Some(&lb6), Some(&lb6b), &tuning), 1.0);
        assert_eq!(pack_compatibility(Some(&lb6), Some(&oz6), &tuning), 0.5);
        assert_eq!(pack_compatibility(Some(&lb6), Some(&lb50), &tuning), 0.5);
        assert_eq!(pack_compatibility(Some(&lb6), None, &tuning), 0.3);
        assert_eq!(pack_compatibility(None, None, &tuning), 0.3);
    }

    #[test]
    fn prefix_term_requires_matching_tags() {
        let mut table: HashMap<String, HashMap<String, String>> = HashMap::new();
        table.insert(
            "SYSCO".to_string(),
            [("10".to_string(), "spices".to_string())].into_iter().collect(),
        );
        table.insert(
            "Shamrock".to_string(),
            [
                ("S-5".to_string(), "spices".to_string()),
                ("S-9".to_string(), "dairy".to_string()),
            ]
            .into_iter()
            .collect(),
        );

        let l = record("SYSCO", "1001", "", "");
        let r = record("Shamrock", "S-55", "", "");
        assert_eq!(prefix_affinity(&l, &r, &table), 1.0);

        let r2 = record("Shamrock", "S-90", "", "");
        assert_eq!(prefix_affinity(&l, &r2, &table), 0.0);

        let empty = HashMap::new();
        assert_eq!(prefix_affinity(&l, &r, &empty), 0.0);
    }

    #[test]
    fn longest_prefix_wins() {
        let table: HashMap<String, HashMap<String, String>> = [(
            "SYSCO".to_string(),
            [
                ("1".to_string(), "broad".to_string()),
                ("100".to_string(), "narrow".to_string()),
            ]
            .into_iter()
            .collect(),
        )]
        .into_iter()
        .collect();
        assert_eq!(category_for(&table, "SYSCO", "1001"), Some("narrow"));
        assert_eq!(category_for(&table, "SYSCO", "2001"), None);
    }

    #[test]
    fn score_is_monotonic_in_token_overlap() {
        let config = MatcherConfig::default();
        let normalizer = Normalizer::new(&config);

        let base = record("SYSCO", "1", "black pepper ground", "6/1LB");
        let close = record("Shamrock", "2", "ground black pepper", "6/1LB");
        let far = record("Shamrock", "3", "ground cumin", "6/1LB");

        let nb = normalizer.normalize(&base);
        let nc = normalizer.normalize(&close);
        let nf = normalizer.normalize(&far);

        // Same pack term and prefix term, strictly higher overlap.
        assert!(score(&nb, &nc, &config) > score(&nb, &nf, &config));
    }

    #[test]
    fn compatible_pack_outscores_incompatible_pack() {
        let config = MatcherConfig::default();
        let normalizer = Normalizer::new(&config);

        let l = record("SYSCO", "1", "black pepper ground", "6/1LB");
        let compatible = record("Shamrock", "2", "black pepper ground", "6 x 1 lb");
        let incompatible = record("Shamrock", "3", "black pepper ground", "50 LB");

        let nl = normalizer.normalize(&l);
        let nc = normalizer.normalize(&compatible);
        let ni = normalizer.normalize(&incompatible);

        assert!(score(&nl, &nc, &config) > score(&nl, &ni, &config));
    }

    #[test]
    fn score_stays_in_unit_interval() {
        let config = MatcherConfig::default();
        let normalizer = Normalizer::new(&config);
        let l = record("SYSCO", "1", "", "???");
        let r = record("Shamrock", "2", "ground black pepper", "6/1LB");
        let s = score(&normalizer.normalize(&l), &normalizer.normalize(&r), &config);
        assert!((0.0..=1.0).contains(&s));
    }
}
