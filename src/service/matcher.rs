use bigdecimal::BigDecimal;
use rayon::prelude::*;
use std::cmp::Ordering;

use crate::config::{MatcherConfig, SelectionPolicy};
use crate::models::{MatchCandidate, MatchStats, NormalizedProduct, ProductRecord};
use crate::service::{scorer, Normalizer};

/// Cross-vendor product matching service. Holds an immutable config;
/// every run recomputes its candidate set from scratch.
pub struct MatcherService {
    config: MatcherConfig,
}

impl MatcherService {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Match two vendor price lists using the configured threshold.
    pub fn match_lists(
        &self,
        left: &[ProductRecord],
        right: &[ProductRecord],
    ) -> (Vec<MatchCandidate>, MatchStats) {
        self.match_with_threshold(left, right, None)
    }

    /// Match with an optional per-run threshold override.
    ///
    /// Full cross product, scored in parallel over the left list. The inputs
    /// are read-only and each worker builds its own candidate vector, so the
    /// concatenation below needs no shared mutable state. For the realistic
    /// sizes here (low thousands per side) no blocking/indexing is needed.
    pub fn match_with_threshold(
        &self,
        left: &[ProductRecord],
        right: &[ProductRecord],
        threshold: Option<f64>,
    ) -> (Vec<MatchCandidate>, MatchStats) {
        let threshold = threshold.unwrap_or(self.config.threshold);

        // Empty input on either side is an empty result, not an error.
        if left.is_empty() || right.is_empty() {
            tracing::info!(
                "match run skipped: {} left x {} right records",
                left.len(),
                right.len()
            );
            return (
                Vec::new(),
                MatchStats {
                    left_count: left.len(),
                    right_count: right.len(),
                    pairs_scored: 0,
                    candidates: 0,
                    threshold,
                },
            );
        }

        tracing::info!(
            "match run: {} left x {} right records, threshold {}",
            left.len(),
            right.len(),
            threshold
        );

        // Phase 1: normalize both sides once.
        let normalizer = Normalizer::new(&self.config);
        let left_norm: Vec<NormalizedProduct> =
            left.iter().map(|r| normalizer.normalize(r)).collect();
        let right_norm: Vec<NormalizedProduct> =
            right.iter().map(|r| normalizer.normalize(r)).collect();

        // Phase 2: score every cross-vendor pair. Parallel over the left
        // list; collecting by index keeps the output order deterministic.
        let per_left: Vec<(Vec<MatchCandidate>, usize)> = left_norm
            .par_iter()
            .map(|l| {
                let mut kept: Vec<MatchCandidate> = Vec::new();
                let mut scored = 0usize;

                for r in &right_norm {
                    // Invariant: never pair records from the same vendor.
                    if l.source.vendor_id == r.source.vendor_id {
                        continue;
                    }
                    scored += 1;

                    let score = scorer::score(l, r, &self.config);
                    if score < threshold {
                        continue;
                    }

                    kept.push(MatchCandidate {
                        left: l.source.clone(),
                        right: r.source.clone(),
                        score,
                        price_delta: price_delta(l, r),
                    });
                }

                // Best first; among equal scores the cheapest match sorts
                // first. Trailing keys make the order total, so repeated
                // runs come out byte-identical.
                kept.sort_by(|a, b| {
                    b.score
                        .total_cmp(&a.score)
                        .then_with(|| cmp_delta(&a.price_delta, &b.price_delta))
                        .then_with(|| a.right.vendor_id.cmp(&b.right.vendor_id))
                        .then_with(|| a.right.item_code.cmp(&b.right.item_code))
                });

                if self.config.selection == SelectionPolicy::BestOnly {
                    kept.truncate(1);
                }

                (kept, scored)
            })
            .collect();

        // Phase 3: concatenate in left-list order.
        let pairs_scored: usize = per_left.iter().map(|(_, n)| n).sum();
        let candidates: Vec<MatchCandidate> = per_left
            .into_iter()
            .flat_map(|(kept, _)| kept)
            .collect();

        let stats = MatchStats {
            left_count: left.len(),
            right_count: right.len(),
            pairs_scored,
            candidates: candidates.len(),
            threshold,
        };

        tracing::info!(
            "match complete: {} candidates from {} scored pairs",
            stats.candidates,
            stats.pairs_scored
        );

        (candidates, stats)
    }
}

/// right - left, computed only when both prices are usable and the pack
/// units resolved to the same canonical unit. Anything else is None;
/// a bad price never aborts the run.
fn price_delta(l: &NormalizedProduct, r: &NormalizedProduct) -> Option<BigDecimal> {
    let left_price = l.source.comparable_price()?;
    let right_price = r.source.comparable_price()?;
    let (lp, rp) = (l.pack.as_ref()?, r.pack.as_ref()?);
    if lp.unit != rp.unit {
        return None;
    }
    Some(right_price - left_price)
}

/// Known deltas sort ascending ahead of unknown ones.
fn cmp_delta(a: &Option<BigDecimal>, b: &Option<BigDecimal>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
