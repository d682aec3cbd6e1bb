use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::ProductRecord;

/// A proposed correspondence between one product from each of two vendors.
/// Recomputed from scratch every run; no persisted identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub left: ProductRecord,
    pub right: ProductRecord,
    /// Confidence in [0, 1].
    pub score: f64,
    /// right.unit_price - left.unit_price. None when either price is
    /// missing/non-positive or the pack units are not known-compatible.
    pub price_delta: Option<BigDecimal>,
}

/// Per-run counters, returned alongside the candidates and logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchStats {
    pub left_count: usize,
    pub right_count: usize,
    /// Cross-product pairs actually scored (same-vendor pairs excluded).
    pub pairs_scored: usize,
    pub candidates: usize,
    pub threshold: f64,
}
