use bigdecimal::BigDecimal;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// One line item from a vendor's price list, as produced by the import step.
/// Immutable once parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub vendor_id: String,
    pub item_code: String,
    pub description: String,
    pub pack_size: String,
    /// Missing or non-positive prices are tolerated; they only null out
    /// the price comparison for pairs involving this record.
    #[serde(default)]
    pub unit_price: Option<BigDecimal>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ProductRecord {
    /// A price usable for comparison: present and strictly positive.
    pub fn comparable_price(&self) -> Option<&BigDecimal> {
        use bigdecimal::Zero;
        self.unit_price
            .as_ref()
            .filter(|p| **p > BigDecimal::zero())
    }
}

/// Pack size parsed out of the free-text `pack_size` field,
/// e.g. "6/1LB" -> quantity 6, unit "lb".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackSize {
    pub quantity: f64,
    /// Canonical unit after alias collapsing ("lb", "oz", "gal", "ea", "cs", ...).
    pub unit: String,
}

impl PackSize {
    /// Same canonical unit and quantities within the given relative tolerance.
    pub fn is_compatible(&self, other: &PackSize, tolerance: f64) -> bool {
        if self.unit != other.unit {
            return false;
        }
        let max = self.quantity.max(other.quantity);
        if max <= 0.0 {
            return true;
        }
        (self.quantity - other.quantity).abs() <= max * tolerance
    }
}

/// Normalized view of a record, owned by the matcher for a single run.
/// Borrows its source; never persisted.
#[derive(Debug, Clone)]
pub struct NormalizedProduct<'a> {
    pub source: &'a ProductRecord,
    /// Lowercase word tokens, stopwords stripped, units canonicalized.
    /// Ordered and de-duplicated.
    pub tokens: IndexSet<String>,
    /// None when the pack size string did not parse.
    pub pack: Option<PackSize>,
}
