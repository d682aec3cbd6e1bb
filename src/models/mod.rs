pub mod candidate;
pub mod product;

pub use candidate::{MatchCandidate, MatchStats};
pub use product::{NormalizedProduct, PackSize, ProductRecord};
