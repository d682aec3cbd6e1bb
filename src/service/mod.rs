pub mod matcher;
pub mod normalizer;
pub mod scorer;

pub use matcher::MatcherService;
pub use normalizer::Normalizer;
