pub mod api;
pub mod config;
pub mod io;
pub mod models;
pub mod service;

pub use config::{AppConfig, MatcherConfig, SelectionPolicy};
pub use models::{MatchCandidate, MatchStats, ProductRecord};
pub use service::MatcherService;
