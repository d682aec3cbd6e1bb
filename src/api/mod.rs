pub mod handlers;

pub use handlers::{health_check, match_lists, match_lists_csv, MatchRequest, MatchResponse};
