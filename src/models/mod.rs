// Model exports
pub mod requests;
pub mod responses;

pub use requests::{MatchRequest, QuerySpec};
pub use responses::{MatchResponse, MatchResult};
pub(crate) use responses::RawMatchResult;
