// Response handling exports
pub mod normalize;

pub use normalize::{normalize_response, parse_response, ProtocolError};
