//! Canned queries for the command line demo commands

use crate::models::{MatchRequest, QuerySpec};

/// Match a person on name only
pub fn name() -> MatchRequest {
    MatchRequest::new().with_query(QuerySpec::new("q1", "Person").property("name", ["Barack Obama"]))
}

/// Match a person on name variants, address and country
pub fn name_address() -> MatchRequest {
    MatchRequest::new().with_query(
        QuerySpec::new("q1", "Person")
            .property("name", ["Vladimir", "Wladimir"])
            .property("address", ["Kremlin, Moscow"])
            .property("country", ["ru"]),
    )
}

/// Match a person on name and birth date
pub fn name_birth_date() -> MatchRequest {
    MatchRequest::new().with_query(
        QuerySpec::new("q1", "Person")
            .property("name", ["Barack Obama"])
            .property("birthDate", ["1961-08-04"]),
    )
}

/// A person and a company in one request, ranked with `regression-v1`
pub fn multiple() -> MatchRequest {
    MatchRequest::new()
        .with_query(
            QuerySpec::new("query-A", "Person")
                .property("name", ["Arkadiii Romanovich Rotenberg", "Ротенберг Аркадий"])
                .property("birthDate", ["1951"]),
        )
        .with_query(
            QuerySpec::new("query-B", "Company")
                .property("name", ["Stroygazmontazh"])
                .property("jurisdiction", ["Russia"]),
        )
        .with_algorithm("regression-v1")
}
