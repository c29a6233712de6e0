//! DTOs for the alias suggestion endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SuggestRequest {
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
}

/// A suggestion is not a reservation; the alias may be taken by the time
/// it is used.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub suggested_alias: String,
}
