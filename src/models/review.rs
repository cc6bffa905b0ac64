use serde::{Deserialize, Serialize};

use super::{ReviewId, UserId};

/// Rating a client left for an agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    /// 1 to 5
    pub overall: u8,
    #[serde(default)]
    pub text: String,
    pub realtor_id: UserId,
    pub author_client_id: UserId,
}

/// Body of `POST /reviews`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub overall: u8,
    pub text: String,
    pub realtor_id: UserId,
    pub author_client_id: UserId,
}
