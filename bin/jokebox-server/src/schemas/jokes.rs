use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::Joke;

/// Body for `POST /jokes`.
///
/// Any `id` or timestamp fields a client sends along are ignored; the
/// server assigns them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateJokeRequest {
    pub title: String,
    pub content: String,
    pub category: String,
}

/// Full-replacement body for `PUT /jokes/{id}`.
///
/// `id` must equal the id in the request path.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateJokeRequest {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
}

/// A stored joke as serialized to clients.  Timestamps are RFC 3339 UTC.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JokeResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Joke {
    pub fn to_response(&self) -> JokeResponse {
        JokeResponse {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            category: self.category.clone(),
            created_at: self.created_at.to_rfc3339(),
            updated_at: self.updated_at.to_rfc3339(),
        }
    }
}
