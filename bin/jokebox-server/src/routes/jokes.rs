//! The `/jokes` route group: CRUD plus the query endpoints.
//!
//! Random selection goes through the injected
//! [`IndexPicker`](crate::random::IndexPicker) and an SQL offset skip, so
//! every record existing at count time is equally likely and nothing is
//! materialized in memory.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tracing::info;
use utoipa::OpenApi;

use crate::db::{Joke, JokeStore, NewJoke};
use crate::error::ServerError;
use crate::schemas::jokes::{CreateJokeRequest, JokeResponse, UpdateJokeRequest};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_jokes,
        list_jokes_sorted,
        get_joke,
        list_jokes_by_category,
        random_joke,
        random_joke_by_category,
        create_joke,
        update_joke,
        delete_joke,
    ),
    components(schemas(CreateJokeRequest, UpdateJokeRequest, JokeResponse))
)]
pub struct JokesApi;

/// Register joke routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jokes", get(list_jokes).post(create_joke))
        .route("/jokes/sorted", get(list_jokes_sorted))
        .route("/jokes/random", get(random_joke))
        .route("/jokes/random/category/{category}", get(random_joke_by_category))
        .route("/jokes/category/{category}", get(list_jokes_by_category))
        .route("/jokes/{id}", get(get_joke).put(update_joke).delete(delete_joke))
}

// ── Read endpoints ────────────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/jokes",
    tag = "jokes",
    responses(
        (status = 200, description = "Every joke, in storage order", body = Vec<JokeResponse>),
    )
)]
pub async fn list_jokes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<JokeResponse>>, ServerError> {
    let jokes = state.store.list_all().await?;
    Ok(Json(jokes.iter().map(Joke::to_response).collect()))
}

#[utoipa::path(
    get,
    path = "/jokes/sorted",
    tag = "jokes",
    responses(
        (status = 200, description = "Every joke, ordered by category ascending", body = Vec<JokeResponse>),
    )
)]
pub async fn list_jokes_sorted(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<JokeResponse>>, ServerError> {
    let jokes = state.store.list_sorted_by_category().await?;
    Ok(Json(jokes.iter().map(Joke::to_response).collect()))
}

#[utoipa::path(
    get,
    path = "/jokes/{id}",
    tag = "jokes",
    params(("id" = i64, Path, description = "Joke id")),
    responses(
        (status = 200, description = "The joke", body = JokeResponse),
        (status = 404, description = "No joke with that id"),
    )
)]
pub async fn get_joke(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<JokeResponse>, ServerError> {
    let joke = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("joke {id} not found")))?;
    Ok(Json(joke.to_response()))
}

#[utoipa::path(
    get,
    path = "/jokes/category/{category}",
    tag = "jokes",
    params(("category" = String, Path, description = "Category, matched ignoring case")),
    responses(
        (status = 200, description = "Jokes in the category", body = Vec<JokeResponse>),
        (status = 404, description = "No jokes in that category"),
    )
)]
pub async fn list_jokes_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<JokeResponse>>, ServerError> {
    let jokes = state.store.list_by_category(&category).await?;
    if jokes.is_empty() {
        return Err(ServerError::NotFound(format!(
            "no jokes in category '{category}'"
        )));
    }
    Ok(Json(jokes.iter().map(Joke::to_response).collect()))
}

#[utoipa::path(
    get,
    path = "/jokes/random",
    tag = "jokes",
    responses(
        (status = 200, description = "A uniformly-random joke", body = JokeResponse),
        (status = 404, description = "The joke table is empty"),
    )
)]
pub async fn random_joke(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JokeResponse>, ServerError> {
    let total = state.store.count().await?;
    if total == 0 {
        return Err(ServerError::NotFound("no jokes available".to_owned()));
    }
    let offset = state.picker.pick(total as usize) as i64;
    // A concurrent delete can empty the picked offset; report Not-Found for
    // this request rather than retrying.
    let joke = state
        .store
        .nth(offset)
        .await?
        .ok_or_else(|| ServerError::NotFound("no jokes available".to_owned()))?;
    Ok(Json(joke.to_response()))
}

#[utoipa::path(
    get,
    path = "/jokes/random/category/{category}",
    tag = "jokes",
    params(("category" = String, Path, description = "Category, matched ignoring case")),
    responses(
        (status = 200, description = "A uniformly-random joke from the category", body = JokeResponse),
        (status = 404, description = "No jokes in that category"),
    )
)]
pub async fn random_joke_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<JokeResponse>, ServerError> {
    let total = state.store.count_by_category(&category).await?;
    if total == 0 {
        return Err(ServerError::NotFound(format!(
            "no jokes in category '{category}'"
        )));
    }
    let offset = state.picker.pick(total as usize) as i64;
    let joke = state
        .store
        .nth_in_category(&category, offset)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("no jokes in category '{category}'")))?;
    Ok(Json(joke.to_response()))
}

// ── Write endpoints ───────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/jokes",
    tag = "jokes",
    request_body = CreateJokeRequest,
    responses(
        (status = 201, description = "Joke created; Location points at it", body = JokeResponse),
        (status = 400, description = "Missing or malformed body"),
    )
)]
pub async fn create_joke(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateJokeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let Json(req) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    // Both timestamps come from the same instant so created_at == updated_at
    // holds on freshly-created records.
    let now = Utc::now();
    let joke = state
        .store
        .insert(NewJoke {
            title: req.title,
            content: req.content,
            category: req.category,
            created_at: now,
            updated_at: now,
        })
        .await?;
    info!(id = joke.id, category = %joke.category, "joke created");

    let location = format!("/jokes/{}", joke.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(joke.to_response()),
    ))
}

#[utoipa::path(
    put,
    path = "/jokes/{id}",
    tag = "jokes",
    params(("id" = i64, Path, description = "Joke id")),
    request_body = UpdateJokeRequest,
    responses(
        (status = 204, description = "Joke replaced"),
        (status = 400, description = "Malformed body, or body id does not match the path"),
        (status = 404, description = "No joke with that id"),
    )
)]
pub async fn update_joke(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateJokeRequest>, JsonRejection>,
) -> Result<StatusCode, ServerError> {
    let Json(req) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    if req.id != id {
        return Err(ServerError::BadRequest(format!(
            "body id {} does not match path id {id}",
            req.id
        )));
    }

    let rows = state
        .store
        .update(id, &req.title, &req.content, &req.category, Utc::now())
        .await?;
    if rows == 0 {
        return Err(ServerError::NotFound(format!("joke {id} not found")));
    }
    info!(id, "joke updated");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/jokes/{id}",
    tag = "jokes",
    params(("id" = i64, Path, description = "Joke id")),
    responses(
        (status = 204, description = "Joke deleted"),
        (status = 404, description = "No joke with that id"),
    )
)]
pub async fn delete_joke(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServerError> {
    let rows = state.store.delete(id).await?;
    if rows == 0 {
        return Err(ServerError::NotFound(format!("joke {id} not found")));
    }
    info!(id, "joke deleted");
    Ok(StatusCode::NO_CONTENT)
}
