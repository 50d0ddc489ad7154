use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState,
    entities::movie,
    error::{ApiError, AppResult},
    models::MovieList,
    store::ListQuery,
};

const DEFAULT_LIMIT: u64 = 10;

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    limit: Option<u64>,
    offset: Option<u64>,
    title: Option<String>,
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<MovieList>> {
    let Query(params) = params.map_err(|err| ApiError::validation(err.body_text()))?;

    let query = ListQuery {
        limit: params.limit.unwrap_or(DEFAULT_LIMIT),
        offset: params.offset.unwrap_or(0),
        title: params.title,
    };
    let (data, count) = state.store.list(&query).await?;

    Ok(Json(MovieList { data, count, limit: query.limit, offset: query.offset }))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<movie::Model>> {
    let Path(id) = id.map_err(|err| ApiError::validation(err.body_text()))?;

    let movie = state.store.get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(movie))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<movie::Model>> {
    let fields = object_body(body)?;
    let movie = state.store.create(fields).await?;
    Ok(Json(movie))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<movie::Model>> {
    let Path(id) = id.map_err(|err| ApiError::validation(err.body_text()))?;
    let fields = object_body(body)?;

    let movie = state.store.update(id, fields).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(movie))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<StatusCode> {
    // credential check comes first, before even looking at the id
    let presented = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    if presented != Some(state.config.admin_api_key.as_str()) {
        return Err(ApiError::Unauthorized);
    }

    let Path(id) = id.map_err(|err| ApiError::validation(err.body_text()))?;
    if state.store.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

#[derive(Debug, Deserialize)]
pub struct OmdbAddRequest {
    title: String,
}

pub async fn omdb_add(
    State(state): State<Arc<AppState>>,
    body: Result<Json<OmdbAddRequest>, JsonRejection>,
) -> AppResult<Json<movie::Model>> {
    let Json(req) = body.map_err(|err| ApiError::validation(err.body_text()))?;

    let Some(input) = state.omdb.find_by_title(&req.title).await? else {
        return Err(ApiError::NotFound);
    };

    let mapped = serde_json::to_value(&input).context("serialize mapped movie fields")?;
    let Value::Object(fields) = mapped else {
        return Err(anyhow::anyhow!("mapped movie fields are not an object").into());
    };

    let movie = state.store.create(fields).await?;
    Ok(Json(movie))
}

fn object_body(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<serde_json::Map<String, Value>, ApiError> {
    let Json(body) = body.map_err(|err| ApiError::validation(err.body_text()))?;
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(ApiError::validation("request body must be a JSON object")),
    }
}
