mod config;
mod db;
mod entities;
mod error;
mod import;
mod models;
mod omdb;
mod routes;
mod store;
#[cfg(test)]
mod test_util;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, omdb::OmdbClient, store::MovieStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: MovieStore,
    pub omdb: Arc<OmdbClient>,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/movies", get(routes::list_movies).post(routes::create_movie))
        .route("/movies/omdb-add", post(routes::omdb_add))
        .route(
            "/movies/{id}",
            get(routes::get_movie).put(routes::update_movie).delete(routes::delete_movie),
        )
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movies_api=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http = reqwest::Client::builder()
        .user_agent("movies-api/0.1")
        .timeout(Duration::from_secs(30))
        .build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let store = MovieStore::new(db);

    let omdb = OmdbClient::new(
        http,
        config.omdb_api_key.clone(),
        config.omdb_base_url.clone(),
        config.omdb_rps,
    );

    let state = Arc::new(AppState { config: config.clone(), store, omdb: Arc::new(omdb) });

    // `movies-api import [path]` seeds the catalog instead of serving
    let mut args = std::env::args().skip(1);
    if args.next().as_deref() == Some("import") {
        let path = args.next().unwrap_or_else(|| "data/movie-titles.txt".to_string());
        return import::run(&state.store, &state.omdb, &path).await;
    }

    let app = app(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
