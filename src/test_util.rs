use std::{collections::HashMap, sync::Arc};

use axum::{Json, Router, extract::Query, routing::get};
use migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::{AppState, config::Config, omdb::OmdbClient, store::MovieStore};

// A single pooled connection keeps every query on the same in-memory database.
pub async fn memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1);
    let db = Database::connect(opts).await.expect("connect in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub async fn memory_store() -> MovieStore {
    MovieStore::new(memory_db().await)
}

pub async fn test_state() -> Arc<AppState> {
    let omdb = OmdbClient::new(reqwest::Client::new(), None, "http://127.0.0.1:9".to_string(), 10);
    test_state_with_omdb(omdb).await
}

pub async fn test_state_with_omdb(omdb: OmdbClient) -> Arc<AppState> {
    let config = Config {
        addr: "127.0.0.1:0".parse().expect("addr"),
        database_url: "sqlite::memory:".to_string(),
        omdb_api_key: None,
        omdb_base_url: "http://127.0.0.1:9".to_string(),
        omdb_rps: 10,
        admin_api_key: "test-admin".to_string(),
    };
    Arc::new(AppState {
        config: Arc::new(config),
        store: memory_store().await,
        omdb: Arc::new(omdb),
    })
}

pub fn celebration_payload() -> Value {
    json!({
        "Response": "True",
        "Title": "The Celebration",
        "Plot": "A family reunion takes a dark turn.",
        "Language": "Danish",
        "Country": "Denmark",
        "Director": "Thomas Vinterberg",
        "Writer": "Thomas Vinterberg, Mogens Rukov",
        "Genre": "Drama",
        "Actors": "Ulrich Thomsen, Henning Moritzen",
        "Year": "1998",
        "Runtime": "105 min",
        "imdbRating": "8.1",
    })
}

// Serves `response` at /, but only to requests carrying the stub key
// ("test-key") and a title parameter; anything else gets the provider's
// error marker.
pub async fn stub_omdb(response: Value) -> String {
    let app = Router::new().route(
        "/",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let response = response.clone();
            async move {
                if params.get("apikey").map(String::as_str) != Some("test-key")
                    || !params.contains_key("t")
                {
                    return Json(json!({"Response": "False", "Error": "No API key provided."}));
                }
                Json(response)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}
