use std::{num::NonZeroU32, sync::Arc};

use anyhow::Context;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::{ApiError, AppResult},
    models::MovieInput,
};

pub struct OmdbClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl OmdbClient {
    pub fn new(
        client: reqwest::Client,
        api_key: Option<String>,
        base_url: String,
        rps: u32,
    ) -> Self {
        // Warn once on app load if lookups are going to fail
        if api_key.is_none() {
            tracing::warn!("OMDb lookups disabled - no OMDB_API_KEY provided");
        }

        let limiter =
            Arc::new(RateLimiter::direct(Quota::per_second(NonZeroU32::new(rps.max(1)).unwrap())));
        Self { client, api_key, base_url, limiter }
    }

    // Provider trouble (unreachable, non-2xx, unreadable or unmappable body)
    // degrades to Ok(None); only a missing API key is surfaced as an error.
    pub async fn find_by_title(&self, title: &str) -> AppResult<Option<MovieInput>> {
        let Some(api_key) = &self.api_key else {
            return Err(ApiError::config("OMDB_API_KEY is not set"));
        };

        self.limiter.until_ready().await;

        let url = self.base_url.trim_end_matches('/').to_string();
        let resp = match self
            .client
            .get(url)
            .query(&[("apikey", api_key.as_str()), ("t", title)])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                warn!(title = %title, error = %err, "omdb request failed");
                return Ok(None);
            },
        };

        let payload: OmdbPayload = match resp.error_for_status() {
            Ok(resp) => match resp.json().await {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(title = %title, error = %err, "omdb body was not readable");
                    return Ok(None);
                },
            },
            Err(err) => {
                warn!(title = %title, error = %err, "omdb returned an error status");
                return Ok(None);
            },
        };

        // OMDb reports misses as 200s carrying an error marker
        if !payload.is_found() {
            debug!(title = %title, "omdb has no match");
            return Ok(None);
        }

        match payload.into_input() {
            Ok(input) => Ok(Some(input)),
            Err(err) => {
                warn!(title = %title, error = %err, "omdb payload did not map to movie fields");
                Ok(None)
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbPayload {
    response: Option<String>,
    error: Option<String>,
    title: Option<String>,
    plot: Option<String>,
    language: Option<String>,
    country: Option<String>,
    director: Option<String>,
    writer: Option<String>,
    genre: Option<String>,
    actors: Option<String>,
    year: Option<String>,
    runtime: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
}

impl OmdbPayload {
    fn is_found(&self) -> bool {
        self.error.is_none()
            && !matches!(&self.response, Some(r) if r.eq_ignore_ascii_case("false"))
    }

    fn into_input(self) -> anyhow::Result<MovieInput> {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .context("payload has no title")?
            .to_string();

        let imdb_rating = self
            .imdb_rating
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .transpose()
            .context("imdbRating is not a number")?;

        Ok(MovieInput {
            title,
            plot: self.plot,
            language: self.language,
            country: self.country,
            director: self.director,
            writer: self.writer,
            genre: self.genre,
            actors: self.actors,
            year: self.year.as_deref().and_then(parse_year),
            runtime: self.runtime.as_deref().and_then(parse_runtime),
            imdb_rating,
        })
    }
}

// Year fields may carry a range suffix ("2011–2013"); keep the leading year.
fn parse_year(value: &str) -> Option<i32> {
    let run = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
    if run < 4 {
        return None;
    }
    value[..4].parse().ok()
}

// "108 min" -> 108; anything without a leading digit run is absent.
fn parse_runtime(value: &str) -> Option<i32> {
    let run = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
    if run == 0 {
        return None;
    }
    value[..run].parse().ok()
}
