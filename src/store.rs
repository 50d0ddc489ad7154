use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, Unchanged,
};
use serde_json::{Map, Value};

use crate::{entities::movie, error::AppResult, models::MovieInput};

#[derive(Clone, Debug)]
pub struct ListQuery {
    pub limit: u64,
    pub offset: u64,
    pub title: Option<String>,
}

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<(Vec<movie::Model>, u64)> {
        let mut find = movie::Entity::find();
        if let Some(title) = &query.title {
            find = find.filter(movie::Column::Title.eq(title.as_str()));
        }

        // count reflects the filter only, never the slice
        let count = find.clone().count(&self.db).await?;

        let data = find
            .order_by_asc(movie::Column::Title)
            .order_by_asc(movie::Column::Id)
            .offset(query.offset)
            .limit(query.limit)
            .all(&self.db)
            .await?;

        Ok((data, count))
    }

    pub async fn get(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn create(&self, fields: Map<String, Value>) -> AppResult<movie::Model> {
        let input = MovieInput::from_fields(fields)?;

        let now = Utc::now().fixed_offset();
        let mut model = writable(input);
        model.id = NotSet;
        model.created_at = Set(now);
        model.updated_at = Set(now);

        Ok(model.insert(&self.db).await?)
    }

    pub async fn update(
        &self,
        id: i32,
        fields: Map<String, Value>,
    ) -> AppResult<Option<movie::Model>> {
        let Some(existing) = movie::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let input = MovieInput::from_fields(fields)?;

        // updated_at must advance even when two writes land in the same clock tick
        let mut now = Utc::now().fixed_offset();
        if now <= existing.updated_at {
            now = existing.updated_at + Duration::microseconds(1);
        }

        let mut model = writable(input);
        model.id = Unchanged(existing.id);
        model.updated_at = Set(now);

        Ok(Some(model.update(&self.db).await?))
    }

    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

// Every writable column is set, so updates are full replacements: optionals
// absent from the input overwrite the stored column with NULL.
fn writable(input: MovieInput) -> movie::ActiveModel {
    movie::ActiveModel {
        title: Set(input.title),
        plot: Set(input.plot),
        language: Set(input.language),
        country: Set(input.country),
        director: Set(input.director),
        writer: Set(input.writer),
        genre: Set(input.genre),
        actors: Set(input.actors),
        year: Set(input.year),
        runtime: Set(input.runtime),
        imdb_rating: Set(input.imdb_rating),
        ..Default::default()
    }
}
