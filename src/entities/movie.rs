use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub plot: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub genre: Option<String>,
    pub actors: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<i32>,
    pub imdb_rating: Option<f64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
