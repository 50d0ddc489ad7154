use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string_len(Movies::Title, 100))
                    .col(text_null(Movies::Plot))
                    .col(text_null(Movies::Language))
                    .col(text_null(Movies::Country))
                    .col(text_null(Movies::Director))
                    .col(text_null(Movies::Writer))
                    .col(text_null(Movies::Genre))
                    .col(text_null(Movies::Actors))
                    .col(integer_null(Movies::Year))
                    .col(integer_null(Movies::Runtime))
                    .col(double_null(Movies::ImdbRating))
                    .col(timestamp_with_time_zone(Movies::CreatedAt))
                    .col(timestamp_with_time_zone(Movies::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_title")
                    .table(Movies::Table)
                    .col(Movies::Title)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    Plot,
    Language,
    Country,
    Director,
    Writer,
    Genre,
    Actors,
    Year,
    Runtime,
    ImdbRating,
    CreatedAt,
    UpdatedAt,
}
