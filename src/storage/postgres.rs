use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::ListingRecord;
use crate::storage::PropertyStore;

/// Upserts batches over a direct Postgres connection with a single
/// multi-row INSERT ... ON CONFLICT statement per batch.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// The pool connects on first use, so an unreachable database shows
    /// up as per-batch write failures rather than a setup error.
    pub fn connect_lazy(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(url)
            .context("Invalid Postgres connection string")?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl PropertyStore for PostgresStore {
    async fn write_batch(&self, records: &[ListingRecord]) -> Result<u64> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO properties (title, url, price_text, price_numeric, bedrooms, \
             bathrooms, building_area_m2, location, posting_date, image_url, mode, region_slug) ",
        );

        query.push_values(records, |mut row, record| {
            row.push_bind(&record.title)
                .push_bind(&record.url)
                .push_bind(&record.price_text)
                .push_bind(record.price_numeric)
                .push_bind(record.bedrooms)
                .push_bind(record.bathrooms)
                .push_bind(record.building_area_m2)
                .push_bind(&record.location)
                .push_bind(&record.posting_date)
                .push_bind(&record.image_url)
                .push_bind(record.mode.as_str())
                .push_bind(&record.region_slug);
        });

        query.push(
            " ON CONFLICT (url) DO UPDATE SET \
             title = EXCLUDED.title, \
             price_text = EXCLUDED.price_text, \
             price_numeric = EXCLUDED.price_numeric, \
             bedrooms = EXCLUDED.bedrooms, \
             bathrooms = EXCLUDED.bathrooms, \
             building_area_m2 = EXCLUDED.building_area_m2, \
             location = EXCLUDED.location, \
             posting_date = EXCLUDED.posting_date, \
             image_url = EXCLUDED.image_url, \
             updated_at = NOW()",
        );

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .context("Postgres upsert failed")?;

        Ok(result.rows_affected())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
