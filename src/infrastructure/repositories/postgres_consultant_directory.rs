use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::consultant::{Consultant, ConsultantFilter};
use crate::domain::repositories::ConsultantDirectory;

/// PostgreSQL implementation of the consultant directory
///
/// The profile is a JSONB document; the columns the filters push down on
/// (approval, experience, hourly rate, timezone, remote) are denormalized
/// by whatever process owns consultant writes.
pub struct PostgresConsultantDirectory {
    pool: PgPool,
}

impl PostgresConsultantDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn rehydrate(doc: serde_json::Value) -> Result<Consultant, String> {
        serde_json::from_value(doc).map_err(|e| format!("Corrupt consultant document: {e}"))
    }
}

#[async_trait]
impl ConsultantDirectory for PostgresConsultantDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Consultant>, String> {
        let doc: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT doc FROM consultants WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| format!("Failed to find consultant by id: {e}"))?;

        doc.map(Self::rehydrate).transpose()
    }

    async fn find_many(&self, filter: &ConsultantFilter) -> Result<Vec<Consultant>, String> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT doc FROM consultants WHERE TRUE");

        if let Some(approved) = filter.approved {
            query.push(" AND approved = ").push_bind(approved);
        }
        if let Some(ids) = &filter.ids {
            query.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
        }
        if !filter.exclude_ids.is_empty() {
            query
                .push(" AND NOT (id = ANY(")
                .push_bind(filter.exclude_ids.clone())
                .push("))");
        }
        if !filter.skills_any.is_empty() {
            query
                .push(" AND doc->'skills' ?| ")
                .push_bind(filter.skills_any.clone());
        }
        if let Some(min) = filter.min_experience {
            query
                .push(" AND experience_years >= ")
                .push_bind(min as i32);
        }
        if let Some(timezone) = &filter.timezone {
            query.push(" AND timezone = ").push_bind(timezone.clone());
        }
        if let Some(remote) = filter.remote {
            query.push(" AND remote = ").push_bind(remote);
        }
        if let Some(max_rate) = filter.max_hourly_rate {
            query
                .push(" AND hourly_rate IS NOT NULL AND hourly_rate <= ")
                .push_bind(max_rate);
        }

        query.push(" ORDER BY experience_years DESC, created_at DESC");
        if filter.skip > 0 {
            query.push(" OFFSET ").push_bind(filter.skip as i64);
        }
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit as i64);
        }

        let docs: Vec<serde_json::Value> = query
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| format!("Failed to list consultants: {e}"))?;

        docs.into_iter().map(Self::rehydrate).collect()
    }
}
