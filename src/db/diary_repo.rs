// src/db/diary_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::diary::{ProjectGroup, WorkDiaryEntry},
};

#[derive(Clone)]
pub struct DiaryRepository {
    pool: PgPool,
}

impl DiaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        entry_date: NaiveDate,
        author_id: Uuid,
        project: Option<&str>,
        content: &str,
    ) -> Result<WorkDiaryEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, WorkDiaryEntry>(
            r#"
            INSERT INTO work_diary_entries (entry_date, author_id, project, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(entry_date)
        .bind(author_id)
        .bind(project)
        .bind(content)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        entry_id: Uuid,
    ) -> Result<Option<WorkDiaryEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, WorkDiaryEntry>(
            "SELECT * FROM work_diary_entries WHERE id = $1",
        )
        .bind(entry_id)
        .fetch_optional(executor)
        .await?;
        Ok(entry)
    }

    // Filtros opcionais: período e projeto. NULL no bind desliga o filtro.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        project: Option<&str>,
    ) -> Result<Vec<WorkDiaryEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, WorkDiaryEntry>(
            r#"
            SELECT * FROM work_diary_entries
            WHERE ($1::date IS NULL OR entry_date >= $1)
              AND ($2::date IS NULL OR entry_date <= $2)
              AND ($3::text IS NULL OR project = $3)
            ORDER BY entry_date DESC, created_at DESC
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(project)
        .fetch_all(executor)
        .await?;
        Ok(entries)
    }

    pub async fn group_by_project<'e, E>(&self, executor: E) -> Result<Vec<ProjectGroup>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let groups = sqlx::query_as::<_, ProjectGroup>(
            r#"
            SELECT
                COALESCE(project, '(sem projeto)') AS project,
                COUNT(*) AS entry_count,
                MAX(entry_date) AS last_entry
            FROM work_diary_entries
            GROUP BY 1
            ORDER BY MAX(entry_date) DESC
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(groups)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        entry_id: Uuid,
        entry_date: NaiveDate,
        project: Option<&str>,
        content: &str,
    ) -> Result<Option<WorkDiaryEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, WorkDiaryEntry>(
            r#"
            UPDATE work_diary_entries
            SET entry_date = $2, project = $3, content = $4, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(entry_id)
        .bind(entry_date)
        .bind(project)
        .bind(content)
        .fetch_optional(executor)
        .await?;
        Ok(entry)
    }

    pub async fn delete<'e, E>(&self, executor: E, entry_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM work_diary_entries WHERE id = $1")
            .bind(entry_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
