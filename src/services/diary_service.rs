// src/services/diary_service.rs

use chrono::NaiveDate;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{validation_error, AppError},
    db::DiaryRepository,
    models::{
        auth::{Role, User},
        diary::{ProjectGroup, WorkDiaryEntry},
    },
};

/// Registro do diário: só o autor ou um administrador mexe.
pub fn can_touch_entry(entry_author: Uuid, user: &User) -> bool {
    entry_author == user.id || user.role.allows(Role::Administrator)
}

fn validate_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() {
        return Err(validation_error(
            "content",
            "required",
            "O texto do registro é obrigatório.",
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct DiaryService {
    diary_repo: DiaryRepository,
}

impl DiaryService {
    pub fn new(diary_repo: DiaryRepository) -> Self {
        Self { diary_repo }
    }

    pub async fn create_entry<'e, E>(
        &self,
        executor: E,
        entry_date: NaiveDate,
        author: &User,
        project: Option<&str>,
        content: &str,
    ) -> Result<WorkDiaryEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        validate_content(content)?;
        self.diary_repo
            .insert(executor, entry_date, author.id, project, content)
            .await
    }

    pub async fn list_entries<'e, E>(
        &self,
        executor: E,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        project: Option<&str>,
    ) -> Result<Vec<WorkDiaryEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.diary_repo.list(executor, from, to, project).await
    }

    pub async fn project_groups<'e, E>(&self, executor: E) -> Result<Vec<ProjectGroup>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.diary_repo.group_by_project(executor).await
    }

    pub async fn update_entry<'e, E>(
        &self,
        executor: E,
        entry_id: Uuid,
        user: &User,
        entry_date: NaiveDate,
        project: Option<&str>,
        content: &str,
    ) -> Result<WorkDiaryEntry, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        validate_content(content)?;

        let mut tx = executor.begin().await?;

        let entry = self
            .diary_repo
            .find_by_id(&mut *tx, entry_id)
            .await?
            .ok_or(AppError::EntryNotFound)?;

        if !can_touch_entry(entry.author_id, user) {
            return Err(AppError::Forbidden("diary:edit"));
        }

        let updated = self
            .diary_repo
            .update(&mut *tx, entry_id, entry_date, project, content)
            .await?
            .ok_or(AppError::EntryNotFound)?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete_entry<'e, E>(
        &self,
        executor: E,
        entry_id: Uuid,
        user: &User,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let entry = self
            .diary_repo
            .find_by_id(&mut *tx, entry_id)
            .await?
            .ok_or(AppError::EntryNotFound)?;

        if !can_touch_entry(entry.author_id, user) {
            return Err(AppError::Forbidden("diary:delete"));
        }

        self.diary_repo.delete(&mut *tx, entry_id).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_role(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "alguem@example.com".into(),
            password_hash: String::new(),
            display_name: "Alguém".into(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn the_author_can_touch_their_own_entry() {
        let user = user_with_role(Role::Level1);
        assert!(can_touch_entry(user.id, &user));
    }

    #[test]
    fn someone_else_cannot_unless_administrator() {
        let author = Uuid::new_v4();
        let outsider = user_with_role(Role::Level5);
        assert!(!can_touch_entry(author, &outsider));

        let admin = user_with_role(Role::Administrator);
        assert!(can_touch_entry(author, &admin));
    }
}
