use sqlx::SqlitePool;

use super::dto::UserPayload;
use super::repo_types::User;

impl User {
    /// Exact-match credential lookup; username uniqueness caps this at one
    /// row, so the first match is the only match.
    pub async fn find_by_credentials(
        db: &SqlitePool,
        username: &str,
        password: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, email, birthDate, fullName
            FROM users
            WHERE username = ? AND password = ?
            "#,
        )
        .bind(username)
        .bind(password)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Every row in the engine's natural order; projection is the caller's
    /// business.
    pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, email, birthDate, fullName
            FROM users
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn exists_by_username_or_email(
        db: &SqlitePool,
        username: &str,
        email: &str,
    ) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? OR email = ?)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(db)
        .await?;
        Ok(exists)
    }

    /// The unique constraints stay the final authority over any pre-check; a
    /// lost race surfaces here as a constraint violation.
    pub async fn insert(db: &SqlitePool, user: &UserPayload) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO users (username, password, email, birthDate, fullName) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.email)
        .bind(&user.birth_date)
        .bind(&user.full_name)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn exists_by_id(db: &SqlitePool, id: i64) -> anyhow::Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
                .bind(id)
                .fetch_one(db)
                .await?;
        Ok(exists)
    }

    /// True when `email` belongs to a row other than `id`.
    pub async fn email_taken_by_another(
        db: &SqlitePool,
        email: &str,
        id: i64,
    ) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? AND id != ?)",
        )
        .bind(email)
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(exists)
    }

    /// Overwrites everything but the username, which never changes once
    /// registered.
    pub async fn update(db: &SqlitePool, id: i64, user: &UserPayload) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users SET email = ?, birthDate = ?, fullName = ?, password = ? WHERE id = ?",
        )
        .bind(&user.email)
        .bind(&user.birth_date)
        .bind(&user.full_name)
        .bind(&user.password)
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Deletes zero or one row; an absent id is not an error.
    pub async fn delete_by_id(db: &SqlitePool, id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

/// Whether `err` is the store rejecting a duplicate on a unique column.
/// Lets handlers degrade a lost check-then-write race into a conflict
/// response instead of a 500.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|db| matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation))
        .unwrap_or(false)
}
