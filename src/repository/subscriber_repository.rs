use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::Subscriber,
    error::{AppError, Result},
    repository::{SubscriberRepository, SubscriberSource},
};

#[derive(FromRow)]
struct SubscriberRow {
    email: String,
    subscribed: i32,
    created_at: NaiveDateTime,
}

pub struct SqliteSubscriberRepository {
    pool: SqlitePool,
}

impl SqliteSubscriberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberSource for SqliteSubscriberRepository {
    async fn list_subscribed(&self) -> Result<Vec<String>> {
        let emails = sqlx::query_scalar::<_, String>(
            "SELECT email FROM email_subscribers WHERE subscribed = 1 ORDER BY rowid"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(emails)
    }
}

#[async_trait]
impl SubscriberRepository for SqliteSubscriberRepository {
    async fn subscribe(&self, email: &str) -> Result<Subscriber> {
        sqlx::query(
            r#"
            INSERT INTO email_subscribers (email, subscribed, created_at)
            VALUES (?, 1, ?)
            ON CONFLICT(email) DO UPDATE SET subscribed = 1
            "#
        )
        .bind(email)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;

        let row = sqlx::query_as::<_, SubscriberRow>(
            "SELECT email, subscribed, created_at FROM email_subscribers WHERE email = ?"
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(Subscriber {
            email: row.email,
            subscribed: row.subscribed != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }

    async fn unsubscribe(&self, email: &str) -> Result<()> {
        let result = sqlx::query("UPDATE email_subscribers SET subscribed = 0 WHERE email = ?")
            .bind(email)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Subscriber not found".to_string()));
        }

        Ok(())
    }
}
