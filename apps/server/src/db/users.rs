//! User account storage for the auth layer.

use sqlx::{postgres::PgRow, PgPool, Row};

use crate::models::User;
use crate::Result;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

fn decode_user(row: &PgRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id").map_err(crate::Error::Database)?,
        email: row.try_get("email").map_err(crate::Error::Database)?,
        password_hash: row
            .try_get("password_hash")
            .map_err(crate::Error::Database)?,
        google_id: row.try_get("google_id").map_err(crate::Error::Database)?,
        created_at: row.try_get("created_at").map_err(crate::Error::Database)?,
    })
}

const USER_COLUMNS: &str = "id, email, password_hash, google_id, created_at";

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::Error::Database)?
        .ok_or_else(|| crate::Error::NotFound(format!("user {email}")))?;
        decode_user(&row)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(crate::Error::Database)?
            .ok_or_else(|| crate::Error::NotFound(format!("user {id}")))?;
        decode_user(&row)
    }

    pub async fn get_by_google_id(&self, google_id: &str) -> Result<User> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE google_id = $1"
        ))
        .bind(google_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::Error::Database)?
        .ok_or_else(|| crate::Error::NotFound("google account".to_string()))?;
        decode_user(&row)
    }

    pub async fn set_google_id(&self, user_id: i64, google_id: &str) -> Result<()> {
        let result = sqlx::query("UPDATE users SET google_id = $1 WHERE id = $2")
            .bind(google_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(crate::Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(crate::Error::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }

    pub async fn create_oauth_user(&self, email: &str, google_id: &str) -> Result<i64> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO users(email, google_id) VALUES ($1, $2) RETURNING id")
                .bind(email)
                .bind(google_id)
                .fetch_one(&self.pool)
                .await
                .map_err(crate::Error::Database)?;
        Ok(id)
    }
}
