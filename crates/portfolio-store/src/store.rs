use crate::models::*;
use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Bundled schema; applied on every connect, all statements idempotent.
const SCHEMA: &str = include_str!("../../../schema.sql");

const MAX_CONNECTIONS: u32 = 5;

/// Read/write access to users, holdings, price snapshots and chat history.
/// The advisory core only reads users and holdings; writes exist for the
/// snapshot collector and the chat endpoints.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating the file if needed) and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        sqlx::raw_sql(SCHEMA).execute(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn create_user(&self, username: &str, email: &str) -> Result<i64> {
        let (id,): (i64,) =
            sqlx::query_as("INSERT INTO users (username, email) VALUES (?, ?) RETURNING id")
                .bind(username)
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(id)
    }

    /// All holdings for a user
    pub async fn get_holdings(&self, user_id: i64) -> Result<Vec<Holding>> {
        let holdings = sqlx::query_as::<_, Holding>(
            "SELECT * FROM portfolios WHERE user_id = ? ORDER BY symbol",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(holdings)
    }

    /// A user's holding in one symbol, if any
    pub async fn get_holding(&self, user_id: i64, symbol: &str) -> Result<Option<Holding>> {
        let holding = sqlx::query_as::<_, Holding>(
            "SELECT * FROM portfolios WHERE user_id = ? AND symbol = ?",
        )
        .bind(user_id)
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await?;

        Ok(holding)
    }

    pub async fn add_holding(&self, holding: &Holding) -> Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO portfolios (user_id, asset_type, symbol, quantity, purchase_price)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(holding.user_id)
        .bind(&holding.asset_type)
        .bind(&holding.symbol)
        .bind(holding.quantity)
        .bind(holding.purchase_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Record a price observation
    pub async fn insert_snapshot(&self, symbol: &str, price: f64, volume: Option<f64>) -> Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO market_data (symbol, price, volume) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(symbol)
        .bind(price)
        .bind(volume)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Closing prices for a symbol, oldest first, at most `limit` points.
    /// This feeds the trend window.
    pub async fn price_history(&self, symbol: &str, limit: i64) -> Result<Vec<f64>> {
        let rows: Vec<(f64,)> = sqlx::query_as(
            r#"
            SELECT price FROM (
                SELECT price, timestamp FROM market_data
                WHERE symbol = ?
                ORDER BY timestamp DESC
                LIMIT ?
            ) ORDER BY timestamp ASC
            "#,
        )
        .bind(symbol)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(price,)| price).collect())
    }

    /// Persist one chat turn
    pub async fn record_chat(&self, user_id: i64, message: &str, response: &str) -> Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO chat_messages (user_id, message, response) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(user_id)
        .bind(message)
        .bind(response)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Most recent chat turns, newest first
    pub async fn chat_history(&self, user_id: i64, limit: i64) -> Result<Vec<ChatRecord>> {
        let records = sqlx::query_as::<_, ChatRecord>(
            "SELECT * FROM chat_messages WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_store() -> Store {
        Store::connect("sqlite::memory:").await.unwrap()
    }

    fn holding(user_id: i64, symbol: &str) -> Holding {
        Holding {
            id: None,
            user_id,
            asset_type: "stock".to_string(),
            symbol: symbol.to_string(),
            quantity: 10.0,
            purchase_price: 250.0,
        }
    }

    #[tokio::test]
    async fn test_connect_applies_schema() {
        let store = setup_store().await;

        // Schema is in place when the core tables accept queries
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    async fn test_user_roundtrip() {
        let store = setup_store().await;

        let id = store.create_user("ayse", "ayse@example.com").await.unwrap();
        let user = store.get_user(id).await.unwrap().unwrap();
        assert_eq!(user.username, "ayse");

        assert!(store.get_user(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_holdings_by_user_and_symbol() {
        let store = setup_store().await;
        let user_id = store.create_user("ayse", "ayse@example.com").await.unwrap();

        store.add_holding(&holding(user_id, "THYAO")).await.unwrap();
        store.add_holding(&holding(user_id, "BTC")).await.unwrap();

        let all = store.get_holdings(user_id).await.unwrap();
        assert_eq!(all.len(), 2);

        let one = store.get_holding(user_id, "THYAO").await.unwrap();
        assert_eq!(one.unwrap().symbol, "THYAO");

        assert!(store.get_holding(user_id, "GARAN").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_price_history_is_oldest_first_and_capped() {
        let store = setup_store().await;

        // Insert with explicit timestamps so ordering is deterministic
        for (i, price) in [10.0, 11.0, 12.0, 13.0].iter().enumerate() {
            sqlx::query("INSERT INTO market_data (symbol, price, timestamp) VALUES (?, ?, ?)")
                .bind("XYZ")
                .bind(price)
                .bind(format!("2026-08-0{} 00:00:00", i + 1))
                .execute(store.pool())
                .await
                .unwrap();
        }

        let history = store.price_history("XYZ", 3).await.unwrap();
        assert_eq!(history, vec![11.0, 12.0, 13.0]);
    }

    #[tokio::test]
    async fn test_chat_history_returns_latest_turns() {
        let store = setup_store().await;

        store.record_chat(1, "merhaba", "Merhaba!").await.unwrap();
        store.record_chat(1, "THYAO analiz", "Trend: UP").await.unwrap();
        store.record_chat(2, "selam", "Selam!").await.unwrap();

        let history = store.chat_history(1, 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].message, "THYAO analiz");

        let capped = store.chat_history(1, 1).await.unwrap();
        assert_eq!(capped.len(), 1);
    }
}
