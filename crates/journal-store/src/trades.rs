use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

use journal_core::{NewTrade, Trade};

use crate::db::JournalDb;

pub struct TradeStore {
    db: JournalDb,
}

impl TradeStore {
    pub fn new(db: JournalDb) -> Self {
        Self { db }
    }

    /// Persist a new trade. The identifier and both timestamps are assigned
    /// here, never taken from the caller.
    pub async fn create_trade(&self, new: NewTrade) -> Result<Trade> {
        let now = Utc::now();
        let trade = Trade {
            id: Uuid::new_v4(),
            user_id: new.user_id.unwrap_or_else(Uuid::nil),
            brokerage_account_id: new.brokerage_account_id,
            symbol: new.symbol,
            entry_date: new.entry_date,
            exit_date: new.exit_date,
            direction: new.direction,
            entry_price: new.entry_price,
            exit_price: new.exit_price,
            size: new.size,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO trades (id, user_id, brokerage_account_id, symbol,
                                entry_date, exit_date, direction,
                                entry_price, exit_price, size, notes,
                                created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(trade.id.to_string())
        .bind(trade.user_id.to_string())
        .bind(trade.brokerage_account_id.map(|id| id.to_string()))
        .bind(&trade.symbol)
        .bind(trade.entry_date)
        .bind(trade.exit_date)
        .bind(trade.direction.as_str())
        .bind(trade.entry_price.to_string())
        .bind(trade.exit_price.to_string())
        .bind(trade.size.to_string())
        .bind(&trade.notes)
        .bind(trade.created_at)
        .bind(trade.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(trade)
    }

    /// All trades in insertion order.
    pub async fn list_trades(&self) -> Result<Vec<Trade>> {
        let rows = sqlx::query("SELECT * FROM trades ORDER BY created_at, id")
            .fetch_all(self.db.pool())
            .await?;

        rows.into_iter().map(row_to_trade).collect()
    }
}

// UUIDs and decimals live in TEXT columns, so rows are decoded by hand.
fn row_to_trade(row: SqliteRow) -> Result<Trade> {
    let direction: String = row.try_get("direction")?;
    let brokerage_account_id: Option<String> = row.try_get("brokerage_account_id")?;

    Ok(Trade {
        id: parse_uuid(row.try_get("id")?)?,
        user_id: parse_uuid(row.try_get("user_id")?)?,
        brokerage_account_id: brokerage_account_id.map(parse_uuid).transpose()?,
        symbol: row.try_get("symbol")?,
        entry_date: row.try_get("entry_date")?,
        exit_date: row.try_get("exit_date")?,
        direction: direction.parse().map_err(anyhow::Error::msg)?,
        entry_price: parse_decimal(row.try_get("entry_price")?)?,
        exit_price: parse_decimal(row.try_get("exit_price")?)?,
        size: parse_decimal(row.try_get("size")?)?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn parse_uuid(value: String) -> Result<Uuid> {
    Uuid::parse_str(&value).with_context(|| format!("invalid uuid in trades table: {}", value))
}

fn parse_decimal(value: String) -> Result<Decimal> {
    Decimal::from_str(&value).with_context(|| format!("invalid decimal in trades table: {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use journal_core::Direction;
    use rust_decimal_macros::dec;

    async fn setup_store() -> TradeStore {
        let db = JournalDb::new("sqlite::memory:").await.unwrap();
        TradeStore::new(db)
    }

    fn sample_trade(symbol: &str) -> NewTrade {
        NewTrade {
            symbol: symbol.to_string(),
            entry_date: Utc.with_ymd_and_hms(2025, 1, 2, 14, 30, 0).unwrap(),
            exit_date: Utc.with_ymd_and_hms(2025, 1, 9, 15, 0, 0).unwrap(),
            direction: Direction::Long,
            entry_price: dec!(150.25),
            exit_price: dec!(161.00),
            size: dec!(10),
            notes: Some("Earnings play".to_string()),
            user_id: None,
            brokerage_account_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_server_fields() {
        let store = setup_store().await;

        let created = store.create_trade(sample_trade("AAPL")).await.unwrap();

        assert!(!created.id.is_nil());
        assert_eq!(created.user_id, Uuid::nil());
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_create_then_list_round_trips() {
        let store = setup_store().await;

        let created = store.create_trade(sample_trade("AAPL")).await.unwrap();

        let trades = store.list_trades().await.unwrap();
        assert_eq!(trades.len(), 1);

        let stored = &trades[0];
        assert_eq!(stored.id, created.id);
        assert_eq!(stored.symbol, "AAPL");
        assert_eq!(stored.direction, Direction::Long);
        assert_eq!(stored.entry_price, dec!(150.25));
        assert_eq!(stored.exit_price, dec!(161.00));
        assert_eq!(stored.size, dec!(10));
        assert_eq!(stored.entry_date, Utc.with_ymd_and_hms(2025, 1, 2, 14, 30, 0).unwrap());
        assert_eq!(stored.notes.as_deref(), Some("Earnings play"));
        assert!(stored.brokerage_account_id.is_none());
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = setup_store().await;

        store.create_trade(sample_trade("AAPL")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        store.create_trade(sample_trade("MSFT")).await.unwrap();

        let trades = store.list_trades().await.unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].symbol, "AAPL");
        assert_eq!(trades[1].symbol, "MSFT");
    }

    #[tokio::test]
    async fn test_create_keeps_caller_supplied_links() {
        let store = setup_store().await;

        let user_id = Uuid::new_v4();
        let account_id = Uuid::new_v4();
        let mut new = sample_trade("TSLA");
        new.user_id = Some(user_id);
        new.brokerage_account_id = Some(account_id);

        store.create_trade(new).await.unwrap();

        let trades = store.list_trades().await.unwrap();
        assert_eq!(trades[0].user_id, user_id);
        assert_eq!(trades[0].brokerage_account_id, Some(account_id));
    }
}
