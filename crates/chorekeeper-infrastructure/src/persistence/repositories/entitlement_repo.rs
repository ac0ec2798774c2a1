use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use crate::persistence::SqliteRepositoryBase;
use chorekeeper_domain::entitlement::{EntitlementLedger, EntitlementLedgerRepository};
use chorekeeper_domain::shared::DomainError;

// One ledger per install, stored under a fixed row id.
const LEDGER_ROW_ID: i64 = 1;

#[derive(FromRow)]
struct EntitlementLedgerRow {
    daily_quota: u32,
    daily_remaining: u32,
    purchased_balance: u32,
    last_reset_date: NaiveDate,
}

impl EntitlementLedgerRow {
    fn into_ledger(self) -> Result<EntitlementLedger, DomainError> {
        EntitlementLedger::restore(
            self.daily_quota,
            self.daily_remaining,
            self.purchased_balance,
            self.last_reset_date,
        )
    }
}

pub struct SqliteEntitlementLedgerRepository {
    base: SqliteRepositoryBase,
}

impl SqliteEntitlementLedgerRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl EntitlementLedgerRepository for SqliteEntitlementLedgerRepository {
    async fn save(&self, ledger: &EntitlementLedger) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO entitlement_ledger (id, daily_quota, daily_remaining, purchased_balance, last_reset_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                daily_quota = ?2,
                daily_remaining = ?3,
                purchased_balance = ?4,
                last_reset_date = ?5
        "#;

        self.base
            .execute(
                sqlx::query(query)
                    .bind(LEDGER_ROW_ID)
                    .bind(ledger.daily_quota())
                    .bind(ledger.daily_remaining())
                    .bind(ledger.purchased_balance())
                    .bind(ledger.last_reset_date()),
                "Save entitlement ledger",
            )
            .await?;

        Ok(())
    }

    async fn find(&self) -> Result<Option<EntitlementLedger>, DomainError> {
        let query = "SELECT daily_quota, daily_remaining, purchased_balance, last_reset_date FROM entitlement_ledger WHERE id = ?1";

        let row: Option<EntitlementLedgerRow> = self
            .base
            .fetch_optional(
                sqlx::query_as(query).bind(LEDGER_ROW_ID),
                "Find entitlement ledger",
            )
            .await?;

        row.map(|r| r.into_ledger()).transpose()
    }
}
