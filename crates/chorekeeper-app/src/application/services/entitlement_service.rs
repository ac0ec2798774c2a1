use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::application::dtos::EntitlementDto;
use chorekeeper_domain::entitlement::{
    EntitlementLedger, EntitlementLedgerRepository, DEFAULT_DAILY_QUOTA,
};
use chorekeeper_domain::events::{CreditsPurchased, EventBus, PromptConsumed};
use chorekeeper_domain::shared::DomainError;

/// Gates AI prompt requests against the entitlement ledger
///
/// Loads (or lazily initializes) the single ledger row, applies the
/// domain operation, and persists the result. `today` is the host's
/// local calendar date; the ledger applies its own midnight reset. The
/// host calls `consume_for_prompt` right before dispatching a request
/// to the AI API and `record_purchase` after its store layer verified a
/// credit purchase.
pub struct EntitlementService {
    ledger_repo: Arc<dyn EntitlementLedgerRepository>,
    event_bus: Arc<dyn EventBus>,
    daily_quota: u32,
}

impl EntitlementService {
    pub fn new(ledger_repo: Arc<dyn EntitlementLedgerRepository>, event_bus: Arc<dyn EventBus>) -> Self {
        Self::with_quota(ledger_repo, event_bus, DEFAULT_DAILY_QUOTA)
    }

    pub fn with_quota(
        ledger_repo: Arc<dyn EntitlementLedgerRepository>,
        event_bus: Arc<dyn EventBus>,
        daily_quota: u32,
    ) -> Self {
        Self {
            ledger_repo,
            event_bus,
            daily_quota,
        }
    }

    /// Current entitlement snapshot after the implicit daily reset
    pub async fn remaining(&self, today: NaiveDate) -> Result<EntitlementDto, DomainError> {
        let mut ledger = self.load_or_init(today).await?;
        let total_remaining = ledger.remaining(today);
        self.ledger_repo.save(&ledger).await?;

        Ok(Self::to_dto(&ledger, total_remaining))
    }

    /// Whether a prompt can be sent right now
    pub async fn can_consume(&self, today: NaiveDate) -> Result<bool, DomainError> {
        Ok(self.remaining(today).await?.total_remaining > 0)
    }

    /// Deduct one prompt (purchased credits first).
    ///
    /// The ledger is persisted even when the deduction fails, so a
    /// daily reset applied during the attempt is not lost.
    pub async fn consume_for_prompt(&self, today: NaiveDate) -> Result<u32, DomainError> {
        let mut ledger = self.load_or_init(today).await?;
        let outcome = ledger.consume(today);
        self.ledger_repo.save(&ledger).await?;
        let remaining = outcome?;

        debug!(remaining, "Prompt consumed");

        self.event_bus
            .publish(Box::new(PromptConsumed {
                remaining,
                occurred_at: Utc::now(),
            }))
            .await?;

        Ok(remaining)
    }

    /// Credit verified purchased prompts
    pub async fn record_purchase(
        &self,
        count: u32,
        today: NaiveDate,
    ) -> Result<EntitlementDto, DomainError> {
        let mut ledger = self.load_or_init(today).await?;
        ledger.add_purchased(count)?;
        self.ledger_repo.save(&ledger).await?;

        debug!(count, purchased_balance = ledger.purchased_balance(), "Credits purchased");

        self.event_bus
            .publish(Box::new(CreditsPurchased {
                count,
                purchased_balance: ledger.purchased_balance(),
                occurred_at: Utc::now(),
            }))
            .await?;

        let total_remaining = ledger.remaining(today);
        Ok(Self::to_dto(&ledger, total_remaining))
    }

    async fn load_or_init(&self, today: NaiveDate) -> Result<EntitlementLedger, DomainError> {
        match self.ledger_repo.find().await? {
            Some(ledger) => Ok(ledger),
            None => EntitlementLedger::new(self.daily_quota, today),
        }
    }

    fn to_dto(ledger: &EntitlementLedger, total_remaining: u32) -> EntitlementDto {
        EntitlementDto {
            daily_quota: ledger.daily_quota(),
            daily_remaining: ledger.daily_remaining(),
            purchased_balance: ledger.purchased_balance(),
            total_remaining,
        }
    }
}
