mod repository;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::DomainError;

pub use repository::EntitlementLedgerRepository;

/// Free prompts granted per calendar day.
pub const DEFAULT_DAILY_QUOTA: u32 = 15;

/// Prompt entitlement ledger
///
/// Combines the daily free quota with a purchased-credit balance.
/// Purchased credits are consumed first; the daily quota resets on the
/// first operation of a new calendar day (date equality in the host's
/// local zone, never elapsed hours). Single-writer: the host serializes
/// access and persists the ledger after mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementLedger {
    daily_quota: u32,
    daily_remaining: u32,
    purchased_balance: u32,
    last_reset_date: NaiveDate,
}

impl EntitlementLedger {
    /// Create a fresh ledger with a full daily quota
    pub fn new(daily_quota: u32, today: NaiveDate) -> Result<Self, DomainError> {
        if daily_quota == 0 {
            return Err(DomainError::InvalidInput(
                "Daily quota must be positive".to_string(),
            ));
        }

        Ok(Self {
            daily_quota,
            daily_remaining: daily_quota,
            purchased_balance: 0,
            last_reset_date: today,
        })
    }

    /// Restore a ledger from persistence
    pub fn restore(
        daily_quota: u32,
        daily_remaining: u32,
        purchased_balance: u32,
        last_reset_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        if daily_remaining > daily_quota {
            return Err(DomainError::DataIntegrity(format!(
                "Daily remaining {} exceeds quota {}",
                daily_remaining, daily_quota
            )));
        }

        Ok(Self {
            daily_quota,
            daily_remaining,
            purchased_balance,
            last_reset_date,
        })
    }

    /// Refill the daily quota when `today` is a new calendar date.
    ///
    /// Idempotent within a day; calling it repeatedly after midnight
    /// does not grant extra prompts.
    pub fn reset_daily(&mut self, today: NaiveDate) {
        if today != self.last_reset_date {
            self.daily_remaining = self.daily_quota;
            self.last_reset_date = today;
        }
    }

    /// Total prompts available today (after an implicit daily reset)
    pub fn remaining(&mut self, today: NaiveDate) -> u32 {
        self.reset_daily(today);
        self.daily_remaining + self.purchased_balance
    }

    /// Whether at least one prompt can be consumed today
    pub fn can_consume(&mut self, today: NaiveDate) -> bool {
        self.remaining(today) > 0
    }

    /// Consume one prompt, purchased credits first.
    ///
    /// Returns the remaining total after the deduction.
    pub fn consume(&mut self, today: NaiveDate) -> Result<u32, DomainError> {
        self.reset_daily(today);

        if self.purchased_balance > 0 {
            self.purchased_balance -= 1;
        } else if self.daily_remaining > 0 {
            self.daily_remaining -= 1;
        } else {
            return Err(DomainError::InsufficientBalance(
                "No free prompts or purchased credits left today".to_string(),
            ));
        }

        Ok(self.daily_remaining + self.purchased_balance)
    }

    /// Credit purchased prompts after the host verified the transaction
    pub fn add_purchased(&mut self, count: u32) -> Result<(), DomainError> {
        if count == 0 {
            return Err(DomainError::InvalidInput(
                "Purchased credit count must be positive".to_string(),
            ));
        }

        self.purchased_balance += count;
        Ok(())
    }

    // Getters
    pub fn daily_quota(&self) -> u32 {
        self.daily_quota
    }

    pub fn daily_remaining(&self) -> u32 {
        self.daily_remaining
    }

    pub fn purchased_balance(&self) -> u32 {
        self.purchased_balance
    }

    pub fn last_reset_date(&self) -> NaiveDate {
        self.last_reset_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_ledger() -> EntitlementLedger {
        EntitlementLedger::new(DEFAULT_DAILY_QUOTA, date(2025, 3, 10)).unwrap()
    }

    #[test]
    fn test_fresh_ledger_has_full_quota() {
        let mut ledger = create_test_ledger();
        assert_eq!(ledger.remaining(date(2025, 3, 10)), 15);
        assert_eq!(ledger.purchased_balance(), 0);
    }

    #[test]
    fn test_zero_quota_rejected() {
        let result = EntitlementLedger::new(0, date(2025, 3, 10));
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_quota_exhaustion() {
        let mut ledger = create_test_ledger();
        let today = date(2025, 3, 10);

        for expected_remaining in (0..15).rev() {
            let remaining = ledger.consume(today).unwrap();
            assert_eq!(remaining, expected_remaining);
        }

        let result = ledger.consume(today);
        assert!(matches!(result, Err(DomainError::InsufficientBalance(_))));
        assert!(!ledger.can_consume(today));
    }

    #[test]
    fn test_purchased_credits_consumed_first() {
        let mut ledger = create_test_ledger();
        let today = date(2025, 3, 10);

        ledger.add_purchased(30).unwrap();
        assert_eq!(ledger.remaining(today), 45);

        ledger.consume(today).unwrap();

        assert_eq!(ledger.purchased_balance(), 29);
        assert_eq!(ledger.daily_remaining(), 15);
    }

    #[test]
    fn test_add_purchased_rejects_zero() {
        let mut ledger = create_test_ledger();
        let result = ledger.add_purchased(0);
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        assert_eq!(ledger.purchased_balance(), 0);
    }

    #[test]
    fn test_new_calendar_day_refills_quota() {
        let mut ledger = create_test_ledger();
        let today = date(2025, 3, 10);
        let tomorrow = date(2025, 3, 11);

        for _ in 0..12 {
            ledger.consume(today).unwrap();
        }
        assert_eq!(ledger.remaining(today), 3);

        // Crossing local midnight refills the free quota even if fewer
        // than 24 hours elapsed.
        assert_eq!(ledger.remaining(tomorrow), 15);
        assert_eq!(ledger.last_reset_date(), tomorrow);
    }

    #[test]
    fn test_reset_is_idempotent_within_a_day() {
        let mut ledger = create_test_ledger();
        let tomorrow = date(2025, 3, 11);

        ledger.remaining(tomorrow);
        ledger.consume(tomorrow).unwrap();

        // Two evaluations over 30 hours apart but on the same calendar
        // date must not refill again.
        ledger.reset_daily(tomorrow);
        assert_eq!(ledger.remaining(tomorrow), 14);
    }

    #[test]
    fn test_reset_preserves_purchased_balance() {
        let mut ledger = create_test_ledger();
        ledger.add_purchased(5).unwrap();

        assert_eq!(ledger.remaining(date(2025, 3, 11)), 20);
        assert_eq!(ledger.purchased_balance(), 5);
    }

    #[test]
    fn test_daily_remaining_never_exceeds_quota() {
        let mut ledger = create_test_ledger();

        for day in 11..20 {
            ledger.reset_daily(date(2025, 3, day));
            assert!(ledger.daily_remaining() <= ledger.daily_quota());
        }
    }

    #[test]
    fn test_restore_rejects_inconsistent_state() {
        let result = EntitlementLedger::restore(15, 16, 0, date(2025, 3, 10));
        assert!(matches!(result, Err(DomainError::DataIntegrity(_))));
    }

    #[test]
    fn test_restore_round_trip() {
        let ledger = EntitlementLedger::restore(15, 3, 7, date(2025, 3, 10)).unwrap();
        assert_eq!(ledger.daily_remaining(), 3);
        assert_eq!(ledger.purchased_balance(), 7);
        assert_eq!(ledger.last_reset_date(), date(2025, 3, 10));
    }
}
