use async_trait::async_trait;

use super::EntitlementLedger;
use crate::shared::DomainError;

#[async_trait]
pub trait EntitlementLedgerRepository: Send + Sync {
    /// Save (upsert) the ledger snapshot. One ledger per install.
    async fn save(&self, ledger: &EntitlementLedger) -> Result<(), DomainError>;

    /// Load the ledger snapshot, if one was ever persisted.
    async fn find(&self) -> Result<Option<EntitlementLedger>, DomainError>;
}
