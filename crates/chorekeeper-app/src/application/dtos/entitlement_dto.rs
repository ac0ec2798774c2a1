use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitlementDto {
    pub daily_quota: u32,
    pub daily_remaining: u32,
    pub purchased_balance: u32,
    pub total_remaining: u32,
}
