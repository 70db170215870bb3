use soroban_sdk::contracttype;

use crate::storage::{Config, Pool};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigResponse {
    pub config: Config,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolResponse {
    pub pool: Pool,
}

/// Snapshot of a single position as the frontend consumes it. `pending_reward`
/// is projected to the current ledger timestamp without touching storage.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionResponse {
    pub deposited: i128,
    pub pending_reward: u128,
    pub auto_compounded: u128,
    pub last_compound_time: u64,
}
