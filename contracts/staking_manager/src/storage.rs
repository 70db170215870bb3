use solstice::ttl::{PERSISTENT_RENEWAL_THRESHOLD, PERSISTENT_TARGET_TTL};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::error::ContractError;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Token users deposit as principal
    pub staking_token: Address,
    /// Token the pool emits as rewards
    pub reward_token: Address,
    /// Deposits below this amount are rejected
    pub min_deposit: i128,
    /// Reward fundings below this amount are rejected
    pub min_reward: i128,
}
const CONFIG: Symbol = symbol_short!("CONFIG");

pub fn get_config(env: &Env) -> Result<Config, ContractError> {
    let config = env
        .storage()
        .persistent()
        .get(&CONFIG)
        .ok_or(ContractError::ConfigNotSet)?;
    env.storage().persistent().extend_ttl(
        &CONFIG,
        PERSISTENT_RENEWAL_THRESHOLD,
        PERSISTENT_TARGET_TTL,
    );

    Ok(config)
}

pub fn save_config(env: &Env, config: Config) {
    env.storage().persistent().set(&CONFIG, &config);
    env.storage().persistent().extend_ttl(
        &CONFIG,
        PERSISTENT_RENEWAL_THRESHOLD,
        PERSISTENT_TARGET_TTL,
    );
}

/// Singleton ledger shared by every position.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct Pool {
    /// Sum of `deposited` over all positions
    pub total_staked: i128,
    /// Reward units emitted per second, pre-scaled by `SCALE`
    pub reward_rate: u128,
    /// Timestamp after which the current schedule emits nothing
    pub period_finish: u64,
    /// Timestamp of the last accumulator refresh
    pub last_update_time: u64,
    /// Cumulative reward per staked unit, scaled by `SCALE`; never decreases
    pub reward_per_token_stored: u128,
    /// Reward attributed to stakers and not yet harvested, compounded or paid
    /// out. The operator can only reclaim custody in excess of this.
    pub owed_rewards: u128,
    /// Lifetime reward attributed to stakers, for reporting
    pub distributed_total: u128,
}
const POOL: Symbol = symbol_short!("POOL");

pub fn get_pool(env: &Env) -> Result<Pool, ContractError> {
    let pool = env
        .storage()
        .persistent()
        .get(&POOL)
        .ok_or(ContractError::PoolNotInitialized)?;
    env.storage()
        .persistent()
        .extend_ttl(&POOL, PERSISTENT_RENEWAL_THRESHOLD, PERSISTENT_TARGET_TTL);

    Ok(pool)
}

pub fn save_pool(env: &Env, pool: &Pool) {
    env.storage().persistent().set(&POOL, pool);
    env.storage()
        .persistent()
        .extend_ttl(&POOL, PERSISTENT_RENEWAL_THRESHOLD, PERSISTENT_TARGET_TTL);
}

#[contracttype]
#[derive(Clone)]
pub enum PoolDataKey {
    Position(Address),
}

/// Per-user ledger entry. Created lazily on first deposit and never removed;
/// a fully withdrawn position keeps its lifetime `auto_compounded` total.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct Position {
    /// Principal currently staked
    pub deposited: i128,
    /// Accumulator snapshot from the last settlement of this position
    pub reward_per_token_paid: u128,
    /// Reward earned but not yet compounded or harvested
    pub accrued_reward: u128,
    /// Lifetime reward converted into principal or paid out
    pub auto_compounded: u128,
    /// Timestamp of the last successful compound; 0 before the first one
    pub last_compound_time: u64,
}

pub fn get_position(env: &Env, key: &Address) -> Position {
    let storage_key = PoolDataKey::Position(key.clone());
    let position = env
        .storage()
        .persistent()
        .get(&storage_key)
        .unwrap_or_default();
    env.storage().persistent().has(&storage_key).then(|| {
        env.storage().persistent().extend_ttl(
            &storage_key,
            PERSISTENT_RENEWAL_THRESHOLD,
            PERSISTENT_TARGET_TTL,
        );
    });

    position
}

pub fn save_position(env: &Env, key: &Address, position: &Position) {
    let storage_key = PoolDataKey::Position(key.clone());
    env.storage().persistent().set(&storage_key, position);
    env.storage().persistent().extend_ttl(
        &storage_key,
        PERSISTENT_RENEWAL_THRESHOLD,
        PERSISTENT_TARGET_TTL,
    );
}

pub mod utils {
    use super::*;

    use soroban_sdk::{ConversionError, TryFromVal, Val};

    #[derive(Clone, Copy)]
    #[repr(u32)]
    pub enum DataKey {
        Initialized = 0,
        Admin = 1,
    }

    impl TryFromVal<Env, DataKey> for Val {
        type Error = ConversionError;

        fn try_from_val(_env: &Env, v: &DataKey) -> Result<Self, Self::Error> {
            Ok((*v as u32).into())
        }
    }

    pub fn is_initialized(e: &Env) -> bool {
        e.storage()
            .persistent()
            .get(&DataKey::Initialized)
            .unwrap_or(false)
    }

    pub fn set_initialized(e: &Env) {
        e.storage().persistent().set(&DataKey::Initialized, &true);
        e.storage().persistent().extend_ttl(
            &DataKey::Initialized,
            PERSISTENT_RENEWAL_THRESHOLD,
            PERSISTENT_TARGET_TTL,
        );
    }

    pub fn save_admin(e: &Env, address: &Address) {
        e.storage().persistent().set(&DataKey::Admin, address);
        e.storage().persistent().extend_ttl(
            &DataKey::Admin,
            PERSISTENT_RENEWAL_THRESHOLD,
            PERSISTENT_TARGET_TTL,
        );
    }

    pub fn get_admin(e: &Env) -> Result<Address, ContractError> {
        let admin = e
            .storage()
            .persistent()
            .get(&DataKey::Admin)
            .ok_or(ContractError::AdminNotSet)?;
        e.storage().persistent().extend_ttl(
            &DataKey::Admin,
            PERSISTENT_RENEWAL_THRESHOLD,
            PERSISTENT_TARGET_TTL,
        );

        Ok(admin)
    }
}
