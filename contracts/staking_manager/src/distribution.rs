use crate::error::ContractError;
use crate::storage::{Pool, Position};

/// Fixed-point scale for the reward-per-token accumulator. The reward rate is
/// stored pre-scaled (`amount * SCALE / duration`), which keeps the rounding
/// loss of a full period within a few base units even for small fundings.
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// Minimum time between two successful compounds of the same position.
pub const COMPOUND_COOLDOWN: u64 = 8 * 60 * 60;

/// The schedule emits nothing past `period_finish`.
pub fn applicable_time(pool: &Pool, now: u64) -> u64 {
    now.min(pool.period_finish)
}

/// Projects the accumulator to `now` without mutating the pool.
pub fn reward_per_token(pool: &Pool, now: u64) -> Result<u128, ContractError> {
    let applicable = applicable_time(pool, now);
    if pool.total_staked <= 0 || applicable <= pool.last_update_time {
        return Ok(pool.reward_per_token_stored);
    }

    let elapsed = (applicable - pool.last_update_time) as u128;
    let emitted = elapsed
        .checked_mul(pool.reward_rate)
        .ok_or(ContractError::ContractMathError)?;
    pool.reward_per_token_stored
        .checked_add(emitted / pool.total_staked as u128)
        .ok_or(ContractError::ContractMathError)
}

/// Brings the accumulator up to `now` and marks the elapsed schedule time as
/// consumed. While nobody is staked the accumulator stands still and the
/// skipped emission stays in custody, reclaimable by the operator once the
/// period is over.
///
/// Attribution adds exactly what the accumulator can pay out
/// (`delta * total_staked / SCALE`), never more than `elapsed * rate`, so
/// `owed_rewards` can not outgrow the custody balance.
pub fn update_pool(pool: &mut Pool, now: u64) -> Result<(), ContractError> {
    let updated = reward_per_token(pool, now)?;
    let delta = updated - pool.reward_per_token_stored;
    if delta > 0 {
        let attributed = delta
            .checked_mul(pool.total_staked as u128)
            .ok_or(ContractError::ContractMathError)?
            / SCALE;
        pool.owed_rewards = pool
            .owed_rewards
            .checked_add(attributed)
            .ok_or(ContractError::ContractMathError)?;
        pool.distributed_total = pool
            .distributed_total
            .checked_add(attributed)
            .ok_or(ContractError::ContractMathError)?;
        pool.reward_per_token_stored = updated;
    }
    pool.last_update_time = applicable_time(pool, now);

    Ok(())
}

/// Credits the position with everything earned since its last checkpoint and
/// moves the checkpoint to the current accumulator value. Must run after
/// `update_pool` and before any principal change.
pub fn settle_position(pool: &Pool, position: &mut Position) -> Result<(), ContractError> {
    let delta = pool.reward_per_token_stored - position.reward_per_token_paid;
    if delta > 0 && position.deposited > 0 {
        let earned = (position.deposited as u128)
            .checked_mul(delta)
            .ok_or(ContractError::ContractMathError)?
            / SCALE;
        position.accrued_reward = position
            .accrued_reward
            .checked_add(earned)
            .ok_or(ContractError::ContractMathError)?;
    }
    position.reward_per_token_paid = pool.reward_per_token_stored;

    Ok(())
}

/// Read-only projection of what a settlement at `now` would credit in total.
/// Backs the frontend view; must match what `update_pool` + `settle_position`
/// would produce.
pub fn pending_reward(pool: &Pool, position: &Position, now: u64) -> Result<u128, ContractError> {
    let updated = reward_per_token(pool, now)?;
    let delta = updated - position.reward_per_token_paid;
    let mut pending = position.accrued_reward;
    if delta > 0 && position.deposited > 0 {
        let earned = (position.deposited as u128)
            .checked_mul(delta)
            .ok_or(ContractError::ContractMathError)?
            / SCALE;
        pending = pending
            .checked_add(earned)
            .ok_or(ContractError::ContractMathError)?;
    }

    Ok(pending)
}

/// Reward the accumulator would attribute between the stored state and `now`;
/// used by the reporting queries to project lazily-stored totals.
pub fn pending_attribution(pool: &Pool, now: u64) -> Result<u128, ContractError> {
    let updated = reward_per_token(pool, now)?;
    let delta = updated - pool.reward_per_token_stored;
    if delta == 0 {
        return Ok(0);
    }
    delta
        .checked_mul(pool.total_staked as u128)
        .ok_or(ContractError::ContractMathError)
        .map(|attributed| attributed / SCALE)
}

pub fn cooldown_elapsed(position: &Position, now: u64) -> bool {
    position.last_compound_time == 0 || now - position.last_compound_time >= COMPOUND_COOLDOWN
}
