use soroban_sdk::{contract, contractimpl, contractmeta, log, token, Address, BytesN, Env};

use solstice::validate_int_parameters;

use crate::{
    distribution::{
        cooldown_elapsed, pending_attribution, pending_reward, settle_position, update_pool, SCALE,
    },
    error::ContractError,
    msg::{ConfigResponse, PoolResponse, PositionResponse},
    storage::{
        get_config, get_pool, get_position, save_config, save_pool, save_position,
        utils::{self, get_admin},
        Config, Pool, Position,
    },
};

// Metadata that is added on to the WASM custom section
contractmeta!(
    key = "Description",
    val = "Solstice time-based staking with auto-compounding rewards"
);

#[contract]
pub struct StakingManager;

pub trait StakingManagerTrait {
    // Sets the token contract addresses and deposit/funding thresholds for this pool
    fn initialize(
        env: Env,
        admin: Address,
        staking_token: Address,
        reward_token: Address,
        min_deposit: i128,
        min_reward: i128,
    ) -> Result<(), ContractError>;

    fn fund_reward_period(
        env: Env,
        sender: Address,
        amount: i128,
        duration: u64,
    ) -> Result<(), ContractError>;

    fn withdraw_remaining_reward(env: Env, sender: Address) -> Result<(), ContractError>;

    fn deposit(env: Env, sender: Address, amount: i128) -> Result<(), ContractError>;

    fn withdraw(env: Env, sender: Address, amount: i128) -> Result<(), ContractError>;

    fn withdraw_all(env: Env, sender: Address) -> Result<(), ContractError>;

    fn auto_compound(env: Env, sender: Address) -> Result<(), ContractError>;

    fn harvest_reward(env: Env, sender: Address) -> Result<(), ContractError>;

    // QUERIES

    fn query_config(env: Env) -> Result<ConfigResponse, ContractError>;

    fn query_admin(env: Env) -> Result<Address, ContractError>;

    fn query_pool(env: Env) -> Result<PoolResponse, ContractError>;

    fn query_total_staked(env: Env) -> Result<i128, ContractError>;

    fn query_position(env: Env, address: Address) -> Result<PositionResponse, ContractError>;

    fn query_pending_reward(env: Env, address: Address) -> Result<u128, ContractError>;

    fn query_distributed_reward(env: Env) -> Result<u128, ContractError>;

    fn query_undistributed_reward(env: Env) -> Result<i128, ContractError>;
}

#[contractimpl]
impl StakingManagerTrait for StakingManager {
    fn initialize(
        env: Env,
        admin: Address,
        staking_token: Address,
        reward_token: Address,
        min_deposit: i128,
        min_reward: i128,
    ) -> Result<(), ContractError> {
        if utils::is_initialized(&env) {
            log!(
                &env,
                "Staking manager: Initialize: initializing contract twice is not allowed"
            );
            return Err(ContractError::AlreadyInitialized);
        }
        if min_deposit <= 0 {
            log!(&env, "Staking manager: Initialize: min_deposit must be bigger then 0!");
            return Err(ContractError::InvalidMinDeposit);
        }
        if min_reward <= 0 {
            log!(&env, "Staking manager: Initialize: min_reward must be bigger then 0!");
            return Err(ContractError::InvalidMinReward);
        }

        utils::set_initialized(&env);

        let config = Config {
            staking_token: staking_token.clone(),
            reward_token,
            min_deposit,
            min_reward,
        };
        save_config(&env, config);
        save_pool(&env, &Pool::default());

        utils::save_admin(&env, &admin);

        env.events()
            .publish(("initialize", "staking manager"), &staking_token);

        Ok(())
    }

    fn fund_reward_period(
        env: Env,
        sender: Address,
        amount: i128,
        duration: u64,
    ) -> Result<(), ContractError> {
        sender.require_auth();
        require_admin(&env, &sender)?;
        validate_int_parameters!(amount);

        let config = get_config(&env)?;
        if amount < config.min_reward {
            log!(
                &env,
                "Staking manager: Fund reward period: minimum reward amount not reached"
            );
            return Err(ContractError::MinRewardNotReached);
        }
        if duration == 0 {
            log!(
                &env,
                "Staking manager: Fund reward period: reward period duration must be bigger then 0!"
            );
            return Err(ContractError::InvalidDuration);
        }

        let now = env.ledger().timestamp();
        let mut pool = get_pool(&env)?;
        if now < pool.period_finish {
            log!(
                &env,
                "Staking manager: Fund reward period: previous reward period has not finished yet"
            );
            return Err(ContractError::RewardPeriodActive);
        }

        // settle the residual window under the old rate before the schedule
        // fields are overwritten
        update_pool(&mut pool, now)?;

        let reward_token_client = token::Client::new(&env, &config.reward_token);
        reward_token_client.transfer(&sender, &env.current_contract_address(), &amount);

        pool.reward_rate = (amount as u128)
            .checked_mul(SCALE)
            .ok_or(ContractError::ContractMathError)?
            / duration as u128;
        pool.period_finish = now + duration;
        pool.last_update_time = now;
        save_pool(&env, &pool);

        env.events().publish(("fund_reward_period", "amount"), amount);
        env.events()
            .publish(("fund_reward_period", "duration"), duration);

        Ok(())
    }

    fn withdraw_remaining_reward(env: Env, sender: Address) -> Result<(), ContractError> {
        sender.require_auth();
        require_admin(&env, &sender)?;

        let config = get_config(&env)?;
        let now = env.ledger().timestamp();
        let mut pool = get_pool(&env)?;
        if now < pool.period_finish {
            log!(
                &env,
                "Staking manager: Withdraw remaining reward: reward period is still active"
            );
            return Err(ContractError::RewardPeriodNotFinished);
        }

        // settle attribution through period_finish so owed_rewards is exact
        update_pool(&mut pool, now)?;
        save_pool(&env, &pool);

        let reward_token_client = token::Client::new(&env, &config.reward_token);
        let custody = reward_token_client.balance(&env.current_contract_address());

        // everything still owed to stakers stays behind; when both assets
        // share one address the staked principal lives in the same custody
        let mut reserved = pool.owed_rewards as i128;
        if config.reward_token == config.staking_token {
            reserved += pool.total_staked;
        }

        let leftover = custody - reserved;
        if leftover > 0 {
            reward_token_client.transfer(&env.current_contract_address(), &sender, &leftover);
        }

        env.events()
            .publish(("withdraw_remaining_reward", "amount"), leftover.max(0));

        Ok(())
    }

    fn deposit(env: Env, sender: Address, amount: i128) -> Result<(), ContractError> {
        sender.require_auth();
        validate_int_parameters!(amount);

        let config = get_config(&env)?;
        if amount < config.min_deposit {
            log!(
                &env,
                "Staking manager: Deposit: trying to deposit {} which is less then minimum {} required!",
                amount,
                config.min_deposit
            );
            return Err(ContractError::DepositBelowMinimum);
        }

        let (mut pool, mut position) = sync(&env, &sender)?;

        let staking_token_client = token::Client::new(&env, &config.staking_token);
        staking_token_client.transfer(&sender, &env.current_contract_address(), &amount);

        position.deposited += amount;
        pool.total_staked += amount;

        save_position(&env, &sender, &position);
        save_pool(&env, &pool);

        env.events().publish(("deposit", "user"), &sender);
        env.events().publish(("deposit", "amount"), amount);

        Ok(())
    }

    fn withdraw(env: Env, sender: Address, amount: i128) -> Result<(), ContractError> {
        sender.require_auth();
        validate_int_parameters!(amount);

        let config = get_config(&env)?;
        let (mut pool, mut position) = sync(&env, &sender)?;

        if amount > position.deposited {
            log!(
                &env,
                "Staking manager: Withdraw: trying to withdraw {} with only {} deposited!",
                amount,
                position.deposited
            );
            return Err(ContractError::WithdrawOverDeposited);
        }

        position.deposited -= amount;
        pool.total_staked -= amount;

        let staking_token_client = token::Client::new(&env, &config.staking_token);
        staking_token_client.transfer(&env.current_contract_address(), &sender, &amount);

        save_position(&env, &sender, &position);
        save_pool(&env, &pool);

        env.events().publish(("withdraw", "user"), &sender);
        env.events().publish(("withdraw", "amount"), amount);

        Ok(())
    }

    fn withdraw_all(env: Env, sender: Address) -> Result<(), ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        let (mut pool, mut position) = sync(&env, &sender)?;

        let principal = position.deposited;
        if principal > 0 {
            position.deposited = 0;
            pool.total_staked -= principal;

            let staking_token_client = token::Client::new(&env, &config.staking_token);
            staking_token_client.transfer(&env.current_contract_address(), &sender, &principal);
        }

        let reward = position.accrued_reward;
        if reward > 0 {
            pay_reward(&env, &config, &mut pool, &mut position, &sender, reward)?;
        }

        save_position(&env, &sender, &position);
        save_pool(&env, &pool);

        env.events().publish(("withdraw_all", "user"), &sender);
        env.events().publish(("withdraw_all", "amount"), principal);

        Ok(())
    }

    fn auto_compound(env: Env, sender: Address) -> Result<(), ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        if config.staking_token != config.reward_token {
            log!(
                &env,
                "Staking manager: Auto compound: staking and reward assets differ, compounding is not available"
            );
            return Err(ContractError::CompoundingNotSupported);
        }

        let now = env.ledger().timestamp();
        let (mut pool, mut position) = sync(&env, &sender)?;

        if !cooldown_elapsed(&position, now) {
            log!(
                &env,
                "Staking manager: Auto compound: compound cooldown has not elapsed yet"
            );
            return Err(ContractError::CooldownNotElapsed);
        }

        let reward = position.accrued_reward;
        if reward > 0 {
            // the accrued reward tokens already sit in custody; they simply
            // switch from reward obligation to staked principal
            position.accrued_reward = 0;
            position.deposited += reward as i128;
            position.auto_compounded = position
                .auto_compounded
                .checked_add(reward)
                .ok_or(ContractError::ContractMathError)?;
            pool.total_staked += reward as i128;
            pool.owed_rewards = pool
                .owed_rewards
                .checked_sub(reward)
                .ok_or(ContractError::ContractMathError)?;
        }
        // a zero-reward compound still restarts the cooldown window
        position.last_compound_time = now;

        save_position(&env, &sender, &position);
        save_pool(&env, &pool);

        env.events().publish(("auto_compound", "user"), &sender);
        env.events().publish(("auto_compound", "amount"), reward);

        Ok(())
    }

    fn harvest_reward(env: Env, sender: Address) -> Result<(), ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        let (mut pool, mut position) = sync(&env, &sender)?;

        let reward = position.accrued_reward;
        if reward == 0 {
            return Ok(());
        }

        pay_reward(&env, &config, &mut pool, &mut position, &sender, reward)?;

        save_position(&env, &sender, &position);
        save_pool(&env, &pool);

        env.events().publish(("harvest_reward", "user"), &sender);
        env.events().publish(("harvest_reward", "amount"), reward);

        Ok(())
    }

    // QUERIES

    fn query_config(env: Env) -> Result<ConfigResponse, ContractError> {
        Ok(ConfigResponse {
            config: get_config(&env)?,
        })
    }

    fn query_admin(env: Env) -> Result<Address, ContractError> {
        get_admin(&env)
    }

    fn query_pool(env: Env) -> Result<PoolResponse, ContractError> {
        Ok(PoolResponse {
            pool: get_pool(&env)?,
        })
    }

    fn query_total_staked(env: Env) -> Result<i128, ContractError> {
        Ok(get_pool(&env)?.total_staked)
    }

    fn query_position(env: Env, address: Address) -> Result<PositionResponse, ContractError> {
        let pool = get_pool(&env)?;
        let position = get_position(&env, &address);
        let now = env.ledger().timestamp();

        Ok(PositionResponse {
            deposited: position.deposited,
            pending_reward: pending_reward(&pool, &position, now)?,
            auto_compounded: position.auto_compounded,
            last_compound_time: position.last_compound_time,
        })
    }

    fn query_pending_reward(env: Env, address: Address) -> Result<u128, ContractError> {
        let pool = get_pool(&env)?;
        let position = get_position(&env, &address);

        pending_reward(&pool, &position, env.ledger().timestamp())
    }

    fn query_distributed_reward(env: Env) -> Result<u128, ContractError> {
        let pool = get_pool(&env)?;
        let projected = pending_attribution(&pool, env.ledger().timestamp())?;

        pool.distributed_total
            .checked_add(projected)
            .ok_or(ContractError::ContractMathError)
    }

    fn query_undistributed_reward(env: Env) -> Result<i128, ContractError> {
        let config = get_config(&env)?;
        let pool = get_pool(&env)?;
        let projected = pending_attribution(&pool, env.ledger().timestamp())?;

        let reward_token_client = token::Client::new(&env, &config.reward_token);
        let custody = reward_token_client.balance(&env.current_contract_address());

        let owed = pool
            .owed_rewards
            .checked_add(projected)
            .ok_or(ContractError::ContractMathError)?;
        let mut reserved = owed as i128;
        if config.reward_token == config.staking_token {
            reserved += pool.total_staked;
        }

        Ok((custody - reserved).max(0))
    }
}

#[contractimpl]
impl StakingManager {
    pub fn update(env: Env, new_wasm_hash: BytesN<32>) -> Result<(), ContractError> {
        let admin = get_admin(&env)?;
        admin.require_auth();

        env.deployer().update_current_contract_wasm(new_wasm_hash);

        Ok(())
    }
}

fn require_admin(env: &Env, sender: &Address) -> Result<(), ContractError> {
    let admin = get_admin(env)?;
    if sender != &admin {
        log!(env, "Staking manager: caller is not the configured operator");
        return Err(ContractError::Unauthorized);
    }

    Ok(())
}

// Every mutating operation starts here: bring the accumulator up to the
// current timestamp, then credit the caller's position against it.
fn sync(env: &Env, sender: &Address) -> Result<(Pool, Position), ContractError> {
    let mut pool = get_pool(env)?;
    update_pool(&mut pool, env.ledger().timestamp())?;

    let mut position = get_position(env, sender);
    settle_position(&pool, &mut position)?;

    Ok((pool, position))
}

fn pay_reward(
    env: &Env,
    config: &Config,
    pool: &mut Pool,
    position: &mut Position,
    recipient: &Address,
    reward: u128,
) -> Result<(), ContractError> {
    position.accrued_reward = 0;
    position.auto_compounded = position
        .auto_compounded
        .checked_add(reward)
        .ok_or(ContractError::ContractMathError)?;
    pool.owed_rewards = pool
        .owed_rewards
        .checked_sub(reward)
        .ok_or(ContractError::ContractMathError)?;

    let reward_token_client = token::Client::new(env, &config.reward_token);
    reward_token_client.transfer(&env.current_contract_address(), recipient, &(reward as i128));

    Ok(())
}
