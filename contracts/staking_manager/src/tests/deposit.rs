use pretty_assertions::assert_eq;
use soroban_sdk::{testutils::Address as _, Address, Env};

use super::setup::{
    deploy_staking_manager_contract, deploy_token_contract, MIN_DEPOSIT, MIN_REWARD,
};
use crate::{
    contract::{StakingManager, StakingManagerClient},
    error::ContractError,
    msg::ConfigResponse,
    storage::Config,
};

#[test]
fn initialize_staking_manager_contract() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let (staking_token, _) = deploy_token_contract(&env, &admin);
    let (reward_token, _) = deploy_token_contract(&env, &admin);

    let manager = deploy_staking_manager_contract(
        &env,
        admin.clone(),
        &staking_token.address,
        &reward_token.address,
    );

    let response = manager.query_config();
    assert_eq!(
        response,
        ConfigResponse {
            config: Config {
                staking_token: staking_token.address,
                reward_token: reward_token.address,
                min_deposit: MIN_DEPOSIT,
                min_reward: MIN_REWARD,
            }
        }
    );

    assert_eq!(manager.query_admin(), admin);
    assert_eq!(manager.query_total_staked(), 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #500)")]
fn initialize_twice_is_not_allowed() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let (staking_token, _) = deploy_token_contract(&env, &admin);
    let (reward_token, _) = deploy_token_contract(&env, &admin);

    let manager = deploy_staking_manager_contract(
        &env,
        admin.clone(),
        &staking_token.address,
        &reward_token.address,
    );

    manager.initialize(
        &admin,
        &staking_token.address,
        &reward_token.address,
        &MIN_DEPOSIT,
        &MIN_REWARD,
    );
}

#[test]
fn initialize_rejects_invalid_thresholds() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let (staking_token, _) = deploy_token_contract(&env, &admin);
    let (reward_token, _) = deploy_token_contract(&env, &admin);

    let manager = StakingManagerClient::new(&env, &env.register_contract(None, StakingManager {}));

    assert_eq!(
        manager.try_initialize(
            &admin,
            &staking_token.address,
            &reward_token.address,
            &0,
            &MIN_REWARD,
        ),
        Err(Ok(ContractError::InvalidMinDeposit))
    );
    assert_eq!(
        manager.try_initialize(
            &admin,
            &staking_token.address,
            &reward_token.address,
            &MIN_DEPOSIT,
            &-1,
        ),
        Err(Ok(ContractError::InvalidMinReward))
    );
}

#[test]
fn deposit_simple() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let (staking_token, staking_token_admin) = deploy_token_contract(&env, &admin);
    let (reward_token, _) = deploy_token_contract(&env, &admin);

    let manager = deploy_staking_manager_contract(
        &env,
        admin,
        &staking_token.address,
        &reward_token.address,
    );

    staking_token_admin.mint(&user, &10_000);
    manager.deposit(&user, &10_000);

    assert_eq!(manager.query_total_staked(), 10_000);
    assert_eq!(manager.query_position(&user).deposited, 10_000);
    assert_eq!(staking_token.balance(&user), 0);
    assert_eq!(staking_token.balance(&manager.address), 10_000);
}

#[test]
#[should_panic(expected = "Error(Contract, #508)")]
fn deposit_below_minimum() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let (staking_token, staking_token_admin) = deploy_token_contract(&env, &admin);
    let (reward_token, _) = deploy_token_contract(&env, &admin);

    let manager = deploy_staking_manager_contract(
        &env,
        admin,
        &staking_token.address,
        &reward_token.address,
    );

    staking_token_admin.mint(&user, &99);
    manager.deposit(&user, &99);
}

#[test]
#[should_panic]
fn deposit_without_tokens() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let (staking_token, _) = deploy_token_contract(&env, &admin);
    let (reward_token, _) = deploy_token_contract(&env, &admin);

    let manager = deploy_staking_manager_contract(
        &env,
        admin,
        &staking_token.address,
        &reward_token.address,
    );

    manager.deposit(&user, &10_000);
}

#[test]
fn deposit_withdraw_round_trip() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let (staking_token, staking_token_admin) = deploy_token_contract(&env, &admin);
    let (reward_token, _) = deploy_token_contract(&env, &admin);

    let manager = deploy_staking_manager_contract(
        &env,
        admin,
        &staking_token.address,
        &reward_token.address,
    );

    staking_token_admin.mint(&user, &1_000);
    manager.deposit(&user, &1_000);

    manager.withdraw(&user, &400);
    assert_eq!(manager.query_total_staked(), 600);
    assert_eq!(manager.query_position(&user).deposited, 600);
    assert_eq!(staking_token.balance(&user), 400);

    // no time has passed and nothing was funded, the rest comes back whole
    manager.withdraw(&user, &600);
    assert_eq!(manager.query_total_staked(), 0);
    assert_eq!(manager.query_position(&user).deposited, 0);
    assert_eq!(manager.query_position(&user).pending_reward, 0);
    assert_eq!(staking_token.balance(&user), 1_000);
    assert_eq!(staking_token.balance(&manager.address), 0);
}

#[test]
fn withdraw_more_than_deposited_leaves_state_untouched() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let (staking_token, staking_token_admin) = deploy_token_contract(&env, &admin);
    let (reward_token, _) = deploy_token_contract(&env, &admin);

    let manager = deploy_staking_manager_contract(
        &env,
        admin,
        &staking_token.address,
        &reward_token.address,
    );

    staking_token_admin.mint(&user, &1_000);
    manager.deposit(&user, &1_000);

    assert_eq!(
        manager.try_withdraw(&user, &2_000),
        Err(Ok(ContractError::WithdrawOverDeposited))
    );

    assert_eq!(manager.query_total_staked(), 1_000);
    assert_eq!(manager.query_position(&user).deposited, 1_000);
    assert_eq!(staking_token.balance(&manager.address), 1_000);
}

#[test]
fn withdraw_without_a_position_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let (staking_token, _) = deploy_token_contract(&env, &admin);
    let (reward_token, _) = deploy_token_contract(&env, &admin);

    let manager = deploy_staking_manager_contract(
        &env,
        admin,
        &staking_token.address,
        &reward_token.address,
    );

    assert_eq!(
        manager.try_withdraw(&user, &100),
        Err(Ok(ContractError::WithdrawOverDeposited))
    );
}

#[test]
fn two_users_total_staked_is_the_sum() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let user2 = Address::generate(&env);
    let (staking_token, staking_token_admin) = deploy_token_contract(&env, &admin);
    let (reward_token, _) = deploy_token_contract(&env, &admin);

    let manager = deploy_staking_manager_contract(
        &env,
        admin,
        &staking_token.address,
        &reward_token.address,
    );

    staking_token_admin.mint(&user, &10_000);
    staking_token_admin.mint(&user2, &25_000);

    manager.deposit(&user, &10_000);
    manager.deposit(&user2, &25_000);

    assert_eq!(manager.query_total_staked(), 35_000);
    assert_eq!(manager.query_position(&user).deposited, 10_000);
    assert_eq!(manager.query_position(&user2).deposited, 25_000);

    manager.withdraw(&user2, &5_000);
    assert_eq!(manager.query_total_staked(), 30_000);
}
