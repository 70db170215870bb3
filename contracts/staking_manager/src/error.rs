use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 500,
    InvalidMinDeposit = 501,
    InvalidMinReward = 502,
    Unauthorized = 503,
    RewardPeriodActive = 504,
    RewardPeriodNotFinished = 505,
    InvalidDuration = 506,
    MinRewardNotReached = 507,
    DepositBelowMinimum = 508,
    WithdrawOverDeposited = 509,
    CooldownNotElapsed = 510,
    CompoundingNotSupported = 511,
    ContractMathError = 512,
    AdminNotSet = 513,
    ConfigNotSet = 514,
    PoolNotInitialized = 515,
}
