#![no_std]
mod contract;
mod distribution;
mod error;
mod msg;
mod storage;

#[cfg(test)]
mod tests;
