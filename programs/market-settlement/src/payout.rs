//! Pool split and pro-rata payout arithmetic
//!
//! These two functions are the only place the payout formula exists. The
//! settlement engine calls them against frozen pools of a resolved market
//! and the client projection calls them against simulated pools, so a
//! preview can never drift from what a claim actually pays.
//!
//! Fees are whole percentages of the losing pool:
//!
//! ```text
//! creator_fee       = losing_pool * creator_fee_pct / 100
//! platform_fee      = losing_pool * platform_fee_pct / 100
//! redistributed     = losing_pool - creator_fee - platform_fee
//! total_winner_pool = winning_pool + redistributed
//! winnings(user)    = total_winner_pool * user_winning_stake / winning_pool
//! ```
//!
//! All divisions floor. The remainder left by flooring individual
//! winnings stays in the market account unclaimed.

use solana_program::program_error::ProgramError;

use crate::{constants::PERCENT_DENOMINATOR, error::SettlementError, state::FeeSchedule};

/// How a resolved market's pools are divided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeSplit {
    pub winning_pool: u64,
    pub losing_pool: u64,
    pub creator_fee: u64,
    pub platform_fee: u64,
    /// Part of the losing pool handed to winners
    pub redistributed: u64,
    pub total_winner_pool: u64,
}

impl FeeSplit {
    /// Everything the split hands out; always equals both pools combined
    pub fn total_allocated(&self) -> u128 {
        self.total_winner_pool as u128 + self.creator_fee as u128 + self.platform_fee as u128
    }

    /// Winner-pool lamports left over after `paid_to_winners` went out
    pub fn residual(&self, paid_to_winners: u64) -> u64 {
        self.total_winner_pool.saturating_sub(paid_to_winners)
    }
}

/// Split the pools of a market resolved in favour of `winning_pool`
pub fn fee_split(
    winning_pool: u64,
    losing_pool: u64,
    schedule: &FeeSchedule,
) -> Result<FeeSplit, ProgramError> {
    schedule.validate()?;

    // Nothing to take a percentage of: winners get their principal back
    if losing_pool == 0 {
        return Ok(FeeSplit {
            winning_pool,
            losing_pool,
            creator_fee: 0,
            platform_fee: 0,
            redistributed: 0,
            total_winner_pool: winning_pool,
        });
    }

    let creator_fee = percent_of(losing_pool, schedule.creator_fee_pct)?;
    let platform_fee = percent_of(losing_pool, schedule.platform_fee_pct)?;

    let redistributed = losing_pool
        .checked_sub(creator_fee)
        .and_then(|rest| rest.checked_sub(platform_fee))
        .ok_or(SettlementError::ArithmeticOverflow)?;

    let total_winner_pool = winning_pool
        .checked_add(redistributed)
        .ok_or(SettlementError::ArithmeticOverflow)?;

    Ok(FeeSplit {
        winning_pool,
        losing_pool,
        creator_fee,
        platform_fee,
        redistributed,
        total_winner_pool,
    })
}

/// Pro-rata share of the winner pool for a stake on the winning side.
/// Returns 0 when nobody staked the winning side.
pub fn winnings_share(split: &FeeSplit, user_winning_stake: u64) -> Result<u64, ProgramError> {
    if split.winning_pool == 0 || user_winning_stake == 0 {
        return Ok(0);
    }
    if user_winning_stake > split.winning_pool {
        return Err(SettlementError::InvalidAccountData.into());
    }

    let amount = (split.total_winner_pool as u128)
        .checked_mul(user_winning_stake as u128)
        .ok_or(SettlementError::ArithmeticOverflow)?
        / split.winning_pool as u128;

    u64::try_from(amount).map_err(|_| SettlementError::ArithmeticOverflow.into())
}

fn percent_of(amount: u64, pct: u8) -> Result<u64, ProgramError> {
    let value = (amount as u128)
        .checked_mul(pct as u128)
        .ok_or(SettlementError::ArithmeticOverflow)?
        / PERCENT_DENOMINATOR as u128;

    u64::try_from(value).map_err(|_| SettlementError::ArithmeticOverflow.into())
}
