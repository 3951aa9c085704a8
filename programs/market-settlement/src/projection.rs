//! Payout preview for clients
//!
//! Simulates a stake against a snapshot of the market and runs the same
//! [`payout`] functions the settlement engine uses. Fee percentages come
//! from the caller-supplied [`FeeSchedule`], normally
//! `PlatformConfig::fee_schedule()` read alongside the market.

use solana_program::{clock::UnixTimestamp, program_error::ProgramError};

use crate::{
    error::SettlementError,
    payout::{self, FeeSplit},
    state::{FeeSchedule, Market, Participation, Side},
};

/// Projected result of staking `stake` on `side` if that side wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoutPreview {
    pub side: Side,
    pub stake: u64,
    /// User's total stake on `side` after the simulated stake
    pub winning_stake: u64,
    /// What a claim would pay if `side` wins and no one else stakes
    pub projected_payout: u64,
    /// `projected_payout` minus everything the user has staked on both sides
    pub projected_profit: i128,
    pub split: FeeSplit,
}

/// Preview a stake on a market snapshot.
///
/// `participation` is the user's current position, if any. `now` is
/// checked against the market end time when given.
pub fn preview_stake(
    market: &Market,
    participation: Option<&Participation>,
    schedule: &FeeSchedule,
    side: Side,
    stake: u64,
    now: Option<UnixTimestamp>,
) -> Result<PayoutPreview, ProgramError> {
    if participation.map_or(false, |p| p.market_id != market.market_id) {
        return Err(SettlementError::InvalidAccountData.into());
    }
    if stake == 0 {
        return Err(SettlementError::InvalidAmount.into());
    }
    if !market.is_active() {
        return Err(SettlementError::MarketNotActive.into());
    }
    if let Some(now) = now {
        if now >= market.end_time {
            return Err(SettlementError::MarketExpired.into());
        }
    }

    let (existing_yes, existing_no) = participation
        .map(|p| (p.yes_shares, p.no_shares))
        .unwrap_or((0, 0));

    preview_from_pools(
        market.total_yes_pool,
        market.total_no_pool,
        existing_yes,
        existing_no,
        schedule,
        side,
        stake,
    )
}

/// Pool-level preview for callers that only hold the two pool totals
pub fn preview_from_pools(
    total_yes_pool: u64,
    total_no_pool: u64,
    user_yes_shares: u64,
    user_no_shares: u64,
    schedule: &FeeSchedule,
    side: Side,
    stake: u64,
) -> Result<PayoutPreview, ProgramError> {
    if stake == 0 {
        return Err(SettlementError::InvalidAmount.into());
    }

    let add = |value: u64| {
        value
            .checked_add(stake)
            .ok_or(SettlementError::ArithmeticOverflow)
    };

    let (yes_pool, no_pool, yes_shares, no_shares) = match side {
        Side::Yes => (add(total_yes_pool)?, total_no_pool, add(user_yes_shares)?, user_no_shares),
        Side::No => (total_yes_pool, add(total_no_pool)?, user_yes_shares, add(user_no_shares)?),
    };

    let (winning_pool, losing_pool, winning_stake) = match side {
        Side::Yes => (yes_pool, no_pool, yes_shares),
        Side::No => (no_pool, yes_pool, no_shares),
    };

    let split = payout::fee_split(winning_pool, losing_pool, schedule)?;
    let projected_payout = payout::winnings_share(&split, winning_stake)?;
    let total_staked = yes_shares as i128 + no_shares as i128;

    Ok(PayoutPreview {
        side,
        stake,
        winning_stake,
        projected_payout,
        projected_profit: projected_payout as i128 - total_staked,
        split,
    })
}
