//! Settlement engine
//!
//! Computes payouts for resolved markets and guards every claim so it pays
//! at most once. The ledger state is passed in explicitly; the engine owns
//! no storage of its own.
//!
//! Claims take the lamport movement as a callback. The claimed flag is
//! written only after the callback returns `Ok`, so a failed transfer
//! leaves the claim open for a retry.

use solana_program::{entrypoint::ProgramResult, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    error::SettlementError,
    payout::{self, FeeSplit},
    state::{Market, Participation, PlatformConfig},
};

pub struct SettlementEngine;

impl SettlementEngine {
    /// Fee split of a resolved market, from its frozen pools and the fee
    /// schedule snapshotted at resolution
    pub fn fee_split(market: &Market) -> Result<FeeSplit, ProgramError> {
        let (winning_pool, losing_pool) = market.settled_pools()?;
        let schedule = market
            .fee_schedule
            .ok_or(SettlementError::InvalidAccountData)?;
        payout::fee_split(winning_pool, losing_pool, &schedule)
    }

    /// Amount `participation` is owed from a resolved market. Zero for
    /// losers and for every user when the winning pool is empty.
    pub fn calculate_user_winnings(
        market: &Market,
        participation: &Participation,
    ) -> Result<u64, ProgramError> {
        if participation.market_id != market.market_id {
            return Err(SettlementError::InvalidAccountData.into());
        }
        let outcome = market.resolved_outcome()?;
        let split = Self::fee_split(market)?;
        payout::winnings_share(&split, participation.shares(outcome))
    }

    pub fn is_winner(market: &Market, participation: &Participation) -> bool {
        participation.market_id == market.market_id
            && market
                .resolved_outcome()
                .map(|outcome| participation.shares(outcome) > 0)
                .unwrap_or(false)
    }

    /// Pay a winner once
    pub fn claim_winnings<F>(
        market: &Market,
        participation: &mut Participation,
        caller: &Pubkey,
        transfer: F,
    ) -> Result<u64, ProgramError>
    where
        F: FnOnce(u64) -> ProgramResult,
    {
        if participation.user != *caller {
            return Err(SettlementError::Unauthorized.into());
        }
        if !Self::is_winner(market, participation) {
            return Err(SettlementError::NotAWinner.into());
        }
        if participation.has_claimed {
            return Err(SettlementError::AlreadyClaimed.into());
        }

        let amount = Self::calculate_user_winnings(market, participation)?;
        transfer(amount)?;

        participation.has_claimed = true;
        participation.claimed_amount = amount;

        msg!(
            "Winnings claimed: market {} user {} amount {}",
            market.market_id,
            caller,
            amount
        );

        Ok(amount)
    }

    /// Pay the creator fee once
    pub fn claim_creator_fee<F>(
        market: &mut Market,
        caller: &Pubkey,
        transfer: F,
    ) -> Result<u64, ProgramError>
    where
        F: FnOnce(u64) -> ProgramResult,
    {
        if market.creator != *caller {
            return Err(SettlementError::NotMarketCreator.into());
        }
        let split = Self::fee_split(market)?;
        if market.creator_fee_claimed {
            return Err(SettlementError::CreatorFeeAlreadyClaimed.into());
        }
        if split.creator_fee == 0 {
            return Err(SettlementError::NoCreatorFeeToClaim.into());
        }

        transfer(split.creator_fee)?;
        market.creator_fee_claimed = true;

        msg!(
            "Creator fee claimed: market {} amount {}",
            market.market_id,
            split.creator_fee
        );

        Ok(split.creator_fee)
    }

    /// Pay the platform fee to the config authority once
    pub fn claim_platform_fee<F>(
        market: &mut Market,
        config: &PlatformConfig,
        caller: &Pubkey,
        transfer: F,
    ) -> Result<u64, ProgramError>
    where
        F: FnOnce(u64) -> ProgramResult,
    {
        if !config.is_authority(caller) {
            return Err(SettlementError::Unauthorized.into());
        }
        let split = Self::fee_split(market)?;
        if market.platform_fee_claimed {
            return Err(SettlementError::PlatformFeeAlreadyClaimed.into());
        }
        if split.platform_fee == 0 {
            return Err(SettlementError::NoPlatformFeeToClaim.into());
        }

        transfer(split.platform_fee)?;
        market.platform_fee_claimed = true;

        msg!(
            "Platform fee claimed: market {} amount {}",
            market.market_id,
            split.platform_fee
        );

        Ok(split.platform_fee)
    }

    /// Return a participant's full stake from a cancelled market once
    pub fn claim_refund<F>(
        market: &Market,
        participation: &mut Participation,
        caller: &Pubkey,
        transfer: F,
    ) -> Result<u64, ProgramError>
    where
        F: FnOnce(u64) -> ProgramResult,
    {
        if participation.user != *caller {
            return Err(SettlementError::Unauthorized.into());
        }
        if participation.market_id != market.market_id {
            return Err(SettlementError::InvalidAccountData.into());
        }
        if !market.is_cancelled() {
            return Err(SettlementError::MarketNotCancelled.into());
        }
        if participation.has_claimed {
            return Err(SettlementError::AlreadyClaimed.into());
        }

        let amount = participation.total_shares()?;
        if amount == 0 {
            return Err(SettlementError::NothingToRefund.into());
        }

        transfer(amount)?;

        participation.has_claimed = true;
        participation.claimed_amount = amount;

        msg!(
            "Refund claimed: market {} user {} amount {}",
            market.market_id,
            caller,
            amount
        );

        Ok(amount)
    }
}
