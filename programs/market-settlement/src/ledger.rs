//! Market ledger: stake accounting and the market state machine
//!
//! Every mutation validates its own preconditions against the state it is
//! handed and either applies completely or returns an error without
//! touching anything.

use solana_program::{clock::UnixTimestamp, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    error::SettlementError,
    state::{validate_question, Market, MarketStatus, Participation, PlatformConfig, Side},
};

pub struct MarketLedger;

impl MarketLedger {
    /// Open a new market with empty pools. Reserves the next id from the
    /// config and books the creation fee into the treasury counters.
    pub fn create_market(
        config: &mut PlatformConfig,
        creator: Pubkey,
        question: String,
        end_time: UnixTimestamp,
        now: UnixTimestamp,
        bump: u8,
    ) -> Result<Market, ProgramError> {
        validate_question(&question)?;
        if end_time <= now {
            return Err(SettlementError::InvalidEndTime.into());
        }

        let mut next_config = config.clone();
        let market_id = next_config.next_market_id()?;
        next_config.record_creation_fee(next_config.market_creation_fee)?;
        *config = next_config;

        msg!("Market {} created by {}, closes at {}", market_id, creator, end_time);

        Ok(Market::new(market_id, creator, question, end_time, now, bump))
    }

    /// Add `amount` to `side` of both the market pool and the user's shares
    pub fn record_stake(
        market: &mut Market,
        participation: &mut Participation,
        side: Side,
        amount: u64,
        now: UnixTimestamp,
    ) -> Result<(), ProgramError> {
        if participation.market_id != market.market_id {
            return Err(SettlementError::InvalidAccountData.into());
        }
        if amount == 0 {
            return Err(SettlementError::InvalidAmount.into());
        }
        if !market.is_active() {
            return Err(SettlementError::MarketNotActive.into());
        }
        if now >= market.end_time {
            return Err(SettlementError::MarketExpired.into());
        }

        // Work on copies so an overflow on the second write leaves both untouched
        let mut next_market = market.clone();
        let mut next_participation = participation.clone();

        let first_stake = participation.total_shares()? == 0;

        next_market.add_to_pool(side, amount)?;
        next_participation.add_shares(side, amount)?;
        next_participation.last_stake_at = now;
        if first_stake {
            next_market.participant_count = next_market
                .participant_count
                .checked_add(1)
                .ok_or(SettlementError::ArithmeticOverflow)?;
        }

        *market = next_market;
        *participation = next_participation;

        msg!(
            "Stake recorded: market {} {:?} +{} (yes pool {}, no pool {})",
            market.market_id,
            side,
            amount,
            market.total_yes_pool,
            market.total_no_pool
        );

        Ok(())
    }

    /// One-way transition to Resolved. Freezes the config's current fee
    /// schedule into the market.
    pub fn resolve(
        market: &mut Market,
        config: &PlatformConfig,
        caller: &Pubkey,
        outcome: Side,
        now: UnixTimestamp,
    ) -> Result<(), ProgramError> {
        if !config.can_resolve(caller) {
            return Err(SettlementError::Unauthorized.into());
        }
        match market.status {
            MarketStatus::Resolved => return Err(SettlementError::AlreadyResolved.into()),
            MarketStatus::Cancelled => return Err(SettlementError::MarketNotActive.into()),
            MarketStatus::Active => {}
        }
        if now < market.end_time {
            return Err(SettlementError::MarketNotEnded.into());
        }

        let schedule = config.fee_schedule();
        schedule.validate()?;

        market.status = MarketStatus::Resolved;
        market.outcome = Some(outcome);
        market.fee_schedule = Some(schedule);
        market.resolved_at = now;

        msg!("Market {} resolved: {:?}", market.market_id, outcome);

        Ok(())
    }

    /// Admin path from Active to Cancelled. Participants can then reclaim
    /// their stakes with a refund.
    pub fn cancel(
        market: &mut Market,
        config: &PlatformConfig,
        caller: &Pubkey,
        now: UnixTimestamp,
    ) -> Result<(), ProgramError> {
        if !config.is_authority(caller) {
            return Err(SettlementError::Unauthorized.into());
        }
        if !market.is_active() {
            return Err(SettlementError::MarketNotActive.into());
        }

        market.status = MarketStatus::Cancelled;
        market.resolved_at = now;

        msg!("Market {} cancelled", market.market_id);

        Ok(())
    }
}
