use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::UnixTimestamp, program_error::ProgramError, pubkey::Pubkey};

use crate::{constants::MAX_QUESTION_LEN, error::SettlementError};

use super::{deserialize_account, serialize_account, FeeSchedule, Side};

/// Market lifecycle. Resolved and Cancelled are terminal.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketStatus {
    Active,
    Resolved,
    Cancelled,
}

/// One binary prediction market and its pooled stakes
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct Market {
    /// Account discriminator
    pub discriminator: [u8; 8],

    pub is_initialized: bool,

    pub market_id: u64,

    /// Entitled to the creator fee
    pub creator: Pubkey,

    pub question: String,

    /// Staking closes at this unix timestamp
    pub end_time: UnixTimestamp,

    pub created_at: UnixTimestamp,

    pub resolved_at: UnixTimestamp,

    pub status: MarketStatus,

    /// Set exactly when status is Resolved
    pub outcome: Option<Side>,

    /// Fee percentages frozen at resolution
    pub fee_schedule: Option<FeeSchedule>,

    pub total_yes_pool: u64,
    pub total_no_pool: u64,

    pub participant_count: u32,

    pub creator_fee_claimed: bool,
    pub platform_fee_claimed: bool,

    pub bump: u8,
}

impl Market {
    pub const DISCRIMINATOR: [u8; 8] = *b"BIN_MKT_";

    pub const LEN: usize = 8 + // discriminator
        1 + // is_initialized
        8 + // market_id
        32 + // creator
        4 + MAX_QUESTION_LEN + // question
        8 + // end_time
        8 + // created_at
        8 + // resolved_at
        1 + // status
        1 + 1 + // outcome
        1 + 2 + // fee_schedule
        8 + // total_yes_pool
        8 + // total_no_pool
        4 + // participant_count
        1 + // creator_fee_claimed
        1 + // platform_fee_claimed
        1; // bump

    pub fn new(
        market_id: u64,
        creator: Pubkey,
        question: String,
        end_time: UnixTimestamp,
        created_at: UnixTimestamp,
        bump: u8,
    ) -> Self {
        Self {
            discriminator: Self::DISCRIMINATOR,
            is_initialized: true,
            market_id,
            creator,
            question,
            end_time,
            created_at,
            resolved_at: 0,
            status: MarketStatus::Active,
            outcome: None,
            fee_schedule: None,
            total_yes_pool: 0,
            total_no_pool: 0,
            participant_count: 0,
            creator_fee_claimed: false,
            platform_fee_claimed: false,
            bump,
        }
    }

    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let market: Self = deserialize_account(data)?;
        if market.discriminator != Self::DISCRIMINATOR || !market.is_initialized {
            return Err(SettlementError::MarketNotFound.into());
        }
        Ok(market)
    }

    pub fn pack(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        serialize_account(self, dst)
    }

    pub fn is_active(&self) -> bool {
        self.status == MarketStatus::Active
    }

    pub fn is_resolved(&self) -> bool {
        self.status == MarketStatus::Resolved
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == MarketStatus::Cancelled
    }

    pub fn pool(&self, side: Side) -> u64 {
        match side {
            Side::Yes => self.total_yes_pool,
            Side::No => self.total_no_pool,
        }
    }

    pub fn total_pool(&self) -> Result<u64, ProgramError> {
        self.total_yes_pool
            .checked_add(self.total_no_pool)
            .ok_or_else(|| SettlementError::ArithmeticOverflow.into())
    }

    /// (winning pool, losing pool) for a resolved market
    pub fn settled_pools(&self) -> Result<(u64, u64), ProgramError> {
        let outcome = self.resolved_outcome()?;
        Ok((self.pool(outcome), self.pool(outcome.opposite())))
    }

    pub fn resolved_outcome(&self) -> Result<Side, ProgramError> {
        match (self.status, self.outcome) {
            (MarketStatus::Resolved, Some(side)) => Ok(side),
            _ => Err(SettlementError::MarketNotResolved.into()),
        }
    }

    pub(crate) fn add_to_pool(&mut self, side: Side, amount: u64) -> Result<(), ProgramError> {
        let pool = match side {
            Side::Yes => &mut self.total_yes_pool,
            Side::No => &mut self.total_no_pool,
        };
        *pool = pool
            .checked_add(amount)
            .ok_or(SettlementError::ArithmeticOverflow)?;
        Ok(())
    }
}

/// Check question text bounds before a market is created
pub fn validate_question(question: &str) -> Result<(), ProgramError> {
    if question.trim().is_empty() {
        return Err(SettlementError::InvalidQuestion.into());
    }
    if question.len() > MAX_QUESTION_LEN {
        return Err(SettlementError::QuestionTooLong.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_fits_largest_market() {
        let mut market = Market::new(
            u64::MAX,
            Pubkey::new_unique(),
            "q".repeat(MAX_QUESTION_LEN),
            i64::MAX,
            i64::MAX,
            255,
        );
        market.status = MarketStatus::Resolved;
        market.outcome = Some(Side::No);
        market.fee_schedule = Some(FeeSchedule::default());
        market.resolved_at = i64::MAX;

        let mut data = vec![0u8; Market::LEN];
        market.pack(&mut data).unwrap();
        assert_eq!(Market::unpack(&data).unwrap(), market);
    }

    #[test]
    fn test_question_validation() {
        assert!(validate_question("Will it rain tomorrow?").is_ok());
        assert_eq!(
            validate_question("   "),
            Err(SettlementError::InvalidQuestion.into())
        );
        assert_eq!(
            validate_question(&"x".repeat(MAX_QUESTION_LEN + 1)),
            Err(SettlementError::QuestionTooLong.into())
        );
    }

    #[test]
    fn test_outcome_requires_resolved_status() {
        let mut market = Market::new(0, Pubkey::new_unique(), "q".into(), 10, 0, 1);
        market.outcome = Some(Side::Yes);
        assert!(market.settled_pools().is_err());
        market.status = MarketStatus::Resolved;
        assert_eq!(market.settled_pools().unwrap(), (0, 0));
    }

    #[test]
    fn test_zeroed_account_is_not_found() {
        let data = vec![0u8; Market::LEN];
        assert_eq!(
            Market::unpack(&data),
            Err(SettlementError::MarketNotFound.into())
        );
    }
}
