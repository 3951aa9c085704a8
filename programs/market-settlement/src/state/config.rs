use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::{
    constants::{
        DEFAULT_CREATOR_FEE_PCT, DEFAULT_MARKET_CREATION_FEE, DEFAULT_PLATFORM_FEE_PCT,
        MAX_CREATOR_FEE_PCT, MAX_MARKET_CREATION_FEE, MAX_PLATFORM_FEE_PCT,
    },
    error::SettlementError,
};

use super::{deserialize_account, serialize_account};

/// Fee percentages applied to the losing pool of a resolved market
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub creator_fee_pct: u8,
    pub platform_fee_pct: u8,
}

impl FeeSchedule {
    pub fn new(creator_fee_pct: u8, platform_fee_pct: u8) -> Result<Self, ProgramError> {
        let schedule = Self {
            creator_fee_pct,
            platform_fee_pct,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.creator_fee_pct > MAX_CREATOR_FEE_PCT
            || self.platform_fee_pct > MAX_PLATFORM_FEE_PCT
            || self.creator_fee_pct as u16 + self.platform_fee_pct as u16 > 100
        {
            return Err(SettlementError::InvalidFeePercentage.into());
        }
        Ok(())
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            creator_fee_pct: DEFAULT_CREATOR_FEE_PCT,
            platform_fee_pct: DEFAULT_PLATFORM_FEE_PCT,
        }
    }
}

/// Platform-wide configuration. The account also holds the treasury
/// lamports collected from market creation fees.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    /// Account discriminator
    pub discriminator: [u8; 8],

    pub is_initialized: bool,

    /// Admin allowed to change fees, cancel markets and withdraw fees
    pub authority: Pubkey,

    /// Holds resolver capability alongside the authority
    pub resolver: Pubkey,

    /// Current fee percentages, snapshotted into each market at resolution
    pub fee_schedule: FeeSchedule,

    /// Lamports charged for opening a market
    pub market_creation_fee: u64,

    /// Next market id
    pub market_count: u64,

    pub creation_fees_collected: u64,
    pub creation_fees_withdrawn: u64,

    pub last_update: i64,

    pub bump: u8,
}

impl PlatformConfig {
    pub const DISCRIMINATOR: [u8; 8] = *b"PLAT_CFG";

    pub const LEN: usize = 8 + // discriminator
        1 + // is_initialized
        32 + // authority
        32 + // resolver
        2 + // fee_schedule
        8 + // market_creation_fee
        8 + // market_count
        8 + // creation_fees_collected
        8 + // creation_fees_withdrawn
        8 + // last_update
        1 + // bump
        64; // padding for growth

    pub fn new(authority: Pubkey, resolver: Pubkey, bump: u8) -> Self {
        Self {
            discriminator: Self::DISCRIMINATOR,
            is_initialized: true,
            authority,
            resolver,
            fee_schedule: FeeSchedule::default(),
            market_creation_fee: DEFAULT_MARKET_CREATION_FEE,
            market_count: 0,
            creation_fees_collected: 0,
            creation_fees_withdrawn: 0,
            last_update: 0,
            bump,
        }
    }

    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let config: Self = deserialize_account(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn pack(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        serialize_account(self, dst)
    }

    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.discriminator != Self::DISCRIMINATOR {
            return Err(SettlementError::InvalidAccountData.into());
        }
        if !self.is_initialized {
            return Err(SettlementError::NotInitialized.into());
        }
        self.fee_schedule.validate()?;
        validate_creation_fee(self.market_creation_fee)?;
        if self.creation_fees_withdrawn > self.creation_fees_collected {
            return Err(SettlementError::InvalidAccountData.into());
        }
        Ok(())
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        self.fee_schedule
    }

    pub fn is_authority(&self, key: &Pubkey) -> bool {
        self.authority == *key
    }

    pub fn can_resolve(&self, key: &Pubkey) -> bool {
        self.authority == *key || self.resolver == *key
    }

    pub fn set_creator_fee_pct(&mut self, pct: u8) -> Result<(), ProgramError> {
        FeeSchedule::new(pct, self.fee_schedule.platform_fee_pct)?;
        self.fee_schedule.creator_fee_pct = pct;
        Ok(())
    }

    pub fn set_platform_fee_pct(&mut self, pct: u8) -> Result<(), ProgramError> {
        FeeSchedule::new(self.fee_schedule.creator_fee_pct, pct)?;
        self.fee_schedule.platform_fee_pct = pct;
        Ok(())
    }

    pub fn set_market_creation_fee(&mut self, lamports: u64) -> Result<(), ProgramError> {
        validate_creation_fee(lamports)?;
        self.market_creation_fee = lamports;
        Ok(())
    }

    /// Reserve the next market id
    pub fn next_market_id(&mut self) -> Result<u64, ProgramError> {
        let id = self.market_count;
        self.market_count = self
            .market_count
            .checked_add(1)
            .ok_or(SettlementError::ArithmeticOverflow)?;
        Ok(id)
    }

    pub fn record_creation_fee(&mut self, lamports: u64) -> Result<(), ProgramError> {
        self.creation_fees_collected = self
            .creation_fees_collected
            .checked_add(lamports)
            .ok_or(SettlementError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn withdrawable_creation_fees(&self) -> u64 {
        self.creation_fees_collected
            .saturating_sub(self.creation_fees_withdrawn)
    }

    pub fn record_withdrawal(&mut self, lamports: u64) -> Result<(), ProgramError> {
        if lamports == 0 {
            return Err(SettlementError::InvalidAmount.into());
        }
        if lamports > self.withdrawable_creation_fees() {
            return Err(SettlementError::InsufficientTreasury.into());
        }
        self.creation_fees_withdrawn = self
            .creation_fees_withdrawn
            .checked_add(lamports)
            .ok_or(SettlementError::ArithmeticOverflow)?;
        Ok(())
    }
}

fn validate_creation_fee(lamports: u64) -> Result<(), ProgramError> {
    if lamports > MAX_MARKET_CREATION_FEE {
        return Err(SettlementError::InvalidCreationFee.into());
    }
    Ok(())
}
