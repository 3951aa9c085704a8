use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::UnixTimestamp, program_error::ProgramError, pubkey::Pubkey};

use crate::error::SettlementError;

use super::{deserialize_account, serialize_account, Side};

/// A user's position in one market. Shares on each side are tracked
/// independently; `side` is only the most recently staked side.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct Participation {
    /// Account discriminator
    pub discriminator: [u8; 8],

    pub is_initialized: bool,

    pub market_id: u64,

    pub user: Pubkey,

    /// Last side staked on
    pub side: Side,

    pub yes_shares: u64,
    pub no_shares: u64,

    pub has_claimed: bool,

    /// Lamports paid out by the successful claim, 0 before it
    pub claimed_amount: u64,

    pub last_stake_at: UnixTimestamp,

    pub bump: u8,
}

impl Participation {
    pub const DISCRIMINATOR: [u8; 8] = *b"MKT_PART";

    pub const LEN: usize = 8 + // discriminator
        1 + // is_initialized
        8 + // market_id
        32 + // user
        1 + // side
        8 + // yes_shares
        8 + // no_shares
        1 + // has_claimed
        8 + // claimed_amount
        8 + // last_stake_at
        1; // bump

    pub fn new(market_id: u64, user: Pubkey, side: Side, bump: u8) -> Self {
        Self {
            discriminator: Self::DISCRIMINATOR,
            is_initialized: true,
            market_id,
            user,
            side,
            yes_shares: 0,
            no_shares: 0,
            has_claimed: false,
            claimed_amount: 0,
            last_stake_at: 0,
            bump,
        }
    }

    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let participation: Self = deserialize_account(data)?;
        if participation.discriminator != Self::DISCRIMINATOR || !participation.is_initialized {
            return Err(SettlementError::InvalidAccountData.into());
        }
        Ok(participation)
    }

    pub fn pack(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        serialize_account(self, dst)
    }

    pub fn shares(&self, side: Side) -> u64 {
        match side {
            Side::Yes => self.yes_shares,
            Side::No => self.no_shares,
        }
    }

    pub fn total_shares(&self) -> Result<u64, ProgramError> {
        self.yes_shares
            .checked_add(self.no_shares)
            .ok_or_else(|| SettlementError::ArithmeticOverflow.into())
    }

    pub(crate) fn add_shares(&mut self, side: Side, amount: u64) -> Result<(), ProgramError> {
        let shares = match side {
            Side::Yes => &mut self.yes_shares,
            Side::No => &mut self.no_shares,
        };
        *shares = shares
            .checked_add(amount)
            .ok_or(SettlementError::ArithmeticOverflow)?;
        self.side = side;
        Ok(())
    }
}
