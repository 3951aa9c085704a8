pub mod config;
pub mod market;
pub mod participation;
pub mod username;

pub use config::*;
pub use market::*;
pub use participation::*;
pub use username::*;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::program_error::ProgramError;

use crate::error::SettlementError;

/// Outcome side of a binary market
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Yes,
    No,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }
}

/// Deserialize an account body. Accounts are allocated with padding, so
/// trailing bytes are ignored.
pub(crate) fn deserialize_account<T: BorshDeserialize>(data: &[u8]) -> Result<T, ProgramError> {
    let mut slice = data;
    T::deserialize(&mut slice).map_err(|_| SettlementError::InvalidAccountData.into())
}

pub(crate) fn serialize_account<T: BorshSerialize>(
    value: &T,
    dst: &mut [u8],
) -> Result<(), ProgramError> {
    let mut writer = dst;
    value
        .serialize(&mut writer)
        .map_err(|_| SettlementError::InvalidAccountData.into())
}
