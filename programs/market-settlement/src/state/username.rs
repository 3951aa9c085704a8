use borsh::{BorshDeserialize, BorshSerialize};
use sha3::{Digest, Sha3_256};
use solana_program::{clock::UnixTimestamp, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    constants::{MAX_USERNAME_LEN, MIN_USERNAME_LEN},
    error::SettlementError,
};

use super::{deserialize_account, serialize_account};

/// Claims a display name for one wallet. Keyed by the hash of the
/// normalized name so lookups are case-insensitive.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct UsernameRecord {
    pub discriminator: [u8; 8],
    pub is_initialized: bool,
    pub owner: Pubkey,
    /// Name as the owner typed it
    pub display_name: String,
    pub registered_at: UnixTimestamp,
    pub bump: u8,
}

impl UsernameRecord {
    pub const DISCRIMINATOR: [u8; 8] = *b"USERNAME";

    pub const LEN: usize = 8 + 1 + 32 + 4 + MAX_USERNAME_LEN + 8 + 1;

    pub fn new(owner: Pubkey, display_name: String, registered_at: UnixTimestamp, bump: u8) -> Self {
        Self {
            discriminator: Self::DISCRIMINATOR,
            is_initialized: true,
            owner,
            display_name,
            registered_at,
            bump,
        }
    }

    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let record: Self = deserialize_account(data)?;
        if record.discriminator != Self::DISCRIMINATOR || !record.is_initialized {
            return Err(SettlementError::InvalidAccountData.into());
        }
        Ok(record)
    }

    pub fn pack(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        serialize_account(self, dst)
    }
}

/// Reverse lookup from wallet to its registered name
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub discriminator: [u8; 8],
    pub is_initialized: bool,
    pub owner: Pubkey,
    pub display_name: String,
    pub bump: u8,
}

impl UserProfile {
    pub const DISCRIMINATOR: [u8; 8] = *b"USR_PROF";

    pub const LEN: usize = 8 + 1 + 32 + 4 + MAX_USERNAME_LEN + 1;

    pub fn new(owner: Pubkey, display_name: String, bump: u8) -> Self {
        Self {
            discriminator: Self::DISCRIMINATOR,
            is_initialized: true,
            owner,
            display_name,
            bump,
        }
    }

    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let profile: Self = deserialize_account(data)?;
        if profile.discriminator != Self::DISCRIMINATOR || !profile.is_initialized {
            return Err(SettlementError::InvalidAccountData.into());
        }
        Ok(profile)
    }

    pub fn pack(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        serialize_account(self, dst)
    }
}

/// Validate a username and return its lowercase form
pub fn normalize_username(name: &str) -> Result<String, ProgramError> {
    if name.len() < MIN_USERNAME_LEN || name.len() > MAX_USERNAME_LEN {
        return Err(SettlementError::InvalidUsername.into());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(SettlementError::InvalidUsername.into());
    }
    Ok(name.to_ascii_lowercase())
}

/// PDA seed for a normalized username
pub fn username_hash(normalized: &str) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(normalized.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_is_case_insensitive() {
        assert_eq!(normalize_username("Alice_99").unwrap(), "alice_99");
        assert_eq!(
            username_hash(&normalize_username("ALICE_99").unwrap()),
            username_hash(&normalize_username("alice_99").unwrap())
        );
    }

    #[test]
    fn test_rejects_bad_names() {
        let too_long = "a".repeat(MAX_USERNAME_LEN + 1);
        for name in ["ab", "has space", "emoji🙂", "dash-name", too_long.as_str()] {
            assert_eq!(
                normalize_username(name),
                Err(SettlementError::InvalidUsername.into()),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_record_fits_longest_name() {
        let record = UsernameRecord::new(Pubkey::new_unique(), "z".repeat(MAX_USERNAME_LEN), 1, 2);
        let mut data = vec![0u8; UsernameRecord::LEN];
        record.pack(&mut data).unwrap();
        assert_eq!(UsernameRecord::unpack(&data).unwrap(), record);
    }
}
