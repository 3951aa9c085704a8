//! Program Derived Address derivation

use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::{constants::seeds, error::SettlementError};

pub struct PlatformConfigPDA;
impl PlatformConfigPDA {
    pub fn derive(program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[seeds::PLATFORM_CONFIG], program_id)
    }
}

pub struct MarketPDA;
impl MarketPDA {
    pub fn derive(program_id: &Pubkey, market_id: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[seeds::MARKET, &market_id.to_le_bytes()], program_id)
    }
}

pub struct ParticipationPDA;
impl ParticipationPDA {
    pub fn derive(program_id: &Pubkey, market_id: u64, user: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[seeds::PARTICIPATION, &market_id.to_le_bytes(), user.as_ref()],
            program_id,
        )
    }
}

pub struct UsernamePDA;
impl UsernamePDA {
    pub fn derive(program_id: &Pubkey, name_hash: &[u8; 32]) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[seeds::USERNAME, name_hash], program_id)
    }
}

pub struct UserProfilePDA;
impl UserProfilePDA {
    pub fn derive(program_id: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[seeds::USER_PROFILE, owner.as_ref()], program_id)
    }
}

/// Ensure `actual` is the expected PDA and hand back its bump
pub fn verify_pda(actual: &Pubkey, expected: (Pubkey, u8)) -> Result<u8, ProgramError> {
    if *actual != expected.0 {
        return Err(SettlementError::InvalidPDA.into());
    }
    Ok(expected.1)
}
