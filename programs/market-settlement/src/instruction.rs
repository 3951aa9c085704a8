use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::{
    error::SettlementError,
    pda::{MarketPDA, ParticipationPDA, PlatformConfigPDA, UserProfilePDA, UsernamePDA},
    state::{normalize_username, username_hash, Side},
};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub enum SettlementInstruction {
    /// Create the platform config / treasury account
    /// Accounts:
    /// 0. `[signer, writable]` Authority (payer)
    /// 1. `[writable]` Platform config PDA
    /// 2. `[]` System program
    InitializePlatform {
        resolver: Pubkey,
        creator_fee_pct: u8,
        platform_fee_pct: u8,
        market_creation_fee: u64,
    },

    /// Accounts:
    /// 0. `[signer]` Authority
    /// 1. `[writable]` Platform config PDA
    UpdateCreatorFeePercentage { creator_fee_pct: u8 },

    /// Accounts:
    /// 0. `[signer]` Authority
    /// 1. `[writable]` Platform config PDA
    UpdatePlatformFeePercentage { platform_fee_pct: u8 },

    /// Accounts:
    /// 0. `[signer]` Authority
    /// 1. `[writable]` Platform config PDA
    UpdateMarketCreationFee { market_creation_fee: u64 },

    /// Accounts:
    /// 0. `[signer]` Authority
    /// 1. `[writable]` Platform config PDA
    UpdateResolver { resolver: Pubkey },

    /// Open a market. The id is the config's current market count.
    /// Accounts:
    /// 0. `[signer, writable]` Creator (payer)
    /// 1. `[writable]` Platform config PDA
    /// 2. `[writable]` Market PDA
    /// 3. `[]` System program
    CreateMarket { question: String, end_time: i64 },

    /// Accounts:
    /// 0. `[signer, writable]` User
    /// 1. `[writable]` Market PDA
    /// 2. `[writable]` Participation PDA (created on first stake)
    /// 3. `[]` System program
    RecordStake { market_id: u64, side: Side, amount: u64 },

    /// Accounts:
    /// 0. `[signer]` Resolver or authority
    /// 1. `[]` Platform config PDA
    /// 2. `[writable]` Market PDA
    ResolveMarket { market_id: u64, outcome: Side },

    /// Accounts:
    /// 0. `[signer]` Authority
    /// 1. `[]` Platform config PDA
    /// 2. `[writable]` Market PDA
    CancelMarket { market_id: u64 },

    /// Accounts:
    /// 0. `[signer, writable]` User
    /// 1. `[writable]` Market PDA
    /// 2. `[writable]` Participation PDA
    ClaimWinnings { market_id: u64 },

    /// Accounts:
    /// 0. `[signer, writable]` Creator
    /// 1. `[writable]` Market PDA
    ClaimCreatorFee { market_id: u64 },

    /// Accounts:
    /// 0. `[signer, writable]` Authority
    /// 1. `[]` Platform config PDA
    /// 2. `[writable]` Market PDA
    ClaimPlatformFee { market_id: u64 },

    /// Accounts:
    /// 0. `[signer, writable]` User
    /// 1. `[writable]` Market PDA
    /// 2. `[writable]` Participation PDA
    ClaimRefund { market_id: u64 },

    /// Accounts:
    /// 0. `[signer, writable]` Authority
    /// 1. `[writable]` Platform config PDA
    WithdrawCreationFees { amount: u64 },

    /// Accounts:
    /// 0. `[signer, writable]` Owner (payer)
    /// 1. `[writable]` Username PDA
    /// 2. `[writable]` User profile PDA
    /// 3. `[]` System program
    RegisterUsername { username: String },
}

impl SettlementInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| SettlementError::InvalidInstruction.into())
    }

    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        self.try_to_vec()
            .map_err(|_| SettlementError::InvalidInstruction.into())
    }

    fn into_instruction(
        self,
        program_id: &Pubkey,
        accounts: Vec<AccountMeta>,
    ) -> Result<Instruction, ProgramError> {
        Ok(Instruction {
            program_id: *program_id,
            accounts,
            data: self.pack()?,
        })
    }
}

// Helper functions to create instructions

pub fn initialize_platform(
    program_id: &Pubkey,
    authority: &Pubkey,
    resolver: &Pubkey,
    creator_fee_pct: u8,
    platform_fee_pct: u8,
    market_creation_fee: u64,
) -> Result<Instruction, ProgramError> {
    let (config, _) = PlatformConfigPDA::derive(program_id);
    SettlementInstruction::InitializePlatform {
        resolver: *resolver,
        creator_fee_pct,
        platform_fee_pct,
        market_creation_fee,
    }
    .into_instruction(
        program_id,
        vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(config, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

fn admin_update(
    program_id: &Pubkey,
    authority: &Pubkey,
    instruction: SettlementInstruction,
) -> Result<Instruction, ProgramError> {
    let (config, _) = PlatformConfigPDA::derive(program_id);
    instruction.into_instruction(
        program_id,
        vec![
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new(config, false),
        ],
    )
}

pub fn update_creator_fee_percentage(
    program_id: &Pubkey,
    authority: &Pubkey,
    creator_fee_pct: u8,
) -> Result<Instruction, ProgramError> {
    admin_update(
        program_id,
        authority,
        SettlementInstruction::UpdateCreatorFeePercentage { creator_fee_pct },
    )
}

pub fn update_platform_fee_percentage(
    program_id: &Pubkey,
    authority: &Pubkey,
    platform_fee_pct: u8,
) -> Result<Instruction, ProgramError> {
    admin_update(
        program_id,
        authority,
        SettlementInstruction::UpdatePlatformFeePercentage { platform_fee_pct },
    )
}

pub fn update_market_creation_fee(
    program_id: &Pubkey,
    authority: &Pubkey,
    market_creation_fee: u64,
) -> Result<Instruction, ProgramError> {
    admin_update(
        program_id,
        authority,
        SettlementInstruction::UpdateMarketCreationFee { market_creation_fee },
    )
}

pub fn update_resolver(
    program_id: &Pubkey,
    authority: &Pubkey,
    resolver: &Pubkey,
) -> Result<Instruction, ProgramError> {
    admin_update(
        program_id,
        authority,
        SettlementInstruction::UpdateResolver { resolver: *resolver },
    )
}

pub fn withdraw_creation_fees(
    program_id: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let (config, _) = PlatformConfigPDA::derive(program_id);
    SettlementInstruction::WithdrawCreationFees { amount }.into_instruction(
        program_id,
        vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(config, false),
        ],
    )
}

/// `market_id` must be the config's current `market_count`
pub fn create_market(
    program_id: &Pubkey,
    creator: &Pubkey,
    market_id: u64,
    question: String,
    end_time: i64,
) -> Result<Instruction, ProgramError> {
    let (config, _) = PlatformConfigPDA::derive(program_id);
    let (market, _) = MarketPDA::derive(program_id, market_id);
    SettlementInstruction::CreateMarket { question, end_time }.into_instruction(
        program_id,
        vec![
            AccountMeta::new(*creator, true),
            AccountMeta::new(config, false),
            AccountMeta::new(market, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

pub fn record_stake(
    program_id: &Pubkey,
    user: &Pubkey,
    market_id: u64,
    side: Side,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let (market, _) = MarketPDA::derive(program_id, market_id);
    let (participation, _) = ParticipationPDA::derive(program_id, market_id, user);
    SettlementInstruction::RecordStake {
        market_id,
        side,
        amount,
    }
    .into_instruction(
        program_id,
        vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(market, false),
            AccountMeta::new(participation, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

pub fn resolve_market(
    program_id: &Pubkey,
    resolver: &Pubkey,
    market_id: u64,
    outcome: Side,
) -> Result<Instruction, ProgramError> {
    let (config, _) = PlatformConfigPDA::derive(program_id);
    let (market, _) = MarketPDA::derive(program_id, market_id);
    SettlementInstruction::ResolveMarket { market_id, outcome }.into_instruction(
        program_id,
        vec![
            AccountMeta::new_readonly(*resolver, true),
            AccountMeta::new_readonly(config, false),
            AccountMeta::new(market, false),
        ],
    )
}

pub fn cancel_market(
    program_id: &Pubkey,
    authority: &Pubkey,
    market_id: u64,
) -> Result<Instruction, ProgramError> {
    let (config, _) = PlatformConfigPDA::derive(program_id);
    let (market, _) = MarketPDA::derive(program_id, market_id);
    SettlementInstruction::CancelMarket { market_id }.into_instruction(
        program_id,
        vec![
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new_readonly(config, false),
            AccountMeta::new(market, false),
        ],
    )
}

pub fn claim_winnings(
    program_id: &Pubkey,
    user: &Pubkey,
    market_id: u64,
) -> Result<Instruction, ProgramError> {
    let (market, _) = MarketPDA::derive(program_id, market_id);
    let (participation, _) = ParticipationPDA::derive(program_id, market_id, user);
    SettlementInstruction::ClaimWinnings { market_id }.into_instruction(
        program_id,
        vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(market, false),
            AccountMeta::new(participation, false),
        ],
    )
}

pub fn claim_creator_fee(
    program_id: &Pubkey,
    creator: &Pubkey,
    market_id: u64,
) -> Result<Instruction, ProgramError> {
    let (market, _) = MarketPDA::derive(program_id, market_id);
    SettlementInstruction::ClaimCreatorFee { market_id }.into_instruction(
        program_id,
        vec![
            AccountMeta::new(*creator, true),
            AccountMeta::new(market, false),
        ],
    )
}

pub fn claim_platform_fee(
    program_id: &Pubkey,
    authority: &Pubkey,
    market_id: u64,
) -> Result<Instruction, ProgramError> {
    let (config, _) = PlatformConfigPDA::derive(program_id);
    let (market, _) = MarketPDA::derive(program_id, market_id);
    SettlementInstruction::ClaimPlatformFee { market_id }.into_instruction(
        program_id,
        vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(config, false),
            AccountMeta::new(market, false),
        ],
    )
}

pub fn claim_refund(
    program_id: &Pubkey,
    user: &Pubkey,
    market_id: u64,
) -> Result<Instruction, ProgramError> {
    let (market, _) = MarketPDA::derive(program_id, market_id);
    let (participation, _) = ParticipationPDA::derive(program_id, market_id, user);
    SettlementInstruction::ClaimRefund { market_id }.into_instruction(
        program_id,
        vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(market, false),
            AccountMeta::new(participation, false),
        ],
    )
}

pub fn register_username(
    program_id: &Pubkey,
    owner: &Pubkey,
    username: String,
) -> Result<Instruction, ProgramError> {
    let normalized = normalize_username(&username)?;
    let (record, _) = UsernamePDA::derive(program_id, &username_hash(&normalized));
    let (profile, _) = UserProfilePDA::derive(program_id, owner);
    SettlementInstruction::RegisterUsername { username }.into_instruction(
        program_id,
        vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(record, false),
            AccountMeta::new(profile, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_rejects_unknown_variant() {
        assert_eq!(
            SettlementInstruction::unpack(&[200]),
            Err(SettlementError::InvalidInstruction.into())
        );
        assert!(SettlementInstruction::unpack(&[]).is_err());
    }

    #[test]
    fn test_builder_targets_participation_pda() {
        let program_id = crate::id();
        let user = Pubkey::new_unique();
        let ix = record_stake(&program_id, &user, 5, Side::Yes, 100).unwrap();

        let (participation, _) = ParticipationPDA::derive(&program_id, 5, &user);
        assert_eq!(ix.accounts[2].pubkey, participation);
        assert!(ix.accounts[0].is_signer);
        assert_eq!(
            SettlementInstruction::unpack(&ix.data).unwrap(),
            SettlementInstruction::RecordStake {
                market_id: 5,
                side: Side::Yes,
                amount: 100,
            }
        );
    }
}
