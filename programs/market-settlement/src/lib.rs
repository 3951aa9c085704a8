//! Binary prediction market settlement
//!
//! Native Solana program that records stakes on binary markets, resolves
//! them, and pays winners, the market creator and the platform out of the
//! pooled lamports. The payout arithmetic lives in [`payout`] and is shared
//! by the on-chain [`engine`] and the client-side [`projection`].

use solana_program::{
    account_info::AccountInfo,
    entrypoint,
    entrypoint::ProgramResult,
    pubkey::Pubkey,
};

pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod instruction;
pub mod ledger;
pub mod payout;
pub mod pda;
pub mod processor;
pub mod projection;
pub mod state;

pub use engine::SettlementEngine;
pub use error::SettlementError;
pub use ledger::MarketLedger;
pub use payout::FeeSplit;
pub use state::{FeeSchedule, Market, MarketStatus, Participation, PlatformConfig, Side};

solana_program::declare_id!("Sett1eMkt1111111111111111111111111111111111");

#[cfg(not(feature = "no-entrypoint"))]
entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
