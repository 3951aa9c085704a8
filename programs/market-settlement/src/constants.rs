//! Program-wide bounds and defaults

use solana_program::native_token::LAMPORTS_PER_SOL;

/// PDA seed constants
pub mod seeds {
    pub const PLATFORM_CONFIG: &[u8] = b"platform_config";
    pub const MARKET: &[u8] = b"market";
    pub const PARTICIPATION: &[u8] = b"participation";
    pub const USERNAME: &[u8] = b"username";
    pub const USER_PROFILE: &[u8] = b"user_profile";
}

/// Fees are expressed as whole percentages of the losing pool
pub const PERCENT_DENOMINATOR: u64 = 100;

pub const DEFAULT_CREATOR_FEE_PCT: u8 = 15;
pub const DEFAULT_PLATFORM_FEE_PCT: u8 = 15;
pub const MAX_CREATOR_FEE_PCT: u8 = 50;
pub const MAX_PLATFORM_FEE_PCT: u8 = 50;

pub const DEFAULT_MARKET_CREATION_FEE: u64 = 0;
pub const MAX_MARKET_CREATION_FEE: u64 = 10 * LAMPORTS_PER_SOL;

pub const MAX_QUESTION_LEN: usize = 200;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 32;
