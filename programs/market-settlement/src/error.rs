//! Error codes for the settlement program

use num_derive::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum SettlementError {
    // Market lookup and lifecycle (6000-6009)
    #[error("Market not found")]
    MarketNotFound = 6000,

    #[error("Market is not active")]
    MarketNotActive = 6001,

    #[error("Market staking window has closed")]
    MarketExpired = 6002,

    #[error("Market end time has not been reached")]
    MarketNotEnded = 6003,

    #[error("Market already resolved")]
    AlreadyResolved = 6004,

    #[error("Market is not resolved")]
    MarketNotResolved = 6005,

    #[error("Market is not cancelled")]
    MarketNotCancelled = 6006,

    #[error("End time must be in the future")]
    InvalidEndTime = 6007,

    #[error("Market question is empty")]
    InvalidQuestion = 6008,

    #[error("Market question too long")]
    QuestionTooLong = 6009,

    // Input validation (6010-6019)
    #[error("Invalid amount")]
    InvalidAmount = 6010,

    #[error("Invalid fee percentage")]
    InvalidFeePercentage = 6011,

    #[error("Invalid market creation fee")]
    InvalidCreationFee = 6012,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 6013,

    // Authorization (6020-6029)
    #[error("Unauthorized")]
    Unauthorized = 6020,

    #[error("Caller is not the market creator")]
    NotMarketCreator = 6021,

    // Claims (6030-6039)
    #[error("Caller did not stake on the winning side")]
    NotAWinner = 6030,

    #[error("Winnings already claimed")]
    AlreadyClaimed = 6031,

    #[error("Creator fee already claimed")]
    CreatorFeeAlreadyClaimed = 6032,

    #[error("No creator fee to claim")]
    NoCreatorFeeToClaim = 6033,

    #[error("Platform fee already claimed")]
    PlatformFeeAlreadyClaimed = 6034,

    #[error("No platform fee to claim")]
    NoPlatformFeeToClaim = 6035,

    #[error("Nothing to refund")]
    NothingToRefund = 6036,

    #[error("Transfer failed")]
    TransferFailed = 6037,

    #[error("Insufficient treasury balance")]
    InsufficientTreasury = 6038,

    // Accounts (6040-6049)
    #[error("Invalid instruction")]
    InvalidInstruction = 6040,

    #[error("Invalid account data")]
    InvalidAccountData = 6041,

    #[error("Invalid PDA")]
    InvalidPDA = 6042,

    #[error("Account already initialized")]
    AlreadyInitialized = 6043,

    #[error("Account not initialized")]
    NotInitialized = 6044,

    // Username registry (6050-6059)
    #[error("Invalid username")]
    InvalidUsername = 6050,

    #[error("Username already taken")]
    UsernameTaken = 6051,

    #[error("Username already set for this wallet")]
    UsernameAlreadySet = 6052,
}

impl PrintProgramError for SettlementError {
    fn print<E>(&self) {
        msg!("Settlement Error: {}", self);
    }
}

impl From<SettlementError> for ProgramError {
    fn from(e: SettlementError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for SettlementError {
    fn type_of() -> &'static str {
        "SettlementError"
    }
}

impl TryFrom<ProgramError> for SettlementError {
    type Error = ProgramError;

    fn try_from(error: ProgramError) -> Result<Self, Self::Error> {
        match error {
            ProgramError::Custom(code) => {
                num_traits::FromPrimitive::from_u32(code).ok_or(ProgramError::Custom(code))
            }
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_code_round_trip() {
        let err: ProgramError = SettlementError::AlreadyClaimed.into();
        assert_eq!(err, ProgramError::Custom(6031));
        assert_eq!(
            SettlementError::try_from(err).unwrap(),
            SettlementError::AlreadyClaimed
        );
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert!(SettlementError::try_from(ProgramError::Custom(42)).is_err());
        assert!(SettlementError::try_from(ProgramError::InvalidArgument).is_err());
    }
}
