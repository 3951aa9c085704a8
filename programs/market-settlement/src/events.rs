//! Structured program-log events
//!
//! Each state transition logs three lines:
//! `MARKET_SETTLEMENT_EVENT`, `TYPE:<EventType>` and `DATA:<bs58 borsh>`.
//! Indexers rebuild participation history from these.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{error::SettlementError, state::Side};

pub const EVENT_MARKER: &str = "MARKET_SETTLEMENT_EVENT";

/// Event type discriminator
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    // Market lifecycle
    MarketCreated = 1,
    StakeRecorded = 2,
    MarketResolved = 3,
    MarketCancelled = 4,

    // Claims
    WinningsClaimed = 10,
    CreatorFeeClaimed = 11,
    PlatformFeeClaimed = 12,
    RefundClaimed = 13,

    // Admin
    FeeScheduleUpdated = 20,
    ResolverUpdated = 21,
    TreasuryWithdrawn = 22,

    // Registry
    UsernameRegistered = 30,
}

/// Base event trait
pub trait Event: BorshSerialize {
    fn event_type() -> EventType;

    fn encode(&self) -> Result<String, ProgramError> {
        let data = self
            .try_to_vec()
            .map_err(|_| SettlementError::InvalidAccountData)?;
        Ok(bs58::encode(data).into_string())
    }

    fn emit(&self) {
        msg!(EVENT_MARKER);
        msg!("TYPE:{:?}", Self::event_type());

        if let Ok(data) = self.encode() {
            msg!("DATA:{}", data);
        }
    }
}

/// Decode the payload of a `DATA:` log line
pub fn decode_event<T: Event + BorshDeserialize>(data: &str) -> Result<T, ProgramError> {
    let bytes = bs58::decode(data)
        .into_vec()
        .map_err(|_| SettlementError::InvalidAccountData)?;
    T::try_from_slice(&bytes).map_err(|_| SettlementError::InvalidAccountData.into())
}

#[macro_export]
macro_rules! define_event {
    ($name:ident { $($field:ident: $type:ty),* $(,)? }) => {
        #[derive(::borsh::BorshSerialize, ::borsh::BorshDeserialize, Debug, Clone, PartialEq)]
        pub struct $name {
            $(pub $field: $type,)*
        }

        impl $crate::events::Event for $name {
            fn event_type() -> $crate::events::EventType {
                $crate::events::EventType::$name
            }
        }
    };
}

// === Market lifecycle ===

define_event!(MarketCreated {
    market_id: u64,
    creator: Pubkey,
    end_time: i64,
    creation_fee: u64,
});

define_event!(StakeRecorded {
    market_id: u64,
    user: Pubkey,
    side: Side,
    amount: u64,
    total_yes_pool: u64,
    total_no_pool: u64,
});

define_event!(MarketResolved {
    market_id: u64,
    resolver: Pubkey,
    outcome: Side,
    winning_pool: u64,
    losing_pool: u64,
    creator_fee: u64,
    platform_fee: u64,
    total_winner_pool: u64,
});

define_event!(MarketCancelled {
    market_id: u64,
    authority: Pubkey,
    total_yes_pool: u64,
    total_no_pool: u64,
});

// === Claims ===

define_event!(WinningsClaimed {
    market_id: u64,
    user: Pubkey,
    side: Side,
    amount: u64,
});

define_event!(CreatorFeeClaimed {
    market_id: u64,
    creator: Pubkey,
    amount: u64,
});

define_event!(PlatformFeeClaimed {
    market_id: u64,
    authority: Pubkey,
    amount: u64,
});

define_event!(RefundClaimed {
    market_id: u64,
    user: Pubkey,
    amount: u64,
});

// === Admin ===

define_event!(FeeScheduleUpdated {
    authority: Pubkey,
    creator_fee_pct: u8,
    platform_fee_pct: u8,
    market_creation_fee: u64,
});

define_event!(ResolverUpdated {
    authority: Pubkey,
    resolver: Pubkey,
});

define_event!(TreasuryWithdrawn {
    authority: Pubkey,
    amount: u64,
});

// === Registry ===

define_event!(UsernameRegistered {
    owner: Pubkey,
    username: String,
});
