use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction, system_program,
    sysvar::Sysvar,
};

use crate::{
    constants::seeds,
    engine::SettlementEngine,
    error::SettlementError,
    events::{
        CreatorFeeClaimed, Event, FeeScheduleUpdated, MarketCancelled, MarketCreated,
        MarketResolved, PlatformFeeClaimed, RefundClaimed, ResolverUpdated, StakeRecorded,
        TreasuryWithdrawn, UsernameRegistered, WinningsClaimed,
    },
    instruction::SettlementInstruction,
    ledger::MarketLedger,
    pda::{verify_pda, MarketPDA, ParticipationPDA, PlatformConfigPDA, UserProfilePDA, UsernamePDA},
    state::{
        normalize_username, username_hash, FeeSchedule, Market, Participation, PlatformConfig,
        Side, UserProfile, UsernameRecord,
    },
};

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = SettlementInstruction::unpack(instruction_data)?;

        match instruction {
            SettlementInstruction::InitializePlatform {
                resolver,
                creator_fee_pct,
                platform_fee_pct,
                market_creation_fee,
            } => {
                msg!("Instruction: InitializePlatform");
                Self::process_initialize_platform(
                    program_id,
                    accounts,
                    resolver,
                    creator_fee_pct,
                    platform_fee_pct,
                    market_creation_fee,
                )
            }
            SettlementInstruction::UpdateCreatorFeePercentage { creator_fee_pct } => {
                msg!("Instruction: UpdateCreatorFeePercentage");
                Self::process_update_config(program_id, accounts, |config| {
                    config.set_creator_fee_pct(creator_fee_pct)
                })
            }
            SettlementInstruction::UpdatePlatformFeePercentage { platform_fee_pct } => {
                msg!("Instruction: UpdatePlatformFeePercentage");
                Self::process_update_config(program_id, accounts, |config| {
                    config.set_platform_fee_pct(platform_fee_pct)
                })
            }
            SettlementInstruction::UpdateMarketCreationFee { market_creation_fee } => {
                msg!("Instruction: UpdateMarketCreationFee");
                Self::process_update_config(program_id, accounts, |config| {
                    config.set_market_creation_fee(market_creation_fee)
                })
            }
            SettlementInstruction::UpdateResolver { resolver } => {
                msg!("Instruction: UpdateResolver");
                Self::process_update_resolver(program_id, accounts, resolver)
            }
            SettlementInstruction::CreateMarket { question, end_time } => {
                msg!("Instruction: CreateMarket");
                Self::process_create_market(program_id, accounts, question, end_time)
            }
            SettlementInstruction::RecordStake {
                market_id,
                side,
                amount,
            } => {
                msg!("Instruction: RecordStake");
                Self::process_record_stake(program_id, accounts, market_id, side, amount)
            }
            SettlementInstruction::ResolveMarket { market_id, outcome } => {
                msg!("Instruction: ResolveMarket");
                Self::process_resolve_market(program_id, accounts, market_id, outcome)
            }
            SettlementInstruction::CancelMarket { market_id } => {
                msg!("Instruction: CancelMarket");
                Self::process_cancel_market(program_id, accounts, market_id)
            }
            SettlementInstruction::ClaimWinnings { market_id } => {
                msg!("Instruction: ClaimWinnings");
                Self::process_claim_winnings(program_id, accounts, market_id)
            }
            SettlementInstruction::ClaimCreatorFee { market_id } => {
                msg!("Instruction: ClaimCreatorFee");
                Self::process_claim_creator_fee(program_id, accounts, market_id)
            }
            SettlementInstruction::ClaimPlatformFee { market_id } => {
                msg!("Instruction: ClaimPlatformFee");
                Self::process_claim_platform_fee(program_id, accounts, market_id)
            }
            SettlementInstruction::ClaimRefund { market_id } => {
                msg!("Instruction: ClaimRefund");
                Self::process_claim_refund(program_id, accounts, market_id)
            }
            SettlementInstruction::WithdrawCreationFees { amount } => {
                msg!("Instruction: WithdrawCreationFees");
                Self::process_withdraw_creation_fees(program_id, accounts, amount)
            }
            SettlementInstruction::RegisterUsername { username } => {
                msg!("Instruction: RegisterUsername");
                Self::process_register_username(program_id, accounts, username)
            }
        }
    }

    fn process_initialize_platform(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        resolver: Pubkey,
        creator_fee_pct: u8,
        platform_fee_pct: u8,
        market_creation_fee: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        require_signer(authority_info)?;
        require_system_program(system_program_info)?;
        let bump = verify_pda(config_info.key, PlatformConfigPDA::derive(program_id))?;

        if !config_info.data_is_empty() {
            return Err(SettlementError::AlreadyInitialized.into());
        }

        let mut config = PlatformConfig::new(*authority_info.key, resolver, bump);
        config.fee_schedule = FeeSchedule::new(creator_fee_pct, platform_fee_pct)?;
        config.set_market_creation_fee(market_creation_fee)?;
        config.last_update = Clock::get()?.unix_timestamp;

        create_pda_account(
            authority_info,
            config_info,
            system_program_info,
            program_id,
            PlatformConfig::LEN,
            &[seeds::PLATFORM_CONFIG, &[bump]],
        )?;
        config.pack(&mut config_info.try_borrow_mut_data()?)?;

        msg!(
            "Platform initialized: creator fee {}%, platform fee {}%, creation fee {}",
            creator_fee_pct,
            platform_fee_pct,
            market_creation_fee
        );

        Ok(())
    }

    fn process_update_config<F>(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        update: F,
    ) -> ProgramResult
    where
        F: FnOnce(&mut PlatformConfig) -> ProgramResult,
    {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;

        require_signer(authority_info)?;
        let mut config = load_config(program_id, config_info)?;
        if !config.is_authority(authority_info.key) {
            return Err(SettlementError::Unauthorized.into());
        }

        update(&mut config)?;
        config.last_update = Clock::get()?.unix_timestamp;
        config.validate()?;
        config.pack(&mut config_info.try_borrow_mut_data()?)?;

        FeeScheduleUpdated {
            authority: *authority_info.key,
            creator_fee_pct: config.fee_schedule.creator_fee_pct,
            platform_fee_pct: config.fee_schedule.platform_fee_pct,
            market_creation_fee: config.market_creation_fee,
        }
        .emit();

        Ok(())
    }

    fn process_update_resolver(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        resolver: Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;

        require_signer(authority_info)?;
        let mut config = load_config(program_id, config_info)?;
        if !config.is_authority(authority_info.key) {
            return Err(SettlementError::Unauthorized.into());
        }

        config.resolver = resolver;
        config.last_update = Clock::get()?.unix_timestamp;
        config.pack(&mut config_info.try_borrow_mut_data()?)?;

        ResolverUpdated {
            authority: *authority_info.key,
            resolver,
        }
        .emit();

        Ok(())
    }

    fn process_create_market(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        question: String,
        end_time: i64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let creator_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let market_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        require_signer(creator_info)?;
        require_system_program(system_program_info)?;

        let mut config = load_config(program_id, config_info)?;
        let market_id = config.market_count;
        let bump = verify_pda(market_info.key, MarketPDA::derive(program_id, market_id))?;
        if !market_info.data_is_empty() {
            return Err(SettlementError::AlreadyInitialized.into());
        }

        let now = Clock::get()?.unix_timestamp;
        let creation_fee = config.market_creation_fee;
        let market = MarketLedger::create_market(
            &mut config,
            *creator_info.key,
            question,
            end_time,
            now,
            bump,
        )?;

        create_pda_account(
            creator_info,
            market_info,
            system_program_info,
            program_id,
            Market::LEN,
            &[seeds::MARKET, &market_id.to_le_bytes(), &[bump]],
        )?;

        if creation_fee > 0 {
            transfer_from_signer(creator_info, config_info, system_program_info, creation_fee)?;
        }

        market.pack(&mut market_info.try_borrow_mut_data()?)?;
        config.pack(&mut config_info.try_borrow_mut_data()?)?;

        MarketCreated {
            market_id,
            creator: *creator_info.key,
            end_time,
            creation_fee,
        }
        .emit();

        Ok(())
    }

    fn process_record_stake(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        market_id: u64,
        side: Side,
        amount: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let user_info = next_account_info(account_info_iter)?;
        let market_info = next_account_info(account_info_iter)?;
        let participation_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        require_signer(user_info)?;
        require_system_program(system_program_info)?;

        let mut market = load_market(program_id, market_info, market_id)?;
        let participation_bump = verify_pda(
            participation_info.key,
            ParticipationPDA::derive(program_id, market_id, user_info.key),
        )?;

        let is_new = participation_info.data_is_empty();
        let mut participation = if is_new {
            Participation::new(market_id, *user_info.key, side, participation_bump)
        } else {
            load_participation(program_id, participation_info, user_info.key)?
        };

        let now = Clock::get()?.unix_timestamp;
        MarketLedger::record_stake(&mut market, &mut participation, side, amount, now)?;

        if is_new {
            create_pda_account(
                user_info,
                participation_info,
                system_program_info,
                program_id,
                Participation::LEN,
                &[
                    seeds::PARTICIPATION,
                    &market_id.to_le_bytes(),
                    user_info.key.as_ref(),
                    &[participation_bump],
                ],
            )?;
        }

        transfer_from_signer(user_info, market_info, system_program_info, amount)?;

        market.pack(&mut market_info.try_borrow_mut_data()?)?;
        participation.pack(&mut participation_info.try_borrow_mut_data()?)?;

        StakeRecorded {
            market_id,
            user: *user_info.key,
            side,
            amount,
            total_yes_pool: market.total_yes_pool,
            total_no_pool: market.total_no_pool,
        }
        .emit();

        Ok(())
    }

    fn process_resolve_market(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        market_id: u64,
        outcome: Side,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let resolver_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let market_info = next_account_info(account_info_iter)?;

        require_signer(resolver_info)?;
        let config = load_config(program_id, config_info)?;
        let mut market = load_market(program_id, market_info, market_id)?;

        let now = Clock::get()?.unix_timestamp;
        MarketLedger::resolve(&mut market, &config, resolver_info.key, outcome, now)?;
        let split = SettlementEngine::fee_split(&market)?;

        market.pack(&mut market_info.try_borrow_mut_data()?)?;

        MarketResolved {
            market_id,
            resolver: *resolver_info.key,
            outcome,
            winning_pool: split.winning_pool,
            losing_pool: split.losing_pool,
            creator_fee: split.creator_fee,
            platform_fee: split.platform_fee,
            total_winner_pool: split.total_winner_pool,
        }
        .emit();

        Ok(())
    }

    fn process_cancel_market(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        market_id: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let market_info = next_account_info(account_info_iter)?;

        require_signer(authority_info)?;
        let config = load_config(program_id, config_info)?;
        let mut market = load_market(program_id, market_info, market_id)?;

        let now = Clock::get()?.unix_timestamp;
        MarketLedger::cancel(&mut market, &config, authority_info.key, now)?;

        market.pack(&mut market_info.try_borrow_mut_data()?)?;

        MarketCancelled {
            market_id,
            authority: *authority_info.key,
            total_yes_pool: market.total_yes_pool,
            total_no_pool: market.total_no_pool,
        }
        .emit();

        Ok(())
    }

    fn process_claim_winnings(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        market_id: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let user_info = next_account_info(account_info_iter)?;
        let market_info = next_account_info(account_info_iter)?;
        let participation_info = next_account_info(account_info_iter)?;

        require_signer(user_info)?;
        let market = load_market(program_id, market_info, market_id)?;
        verify_pda(
            participation_info.key,
            ParticipationPDA::derive(program_id, market_id, user_info.key),
        )?;

        // No participation record means nothing was ever staked
        if participation_info.data_is_empty() {
            return Err(SettlementError::NotAWinner.into());
        }
        let mut participation = load_participation(program_id, participation_info, user_info.key)?;

        let rent = Rent::get()?;
        let amount = SettlementEngine::claim_winnings(
            &market,
            &mut participation,
            user_info.key,
            |amount| transfer_from_program_account(market_info, user_info, amount, &rent),
        )?;

        participation.pack(&mut participation_info.try_borrow_mut_data()?)?;

        WinningsClaimed {
            market_id,
            user: *user_info.key,
            side: market.resolved_outcome()?,
            amount,
        }
        .emit();

        Ok(())
    }

    fn process_claim_creator_fee(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        market_id: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let creator_info = next_account_info(account_info_iter)?;
        let market_info = next_account_info(account_info_iter)?;

        require_signer(creator_info)?;
        let mut market = load_market(program_id, market_info, market_id)?;

        let rent = Rent::get()?;
        let amount = SettlementEngine::claim_creator_fee(&mut market, creator_info.key, |amount| {
            transfer_from_program_account(market_info, creator_info, amount, &rent)
        })?;

        market.pack(&mut market_info.try_borrow_mut_data()?)?;

        CreatorFeeClaimed {
            market_id,
            creator: *creator_info.key,
            amount,
        }
        .emit();

        Ok(())
    }

    fn process_claim_platform_fee(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        market_id: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let market_info = next_account_info(account_info_iter)?;

        require_signer(authority_info)?;
        let config = load_config(program_id, config_info)?;
        let mut market = load_market(program_id, market_info, market_id)?;

        let rent = Rent::get()?;
        let amount = SettlementEngine::claim_platform_fee(
            &mut market,
            &config,
            authority_info.key,
            |amount| transfer_from_program_account(market_info, authority_info, amount, &rent),
        )?;

        market.pack(&mut market_info.try_borrow_mut_data()?)?;

        PlatformFeeClaimed {
            market_id,
            authority: *authority_info.key,
            amount,
        }
        .emit();

        Ok(())
    }

    fn process_claim_refund(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        market_id: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let user_info = next_account_info(account_info_iter)?;
        let market_info = next_account_info(account_info_iter)?;
        let participation_info = next_account_info(account_info_iter)?;

        require_signer(user_info)?;
        let market = load_market(program_id, market_info, market_id)?;
        verify_pda(
            participation_info.key,
            ParticipationPDA::derive(program_id, market_id, user_info.key),
        )?;

        if participation_info.data_is_empty() {
            return Err(SettlementError::NothingToRefund.into());
        }
        let mut participation = load_participation(program_id, participation_info, user_info.key)?;

        let rent = Rent::get()?;
        let amount = SettlementEngine::claim_refund(
            &market,
            &mut participation,
            user_info.key,
            |amount| transfer_from_program_account(market_info, user_info, amount, &rent),
        )?;

        participation.pack(&mut participation_info.try_borrow_mut_data()?)?;

        RefundClaimed {
            market_id,
            user: *user_info.key,
            amount,
        }
        .emit();

        Ok(())
    }

    fn process_withdraw_creation_fees(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;

        require_signer(authority_info)?;
        let mut config = load_config(program_id, config_info)?;
        if !config.is_authority(authority_info.key) {
            return Err(SettlementError::Unauthorized.into());
        }

        config.record_withdrawal(amount)?;
        let rent = Rent::get()?;
        transfer_from_program_account(config_info, authority_info, amount, &rent)
            .map_err(|_| SettlementError::InsufficientTreasury)?;

        config.pack(&mut config_info.try_borrow_mut_data()?)?;

        TreasuryWithdrawn {
            authority: *authority_info.key,
            amount,
        }
        .emit();

        Ok(())
    }

    fn process_register_username(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        username: String,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let owner_info = next_account_info(account_info_iter)?;
        let record_info = next_account_info(account_info_iter)?;
        let profile_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        require_signer(owner_info)?;
        require_system_program(system_program_info)?;

        let normalized = normalize_username(&username)?;
        let name_hash = username_hash(&normalized);
        let record_bump = verify_pda(record_info.key, UsernamePDA::derive(program_id, &name_hash))?;
        let profile_bump = verify_pda(
            profile_info.key,
            UserProfilePDA::derive(program_id, owner_info.key),
        )?;

        if !record_info.data_is_empty() {
            return Err(SettlementError::UsernameTaken.into());
        }
        if !profile_info.data_is_empty() {
            return Err(SettlementError::UsernameAlreadySet.into());
        }

        let now = Clock::get()?.unix_timestamp;

        create_pda_account(
            owner_info,
            record_info,
            system_program_info,
            program_id,
            UsernameRecord::LEN,
            &[seeds::USERNAME, &name_hash, &[record_bump]],
        )?;
        create_pda_account(
            owner_info,
            profile_info,
            system_program_info,
            program_id,
            UserProfile::LEN,
            &[seeds::USER_PROFILE, owner_info.key.as_ref(), &[profile_bump]],
        )?;

        UsernameRecord::new(*owner_info.key, username.clone(), now, record_bump)
            .pack(&mut record_info.try_borrow_mut_data()?)?;
        UserProfile::new(*owner_info.key, username.clone(), profile_bump)
            .pack(&mut profile_info.try_borrow_mut_data()?)?;

        UsernameRegistered {
            owner: *owner_info.key,
            username,
        }
        .emit();

        Ok(())
    }
}

fn require_signer(info: &AccountInfo) -> ProgramResult {
    if !info.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

fn require_system_program(info: &AccountInfo) -> ProgramResult {
    if *info.key != system_program::id() {
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

fn load_config(program_id: &Pubkey, config_info: &AccountInfo) -> Result<PlatformConfig, ProgramError> {
    verify_pda(config_info.key, PlatformConfigPDA::derive(program_id))?;
    if config_info.owner != program_id || config_info.data_is_empty() {
        return Err(SettlementError::NotInitialized.into());
    }
    PlatformConfig::unpack(&config_info.try_borrow_data()?)
}

fn load_market(
    program_id: &Pubkey,
    market_info: &AccountInfo,
    market_id: u64,
) -> Result<Market, ProgramError> {
    if market_info.owner != program_id || market_info.data_is_empty() {
        return Err(SettlementError::MarketNotFound.into());
    }
    verify_pda(market_info.key, MarketPDA::derive(program_id, market_id))?;
    let market = Market::unpack(&market_info.try_borrow_data()?)?;
    if market.market_id != market_id {
        return Err(SettlementError::MarketNotFound.into());
    }
    Ok(market)
}

fn load_participation(
    program_id: &Pubkey,
    participation_info: &AccountInfo,
    user: &Pubkey,
) -> Result<Participation, ProgramError> {
    if participation_info.owner != program_id {
        return Err(SettlementError::InvalidAccountData.into());
    }
    let participation = Participation::unpack(&participation_info.try_borrow_data()?)?;
    if participation.user != *user {
        return Err(SettlementError::InvalidAccountData.into());
    }
    Ok(participation)
}

/// Create a program-owned PDA. An address that already holds lamports
/// cannot go through `create_account`, so it is topped up to the rent
/// minimum and then allocated and assigned in place.
fn create_pda_account<'a>(
    payer: &AccountInfo<'a>,
    new_account: &AccountInfo<'a>,
    system_program_info: &AccountInfo<'a>,
    program_id: &Pubkey,
    space: usize,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    let required = Rent::get()?.minimum_balance(space);
    let current = new_account.lamports();

    if current == 0 {
        return invoke_signed(
            &system_instruction::create_account(
                payer.key,
                new_account.key,
                required,
                space as u64,
                program_id,
            ),
            &[payer.clone(), new_account.clone(), system_program_info.clone()],
            &[signer_seeds],
        );
    }

    msg!("Account {} prefunded with {} lamports", new_account.key, current);

    let top_up = required.saturating_sub(current);
    if top_up > 0 {
        transfer_from_signer(payer, new_account, system_program_info, top_up)?;
    }

    invoke_signed(
        &system_instruction::allocate(new_account.key, space as u64),
        &[new_account.clone(), system_program_info.clone()],
        &[signer_seeds],
    )?;
    invoke_signed(
        &system_instruction::assign(new_account.key, program_id),
        &[new_account.clone(), system_program_info.clone()],
        &[signer_seeds],
    )
}

/// System transfer out of a signing wallet
fn transfer_from_signer<'a>(
    from: &AccountInfo<'a>,
    to: &AccountInfo<'a>,
    system_program_info: &AccountInfo<'a>,
    amount: u64,
) -> ProgramResult {
    invoke(
        &system_instruction::transfer(from.key, to.key, amount),
        &[from.clone(), to.clone(), system_program_info.clone()],
    )
}

/// Move lamports out of a program-owned account without dipping into its
/// rent-exempt reserve
fn transfer_from_program_account(
    from: &AccountInfo,
    to: &AccountInfo,
    amount: u64,
    rent: &Rent,
) -> ProgramResult {
    if amount == 0 {
        return Ok(());
    }

    let reserve = rent.minimum_balance(from.data_len());
    let available = from.lamports().saturating_sub(reserve);
    if amount > available {
        msg!("Transfer of {} exceeds available balance {}", amount, available);
        return Err(SettlementError::TransferFailed.into());
    }

    let from_balance = from
        .lamports()
        .checked_sub(amount)
        .ok_or(SettlementError::TransferFailed)?;
    let to_balance = to
        .lamports()
        .checked_add(amount)
        .ok_or(SettlementError::TransferFailed)?;

    **from.try_borrow_mut_lamports()? = from_balance;
    **to.try_borrow_mut_lamports()? = to_balance;

    Ok(())
}
