use market_settlement::{
    instruction,
    pda::{MarketPDA, ParticipationPDA, PlatformConfigPDA, UserProfilePDA, UsernamePDA},
    state::{normalize_username, username_hash, UserProfile, UsernameRecord},
    Market, MarketStatus, Participation, PlatformConfig, SettlementError, Side,
};
use solana_program::{
    clock::Clock, instruction::Instruction, native_token::LAMPORTS_PER_SOL, pubkey::Pubkey,
    system_program,
};
use solana_program_test::*;
use solana_sdk::{
    account::Account,
    instruction::InstructionError,
    signature::{Keypair, Signer},
    transaction::{Transaction, TransactionError},
};

struct Harness {
    context: ProgramTestContext,
    authority: Keypair,
    resolver: Keypair,
    creator: Keypair,
    alice: Keypair,
    bob: Keypair,
    carol: Keypair,
}

impl Harness {
    async fn start() -> Self {
        Self::start_with_prefunded(|_| Vec::new()).await
    }

    /// `prefund` sees Alice's wallet and returns addresses to seed with
    /// lamports before genesis
    async fn start_with_prefunded<F>(prefund: F) -> Self
    where
        F: FnOnce(&Keypair) -> Vec<(Pubkey, u64)>,
    {
        let mut program_test = ProgramTest::new(
            "market_settlement",
            market_settlement::id(),
            processor!(market_settlement::process_instruction),
        );

        let authority = Keypair::new();
        let resolver = Keypair::new();
        let creator = Keypair::new();
        let alice = Keypair::new();
        let bob = Keypair::new();
        let carol = Keypair::new();

        for wallet in [&authority, &resolver, &creator, &alice, &bob, &carol] {
            program_test.add_account(
                wallet.pubkey(),
                Account::new(10 * LAMPORTS_PER_SOL, 0, &system_program::id()),
            );
        }

        for (address, lamports) in prefund(&alice) {
            program_test.add_account(address, Account::new(lamports, 0, &system_program::id()));
        }

        let context = program_test.start_with_context().await;

        Self {
            context,
            authority,
            resolver,
            creator,
            alice,
            bob,
            carol,
        }
    }

    async fn send(
        &mut self,
        instruction: Instruction,
        signers: &[&Keypair],
    ) -> Result<(), BanksClientError> {
        let blockhash = self.context.get_new_latest_blockhash().await.unwrap();
        let mut all_signers: Vec<&Keypair> = vec![&self.context.payer];
        all_signers.extend_from_slice(signers);

        let transaction = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&self.context.payer.pubkey()),
            &all_signers,
            blockhash,
        );
        self.context.banks_client.process_transaction(transaction).await
    }

    async fn now(&mut self) -> i64 {
        let clock: Clock = self.context.banks_client.get_sysvar().await.unwrap();
        clock.unix_timestamp
    }

    async fn warp_to(&mut self, unix_timestamp: i64) {
        let mut clock: Clock = self.context.banks_client.get_sysvar().await.unwrap();
        clock.unix_timestamp = unix_timestamp;
        self.context.set_sysvar(&clock);
    }

    async fn lamports(&mut self, address: Pubkey) -> u64 {
        self.context.banks_client.get_balance(address).await.unwrap()
    }

    async fn account_data(&mut self, address: Pubkey) -> Vec<u8> {
        self.context
            .banks_client
            .get_account(address)
            .await
            .unwrap()
            .expect("account exists")
            .data
    }

    async fn market(&mut self, market_id: u64) -> Market {
        let (address, _) = MarketPDA::derive(&market_settlement::id(), market_id);
        Market::unpack(&self.account_data(address).await).unwrap()
    }

    async fn config(&mut self) -> PlatformConfig {
        let (address, _) = PlatformConfigPDA::derive(&market_settlement::id());
        PlatformConfig::unpack(&self.account_data(address).await).unwrap()
    }

    async fn initialize(&mut self, market_creation_fee: u64) {
        let ix = instruction::initialize_platform(
            &market_settlement::id(),
            &self.authority.pubkey(),
            &self.resolver.pubkey(),
            15,
            15,
            market_creation_fee,
        )
        .unwrap();
        let authority = self.authority.insecure_clone();
        self.send(ix, &[&authority]).await.unwrap();
    }

    /// Opens the next market closing 100 seconds from now
    async fn open_market(&mut self) -> (u64, i64) {
        let market_id = self.config().await.market_count;
        let end_time = self.now().await + 100;
        let ix = instruction::create_market(
            &market_settlement::id(),
            &self.creator.pubkey(),
            market_id,
            "Will the launch happen on schedule?".to_string(),
            end_time,
        )
        .unwrap();
        let creator = self.creator.insecure_clone();
        self.send(ix, &[&creator]).await.unwrap();
        (market_id, end_time)
    }

    async fn stake(
        &mut self,
        user: &Keypair,
        market_id: u64,
        side: Side,
        amount: u64,
    ) -> Result<(), BanksClientError> {
        let ix = instruction::record_stake(
            &market_settlement::id(),
            &user.pubkey(),
            market_id,
            side,
            amount,
        )
        .unwrap();
        self.send(ix, &[user]).await
    }
}

fn assert_settlement_error(result: Result<(), BanksClientError>, expected: SettlementError) {
    assert_eq!(
        result.unwrap_err().unwrap(),
        TransactionError::InstructionError(0, InstructionError::Custom(expected as u32)),
    );
}

#[tokio::test]
async fn test_market_settles_end_to_end() {
    let mut h = Harness::start().await;
    let program_id = market_settlement::id();
    h.initialize(0).await;
    let (market_id, end_time) = h.open_market().await;

    let alice = h.alice.insecure_clone();
    let bob = h.bob.insecure_clone();
    let carol = h.carol.insecure_clone();
    let creator = h.creator.insecure_clone();
    let authority = h.authority.insecure_clone();
    let resolver = h.resolver.insecure_clone();

    h.stake(&alice, market_id, Side::Yes, 800_000_000).await.unwrap();
    h.stake(&carol, market_id, Side::Yes, 200_000_000).await.unwrap();
    h.stake(&bob, market_id, Side::No, 500_000_000).await.unwrap();

    let market = h.market(market_id).await;
    assert_eq!(market.total_yes_pool, 1_000_000_000);
    assert_eq!(market.total_no_pool, 500_000_000);
    assert_eq!(market.participant_count, 3);

    let resolve_ix =
        instruction::resolve_market(&program_id, &resolver.pubkey(), market_id, Side::Yes).unwrap();
    assert_settlement_error(
        h.send(resolve_ix.clone(), &[&resolver]).await,
        SettlementError::MarketNotEnded,
    );

    h.warp_to(end_time).await;
    assert_settlement_error(
        h.stake(&bob, market_id, Side::No, 1).await,
        SettlementError::MarketExpired,
    );

    h.send(resolve_ix.clone(), &[&resolver]).await.unwrap();
    let market = h.market(market_id).await;
    assert_eq!(market.status, MarketStatus::Resolved);
    assert_eq!(market.outcome, Some(Side::Yes));

    assert_settlement_error(
        h.send(resolve_ix, &[&resolver]).await,
        SettlementError::AlreadyResolved,
    );

    // Losing pool 500M: 75M to the creator, 75M to the platform, 350M to winners
    let before = h.lamports(alice.pubkey()).await;
    let claim = instruction::claim_winnings(&program_id, &alice.pubkey(), market_id).unwrap();
    h.send(claim.clone(), &[&alice]).await.unwrap();
    assert_eq!(h.lamports(alice.pubkey()).await - before, 1_080_000_000);
    assert_settlement_error(h.send(claim, &[&alice]).await, SettlementError::AlreadyClaimed);

    let before = h.lamports(carol.pubkey()).await;
    h.send(
        instruction::claim_winnings(&program_id, &carol.pubkey(), market_id).unwrap(),
        &[&carol],
    )
    .await
    .unwrap();
    assert_eq!(h.lamports(carol.pubkey()).await - before, 270_000_000);

    assert_settlement_error(
        h.send(
            instruction::claim_winnings(&program_id, &bob.pubkey(), market_id).unwrap(),
            &[&bob],
        )
        .await,
        SettlementError::NotAWinner,
    );

    assert_settlement_error(
        h.send(
            instruction::claim_creator_fee(&program_id, &bob.pubkey(), market_id).unwrap(),
            &[&bob],
        )
        .await,
        SettlementError::NotMarketCreator,
    );

    let before = h.lamports(creator.pubkey()).await;
    let creator_claim =
        instruction::claim_creator_fee(&program_id, &creator.pubkey(), market_id).unwrap();
    h.send(creator_claim.clone(), &[&creator]).await.unwrap();
    assert_eq!(h.lamports(creator.pubkey()).await - before, 75_000_000);
    assert_settlement_error(
        h.send(creator_claim, &[&creator]).await,
        SettlementError::CreatorFeeAlreadyClaimed,
    );

    let before = h.lamports(authority.pubkey()).await;
    h.send(
        instruction::claim_platform_fee(&program_id, &authority.pubkey(), market_id).unwrap(),
        &[&authority],
    )
    .await
    .unwrap();
    assert_eq!(h.lamports(authority.pubkey()).await - before, 75_000_000);

    // Only the rent reserve is left behind
    let (market_address, _) = MarketPDA::derive(&program_id, market_id);
    let rent = h.context.banks_client.get_rent().await.unwrap();
    let reserve = rent.minimum_balance(Market::LEN);
    assert_eq!(h.lamports(market_address).await, reserve);
}

#[tokio::test]
async fn test_stake_rejections() {
    let mut h = Harness::start().await;
    let program_id = market_settlement::id();
    h.initialize(0).await;
    let (market_id, _) = h.open_market().await;
    let alice = h.alice.insecure_clone();

    assert_settlement_error(
        h.stake(&alice, market_id, Side::Yes, 0).await,
        SettlementError::InvalidAmount,
    );
    assert_settlement_error(
        h.stake(&alice, 42, Side::Yes, 10).await,
        SettlementError::MarketNotFound,
    );

    let authority = h.authority.insecure_clone();
    h.send(
        instruction::cancel_market(&program_id, &authority.pubkey(), market_id).unwrap(),
        &[&authority],
    )
    .await
    .unwrap();
    assert_settlement_error(
        h.stake(&alice, market_id, Side::Yes, 10).await,
        SettlementError::MarketNotActive,
    );

    let stranger = h.bob.insecure_clone();
    assert_settlement_error(
        h.send(
            instruction::resolve_market(&program_id, &stranger.pubkey(), market_id, Side::No)
                .unwrap(),
            &[&stranger],
        )
        .await,
        SettlementError::Unauthorized,
    );
}

#[tokio::test]
async fn test_cancelled_market_refunds_stakes() {
    let mut h = Harness::start().await;
    let program_id = market_settlement::id();
    h.initialize(0).await;
    let (market_id, _) = h.open_market().await;
    let alice = h.alice.insecure_clone();
    let authority = h.authority.insecure_clone();

    h.stake(&alice, market_id, Side::Yes, 300_000).await.unwrap();
    h.stake(&alice, market_id, Side::No, 200_000).await.unwrap();

    let refund = instruction::claim_refund(&program_id, &alice.pubkey(), market_id).unwrap();
    assert_settlement_error(
        h.send(refund.clone(), &[&alice]).await,
        SettlementError::MarketNotCancelled,
    );

    h.send(
        instruction::cancel_market(&program_id, &authority.pubkey(), market_id).unwrap(),
        &[&authority],
    )
    .await
    .unwrap();

    let before = h.lamports(alice.pubkey()).await;
    h.send(refund.clone(), &[&alice]).await.unwrap();
    assert_eq!(h.lamports(alice.pubkey()).await - before, 500_000);
    assert_settlement_error(h.send(refund, &[&alice]).await, SettlementError::AlreadyClaimed);

    let (participation_address, _) =
        ParticipationPDA::derive(&program_id, market_id, &alice.pubkey());
    let participation = Participation::unpack(&h.account_data(participation_address).await).unwrap();
    assert!(participation.has_claimed);
    assert_eq!(participation.claimed_amount, 500_000);
}

#[tokio::test]
async fn test_fee_configuration_and_treasury() {
    let mut h = Harness::start().await;
    let program_id = market_settlement::id();
    h.initialize(1_000_000).await;
    let authority = h.authority.insecure_clone();
    let bob = h.bob.insecure_clone();

    assert_settlement_error(
        h.send(
            instruction::initialize_platform(
                &program_id,
                &authority.pubkey(),
                &authority.pubkey(),
                15,
                15,
                0,
            )
            .unwrap(),
            &[&authority],
        )
        .await,
        SettlementError::AlreadyInitialized,
    );

    assert_settlement_error(
        h.send(
            instruction::update_creator_fee_percentage(&program_id, &authority.pubkey(), 51)
                .unwrap(),
            &[&authority],
        )
        .await,
        SettlementError::InvalidFeePercentage,
    );
    assert_settlement_error(
        h.send(
            instruction::update_platform_fee_percentage(&program_id, &bob.pubkey(), 5).unwrap(),
            &[&bob],
        )
        .await,
        SettlementError::Unauthorized,
    );

    h.send(
        instruction::update_platform_fee_percentage(&program_id, &authority.pubkey(), 5).unwrap(),
        &[&authority],
    )
    .await
    .unwrap();
    h.send(
        instruction::update_resolver(&program_id, &authority.pubkey(), &bob.pubkey()).unwrap(),
        &[&authority],
    )
    .await
    .unwrap();

    let config = h.config().await;
    assert_eq!(config.fee_schedule().platform_fee_pct, 5);
    assert_eq!(config.fee_schedule().creator_fee_pct, 15);
    assert_eq!(config.resolver, bob.pubkey());

    h.open_market().await;
    h.open_market().await;
    let config = h.config().await;
    assert_eq!(config.market_count, 2);
    assert_eq!(config.creation_fees_collected, 2_000_000);

    assert_settlement_error(
        h.send(
            instruction::withdraw_creation_fees(&program_id, &authority.pubkey(), 2_000_001)
                .unwrap(),
            &[&authority],
        )
        .await,
        SettlementError::InsufficientTreasury,
    );

    let before = h.lamports(authority.pubkey()).await;
    h.send(
        instruction::withdraw_creation_fees(&program_id, &authority.pubkey(), 1_500_000).unwrap(),
        &[&authority],
    )
    .await
    .unwrap();
    assert_eq!(h.lamports(authority.pubkey()).await - before, 1_500_000);
    assert_eq!(h.config().await.withdrawable_creation_fees(), 500_000);
}

#[tokio::test]
async fn test_username_registry() {
    let mut h = Harness::start().await;
    let program_id = market_settlement::id();
    let alice = h.alice.insecure_clone();
    let bob = h.bob.insecure_clone();

    h.send(
        instruction::register_username(&program_id, &alice.pubkey(), "Alice_1".to_string())
            .unwrap(),
        &[&alice],
    )
    .await
    .unwrap();

    let (profile_address, _) = UserProfilePDA::derive(&program_id, &alice.pubkey());
    let profile = UserProfile::unpack(&h.account_data(profile_address).await).unwrap();
    assert_eq!(profile.display_name, "Alice_1");
    assert_eq!(profile.owner, alice.pubkey());

    assert_settlement_error(
        h.send(
            instruction::register_username(&program_id, &bob.pubkey(), "alice_1".to_string())
                .unwrap(),
            &[&bob],
        )
        .await,
        SettlementError::UsernameTaken,
    );
    assert_settlement_error(
        h.send(
            instruction::register_username(&program_id, &alice.pubkey(), "second".to_string())
                .unwrap(),
            &[&alice],
        )
        .await,
        SettlementError::UsernameAlreadySet,
    );
}

#[tokio::test]
async fn test_prefunded_addresses_are_still_created() {
    let program_id = market_settlement::id();
    let name_hash = username_hash(&normalize_username("Alice_1").unwrap());
    let (market_address, _) = MarketPDA::derive(&program_id, 0);
    let (record_address, _) = UsernamePDA::derive(&program_id, &name_hash);

    let mut h = Harness::start_with_prefunded(|alice| {
        let (participation, _) = ParticipationPDA::derive(&program_id, 0, &alice.pubkey());
        let (profile, _) = UserProfilePDA::derive(&program_id, &alice.pubkey());
        vec![
            (market_address, 1),
            (participation, 1),
            (record_address, 1),
            // Already above the rent minimum, so no top-up is needed
            (profile, LAMPORTS_PER_SOL),
        ]
    })
    .await;
    let alice = h.alice.insecure_clone();

    h.initialize(0).await;
    let (market_id, _) = h.open_market().await;
    assert_eq!(market_id, 0);
    assert_eq!(h.market(0).await.status, MarketStatus::Active);

    let rent = h.context.banks_client.get_rent().await.unwrap();
    assert_eq!(
        h.lamports(market_address).await,
        rent.minimum_balance(Market::LEN)
    );

    // The next id is unaffected
    let (next_id, _) = h.open_market().await;
    assert_eq!(next_id, 1);

    h.stake(&alice, market_id, Side::Yes, 250_000).await.unwrap();
    let (participation_address, _) =
        ParticipationPDA::derive(&program_id, market_id, &alice.pubkey());
    let participation = Participation::unpack(&h.account_data(participation_address).await).unwrap();
    assert_eq!(participation.yes_shares, 250_000);
    assert_eq!(h.market(market_id).await.total_yes_pool, 250_000);

    h.send(
        instruction::register_username(&program_id, &alice.pubkey(), "Alice_1".to_string())
            .unwrap(),
        &[&alice],
    )
    .await
    .unwrap();

    let record = UsernameRecord::unpack(&h.account_data(record_address).await).unwrap();
    assert_eq!(record.owner, alice.pubkey());

    let (profile_address, _) = UserProfilePDA::derive(&program_id, &alice.pubkey());
    let profile_account = h
        .context
        .banks_client
        .get_account(profile_address)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile_account.owner, program_id);
    assert_eq!(profile_account.lamports, LAMPORTS_PER_SOL);
    assert_eq!(
        UserProfile::unpack(&profile_account.data).unwrap().display_name,
        "Alice_1"
    );
}
