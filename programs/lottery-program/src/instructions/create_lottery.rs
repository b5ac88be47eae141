use crate::{
    error::LotteryError,
    state::{
        lottery::{Lottery, LotteryState},
        Config, EntryLedger, PrizePool, Treasury, ENTRY_LEDGER_BASE_SIZE, LOTTERY_ACCOUNT_SIZE,
        PRIZE_POOL_BASE_SIZE, TREASURY_ACCOUNT_SIZE,
    },
};
use anchor_lang::prelude::*;

// Constants for validation
const MAX_ENTRY_FEE: u64 = 100_000_000_000; // 100 SOL
const MIN_ENTRY_FEE: u64 = 1_000_000; // 0.001 SOL
const MAX_DURATION: i64 = 30 * 24 * 60 * 60; // 30 days in seconds
const MIN_DURATION: i64 = 1 * 60 * 60; // 1 hour in seconds

// Valid URI prefixes
const VALID_URI_PREFIXES: [&str; 3] = [
    "https://",     // Standard HTTPS
    "ipfs://",      // IPFS protocol
    "ipfs://ipfs/", // Alternative IPFS format
];

/// Event emitted when a lottery is created
#[event]
pub struct LotteryCreated {
    /// The pubkey of the created lottery
    pub lottery: Pubkey,
    /// The metadata URI for the lottery
    pub metadata_uri: String,
    /// Fee per entry unit in lamports
    pub entry_fee: u64,
    /// When the entry window opens
    pub start_time: i64,
    /// When the entry window closes
    pub end_time: i64,
    /// When the lottery was created
    pub creation_time: i64,
}

/// Instruction to create a new lottery with specified parameters
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `metadata_uri` - URI pointing to the lottery's metadata (max 256 chars)
/// * `entry_fee` - Fee per entry unit in lamports (bounded)
/// * `start_time` - Unix timestamp when the entry window opens
/// * `end_time` - Unix timestamp when the entry window closes
/// * `max_entries` - Optional cap on the number of entry records
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates caller is the program management authority via config PDA
/// 2. Validates metadata_uri length is <= 256 characters and starts with https://, ipfs://, or ipfs://ipfs/
/// 3. Bounds the entry fee between 0.001 SOL and 100 SOL
/// 4. Verifies the entry window is at least 1 hour and at most 30 days, starting no earlier than now
/// 5. Uses PDAs with proper seeds for treasury, entry ledger and prize pool
///
/// # Account Validations
/// * Lottery - New account initialized with proper space allocation
/// * Authority - Must be program authority stored in config account
/// * Treasury - New PDA initialized with seeds ["treasury", lottery_key]
/// * EntryLedger - New PDA initialized empty with seeds ["entries", lottery_key]
/// * PrizePool - New PDA initialized empty with seeds ["prize_pool", lottery_key]
/// * Config - PDA storing program authority
///
/// # Implementation Notes
/// - Initializes the lottery in Open state with zeroed counters
/// - The entry ledger and prize pool start empty and grow by realloc
/// - Randomness fields start unset; they are only touched by the draw
pub fn create_lottery(
    ctx: Context<CreateLottery>,
    metadata_uri: String,
    entry_fee: u64,
    start_time: i64,
    end_time: i64,
    max_entries: Option<u64>,
) -> Result<()> {
    let current_time = Clock::get()?.unix_timestamp;

    // Validate inputs
    // URI format check - must start with one of the valid prefixes
    require!(
        VALID_URI_PREFIXES
            .iter()
            .any(|prefix| metadata_uri.starts_with(prefix)),
        LotteryError::InvalidMetadataUri
    );
    require!(metadata_uri.len() <= 256, LotteryError::MetadataUriTooLong);

    // Fee checks
    require!(entry_fee >= MIN_ENTRY_FEE, LotteryError::EntryFeeTooLow);
    require!(entry_fee <= MAX_ENTRY_FEE, LotteryError::EntryFeeTooHigh);

    // Time checks: entries are accepted only inside [start_time, end_time)
    require!(start_time >= current_time, LotteryError::StartTimeInPast);
    require!(
        end_time >= start_time.checked_add(MIN_DURATION).ok_or(LotteryError::Overflow)?,
        LotteryError::EndTimeTooClose
    );
    require!(
        end_time <= start_time.checked_add(MAX_DURATION).ok_or(LotteryError::Overflow)?,
        LotteryError::DurationTooLong
    );

    let lottery = &mut ctx.accounts.lottery;
    lottery.metadata_uri = metadata_uri;
    lottery.entry_fee = entry_fee;
    lottery.start_time = start_time;
    lottery.end_time = end_time;
    lottery.creation_time = current_time;
    lottery.max_entries = max_entries;
    lottery.state = LotteryState::Open;
    lottery.entry_count = 0;
    lottery.total_slots = 0;
    lottery.frozen_entry_count = 0;
    lottery.frozen_slot_count = 0;
    lottery.closed_at = 0;
    lottery.prize_count = 0;
    lottery.randomness_account = None;
    lottery.randomness_commit_slot = 0;
    lottery.randomness_value = None;
    lottery.treasury = ctx.accounts.treasury.key();
    lottery.bump = ctx.bumps.lottery;

    ctx.accounts.treasury.lottery = ctx.accounts.lottery.key();
    ctx.accounts.treasury.bump = ctx.bumps.treasury;

    let entry_ledger = &mut ctx.accounts.entry_ledger;
    entry_ledger.lottery = ctx.accounts.lottery.key();
    entry_ledger.bump = ctx.bumps.entry_ledger;
    entry_ledger.records = Vec::new();

    let prize_pool = &mut ctx.accounts.prize_pool;
    prize_pool.lottery = ctx.accounts.lottery.key();
    prize_pool.bump = ctx.bumps.prize_pool;
    prize_pool.prizes = Vec::new();

    // Increment the lottery counter
    ctx.accounts.config.lottery_counter = ctx
        .accounts
        .config
        .lottery_counter
        .checked_add(1)
        .ok_or(LotteryError::Overflow)?;

    // Emit the lottery created event
    emit!(LotteryCreated {
        lottery: ctx.accounts.lottery.key(),
        metadata_uri: ctx.accounts.lottery.metadata_uri.clone(),
        entry_fee,
        start_time,
        end_time,
        creation_time: current_time,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CreateLottery<'info> {
    #[account(
        init,
        payer = management_authority,
        space = LOTTERY_ACCOUNT_SIZE,
        seeds = [
            b"lottery",
            config.lottery_counter.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub lottery: Account<'info, Lottery>,

    #[account(mut)]
    pub management_authority: Signer<'info>,

    #[account(
        init,
        payer = management_authority,
        space = TREASURY_ACCOUNT_SIZE,
        seeds = [
            b"treasury",
            lottery.key().as_ref(),
        ],
        bump,
    )]
    pub treasury: Account<'info, Treasury>,

    /// The append-only entry log; starts empty and grows per entry
    #[account(
        init,
        payer = management_authority,
        space = ENTRY_LEDGER_BASE_SIZE,
        seeds = [
            b"entries",
            lottery.key().as_ref(),
        ],
        bump,
    )]
    pub entry_ledger: Account<'info, EntryLedger>,

    /// The ranked prize list; starts empty and grows as prizes are added
    #[account(
        init,
        payer = management_authority,
        space = PRIZE_POOL_BASE_SIZE,
        seeds = [
            b"prize_pool",
            lottery.key().as_ref(),
        ],
        bump,
    )]
    pub prize_pool: Account<'info, PrizePool>,

    /// The config account storing upgrade, management and payout authorities, and lottery counter
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        has_one = management_authority @ LotteryError::NotProgramManagementAuthority,
    )]
    pub config: Account<'info, Config>,

    pub system_program: Program<'info, System>,
}
