use anchor_lang::prelude::*;

use crate::{
    error::LotteryError,
    state::{
        entry_ledger::{EntryLedger, EntryRecord},
        lottery::Lottery,
        EntryBalance, Treasury,
    },
};

/// Event emitted when a paid entry is recorded
#[event]
pub struct EntryRecorded {
    /// The pubkey of the lottery
    pub lottery: Pubkey,
    /// The participant's address
    pub participant: Pubkey,
    /// Number of entry units (weighted slots) purchased
    pub entry_count: u64,
    /// Total amount paid in lamports
    pub payment_amount: u64,
    /// Position of this entry in the ledger's total order
    pub sequence_index: u64,
    /// First slot index covered by this entry
    pub slot_start_index: u64,
    /// The payment reference attached to this entry
    pub payment_ref: [u8; 8],
}

/// Instruction to record a paid entry into a lottery
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `entry_count` - The number of entry units to record (each is one slot of chance)
/// * `payment_ref` - Caller-supplied payment reference, unique per lottery
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates the lottery is Open and the clock is inside [start_time, end_time)
/// 2. Validates entry count is greater than 0
/// 3. Rejects a payment reference that was already recorded
/// 4. If the lottery has an entry cap, ensures the cap is not exceeded
/// 5. Ensures the participant has sufficient funds for the fee
/// 6. Verifies the treasury account matches the one stored in the lottery
///
/// # Account Validations
/// * Lottery - Sequence and slot counters are bumped here
/// * EntryLedger - Grown by exactly one record via realloc
/// * EntryBalance - Existing PDA aggregating the participant's entries
/// * Signer - Must have sufficient funds for the fee
/// * Treasury - Must match lottery's treasury and uses proper PDA seeds
///
/// # Implementation Notes
/// - The counter bumps, the ledger append and the fee transfer commit or
///   abort as one transaction, so no entry can be half-recorded and two
///   entries can never share a sequence index
/// - Uses checked arithmetic operations to prevent overflow
/// - Verifies the fee transfer by comparing treasury balances
pub fn record_entry(
    ctx: Context<RecordEntry>,
    entry_count: u64,
    payment_ref: [u8; 8],
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    // Admission: Open state, inside the entry window
    ctx.accounts.lottery.assert_accepting_entries(now)?;

    // Validate entry count
    require!(entry_count > 0, LotteryError::InvalidEntryCount);

    // One ledger record per payment; a resubmitted reference is rejected
    require!(
        !ctx.accounts.entry_ledger.contains_payment_ref(&payment_ref),
        LotteryError::DuplicatePaymentRef
    );

    // Check the entry cap, if one was set
    if let Some(max_entries) = ctx.accounts.lottery.max_entries {
        require!(
            ctx.accounts.lottery.entry_count < max_entries,
            LotteryError::MaxEntriesReached
        );
    }

    // Calculate payment amount with overflow protection
    let payment_amount = entry_count
        .checked_mul(ctx.accounts.lottery.entry_fee)
        .ok_or(LotteryError::Overflow)?;

    // Validate participant has sufficient funds using checked comparison
    require!(
        ctx.accounts.signer.lamports()
            .checked_sub(payment_amount)
            .ok_or(LotteryError::InsufficientFunds)? > 0,
        LotteryError::InsufficientFunds,
    );

    // Ensure treasury account matches the one stored in the lottery
    require!(
        ctx.accounts.treasury.key() == ctx.accounts.lottery.treasury.key(),
        LotteryError::InvalidTreasury,
    );

    // Verify entry balance account is initialized for this participant
    require!(
        ctx.accounts.entry_balance.owner == ctx.accounts.signer.key(),
        LotteryError::EntryBalanceNotInitialized,
    );

    // Append the record; the sequence index is the lottery-scoped counter
    // and the slot start index continues the flattened slot space
    let sequence_index = ctx.accounts.lottery.entry_count;
    let slot_start_index = ctx.accounts.lottery.total_slots;
    ctx.accounts.entry_ledger.records.push(EntryRecord {
        participant: ctx.accounts.signer.key(),
        entry_count,
        sequence_index,
        slot_start_index,
        payment_ref,
    });

    // Bump the sequence counter and the slot total with checked arithmetic
    ctx.accounts.lottery.entry_count = sequence_index
        .checked_add(1)
        .ok_or(LotteryError::Overflow)?;
    ctx.accounts.lottery.total_slots = slot_start_index
        .checked_add(entry_count)
        .ok_or(LotteryError::Overflow)?;

    // Update the participant's aggregate with overflow protection
    let entry_balance = &mut ctx.accounts.entry_balance;
    entry_balance.entry_count = entry_balance
        .entry_count
        .checked_add(entry_count)
        .ok_or(LotteryError::Overflow)?;
    entry_balance.amount_paid = entry_balance
        .amount_paid
        .checked_add(payment_amount)
        .ok_or(LotteryError::Overflow)?;

    // Store pre-transfer balance for verification
    let pre_transfer_balance = ctx.accounts.treasury.to_account_info().lamports();

    // Transfer the fee from the participant to the lottery treasury
    anchor_lang::solana_program::program::invoke(
        &anchor_lang::solana_program::system_instruction::transfer(
            &ctx.accounts.signer.key(),
            &ctx.accounts.treasury.key(),
            payment_amount,
        ),
        &[
            ctx.accounts.signer.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
            ctx.accounts.treasury.to_account_info(),
        ],
    )?;

    // Verify the transfer was successful by checking treasury balance
    let post_transfer_balance = ctx.accounts.treasury.to_account_info().lamports();
    require!(
        post_transfer_balance == pre_transfer_balance.checked_add(payment_amount).ok_or(LotteryError::Overflow)?,
        LotteryError::TransferFailed
    );

    // Emit the entry recorded event
    emit!(EntryRecorded {
        lottery: ctx.accounts.lottery.key(),
        participant: ctx.accounts.signer.key(),
        entry_count,
        payment_amount,
        sequence_index,
        slot_start_index,
        payment_ref,
    });

    Ok(())
}

/// Accounts required for the record_entry instruction
#[derive(Accounts)]
#[instruction(entry_count: u64, payment_ref: [u8; 8])]
pub struct RecordEntry<'info> {
    /// The lottery the entry is recorded against.
    /// State and entry-window checks run in the handler.
    #[account(mut)]
    pub lottery: Account<'info, Lottery>,

    /// The append-only entry log, grown by one record
    #[account(
        mut,
        seeds = [
            b"entries",
            lottery.key().as_ref(),
        ],
        bump = entry_ledger.bump,
        realloc = EntryLedger::size_for(entry_ledger.records.len() + 1),
        realloc::payer = signer,
        realloc::zero = false,
    )]
    pub entry_ledger: Account<'info, EntryLedger>,

    /// Participant's aggregate balance account
    /// PDA with seeds ["entry_balance", lottery_key, signer_key]
    #[account(
        mut,
        seeds = [
            b"entry_balance",
            lottery.key().as_ref(),
            signer.key().as_ref()
        ],
        bump = entry_balance.bump
    )]
    pub entry_balance: Account<'info, EntryBalance>,

    /// The participant recording the entry and paying the fee
    #[account(mut)]
    pub signer: Signer<'info>,

    /// Required for the fee transfer and the ledger realloc
    pub system_program: Program<'info, System>,

    /// Treasury account that receives the entry fee
    /// PDA with seeds ["treasury", lottery_key]
    #[account(
        mut,
        seeds = [
            b"treasury",
            lottery.key().as_ref(),
        ],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,
}
