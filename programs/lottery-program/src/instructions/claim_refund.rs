use anchor_lang::prelude::*;

use crate::{
    error::LotteryError,
    state::{EntryBalance, Lottery, LotteryState, Treasury},
};

/// Event emitted when a participant reclaims their entry fees
#[event]
pub struct RefundClaimed {
    /// The pubkey of the cancelled lottery
    pub lottery: Pubkey,
    /// The refunded participant
    pub participant: Pubkey,
    /// Amount refunded in lamports
    pub amount: u64,
}

/// Instruction to reclaim entry fees paid into a cancelled lottery
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates the lottery is in Cancelled state
/// 2. Ensures signer is the owner of the entry balance
/// 3. Verifies the treasury account matches the one stored in the lottery
/// 4. Confirms the participant holds at least one entry
///
/// # Implementation Notes
/// - Refunds the exact amount the participant paid across all entries
/// - Closes the entry balance account and reclaims rent, so a refund can
///   be claimed at most once
/// - Funds transfer happens directly between PDAs
pub fn claim_refund(ctx: Context<ClaimRefund>) -> Result<()> {
    require!(
        ctx.accounts.lottery.state == LotteryState::Cancelled,
        LotteryError::LotteryNotCancelled
    );
    require!(
        ctx.accounts.signer.key() == ctx.accounts.entry_balance.owner,
        LotteryError::OwnerMismatch
    );
    require!(
        ctx.accounts.lottery.treasury.key() == ctx.accounts.treasury.key(),
        LotteryError::InvalidTreasury
    );
    require!(
        ctx.accounts.entry_balance.entry_count > 0,
        LotteryError::NoEntriesOwned
    );

    let from_pubkey = ctx.accounts.treasury.to_account_info();
    let to_pubkey = ctx.accounts.signer.to_account_info();

    // Transfer lamports by directly deducting from treasury and adding to
    // the signer. This only works because the treasury is a PDA owned by
    // our program.
    let refund_amount = ctx.accounts.entry_balance.amount_paid;
    from_pubkey.sub_lamports(refund_amount)?;
    to_pubkey.add_lamports(refund_amount)?;

    // Emit the refund claimed event
    emit!(RefundClaimed {
        lottery: ctx.accounts.lottery.key(),
        participant: ctx.accounts.signer.key(),
        amount: refund_amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ClaimRefund<'info> {
    /// The participant reclaiming their entry fees
    #[account(mut)]
    pub signer: Signer<'info>,

    /// Entry balance PDA for this participant in this lottery
    /// Account is closed and rent is reclaimed
    #[account(
        mut,
        close = signer,
        seeds = [
            b"entry_balance",
            lottery.key().as_ref(),
            signer.key().as_ref()
        ],
        bump = entry_balance.bump
    )]
    pub entry_balance: Account<'info, EntryBalance>,

    /// The lottery account that must be in Cancelled state
    pub lottery: Account<'info, Lottery>,

    /// Required by Anchor for transfers
    pub system_program: Program<'info, System>,

    /// Treasury PDA for this lottery that holds the funds
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
