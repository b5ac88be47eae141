use anchor_lang::prelude::*;

use crate::{
    error::LotteryError,
    state::{EntryBalance, Lottery, LotteryState, ENTRY_BALANCE_ACCOUNT_SIZE},
};

/// Initializes a new entry balance account for a participant in a specific
/// lottery. This account aggregates how many entry units the participant
/// holds and how much they have paid, which is the amount refunded if the
/// lottery is cancelled.
/// The account is PDA-derived using ["entry_balance", lottery_pubkey, user_pubkey].
///
/// # Events
/// None
///
/// # State Changes
/// - Creates a new `EntryBalance` account
/// - Initializes owner to signer's pubkey
/// - Sets initial entry_count and amount_paid to 0
/// - Stores the PDA bump
///
/// # Access Control
/// - Anyone can initialize their own entry balance account
/// - One entry balance account per participant per lottery
///
/// # Lifecycle
/// - Created before the participant's first entry
/// - Closed when a refund is claimed after cancellation
pub fn init_entry_balance(ctx: Context<InitEntryBalance>) -> Result<()> {
    // Verify lottery is still accepting participants
    require!(
        ctx.accounts.lottery.state == LotteryState::Open,
        LotteryError::LotteryNotOpen
    );

    let entry_balance = &mut ctx.accounts.entry_balance;
    entry_balance.owner = ctx.accounts.signer.key();
    entry_balance.entry_count = 0;
    entry_balance.amount_paid = 0;
    entry_balance.bump = ctx.bumps.entry_balance;

    Ok(())
}

#[derive(Accounts)]
pub struct InitEntryBalance<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        init,
        payer = signer,
        space = ENTRY_BALANCE_ACCOUNT_SIZE,
        seeds = [
            b"entry_balance",
            lottery.key().as_ref(),
            signer.key().as_ref(),
        ],
        bump,
    )]
    pub entry_balance: Account<'info, EntryBalance>,

    pub lottery: Account<'info, Lottery>,
    pub system_program: Program<'info, System>,
}
