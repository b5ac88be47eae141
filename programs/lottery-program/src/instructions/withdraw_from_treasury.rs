use anchor_lang::prelude::*;

use crate::{
    error::LotteryError,
    state::{Config, Lottery, LotteryState, PrizePool, Treasury, TREASURY_ACCOUNT_SIZE},
};

/// Event emitted when treasury funds are withdrawn
#[event]
pub struct TreasuryWithdrawn {
    /// The pubkey of the lottery
    pub lottery: Pubkey,
    /// Amount withdrawn in lamports
    pub amount: u64,
}

/// Instruction to withdraw the residual treasury balance to the payout
/// authority once a lottery has completed
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates the lottery draw has completed
/// 2. Requires every awarded prize to be distributed or marked failed,
///    so winner funds can never be swept out from under a pending claim
/// 3. Verifies the signer is the management authority and the payout
///    authority matches the config
/// 4. Ensures treasury account matches the one stored in the lottery
///
/// # Implementation Notes
/// - The residual is entry-fee revenue plus funding for unawarded or
///   failed prizes; failed prizes are reconciled manually by the operator
/// - Leaves the rent-exempt minimum in the treasury account
pub fn withdraw_from_treasury(ctx: Context<WithdrawFromTreasury>) -> Result<()> {
    require!(
        ctx.accounts.lottery.state == LotteryState::Completed,
        LotteryError::LotteryNotCompleted
    );
    // Every awarded prize must be claimed or flagged before the sweep
    require!(
        ctx.accounts.prize_pool.all_resolved(),
        LotteryError::PrizesUnresolved
    );
    // Verify treasury account matches the one stored in the lottery
    require!(
        ctx.accounts.treasury.key() == ctx.accounts.lottery.treasury,
        LotteryError::InvalidTreasury
    );
    let treasury_account = ctx.accounts.treasury.to_account_info();
    let payout_authority = ctx.accounts.payout_authority.to_account_info();

    // Get total balance including rent
    let treasury_balance = treasury_account.lamports();
    require!(treasury_balance > 0, LotteryError::InsufficientFunds);

    // Keep the rent-exempt minimum so the treasury account stays alive
    let rent_lamports = (Rent::get()?).minimum_balance(TREASURY_ACCOUNT_SIZE);
    let lamports_to_withdraw = treasury_balance
        .checked_sub(rent_lamports)
        .ok_or(LotteryError::InsufficientFunds)?;

    // Transfer lamports by directly deducting from treasury and adding to
    // payout_authority. This only works because the treasury is a PDA
    // owned by our program.
    treasury_account.sub_lamports(lamports_to_withdraw)?;
    payout_authority.add_lamports(lamports_to_withdraw)?;

    // Emit the treasury withdrawn event
    emit!(TreasuryWithdrawn {
        lottery: ctx.accounts.lottery.key(),
        amount: lamports_to_withdraw,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct WithdrawFromTreasury<'info> {
    pub lottery: Account<'info, Lottery>,

    /// The prize pool consulted for the resolution check
    #[account(
        seeds = [
            b"prize_pool",
            lottery.key().as_ref(),
        ],
        bump = prize_pool.bump,
    )]
    pub prize_pool: Account<'info, PrizePool>,

    #[account(mut)]
    pub management_authority: Signer<'info>,

    #[account(
        mut,
        seeds = [
            b"treasury",
            lottery.key().as_ref(),
        ],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
        seeds = [b"config"],
        bump = config.bump,
        has_one = management_authority @ LotteryError::NotProgramManagementAuthority,
        has_one = payout_authority @ LotteryError::NotPayoutAuthority
    )]
    pub config: Account<'info, Config>,

    pub system_program: Program<'info, System>,

    #[account(mut)]
    pub payout_authority: SystemAccount<'info>,
}
