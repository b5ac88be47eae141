use anchor_lang::prelude::*;

use crate::{
    error::LotteryError,
    state::{Lottery, LotteryState, PrizePool, Treasury},
};

/// Event emitted when a prize is paid out to its winner
#[event]
pub struct PrizeDistributed {
    /// The pubkey of the lottery
    pub lottery: Pubkey,
    /// The prize's rank
    pub rank: u16,
    /// The distributed prize id
    pub prize_id: u64,
    /// The winner receiving the prize
    pub winner: Pubkey,
    /// Amount paid in lamports
    pub amount: u64,
}

/// Instruction to pay one drawn prize from the treasury to its winner
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `rank` - The 1-based rank of the prize to distribute
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates the lottery draw has completed
/// 2. Requires the prize to be awarded, unclaimed and not marked failed
/// 3. Requires the passed winner account to match the drawn participant
/// 4. Verifies the treasury account matches the one stored in the lottery
///
/// # Implementation Notes
/// - Permissionless: an off-chain crank drives distribution and owns the
///   retry/backoff schedule; a failed transaction leaves the prize
///   unclaimed and retryable
/// - The claimed flag is set before the lamport movement, and both abort
///   together if the transfer fails
/// - The DrawResult is never touched by distribution
pub fn distribute_prize(ctx: Context<DistributePrize>, rank: u16) -> Result<()> {
    require!(
        ctx.accounts.lottery.state == LotteryState::Completed,
        LotteryError::LotteryNotCompleted
    );
    require!(
        ctx.accounts.treasury.key() == ctx.accounts.lottery.treasury.key(),
        LotteryError::InvalidTreasury
    );

    let prize = ctx
        .accounts
        .prize_pool
        .prize_at_rank_mut(rank)
        .ok_or(LotteryError::InvalidPrizeRank)?;

    let winner_key = prize.awarded_to.ok_or(LotteryError::PrizeNotAwarded)?;
    require!(!prize.claimed, LotteryError::PrizeAlreadyClaimed);
    require!(!prize.distribution_failed, LotteryError::PrizeMarkedFailed);
    require!(
        ctx.accounts.winner.key() == winner_key,
        LotteryError::WinnerMismatch
    );

    let amount = prize.amount;
    let prize_id = prize.prize_id;
    // Update state before performing the transfer; both commit or abort
    // together
    prize.claimed = true;

    // Transfer lamports by directly deducting from treasury and adding to
    // the winner. This only works because the treasury is a PDA owned by
    // our program.
    ctx.accounts.treasury.to_account_info().sub_lamports(amount)?;
    ctx.accounts.winner.to_account_info().add_lamports(amount)?;

    // Emit the prize distributed event
    emit!(PrizeDistributed {
        lottery: ctx.accounts.lottery.key(),
        rank,
        prize_id,
        winner: winner_key,
        amount,
    });

    Ok(())
}

/// Accounts required for the distribute_prize instruction
#[derive(Accounts)]
pub struct DistributePrize<'info> {
    /// The lottery whose prize is being paid out
    pub lottery: Account<'info, Lottery>,

    /// The ranked prize list carrying the claim flags
    #[account(
        mut,
        seeds = [
            b"prize_pool",
            lottery.key().as_ref(),
        ],
        bump = prize_pool.bump,
    )]
    pub prize_pool: Account<'info, PrizePool>,

    /// The winner receiving the prize.
    /// CHECK: Must equal the participant recorded by the draw; validated
    /// in the handler.
    #[account(mut)]
    pub winner: UncheckedAccount<'info>,

    /// Whoever cranks the distribution
    pub signer: Signer<'info>,

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

    /// Required by Anchor for transfers
    pub system_program: Program<'info, System>,
}
