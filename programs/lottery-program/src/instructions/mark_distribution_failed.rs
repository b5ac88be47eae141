use anchor_lang::prelude::*;

use crate::{
    error::LotteryError,
    state::{Config, Lottery, LotteryState, PrizePool},
};

/// Event emitted when a prize is flagged for manual reconciliation
#[event]
pub struct PrizeDistributionFailed {
    /// The pubkey of the lottery
    pub lottery: Pubkey,
    /// The prize's rank
    pub rank: u16,
    /// The affected prize id
    pub prize_id: u64,
    /// The winner the transfer kept failing for
    pub winner: Pubkey,
}

/// Instruction to mark a drawn prize as failed after the distribution
/// crank has exhausted its retries
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates caller is the program management authority via config PDA
/// 2. Validates the lottery draw has completed
/// 3. Requires the prize to be awarded and still unclaimed
///
/// # Implementation Notes
/// - The prize stays unclaimed; the flag only surfaces it for manual
///   operator reconciliation and stops further distribution attempts
/// - The DrawResult is never altered; who won remains on record
pub fn mark_distribution_failed(ctx: Context<MarkDistributionFailed>, rank: u16) -> Result<()> {
    require!(
        ctx.accounts.lottery.state == LotteryState::Completed,
        LotteryError::LotteryNotCompleted
    );

    let prize = ctx
        .accounts
        .prize_pool
        .prize_at_rank_mut(rank)
        .ok_or(LotteryError::InvalidPrizeRank)?;

    let winner_key = prize.awarded_to.ok_or(LotteryError::PrizeNotAwarded)?;
    require!(!prize.claimed, LotteryError::PrizeAlreadyClaimed);
    require!(!prize.distribution_failed, LotteryError::PrizeMarkedFailed);

    prize.distribution_failed = true;
    let prize_id = prize.prize_id;

    msg!("Prize rank {} flagged for manual reconciliation", rank);

    // Emit the distribution failed event
    emit!(PrizeDistributionFailed {
        lottery: ctx.accounts.lottery.key(),
        rank,
        prize_id,
        winner: winner_key,
    });

    Ok(())
}

/// Accounts required for the mark_distribution_failed instruction
#[derive(Accounts)]
pub struct MarkDistributionFailed<'info> {
    /// The lottery whose prize distribution failed
    pub lottery: Account<'info, Lottery>,

    /// The ranked prize list carrying the failure flags
    #[account(
        mut,
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
        seeds = [b"config"],
        bump = config.bump,
        has_one = management_authority @ LotteryError::NotProgramManagementAuthority,
    )]
    pub config: Account<'info, Config>,
}
