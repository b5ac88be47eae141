use anchor_lang::prelude::*;

use crate::{
    error::LotteryError,
    state::{Config, Lottery, LotteryState},
};

/// Event emitted when a lottery is cancelled
#[event]
pub struct LotteryCancelled {
    /// The pubkey of the cancelled lottery
    pub lottery: Pubkey,
    /// The timestamp when the lottery was cancelled
    pub cancelled_at: i64,
    /// The number of entries recorded up to cancellation
    pub entry_count: u64,
}

/// Instruction to cancel a lottery before its draw starts
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates caller is the program management authority via config PDA
/// 2. Ensures no draw has been requested yet (state Open, or Closed with
///    no committed randomness); a lottery that reached Drawing can no
///    longer be cancelled
///
/// # Implementation Notes
/// - Cancelled is terminal; no further state changes are permitted
/// - Entry fees stay escrowed in the treasury; participants reclaim them
///   individually via claim_refund
/// - No funds are transferred in this instruction
pub fn cancel_lottery(ctx: Context<CancelLottery>) -> Result<()> {
    let clock = Clock::get()?;
    let lottery = &mut ctx.accounts.lottery;

    lottery.assert_can_cancel()?;

    lottery.state = LotteryState::Cancelled;

    // Emit the lottery cancelled event
    emit!(LotteryCancelled {
        lottery: lottery.key(),
        cancelled_at: clock.unix_timestamp,
        entry_count: lottery.entry_count,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CancelLottery<'info> {
    #[account(mut)]
    pub lottery: Account<'info, Lottery>,

    #[account(mut)]
    pub management_authority: Signer<'info>,

    #[account(
        seeds = [b"config"],
        bump = config.bump,
        has_one = management_authority @ LotteryError::NotProgramManagementAuthority,
    )]
    pub config: Account<'info, Config>,
}
