use anchor_lang::prelude::*;

use crate::state::{Lottery, LotteryState};

/// Event emitted when a lottery's entry window is closed
#[event]
pub struct LotteryClosed {
    /// The pubkey of the closed lottery
    pub lottery: Pubkey,
    /// The timestamp when entries were frozen
    pub closed_at: i64,
    /// The frozen number of entry records
    pub frozen_entry_count: u64,
    /// The frozen number of weighted slots
    pub frozen_slot_count: u64,
}

/// Instruction to close a lottery's entry window once its deadline passes
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Ensures the lottery is in Open state
/// 2. Verifies the lottery's end time has passed
///
/// # Implementation Notes
/// - Permissionless: any scheduler or crank may fire it, and repeated
///   firings fail the state precondition without effect
/// - Freezes the ledger by snapshotting the entry and slot counters; an
///   in-flight entry either commits before this transaction or fails its
///   own Open-state check afterwards
/// - No funds move in this instruction
pub fn close_entries(ctx: Context<CloseEntries>) -> Result<()> {
    let clock = Clock::get()?;
    let lottery = &mut ctx.accounts.lottery;

    lottery.assert_can_close(clock.unix_timestamp)?;

    lottery.frozen_entry_count = lottery.entry_count;
    lottery.frozen_slot_count = lottery.total_slots;
    lottery.closed_at = clock.unix_timestamp;
    lottery.state = LotteryState::Closed;

    // Emit the lottery closed event
    emit!(LotteryClosed {
        lottery: lottery.key(),
        closed_at: lottery.closed_at,
        frozen_entry_count: lottery.frozen_entry_count,
        frozen_slot_count: lottery.frozen_slot_count,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CloseEntries<'info> {
    #[account(mut)]
    pub lottery: Account<'info, Lottery>,
}
