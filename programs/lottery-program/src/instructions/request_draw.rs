use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::{
    error::LotteryError,
    state::{Config, Lottery, LotteryState},
};

// How many slots a committed request may sit unrevealed before the
// operator is allowed to swap in a fresh randomness account
pub const RANDOMNESS_TIMEOUT_SLOTS: u64 = 300;

/// Event emitted when a draw is started and randomness is requested
#[event]
pub struct DrawStarted {
    /// The pubkey of the lottery
    pub lottery: Pubkey,
    /// The committed randomness account (the request id)
    pub randomness_account: Pubkey,
    /// The slot at which the request was committed
    pub commit_slot: u64,
    /// True when this request replaces a stale one
    pub retry: bool,
}

/// Instruction to move a lottery into Drawing by committing a randomness
/// request
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates caller is the program management authority via config PDA
/// 2. From Closed: requires a non-empty frozen ledger and a non-empty
///    prize pool
/// 3. From Drawing: only as a retry, when no value has been consumed and
///    the current commitment has been stale for RANDOMNESS_TIMEOUT_SLOTS
/// 4. Requires the randomness account to be committed to the current slot
///    (seed slot == current slot - 1), so a pre-revealed value can never
///    be smuggled in
///
/// # Implementation Notes
/// - The committed account's pubkey is the durable request id; a crash or
///   requester disconnect leaves the lottery recoverably in Drawing
/// - A replaced (stale) request id is simply never matched by the
///   finalize instruction
pub fn request_draw(ctx: Context<RequestDraw>) -> Result<()> {
    let clock = Clock::get()?;
    let lottery = &mut ctx.accounts.lottery;

    let retry = match lottery.state {
        LotteryState::Closed => {
            require!(lottery.frozen_entry_count > 0, LotteryError::NoEntries);
            require!(lottery.prize_count > 0, LotteryError::NoPrizes);
            false
        }
        LotteryState::Drawing => {
            // Operator retry of a stuck draw: the previous request id is
            // abandoned and never matched again
            require!(
                lottery.randomness_value.is_none(),
                LotteryError::DrawAlreadyCompleted
            );
            let stale_after = lottery
                .randomness_commit_slot
                .checked_add(RANDOMNESS_TIMEOUT_SLOTS)
                .ok_or(LotteryError::Overflow)?;
            require!(clock.slot > stale_after, LotteryError::DrawNotRetryable);
            true
        }
        _ => return Err(LotteryError::LotteryNotClosed.into()),
    };

    // The randomness account must be committed, not yet revealed
    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| LotteryError::InvalidRandomnessAccount)?;
    require!(
        randomness_data.seed_slot == clock.slot - 1,
        LotteryError::RandomnessAlreadyRevealed
    );

    lottery.randomness_account = Some(ctx.accounts.randomness_account_data.key());
    lottery.randomness_commit_slot = clock.slot;
    lottery.state = LotteryState::Drawing;

    // Emit the draw started event
    emit!(DrawStarted {
        lottery: lottery.key(),
        randomness_account: ctx.accounts.randomness_account_data.key(),
        commit_slot: clock.slot,
        retry,
    });

    Ok(())
}

/// Accounts required for the request_draw instruction
#[derive(Accounts)]
pub struct RequestDraw<'info> {
    /// The lottery to start drawing.
    /// State preconditions run in the handler (Closed, or stale Drawing)
    #[account(mut)]
    pub lottery: Account<'info, Lottery>,

    #[account(mut)]
    pub management_authority: Signer<'info>,

    /// Randomness account from Switchboard.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,

    #[account(
        seeds = [b"config"],
        bump = config.bump,
        has_one = management_authority @ LotteryError::NotProgramManagementAuthority,
    )]
    pub config: Account<'info, Config>,
}
