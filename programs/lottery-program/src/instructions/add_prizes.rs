use anchor_lang::prelude::*;

use crate::{
    error::LotteryError,
    state::{
        prize_pool::{Prize, PrizePool},
        Config, Lottery, Treasury,
    },
};

// Upper bound on the prize list; ranks stay small enough to draw in one
// transaction
pub const MAX_PRIZES: usize = 32;

/// One prize to append, in rank order
#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct PrizeInput {
    pub prize_id: u64,
    pub amount: u64,
}

/// Event emitted when prizes are added to a lottery's pool
#[event]
pub struct PrizesAdded {
    /// The pubkey of the lottery
    pub lottery: Pubkey,
    /// Number of prizes appended
    pub prize_count: u16,
    /// Rank assigned to the first appended prize
    pub first_rank: u16,
    /// Total lamports escrowed into the treasury for these prizes
    pub funded_amount: u64,
}

/// Instruction to append prizes to a lottery's pool, in rank order
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `prizes` - Prize ids and lamport amounts; appended ranks are dense
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates caller is the program management authority via config PDA
/// 2. Rejects additions once a draw has started (state Drawing or later,
///    or a randomness request already committed)
/// 3. Rejects empty input, zero amounts, duplicate prize ids and pools
///    beyond the maximum size
/// 4. Escrows the summed prize amounts into the treasury so every awarded
///    prize is fully funded before the draw can run
///
/// # Implementation Notes
/// - Ranks are implicit: the pool index is rank - 1, dense and gapless
/// - The prize pool account grows by realloc, paid by the authority
/// - The funding transfer is balance-verified like the entry fee transfer
pub fn add_prizes(ctx: Context<AddPrizes>, prizes: Vec<PrizeInput>) -> Result<()> {
    require!(!prizes.is_empty(), LotteryError::NoPrizesProvided);

    // Prizes are frozen together with the draw inputs
    ctx.accounts.lottery.assert_can_add_prizes()?;

    let pool = &mut ctx.accounts.prize_pool;
    let new_count = pool
        .prizes
        .len()
        .checked_add(prizes.len())
        .ok_or(LotteryError::Overflow)?;
    require!(new_count <= MAX_PRIZES, LotteryError::TooManyPrizes);

    let first_rank = pool.prizes.len() as u16 + 1;
    let mut funded_amount: u64 = 0;

    for input in &prizes {
        require!(input.amount > 0, LotteryError::InvalidPrizeAmount);
        require!(
            !pool.contains_prize_id(input.prize_id),
            LotteryError::DuplicatePrizeId
        );

        funded_amount = funded_amount
            .checked_add(input.amount)
            .ok_or(LotteryError::Overflow)?;

        pool.prizes.push(Prize {
            prize_id: input.prize_id,
            amount: input.amount,
            awarded_to: None,
            claimed: false,
            distribution_failed: false,
        });
    }

    ctx.accounts.lottery.prize_count = new_count as u16;

    // Store pre-transfer balance for verification
    let pre_transfer_balance = ctx.accounts.treasury.to_account_info().lamports();

    // Escrow the prize funding into the treasury
    anchor_lang::solana_program::program::invoke(
        &anchor_lang::solana_program::system_instruction::transfer(
            &ctx.accounts.management_authority.key(),
            &ctx.accounts.treasury.key(),
            funded_amount,
        ),
        &[
            ctx.accounts.management_authority.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
            ctx.accounts.treasury.to_account_info(),
        ],
    )?;

    // Verify the transfer was successful by checking treasury balance
    let post_transfer_balance = ctx.accounts.treasury.to_account_info().lamports();
    require!(
        post_transfer_balance
            == pre_transfer_balance
                .checked_add(funded_amount)
                .ok_or(LotteryError::Overflow)?,
        LotteryError::TransferFailed
    );

    emit!(PrizesAdded {
        lottery: ctx.accounts.lottery.key(),
        prize_count: prizes.len() as u16,
        first_rank,
        funded_amount,
    });

    Ok(())
}

/// Accounts required for the add_prizes instruction
#[derive(Accounts)]
#[instruction(prizes: Vec<PrizeInput>)]
pub struct AddPrizes<'info> {
    /// The lottery whose pool is being extended.
    /// Draw-state gating runs in the handler.
    #[account(mut)]
    pub lottery: Account<'info, Lottery>,

    /// The ranked prize list, grown by the appended prizes
    #[account(
        mut,
        seeds = [
            b"prize_pool",
            lottery.key().as_ref(),
        ],
        bump = prize_pool.bump,
        realloc = PrizePool::size_for(prize_pool.prizes.len() + prizes.len()),
        realloc::payer = management_authority,
        realloc::zero = false,
    )]
    pub prize_pool: Account<'info, PrizePool>,

    #[account(mut)]
    pub management_authority: Signer<'info>,

    /// Treasury escrowing the prize funding
    #[account(
        mut,
        seeds = [
            b"treasury",
            lottery.key().as_ref(),
        ],
        bump = treasury.bump,
        constraint = treasury.key() == lottery.treasury @ LotteryError::InvalidTreasury,
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
        seeds = [b"config"],
        bump = config.bump,
        has_one = management_authority @ LotteryError::NotProgramManagementAuthority,
    )]
    pub config: Account<'info, Config>,

    pub system_program: Program<'info, System>,
}
