use anchor_lang::prelude::*;

// 8 discriminator + 32 lottery + 32 randomness_value + 8 drawn_at + 1 bump + 4 vec length
pub const DRAW_RESULT_BASE_SIZE: usize = 8 + 32 + 32 + 8 + 1 + 4;

// 2 rank + 8 prize_id + 32 participant + 8 winning_slot + 8 entry_sequence_index
pub const WINNER_SIZE: usize = 2 + 8 + 32 + 8 + 8;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, PartialEq, Eq, Debug)]
pub struct Winner {
    pub rank: u16,
    pub prize_id: u64,
    pub participant: Pubkey,
    pub winning_slot: u64,
    pub entry_sequence_index: u64,
}

/// The audit record of a completed draw, in rank order. Created exactly
/// once by the draw transition (the account init makes a second creation
/// impossible) and never mutated afterward; distribution failures are
/// recorded on the prize pool, not here.
#[account]
pub struct DrawResult {
    pub lottery: Pubkey,
    pub randomness_value: [u8; 32],
    pub drawn_at: i64,
    pub bump: u8,
    pub winners: Vec<Winner>,
}

impl DrawResult {
    pub fn size_for(winner_count: usize) -> usize {
        DRAW_RESULT_BASE_SIZE + winner_count * WINNER_SIZE
    }
}
