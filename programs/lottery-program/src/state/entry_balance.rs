use anchor_lang::prelude::*;

// 8 discriminator + 32 owner + 8 entry_count + 8 amount_paid + 1 bump
pub const ENTRY_BALANCE_ACCOUNT_SIZE: usize = 8 + 32 + 8 + 8 + 1;

/// Per-participant aggregate for one lottery. `amount_paid` is the refund
/// owed if the lottery is cancelled; the account is closed when the refund
/// is claimed so it can pay out at most once.
#[account]
pub struct EntryBalance {
    pub owner: Pubkey,
    pub entry_count: u64,
    pub amount_paid: u64,
    pub bump: u8,
}
