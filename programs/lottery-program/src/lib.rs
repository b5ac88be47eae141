use anchor_lang::prelude::*;
use instructions::*;

pub mod error;
pub mod instructions;
pub mod state;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod lottery_program {
    use super::*;

    pub fn init_config(ctx: Context<InitConfig>) -> Result<()> {
        instructions::init_config::init_config(ctx)
    }

    pub fn create_lottery(
        ctx: Context<CreateLottery>,
        metadata_uri: String,
        entry_fee: u64,
        start_time: i64,
        end_time: i64,
        max_entries: Option<u64>,
    ) -> Result<()> {
        instructions::create_lottery::create_lottery(
            ctx,
            metadata_uri,
            entry_fee,
            start_time,
            end_time,
            max_entries,
        )
    }

    pub fn init_entry_balance(ctx: Context<InitEntryBalance>) -> Result<()> {
        instructions::init_entry_balance::init_entry_balance(ctx)
    }

    pub fn record_entry(
        ctx: Context<RecordEntry>,
        entry_count: u64,
        payment_ref: [u8; 8],
    ) -> Result<()> {
        instructions::record_entry::record_entry(ctx, entry_count, payment_ref)
    }

    pub fn add_prizes(ctx: Context<AddPrizes>, prizes: Vec<PrizeInput>) -> Result<()> {
        instructions::add_prizes::add_prizes(ctx, prizes)
    }

    pub fn close_entries(ctx: Context<CloseEntries>) -> Result<()> {
        instructions::close_entries::close_entries(ctx)
    }

    pub fn request_draw(ctx: Context<RequestDraw>) -> Result<()> {
        instructions::request_draw::request_draw(ctx)
    }

    pub fn finalize_draw(ctx: Context<FinalizeDraw>) -> Result<()> {
        instructions::finalize_draw::finalize_draw(ctx)
    }

    pub fn distribute_prize(ctx: Context<DistributePrize>, rank: u16) -> Result<()> {
        instructions::distribute_prize::distribute_prize(ctx, rank)
    }

    pub fn mark_distribution_failed(
        ctx: Context<MarkDistributionFailed>,
        rank: u16,
    ) -> Result<()> {
        instructions::mark_distribution_failed::mark_distribution_failed(ctx, rank)
    }

    pub fn cancel_lottery(ctx: Context<CancelLottery>) -> Result<()> {
        instructions::cancel_lottery::cancel_lottery(ctx)
    }

    pub fn claim_refund(ctx: Context<ClaimRefund>) -> Result<()> {
        instructions::claim_refund::claim_refund(ctx)
    }

    pub fn withdraw_from_treasury(ctx: Context<WithdrawFromTreasury>) -> Result<()> {
        instructions::withdraw_from_treasury::withdraw_from_treasury(ctx)
    }
}
