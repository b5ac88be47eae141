use anchor_lang::prelude::*;

use crate::error::LotteryError;

// Space calculation:
// 8 (discriminator) +
// 4 (length of metadata_uri) +
// 256 (metadata_uri) +
// 8 (entry_fee) +
// 8 (start_time) +
// 8 (end_time) +
// 8 (creation_time) +
// 9 (max_entries: Option<u64>) +
// 1 (state) +
// 8 (entry_count) +
// 8 (total_slots) +
// 8 (frozen_entry_count) +
// 8 (frozen_slot_count) +
// 8 (closed_at) +
// 2 (prize_count) +
// 33 (randomness_account: Option<Pubkey>) +
// 8 (randomness_commit_slot) +
// 33 (randomness_value: Option<[u8; 32]>) +
// 32 (treasury) +
// 1 (bump) =
// 451 total bytes
pub const LOTTERY_ACCOUNT_SIZE: usize =
    8 + 4 + 256 + 8 + 8 + 8 + 9 + 1 + 8 + 8 + 8 + 8 + 8 + 2 + 33 + 8 + 33 + 32 + 1;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum LotteryState {
    Open = 0,
    Closed = 1,
    Drawing = 2,
    Completed = 3,
    Cancelled = 4,
}

#[account]
pub struct Lottery {
    pub metadata_uri: String,
    pub entry_fee: u64,
    pub start_time: i64,
    pub end_time: i64,
    pub creation_time: i64,
    pub max_entries: Option<u64>,
    pub state: LotteryState,
    /// Monotonic per-lottery counter; the next entry's sequence index.
    pub entry_count: u64,
    /// Running sum of entry weights; the next entry's slot start index.
    pub total_slots: u64,
    pub frozen_entry_count: u64,
    pub frozen_slot_count: u64,
    pub closed_at: i64,
    pub prize_count: u16,
    /// The committed randomness request. None until a draw is requested;
    /// replaced only by an operator retry while the draw is stuck.
    pub randomness_account: Option<Pubkey>,
    pub randomness_commit_slot: u64,
    /// Set exactly once, when the draw completes. Its presence guards the
    /// Drawing -> Completed transition against duplicate reveals.
    pub randomness_value: Option<[u8; 32]>,
    pub treasury: Pubkey,
    pub bump: u8,
}

impl Lottery {
    /// Entry admission check: state must be Open and the current time must
    /// fall within [start_time, end_time).
    pub fn assert_accepting_entries(&self, now: i64) -> Result<()> {
        require!(self.state == LotteryState::Open, LotteryError::LotteryNotOpen);
        require!(now >= self.start_time, LotteryError::EntryWindowNotStarted);
        require!(now < self.end_time, LotteryError::LotteryEnded);
        Ok(())
    }

    /// The ledger may only be frozen once the deadline has passed and the
    /// lottery is still Open. Repeated scheduler firings fail the state
    /// check and change nothing.
    pub fn assert_can_close(&self, now: i64) -> Result<()> {
        require!(self.state == LotteryState::Open, LotteryError::LotteryNotOpen);
        require!(now >= self.end_time, LotteryError::LotteryNotEnded);
        Ok(())
    }

    /// Prizes are frozen together with the draw inputs: additions are
    /// allowed while Open, or Closed before any randomness request.
    pub fn assert_can_add_prizes(&self) -> Result<()> {
        let pre_draw = self.state == LotteryState::Open
            || (self.state == LotteryState::Closed && self.randomness_account.is_none());
        require!(pre_draw, LotteryError::LotteryAlreadyStarted);
        Ok(())
    }

    /// Administrative cancellation is only permitted before a draw has
    /// been requested.
    pub fn assert_can_cancel(&self) -> Result<()> {
        let pre_draw = self.state == LotteryState::Open
            || (self.state == LotteryState::Closed && self.randomness_account.is_none());
        require!(pre_draw, LotteryError::CancelTooLate);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_lottery() -> Lottery {
        Lottery {
            metadata_uri: String::new(),
            entry_fee: 10,
            start_time: 1_000,
            end_time: 2_000,
            creation_time: 900,
            max_entries: None,
            state: LotteryState::Open,
            entry_count: 0,
            total_slots: 0,
            frozen_entry_count: 0,
            frozen_slot_count: 0,
            closed_at: 0,
            prize_count: 0,
            randomness_account: None,
            randomness_commit_slot: 0,
            randomness_value: None,
            treasury: Pubkey::default(),
            bump: 255,
        }
    }

    #[test]
    fn accepts_entries_inside_window() {
        let lottery = open_lottery();
        assert!(lottery.assert_accepting_entries(1_000).is_ok());
        assert!(lottery.assert_accepting_entries(1_999).is_ok());
    }

    #[test]
    fn rejects_entries_before_start() {
        let lottery = open_lottery();
        assert!(lottery.assert_accepting_entries(999).is_err());
    }

    #[test]
    fn rejects_entries_at_or_after_end() {
        let lottery = open_lottery();
        // end_time itself is outside the half-open window
        assert!(lottery.assert_accepting_entries(2_000).is_err());
        assert!(lottery.assert_accepting_entries(2_001).is_err());
    }

    #[test]
    fn rejects_entries_once_closed_even_inside_window() {
        let mut lottery = open_lottery();
        lottery.state = LotteryState::Closed;
        assert!(lottery.assert_accepting_entries(1_500).is_err());
    }

    #[test]
    fn close_requires_deadline() {
        let lottery = open_lottery();
        assert!(lottery.assert_can_close(1_999).is_err());
        assert!(lottery.assert_can_close(2_000).is_ok());
    }

    #[test]
    fn close_is_idempotent_via_state_check() {
        let mut lottery = open_lottery();
        lottery.state = LotteryState::Closed;
        assert!(lottery.assert_can_close(3_000).is_err());
    }

    #[test]
    fn prize_additions_frozen_once_draw_requested() {
        let mut lottery = open_lottery();
        assert!(lottery.assert_can_add_prizes().is_ok());

        lottery.state = LotteryState::Closed;
        assert!(lottery.assert_can_add_prizes().is_ok());

        lottery.randomness_account = Some(Pubkey::new_unique());
        assert!(lottery.assert_can_add_prizes().is_err());

        lottery.state = LotteryState::Drawing;
        assert!(lottery.assert_can_add_prizes().is_err());
    }

    #[test]
    fn cancellation_blocked_after_draw_request() {
        let mut lottery = open_lottery();
        assert!(lottery.assert_can_cancel().is_ok());

        lottery.state = LotteryState::Drawing;
        lottery.randomness_account = Some(Pubkey::new_unique());
        assert!(lottery.assert_can_cancel().is_err());
    }
}
