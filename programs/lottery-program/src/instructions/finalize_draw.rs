use anchor_lang::prelude::*;
use arrayref::array_ref;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::{
    error::LotteryError,
    state::{
        draw_result::{DrawResult, Winner},
        lottery::{Lottery, LotteryState},
        EntryLedger, PrizePool,
    },
};

/// Event emitted when a draw completes
#[event]
pub struct DrawCompleted {
    /// The pubkey of the lottery
    pub lottery: Pubkey,
    /// Number of prizes awarded
    pub winner_count: u16,
    /// The timestamp when the draw completed
    pub drawn_at: i64,
}

/// Event emitted once per awarded prize, in rank order
#[event]
pub struct WinnerAnnounced {
    /// The pubkey of the lottery
    pub lottery: Pubkey,
    /// The prize's rank (1-based, rank 1 drawn first)
    pub rank: u16,
    /// The awarded prize id
    pub prize_id: u64,
    /// The winning participant
    pub participant: Pubkey,
    /// The absolute slot that won
    pub winning_slot: u64,
    /// The sequence index of the winning entry
    pub entry_sequence_index: u64,
}

/// Completes a lottery draw by consuming the committed randomness reveal
/// and mapping it onto the frozen ledger.
///
/// Execution requirements:
/// 1. The lottery must be in Drawing state
/// 2. The passed randomness account must match the committed request; a
///    reveal for a stale or foreign request is rejected without effect
/// 3. No randomness value may have been consumed yet; a duplicate reveal
///    for an already-completed draw is rejected without effect
/// 4. The oracle must have resolved the reveal; otherwise the lottery
///    stays in Drawing and the reveal can be retried
///
/// Winner selection is a pure function of the revealed value, the frozen
/// ledger and the prize count (see `select_winning_slots`), so any third
/// party holding the revealed value can recompute and audit the result.
///
/// After execution:
/// - The DrawResult account holds the winners in rank order (created
///   exactly once; the account init makes a second creation impossible)
/// - Each drawn prize carries its winner in `awarded_to`
/// - The lottery state is Completed and the randomness value is pinned
///
/// # Errors
/// - `LotteryNotDrawing` if no draw is in progress
/// - `IncorrectRandomnessAccount` if the reveal is for another request
/// - `DrawAlreadyCompleted` if a value was already consumed
/// - `RandomnessNotResolved` if the oracle has not (validly) revealed yet
pub fn finalize_draw(ctx: Context<FinalizeDraw>) -> Result<()> {
    let clock = Clock::get()?;
    let lottery = &mut ctx.accounts.lottery;

    // Exactly-once guard: a duplicate reveal arriving after completion is
    // a rejected no-op, detected by the value already being set
    require!(
        lottery.randomness_value.is_none(),
        LotteryError::DrawAlreadyCompleted
    );
    require!(
        lottery.state == LotteryState::Drawing,
        LotteryError::LotteryNotDrawing
    );
    // Only the reveal for the currently committed request id counts
    let committed = lottery
        .randomness_account
        .ok_or(LotteryError::IncorrectRandomnessAccount)?;
    require!(
        ctx.accounts.randomness_account_data.key() == committed,
        LotteryError::IncorrectRandomnessAccount
    );

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| LotteryError::InvalidRandomnessAccount)?;
    // An unresolved or failed reveal leaves the lottery in Drawing,
    // awaiting either this reveal or an operator retry
    let revealed_value = randomness_data
        .get_value(&clock)
        .map_err(|_| LotteryError::RandomnessNotResolved)?;

    let winning_slots = select_winning_slots(
        &revealed_value,
        lottery.frozen_slot_count,
        lottery.prize_count,
    )?;

    // Resolve each winning slot through the frozen ledger and stamp the
    // prizes in rank order
    let ledger = &ctx.accounts.entry_ledger;
    let pool = &mut ctx.accounts.prize_pool;
    let mut winners: Vec<Winner> = Vec::with_capacity(winning_slots.len());
    for (index, &slot) in winning_slots.iter().enumerate() {
        let record = ledger
            .resolve_slot(slot)
            .ok_or(LotteryError::LedgerSlotMismatch)?;
        let prize = pool
            .prizes
            .get_mut(index)
            .ok_or(LotteryError::InvalidPrizeRank)?;
        prize.awarded_to = Some(record.participant);
        winners.push(Winner {
            rank: index as u16 + 1,
            prize_id: prize.prize_id,
            participant: record.participant,
            winning_slot: slot,
            entry_sequence_index: record.sequence_index,
        });
    }

    let draw_result = &mut ctx.accounts.draw_result;
    draw_result.lottery = lottery.key();
    draw_result.randomness_value = revealed_value;
    draw_result.drawn_at = clock.unix_timestamp;
    draw_result.bump = ctx.bumps.draw_result;
    draw_result.winners = winners;

    lottery.randomness_value = Some(revealed_value);
    lottery.state = LotteryState::Completed;

    // Announce the completed draw and every winner
    emit!(DrawCompleted {
        lottery: lottery.key(),
        winner_count: draw_result.winners.len() as u16,
        drawn_at: draw_result.drawn_at,
    });
    for winner in &draw_result.winners {
        emit!(WinnerAnnounced {
            lottery: lottery.key(),
            rank: winner.rank,
            prize_id: winner.prize_id,
            participant: winner.participant,
            winning_slot: winner.winning_slot,
            entry_sequence_index: winner.entry_sequence_index,
        });
    }

    Ok(())
}

/// Selects one absolute slot per prize rank from `total_slots` slots.
///
/// The selection is a pure function of the revealed value, the slot count
/// and the prize count. Per-rank values are derived by mixing the base
/// with the rank, never by reusing the raw scalar, so distinct ranks land
/// independently. Removal policy: only the winning slot leaves the
/// eligible pool; the same participant's other slots stay eligible for
/// later ranks. If prizes outnumber slots, selection stops when the pool
/// is exhausted.
pub fn select_winning_slots(
    randomness_value: &[u8; 32],
    total_slots: u64,
    prize_count: u16,
) -> Result<Vec<u64>> {
    let base = derive_base(randomness_value);

    let awarded = (prize_count as u64).min(total_slots);
    let mut drawn_sorted: Vec<u64> = Vec::with_capacity(awarded as usize);
    let mut winning_slots: Vec<u64> = Vec::with_capacity(awarded as usize);

    for rank in 1..=awarded {
        let remaining = total_slots - drawn_sorted.len() as u64;
        let position = unbiased_range(mix(base, rank), remaining)?;
        let slot = nth_remaining_slot(position, &drawn_sorted);

        let insert_at = drawn_sorted.partition_point(|&drawn| drawn < slot);
        drawn_sorted.insert(insert_at, slot);
        winning_slots.push(slot);
    }

    Ok(winning_slots)
}

/// Collapses the 32-byte oracle value into the 64-bit selection base by
/// mixing its first two 8-byte words.
fn derive_base(randomness_value: &[u8; 32]) -> u64 {
    let word1 = u64::from_le_bytes(*array_ref![randomness_value, 0, 8]);
    let word2 = u64::from_le_bytes(*array_ref![randomness_value, 8, 8]);
    mix(word1, word2)
}

/// Maps a position in the shrunken index space [0, remaining) to the
/// absolute slot it denotes, skipping already-drawn slots.
/// `drawn_sorted` must be in ascending order.
fn nth_remaining_slot(position: u64, drawn_sorted: &[u64]) -> u64 {
    let mut slot = position;
    for &drawn in drawn_sorted {
        if drawn <= slot {
            slot += 1;
        } else {
            break;
        }
    }
    slot
}

/// Cryptographic mixing function with strong avalanche properties
/// Each bit in the output has a ~50% chance of flipping when any input bit changes.
/// Based on splitmix64 algorithm used in high-quality PRNGs.
fn mix(a: u64, b: u64) -> u64 {
    let mut z = a.wrapping_add(b);

    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z = z ^ (z >> 31);

    z
}

/// Maps a random number to a range without introducing statistical bias
/// Standard modulo operations can bias results when the range isn't a power of 2.
/// This function uses specialized techniques based on range size to ensure fairness.
fn unbiased_range(x: u64, range: u64) -> Result<u64> {
    if range == 0 {
        return Err(LotteryError::Overflow.into());
    }

    // If range is a power of 2, we can use a simple mask which is unbiased
    if range.is_power_of_two() {
        return Ok(x & (range - 1));
    }

    // For small ranges, simple modulo is fine as bias is minimal
    if range <= 256 {
        return Ok(x % range);
    }

    // Find threshold value to ensure unbiased selection
    let threshold = u64::MAX - (u64::MAX % range);

    // Use rejection sampling with a limit on computational cost
    let mut value = x;

    // Cap iterations to ensure reasonable compute costs
    const MAX_ATTEMPTS: u8 = 3;

    for i in 0..MAX_ATTEMPTS {
        // If value is below threshold, we can use modulo safely
        if value < threshold {
            return Ok(value % range);
        }

        // Try a new value with additional mixing
        value = mix(value, value.wrapping_add(i as u64 + 1));
    }

    // Fallback case - the bias is minimal after the mixing operations
    Ok(value % range)
}

/// Accounts required for the finalize_draw instruction
#[derive(Accounts)]
pub struct FinalizeDraw<'info> {
    /// The lottery being drawn.
    /// State, request-id and exactly-once checks run in the handler
    #[account(mut)]
    pub lottery: Account<'info, Lottery>,

    /// The frozen entry log the winning slots resolve through
    #[account(
        seeds = [
            b"entries",
            lottery.key().as_ref(),
        ],
        bump = entry_ledger.bump,
    )]
    pub entry_ledger: Account<'info, EntryLedger>,

    /// The ranked prize list; drawn prizes get their winner stamped
    #[account(
        mut,
        seeds = [
            b"prize_pool",
            lottery.key().as_ref(),
        ],
        bump = prize_pool.bump,
    )]
    pub prize_pool: Account<'info, PrizePool>,

    /// The immutable draw outcome; init makes this transition run at most
    /// once even if the randomness guard were ever bypassed
    #[account(
        init,
        payer = signer,
        space = DrawResult::size_for(
            (lottery.prize_count as u64).min(lottery.frozen_slot_count) as usize
        ),
        seeds = [
            b"draw_result",
            lottery.key().as_ref(),
        ],
        bump,
    )]
    pub draw_result: Account<'info, DrawResult>,

    /// The randomness oracle account providing the verifiable reveal.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,

    /// Whoever cranks the reveal; deliberately not restricted to the
    /// requester, so the draw completes even if the requester is gone
    #[account(mut)]
    pub signer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::entry_ledger::EntryRecord;

    fn seed(first_byte: u8) -> [u8; 32] {
        let mut value = [0u8; 32];
        value[0] = first_byte;
        value
    }

    /// Weighted ledger: A holds slots 0-1, B slot 2, C slot 3.
    fn scenario_ledger() -> (EntryLedger, Vec<Pubkey>) {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let c = Pubkey::new_unique();
        let ledger = EntryLedger {
            lottery: Pubkey::new_unique(),
            bump: 255,
            records: vec![
                EntryRecord {
                    participant: a,
                    entry_count: 2,
                    sequence_index: 0,
                    slot_start_index: 0,
                    payment_ref: [1; 8],
                },
                EntryRecord {
                    participant: b,
                    entry_count: 1,
                    sequence_index: 1,
                    slot_start_index: 2,
                    payment_ref: [2; 8],
                },
                EntryRecord {
                    participant: c,
                    entry_count: 1,
                    sequence_index: 2,
                    slot_start_index: 3,
                    payment_ref: [3; 8],
                },
            ],
        };
        (ledger, vec![a, b, c])
    }

    #[test]
    fn selection_is_deterministic() {
        let first = select_winning_slots(&seed(42), 4, 2).unwrap();
        let second = select_winning_slots(&seed(42), 4, 2).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn winning_slots_stay_in_bounds_and_never_repeat() {
        for first_byte in [7u8, 42, 99, 200] {
            let slots = select_winning_slots(&seed(first_byte), 4, 2).unwrap();
            assert_eq!(slots.len(), 2);
            for &slot in &slots {
                assert!(slot < 4);
            }
            assert_ne!(slots[0], slots[1]);
        }
    }

    #[test]
    fn scenario_winners_are_always_participants() {
        let (ledger, participants) = scenario_ledger();
        for first_byte in [7u8, 42] {
            let slots = select_winning_slots(&seed(first_byte), 4, 2).unwrap();
            for &slot in &slots {
                let record = ledger.resolve_slot(slot).expect("slot must resolve");
                assert!(participants.contains(&record.participant));
            }
        }
    }

    #[test]
    fn more_prizes_than_slots_exhausts_the_pool_exactly() {
        let slots = select_winning_slots(&seed(9), 3, 10).unwrap();
        // Every slot drawn exactly once, then selection stops.
        assert_eq!(slots.len(), 3);
        let mut sorted = slots.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }

    #[test]
    fn zero_prizes_selects_nothing() {
        assert!(select_winning_slots(&seed(1), 4, 0).unwrap().is_empty());
    }

    #[test]
    fn ranks_derive_independent_values() {
        // With a large pool, consecutive ranks landing on consecutive
        // slots for several seeds would mean the per-rank derivation
        // degenerated into an offset of the same scalar.
        let mut all_adjacent = true;
        for first_byte in [3u8, 50, 120, 250] {
            let slots = select_winning_slots(&seed(first_byte), 1 << 20, 2).unwrap();
            if slots[1] != slots[0] + 1 && slots[0] != slots[1] + 1 {
                all_adjacent = false;
            }
        }
        assert!(!all_adjacent);
    }

    #[test]
    fn nth_remaining_slot_skips_drawn_slots() {
        // Remaining after drawing {2}: [0, 1, 3]
        assert_eq!(nth_remaining_slot(0, &[2]), 0);
        assert_eq!(nth_remaining_slot(1, &[2]), 1);
        assert_eq!(nth_remaining_slot(2, &[2]), 3);
        // Remaining after drawing {0, 3}: [1, 2, 4]
        assert_eq!(nth_remaining_slot(0, &[0, 3]), 1);
        assert_eq!(nth_remaining_slot(1, &[0, 3]), 2);
        assert_eq!(nth_remaining_slot(2, &[0, 3]), 4);
    }

    #[test]
    fn unbiased_range_stays_in_range() {
        for x in [0u64, 1, u64::MAX, 0xdead_beef] {
            for range in [1u64, 2, 3, 7, 256, 1_000_003] {
                assert!(unbiased_range(x, range).unwrap() < range);
            }
        }
    }

    #[test]
    fn unbiased_range_rejects_empty_range() {
        assert!(unbiased_range(5, 0).is_err());
    }
}
