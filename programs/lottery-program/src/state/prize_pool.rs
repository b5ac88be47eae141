use anchor_lang::prelude::*;

// 8 discriminator + 32 lottery + 1 bump + 4 vec length
pub const PRIZE_POOL_BASE_SIZE: usize = 8 + 32 + 1 + 4;

// 8 prize_id + 8 amount + 33 awarded_to (Option<Pubkey>) + 1 claimed + 1 distribution_failed
pub const PRIZE_SIZE: usize = 8 + 8 + 33 + 1 + 1;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, PartialEq, Eq, Debug)]
pub struct Prize {
    pub prize_id: u64,
    /// Prize value in lamports, escrowed in the lottery treasury.
    pub amount: u64,
    /// Set once by the draw; never cleared. None means the prize was not
    /// reached before the slot pool ran out.
    pub awarded_to: Option<Pubkey>,
    pub claimed: bool,
    pub distribution_failed: bool,
}

/// Ordered prize list for one lottery. Ranks are dense and gapless by
/// construction: index `i` is rank `i + 1`, and rank 1 is resolved against
/// the first derived random value.
#[account]
pub struct PrizePool {
    pub lottery: Pubkey,
    pub bump: u8,
    pub prizes: Vec<Prize>,
}

impl PrizePool {
    pub fn size_for(prize_count: usize) -> usize {
        PRIZE_POOL_BASE_SIZE + prize_count * PRIZE_SIZE
    }

    pub fn contains_prize_id(&self, prize_id: u64) -> bool {
        self.prizes.iter().any(|prize| prize.prize_id == prize_id)
    }

    pub fn prize_at_rank(&self, rank: u16) -> Option<&Prize> {
        (rank >= 1)
            .then(|| self.prizes.get(rank as usize - 1))
            .flatten()
    }

    pub fn prize_at_rank_mut(&mut self, rank: u16) -> Option<&mut Prize> {
        (rank >= 1)
            .then(|| self.prizes.get_mut(rank as usize - 1))
            .flatten()
    }

    /// True once every awarded prize has either been distributed or marked
    /// failed. Unawarded prizes (slot pool exhausted before their rank)
    /// need no resolution.
    pub fn all_resolved(&self) -> bool {
        self.prizes
            .iter()
            .all(|prize| prize.awarded_to.is_none() || prize.claimed || prize.distribution_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prize(prize_id: u64) -> Prize {
        Prize {
            prize_id,
            amount: 1_000,
            awarded_to: None,
            claimed: false,
            distribution_failed: false,
        }
    }

    fn pool(prize_ids: &[u64]) -> PrizePool {
        PrizePool {
            lottery: Pubkey::new_unique(),
            bump: 255,
            prizes: prize_ids.iter().copied().map(prize).collect(),
        }
    }

    #[test]
    fn ranks_are_one_based_and_dense() {
        let pool = pool(&[7, 8, 9]);
        assert_eq!(pool.prize_at_rank(1).unwrap().prize_id, 7);
        assert_eq!(pool.prize_at_rank(3).unwrap().prize_id, 9);
        assert!(pool.prize_at_rank(0).is_none());
        assert!(pool.prize_at_rank(4).is_none());
    }

    #[test]
    fn resolution_tracks_awarded_prizes_only() {
        let mut pool = pool(&[1, 2, 3]);
        // Nothing awarded yet: trivially resolved.
        assert!(pool.all_resolved());

        let winner = Pubkey::new_unique();
        pool.prizes[0].awarded_to = Some(winner);
        pool.prizes[1].awarded_to = Some(winner);
        assert!(!pool.all_resolved());

        pool.prizes[0].claimed = true;
        assert!(!pool.all_resolved());

        pool.prizes[1].distribution_failed = true;
        assert!(pool.all_resolved());
    }

    #[test]
    fn duplicate_prize_ids_are_detectable() {
        let pool = pool(&[5, 6]);
        assert!(pool.contains_prize_id(5));
        assert!(!pool.contains_prize_id(42));
    }
}
