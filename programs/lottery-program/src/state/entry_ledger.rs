use anchor_lang::prelude::*;

// 8 discriminator + 32 lottery + 1 bump + 4 vec length
pub const ENTRY_LEDGER_BASE_SIZE: usize = 8 + 32 + 1 + 4;

// 32 participant + 8 entry_count + 8 sequence_index + 8 slot_start_index + 8 payment_ref
pub const ENTRY_RECORD_SIZE: usize = 32 + 8 + 8 + 8 + 8;

/// One paid entry. A record of weight `entry_count = n` covers the slot
/// range [slot_start_index, slot_start_index + n); the concatenation of
/// all records in sequence order is the flattened sample space the draw
/// selects from.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, PartialEq, Eq, Debug)]
pub struct EntryRecord {
    pub participant: Pubkey,
    pub entry_count: u64,
    pub sequence_index: u64,
    pub slot_start_index: u64,
    pub payment_ref: [u8; 8],
}

/// Append-only log of entries for one lottery. Records are never mutated
/// or removed; the account grows by one record per entry and is frozen
/// (together with the counters on the Lottery account) when entries close.
#[account]
pub struct EntryLedger {
    pub lottery: Pubkey,
    pub bump: u8,
    pub records: Vec<EntryRecord>,
}

impl EntryLedger {
    /// Account size holding `record_count` records.
    pub fn size_for(record_count: usize) -> usize {
        ENTRY_LEDGER_BASE_SIZE + record_count * ENTRY_RECORD_SIZE
    }

    pub fn contains_payment_ref(&self, payment_ref: &[u8; 8]) -> bool {
        self.records
            .iter()
            .any(|record| &record.payment_ref == payment_ref)
    }

    /// Resolve an absolute slot index to the record whose span contains it.
    /// Returns None for a slot at or beyond the total slot count.
    pub fn resolve_slot(&self, slot: u64) -> Option<&EntryRecord> {
        self.records.iter().find(|record| {
            slot >= record.slot_start_index
                && slot < record.slot_start_index + record.entry_count
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(participant: Pubkey, entry_count: u64, sequence: u64, slot_start: u64) -> EntryRecord {
        EntryRecord {
            participant,
            entry_count,
            sequence_index: sequence,
            slot_start_index: slot_start,
            payment_ref: sequence.to_le_bytes(),
        }
    }

    /// Weighted ledger: A enters with weight 2, B and C with 1, four
    /// slots in total.
    fn scenario_ledger() -> (EntryLedger, Pubkey, Pubkey, Pubkey) {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let c = Pubkey::new_unique();
        let ledger = EntryLedger {
            lottery: Pubkey::new_unique(),
            bump: 255,
            records: vec![record(a, 2, 0, 0), record(b, 1, 1, 2), record(c, 1, 2, 3)],
        };
        (ledger, a, b, c)
    }

    #[test]
    fn slots_resolve_through_record_spans() {
        let (ledger, a, b, c) = scenario_ledger();
        assert_eq!(ledger.resolve_slot(0).unwrap().participant, a);
        assert_eq!(ledger.resolve_slot(1).unwrap().participant, a);
        assert_eq!(ledger.resolve_slot(2).unwrap().participant, b);
        assert_eq!(ledger.resolve_slot(3).unwrap().participant, c);
    }

    #[test]
    fn out_of_range_slot_resolves_to_none() {
        let (ledger, _, _, _) = scenario_ledger();
        assert!(ledger.resolve_slot(4).is_none());
    }

    #[test]
    fn resolution_reports_the_entry_sequence() {
        let (ledger, _, _, _) = scenario_ledger();
        assert_eq!(ledger.resolve_slot(1).unwrap().sequence_index, 0);
        assert_eq!(ledger.resolve_slot(3).unwrap().sequence_index, 2);
    }

    #[test]
    fn payment_ref_lookup() {
        let (ledger, _, _, _) = scenario_ledger();
        assert!(ledger.contains_payment_ref(&0u64.to_le_bytes()));
        assert!(!ledger.contains_payment_ref(&9u64.to_le_bytes()));
    }

    #[test]
    fn size_grows_per_record() {
        assert_eq!(EntryLedger::size_for(0), ENTRY_LEDGER_BASE_SIZE);
        assert_eq!(
            EntryLedger::size_for(3),
            ENTRY_LEDGER_BASE_SIZE + 3 * ENTRY_RECORD_SIZE
        );
    }
}
