pub use add_prizes::*;
pub use cancel_lottery::*;
pub use claim_refund::*;
pub use close_entries::*;
pub use create_lottery::*;
pub use distribute_prize::*;
pub use finalize_draw::*;
pub use init_config::*;
pub use init_entry_balance::*;
pub use mark_distribution_failed::*;
pub use record_entry::*;
pub use request_draw::*;
pub use withdraw_from_treasury::*;

pub mod add_prizes;
pub mod cancel_lottery;
pub mod claim_refund;
pub mod close_entries;
pub mod create_lottery;
pub mod distribute_prize;
pub mod finalize_draw;
pub mod init_config;
pub mod init_entry_balance;
pub mod mark_distribution_failed;
pub mod record_entry;
pub mod request_draw;
pub mod withdraw_from_treasury;
