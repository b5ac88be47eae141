pub use config::*;
pub use draw_result::*;
pub use entry_balance::*;
pub use entry_ledger::*;
pub use lottery::*;
pub use prize_pool::*;
pub use treasury::*;

pub mod config;
pub mod draw_result;
pub mod entry_balance;
pub mod entry_ledger;
pub mod lottery;
pub mod prize_pool;
pub mod treasury;
