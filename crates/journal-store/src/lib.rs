pub mod db;
pub mod trades;

pub use db::JournalDb;
pub use trades::TradeStore;
