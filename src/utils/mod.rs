pub mod format;
pub mod ratelimit;
pub mod table;

pub use format::{format_usd, round_to};
pub use ratelimit::{check_cooldown, get_cooldown_seconds};
pub use table::Table;
