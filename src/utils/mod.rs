pub mod table;
pub mod page;
pub mod errors;
pub mod ratelimit;
pub mod args;

pub use table::{Align, Table};
pub use page::Page;
pub use errors::{describe_api_error, user_message};
pub use ratelimit::{check_cooldown, check_global_rate_limit, get_cooldown_seconds};
