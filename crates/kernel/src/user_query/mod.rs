//! Paginated user listings.

pub mod memory;
pub mod pg_store;
pub mod producer;
pub mod sort_key;
pub mod store;

pub use memory::MemoryUserStore;
pub use pg_store::PgUserStore;
pub use producer::QueryUser;
pub use sort_key::UserSortKey;
pub use store::{KeysetQuery, UserStore};
