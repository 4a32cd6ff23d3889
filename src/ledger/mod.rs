pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use memory::MemoryTokenStore;
pub use postgres::PostgresTokenStore;
pub use record::{NewRefreshToken, RefreshTokenRecord};
pub use store::RefreshTokenStore;
