pub mod generator;
pub mod service;

pub use generator::RefreshTokenGenerator;
pub use service::{ClientInfo, IssuedRefreshToken, RefreshTokenService};
