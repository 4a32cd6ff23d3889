pub mod service;

pub use service::{AuthResponse, AuthService};
