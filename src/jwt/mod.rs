pub mod claims;
pub mod signer;

pub use claims::AccessClaims;
pub use signer::TokenSigner;
