use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Generates opaque raw refresh tokens and their at-rest digests.
///
/// Raw tokens are random values, not signed tokens; they are only ever
/// hash-compared, so a signature would buy nothing.
pub struct RefreshTokenGenerator;

impl RefreshTokenGenerator {
    pub fn generate() -> String {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; 32] = rng.gen();
        URL_SAFE_NO_PAD.encode(random_bytes)
    }

    pub fn hash(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}
