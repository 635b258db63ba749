use hmac::{ Hmac, Mac };
use rand::RngCore;
use sha2::Sha256;

use crate::error::{ AppError, Result };

type HmacSha256 = Hmac<Sha256>;

const SESSION_ID_BYTES: usize = 32;

/// Issues session ids and signs them for the cookie as `<id>.<hex hmac>`.
pub struct SessionSigner {
    mac: HmacSha256,
}

impl SessionSigner {
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.is_empty() {
            return Err(AppError::Config("Session secret must not be empty".to_string()));
        }

        let mac = <HmacSha256 as Mac>::new_from_slice(key).map_err(|e|
            AppError::Config(format!("Invalid session secret: {}", e))
        )?;

        Ok(Self { mac })
    }

    pub fn generate_id(&self) -> String {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    pub fn sign(&self, session_id: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(session_id.as_bytes());
        let signature = mac.finalize().into_bytes();

        format!("{}.{}", session_id, hex::encode(signature))
    }

    /// Returns the session id when the signature matches.
    pub fn verify<'a>(&self, cookie_value: &'a str) -> Option<&'a str> {
        let (session_id, signature_hex) = cookie_value.rsplit_once('.')?;
        let signature = hex::decode(signature_hex).ok()?;

        let mut mac = self.mac.clone();
        mac.update(session_id.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(session_id)
    }
}
