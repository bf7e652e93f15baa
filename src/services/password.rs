//! Salted password hashing for admin credentials.
//!
//! Keys are derived with Argon2id and stored as `<hex-key>.<hex-salt>`. The
//! cost parameters are not part of the encoded string, so every hash must be
//! verified by a service built with the same [`Params`].

#[cfg(test)]
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use argon2::{Algorithm, Argon2, Params, Version};
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Random salt drawn per hash.
const SALT_LEN: usize = 16;

/// Length of the derived key.
const KEY_LEN: usize = 64;

/// Derives and checks password hashes.
///
/// Derivation is deliberately slow (tens of milliseconds with the default
/// parameters); async callers should use the `*_blocking` variants, which
/// move the work onto Tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct PasswordService {
    params: Params,
    #[cfg(test)]
    derivations: Arc<AtomicUsize>,
}

impl Default for PasswordService {
    /// OWASP-recommended Argon2id cost: 19 MiB, two passes, one lane.
    fn default() -> Self {
        Self::new(Params::default())
    }
}

/// Well-formed encoding that no password matches. Checking against it costs
/// exactly one key derivation, the same as a real hash.
fn decoy_hash() -> String {
    format!(
        "{}.{}",
        hex::encode([0u8; KEY_LEN]),
        hex::encode([0u8; SALT_LEN])
    )
}

impl PasswordService {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            #[cfg(test)]
            derivations: Arc::default(),
        }
    }

    /// Cheap parameters so that tests can hash hundreds of passwords.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(Params::new(64, 1, 1, None).unwrap())
    }

    /// Key derivations run by [`Self::verify`] on this service and its clones.
    #[cfg(test)]
    pub fn derivations(&self) -> usize {
        self.derivations.load(Ordering::SeqCst)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `plaintext` with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let salt: [u8; SALT_LEN] = rand::random();
        let mut key = [0u8; KEY_LEN];
        self.argon2()
            .hash_password_into(plaintext.as_bytes(), &salt, &mut key)
            .map_err(|e| AppError::Internal(format!("key derivation failed: {e}")))?;

        Ok(format!("{}.{}", hex::encode(key), hex::encode(salt)))
    }

    /// Check `plaintext` against an encoded hash.
    ///
    /// Malformed encodings never match. The final comparison runs in constant
    /// time regardless of where the keys differ.
    pub fn verify(&self, plaintext: &str, encoded: &str) -> bool {
        let Some((key_hex, salt_hex)) = encoded.split_once('.') else {
            return false;
        };
        let (Ok(expected), Ok(salt)) = (hex::decode(key_hex), hex::decode(salt_hex)) else {
            return false;
        };

        #[cfg(test)]
        self.derivations.fetch_add(1, Ordering::SeqCst);

        let mut derived = vec![0u8; expected.len()];
        if self
            .argon2()
            .hash_password_into(plaintext.as_bytes(), &salt, &mut derived)
            .is_err()
        {
            return false;
        }

        derived.ct_eq(&expected).into()
    }

    /// [`Self::hash`] on the blocking pool.
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, AppError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&plaintext))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))?
    }

    /// [`Self::verify`] on the blocking pool.
    pub async fn verify_blocking(
        &self,
        plaintext: String,
        encoded: String,
    ) -> Result<bool, AppError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.verify(&plaintext, &encoded))
            .await
            .map_err(|e| AppError::Internal(format!("verification task failed: {e}")))
    }

    /// Spend one verification's worth of work without a stored hash.
    ///
    /// Used when a login names an unknown user, so that the rejection takes
    /// as long as a wrong password would.
    pub async fn verify_decoy_blocking(&self, plaintext: String) -> Result<(), AppError> {
        self.verify_blocking(plaintext, decoy_hash()).await?;
        Ok(())
    }
}
