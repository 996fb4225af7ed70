//! Credential normalization for `operatingSystem.users`.
//!
//! Callers may supply a plaintext `password` (a convenience field the schema
//! does not allow) or put plaintext straight into `encryptedPassword`. Both are
//! turned into a crypt-style hash before validation so the document that
//! reaches the schema only carries `encryptedPassword` hashes.

use serde_json::{Map, Value};
use tracing::debug;

use crate::document::{non_empty_str, DocumentExt};
use crate::error::{HashError, Result};

/// Plaintext convenience field, never written to the output.
pub const PASSWORD_FIELD: &str = "password";

/// Field holding the hashed credential.
pub const ENCRYPTED_PASSWORD_FIELD: &str = "encryptedPassword";

/// Leading character of every crypt-style hash (`$2b$...`, `$6$...`).
pub const HASH_MARKER: char = '$';

/// bcrypt work factor used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// bcrypt only reads this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

const USERS_PATH: &[&str] = &["operatingSystem", "users"];

/// One-way hashing of a plaintext credential.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> std::result::Result<String, HashError>;
}

/// bcrypt-backed [`PasswordHasher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> std::result::Result<String, HashError> {
        // bcrypt 0.15 would silently drop everything past the limit.
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(HashError(format!(
                "password length exceeds {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }
}

/// Returns true if `value` already looks like a crypt-style hash.
pub fn is_hashed(value: &str) -> bool {
    value.starts_with(HASH_MARKER)
}

/// Hash every plaintext credential under `operatingSystem.users`.
///
/// A document without that path (or with the wrong shape there) is returned
/// unchanged. The first hashing failure aborts the whole document.
pub fn normalize_credentials(mut document: Value, hasher: &dyn PasswordHasher) -> Result<Value> {
    if let Some(users) = document
        .at_path_mut(USERS_PATH)
        .and_then(Value::as_array_mut)
    {
        for (index, user) in users.iter_mut().enumerate() {
            if let Some(record) = user.as_object_mut() {
                if normalize_user(record, hasher)? {
                    debug!(user = index, "hashed plaintext credential");
                }
            }
        }
    }
    Ok(document)
}

/// Returns whether the record was changed.
fn normalize_user(
    record: &mut Map<String, Value>,
    hasher: &dyn PasswordHasher,
) -> std::result::Result<bool, HashError> {
    if let Some(plaintext) = non_empty_str(record, PASSWORD_FIELD) {
        let hashed = hasher.hash(plaintext)?;
        record.insert(ENCRYPTED_PASSWORD_FIELD.to_string(), Value::String(hashed));
        record.remove(PASSWORD_FIELD);
        return Ok(true);
    }

    match non_empty_str(record, ENCRYPTED_PASSWORD_FIELD) {
        Some(candidate) if !is_hashed(candidate) => {
            let hashed = hasher.hash(candidate)?;
            record.insert(ENCRYPTED_PASSWORD_FIELD.to_string(), Value::String(hashed));
            Ok(true)
        }
        _ => Ok(false),
    }
}
