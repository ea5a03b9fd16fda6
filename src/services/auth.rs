use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::db::Database;

const AUTH_FLAG_KEY: &str = "authenticated";

// Demo gate, not a security boundary: a single hardcoded credential pair
// (admin / password) compared as SHA-256 digests. The flag persists without
// expiry until logout.
const USERNAME_DIGEST: &str = "8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918";
const PASSWORD_DIGEST: &str = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";

pub fn login(db: &Database, username: &str, password: &str) -> Result<bool> {
    if digest(username) == USERNAME_DIGEST && digest(password) == PASSWORD_DIGEST {
        db.set_setting(AUTH_FLAG_KEY, "true")?;
        tracing::info!("operator logged in");
        return Ok(true);
    }
    tracing::warn!("rejected login attempt");
    Ok(false)
}

pub fn logout(db: &Database) -> Result<()> {
    db.delete_setting(AUTH_FLAG_KEY)
}

pub fn is_authenticated(db: &Database) -> Result<bool> {
    Ok(db.get_setting(AUTH_FLAG_KEY)?.is_some())
}

fn digest(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}
