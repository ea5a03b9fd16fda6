use anyhow::{anyhow, Result};
use base64::{engine::general_purpose, Engine as _};
use ring::{
    aead, pbkdf2,
    rand::{SecureRandom, SystemRandom},
};
use std::num::NonZeroU32;

const KEYCHAIN_SERVICE: &str = "skydesk";
const KEYCHAIN_ACCOUNT: &str = "assist_api_key";
const KEYCHAIN_REFERENCE: &str = "keychain:skydesk:assist_api_key";
const APP_SECRET: &[u8] = b"skydesk-secret-v1";
const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;

// Keeps the AI credential out of the database in plain text: OS keychain
// when one is reachable, AES-256-GCM sealed blob otherwise.
pub struct CryptoService;

impl CryptoService {
    pub fn protect_api_key(api_key: &str) -> Result<String> {
        match keychain_entry().and_then(|entry| {
            entry
                .set_password(api_key)
                .map_err(|e| anyhow!("Keychain store: {}", e))
        }) {
            Ok(()) => Ok(KEYCHAIN_REFERENCE.to_string()),
            Err(_) => seal(api_key),
        }
    }

    pub fn reveal_api_key(stored: &str) -> Result<String> {
        if stored == KEYCHAIN_REFERENCE {
            return keychain_entry()?
                .get_password()
                .map_err(|e| anyhow!("Keychain fetch: {}", e));
        }
        if let Some(payload) = stored.strip_prefix("sealed:") {
            return unseal(payload);
        }
        Err(anyhow!("Unknown credential format"))
    }
}

fn keychain_entry() -> Result<keyring::Entry> {
    keyring::Entry::new(KEYCHAIN_SERVICE, KEYCHAIN_ACCOUNT)
        .map_err(|e| anyhow!("Keychain entry: {}", e))
}

// Payload layout: base64(salt || nonce || ciphertext+tag), prefixed with
// "sealed:" so stored values are self-describing.
fn seal(plaintext: &str) -> Result<String> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt).map_err(|_| anyhow!("Salt generation failed"))?;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| anyhow!("Nonce generation failed"))?;

    let key = derive_key(&salt)?;
    let nonce = aead::Nonce::assume_unique_for_key(nonce_bytes);
    let mut sealed = plaintext.as_bytes().to_vec();
    key.seal_in_place_append_tag(nonce, aead::Aad::empty(), &mut sealed)
        .map_err(|_| anyhow!("Encryption failed"))?;

    let mut payload = Vec::with_capacity(SALT_LEN + NONCE_LEN + sealed.len());
    payload.extend_from_slice(&salt);
    payload.extend_from_slice(&nonce_bytes);
    payload.extend_from_slice(&sealed);
    Ok(format!("sealed:{}", general_purpose::STANDARD.encode(payload)))
}

fn unseal(payload: &str) -> Result<String> {
    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| anyhow!("Decode payload: {}", e))?;
    if bytes.len() <= SALT_LEN + NONCE_LEN {
        return Err(anyhow!("Sealed payload too short"));
    }

    let (salt, rest) = bytes.split_at(SALT_LEN);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

    let key = derive_key(salt)?;
    let nonce = aead::Nonce::assume_unique_for_key(
        nonce_bytes
            .try_into()
            .map_err(|_| anyhow!("Invalid nonce length"))?,
    );

    let mut data = ciphertext.to_vec();
    let decrypted = key
        .open_in_place(nonce, aead::Aad::empty(), &mut data)
        .map_err(|_| anyhow!("Decryption failed"))?;
    Ok(String::from_utf8(decrypted.to_vec())?)
}

fn derive_key(salt: &[u8]) -> Result<aead::LessSafeKey> {
    let mut key_bytes = [0u8; 32];
    let iterations =
        NonZeroU32::new(PBKDF2_ITERATIONS).ok_or_else(|| anyhow!("Invalid iterations"))?;
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        APP_SECRET,
        &mut key_bytes,
    );
    let unbound = aead::UnboundKey::new(&aead::AES_256_GCM, &key_bytes)
        .map_err(|_| anyhow!("Invalid key material"))?;
    Ok(aead::LessSafeKey::new(unbound))
}
