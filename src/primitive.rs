//! Low-level cryptographic operations.
//!
//! This is the only module in the crate that imports the cipher crates
//! (`aes`/`aes-gcm` for AEAD, `hmac`/`sha2` for MAC). Everything else goes
//! through the three functions exposed here, which take their key context
//! **by value**: the context is consumed by the operation and zeroised when
//! it drops, on success and on failure alike.
//!
//! Primitive choices:
//! - **AEAD**: AES-GCM with a 96-bit nonce and a 128-bit tag, at 128/192/256
//!   bit key strength depending on the key length.
//! - **MAC**: HMAC-SHA256, 256-bit output.
//!
//! Associated data is an explicit parameter of both AEAD operations. It may
//! be empty, but it is always bound into the tag computation — there is no
//! separate "no AAD" code path.

use aes::Aes192;
use aes_gcm::aead::generic_array::typenum::U12;
use aes_gcm::aead::AeadInPlace;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, KeyInit, Nonce, Tag};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::KeycellError;
use crate::keys::{AeadKey, AeadStrength, MacKey};

/// Nonce length in bytes (96 bits, the GCM standard recommendation).
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes (128 bits). GCM permits 4–16 byte
/// tags; this service fixes the maximum.
pub const TAG_LEN: usize = 16;

/// HMAC-SHA256 output length in bytes.
pub const MAC_LEN: usize = 32;

/// There is no `Aes192Gcm` alias upstream; compose it from the generic.
type Aes192Gcm = AesGcm<Aes192, U12>;

type HmacSha256 = Hmac<Sha256>;

enum AeadCipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

/// Initialize the cipher matching the key's strength. The key length was
/// validated at context creation, so a failure here is an engine fault.
fn bind_cipher(key: &AeadKey) -> Result<AeadCipher, KeycellError> {
    let cipher = match key.strength() {
        AeadStrength::Aes128 => Aes128Gcm::new_from_slice(key.bytes())
            .map(AeadCipher::Aes128)
            .map_err(|_| KeycellError::PrimitiveFailure)?,
        AeadStrength::Aes192 => Aes192Gcm::new_from_slice(key.bytes())
            .map(AeadCipher::Aes192)
            .map_err(|_| KeycellError::PrimitiveFailure)?,
        AeadStrength::Aes256 => Aes256Gcm::new_from_slice(key.bytes())
            .map(AeadCipher::Aes256)
            .map_err(|_| KeycellError::PrimitiveFailure)?,
    };
    Ok(cipher)
}

/// Encrypt `plaintext` under `key`, binding `aad` into the tag.
///
/// Returns the ciphertext (same length as the plaintext — GCM is
/// length-preserving) and the detached 16-byte tag. Deterministic for
/// identical key/iv/aad/plaintext; nonce uniqueness is the caller's
/// responsibility, only the length is enforced here.
pub(crate) fn aead_encrypt(
    key: AeadKey,
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; TAG_LEN]), KeycellError> {
    if iv.len() != NONCE_LEN {
        return Err(KeycellError::InvalidInput);
    }

    let cipher = bind_cipher(&key)?;
    let nonce = Nonce::from_slice(iv);

    let mut buffer = plaintext.to_vec();
    let tag = match &cipher {
        AeadCipher::Aes128(c) => c.encrypt_in_place_detached(nonce, aad, &mut buffer),
        AeadCipher::Aes192(c) => c.encrypt_in_place_detached(nonce, aad, &mut buffer),
        AeadCipher::Aes256(c) => c.encrypt_in_place_detached(nonce, aad, &mut buffer),
    }
    .map_err(|_| KeycellError::PrimitiveFailure)?;

    Ok((buffer, tag.into()))
}

/// Verify `tag` over `ciphertext`/`aad` and decrypt.
///
/// Verification and decryption are atomic: the plaintext is returned only
/// if the tag verifies, and a mismatch yields `AuthenticationFailure` with
/// nothing released. `AuthenticationFailure` is the only error a wrong key,
/// wrong IV, or tampered input can produce here.
pub(crate) fn aead_decrypt(
    key: AeadKey,
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, KeycellError> {
    if iv.len() != NONCE_LEN || tag.len() != TAG_LEN {
        return Err(KeycellError::InvalidInput);
    }

    let cipher = bind_cipher(&key)?;
    let nonce = Nonce::from_slice(iv);
    let tag = Tag::from_slice(tag);

    let mut buffer = ciphertext.to_vec();
    match &cipher {
        AeadCipher::Aes128(c) => c.decrypt_in_place_detached(nonce, aad, &mut buffer, tag),
        AeadCipher::Aes192(c) => c.decrypt_in_place_detached(nonce, aad, &mut buffer, tag),
        AeadCipher::Aes256(c) => c.decrypt_in_place_detached(nonce, aad, &mut buffer, tag),
    }
    .map_err(|_| KeycellError::AuthenticationFailure)?;

    Ok(buffer)
}

/// Compute HMAC-SHA256 over `message` in a single init/update/finalize
/// sequence. No streaming across calls.
pub(crate) fn mac_compute(key: MacKey, message: &[u8]) -> Result<[u8; MAC_LEN], KeycellError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key.bytes())
        .map_err(|_| KeycellError::PrimitiveFailure)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().into())
}
