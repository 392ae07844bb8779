//! Ephemeral key material.
//!
//! This module owns the conversion of caller-supplied key bytes into
//! single-use operation contexts. The containers here are:
//! 1. Validated at creation — an unsupported length never reaches the
//!    cipher layer.
//! 2. Opaque, non-cloneable, and zeroised on drop. `Drop` is the destroy
//!    step: it runs exactly once, on every exit path, success or failure.
//! 3. Consumed by value by the one primitive call that uses them, so a key
//!    context cannot persist across invocations or be shared between two
//!    operations.
//!
//! Raw key bytes never leave the crate; the accessors are `pub(crate)`.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::KeycellError;

/// AES key lengths the enclave accepts, in bytes.
pub const AES_KEY_LENGTHS: [usize; 3] = [16, 24, 32];

/// Cipher strength implied by the AES key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AeadStrength {
    Aes128,
    Aes192,
    Aes256,
}

impl AeadStrength {
    fn from_key_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(Self::Aes128),
            24 => Some(Self::Aes192),
            32 => Some(Self::Aes256),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// AEAD key
// ---------------------------------------------------------------------------

/// Key material bound to a single AES-GCM operation.
///
/// - Not `Clone`. One context, one operation.
/// - Zeroised on drop. The secret is overwritten before deallocation.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct AeadKey {
    bytes: Vec<u8>,
    #[zeroize(skip)]
    strength: AeadStrength,
}

impl AeadKey {
    /// Bind raw key bytes to an AES-GCM context sized by `bytes.len() * 8`
    /// bits. Fails with `KeyCreationFailed` for any length outside
    /// [`AES_KEY_LENGTHS`].
    pub(crate) fn create(bytes: &[u8]) -> Result<Self, KeycellError> {
        let strength =
            AeadStrength::from_key_len(bytes.len()).ok_or(KeycellError::KeyCreationFailed)?;
        Ok(Self {
            bytes: bytes.to_vec(),
            strength,
        })
    }

    pub(crate) fn strength(&self) -> AeadStrength {
        self.strength
    }

    /// Borrow the raw key bytes for cipher initialization.
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

// ---------------------------------------------------------------------------
// MAC key
// ---------------------------------------------------------------------------

/// Key material bound to a single HMAC-SHA256 operation.
///
/// Any non-empty length is accepted — HMAC hashes keys longer than the
/// block size and pads shorter ones. Lifecycle rules are identical to
/// [`AeadKey`].
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct MacKey {
    bytes: Vec<u8>,
}

impl MacKey {
    pub(crate) fn create(bytes: &[u8]) -> Result<Self, KeycellError> {
        if bytes.is_empty() {
            return Err(KeycellError::KeyCreationFailed);
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aead_key_accepts_standard_lengths() {
        for len in AES_KEY_LENGTHS {
            let key = AeadKey::create(&vec![0u8; len]).unwrap();
            assert_eq!(key.bytes().len(), len);
        }
    }

    #[test]
    fn test_aead_key_rejects_other_lengths() {
        for len in [0usize, 1, 15, 17, 23, 25, 31, 33, 64] {
            assert!(matches!(
                AeadKey::create(&vec![0u8; len]),
                Err(KeycellError::KeyCreationFailed)
            ));
        }
    }

    #[test]
    fn test_aead_strength_tracks_length() {
        assert_eq!(
            AeadKey::create(&[0u8; 16]).unwrap().strength(),
            AeadStrength::Aes128
        );
        assert_eq!(
            AeadKey::create(&[0u8; 24]).unwrap().strength(),
            AeadStrength::Aes192
        );
        assert_eq!(
            AeadKey::create(&[0u8; 32]).unwrap().strength(),
            AeadStrength::Aes256
        );
    }

    #[test]
    fn test_mac_key_accepts_any_nonempty_length() {
        for len in [1usize, 4, 32, 100] {
            assert!(MacKey::create(&vec![0u8; len]).is_ok());
        }
        assert!(matches!(
            MacKey::create(&[]),
            Err(KeycellError::KeyCreationFailed)
        ));
    }
}
