//! ENCRYPT and DECRYPT command processors.
//!
//! Each processor runs a fixed per-call sequence: destructure the validated
//! slots, check input sizes, reserve the output slot, bind the key, run the
//! primitive, pack the result. Key material is bound only after every
//! sizing check has passed and is consumed by the primitive call, so it is
//! destroyed on every exit path without any explicit teardown step.
//!
//! Output layout: `ciphertext || tag`, tag in the trailing [`TAG_LEN`]
//! bytes. The four-slot command table carries no associated data, so the
//! processors bind an empty AAD; the primitive seam underneath accepts any.
//!
//! [`TAG_LEN`]: crate::primitive::TAG_LEN

use crate::error::KeycellError;
use crate::keys::AeadKey;
use crate::primitive::{self, NONCE_LEN, TAG_LEN};
use crate::request::{Param, Params};

/// ENCRYPT: slots `[key, iv, plaintext, out]`.
///
/// Writes `ciphertext` at offset 0 and the tag immediately after, for a
/// total of `plaintext.len() + TAG_LEN` bytes.
pub(crate) fn encrypt(params: &mut Params<'_>) -> Result<(), KeycellError> {
    let [Param::In(key_bytes), Param::In(iv), Param::In(plaintext), Param::Out(out)] =
        params.slots_mut()
    else {
        return Err(KeycellError::InvalidRequestShape);
    };

    if iv.len() != NONCE_LEN {
        return Err(KeycellError::InvalidInput);
    }

    // The required length is reported back even when this fails, so the
    // caller can size a retry.
    let required = plaintext.len() + TAG_LEN;
    out.reserve(required)?;

    let key = AeadKey::create(key_bytes)?;
    let (ciphertext, tag) = primitive::aead_encrypt(key, iv, &[], plaintext)?;
    out.fill(&[&ciphertext, &tag])
}

/// DECRYPT: slots `[key, iv, ciphertext || tag, out]`.
///
/// Splits the input into leading ciphertext and trailing 16-byte tag. The
/// output slot is written only after the tag verifies — an authentication
/// failure leaves it untouched (its reported length still names the size a
/// successful retry would produce).
pub(crate) fn decrypt(params: &mut Params<'_>) -> Result<(), KeycellError> {
    let [Param::In(key_bytes), Param::In(iv), Param::In(input), Param::Out(out)] =
        params.slots_mut()
    else {
        return Err(KeycellError::InvalidRequestShape);
    };

    if iv.len() != NONCE_LEN {
        return Err(KeycellError::InvalidInput);
    }

    // An input without room for both ciphertext and tag is rejected before
    // any sizing or key material work.
    if input.len() <= TAG_LEN {
        return Err(KeycellError::InvalidInput);
    }

    let required = input.len() - TAG_LEN;
    out.reserve(required)?;

    let (ciphertext, tag) = input.split_at(required);

    let key = AeadKey::create(key_bytes)?;
    let plaintext = primitive::aead_decrypt(key, iv, &[], ciphertext, tag)?;
    out.fill(&[&plaintext])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::OutBuf;

    const KEY: [u8; 16] = [0x11; 16];
    const IV: [u8; NONCE_LEN] = [0x22; NONCE_LEN];

    fn run_encrypt(out: &mut [u8], plaintext: &[u8]) -> Result<usize, KeycellError> {
        let mut params = Params::new([
            Param::In(&KEY),
            Param::In(&IV),
            Param::In(plaintext),
            Param::Out(OutBuf::new(out)),
        ]);
        encrypt(&mut params)?;
        Ok(params.reported_len(3).unwrap_or(0))
    }

    #[test]
    fn test_encrypt_then_decrypt_through_processors() {
        let plaintext = b"processor round trip";
        let mut sealed = vec![0u8; plaintext.len() + TAG_LEN];
        let written = run_encrypt(&mut sealed, plaintext).unwrap();
        assert_eq!(written, plaintext.len() + TAG_LEN);

        let mut opened = vec![0u8; plaintext.len()];
        let mut params = Params::new([
            Param::In(&KEY),
            Param::In(&IV),
            Param::In(&sealed),
            Param::Out(OutBuf::new(&mut opened)),
        ]);
        decrypt(&mut params).unwrap();
        assert_eq!(params.reported_len(3), Some(plaintext.len()));
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_decrypt_rejects_input_no_longer_than_tag() {
        for len in [0usize, 1, TAG_LEN] {
            let input = vec![0u8; len];
            let mut out = [0u8; 16];
            let mut params = Params::new([
                Param::In(&KEY),
                Param::In(&IV),
                Param::In(&input),
                Param::Out(OutBuf::new(&mut out)),
            ]);
            assert!(matches!(
                decrypt(&mut params),
                Err(KeycellError::InvalidInput)
            ));
            // Rejected before sizing: no required length was reported.
            assert_eq!(params.reported_len(3), Some(0));
        }
    }

    #[test]
    fn test_auth_failure_still_reports_required_length() {
        let plaintext = b"tamper target";
        let mut sealed = vec![0u8; plaintext.len() + TAG_LEN];
        run_encrypt(&mut sealed, plaintext).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x80;

        let mut opened = vec![0xaau8; plaintext.len()];
        let mut params = Params::new([
            Param::In(&KEY),
            Param::In(&IV),
            Param::In(&sealed),
            Param::Out(OutBuf::new(&mut opened)),
        ]);
        assert!(matches!(
            decrypt(&mut params),
            Err(KeycellError::AuthenticationFailure)
        ));
        assert_eq!(params.reported_len(3), Some(plaintext.len()));
        // No partial plaintext was written.
        assert!(opened.iter().all(|&b| b == 0xaa));
    }

    #[test]
    fn test_bad_key_length_fails_key_creation() {
        let key = [0u8; 20];
        let mut out = [0u8; 32];
        let mut params = Params::new([
            Param::In(&key),
            Param::In(&IV),
            Param::In(b"msg"),
            Param::Out(OutBuf::new(&mut out)),
        ]);
        assert!(matches!(
            encrypt(&mut params),
            Err(KeycellError::KeyCreationFailed)
        ));
    }
}
