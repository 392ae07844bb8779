//! Caller-side marshaling.
//!
//! The invoker is the untrusted half of the protocol: it builds the
//! parameter-slot array matching each command's expected shape, sizes the
//! output buffer from the length contract, issues the request, and reads
//! back the reported length (which may be smaller than the supplied
//! capacity). It owns its [`Enclave`] as an in-process stand-in for the
//! session layer.
//!
//! The convenience methods here allocate exact-sized buffers, so a
//! `ShortBuffer` outcome never surfaces through them; callers driving the
//! retry loop themselves go through [`Enclave::invoke`] directly.

use crate::error::KeycellError;
use crate::primitive::{MAC_LEN, TAG_LEN};
use crate::request::{Command, OutBuf, Param, Params};
use crate::Enclave;

/// Caller-side handle bound to one enclave.
#[derive(Default)]
pub struct Invoker {
    enclave: Enclave,
}

impl Invoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enclave(&self) -> &Enclave {
        &self.enclave
    }

    /// Mutable access, e.g. for attaching audit sinks.
    pub fn enclave_mut(&mut self) -> &mut Enclave {
        &mut self.enclave
    }

    /// ENCRYPT round trip: returns `ciphertext || tag`
    /// (`plaintext.len() + 16` bytes).
    pub fn encrypt(
        &mut self,
        key: &[u8],
        iv: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, KeycellError> {
        let mut out = vec![0u8; plaintext.len() + TAG_LEN];
        let written = {
            let mut params = Params::new([
                Param::In(key),
                Param::In(iv),
                Param::In(plaintext),
                Param::Out(OutBuf::new(&mut out)),
            ]);
            self.enclave.invoke(Command::ENCRYPT_ID, &mut params)?;
            params.reported_len(3).unwrap_or(0)
        };
        out.truncate(written);
        Ok(out)
    }

    /// DECRYPT round trip: `input` is `ciphertext || tag`; returns the
    /// plaintext (`input.len() - 16` bytes).
    pub fn decrypt(
        &mut self,
        key: &[u8],
        iv: &[u8],
        input: &[u8],
    ) -> Result<Vec<u8>, KeycellError> {
        let mut out = vec![0u8; input.len().saturating_sub(TAG_LEN)];
        let written = {
            let mut params = Params::new([
                Param::In(key),
                Param::In(iv),
                Param::In(input),
                Param::Out(OutBuf::new(&mut out)),
            ]);
            self.enclave.invoke(Command::DECRYPT_ID, &mut params)?;
            params.reported_len(3).unwrap_or(0)
        };
        out.truncate(written);
        Ok(out)
    }

    /// MAC_COMPUTE round trip: returns the 32-byte HMAC-SHA256.
    pub fn mac_compute(&mut self, key: &[u8], message: &[u8]) -> Result<Vec<u8>, KeycellError> {
        let mut out = vec![0u8; MAC_LEN];
        let written = {
            let mut params = Params::new([
                Param::In(key),
                Param::In(message),
                Param::Out(OutBuf::new(&mut out)),
                Param::None,
            ]);
            self.enclave.invoke(Command::MAC_COMPUTE_ID, &mut params)?;
            params.reported_len(2).unwrap_or(0)
        };
        out.truncate(written);
        Ok(out)
    }

    /// Round-trip acceptance check: ENCRYPT then DECRYPT a fixed vector
    /// and verify the recovered plaintext.
    ///
    /// A recovered plaintext that differs from the original means the
    /// engine produced wrong bytes, reported as `PrimitiveFailure`.
    pub fn self_test(&mut self) -> Result<(), KeycellError> {
        const KEY: [u8; 16] = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ];
        const IV: [u8; 12] = [
            0xa0, 0xa1, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7, 0xa8, 0xa9, 0xaa, 0xab,
        ];
        const PLAINTEXT: &[u8] = b"Hello AES-GCM";

        let sealed = self.encrypt(&KEY, &IV, PLAINTEXT)?;
        if sealed.len() != PLAINTEXT.len() + TAG_LEN {
            return Err(KeycellError::PrimitiveFailure);
        }

        let opened = self.decrypt(&KEY, &IV, &sealed)?;
        if opened != PLAINTEXT {
            return Err(KeycellError::PrimitiveFailure);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_test_passes() {
        Invoker::new().self_test().unwrap();
    }

    #[test]
    fn test_lengths_follow_the_contract() {
        let mut invoker = Invoker::new();
        let key = [5u8; 24];
        let iv = [6u8; 12];

        let sealed = invoker.encrypt(&key, &iv, b"abc").unwrap();
        assert_eq!(sealed.len(), 3 + TAG_LEN);

        let opened = invoker.decrypt(&key, &iv, &sealed).unwrap();
        assert_eq!(opened.len(), sealed.len() - TAG_LEN);
        assert_eq!(opened, b"abc");

        let mac = invoker.mac_compute(&key, b"abc").unwrap();
        assert_eq!(mac.len(), MAC_LEN);
    }
}
