//! MAC_COMPUTE command processor.

use crate::error::KeycellError;
use crate::keys::MacKey;
use crate::primitive::{self, MAC_LEN};
use crate::request::{Param, Params};

/// MAC_COMPUTE: slots `[key, message, out, none]`.
///
/// The output slot must have capacity for the fixed 32-byte MAC; the check
/// runs before any key material is created.
pub(crate) fn compute(params: &mut Params<'_>) -> Result<(), KeycellError> {
    let [Param::In(key_bytes), Param::In(message), Param::Out(out), Param::None] =
        params.slots_mut()
    else {
        return Err(KeycellError::InvalidRequestShape);
    };

    out.reserve(MAC_LEN)?;

    let key = MacKey::create(key_bytes)?;
    let mac = primitive::mac_compute(key, message)?;
    out.fill(&[&mac])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::OutBuf;

    fn run(key: &[u8], message: &[u8], out: &mut [u8]) -> Result<usize, KeycellError> {
        let mut params = Params::new([
            Param::In(key),
            Param::In(message),
            Param::Out(OutBuf::new(out)),
            Param::None,
        ]);
        compute(&mut params)?;
        Ok(params.reported_len(2).unwrap_or(0))
    }

    #[test]
    fn test_mac_writes_fixed_length() {
        let mut out = [0u8; 64];
        let written = run(b"key material", b"message", &mut out).unwrap();
        assert_eq!(written, MAC_LEN);
    }

    #[test]
    fn test_mac_short_buffer_precedes_key_creation() {
        // Both defects present: empty key and a short buffer. The sizing
        // check must win.
        let mut out = [0u8; MAC_LEN - 1];
        let err = run(b"", b"message", &mut out).unwrap_err();
        assert!(matches!(err, KeycellError::ShortBuffer { required } if required == MAC_LEN));
    }

    #[test]
    fn test_mac_empty_key_rejected() {
        let mut out = [0u8; MAC_LEN];
        assert!(matches!(
            run(b"", b"message", &mut out),
            Err(KeycellError::KeyCreationFailed)
        ));
    }
}
