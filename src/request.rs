//! Commands and the four-slot buffer contract.
//!
//! A request is an integer command identifier plus four typed parameter
//! slots. Each slot is either absent, a read-only input buffer, or a
//! bounds-checked output buffer. The slot pattern of a request must equal
//! the single fixed pattern defined for its command — the check is pure,
//! runs before any buffer or key material is touched, and a mismatch
//! rejects the whole request.
//!
//! All buffers are caller-owned. The enclave reads input slots and writes
//! output slots through [`OutBuf`], which can never write past the declared
//! capacity: the wrapper only exposes slice-indexed copies into the memory
//! the caller handed over.

use serde::{Deserialize, Serialize};

use crate::error::KeycellError;

/// Number of parameter slots in every request.
pub const SLOT_COUNT: usize = 4;

/// The commands the enclave accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// AES-GCM encrypt: key, IV, plaintext in; `ciphertext || tag` out.
    Encrypt,
    /// AES-GCM decrypt: key, IV, `ciphertext || tag` in; plaintext out.
    Decrypt,
    /// HMAC-SHA256: key, message in; 32-byte MAC out.
    MacCompute,
}

impl Command {
    pub const ENCRYPT_ID: u32 = 1;
    pub const DECRYPT_ID: u32 = 2;
    pub const MAC_COMPUTE_ID: u32 = 3;

    pub fn to_u32(self) -> u32 {
        match self {
            Self::Encrypt => Self::ENCRYPT_ID,
            Self::Decrypt => Self::DECRYPT_ID,
            Self::MacCompute => Self::MAC_COMPUTE_ID,
        }
    }

    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            Self::ENCRYPT_ID => Some(Self::Encrypt),
            Self::DECRYPT_ID => Some(Self::Decrypt),
            Self::MAC_COMPUTE_ID => Some(Self::MacCompute),
            _ => None,
        }
    }

    /// The one slot pattern this command accepts.
    pub fn expected_shape(self) -> [ParamType; SLOT_COUNT] {
        use ParamType::{Input, None, Output};
        match self {
            Self::Encrypt => [Input, Input, Input, Output],
            Self::Decrypt => [Input, Input, Input, Output],
            Self::MacCompute => [Input, Input, Output, None],
        }
    }
}

/// The direction tag of a parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    None,
    Input,
    Output,
}

// ---------------------------------------------------------------------------
// Output buffers
// ---------------------------------------------------------------------------

/// A caller-owned output buffer with a declared capacity and a reported
/// length.
///
/// The reported length starts at zero. After an invocation it holds the
/// number of bytes actually written on success, or — when the operation
/// failed because the capacity was too small — the length the caller must
/// provide on retry. This mirrors the write-size-back convention of
/// secure-world APIs without ever overloading the error value.
pub struct OutBuf<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> OutBuf<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    /// Declared capacity — the length of the slice the caller handed over.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Reported length after the call (see type-level docs).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Record that the operation needs `required` bytes of capacity.
    ///
    /// The reported length is set to `required` whether or not the check
    /// passes, so a failed call still tells the caller how large a retry
    /// buffer must be.
    pub(crate) fn reserve(&mut self, required: usize) -> Result<(), KeycellError> {
        self.len = required;
        if self.buf.len() < required {
            return Err(KeycellError::ShortBuffer { required });
        }
        Ok(())
    }

    /// Copy `parts` into the buffer back to back, starting at offset 0,
    /// and set the reported length to the total written.
    pub(crate) fn fill(&mut self, parts: &[&[u8]]) -> Result<(), KeycellError> {
        let total: usize = parts.iter().map(|part| part.len()).sum();
        self.reserve(total)?;
        let mut offset = 0;
        for part in parts {
            self.buf[offset..offset + part.len()].copy_from_slice(part);
            offset += part.len();
        }
        self.len = total;
        Ok(())
    }
}

impl std::fmt::Debug for OutBuf<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Contents are deliberately omitted: output slots may hold plaintext.
        f.debug_struct("OutBuf")
            .field("capacity", &self.buf.len())
            .field("len", &self.len)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Parameter slots
// ---------------------------------------------------------------------------

/// One parameter slot of a request.
#[derive(Debug)]
pub enum Param<'a> {
    /// Unused slot.
    None,
    /// Read-only input buffer.
    In(&'a [u8]),
    /// Writable output buffer.
    Out(OutBuf<'a>),
}

impl Param<'_> {
    pub fn param_type(&self) -> ParamType {
        match self {
            Self::None => ParamType::None,
            Self::In(_) => ParamType::Input,
            Self::Out(_) => ParamType::Output,
        }
    }
}

/// The ordered parameter slots of a single request.
///
/// A `Params` value and the buffers it borrows exist for exactly one
/// invocation. Nothing in the enclave retains a reference past the call.
#[derive(Debug)]
pub struct Params<'a> {
    slots: [Param<'a>; SLOT_COUNT],
}

impl<'a> Params<'a> {
    pub fn new(slots: [Param<'a>; SLOT_COUNT]) -> Self {
        Self { slots }
    }

    /// The direction pattern of the four slots.
    pub fn shape(&self) -> [ParamType; SLOT_COUNT] {
        [
            self.slots[0].param_type(),
            self.slots[1].param_type(),
            self.slots[2].param_type(),
            self.slots[3].param_type(),
        ]
    }

    /// Reported length of the output slot at `index`, or `None` if that
    /// slot is not an output buffer.
    pub fn reported_len(&self, index: usize) -> Option<usize> {
        match self.slots.get(index) {
            Some(Param::Out(out)) => Some(out.len()),
            _ => None,
        }
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Param<'a>; SLOT_COUNT] {
        &mut self.slots
    }
}

/// Verify that the request's slot pattern equals the command's pattern.
///
/// Pure and side-effect-free: nothing is read from or written to any
/// buffer, and no key material is touched.
pub(crate) fn check_shape(command: Command, params: &Params<'_>) -> Result<(), KeycellError> {
    if params.shape() != command.expected_shape() {
        return Err(KeycellError::InvalidRequestShape);
    }
    Ok(())
}
