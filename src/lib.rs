//! # keycell
//!
//! Command-oriented AES-GCM/HMAC service with single-use key contexts.
//!
//! The crate models the boundary between an untrusted caller and an
//! isolated execution context holding key material. The caller exchanges
//! integer command identifiers and up to four typed buffers with the
//! [`Enclave`]; the enclave validates the request shape, materializes key
//! material for exactly one operation, runs AES-GCM encryption/decryption
//! or HMAC-SHA256, packs `ciphertext || tag` results, and reports sizes
//! back through the output slots. No key or key-derived state survives an
//! invocation.
//!
//! ## Public API
//!
//! The public surface is intentionally narrow: the command/parameter types
//! in [`request`], the error taxonomy in [`error`], the [`Enclave`] facade
//! with its audit trail, the pure [`dispatch`] function, and the
//! caller-side [`Invoker`]. The cipher crates are an implementation detail
//! confined to one internal module.

pub(crate) mod aead;
pub mod audit;
pub mod error;
pub mod invoker;
pub(crate) mod keys;
pub(crate) mod mac;
pub(crate) mod primitive;
pub mod request;

pub use error::KeycellError;
pub use invoker::Invoker;
pub use keys::AES_KEY_LENGTHS;
pub use primitive::{MAC_LEN, NONCE_LEN, TAG_LEN};
pub use request::{Command, OutBuf, Param, ParamType, Params};

use chrono::Utc;

use audit::{AuditEvent, AuditLog, AuditSink};

/// Route a validated request to its command processor.
///
/// This is a pure function of the command identifier and the request: no
/// process-wide state, each call independent. The slot pattern is checked
/// against the command's fixed pattern before any buffer is touched.
pub fn dispatch(command_id: u32, params: &mut Params<'_>) -> Result<(), KeycellError> {
    let command = Command::from_u32(command_id).ok_or(KeycellError::UnknownCommand)?;
    request::check_shape(command, params)?;
    match command {
        Command::Encrypt => aead::encrypt(params),
        Command::Decrypt => aead::decrypt(params),
        Command::MacCompute => mac::compute(params),
    }
}

/// The isolated execution context.
///
/// Stateless across calls apart from the audit trail: every invocation is
/// dispatched independently, and key material lives only inside the single
/// call that created it. Invocations are synchronous and run to completion
/// before the next is accepted — `invoke` takes `&mut self`, so two
/// operations can never overlap on one enclave.
#[derive(Default)]
pub struct Enclave {
    audit: AuditLog,
}

impl Enclave {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one command against the enclave.
    ///
    /// On return the output slots of `params` carry their reported
    /// lengths, and one audit event has been recorded — identifiers and
    /// outcome code only, never data.
    pub fn invoke(&mut self, command_id: u32, params: &mut Params<'_>) -> Result<(), KeycellError> {
        let result = dispatch(command_id, params);
        let outcome = match &result {
            Ok(()) => "ok".to_string(),
            Err(err) => err.code().to_string(),
        };
        self.audit.record(AuditEvent {
            command_id,
            outcome,
            at: Utc::now(),
        });
        result
    }

    /// Forward a copy of every future audit event to `sink`.
    pub fn add_audit_sink(&mut self, sink: Box<dyn AuditSink>) {
        self.audit.add_sink(sink);
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }
}
