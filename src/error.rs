use crate::types::SubnetId;

/// Connectivity fault between this client and the chain endpoint: timeouts,
/// dropped sockets, RPC transport errors.
///
/// Transport faults are retried with a brief backoff and are never counted
/// against the protocol attempt ceiling; a chain-level rejection arrives
/// inside a `SubmitAck` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError(message.into())
    }
}

/// Terminal protocol failures. These never cross the public entry points:
/// the orchestrators resolve them into the boolean caller contract and emit
/// the reason through the progress sink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    /// The target partition does not exist. Fatal, no attempt accounting.
    #[error("subnet {0} does not exist")]
    PreconditionNotMet(SubnetId),
    /// The solver reported it cannot run (hardware unavailable). Distinct
    /// from staleness; not retried.
    #[error("solver unavailable: no solution produced")]
    SolverUnavailable,
    /// The counted-failure ceiling was reached.
    #[error("no more attempts: ceiling of {0} reached")]
    CeilingExhausted(u32),
    /// Transport retries were exhausted without reaching the chain.
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
