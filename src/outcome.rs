use crate::types::{RegistrationStatus, SubmitAck};

/// Fallback textual idempotency signal, used only when the ledger probe
/// itself was unavailable.
const ALREADY_REGISTERED_FRAGMENT: &str = "already registered";

/// Classified result of one registration cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Registration observed on the ledger after our submission.
    Confirmed,
    /// The desired end state already held, whether or not this call caused
    /// it. Idempotent success.
    AlreadySatisfied,
    /// Rejected while still fresh. Counts against the attempt ceiling and
    /// forces a fresh solve.
    RetryableFailure(String),
    /// Not recoverable by retrying.
    FatalFailure(String),
    /// The solution expired before a terminal outcome. Loop-internal
    /// signal: re-solve without consuming an attempt.
    Stale,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Confirmed | Outcome::AlreadySatisfied)
    }
}

/// Verdict on a single submission, before loop bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Terminal(Outcome),
    /// Accepted by the chain but not yet observable on the ledger; submit
    /// again while the solution stays fresh.
    NotYetVisible,
}

/// Classify a submission reply against an authoritative registration probe.
///
/// `probe` is the ledger state re-queried right after the submission, or
/// `None` when that probe could not be answered. The ack's `success` flag
/// is never trusted on its own: an accepted submission only becomes
/// `Confirmed` once the ledger shows the registration.
pub fn classify_submission(ack: &SubmitAck, probe: Option<&RegistrationStatus>) -> Verdict {
    if ack.success {
        match probe {
            Some(status) if status.registered => Verdict::Terminal(Outcome::Confirmed),
            _ => Verdict::NotYetVisible,
        }
    } else {
        Verdict::Terminal(classify_rejection(ack, probe))
    }
}

/// Classify a rejected submission.
///
/// When the probe answered, its verdict is final; a concurrent actor may
/// have registered the same identity between our precondition check and
/// this submission, and the ledger is the authority on that. The error
/// text's "already registered" fragment is consulted only when the probe
/// was unavailable.
pub fn classify_rejection(ack: &SubmitAck, probe: Option<&RegistrationStatus>) -> Outcome {
    if let Some(status) = probe {
        if status.registered {
            return Outcome::AlreadySatisfied;
        }
    }
    let reason = ack
        .error
        .clone()
        .unwrap_or_else(|| "unknown error".to_owned());
    if probe.is_none() && reason.to_ascii_lowercase().contains(ALREADY_REGISTERED_FRAGMENT) {
        return Outcome::AlreadySatisfied;
    }
    Outcome::RetryableFailure(reason)
}
