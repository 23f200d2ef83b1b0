use crate::types::{Balance, Identity, RegistrationTarget, SubnetId};

/// Progress notifications emitted while an orchestrator runs. Rendering is
/// the caller's concern; the protocol only reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    CheckingAccount {
        subnet: SubnetId,
    },
    /// Start of a counted registration attempt.
    Attempt {
        current: u32,
        max: u32,
    },
    Solving {
        subnet: SubnetId,
    },
    Submitting {
        subnet: SubnetId,
    },
    /// The current solution expired; a fresh solve follows.
    SolutionStale,
    SubmissionFailed {
        reason: String,
    },
    Confirmed {
        subnet: SubnetId,
    },
    AlreadyRegistered {
        subnet: SubnetId,
        details: Option<String>,
    },
    /// Owner balance movement observed after an accepted submission.
    Balance {
        previous: Balance,
        current: Balance,
    },
    Swapped {
        old: Identity,
        new: Identity,
    },
    /// Terminal failure with the resolved reason.
    Failed {
        reason: String,
    },
}

/// Injected reporting capability. Never a process-wide singleton.
pub trait ProgressSink {
    fn emit(&self, event: Event);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: Event) {}
}

/// Forwards events over a `flume` channel, e.g. to a rendering thread.
///
/// Send failures are swallowed: a dropped or saturated receiver must not
/// stall or abort the protocol.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: flume::Sender<Event>,
}

impl ChannelSink {
    pub fn new(tx: flume::Sender<Event>) -> Self {
        Self { tx }
    }

    pub fn bounded(cap: usize) -> (Self, flume::Receiver<Event>) {
        let (tx, rx) = flume::bounded(cap);
        (Self { tx }, rx)
    }

    pub fn unbounded() -> (Self, flume::Receiver<Event>) {
        let (tx, rx) = flume::unbounded();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: Event) {
        let _ = self.tx.try_send(event);
    }
}

/// What an approval gate is being asked to green-light.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmContext {
    Registration {
        target: RegistrationTarget,
    },
    FeePayment {
        target: RegistrationTarget,
        fee: Balance,
    },
    Faucet {
        owner: Identity,
    },
    Swap {
        old: Identity,
        new: Identity,
    },
}

/// Injected confirmation capability, replacing any blocking global prompt.
/// Declining aborts before the first chain mutation.
pub trait Approval {
    fn confirm(&self, context: &ConfirmContext) -> bool;
}

/// Approves everything; the default when no gate is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysApprove;

impl Approval for AlwaysApprove {
    fn confirm(&self, _context: &ConfirmContext) -> bool {
        true
    }
}
