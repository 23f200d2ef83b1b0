//! Client-side orchestration for proof-of-work-gated ledger registration.
//!
//! A registration is admitted by submitting a computationally expensive
//! solution bound to a moving piece of ledger state. The solution's
//! validity window routinely expires faster than it can be produced and
//! submitted, so the heart of this crate is the race management: re-check
//! staleness against live ledger state before every submission, re-solve
//! for free when a solution expires, and count only genuine chain-level
//! rejections against the attempt ceiling. Ambiguous submission results
//! are never trusted: the ledger is re-probed and the reply classified
//! into a typed [`Outcome`].
//!
//! The expensive search itself, the RPC/signing layer, and rendering all
//! live behind injected collaborators:
//! - [`Solver`] runs the puzzle search and is the sole long-running,
//!   cancellable operation.
//! - [`ChainClient`] owns transport, signing, and connection sharing.
//! - [`ProgressSink`] and [`Approval`] replace any global console or
//!   blocking prompt.
//!
//! [`Registrar`] drives four operations: proof-of-work registration with
//! retry accounting, fee-based registration (single shot), a continual
//! reward faucet with independent success/failure ceilings, and a plain
//! identity swap.

pub mod cancel;
pub mod chain;
pub mod config;
pub mod error;
pub mod faucet;
pub mod outcome;
pub mod register;
pub mod report;
pub mod solution;
pub mod solver;
pub mod types;

mod fee;
mod swap;

#[cfg(test)]
mod testkit;

pub use cancel::CancelToken;
pub use chain::ChainClient;
pub use config::{RegisterConfig, RegisterConfigBuilder, WaitPolicy};
pub use error::{RegisterError, TransportError};
pub use faucet::{FaucetReport, FaucetStop};
pub use outcome::{classify_rejection, classify_submission, Outcome, Verdict};
pub use register::Registrar;
pub use report::{
    AlwaysApprove, Approval, ChannelSink, ConfirmContext, Event, NullSink, ProgressSink,
};
pub use solution::PowSolution;
pub use solver::{DeviceSelector, Solver, SolverOptions};
pub use types::{
    Balance, Identity, RegistrationStatus, RegistrationTarget, SubmitAck, SubnetId,
};
