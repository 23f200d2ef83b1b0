use crate::cancel::CancelToken;
use crate::chain::ChainClient;
use crate::config::RegisterConfig;
use crate::error::{RegisterError, TransportError};
use crate::outcome::{classify_submission, Outcome, Verdict};
use crate::report::{AlwaysApprove, Approval, ConfirmContext, Event, NullSink, ProgressSink};
use crate::solution::PowSolution;
use crate::solver::Solver;
use crate::types::{RegistrationStatus, RegistrationTarget};
use rand::Rng;
use std::thread;
use std::time::Duration;

/// Transport retries per chain call before the fault becomes terminal.
const TRANSPORT_RETRIES: u32 = 3;
/// Base backoff between transport retries; jitter is added on top.
const TRANSPORT_BACKOFF: Duration = Duration::from_millis(200);
/// Pause after a chain-level rejection before the next cycle.
pub(crate) const REJECTION_SETTLE: Duration = Duration::from_millis(500);

/// Drives one registration target to completion against a chain client and
/// a solver. Single-flow: one instance works one target sequentially;
/// independent instances may share a chain client.
///
/// Progress reporting and confirmation are injected capabilities; by
/// default nothing is reported and everything is approved.
pub struct Registrar<C, S, P = NullSink, A = AlwaysApprove> {
    pub(crate) chain: C,
    pub(crate) solver: S,
    pub(crate) sink: P,
    pub(crate) approval: A,
    pub(crate) config: RegisterConfig,
    pub(crate) cancel: CancelToken,
}

impl<C, S> Registrar<C, S>
where
    C: ChainClient,
    S: Solver,
{
    pub fn new(chain: C, solver: S, config: RegisterConfig) -> Self {
        Self {
            chain,
            solver,
            sink: NullSink,
            approval: AlwaysApprove,
            config,
            cancel: CancelToken::new(),
        }
    }
}

impl<C, S, P, A> Registrar<C, S, P, A>
where
    C: ChainClient,
    S: Solver,
    P: ProgressSink,
    A: Approval,
{
    /// Replace the progress sink.
    pub fn with_sink<P2: ProgressSink>(self, sink: P2) -> Registrar<C, S, P2, A> {
        Registrar {
            chain: self.chain,
            solver: self.solver,
            sink,
            approval: self.approval,
            config: self.config,
            cancel: self.cancel,
        }
    }

    /// Replace the approval gate.
    pub fn with_approval<A2: Approval>(self, approval: A2) -> Registrar<C, S, P, A2> {
        Registrar {
            chain: self.chain,
            solver: self.solver,
            sink: self.sink,
            approval,
            config: self.config,
            cancel: self.cancel,
        }
    }

    /// Handle for cancelling this registrar's long-running operations.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &RegisterConfig {
        &self.config
    }

    /// Register `target.operator` on `target.subnet` by proof of work.
    ///
    /// Drives the full protocol: precondition check, solve, submit while
    /// the solution stays fresh, classify, retry or stop. Staleness
    /// re-solves are free; chain-level rejections count against the
    /// attempt ceiling. `Confirmed` and `AlreadySatisfied` both map to
    /// `true`; every failure class resolves to `false` with the reason
    /// reported through the sink.
    pub fn register(&self, target: &RegistrationTarget) -> bool {
        match self.try_register(target) {
            Ok(outcome) => outcome.is_success(),
            Err(err) => {
                tracing::warn!(error = %err, subnet = %target.subnet, "registration failed");
                self.sink.emit(Event::Failed {
                    reason: err.to_string(),
                });
                false
            }
        }
    }

    fn try_register(&self, target: &RegistrationTarget) -> Result<Outcome, RegisterError> {
        let mut approved = !self.config.require_approval;
        let mut ledger = AttemptLedger::new(self.config.max_allowed_attempts);
        loop {
            if let Some(outcome) = self.check_preconditions(target)? {
                return Ok(outcome);
            }
            if !approved {
                if !self.approval.confirm(&ConfirmContext::Registration {
                    target: target.clone(),
                }) {
                    return Ok(Outcome::FatalFailure("declined by approval gate".to_owned()));
                }
                approved = true;
            }
            self.sink.emit(Event::Attempt {
                current: ledger.attempt(),
                max: self.config.max_allowed_attempts,
            });
            match self.solve_and_submit(target)? {
                Outcome::Confirmed => {
                    self.sink.emit(Event::Confirmed {
                        subnet: target.subnet,
                    });
                    return Ok(Outcome::Confirmed);
                }
                Outcome::AlreadySatisfied => {
                    self.sink.emit(Event::AlreadyRegistered {
                        subnet: target.subnet,
                        details: None,
                    });
                    return Ok(Outcome::AlreadySatisfied);
                }
                Outcome::RetryableFailure(reason) => {
                    tracing::debug!(
                        reason = %reason,
                        attempt = ledger.attempt(),
                        "registration attempt failed, retrying with fresh solve"
                    );
                    if let NextAction::GiveUp = ledger.on_counted_failure() {
                        return Err(RegisterError::CeilingExhausted(
                            self.config.max_allowed_attempts,
                        ));
                    }
                }
                Outcome::Stale => continue,
                fatal @ Outcome::FatalFailure(_) => return Ok(fatal),
            }
        }
    }

    /// Fail fast on a missing partition; short-circuit on an operator that
    /// is already registered, without consuming a solver call.
    fn check_preconditions(
        &self,
        target: &RegistrationTarget,
    ) -> Result<Option<Outcome>, RegisterError> {
        if !self.with_transport_retry(|| self.chain.subnet_exists(target.subnet))? {
            return Err(RegisterError::PreconditionNotMet(target.subnet));
        }
        self.sink.emit(Event::CheckingAccount {
            subnet: target.subnet,
        });
        let status = self.with_transport_retry(|| {
            self.chain.registration_status(&target.operator, target.subnet)
        })?;
        if status.registered {
            tracing::debug!(
                operator = %target.operator,
                subnet = %target.subnet,
                "operator already registered"
            );
            self.sink.emit(Event::AlreadyRegistered {
                subnet: target.subnet,
                details: status.details,
            });
            return Ok(Some(Outcome::AlreadySatisfied));
        }
        Ok(None)
    }

    /// One counted cycle: mint solutions until one survives to a terminal
    /// verdict. Staleness stays inside this loop and is never counted.
    fn solve_and_submit(&self, target: &RegistrationTarget) -> Result<Outcome, RegisterError> {
        loop {
            if self.cancel.is_cancelled() {
                return Ok(Outcome::FatalFailure("cancelled".to_owned()));
            }
            self.sink.emit(Event::Solving {
                subnet: target.subnet,
            });
            let Some(solution) =
                self.solver
                    .solve(target.subnet, &self.config.solver, &self.cancel)
            else {
                if self.cancel.is_cancelled() {
                    return Ok(Outcome::FatalFailure("cancelled".to_owned()));
                }
                // A concurrent actor may have registered the operator while
                // the search ran; probe once before declaring the solver
                // unusable.
                let status = self.with_transport_retry(|| {
                    self.chain.registration_status(&target.operator, target.subnet)
                })?;
                if status.registered {
                    return Ok(Outcome::AlreadySatisfied);
                }
                return Err(RegisterError::SolverUnavailable);
            };
            match self.submit_while_fresh(target, &solution)? {
                Outcome::Stale => {
                    self.sink.emit(Event::SolutionStale);
                    continue;
                }
                outcome => return Ok(outcome),
            }
        }
    }

    /// Submit `solution` until it is consumed, rejected, or expires. The
    /// staleness predicate is re-evaluated against live ledger state before
    /// every submission.
    fn submit_while_fresh(
        &self,
        target: &RegistrationTarget,
        solution: &PowSolution,
    ) -> Result<Outcome, RegisterError> {
        self.sink.emit(Event::Submitting {
            subnet: target.subnet,
        });
        tracing::debug!(
            seal = %solution.seal_hex(),
            height = solution.block_number,
            "submitting solution"
        );
        while !self.with_transport_retry(|| solution.is_stale(&self.chain))? {
            let ack = self.with_transport_retry(|| {
                self.chain
                    .submit_pow_registration(target, solution, self.config.wait)
            })?;
            let probe = self.probe_registration(target);
            match classify_submission(&ack, probe.as_ref()) {
                Verdict::Terminal(Outcome::RetryableFailure(reason)) => {
                    self.sink.emit(Event::SubmissionFailed {
                        reason: reason.clone(),
                    });
                    thread::sleep(REJECTION_SETTLE);
                    return Ok(Outcome::RetryableFailure(reason));
                }
                Verdict::Terminal(outcome) => return Ok(outcome),
                Verdict::NotYetVisible => {
                    tracing::debug!("submission accepted but not yet visible, retrying while fresh");
                }
            }
        }
        Ok(Outcome::Stale)
    }

    /// Best-effort authoritative re-probe after a submission. `None` means
    /// the probe could not be answered and classification may fall back to
    /// the error text.
    pub(crate) fn probe_registration(
        &self,
        target: &RegistrationTarget,
    ) -> Option<RegistrationStatus> {
        self.with_transport_retry(|| {
            self.chain.registration_status(&target.operator, target.subnet)
        })
        .ok()
    }

    /// Retry a chain call through transient connectivity faults. These
    /// retries are a client-to-client concern and never touch the protocol
    /// attempt ceiling.
    pub(crate) fn with_transport_retry<T>(
        &self,
        mut op: impl FnMut() -> Result<T, TransportError>,
    ) -> Result<T, TransportError> {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt >= TRANSPORT_RETRIES {
                        return Err(err);
                    }
                    tracing::debug!(error = %err, attempt, "transport fault, backing off");
                    thread::sleep(jittered(TRANSPORT_BACKOFF));
                }
            }
        }
    }
}

fn jittered(base: Duration) -> Duration {
    let half = base.as_millis() as u64 / 2;
    base + Duration::from_millis(rand::thread_rng().gen_range(0..=half))
}

/// Pure attempt accounting: a transition over (counter, classified outcome)
/// with no side effects. The counter starts at one, never wraps, and never
/// resets within a top-level call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AttemptLedger {
    attempts: u32,
    ceiling: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NextAction {
    /// Loop back to the precondition check with a fresh solve.
    RetryFresh,
    GiveUp,
}

impl AttemptLedger {
    pub(crate) fn new(ceiling: u32) -> Self {
        Self {
            attempts: 1,
            ceiling,
        }
    }

    pub(crate) fn attempt(&self) -> u32 {
        self.attempts
    }

    /// Absorb a counted failure. Staleness must never be fed through here.
    pub(crate) fn on_counted_failure(&mut self) -> NextAction {
        if self.attempts >= self.ceiling {
            NextAction::GiveUp
        } else {
            self.attempts += 1;
            NextAction::RetryFresh
        }
    }
}
