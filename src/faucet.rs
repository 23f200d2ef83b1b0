//! Faucet loop: repeat the solve+submit cycle against the unrestricted
//! partition to accumulate a bounded number of reward claims.

use crate::chain::ChainClient;
use crate::error::RegisterError;
use crate::register::{Registrar, REJECTION_SETTLE};
use crate::report::{Approval, ConfirmContext, Event, ProgressSink};
use crate::solver::Solver;
use crate::types::{Identity, RegistrationTarget, SubnetId};
use std::thread;

/// Why the faucet loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaucetStop {
    /// Reached the configured success ceiling.
    MaxSuccesses,
    /// Reached the consecutive-failure ceiling.
    MaxAttempts,
    /// The caller cancelled; partial progress is preserved.
    Cancelled,
    /// Aborted before completing: declined, solver unavailable, or
    /// transport lost.
    Aborted,
}

/// Typed result of a faucet run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaucetReport {
    pub success: bool,
    pub message: String,
    /// Confirmed reward claims.
    pub successes: u32,
    pub stop: FaucetStop,
}

impl<C, S, P, A> Registrar<C, S, P, A>
where
    C: ChainClient,
    S: Solver,
    P: ProgressSink,
    A: Approval,
{
    /// Run the continual proof-of-work faucet for `owner`.
    ///
    /// Each cycle mints an admissible solution (re-solving while stale,
    /// uncounted) and submits it once. Two independent ceilings bound the
    /// loop: `max_allowed_attempts` consecutive rejections, and
    /// `max_successes` cumulative claims. The success ceiling is exact,
    /// never overshot. Cancellation through the registrar's token is a
    /// clean partial success, not an error.
    pub fn run_faucet(&self, owner: &Identity) -> FaucetReport {
        let mut successes = 0u32;
        match self.faucet_loop(owner, &mut successes) {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(error = %err, "faucet run aborted");
                self.sink.emit(Event::Failed {
                    reason: err.to_string(),
                });
                FaucetReport {
                    success: false,
                    message: err.to_string(),
                    successes,
                    stop: FaucetStop::Aborted,
                }
            }
        }
    }

    fn faucet_loop(
        &self,
        owner: &Identity,
        successes: &mut u32,
    ) -> Result<FaucetReport, RegisterError> {
        if self.config.require_approval
            && !self.approval.confirm(&ConfirmContext::Faucet {
                owner: owner.clone(),
            })
        {
            return Ok(FaucetReport {
                success: false,
                message: "declined by approval gate".to_owned(),
                successes: *successes,
                stop: FaucetStop::Aborted,
            });
        }
        self.with_transport_retry(|| self.chain.unlock_owner(owner))?;
        let target = RegistrationTarget::new(SubnetId::ROOT, owner.clone(), owner.clone());
        let mut previous = self.with_transport_retry(|| self.chain.balance(owner))?;
        let mut consecutive_failures = 0u32;
        loop {
            if self.cancel.is_cancelled() {
                return Ok(cancelled_report(*successes));
            }
            // Mint a solution that is still admissible right now.
            let solution = loop {
                self.sink.emit(Event::Solving {
                    subnet: SubnetId::ROOT,
                });
                let Some(candidate) =
                    self.solver
                        .solve(SubnetId::ROOT, &self.config.solver, &self.cancel)
                else {
                    if self.cancel.is_cancelled() {
                        return Ok(cancelled_report(*successes));
                    }
                    return Err(RegisterError::SolverUnavailable);
                };
                if self.with_transport_retry(|| candidate.is_stale(&self.chain))? {
                    self.sink.emit(Event::SolutionStale);
                    continue;
                }
                break candidate;
            };
            self.sink.emit(Event::Submitting {
                subnet: SubnetId::ROOT,
            });
            let ack = self.with_transport_retry(|| {
                self.chain
                    .submit_pow_registration(&target, &solution, self.config.wait)
            })?;
            if ack.success {
                let current = self.with_transport_retry(|| self.chain.balance(owner))?;
                self.sink.emit(Event::Balance { previous, current });
                tracing::debug!(
                    claimed = %current.saturating_delta(previous),
                    "faucet reward claimed"
                );
                previous = current;
                *successes += 1;
                consecutive_failures = 0;
                if *successes >= self.config.max_successes {
                    return Ok(FaucetReport {
                        success: true,
                        message: format!(
                            "max successes reached: {}",
                            self.config.max_successes
                        ),
                        successes: *successes,
                        stop: FaucetStop::MaxSuccesses,
                    });
                }
            } else {
                let reason = ack.error.unwrap_or_else(|| "unknown error".to_owned());
                tracing::debug!(reason = %reason, "faucet submission rejected");
                self.sink.emit(Event::SubmissionFailed {
                    reason: reason.clone(),
                });
                consecutive_failures += 1;
                if consecutive_failures >= self.config.max_allowed_attempts {
                    return Ok(FaucetReport {
                        success: false,
                        message: format!(
                            "max attempts reached: {}",
                            self.config.max_allowed_attempts
                        ),
                        successes: *successes,
                        stop: FaucetStop::MaxAttempts,
                    });
                }
                thread::sleep(REJECTION_SETTLE);
            }
        }
    }
}

fn cancelled_report(successes: u32) -> FaucetReport {
    FaucetReport {
        success: true,
        message: "cancelled by caller".to_owned(),
        successes,
        stop: FaucetStop::Cancelled,
    }
}
