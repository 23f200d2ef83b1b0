//! Fee-based registration: pay the recycling fee instead of proving work.

use crate::chain::ChainClient;
use crate::error::RegisterError;
use crate::outcome::{classify_rejection, Outcome};
use crate::register::Registrar;
use crate::report::{Approval, ConfirmContext, Event, ProgressSink};
use crate::solver::Solver;
use crate::types::RegistrationTarget;

impl<C, S, P, A> Registrar<C, S, P, A>
where
    C: ChainClient,
    S: Solver,
    P: ProgressSink,
    A: Approval,
{
    /// Register `target.operator` by paying the current recycling fee.
    ///
    /// No solver, no staleness loop, no retry ceiling: the single
    /// submission either lands, turns out to be idempotently satisfied, or
    /// fails the whole call. Balance movement is read around the
    /// submission for reporting only; an insufficient balance surfaces as
    /// a rejected submission, not as a precondition.
    pub fn register_by_fee(&self, target: &RegistrationTarget) -> bool {
        match self.try_register_by_fee(target) {
            Ok(outcome) => outcome.is_success(),
            Err(err) => {
                tracing::warn!(error = %err, subnet = %target.subnet, "fee registration failed");
                self.sink.emit(Event::Failed {
                    reason: err.to_string(),
                });
                false
            }
        }
    }

    fn try_register_by_fee(&self, target: &RegistrationTarget) -> Result<Outcome, RegisterError> {
        if !self.with_transport_retry(|| self.chain.subnet_exists(target.subnet))? {
            return Err(RegisterError::PreconditionNotMet(target.subnet));
        }
        self.with_transport_retry(|| self.chain.unlock_owner(&target.owner))?;
        self.sink.emit(Event::CheckingAccount {
            subnet: target.subnet,
        });
        let status = self.with_transport_retry(|| {
            self.chain.registration_status(&target.operator, target.subnet)
        })?;
        let previous = self.with_transport_retry(|| self.chain.balance(&target.owner))?;
        let fee = self.with_transport_retry(|| self.chain.fee_amount(target.subnet))?;
        if status.registered {
            self.sink.emit(Event::AlreadyRegistered {
                subnet: target.subnet,
                details: status.details,
            });
            return Ok(Outcome::AlreadySatisfied);
        }
        if self.config.require_approval
            && !self.approval.confirm(&ConfirmContext::FeePayment {
                target: target.clone(),
                fee,
            })
        {
            return Ok(Outcome::FatalFailure("declined by approval gate".to_owned()));
        }
        tracing::debug!(%fee, subnet = %target.subnet, "recycling fee for registration");
        let ack = self.with_transport_retry(|| {
            self.chain.submit_fee_registration(target, self.config.wait)
        })?;
        if !ack.success {
            let probe = self.probe_registration(target);
            return match classify_rejection(&ack, probe.as_ref()) {
                Outcome::AlreadySatisfied => {
                    self.sink.emit(Event::AlreadyRegistered {
                        subnet: target.subnet,
                        details: None,
                    });
                    Ok(Outcome::AlreadySatisfied)
                }
                Outcome::RetryableFailure(reason) | Outcome::FatalFailure(reason) => {
                    // Single-shot path: any other rejection is terminal.
                    self.sink.emit(Event::SubmissionFailed {
                        reason: reason.clone(),
                    });
                    Ok(Outcome::FatalFailure(reason))
                }
                other => Ok(other),
            };
        }
        let current = self.with_transport_retry(|| self.chain.balance(&target.owner))?;
        self.sink.emit(Event::Balance { previous, current });
        let confirmed = self.with_transport_retry(|| {
            self.chain.registration_status(&target.operator, target.subnet)
        })?;
        if confirmed.registered {
            self.sink.emit(Event::Confirmed {
                subnet: target.subnet,
            });
            Ok(Outcome::Confirmed)
        } else {
            let reason = "registration not visible after acceptance".to_owned();
            self.sink.emit(Event::SubmissionFailed {
                reason: reason.clone(),
            });
            Ok(Outcome::FatalFailure(reason))
        }
    }
}
