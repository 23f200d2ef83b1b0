//! Identity swap: a single signed transaction, no retry loop, no staleness.

use crate::chain::ChainClient;
use crate::error::RegisterError;
use crate::register::Registrar;
use crate::report::{Approval, ConfirmContext, Event, ProgressSink};
use crate::solver::Solver;
use crate::types::Identity;

impl<C, S, P, A> Registrar<C, S, P, A>
where
    C: ChainClient,
    S: Solver,
    P: ProgressSink,
    A: Approval,
{
    /// Swap `old` for `new` under `owner`'s authority.
    ///
    /// The swap applies atomically on chain or fails outright, so the
    /// chain client's verdict is reported verbatim with no post-hoc
    /// reconfirmation.
    pub fn swap_identity(&self, owner: &Identity, old: &Identity, new: &Identity) -> bool {
        match self.try_swap_identity(owner, old, new) {
            Ok(swapped) => swapped,
            Err(err) => {
                tracing::warn!(error = %err, "identity swap failed");
                self.sink.emit(Event::Failed {
                    reason: err.to_string(),
                });
                false
            }
        }
    }

    fn try_swap_identity(
        &self,
        owner: &Identity,
        old: &Identity,
        new: &Identity,
    ) -> Result<bool, RegisterError> {
        self.with_transport_retry(|| self.chain.unlock_owner(owner))?;
        if self.config.require_approval
            && !self.approval.confirm(&ConfirmContext::Swap {
                old: old.clone(),
                new: new.clone(),
            })
        {
            return Ok(false);
        }
        let ack = self.with_transport_retry(|| {
            self.chain
                .submit_identity_swap(owner, old, new, self.config.wait)
        })?;
        if ack.success {
            self.sink.emit(Event::Swapped {
                old: old.clone(),
                new: new.clone(),
            });
            Ok(true)
        } else {
            let reason = ack.error.unwrap_or_else(|| "unknown error".to_owned());
            self.sink.emit(Event::SubmissionFailed { reason });
            Ok(false)
        }
    }
}
