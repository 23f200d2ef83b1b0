use crate::config::WaitPolicy;
use crate::error::TransportError;
use crate::solution::PowSolution;
use crate::types::{Balance, Identity, RegistrationStatus, RegistrationTarget, SubmitAck, SubnetId};

/// Ledger RPC and signing surface consumed by the orchestrators.
///
/// Methods are individually blocking and short. A `TransportError` means the
/// chain could not be reached and the call may be retried; a chain-level
/// rejection is a successful call whose `SubmitAck` carries `success =
/// false`. The orchestrators rely on that distinction for attempt
/// accounting.
///
/// Implementations own connection-level serialization: several independent
/// orchestrators (different targets, different identities) may drive one
/// shared client concurrently.
pub trait ChainClient {
    fn subnet_exists(&self, subnet: SubnetId) -> Result<bool, TransportError>;

    /// Authoritative registration state for `operator` on `subnet`.
    fn registration_status(
        &self,
        operator: &Identity,
        subnet: SubnetId,
    ) -> Result<RegistrationStatus, TransportError>;

    fn current_height(&self) -> Result<u64, TransportError>;

    /// Difficulty for the current epoch on `subnet`.
    fn current_difficulty(&self, subnet: SubnetId) -> Result<u64, TransportError>;

    /// Number of blocks a solution stays admissible past its creation height.
    fn solution_window(&self) -> Result<u64, TransportError>;

    fn balance(&self, identity: &Identity) -> Result<Balance, TransportError>;

    /// Current recycling fee for fee-based registration on `subnet`.
    fn fee_amount(&self, subnet: SubnetId) -> Result<Balance, TransportError>;

    /// Make the owner's spending key available for signing. The key store
    /// itself lives behind the implementation.
    fn unlock_owner(&self, owner: &Identity) -> Result<(), TransportError>;

    fn submit_pow_registration(
        &self,
        target: &RegistrationTarget,
        solution: &PowSolution,
        wait: WaitPolicy,
    ) -> Result<SubmitAck, TransportError>;

    fn submit_fee_registration(
        &self,
        target: &RegistrationTarget,
        wait: WaitPolicy,
    ) -> Result<SubmitAck, TransportError>;

    fn submit_identity_swap(
        &self,
        owner: &Identity,
        old: &Identity,
        new: &Identity,
        wait: WaitPolicy,
    ) -> Result<SubmitAck, TransportError>;
}
