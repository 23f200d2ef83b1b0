use crate::cancel::CancelToken;
use crate::solution::PowSolution;
use crate::types::SubnetId;
use serde::{Deserialize, Serialize};

/// Hardware selection for accelerated solving: a single device ordinal or
/// an explicit set. Opaque to this crate; the solver interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceSelector {
    Single(u32),
    Many(Vec<u32>),
}

impl Default for DeviceSelector {
    fn default() -> Self {
        DeviceSelector::Single(0)
    }
}

/// Options handed through to the solver unchanged. The orchestrator makes
/// no decisions based on these beyond surfacing an unavailable solver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverOptions {
    pub hardware_acceleration: bool,
    pub device: DeviceSelector,
    pub threads_per_block: u32,
    pub parallelism: Option<usize>,
    /// Nonces to try between progress updates.
    pub update_interval: Option<u64>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            hardware_acceleration: false,
            device: DeviceSelector::default(),
            threads_per_block: 256,
            parallelism: None,
            update_interval: None,
        }
    }
}

/// The puzzle search, the protocol's sole long-running operation.
///
/// `None` reports that no solution could be produced (unusable hardware or
/// cancellation), never an error condition. Implementations should poll
/// `cancel` and return promptly once it fires; no chain mutation happens
/// until submission, so an interrupted search leaves nothing inconsistent.
pub trait Solver {
    fn solve(
        &self,
        subnet: SubnetId,
        options: &SolverOptions,
        cancel: &CancelToken,
    ) -> Option<PowSolution>;
}
