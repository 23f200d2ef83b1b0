use crate::chain::ChainClient;
use crate::error::TransportError;
use crate::types::SubnetId;
use serde::{Deserialize, Serialize};

/// A proof-of-work solution bound to the ledger height it was solved at.
///
/// A solution is admissible only while the ledger stays within the
/// solution window of `block_number` and the difficulty epoch is unchanged.
/// Staleness is monotonic: once stale, a solution never becomes valid
/// again. A solution is consumed by at most one successful submission and
/// discarded on staleness or a terminal failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowSolution {
    /// Partition the search was bound to.
    pub subnet: SubnetId,
    /// Ledger height observed when the search began.
    pub block_number: u64,
    /// Nonce satisfying the puzzle at that height and difficulty.
    pub nonce: u64,
    /// Difficulty the puzzle was solved at.
    pub difficulty: u64,
    /// Puzzle digest proving the work.
    pub seal: [u8; 32],
}

impl PowSolution {
    /// Seal as hex for logging or transport.
    pub fn seal_hex(&self) -> String {
        hex::encode(self.seal)
    }

    /// Whether the admissible window has elapsed.
    ///
    /// Queries live ledger state on every call. The ledger advances
    /// independently of the caller's clock, so the answer must be
    /// re-evaluated immediately before each submission, never cached.
    pub fn is_stale<C: ChainClient + ?Sized>(&self, chain: &C) -> Result<bool, TransportError> {
        let head = chain.current_height()?;
        let window = chain.solution_window()?;
        if head > self.block_number.saturating_add(window) {
            return Ok(true);
        }
        Ok(chain.current_difficulty(self.subnet)? != self.difficulty)
    }
}
