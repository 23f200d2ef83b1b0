use crate::error::RegisterError;
use crate::solver::SolverOptions;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Waiting behavior for submitted transactions, passed through to the
/// chain client unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitPolicy {
    /// Wait for the transaction to enter a block.
    pub inclusion: bool,
    /// Wait for the transaction to be finalized.
    pub finalization: bool,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            inclusion: false,
            finalization: true,
        }
    }
}

/// Orchestrator configuration.
///
/// Everything except the ceilings is passed through to the collaborators
/// unchanged; `max_allowed_attempts` and `max_successes` are enforced here.
#[derive(Builder, Clone, Debug)]
#[builder(pattern = "owned")]
pub struct RegisterConfig {
    #[builder(default)]
    pub wait: WaitPolicy,
    /// Counted-failure ceiling before the orchestrator gives up.
    #[builder(default = "3")]
    pub max_allowed_attempts: u32,
    /// Successful reward claims after which the faucet loop stops.
    #[builder(default = "3")]
    pub max_successes: u32,
    /// Gate chain mutations on the injected approval capability.
    #[builder(default)]
    pub require_approval: bool,
    #[builder(default)]
    pub solver: SolverOptions,
}

impl RegisterConfigBuilder {
    fn validate(&self) -> Result<(), RegisterError> {
        if self.max_allowed_attempts == Some(0) {
            return Err(RegisterError::InvalidConfig(
                "max_allowed_attempts must be >= 1".into(),
            ));
        }
        if self.max_successes == Some(0) {
            return Err(RegisterError::InvalidConfig(
                "max_successes must be >= 1".into(),
            ));
        }
        Ok(())
    }

    pub fn build_validated(self) -> Result<RegisterConfig, RegisterError> {
        self.validate()?;
        self.build()
            .map_err(|e| RegisterError::InvalidConfig(e.to_string()))
    }
}

impl Default for RegisterConfig {
    fn default() -> Self {
        RegisterConfigBuilder::default()
            .build()
            .expect("default config is valid")
    }
}
