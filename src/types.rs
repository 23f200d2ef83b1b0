use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Ledger partition identifier.
///
/// `ROOT` is the sentinel for the unrestricted/global partition; reward
/// claims (the faucet path) target it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubnetId(pub i32);

impl SubnetId {
    /// The unrestricted/global partition.
    pub const ROOT: SubnetId = SubnetId(-1);

    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }
}

impl Display for SubnetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Opaque ledger account identifier. Key material never enters this crate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(pub String);

impl Identity {
    pub fn new(address: impl Into<String>) -> Self {
        Identity(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw ledger units. Displayed as whole coins with nine fractional digits.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Balance(pub u128);

impl Balance {
    pub const UNITS_PER_COIN: u128 = 1_000_000_000;

    /// Units gained since `earlier`, clamped at zero.
    pub fn saturating_delta(self, earlier: Balance) -> Balance {
        Balance(self.0.saturating_sub(earlier.0))
    }
}

impl Display for Balance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:09}",
            self.0 / Self::UNITS_PER_COIN,
            self.0 % Self::UNITS_PER_COIN
        )
    }
}

/// The two keys of a registration: `owner` authorizes spending (fee path),
/// `operator` is the identity being registered into the partition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationTarget {
    pub subnet: SubnetId,
    pub owner: Identity,
    pub operator: Identity,
}

impl RegistrationTarget {
    pub fn new(subnet: SubnetId, owner: Identity, operator: Identity) -> Self {
        Self {
            subnet,
            owner,
            operator,
        }
    }
}

/// Ledger-observed registration state for an (operator, subnet) pair.
///
/// `details` carries whatever the chain knows about the existing record
/// (slot, registering key, ...) for reporting; the protocol only reads
/// `registered`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationStatus {
    pub registered: bool,
    pub details: Option<String>,
}

/// Raw reply to a submission: the chain-level success flag plus error text.
///
/// A `success` flag alone is never trusted as proof of registration; the
/// orchestrators re-probe ledger state before classifying.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAck {
    pub success: bool,
    pub error: Option<String>,
}

impl SubmitAck {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}
