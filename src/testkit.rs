//! Scripted collaborators shared by the orchestrator test modules.

use crate::cancel::CancelToken;
use crate::chain::ChainClient;
use crate::config::WaitPolicy;
use crate::error::TransportError;
use crate::solution::PowSolution;
use crate::solver::{Solver, SolverOptions};
use crate::types::{
    Balance, Identity, RegistrationStatus, RegistrationTarget, SubmitAck, SubnetId,
};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type RegisteredSet = Arc<Mutex<HashSet<(String, i32)>>>;

/// Scripted effect of the next proof-of-work or fee submission.
pub(crate) enum SubmitScript {
    /// Accept and make the registration visible.
    Accept,
    /// Accept but keep the registration invisible (chain-visibility lag).
    AcceptHidden,
    /// Reject with the given error text.
    Reject(&'static str),
    /// Reject, but flip the ledger to registered (a concurrent actor won).
    RejectRegistered(&'static str),
}

pub(crate) struct MockChain {
    pub height: AtomicU64,
    pub difficulty: AtomicU64,
    pub window: u64,
    pub missing_subnet: bool,
    pub fee: Balance,
    pub registered: RegisteredSet,
    balances: Mutex<VecDeque<u128>>,
    last_balance: Mutex<u128>,
    submit_scripts: Mutex<VecDeque<SubmitScript>>,
    swap_acks: Mutex<VecDeque<SubmitAck>>,
    /// Remaining submit calls to fail at the transport level.
    pub submit_faults: AtomicUsize,
    /// When set, submissions with a drained script are accepted and made
    /// visible, without end.
    pub endless_accept: bool,
    pub submissions: AtomicUsize,
    pub fee_submissions: AtomicUsize,
    pub swap_submissions: AtomicUsize,
    pub status_probes: AtomicUsize,
    pub unlocks: AtomicUsize,
}

pub(crate) const DEFAULT_HEIGHT: u64 = 100;
pub(crate) const DEFAULT_DIFFICULTY: u64 = 10_000;

impl MockChain {
    pub fn new() -> Self {
        Self {
            height: AtomicU64::new(DEFAULT_HEIGHT),
            difficulty: AtomicU64::new(DEFAULT_DIFFICULTY),
            window: 3,
            missing_subnet: false,
            fee: Balance(500),
            registered: Arc::new(Mutex::new(HashSet::new())),
            balances: Mutex::new(VecDeque::new()),
            last_balance: Mutex::new(1_000),
            submit_scripts: Mutex::new(VecDeque::new()),
            swap_acks: Mutex::new(VecDeque::new()),
            submit_faults: AtomicUsize::new(0),
            endless_accept: false,
            submissions: AtomicUsize::new(0),
            fee_submissions: AtomicUsize::new(0),
            swap_submissions: AtomicUsize::new(0),
            status_probes: AtomicUsize::new(0),
            unlocks: AtomicUsize::new(0),
        }
    }

    pub fn script_submits(&self, scripts: impl IntoIterator<Item = SubmitScript>) {
        self.submit_scripts
            .lock()
            .expect("scripts lock")
            .extend(scripts);
    }

    pub fn script_swaps(&self, acks: impl IntoIterator<Item = SubmitAck>) {
        self.swap_acks.lock().expect("swap lock").extend(acks);
    }

    /// Queue the balances the chain reports, in call order. Once drained,
    /// the last value repeats.
    pub fn script_balances(&self, balances: impl IntoIterator<Item = u128>) {
        self.balances
            .lock()
            .expect("balances lock")
            .extend(balances);
    }

    pub fn mark_registered(&self, operator: &Identity, subnet: SubnetId) {
        self.registered
            .lock()
            .expect("registered lock")
            .insert((operator.0.clone(), subnet.0));
    }

    pub fn is_marked(&self, operator: &Identity, subnet: SubnetId) -> bool {
        self.registered
            .lock()
            .expect("registered lock")
            .contains(&(operator.0.clone(), subnet.0))
    }

    fn consume_script(&self, operator: &Identity, subnet: SubnetId) -> SubmitAck {
        let script = self.submit_scripts.lock().expect("scripts lock").pop_front();
        let script = match script {
            Some(script) => script,
            None if self.endless_accept => SubmitScript::Accept,
            None => panic!("unscripted submission"),
        };
        match script {
            SubmitScript::Accept => {
                self.mark_registered(operator, subnet);
                SubmitAck::ok()
            }
            SubmitScript::AcceptHidden => SubmitAck::ok(),
            SubmitScript::Reject(msg) => SubmitAck::rejected(msg),
            SubmitScript::RejectRegistered(msg) => {
                self.mark_registered(operator, subnet);
                SubmitAck::rejected(msg)
            }
        }
    }

    fn take_fault(&self) -> bool {
        self.submit_faults
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl ChainClient for MockChain {
    fn subnet_exists(&self, _subnet: SubnetId) -> Result<bool, TransportError> {
        Ok(!self.missing_subnet)
    }

    fn registration_status(
        &self,
        operator: &Identity,
        subnet: SubnetId,
    ) -> Result<RegistrationStatus, TransportError> {
        self.status_probes.fetch_add(1, Ordering::SeqCst);
        Ok(RegistrationStatus {
            registered: self.is_marked(operator, subnet),
            details: None,
        })
    }

    fn current_height(&self) -> Result<u64, TransportError> {
        Ok(self.height.load(Ordering::SeqCst))
    }

    fn current_difficulty(&self, _subnet: SubnetId) -> Result<u64, TransportError> {
        Ok(self.difficulty.load(Ordering::SeqCst))
    }

    fn solution_window(&self) -> Result<u64, TransportError> {
        Ok(self.window)
    }

    fn balance(&self, _identity: &Identity) -> Result<Balance, TransportError> {
        let mut last = self.last_balance.lock().expect("balance lock");
        if let Some(next) = self.balances.lock().expect("balances lock").pop_front() {
            *last = next;
        }
        Ok(Balance(*last))
    }

    fn fee_amount(&self, _subnet: SubnetId) -> Result<Balance, TransportError> {
        Ok(self.fee)
    }

    fn unlock_owner(&self, _owner: &Identity) -> Result<(), TransportError> {
        self.unlocks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn submit_pow_registration(
        &self,
        target: &RegistrationTarget,
        _solution: &PowSolution,
        _wait: WaitPolicy,
    ) -> Result<SubmitAck, TransportError> {
        if self.take_fault() {
            return Err(TransportError::new("connection reset"));
        }
        self.submissions.fetch_add(1, Ordering::SeqCst);
        Ok(self.consume_script(&target.operator, target.subnet))
    }

    fn submit_fee_registration(
        &self,
        target: &RegistrationTarget,
        _wait: WaitPolicy,
    ) -> Result<SubmitAck, TransportError> {
        if self.take_fault() {
            return Err(TransportError::new("connection reset"));
        }
        self.fee_submissions.fetch_add(1, Ordering::SeqCst);
        Ok(self.consume_script(&target.operator, target.subnet))
    }

    fn submit_identity_swap(
        &self,
        _owner: &Identity,
        _old: &Identity,
        _new: &Identity,
        _wait: WaitPolicy,
    ) -> Result<SubmitAck, TransportError> {
        self.swap_submissions.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .swap_acks
            .lock()
            .expect("swap lock")
            .pop_front()
            .expect("unscripted swap"))
    }
}

/// Scripted solver. With an empty script and no endless template it reports
/// unavailability (`None`).
#[derive(Default)]
pub(crate) struct MockSolver {
    script: Mutex<VecDeque<Option<PowSolution>>>,
    endless: Mutex<Option<PowSolution>>,
    pub calls: AtomicUsize,
    cancel_at: Mutex<Option<usize>>,
    register_at: Mutex<Option<(usize, RegisteredSet, (String, i32))>>,
}

impl MockSolver {
    pub fn push(&self, solution: PowSolution) {
        self.script
            .lock()
            .expect("script lock")
            .push_back(Some(solution));
    }

    pub fn push_fresh(&self, chain: &MockChain, subnet: SubnetId) {
        self.push(fresh_solution(chain, subnet));
    }

    /// Produce fresh solutions forever once the script drains.
    pub fn endless_fresh(&self, chain: &MockChain, subnet: SubnetId) {
        *self.endless.lock().expect("endless lock") = Some(fresh_solution(chain, subnet));
    }

    /// Fire the orchestrator's cancel token on the n-th solve call.
    pub fn cancel_on_call(&self, n: usize) {
        *self.cancel_at.lock().expect("cancel_at lock") = Some(n);
    }

    /// Mark the target registered on the n-th solve call, simulating a
    /// concurrent actor winning the race while we search.
    pub fn register_on_call(&self, n: usize, chain: &MockChain, target: &RegistrationTarget) {
        *self.register_at.lock().expect("register_at lock") = Some((
            n,
            chain.registered.clone(),
            (target.operator.0.clone(), target.subnet.0),
        ));
    }
}

impl Solver for MockSolver {
    fn solve(
        &self,
        _subnet: SubnetId,
        _options: &SolverOptions,
        cancel: &CancelToken,
    ) -> Option<PowSolution> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(at) = *self.cancel_at.lock().expect("cancel_at lock") {
            if n >= at {
                cancel.cancel();
            }
        }
        if let Some((at, registered, key)) =
            self.register_at.lock().expect("register_at lock").as_ref()
        {
            if n >= *at {
                registered.lock().expect("registered lock").insert(key.clone());
            }
        }
        if cancel.is_cancelled() {
            return None;
        }
        if let Some(next) = self.script.lock().expect("script lock").pop_front() {
            return next;
        }
        self.endless.lock().expect("endless lock").clone()
    }
}

/// A solution admissible at the chain's current height and difficulty.
pub(crate) fn fresh_solution(chain: &MockChain, subnet: SubnetId) -> PowSolution {
    PowSolution {
        subnet,
        block_number: chain.height.load(Ordering::SeqCst),
        nonce: 7,
        difficulty: chain.difficulty.load(Ordering::SeqCst),
        seal: [0xAB; 32],
    }
}

/// A solution whose window elapsed long ago.
pub(crate) fn stale_solution(subnet: SubnetId) -> PowSolution {
    PowSolution {
        subnet,
        block_number: 0,
        nonce: 7,
        difficulty: DEFAULT_DIFFICULTY,
        seal: [0xCD; 32],
    }
}

pub(crate) fn target() -> RegistrationTarget {
    RegistrationTarget::new(
        SubnetId(3),
        Identity::new("owner-key"),
        Identity::new("operator-key"),
    )
}
