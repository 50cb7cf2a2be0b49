use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
	error::Error,
	input_func::InputFunc,
	phf::PhfGraph,
	rand_hash::RandHashGen,
	regvec::RvMgr,
	solver::Solver,
	variable::{candidate_pool, Variable},
};

pub use crate::solver::OrderingMode;

/// What the outer retry loop is trying to build out of the hash functions it generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
	PerfectHash,
	CollisionFreePartition,
}

/// All driver-level knobs enumerated in the external interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
	pub multiplicity: usize,
	pub compound_degree: usize,
	pub branch_limit: usize,
	pub time_limit_seconds: u64,
	pub ordering_mode: OrderingMode,
	pub count_limit: usize,
	pub hash_count: usize,
	pub max_degree: usize,
	pub debug_level: u32,
	/// Seeds the random hash generator. Not part of the reference's option set, but required
	/// for a deterministic, thread-free engine invocation; the CLI exposes it as `--seed`.
	pub seed: u64,
}

impl Default for DriverConfig {
	fn default() -> Self {
		DriverConfig {
			multiplicity: 1,
			compound_degree: 1,
			branch_limit: 0,
			time_limit_seconds: 0,
			ordering_mode: OrderingMode::default(),
			count_limit: 100,
			hash_count: 2,
			max_degree: 2,
			debug_level: 0,
			seed: 0x5eed,
		}
	}
}

impl DriverConfig {
	/// `q` is the registered-vector store's index width; used to reject configurations whose
	/// initial hash width already exceeds what `InputFunc::eval`'s u32 output can carry.
	pub fn validate(&self, k: usize, q: usize) -> Result<(), Error> {
		if self.multiplicity == 0 {
			return Err(Error::InconsistentConfiguration("multiplicity must be positive".to_string()));
		}
		if self.multiplicity > k {
			return Err(Error::InconsistentConfiguration(format!("multiplicity {} exceeds registered vector count {k}", self.multiplicity)));
		}
		if self.compound_degree == 0 {
			return Err(Error::InconsistentConfiguration("compound_degree must be positive".to_string()));
		}
		if self.count_limit == 0 {
			return Err(Error::InconsistentConfiguration("count_limit must be positive".to_string()));
		}
		if self.hash_count == 0 {
			return Err(Error::InconsistentConfiguration("hash_count must be at least 1".to_string()));
		}
		if self.max_degree == 0 {
			return Err(Error::InconsistentConfiguration("max_degree must be at least 1".to_string()));
		}

		let p0 = q.saturating_sub(crate::regvec::ceil_log2(self.hash_count)).max(1);
		if p0 > MAX_HASH_WIDTH {
			return Err(Error::InconsistentConfiguration(format!("initial hash width {p0} exceeds the maximum supported width {MAX_HASH_WIDTH}")));
		}

		Ok(())
	}
}

/// Three models for the memory a synthesized IGU would occupy: a direct table indexed by the
/// raw p-bit hash, Sasao's two-level parallel IGU, and the information-theoretic ideal of one
/// (n+q)-bit entry per registered vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryEstimate {
	pub direct_table: usize,
	pub parallel_igu: usize,
	pub ideal: usize,
}

/// `n` = vector width, `p` = hash width, `q` = index width, `k` = vector count, `m` = multiplicity.
pub fn memory_estimate(n: usize, p: usize, q: usize, k: usize, m: usize) -> MemoryEstimate {
	assert!(p <= n, "hash width cannot exceed vector width");
	let exp_p = 1usize << p;
	let exp_q = 1usize << q;

	MemoryEstimate {
		direct_table: exp_p * (n - p + q) * m,
		parallel_igu: (exp_p * q + exp_q * (n - p)) * m,
		ideal: k * (n + q),
	}
}

/// Outcome of a full driver run: either a synthesized answer, or exhaustion of the p search
/// range without success.
#[derive(Debug, Clone)]
pub enum DriverOutcome {
	PerfectHash { p: usize, functions: Vec<InputFunc>, g_tables: Vec<Vec<u32>> },
	CollisionFreePartition { p: usize, functions: Vec<InputFunc>, block_map: Vec<usize> },
	Exhausted { last_p: usize },
}

/// Outcome of the variable-selection path: the minimum signature found and whether the search
/// ran to completion or was cut short by `time_limit_seconds`.
#[derive(Debug, Clone)]
pub struct SignatureOutcome {
	pub signature: Vec<Variable>,
	pub timed_out: bool,
}

/// Caps how far the outer loop raises p before giving up; p past the vector width can never
/// help and would overflow `InputFunc::eval`'s u32 output.
const MAX_HASH_WIDTH: usize = 31;

/// The outer composition loop: pick p, generate `hash_count` random hash functions of that
/// width, ask the PHF engine for the requested `Goal`; retry up to `count_limit` times per p,
/// then increment p and reset the counter.
pub struct Driver {
	config: DriverConfig,
}

impl Driver {
	pub fn new(config: DriverConfig) -> Self {
		Driver { config }
	}

	pub fn run(&self, rvmgr: &RvMgr, goal: Goal) -> Result<DriverOutcome, Error> {
		let k = rvmgr.vect_count();
		let n = rvmgr.vect_size();
		let q = rvmgr.index_size();
		self.config.validate(k, q)?;

		let d = self.config.hash_count;

		let mut p = q.saturating_sub(crate::regvec::ceil_log2(d)).max(1);
		let mut gen = RandHashGen::seeded(self.config.seed);

		while p <= n.min(MAX_HASH_WIDTH) {
			info!("igu driver: trying p = {p} ({d} functions, up to {} retries)", self.config.count_limit);

			for attempt in 0..self.config.count_limit {
				let functions: Vec<InputFunc> = (0..d).map(|_| gen.gen_func(n, p, self.config.max_degree)).collect();
				let func_vects = functions.iter().map(|f| rvmgr.gen_hash_vect(f)).collect::<Vec<_>>();

				let mut graph = PhfGraph::build(&func_vects);

				match goal {
					Goal::PerfectHash => {
						if !graph.simple_check() {
							debug!("p={p} attempt={attempt}: not simple");
							continue;
						}
						if let Some(order) = graph.acyclic_check() {
							let g_tables = graph.assign(&order);
							return Ok(DriverOutcome::PerfectHash { p, functions, g_tables });
						}
						debug!("p={p} attempt={attempt}: cyclic, retrying");
					}
					Goal::CollisionFreePartition => {
						if let Some(block_map) = graph.collision_free_partition() {
							return Ok(DriverOutcome::CollisionFreePartition { p, functions, block_map });
						}
						debug!("p={p} attempt={attempt}: no collision-free partition, retrying");
					}
				}
			}

			warn!("igu driver: exhausted {} retries at p = {p}, raising p", self.config.count_limit);
			p += 1;
		}

		Ok(DriverOutcome::Exhausted { last_p: p.saturating_sub(1) })
	}

	/// The variable-selection path: searches directly over bit positions of the registered
	/// vectors for a minimum distinguishing signature, without ever generating a random hash
	/// function. This is the mode the reference `igf` tool runs by default.
	pub fn solve_signature(&self, rvmgr: &RvMgr) -> Result<SignatureOutcome, Error> {
		let k = rvmgr.vect_count();
		self.config.validate(k, rvmgr.index_size())?;

		let candidates = candidate_pool(rvmgr.vect_size(), self.config.compound_degree);
		let mut solver = Solver::new(rvmgr.vect_list(), self.config.multiplicity)
			.with_branch_limit(self.config.branch_limit)
			.with_ordering_mode(self.config.ordering_mode)
			.with_debug_level(self.config.debug_level);

		if self.config.time_limit_seconds > 0 {
			solver = solver.with_time_limit(Duration::from_secs(self.config.time_limit_seconds));
		}

		let signature = solver.solve(&candidates, candidates.len() + 1);
		info!("variable-selection solver: signature width {} (timed out = {})", signature.len(), solver.timed_out());

		Ok(SignatureOutcome { signature, timed_out: solver.timed_out() })
	}
}
