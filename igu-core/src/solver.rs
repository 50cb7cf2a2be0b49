use std::time::{Duration, Instant};

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
	regvec::{ceil_log2, RegVec},
	variable::Variable,
};

/// Which ambiguity measure the solver sorts candidates by at each recursion level. The
/// reference solver exposes this as a numeric `--ordering-mode` flag (0/1/2); `PrimaryAm`
/// always sorts by `am`, `Am2Only` always sorts by the lower-bound-based `am2`, and
/// `SwitchOnImprovement` uses `am` until the first feasible solution is found in this search,
/// then switches to `am2` for the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum OrderingMode {
	PrimaryAm,
	SwitchOnImprovement,
	Am2Only,
}

impl Default for OrderingMode {
	fn default() -> Self {
		OrderingMode::PrimaryAm
	}
}

/// Branch-and-bound search for a minimum set of Variables whose joint classification leaves
/// no bucket of registered vectors larger than `multiplicity`.
///
/// Mirrors the reference solver's bucket-partition state machine: one "alive" bucket per
/// still-ambiguous subset of vectors, split on the lowest-ambiguity remaining Variable at each
/// level, pruned by a log2-of-bucket-size lower bound. The reference's `SIGALRM`-driven
/// time limit becomes a deadline checked at the top of each recursion frame - this solver is
/// synchronous and single-threaded (nothing else could set the flag), so a plain `bool` does
/// the job a signal-set atomic would elsewhere.
pub struct Solver<'a> {
	vects: &'a [RegVec],
	multiplicity: usize,
	branch_limit: usize,
	ordering_mode: OrderingMode,
	time_limit: Option<Duration>,
	deadline: Option<Instant>,
	timed_out: bool,
	has_solution: bool,
	best_so_far: usize,
	selected: Vec<Variable>,
	solution: Vec<Variable>,
	debug_level: u32,
}

impl<'a> Solver<'a> {
	pub fn new(vects: &'a [RegVec], multiplicity: usize) -> Self {
		assert!(multiplicity >= 1, "multiplicity must be at least 1");
		Solver {
			vects,
			multiplicity,
			branch_limit: 0,
			ordering_mode: OrderingMode::default(),
			time_limit: None,
			deadline: None,
			timed_out: false,
			has_solution: false,
			best_so_far: usize::MAX,
			selected: Vec::new(),
			solution: Vec::new(),
			debug_level: 0,
		}
	}

	/// `limit = 0` means unlimited, matching the reference's convention.
	pub fn with_branch_limit(mut self, limit: usize) -> Self {
		self.branch_limit = limit;
		self
	}

	pub fn with_ordering_mode(mut self, mode: OrderingMode) -> Self {
		self.ordering_mode = mode;
		self
	}

	pub fn with_time_limit(mut self, limit: Duration) -> Self {
		self.time_limit = Some(limit);
		self
	}

	pub fn with_debug_level(mut self, level: u32) -> Self {
		self.debug_level = level;
		self
	}

	/// True after a `solve()` call that ran out of time before exhausting the search.
	pub fn timed_out(&self) -> bool {
		self.timed_out
	}

	/// Finds the smallest subset of `candidates` such that every bucket of `self.vects` that
	/// agrees on every selected Variable has size at most `multiplicity`. `upper_bound` seeds
	/// `best_so_far`; no solution of that size or larger is ever recorded. Returns the best
	/// feasible set found - if the time limit expires mid-search this is the best-so-far,
	/// which may still be empty.
	pub fn solve(&mut self, candidates: &[Variable], upper_bound: usize) -> Vec<Variable> {
		self.best_so_far = upper_bound;
		self.selected.clear();
		self.solution.clear();
		self.timed_out = false;
		self.deadline = self.time_limit.map(|limit| Instant::now() + limit);

		let initial: Vec<usize> = (0..self.vects.len()).collect();
		let buckets = self.alive_buckets(vec![initial]);

		self.solve_recur(buckets, candidates);

		self.solution.clone()
	}

	fn alive_buckets(&self, buckets: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
		buckets.into_iter().filter(|b| b.len() > self.multiplicity).collect()
	}

	fn is_time_expired(&mut self) -> bool {
		if self.timed_out {
			return true;
		}
		if let Some(deadline) = self.deadline {
			if Instant::now() >= deadline {
				debug!("variable-selection solver: time limit reached, returning best-so-far ({})", self.best_so_far);
				self.timed_out = true;
			}
		}
		self.timed_out
	}

	fn split_sizes(&self, bucket: &[usize], var: &Variable) -> (usize, usize) {
		let mut n0 = 0;
		let mut n1 = 0;
		for &vid in bucket {
			match var.classify(&self.vects[vid]) {
				0 => n0 += 1,
				_ => n1 += 1,
			}
		}
		(n0, n1)
	}

	/// Scores `candidates` on two ambiguity measures - `am = sum(n0^2 + n1^2)` and the
	/// lower-bound-based `am2` - then orders them by whichever one `ordering_mode` selects as
	/// active for this call: `PrimaryAm` always uses `am`, `Am2Only` always uses `am2`, and
	/// `SwitchOnImprovement` uses `am` until the first feasible solution has been recorded in
	/// this search and `am2` afterwards. Drops Variables that split no bucket, or whose own
	/// lower bound already meets or beats `best_so_far`.
	fn order_candidates(&self, buckets: &[Vec<usize>], candidates: &[Variable]) -> Vec<(usize, Variable)> {
		let use_am2 = match self.ordering_mode {
			OrderingMode::PrimaryAm => false,
			OrderingMode::Am2Only => true,
			OrderingMode::SwitchOnImprovement => self.has_solution,
		};

		let mut scored: Vec<(usize, Variable)> = Vec::with_capacity(candidates.len());

		for var in candidates {
			let mut am = 0usize;
			let mut am2 = 0usize;
			let mut max_size = 0usize;
			let mut splits_something = false;

			for bucket in buckets {
				let (n0, n1) = self.split_sizes(bucket, var);
				if n0 > 0 && n1 > 0 {
					splits_something = true;
				}
				max_size = max_size.max(n0).max(n1);
				am += n0 * n0 + n1 * n1;
				if n0 > self.multiplicity {
					am2 += ceil_log2(div_ceil(n0, self.multiplicity));
				}
				if n1 > self.multiplicity {
					am2 += ceil_log2(div_ceil(n1, self.multiplicity));
				}
			}

			if !splits_something {
				continue;
			}

			let lb = self.selected.len() + ceil_log2(div_ceil(max_size, self.multiplicity));
			if lb >= self.best_so_far {
				continue;
			}

			scored.push((if use_am2 { am2 } else { am }, var.clone()));
		}

		scored.sort_by_key(|(key, _)| *key);
		scored
	}

	fn solve_recur(&mut self, buckets: Vec<Vec<usize>>, remaining: &[Variable]) {
		if self.is_time_expired() {
			return;
		}

		trace!("solve_recur: {} buckets, {} candidates, {} selected", buckets.len(), remaining.len(), self.selected.len());
		if self.debug_level > 0 {
			let sizes: Vec<usize> = buckets.iter().map(|b| b.len()).collect();
			debug!("best so far = {}, selected = {}, buckets = {:?}", self.best_so_far, self.selected.len(), sizes);
		}

		if buckets.is_empty() {
			if self.selected.len() < self.best_so_far {
				self.best_so_far = self.selected.len();
				self.solution = self.selected.clone();
				self.has_solution = true;
				debug!("variable-selection solver: new best-so-far = {}", self.best_so_far);
			}
			return;
		}

		let max_size = buckets.iter().map(|b| b.len()).max().unwrap_or(0);
		let lb = self.selected.len() + ceil_log2(div_ceil(max_size, self.multiplicity));
		if lb >= self.best_so_far {
			return;
		}

		let ordered = self.order_candidates(&buckets, remaining);

		for (idx, (key, var)) in ordered.iter().enumerate() {
			if self.branch_limit > 0 && idx >= self.branch_limit && ordered[self.branch_limit - 1].0 < *key {
				break;
			}

			let mut next_buckets = Vec::with_capacity(buckets.len() * 2);
			for bucket in &buckets {
				let (zeros, ones): (Vec<usize>, Vec<usize>) = bucket.iter().partition(|&&vid| var.classify(&self.vects[vid]) == 0);
				if zeros.len() > self.multiplicity {
					next_buckets.push(zeros);
				}
				if ones.len() > self.multiplicity {
					next_buckets.push(ones);
				}
			}

			let rest: Vec<Variable> = ordered[(idx + 1)..].iter().map(|(_, v)| v.clone()).collect();

			self.selected.push(var.clone());
			self.solve_recur(next_buckets, &rest);
			self.selected.pop();

			if self.timed_out {
				break;
			}
		}
	}
}

fn div_ceil(a: usize, b: usize) -> usize {
	(a + b - 1) / b
}
