use crate::regvec::RegVec;

/// An unordered, deduplicated, nonempty set of input-bit positions. Classifies a `RegVec` by
/// the parity of the sum of the selected bits. A single position is a "primary" variable; more
/// than one is a "compound" variable of that compound-degree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
	positions: Vec<usize>,
}

impl Variable {
	pub fn new(mut positions: Vec<usize>) -> Self {
		positions.sort_unstable();
		positions.dedup();
		assert!(!positions.is_empty(), "a Variable must select at least one position");
		Variable { positions }
	}

	pub fn primary(position: usize) -> Self {
		Variable { positions: vec![position] }
	}

	pub fn positions(&self) -> &[usize] {
		&self.positions
	}

	pub fn compound_degree(&self) -> usize {
		self.positions.len()
	}

	pub fn is_primary(&self) -> bool {
		self.positions.len() == 1
	}

	/// Parity of the sum of the selected bits, mod 2.
	pub fn classify(&self, v: &RegVec) -> u8 {
		v.xor_positions(&self.positions)
	}
}

/// Enumerates every size-r subset of `0..n` for `2 <= r <= compound_degree`, plus the n
/// primary variables, as the candidate pool a variable-selection search can draw from.
///
/// Mirrors the compound-variable generation policy of the outer driver: candidates of
/// compound-degree 1 come first, then degree 2, etc.
pub fn candidate_pool(n: usize, compound_degree: usize) -> Vec<Variable> {
	let mut pool: Vec<Variable> = (0..n).map(Variable::primary).collect();

	for r in 2..=compound_degree.max(1) {
		for subset in combinations(n, r) {
			pool.push(Variable::new(subset));
		}
	}

	pool
}

/// All size-r subsets of `0..n`, in colexicographic order.
fn combinations(n: usize, r: usize) -> Vec<Vec<usize>> {
	if r == 0 || r > n {
		return Vec::new();
	}

	let mut result = Vec::new();
	let mut idx: Vec<usize> = (0..r).collect();

	loop {
		result.push(idx.clone());

		let mut i = r;
		loop {
			if i == 0 {
				return result;
			}
			i -= 1;
			if idx[i] != i + n - r {
				break;
			}
		}
		idx[i] += 1;
		for j in (i + 1)..r {
			idx[j] = idx[j - 1] + 1;
		}
	}
}
