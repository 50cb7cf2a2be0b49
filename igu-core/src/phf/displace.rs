use crate::func_vect::FuncVect;

/// How the per-bucket offset is folded into `f2` when building the displacement map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineMode {
	ModAdd,
	Xor,
}

impl CombineMode {
	fn combine(self, f2: u32, delta: u32, p: u32) -> u32 {
		match self {
			CombineMode::ModAdd => (f2.wrapping_add(delta)) & p,
			CombineMode::Xor => f2 ^ delta,
		}
	}
}

/// Displace decomposition: given f1, f2 of equal output width p, finds a per-f1-bucket offset
/// table `delta` of length 2^p such that
/// `i -> combine(f2(i), delta[f1(i)])` is injective over all k vectors.
///
/// Buckets are processed in decreasing size (most-constrained first); within a bucket, the
/// smallest delta that introduces no collision against the running `used` bitmap is kept.
/// Returns `None` if some bucket has no working delta.
pub fn displace_decompose(f1: &FuncVect, f2: &FuncVect, mode: CombineMode) -> Option<Vec<u32>> {
	assert_eq!(f1.input_size(), f2.input_size(), "f1 and f2 must be evaluated over the same vector set");
	assert_eq!(f1.max_val(), f2.max_val(), "displace decomposition requires f1 and f2 to share output width");

	let bucket_count = f1.max_val() as usize;
	let p_mask = bucket_count as u32 - 1;
	let k = f1.input_size();

	let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); bucket_count];
	for vid in 0..k {
		buckets[f1.val(vid) as usize].push(vid);
	}

	let mut order: Vec<usize> = (0..bucket_count).collect();
	order.sort_by_key(|&b| std::cmp::Reverse(buckets[b].len()));

	let mut delta = vec![0u32; bucket_count];
	let mut used = vec![false; k.max(bucket_count)];

	for bucket in order {
		let members = &buckets[bucket];
		if members.is_empty() {
			continue;
		}

		let mut found = None;
		'delta_search: for cand in 0..bucket_count as u32 {
			let mut slots = Vec::with_capacity(members.len());
			for &vid in members {
				let slot = mode.combine(f2.val(vid), cand, p_mask) as usize;
				if used[slot] || slots.contains(&slot) {
					continue 'delta_search;
				}
				slots.push(slot);
			}
			found = Some((cand, slots));
			break;
		}

		let (cand, slots) = found?;
		delta[bucket] = cand;
		for slot in slots {
			used[slot] = true;
		}
	}

	Some(delta)
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{input_func::InputFunc, regvec::RvMgr, variable::Variable};

	#[test]
	fn test_displace_decompose_produces_an_injective_delta_table() {
		let mut mgr = RvMgr::new();
		mgr.load(
			"4 6\n\
			 0000\n\
			 0011\n\
			 0101\n\
			 0110\n\
			 1001\n\
			 1111\n"
				.as_bytes(),
		)
		.unwrap();

		let f1 = InputFunc::VarFunc(vec![Variable::primary(0), Variable::primary(1), Variable::primary(2)]);
		let f2 = InputFunc::VarFunc(vec![Variable::primary(1), Variable::primary(2), Variable::primary(3)]);
		let fv1 = mgr.gen_hash_vect(&f1);
		let fv2 = mgr.gen_hash_vect(&f2);

		let delta = displace_decompose(&fv1, &fv2, CombineMode::Xor).expect("should find a displacement table");
		assert_eq!(delta.len(), 8);

		let mut seen = vec![false; 8];
		for vid in 0..mgr.vect_count() {
			let slot = (fv2.val(vid) ^ delta[fv1.val(vid) as usize]) as usize;
			assert!(!seen[slot], "displace map must be injective");
			seen[slot] = true;
		}
	}

	#[test]
	fn test_displace_decompose_mod_add_mode() {
		let f1 = FuncVect::new(vec![0, 0, 1, 1], 1);
		let f2 = FuncVect::new(vec![0, 1, 0, 1], 1);

		let delta = displace_decompose(&f1, &f2, CombineMode::ModAdd).expect("trivial case should succeed");
		let mut seen = vec![false; 2];
		for vid in 0..4 {
			let slot = (f2.val(vid).wrapping_add(delta[f1.val(vid) as usize]) & 1) as usize;
			assert!(!seen[slot]);
			seen[slot] = true;
		}
	}

	#[test]
	fn test_displace_decompose_fails_on_true_collision() {
		// f1 constant, f2 constant: two vectors land in the same bucket with the same f2 value,
		// no delta can separate them since delta is shared across the whole bucket.
		let f1 = FuncVect::new(vec![0, 0], 0);
		let f2 = FuncVect::new(vec![0, 0], 0);

		assert!(displace_decompose(&f1, &f2, CombineMode::Xor).is_none());
	}
}
