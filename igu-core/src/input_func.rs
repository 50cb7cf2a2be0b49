use crate::{regvec::RegVec, variable::Variable};

/// A function `RegVec -> {0, ..., 2^p - 1}`, polymorphic over how each output bit is derived.
#[derive(Debug, Clone)]
pub enum InputFunc {
	/// Bit j of the result is the classification of the j-th Variable.
	VarFunc(Vec<Variable>),
	/// Bit j is the XOR of the bits at the j-th position set.
	XorFunc(Vec<Vec<usize>>),
}

impl InputFunc {
	pub fn output_width(&self) -> usize {
		match self {
			InputFunc::VarFunc(vars) => vars.len(),
			InputFunc::XorFunc(position_sets) => position_sets.len(),
		}
	}

	pub fn eval(&self, v: &RegVec) -> u32 {
		match self {
			InputFunc::VarFunc(vars) => {
				let mut acc = 0u32;
				for (j, var) in vars.iter().enumerate() {
					acc |= (var.classify(v) as u32) << j;
				}
				acc
			}
			InputFunc::XorFunc(position_sets) => {
				let mut acc = 0u32;
				for (j, positions) in position_sets.iter().enumerate() {
					acc |= (v.xor_positions(positions) as u32) << j;
				}
				acc
			}
		}
	}
}
