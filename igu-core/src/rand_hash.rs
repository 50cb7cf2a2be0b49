use rand::{seq::SliceRandom, RngCore};

use crate::input_func::InputFunc;

/// Produces random `XorFunc`s of bounded fan-in for the PHF engine to try.
///
/// The generator owns its PRNG; seeding is entirely caller-controlled (construct with
/// `RandHashGen::seeded` for reproducible runs, or `RandHashGen::from_rng` to hand over an
/// already-seeded `rand::RngCore`).
pub struct RandHashGen<R: RngCore> {
	rng: R,
}

impl RandHashGen<rand::rngs::StdRng> {
	pub fn seeded(seed: u64) -> Self {
		use rand::SeedableRng;
		RandHashGen { rng: rand::rngs::StdRng::seed_from_u64(seed) }
	}
}

impl<R: RngCore> RandHashGen<R> {
	pub fn from_rng(rng: R) -> Self {
		RandHashGen { rng }
	}

	/// Builds an `output_num`-output `XorFunc` over `input_num` inputs, each output XORing at
	/// most `max_degree` distinct input positions.
	///
	/// For each output: pick one distinct "primary" position (sampled without replacement
	/// across outputs), then sample a bit-pattern over `max_degree - 1` slots to determine
	/// how many additional positions to add, and sample that many from the remaining inputs.
	///
	/// Note: `bit_pat % mask` where `mask = (1 << (max_degree - 1)) - 1` biases towards lower
	/// popcounts when `max_degree` is small. This matches the reference implementation and is
	/// preserved rather than "fixed" (see the design notes on the random generator).
	pub fn gen_func(&mut self, input_num: usize, output_num: usize, max_degree: usize) -> InputFunc {
		assert!(output_num <= input_num, "cannot choose {output_num} distinct primaries from {input_num} inputs");

		let mut all_inputs: Vec<usize> = (0..input_num).collect();
		all_inputs.shuffle(&mut self.rng);
		let primaries = &all_inputs[..output_num];

		let mut position_sets = Vec::with_capacity(output_num);

		for &pos0 in primaries {
			let mut positions = vec![pos0];

			if max_degree > 1 {
				let mask = (1u32 << (max_degree - 1)) - 1;
				let bit_pat = self.rng.next_u32() % mask;
				let nbit = bit_pat.count_ones() as usize;

				if nbit > 0 {
					let mut remaining: Vec<usize> = (0..input_num).filter(|&p| p != pos0).collect();
					remaining.shuffle(&mut self.rng);
					positions.extend_from_slice(&remaining[..nbit.min(remaining.len())]);
				}
			}

			position_sets.push(positions);
		}

		InputFunc::XorFunc(position_sets)
	}
}
