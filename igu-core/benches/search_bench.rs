use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use igu_core::{
	phf::PhfGraph,
	rand_hash::RandHashGen,
	regvec::RvMgr,
	solver::Solver,
	variable::candidate_pool,
};

criterion_group!(benches, phf_bench, solver_bench);
criterion_main!(benches);

const N: usize = 16;
const K: usize = 400;
const P: usize = 10;

/// `k` distinct `n`-bit strings, built by XORing each index with a seed-derived mask so
/// different seeds exercise different (but still dense, still distinct) registered sets.
fn gen_vects(n: usize, k: usize, seed: u64) -> RvMgr {
	assert!(k <= 1usize << n, "k must fit in n bits");
	let mask = (seed.wrapping_mul(0x9E3779B97F4A7C15) as usize) & ((1usize << n) - 1);

	let mut lines = String::new();
	lines.push_str(&format!("{n} {k}\n"));
	for i in 0..k {
		let word = i ^ mask;
		let bits: String = (0..n).map(|pos| if (word >> (n - 1 - pos)) & 1 == 1 { '1' } else { '0' }).collect();
		lines.push_str(&bits);
		lines.push('\n');
	}

	let mut mgr = RvMgr::new();
	mgr.load(lines.as_bytes()).unwrap();
	mgr
}

fn phf_bench(c: &mut Criterion) {
	let mut group = c.benchmark_group("phf");
	group.sample_size(20);

	group.bench_function("acyclic_check", acyclic_check_bench);
	group.bench_function("collision_free_partition", partition_bench);

	group.finish();
}

fn acyclic_check_bench(b: &mut Bencher) {
	let mgr = gen_vects(N, K, 1);
	let mut gen = RandHashGen::seeded(2);

	b.iter_batched(
		|| {
			let f1 = gen.gen_func(N, P, 3);
			let f2 = gen.gen_func(N, P, 3);
			(mgr.gen_hash_vect(&f1), mgr.gen_hash_vect(&f2))
		},
		|(fv1, fv2)| {
			let graph = PhfGraph::build(&[fv1, fv2]);
			black_box(graph.acyclic_check());
		},
		criterion::BatchSize::LargeInput,
	);
}

fn partition_bench(b: &mut Bencher) {
	let mgr = gen_vects(N, K, 3);
	let mut gen = RandHashGen::seeded(4);

	b.iter_batched(
		|| {
			let fv: Vec<_> = (0..3).map(|_| mgr.gen_hash_vect(&gen.gen_func(N, P, 3))).collect();
			fv
		},
		|func_vects| {
			let graph = PhfGraph::build(&func_vects);
			black_box(graph.collision_free_partition());
		},
		criterion::BatchSize::LargeInput,
	);
}

fn solver_bench(c: &mut Criterion) {
	let mgr = gen_vects(N, K, 5);
	let candidates = candidate_pool(N, 1);

	c.bench_function("solver_solve", |b| {
		b.iter(|| {
			let mut solver = Solver::new(mgr.vect_list(), 1);
			black_box(solver.solve(&candidates, candidates.len() + 1));
		});
	});
}
