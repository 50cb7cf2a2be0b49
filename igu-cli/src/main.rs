mod args;
mod config;

use std::{fs::File, io::Write};

use args::Args;
use clap::Parser;
use igu_core::{
	driver::{memory_estimate, Driver, DriverOutcome, Goal},
	phf::verify_assignment,
	regvec::RvMgr,
};
use log::{error, info};

fn main() {
	let args = Args::parse();

	env_logger::Builder::new()
		.filter_level(args.verbose.log_level_filter())
		.format(|f, record| {
			let level_style = f.default_level_style(record.level());
			writeln!(f, "[{} {}/{}{}{}]: {}", f.timestamp(), record.target(), level_style.render(), record.level(), level_style.render_reset(), record.args())
		})
		.init();

	let driver_config = match config::load_config(&args) {
		Ok(c) => c,
		Err(e) => {
			error!("configuration error: {e}");
			std::process::exit(2);
		}
	};
	info!("config: {driver_config:?}");

	let input_file = match File::open(&args.input) {
		Ok(f) => f,
		Err(e) => {
			error!("could not open \"{}\": {e}", args.input);
			std::process::exit(1);
		}
	};

	let mut rvmgr = RvMgr::new();
	if let Err(e) = rvmgr.load(std::io::BufReader::new(input_file)) {
		error!("could not read registered vectors: {e}");
		std::process::exit(1);
	}

	let n = rvmgr.vect_size();
	let q = rvmgr.index_size();
	info!("loaded {} registered vectors, n = {n}, q = {q}", rvmgr.vect_count());

	let driver = Driver::new(driver_config.clone());

	if args.synth {
		let goal = if args.partition { Goal::CollisionFreePartition } else { Goal::PerfectHash };

		match driver.run(&rvmgr, goal) {
			Ok(DriverOutcome::PerfectHash { p, functions, g_tables }) => {
				let func_vects: Vec<_> = functions.iter().map(|f| rvmgr.gen_hash_vect(f)).collect();
				if !verify_assignment(&func_vects, &g_tables) {
					error!("internal error: synthesized g-tables failed verification");
					std::process::exit(1);
				}

				let est = memory_estimate(n, p, q, rvmgr.vect_count(), driver_config.multiplicity);
				println!("perfect hash found with {} functions, p = {p}", functions.len());
				println!("direct table   = {}", est.direct_table);
				println!("parallel IGU   = {}", est.parallel_igu);
				println!("ideal          = {}", est.ideal);
			}
			Ok(DriverOutcome::CollisionFreePartition { p, functions, .. }) => {
				let est = memory_estimate(n, p, q, rvmgr.vect_count(), driver_config.multiplicity);
				println!("collision-free partition found across {} IGUs, p = {p}", functions.len());
				println!("direct table   = {}", est.direct_table);
				println!("parallel IGU   = {}", est.parallel_igu);
				println!("ideal          = {}", est.ideal);
			}
			Ok(DriverOutcome::Exhausted { last_p }) => {
				error!("exhausted search up to p = {last_p} without finding an answer");
				std::process::exit(1);
			}
			Err(e) => {
				error!("driver error: {e}");
				std::process::exit(1);
			}
		}
		return;
	}

	match driver.solve_signature(&rvmgr) {
		Ok(outcome) => {
			if outcome.timed_out {
				error!("variable-selection solver: time limit reached before the search finished");
			}
			let p = outcome.signature.len();
			println!("signature found, p = {p}");
			for var in &outcome.signature {
				println!("  {:?}", var.positions());
			}
			let est = memory_estimate(n, p, q, rvmgr.vect_count(), driver_config.multiplicity);
			println!("direct table   = {}", est.direct_table);
			println!("parallel IGU   = {}", est.parallel_igu);
			println!("ideal          = {}", est.ideal);
		}
		Err(e) => {
			error!("solver error: {e}");
			std::process::exit(1);
		}
	}
}
