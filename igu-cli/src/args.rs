use clap::Parser;
use clap_verbosity_flag::InfoLevel;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
	#[command(flatten)]
	pub verbose: clap_verbosity_flag::Verbosity<InfoLevel>,
	/// Path to the registered-vector dump to synthesize an IGU for
	#[arg(short, long)]
	pub input: String,
	/// Build a collision-free partition across `hash_count` parallel IGUs instead of a single
	/// perfect-hash assignment. Defaults to false. Only applies in `--synth` mode
	#[arg(short = 'P', long)]
	pub partition: bool,
	/// Synthesize a PHF/collision-free-partition assignment from random hash functions instead
	/// of searching directly for a minimum distinguishing signature. Defaults to false
	#[arg(short = 's', long)]
	pub synth: bool,
	/// Path to the TOML config file. Defaults to looking for "Igf.toml" in the current working directory
	#[arg(short, long)]
	pub config: Option<String>,
	/// Bucket-size bound for the variable-selection solver (multiplicity m)
	#[arg(short, long)]
	pub multi: Option<usize>,
	/// Upper bound on the position-set size of candidate Variables (compound degree)
	#[arg(short = 'x', long)]
	pub compound_degree: Option<usize>,
	/// Caps the variable-selection solver's recursion fan-out. 0 means unlimited
	#[arg(short, long)]
	pub branch_limit: Option<usize>,
	/// Wall-clock budget for the variable-selection solver, in seconds. 0 means unlimited
	#[arg(short, long)]
	pub time_limit: Option<u64>,
	/// Number of parallel hash functions the PHF engine is given per attempt
	#[arg(short = 'd', long)]
	pub hash_count: Option<usize>,
	/// Seeds the random hash generator, for reproducible runs
	#[arg(long)]
	pub seed: Option<u64>,
}
