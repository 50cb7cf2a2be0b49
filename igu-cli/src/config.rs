use std::{fs, path::Path};

use igu_core::{driver::DriverConfig, error::Error};
use log::debug;

use crate::args::Args;

const DEFAULT_CONFIG_PATH: &str = "Igf.toml";

/// Loads `DriverConfig` from a TOML file (the path given on the command line, or "Igf.toml" in
/// the current directory), falling back to defaults if no config file is found at all. CLI
/// flags always win over whatever the file says.
pub fn load_config(args: &Args) -> Result<DriverConfig, Error> {
	let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

	let mut config = if Path::new(path).exists() {
		let raw = fs::read_to_string(path).map_err(Error::IoError)?;
		toml::from_str(&raw).map_err(|e| Error::InconsistentConfiguration(format!("malformed config file \"{path}\": {e}")))?
	} else {
		if args.config.is_some() {
			return Err(Error::InconsistentConfiguration(format!("config file \"{path}\" does not exist")));
		}
		debug!("no config file at \"{DEFAULT_CONFIG_PATH}\", using defaults");
		DriverConfig::default()
	};

	apply_overrides(&mut config, args);
	Ok(config)
}

fn apply_overrides(config: &mut DriverConfig, args: &Args) {
	if let Some(m) = args.multi {
		config.multiplicity = m;
	}
	if let Some(d) = args.compound_degree {
		config.compound_degree = d;
	}
	if let Some(l) = args.branch_limit {
		config.branch_limit = l;
	}
	if let Some(t) = args.time_limit {
		config.time_limit_seconds = t;
	}
	if let Some(d) = args.hash_count {
		config.hash_count = d;
	}
	if let Some(s) = args.seed {
		config.seed = s;
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn args_with(config: Option<String>) -> Args {
		Args {
			verbose: clap_verbosity_flag::Verbosity::new(0, 0),
			input: "vects.txt".to_string(),
			partition: false,
			synth: false,
			config,
			multi: Some(2),
			compound_degree: None,
			branch_limit: None,
			time_limit: None,
			hash_count: Some(3),
			seed: None,
		}
	}

	#[test]
	fn test_missing_default_config_falls_back_and_applies_overrides() {
		let args = args_with(None);
		let config = load_config(&args).unwrap();
		assert_eq!(config.multiplicity, 2);
		assert_eq!(config.hash_count, 3);
	}

	#[test]
	fn test_explicit_missing_config_is_an_error() {
		let args = args_with(Some("/nonexistent/Igf.toml".to_string()));
		assert!(load_config(&args).is_err());
	}
}
