use std::{fmt::Display, io};

macro_rules! impl_from_for_variant {
	($variant: path, $contained_type: ty) => {
		impl From<$contained_type> for Error {
			fn from(value: $contained_type) -> Self {
				$variant(value)
			}
		}
	};
}

/// Errors the core surfaces to its caller. `TimeExpired` and `UnsatisfiableAfterRetry` are
/// deliberately not variants here - both are non-fatal and returned as ordinary values (see
/// `solver::Solver::solve` and `driver::Driver::run` respectively)
#[derive(Debug)]
pub enum Error {
	MalformedInput { line: usize, column: usize, reason: String },
	InconsistentConfiguration(String),
	IoError(io::Error),
}

impl Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", match self {
			Error::MalformedInput { line, column, reason } => format!("malformed input at line {line}, column {column}: {reason}"),
			Error::InconsistentConfiguration(msg) => format!("inconsistent configuration: {msg}"),
			Error::IoError(e) => e.to_string(),
		})
	}
}

impl std::error::Error for Error {}

impl_from_for_variant!(Error::IoError, io::Error);
