use std::io;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
	#[error("failed to read input: {0}")]
	Read(#[source] io::Error),
	#[error("failed to write output: {0}")]
	Write(#[source] io::Error),
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
	#[error("failed to write profile: {0}")]
	Profile(#[source] io::Error),
	#[error("failed to encode profile: {0}")]
	ProfileEncode(#[from] serde_json::Error),
}

impl Error {
	/// Process exit code for this error. Usage problems share clap's code.
	pub fn exit_code(&self) -> i32 {
		match self {
			Self::InvalidConfig(_) => 2,
			_ => 1,
		}
	}
}
