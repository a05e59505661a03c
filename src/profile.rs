//! Stage timings written to a side file.
//!
//! The profiler wraps pipeline stages from the outside; the counting code
//! never sees it, so output is the same with or without it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageTiming {
	pub name: &'static str,
	pub micros: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
	pub stages: Vec<StageTiming>,
	pub total_micros: u64,
}

#[derive(Debug)]
pub struct Profiler {
	path: PathBuf,
	started: Instant,
	stages: Vec<StageTiming>,
}

#[inline]
fn micros(elapsed: Duration) -> u64 {
	elapsed.as_micros().try_into().unwrap_or(u64::MAX)
}

impl Profiler {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into(), started: Instant::now(), stages: Vec::new() }
	}

	pub fn stage<T>(&mut self, name: &'static str, work: impl FnOnce() -> T) -> T {
		let started = Instant::now();
		let result = work();
		let micros = micros(started.elapsed());
		debug!(stage = name, micros, "stage finished");
		self.stages.push(StageTiming { name, micros });
		result
	}

	pub fn report(&self) -> Report {
		Report { stages: self.stages.clone(), total_micros: micros(self.started.elapsed()) }
	}

	/// Writes the report as JSON to the side file.
	pub fn finish(self) -> Result<Report> {
		let report = self.report();
		let file = File::create(&self.path).map_err(Error::Profile)?;
		let mut out = BufWriter::new(file);
		serde_json::to_writer_pretty(&mut out, &report)?;
		writeln!(out).map_err(Error::Profile)?;
		out.flush().map_err(Error::Profile)?;
		debug!(path = %self.path.display(), "profile written");
		Ok(report)
	}
}

/// Runs `work` as a named stage when profiling, or plainly otherwise.
#[inline]
pub fn stage<T>(profiler: Option<&mut Profiler>, name: &'static str, work: impl FnOnce() -> T) -> T {
	match profiler {
		Some(profiler) => profiler.stage(name, work),
		None => work(),
	}
}
