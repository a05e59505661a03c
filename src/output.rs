use std::io::{self, BufWriter, Write};

use crate::rank::RankedEntry;
use crate::Config;

/// Writes one `<word> <count>` line per entry and flushes. Returns the number of lines written.
pub fn write_ranked<W: Write>(writer: W, entries: &[RankedEntry], config: &Config) -> io::Result<u64> {
	#[cfg(feature = "progression")]
	let bar = config.progress_bar.then(|| progression::Bar::new(entries.len().try_into().unwrap_or_default(), config.bar_config.clone()));
	#[cfg(feature = "progression")]
	let bar_step = config.bar_step;
	#[cfg(not(feature = "progression"))]
	let bar_step = {
		let _ = config;
		entries.len()
	};

	let mut out = BufWriter::new(writer);
	let mut lines = 0;

	for chunk in entries.chunks(bar_step.max(1)) {
		for entry in chunk {
			out.write_all(&entry.word)?;
			writeln!(out, " {}", entry.count)?;
		}

		lines += chunk.len() as u64;

		#[cfg(feature = "progression")]
		if let Some(bar) = &bar {
			bar.inc(chunk.len().try_into().unwrap_or_default());
		}
	}

	out.flush()?;
	Ok(lines)
}
