use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wordfreq::profile::{self, Profiler};
use wordfreq::{Config, Error, TieOrder, WordCounter, DEFAULT_BUFFER_SIZE};

/// Count word frequencies on standard input and print them, most frequent first.
#[derive(Parser, Debug)]
#[command(name = "wordfreq", version)]
struct Cli {
	/// Read buffer size in bytes.
	#[arg(short, long, value_name = "BYTES", env = "WORDFREQ_BUFFER_SIZE", default_value_t = DEFAULT_BUFFER_SIZE)]
	buffer_size: usize,

	/// Print only the N most frequent words.
	#[arg(short = 'n', long, value_name = "N")]
	top: Option<usize>,

	/// Order of words with equal counts: "lexical" or "any".
	#[arg(long, value_name = "ORDER", default_value = "lexical")]
	ties: TieOrder,

	/// Show a progress bar on stderr while writing results.
	#[cfg(feature = "progression")]
	#[arg(long)]
	progress: bool,

	/// Write per-stage timings as JSON to PATH.
	#[arg(long, value_name = "PATH")]
	profile: Option<PathBuf>,
}

fn main() {
	init_tracing();
	let cli = Cli::parse();

	if let Err(err) = run(cli) {
		eprintln!("wordfreq: {err}");
		std::process::exit(err.exit_code());
	}
}

fn run(cli: Cli) -> Result<(), Error> {
	let config = Config {
		buffer_size: cli.buffer_size,
		tie_order: cli.ties,
		limit: cli.top,
		#[cfg(feature = "progression")]
		progress_bar: cli.progress,
		..Default::default()
	};

	let counter = WordCounter::new(config)?;
	let mut profiler = cli.profile.map(Profiler::new);

	let frequencies = profile::stage(profiler.as_mut(), "count", || counter.count(io::stdin().lock()))?;
	let entries = profile::stage(profiler.as_mut(), "rank", || counter.rank(frequencies));
	let lines = profile::stage(profiler.as_mut(), "write", || counter.write(io::stdout().lock(), &entries))?;
	debug!(lines, "done");

	if let Some(profiler) = profiler {
		profiler.finish()?;
	}

	Ok(())
}

fn init_tracing() {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_target(false)
		.with_writer(io::stderr)
		.try_init();
}
