use std::io::{stdin, stdout};

fn main() -> Result<(), wordfreq::Error> {
	let summary = wordfreq::run(
		stdin().lock(),
		stdout().lock(),
		wordfreq::Config { buffer_size: 16 * 1024, limit: Some(20), ..Default::default() },
	)?;

	eprintln!("{} words, {} distinct, {} bytes", summary.tokens, summary.distinct, summary.bytes_read);
	Ok(())
}
