use std::io::{Read, Write};

use tracing::debug;

mod error;
mod output;
pub mod profile;
mod rank;
mod table;
mod tokenizer;

pub use error::{Error, Result};
pub use output::write_ranked;
pub use rank::{rank, RankedEntry, TieOrder};
pub use table::{Frequencies, FrequencyTable};
pub use tokenizer::{is_delimiter, Tokenizer, DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE};

pub struct Config<'a> {
	pub buffer_size: usize,
	pub table_capacity: usize,
	pub tie_order: TieOrder,
	pub limit: Option<usize>,
	#[cfg(feature = "progression")]
	pub bar_step: usize,
	#[cfg(feature = "progression")]
	pub progress_bar: bool,
	#[cfg(feature = "progression")]
	pub bar_config: progression::Config<'a>,
	#[cfg(not(feature = "progression"))]
	pub _phantom: std::marker::PhantomData<&'a ()>,
}

impl Default for Config<'_> {
	#[inline]
	fn default() -> Self {
		Self {
			buffer_size: DEFAULT_BUFFER_SIZE,
			table_capacity: 1 << 12,
			tie_order: TieOrder::default(),
			limit: None,
			#[cfg(feature = "progression")]
			bar_step: 1_000,
			#[cfg(feature = "progression")]
			progress_bar: false,
			#[cfg(feature = "progression")]
			bar_config: progression::Config::default(),
			#[cfg(not(feature = "progression"))]
			_phantom: std::marker::PhantomData,
		}
	}
}

impl Config<'_> {
	pub fn validate(&self) -> Result<()> {
		if self.buffer_size == 0 {
			return Err(Error::InvalidConfig("buffer size must be at least 1 byte".into()));
		}

		if self.buffer_size > MAX_BUFFER_SIZE {
			return Err(Error::InvalidConfig(format!(
				"buffer size {} exceeds the {MAX_BUFFER_SIZE} byte maximum",
				self.buffer_size
			)));
		}

		#[cfg(feature = "progression")]
		if self.bar_step == 0 {
			return Err(Error::InvalidConfig("progress bar step must be at least 1".into()));
		}

		Ok(())
	}
}

/// What a full pass over one input produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
	pub bytes_read: u64,
	pub tokens: u64,
	pub distinct: usize,
	pub lines_written: u64,
}

pub struct WordCounter<'a> {
	config: Config<'a>,
}

impl<'a> WordCounter<'a> {
	#[inline]
	pub fn new(config: Config<'a>) -> Result<Self> {
		config.validate()?;
		Ok(Self { config })
	}

	#[inline]
	pub fn config(&self) -> &Config<'a> {
		&self.config
	}

	/// Reads `reader` to the end and returns the sealed table.
	pub fn count<R: Read>(&self, reader: R) -> Result<Frequencies> {
		self.tally(reader).map(|(frequencies, _)| frequencies)
	}

	fn tally<R: Read>(&self, reader: R) -> Result<(Frequencies, u64)> {
		let mut tokens = Tokenizer::with_buffer_size(reader, self.config.buffer_size);
		let mut table = FrequencyTable::with_capacity(self.config.table_capacity);
		table.count_tokens(&mut tokens).map_err(Error::Read)?;

		debug!(
			bytes_read = tokens.bytes_read(),
			tokens = table.total(),
			distinct = table.len(),
			"input exhausted"
		);

		Ok((table.seal(), tokens.bytes_read()))
	}

	/// Orders by descending count, then applies the configured limit.
	pub fn rank(&self, frequencies: Frequencies) -> Vec<RankedEntry> {
		let mut entries = rank(frequencies, self.config.tie_order);

		if let Some(limit) = self.config.limit {
			entries.truncate(limit);
		}

		debug!(entries = entries.len(), tie_order = %self.config.tie_order, "ranked");
		entries
	}

	pub fn write<W: Write>(&self, writer: W, entries: &[RankedEntry]) -> Result<u64> {
		write_ranked(writer, entries, &self.config).map_err(Error::Write)
	}

	pub fn run<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<Summary> {
		let (frequencies, bytes_read) = self.tally(reader)?;
		let tokens = frequencies.total();
		let distinct = frequencies.len();
		let entries = self.rank(frequencies);
		let lines_written = self.write(writer, &entries)?;
		Ok(Summary { bytes_read, tokens, distinct, lines_written })
	}
}

impl Default for WordCounter<'_> {
	#[inline]
	fn default() -> Self {
		Self { config: Config::default() }
	}
}

#[inline]
pub fn run<R: Read, W: Write>(reader: R, writer: W, config: Config) -> Result<Summary> {
	WordCounter::new(config)?.run(reader, writer)
}
