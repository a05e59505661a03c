use std::collections::{hash_map, HashMap};
use std::fmt;
use std::io::{self, Read};

use bstr::ByteSlice;

use crate::tokenizer::Tokenizer;

/// Word counts while input is still being read.
#[derive(Clone, Default)]
pub struct FrequencyTable {
	counts: HashMap<Box<[u8]>, u64>,
	total: u64,
}

impl FrequencyTable {
	#[inline]
	pub fn new() -> Self {
		Self::default()
	}

	#[inline]
	pub fn with_capacity(capacity: usize) -> Self {
		Self { counts: HashMap::with_capacity(capacity), total: 0 }
	}

	/// Seen words cost one lookup and no allocation.
	#[inline]
	pub fn insert(&mut self, word: &[u8]) {
		match self.counts.get_mut(word) {
			Some(count) => *count += 1,
			None => {
				self.counts.insert(word.into(), 1);
			}
		}

		self.total += 1;
	}

	/// Drains `tokens` into the table.
	pub fn count_tokens<R: Read>(&mut self, tokens: &mut Tokenizer<R>) -> io::Result<()> {
		while let Some(token) = tokens.next_token()? {
			self.insert(token);
		}

		Ok(())
	}

	#[inline]
	pub fn get(&self, word: &[u8]) -> Option<u64> {
		self.counts.get(word).copied()
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	#[inline]
	pub fn total(&self) -> u64 {
		self.total
	}

	#[inline]
	pub fn seal(self) -> Frequencies {
		Frequencies(self)
	}
}

/// A finished, read-only [`FrequencyTable`].
#[derive(Clone, Default)]
pub struct Frequencies(FrequencyTable);

impl Frequencies {
	#[inline]
	pub fn get(&self, word: &[u8]) -> Option<u64> {
		self.0.get(word)
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Number of words counted, duplicates included.
	#[inline]
	pub fn total(&self) -> u64 {
		self.0.total()
	}

	/// Entries in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&[u8], u64)> + '_ {
		self.0.counts.iter().map(|(word, &count)| (&**word, count))
	}
}

impl IntoIterator for Frequencies {
	type Item = (Box<[u8]>, u64);
	type IntoIter = hash_map::IntoIter<Box<[u8]>, u64>;

	#[inline]
	fn into_iter(self) -> Self::IntoIter {
		self.0.counts.into_iter()
	}
}

impl fmt::Debug for FrequencyTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map()
			.entries(self.counts.iter().map(|(word, count)| (word.as_bstr(), count)))
			.finish()
	}
}

impl fmt::Debug for Frequencies {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}
