use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use bstr::ByteSlice;

use crate::table::Frequencies;

/// How words with equal counts are ordered relative to each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TieOrder {
	/// Ascending by word bytes, so output is identical across runs.
	#[default]
	Lexicographic,
	/// Whatever order the table happened to yield.
	Unspecified,
}

impl FromStr for TieOrder {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"lexical" => Ok(Self::Lexicographic),
			"any" => Ok(Self::Unspecified),
			_ => Err(format!("invalid tie order: {s:?} (expected \"lexical\" or \"any\")")),
		}
	}
}

impl fmt::Display for TieOrder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Lexicographic => "lexical",
			Self::Unspecified => "any",
		})
	}
}

#[derive(Clone, PartialEq, Eq)]
pub struct RankedEntry {
	pub word: Box<[u8]>,
	pub count: u64,
}

impl fmt::Debug for RankedEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?} {}", self.word.as_bstr(), self.count)
	}
}

/// Every distinct word, most frequent first.
pub fn rank(frequencies: Frequencies, order: TieOrder) -> Vec<RankedEntry> {
	let mut entries = Vec::from_iter(frequencies.into_iter().map(|(word, count)| RankedEntry { word, count }));

	match order {
		TieOrder::Unspecified => entries.sort_unstable_by_key(|entry| Reverse(entry.count)),
		TieOrder::Lexicographic => {
			entries.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)))
		}
	}

	entries
}
