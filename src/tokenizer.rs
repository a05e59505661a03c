use std::io::{self, Read};

use tracing::trace;

pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;
pub const MAX_BUFFER_SIZE: usize = 1 << 30;

/// ASCII whitespace, including vertical tab (which `u8::is_ascii_whitespace` leaves out).
#[inline]
pub fn is_delimiter(byte: u8) -> bool {
	matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Splits a byte stream into lowercased words using a fixed-size read buffer.
///
/// A word cut off at the end of the buffer is moved to the front before the
/// next read. The buffer only grows when a single word fills all of it.
pub struct Tokenizer<R> {
	reader: R,
	buf: Vec<u8>,
	pos: usize,
	scanned: usize,
	end: usize,
	eof: bool,
	failed: bool,
	bytes_read: u64,
}

impl<R: Read> Tokenizer<R> {
	#[inline]
	pub fn new(reader: R) -> Self {
		Self::with_buffer_size(reader, DEFAULT_BUFFER_SIZE)
	}

	pub fn with_buffer_size(reader: R, buffer_size: usize) -> Self {
		Self {
			reader,
			buf: vec![0; buffer_size.clamp(1, MAX_BUFFER_SIZE)],
			pos: 0,
			scanned: 0,
			end: 0,
			eof: false,
			failed: false,
			bytes_read: 0,
		}
	}

	#[inline]
	pub fn bytes_read(&self) -> u64 {
		self.bytes_read
	}

	#[inline]
	pub fn buffer_size(&self) -> usize {
		self.buf.len()
	}

	/// Returns the next word, borrowed from the read buffer until the next call.
	pub fn next_token(&mut self) -> io::Result<Option<&[u8]>> {
		loop {
			// `buf[pos..scanned]` is the delimiter-free head of a word still being read.
			if self.scanned == self.pos {
				while self.pos < self.end && is_delimiter(self.buf[self.pos]) {
					self.pos += 1;
				}

				self.scanned = self.pos;
			}

			let start = self.pos;

			match self.buf[self.scanned..self.end].iter().position(|&byte| is_delimiter(byte)) {
				Some(offset) => {
					let stop = self.scanned + offset;
					self.pos = stop + 1;
					self.scanned = self.pos;
					let token = &mut self.buf[start..stop];
					token.make_ascii_lowercase();
					return Ok(Some(token));
				}
				None if self.eof => {
					self.pos = self.end;
					self.scanned = self.end;

					if start == self.end {
						return Ok(None);
					}

					let token = &mut self.buf[start..self.end];
					token.make_ascii_lowercase();
					return Ok(Some(token));
				}
				None => {
					self.scanned = self.end;
					self.refill(start)?;
				}
			}
		}
	}

	fn refill(&mut self, start: usize) -> io::Result<()> {
		if start > 0 {
			self.buf.copy_within(start..self.end, 0);
			self.end -= start;
			self.scanned -= start;
		}

		self.pos = 0;

		if self.end == self.buf.len() {
			let grown = self.buf.len() * 2;
			trace!(from = self.buf.len(), to = grown, "word fills read buffer, growing");
			self.buf.resize(grown, 0);
		}

		loop {
			match self.reader.read(&mut self.buf[self.end..]) {
				Ok(0) => {
					trace!(bytes_read = self.bytes_read, "end of input");
					self.eof = true;
					return Ok(());
				}
				Ok(n) => {
					trace!(n, carried = self.end, "refilled read buffer");
					self.end += n;
					self.bytes_read += n as u64;
					return Ok(());
				}
				Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
				Err(err) => return Err(err),
			}
		}
	}
}

/// Owned words. A read error is yielded once and ends the sequence.
impl<R: Read> Iterator for Tokenizer<R> {
	type Item = io::Result<Box<[u8]>>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed {
			return None;
		}

		let result = self.next_token().map(|token| token.map(Box::from));

		match result {
			Ok(token) => token.map(Ok),
			Err(err) => {
				self.failed = true;
				Some(Err(err))
			}
		}
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	/// Hands out at most `step` bytes per read.
	pub(crate) struct Trickle<'a> {
		pub(crate) data: &'a [u8],
		pub(crate) step: usize,
	}

	impl Read for Trickle<'_> {
		fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
			let n = self.step.min(buf.len()).min(self.data.len());
			buf[..n].copy_from_slice(&self.data[..n]);
			self.data = &self.data[n..];
			Ok(n)
		}
	}

	fn words(tokenizer: impl Iterator<Item = io::Result<Box<[u8]>>>) -> Vec<Vec<u8>> {
		tokenizer.map(|token| token.unwrap().into_vec()).collect()
	}

	fn tokenize(input: &[u8], buffer_size: usize) -> Vec<Vec<u8>> {
		words(Tokenizer::with_buffer_size(input, buffer_size))
	}

	#[test]
	fn it_should_split_and_lowercase() {
		assert_eq!(
			tokenize(b"Hello, World\tFOO\n\nbar", DEFAULT_BUFFER_SIZE),
			[&b"hello,"[..], b"world", b"foo", b"bar"],
		);
	}

	#[test]
	fn it_should_split_on_every_ascii_whitespace() {
		assert_eq!(
			tokenize(b"a\x0bb\x0cc\rd e\tf\ng", DEFAULT_BUFFER_SIZE),
			[b"a", b"b", b"c", b"d", b"e", b"f", b"g"],
		);
	}

	#[test]
	fn it_should_only_lowercase_ascii() {
		assert_eq!(tokenize(b"\xc3\x89T\xc9 \x00X", 8), [&b"\xc3\x89t\xc9"[..], b"\x00x"]);
	}

	#[test]
	fn it_should_yield_nothing_for_blank_input() {
		assert!(tokenize(b"", 16).is_empty());
		assert!(tokenize(b"   \n\t  ", 16).is_empty());
		assert!(tokenize(b"   \n\t  ", 1).is_empty());
	}

	#[test]
	fn it_should_emit_the_last_word_at_end_of_input() {
		assert_eq!(tokenize(b"abcdefghi", 10), [b"abcdefghi"]);
		assert_eq!(tokenize(b"x abcdefghi", 10), [&b"x"[..], b"abcdefghi"]);
	}

	#[test]
	fn it_should_grow_for_words_longer_than_the_buffer() {
		let mut tokenizer = Tokenizer::with_buffer_size(&b"abcdefghij kl"[..], 4);
		assert_eq!(tokenizer.next_token().unwrap(), Some(&b"abcdefghij"[..]));
		assert!(tokenizer.buffer_size() >= 10);
		assert_eq!(tokenizer.next_token().unwrap(), Some(&b"kl"[..]));
		assert_eq!(tokenizer.next_token().unwrap(), None);
		assert_eq!(tokenizer.next_token().unwrap(), None);
		assert_eq!(tokenizer.bytes_read(), 13);
	}

	#[test]
	fn it_should_emit_a_multi_megabyte_word_read_in_small_steps() {
		let mut input = vec![b'Q'; 4 << 20];
		input.extend_from_slice(b" Tail");
		let mut tokenizer = Tokenizer::new(Trickle { data: &input, step: 64 * 1024 });

		let word = tokenizer.next_token().unwrap().unwrap();
		assert_eq!(word.len(), 4 << 20);
		assert!(word.iter().all(|&byte| byte == b'q'));
		assert_eq!(tokenizer.next_token().unwrap(), Some(&b"tail"[..]));
		assert_eq!(tokenizer.next_token().unwrap(), None);
	}

	#[test]
	fn it_should_not_depend_on_buffer_or_read_sizes() {
		let input = b"The quick  brown\tFox\njumps over the LAZY dog\r\n\x0bpunctuation, stays. THE end";
		let expected = tokenize(input, DEFAULT_BUFFER_SIZE);

		for buffer_size in 1..=24 {
			for step in 1..=7 {
				let tokenizer = Tokenizer::with_buffer_size(Trickle { data: input, step }, buffer_size);
				assert_eq!(words(tokenizer), expected, "buffer {buffer_size}, step {step}");
			}
		}
	}

	#[test]
	fn it_should_retry_interrupted_reads() {
		struct Flaky {
			interrupted: bool,
			data: &'static [u8],
		}

		impl Read for Flaky {
			fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
				if !self.interrupted {
					self.interrupted = true;
					return Err(io::ErrorKind::Interrupted.into());
				}

				self.data.read(buf)
			}
		}

		let tokenizer = Tokenizer::new(Flaky { interrupted: false, data: b"One two" });
		assert_eq!(words(tokenizer), [&b"one"[..], b"two"]);
	}

	#[test]
	fn it_should_surface_read_errors_once() {
		let reader = (&b"ab cd"[..]).chain(Broken);
		let mut tokenizer = Tokenizer::new(reader);
		assert_eq!(&*tokenizer.next().unwrap().unwrap(), &b"ab"[..]);
		assert!(tokenizer.next().unwrap().is_err());
		assert!(tokenizer.next().is_none());
	}

	pub(crate) struct Broken;

	impl Read for Broken {
		fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
			Err(io::Error::other("device unplugged"))
		}
	}
}
