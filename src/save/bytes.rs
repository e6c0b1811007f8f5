use crate::save::{Result, SaveError};

/// Null marker used by length-prefixed strings and sequences.
pub const NULL_LEN: i32 = -1;

/// Simple bounded cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return total buffer length.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Return whether the underlying buffer is empty.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(SaveError::OutOfData {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Consume and return everything after the cursor.
	pub fn read_rest(&mut self) -> &'a [u8] {
		let start = self.pos;
		self.pos = self.bytes.len();
		&self.bytes[start..]
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read a four-byte code.
	pub fn read_code4(&mut self) -> Result<[u8; 4]> {
		self.read_array()
	}

	/// Read one unsigned byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Read one signed byte.
	pub fn read_i8(&mut self) -> Result<i8> {
		Ok(i8::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u16`.
	pub fn read_u16(&mut self) -> Result<u16> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i16`.
	pub fn read_i16(&mut self) -> Result<i16> {
		Ok(i16::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u32`.
	pub fn read_u32(&mut self) -> Result<u32> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i32`.
	pub fn read_i32(&mut self) -> Result<i32> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u64`.
	pub fn read_u64(&mut self) -> Result<u64> {
		Ok(u64::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i64`.
	pub fn read_i64(&mut self) -> Result<i64> {
		Ok(i64::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `f32`.
	pub fn read_f32(&mut self) -> Result<f32> {
		Ok(f32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `f64`.
	pub fn read_f64(&mut self) -> Result<f64> {
		Ok(f64::from_le_bytes(self.read_array()?))
	}

	/// Read a non-negative `i32` count or length.
	pub fn read_len(&mut self, what: &'static str) -> Result<usize> {
		let at = self.pos;
		let len = self.read_i32()?;
		usize::try_from(len).map_err(|_| SaveError::InvalidLength { what, len: i64::from(len), at })
	}

	/// Read an `i32` count where `-1` marks null.
	pub fn read_nullable_len(&mut self, what: &'static str) -> Result<Option<usize>> {
		let at = self.pos;
		let len = self.read_i32()?;
		if len == NULL_LEN {
			return Ok(None);
		}
		usize::try_from(len)
			.map(Some)
			.map_err(|_| SaveError::InvalidLength { what, len: i64::from(len), at })
	}

	/// Read a length-prefixed UTF-8 string; `None` for the null marker.
	pub fn read_string(&mut self) -> Result<Option<String>> {
		let Some(len) = self.read_nullable_len("string length")? else {
			return Ok(None);
		};
		let at = self.pos;
		let raw = self.read_exact(len)?;
		let text = std::str::from_utf8(raw).map_err(|_| SaveError::InvalidUtf8 { at })?;
		Ok(Some(text.to_owned()))
	}
}

/// Growable little-endian writer mirroring [`Cursor`].
#[derive(Debug, Default)]
pub struct Writer {
	buf: Vec<u8>,
}

/// Placeholder for an `i32` length patched after its region is written.
#[derive(Debug, Clone, Copy)]
#[must_use = "a reserved length must be finished"]
pub struct LenMark {
	at: usize,
}

impl Writer {
	/// Create an empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create an empty writer with preallocated capacity.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			buf: Vec::with_capacity(capacity),
		}
	}

	/// Bytes written so far.
	pub fn position(&self) -> usize {
		self.buf.len()
	}

	/// Borrow the written bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.buf
	}

	/// Take ownership of the written bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		self.buf
	}

	/// Append raw bytes.
	pub fn write_bytes(&mut self, bytes: &[u8]) {
		self.buf.extend_from_slice(bytes);
	}

	/// Write one unsigned byte.
	pub fn write_u8(&mut self, value: u8) {
		self.buf.push(value);
	}

	/// Write one signed byte.
	pub fn write_i8(&mut self, value: i8) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Write a little-endian `u16`.
	pub fn write_u16(&mut self, value: u16) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Write a little-endian `i16`.
	pub fn write_i16(&mut self, value: i16) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Write a little-endian `u32`.
	pub fn write_u32(&mut self, value: u32) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Write a little-endian `i32`.
	pub fn write_i32(&mut self, value: i32) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Write a little-endian `u64`.
	pub fn write_u64(&mut self, value: u64) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Write a little-endian `i64`.
	pub fn write_i64(&mut self, value: i64) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Write a little-endian `f32`.
	pub fn write_f32(&mut self, value: f32) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Write a little-endian `f64`.
	pub fn write_f64(&mut self, value: f64) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Write a `usize` as an `i32` count or length.
	pub fn write_len(&mut self, len: usize, path: &str) -> Result<()> {
		let value = i32::try_from(len).map_err(|_| SaveError::LengthOverflow { path: path.to_owned(), len })?;
		self.write_i32(value);
		Ok(())
	}

	/// Write a length-prefixed UTF-8 string; `None` writes the null marker.
	pub fn write_string(&mut self, value: Option<&str>, path: &str) -> Result<()> {
		match value {
			None => self.write_i32(NULL_LEN),
			Some(text) => {
				self.write_len(text.len(), path)?;
				self.write_bytes(text.as_bytes());
			}
		}
		Ok(())
	}

	/// Reserve an `i32` length slot to be patched by [`Writer::finish_len`].
	pub fn reserve_len(&mut self) -> LenMark {
		let at = self.buf.len();
		self.write_i32(0);
		LenMark { at }
	}

	/// Patch a reserved slot with the number of bytes written since it.
	pub fn finish_len(&mut self, mark: LenMark, path: &str) -> Result<usize> {
		self.finish_len_since(mark, mark.at + 4, path)
	}

	/// Patch a reserved slot with the number of bytes written since position `start`.
	pub fn finish_len_since(&mut self, mark: LenMark, start: usize, path: &str) -> Result<usize> {
		let len = self.buf.len() - start;
		let value = i32::try_from(len).map_err(|_| SaveError::LengthOverflow { path: path.to_owned(), len })?;
		self.buf[mark.at..mark.at + 4].copy_from_slice(&value.to_le_bytes());
		Ok(len)
	}
}

#[cfg(test)]
mod tests;
