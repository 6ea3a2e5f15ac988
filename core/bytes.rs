use core::cmp;

/// Forward-only cursor over the input bytes.
///
/// Reads never move the cursor, only [`Bytes::advance`] does. Lookahead past
/// the end of the data is padded with zeroes.
pub struct Bytes<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Bytes<'a> {
    /// Create a cursor positioned at `offset`.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        let offset = cmp::min(offset, data.len());
        Self { data, offset }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn tail(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn advance(&mut self, count: usize) {
        self.offset = cmp::min(self.offset + count, self.data.len());
    }

    /// Returns a slice up to `max_len` bytes.
    pub fn peek_slice(&self, max_len: usize) -> &'a [u8] {
        let len = cmp::min(max_len, self.remaining());
        &self.tail()[..len]
    }

    /// Returns an array filled with up to `N` bytes.
    pub fn peek_array<const N: usize>(&self) -> (usize, [u8; N]) {
        let slice = self.peek_slice(N);
        let mut array = [0; N];
        array[..slice.len()].copy_from_slice(slice);
        (slice.len(), array)
    }

    /// Little-endian word at the cursor, zero-padded past the end.
    pub fn peek_u32(&self) -> u32 {
        u32::from_le_bytes(self.peek_array::<4>().1)
    }
}
