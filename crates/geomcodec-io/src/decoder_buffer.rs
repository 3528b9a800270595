use byteorder::{ByteOrder, LittleEndian};
use geomcodec_core::status::{malformed_container, StatusResult};

/// Bounds-checked little-endian cursor over a container.
///
/// Every read checks the remaining length first and fails with
/// `MalformedContainer` instead of reading past the end.
///
/// ```
/// use geomcodec_io::DecoderBuffer;
///
/// let data = [0x47, 0x4D, 0x43, 0x51, 0xFF];
/// let mut buffer = DecoderBuffer::new(&data);
/// assert_eq!(buffer.decode_u32().unwrap(), 0x5143_4D47);
/// assert_eq!(buffer.remaining_size(), 1);
/// assert!(buffer.decode_u32().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DecoderBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DecoderBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn set_position(&mut self, pos: usize) -> StatusResult<()> {
        if pos > self.data.len() {
            return Err(malformed_container(format!(
                "position {} exceeds buffer length {}",
                pos,
                self.data.len()
            )));
        }
        self.pos = pos;
        Ok(())
    }

    pub fn remaining_size(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn decode_u32(&mut self) -> StatusResult<u32> {
        let bytes = self.decode_bytes(4)?;
        Ok(LittleEndian::read_u32(bytes))
    }

    /// Reads `count` UTF-16 code units.
    pub fn decode_u16_vec(&mut self, count: usize) -> StatusResult<Vec<u16>> {
        let len = count
            .checked_mul(2)
            .ok_or_else(|| malformed_container("u16 run length overflows"))?;
        let bytes = self.decode_bytes(len)?;
        let mut out = vec![0u16; count];
        LittleEndian::read_u16_into(bytes, &mut out);
        Ok(out)
    }

    /// Borrows the next `len` bytes and advances past them.
    pub fn decode_bytes(&mut self, len: usize) -> StatusResult<&'a [u8]> {
        if len > self.remaining_size() {
            return Err(malformed_container(format!(
                "need {} bytes at offset {}, only {} remain",
                len,
                self.pos,
                self.remaining_size()
            )));
        }
        let data = self.data;
        let bytes = &data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}
