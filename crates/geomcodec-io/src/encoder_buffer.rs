use byteorder::{ByteOrder, LittleEndian};

/// Growable little-endian output buffer for container serialization.
#[derive(Debug, Clone, Default)]
pub struct EncoderBuffer {
    buffer: Vec<u8>,
}

impl EncoderBuffer {
    /// Create a new empty encoder buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    pub fn encode_u32(&mut self, value: u32) {
        let mut bytes = [0u8; 4];
        LittleEndian::write_u32(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    /// Writes UTF-16 code units, two bytes each.
    pub fn encode_u16_slice(&mut self, values: &[u16]) {
        let start = self.buffer.len();
        self.buffer.resize(start + values.len() * 2, 0);
        LittleEndian::write_u16_into(values, &mut self.buffer[start..]);
    }

    pub fn encode_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Appends `count` zero bytes.
    pub fn encode_padding(&mut self, count: usize) {
        self.buffer.resize(self.buffer.len() + count, 0);
    }
}
