//! Receive buffer owned by the receive loop while a packet is read out of the radio.

/// Packet buffer used to receive data.
#[derive(Clone)]
pub struct PacketBuffer<const N: usize> {
    packet: [u8; N],
    pos: usize,
}

impl<const N: usize> PacketBuffer<N> {
    /// Creation.
    pub const fn new() -> Self {
        Self { packet: [0; N], pos: 0 }
    }

    /// Maximum packet length.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Mark as empty.
    pub fn clear(&mut self) {
        self.pos = 0;
    }

    /// Provide the mutable buffer without regard to contained data.
    pub fn as_raw_slice(&mut self) -> &mut [u8] {
        &mut self.packet
    }

    /// Mark the first `len` bytes as valid, clamped to the capacity.
    pub fn set_len(&mut self, len: usize) {
        self.pos = len.min(N);
    }

    /// Number of valid bytes.
    pub fn len(&self) -> usize {
        self.pos
    }

    /// Whether the buffer holds no packet.
    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }
}

impl<const N: usize> AsRef<[u8]> for PacketBuffer<N> {
    fn as_ref(&self) -> &[u8] {
        &self.packet[..self.pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty() {
        let buf = PacketBuffer::<64>::new();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 64);
        assert_eq!(buf.as_ref(), &[] as &[u8]);
    }

    #[test]
    fn set_len_exposes_written_bytes() {
        let mut buf = PacketBuffer::<8>::new();
        buf.as_raw_slice()[..3].copy_from_slice(b"abc");
        buf.set_len(3);
        assert_eq!(buf.as_ref(), b"abc");
        buf.clear();
        assert!(buf.is_empty());
    }

    #[test]
    fn set_len_is_clamped_to_capacity() {
        let mut buf = PacketBuffer::<4>::new();
        buf.set_len(10);
        assert_eq!(buf.len(), 4);
    }
}
