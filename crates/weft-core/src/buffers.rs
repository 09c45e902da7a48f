//! Byte buffers for the PTY boundary.
//!
//! [`WriteQueue`] holds bytes pending transmission to the child as a deque
//! of fixed-size blocks, so growth is amortized and a partial `write()`
//! shifts only the head. [`HistoryRing`] records the last N bytes that
//! crossed the boundary in either direction — an observational debug aid,
//! not a scrollback buffer.

use std::collections::VecDeque;
use std::fmt::Write as _;

/// FIFO of bytes pending transmission, stored in fixed-size blocks.
///
/// The concatenation of all bytes handed out through
/// [`peek_block`](Self::peek_block)/[`consume`](Self::consume) equals the
/// concatenation of all [`push`](Self::push) inputs.
#[derive(Debug, Clone)]
pub struct WriteQueue {
    blocks: VecDeque<Vec<u8>>,
    block_size: usize,
    /// Offset of the first unconsumed byte within the front block.
    start: usize,
}

impl WriteQueue {
    /// Create a queue with the given block size.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is zero.
    #[must_use]
    pub fn new(block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be > 0");
        let mut blocks = VecDeque::new();
        blocks.push_back(Vec::with_capacity(block_size));
        Self {
            blocks,
            block_size,
            start: 0,
        }
    }

    /// Append bytes to the tail of the queue.
    pub fn push(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            if self.blocks.back().map_or(true, |b| b.len() == self.block_size) {
                self.blocks.push_back(Vec::with_capacity(self.block_size));
            }
            if let Some(back) = self.blocks.back_mut() {
                let take = data.len().min(self.block_size - back.len());
                back.extend_from_slice(&data[..take]);
                data = &data[take..];
            }
        }
    }

    /// The contiguous head of the queue: everything unconsumed in the front
    /// block. Empty when the queue is drained.
    #[must_use]
    pub fn peek_block(&self) -> &[u8] {
        self.blocks.front().map_or(&[], |b| &b[self.start..])
    }

    /// Advance past `n` bytes of the front block after a (partial) write.
    ///
    /// `n` must not exceed the length of the current
    /// [`peek_block`](Self::peek_block).
    pub fn consume(&mut self, n: usize) {
        let front_len = self.blocks.front().map_or(0, Vec::len);
        debug_assert!(self.start + n <= front_len, "consumed past the head block");
        self.start = (self.start + n).min(front_len);
        if self.start == self.block_size {
            self.blocks.pop_front();
            self.start = 0;
            if self.blocks.is_empty() {
                self.blocks.push_back(Vec::with_capacity(self.block_size));
            }
        }
    }

    /// Whether any bytes are waiting to be written.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.blocks.len() > 1 || self.start != self.blocks.front().map_or(0, Vec::len)
    }

    /// Total number of unconsumed bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.iter().map(Vec::len).sum::<usize>() - self.start
    }

    /// Whether the queue is drained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_pending()
    }
}

/// Fixed-size ring recording the most recent bytes seen at the boundary.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    data: Vec<u8>,
    pos: usize,
}

impl HistoryRing {
    /// Create a ring holding the last `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be > 0");
        Self {
            data: vec![0; capacity],
            pos: 0,
        }
    }

    /// Record bytes, keeping only the newest `capacity` of them.
    pub fn record(&mut self, bytes: &[u8]) {
        let capacity = self.data.len();
        let tail = if bytes.len() > capacity {
            &bytes[bytes.len() - capacity..]
        } else {
            bytes
        };
        for &b in tail {
            self.data[self.pos] = b;
            self.pos = (self.pos + 1) % capacity;
        }
    }

    /// The ring contents, oldest byte first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        out.extend_from_slice(&self.data[self.pos..]);
        out.extend_from_slice(&self.data[..self.pos]);
        out
    }

    /// Render the ring as paired printable/hex rows for debug output.
    #[must_use]
    pub fn dump(&self) -> String {
        const ROW: usize = 32;
        let snapshot = self.snapshot();
        let mut out = String::new();
        for chunk in snapshot.chunks(ROW) {
            for &b in chunk {
                let ch = if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    ' '
                };
                let _ = write!(out, "{ch}  ");
            }
            out.push('\n');
            for &b in chunk {
                let _ = write!(out, "{b:02x} ");
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drain the queue through peek/consume, optionally in `step`-byte
    /// partial writes, and return everything that came out.
    fn drain(queue: &mut WriteQueue, step: usize) -> Vec<u8> {
        let mut out = Vec::new();
        while queue.has_pending() {
            let block = queue.peek_block();
            assert!(!block.is_empty(), "pending queue must expose a head block");
            let n = block.len().min(step);
            out.extend_from_slice(&block[..n]);
            queue.consume(n);
        }
        out
    }

    #[test]
    fn empty_queue_has_nothing_pending() {
        let queue = WriteQueue::new(8);
        assert!(!queue.has_pending());
        assert!(queue.peek_block().is_empty());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn fifo_across_block_boundaries() {
        let mut queue = WriteQueue::new(4);
        queue.push(b"hello ");
        queue.push(b"world");
        assert_eq!(queue.len(), 11);
        assert_eq!(drain(&mut queue, usize::MAX), b"hello world");
    }

    #[test]
    fn partial_consumes_shift_only_the_head() {
        let mut queue = WriteQueue::new(4);
        queue.push(b"abcdefgh");
        assert_eq!(queue.peek_block(), &b"abcd"[..]);
        queue.consume(2);
        assert_eq!(queue.peek_block(), &b"cd"[..]);
        queue.consume(2);
        assert_eq!(queue.peek_block(), &b"efgh"[..]);
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn byte_at_a_time_drain_preserves_order() {
        let mut queue = WriteQueue::new(3);
        queue.push(b"the quick brown fox");
        assert_eq!(drain(&mut queue, 1), b"the quick brown fox");
        assert!(!queue.has_pending());
    }

    #[test]
    fn push_after_full_drain_reuses_queue() {
        let mut queue = WriteQueue::new(4);
        queue.push(b"first");
        let _ = drain(&mut queue, usize::MAX);
        queue.push(b"second");
        assert_eq!(drain(&mut queue, 2), b"second");
    }

    #[test]
    fn interleaved_push_and_consume() {
        let mut queue = WriteQueue::new(4);
        let mut out = Vec::new();
        queue.push(b"ab");
        out.extend_from_slice(queue.peek_block());
        let n = queue.peek_block().len();
        queue.consume(n);
        queue.push(b"cdef");
        queue.push(b"gh");
        out.extend(drain(&mut queue, 3));
        assert_eq!(out, b"abcdefgh");
    }

    // ── HistoryRing ────────────────────────────────────────────────

    #[test]
    fn ring_keeps_newest_bytes() {
        let mut ring = HistoryRing::new(4);
        ring.record(b"abcdef");
        assert_eq!(ring.snapshot(), b"cdef");
    }

    #[test]
    fn ring_wraps_incrementally() {
        let mut ring = HistoryRing::new(4);
        ring.record(b"ab");
        ring.record(b"cd");
        ring.record(b"ef");
        assert_eq!(ring.snapshot(), b"cdef");
    }

    #[test]
    fn ring_starts_zeroed() {
        let ring = HistoryRing::new(3);
        assert_eq!(ring.snapshot(), vec![0, 0, 0]);
    }

    #[test]
    fn dump_pairs_printable_and_hex_rows() {
        let mut ring = HistoryRing::new(4);
        ring.record(b"hi!\x1b");
        let dump = ring.dump();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("h  i  !"));
        assert!(lines[1].contains("68 69 21 1b"));
    }
}
