//! Property-based invariant tests for weft-core.
//!
//! These verify the structural guarantees that must hold for **any** input:
//!
//! 1. The engine never panics on arbitrary byte streams, and the grid
//!    invariants (cursor bounds, row lengths) survive them.
//! 2. Chunking independence: the final screen state depends only on the
//!    byte stream, never on how reads were sliced.
//! 3. Every scalar fed to the parser is either consumed or printed.
//! 4. The write queue is strictly FIFO through partial consumes.

use proptest::prelude::*;
use weft_core::{Parser, Screen, Utf8Decoder, WriteQueue};

fn dims() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=60, 1usize..=24)
}

fn byte_streams() -> impl Strategy<Value = Vec<u8>> {
    // Bias toward escape-heavy streams so the parser states get exercised,
    // but keep plenty of arbitrary noise.
    prop_oneof![
        proptest::collection::vec(any::<u8>(), 0..512),
        proptest::collection::vec(
            prop_oneof![
                Just(0x1b_u8),
                Just(b'['),
                Just(b';'),
                Just(b'm'),
                Just(b'?'),
                Just(0x9c_u8),
                any::<u8>(),
            ],
            0..512,
        ),
    ]
}

proptest! {
    #[test]
    fn grid_invariants_survive_arbitrary_bytes(
        (width, height) in dims(),
        bytes in byte_streams(),
    ) {
        let mut screen = Screen::new(width, height);
        screen.feed(&bytes);

        let grid = screen.grid();
        prop_assert_eq!(grid.width(), width);
        prop_assert_eq!(grid.height(), height);
        let (x, y) = grid.cursor();
        prop_assert!(x <= width, "cursor x {} exceeds width {}", x, width);
        prop_assert!(y < height, "cursor y {} exceeds height {}", y, height);
        for row in 0..height {
            prop_assert!(grid.row_len(row) <= width);
        }
    }

    #[test]
    fn final_state_is_chunking_independent(
        (width, height) in dims(),
        bytes in byte_streams(),
        chunk in 1usize..=17,
    ) {
        let mut whole = Screen::new(width, height);
        whole.feed(&bytes);

        let mut chunked = Screen::new(width, height);
        for piece in bytes.chunks(chunk) {
            chunked.feed(piece);
        }

        let mut byte_by_byte = Screen::new(width, height);
        for &b in &bytes {
            byte_by_byte.feed_byte(b);
        }

        prop_assert_eq!(whole.grid(), chunked.grid());
        prop_assert_eq!(whole.style(), chunked.style());
        prop_assert_eq!(whole.grid(), byte_by_byte.grid());
        prop_assert_eq!(whole.style(), byte_by_byte.style());
    }

    #[test]
    fn every_scalar_is_consumed_or_printed(bytes in byte_streams()) {
        let mut decoder = Utf8Decoder::new();
        let mut parser = Parser::new();
        let mut events = Vec::new();
        let mut consumed = 0usize;
        let mut printed = 0usize;
        let mut total = 0usize;
        for &b in &bytes {
            for rune in decoder.push(b) {
                total += 1;
                if parser.consume(rune, &mut events) {
                    consumed += 1;
                } else {
                    printed += 1;
                }
            }
        }
        prop_assert_eq!(consumed + printed, total);
    }

    #[test]
    fn resize_dimensions_stick_and_repeat_safely(
        (w0, h0) in dims(),
        sizes in proptest::collection::vec(dims(), 1..6),
        bytes in proptest::collection::vec(any::<u8>(), 0..128),
    ) {
        let mut screen = Screen::new(w0, h0);
        screen.feed(&bytes);
        for &(w, h) in &sizes {
            screen.resize(w, h);
        }
        let (w, h) = sizes[sizes.len() - 1];
        prop_assert_eq!(screen.grid().width(), w);
        prop_assert_eq!(screen.grid().height(), h);

        let before = screen.grid().clone();
        screen.resize(w, h);
        prop_assert_eq!(screen.grid(), &before);
    }

    #[test]
    fn write_queue_is_fifo_under_partial_consumes(
        block_size in 1usize..=16,
        pushes in proptest::collection::vec(
            proptest::collection::vec(any::<u8>(), 0..40),
            0..8,
        ),
        step in 1usize..=7,
    ) {
        let mut queue = WriteQueue::new(block_size);
        let mut expected = Vec::new();
        for push in &pushes {
            queue.push(push);
            expected.extend_from_slice(push);
        }
        prop_assert_eq!(queue.len(), expected.len());

        let mut drained = Vec::new();
        while queue.has_pending() {
            let block = queue.peek_block();
            prop_assert!(!block.is_empty());
            let n = block.len().min(step);
            drained.extend_from_slice(&block[..n]);
            queue.consume(n);
        }
        prop_assert_eq!(drained, expected);
    }
}
