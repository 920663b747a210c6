//! Property tests: buffer size and read granularity never change results

use crate::{drain, encode_all, memory_reader, offsets_of};
use proptest::prelude::*;
use seglog::{EntryReader, FramedRecordKind, ReaderConfig, Segment};
use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// Source that returns at most `chunk` bytes per read, like a pipe
struct ShortReads {
    inner: Cursor<Vec<u8>>,
    chunk: usize,
}

impl Read for ShortReads {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.chunk);
        self.inner.read(&mut buf[..n])
    }
}

impl Seek for ShortReads {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

fn payloads_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..300), 1..25)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn decoding_is_independent_of_buffer_and_read_size(
        payloads in payloads_strategy(),
        buffer_size in 1usize..128,
        chunk in 1usize..64,
    ) {
        let bytes = encode_all(&payloads);
        let source = ShortReads { inner: Cursor::new(bytes), chunk };
        let mut reader = EntryReader::new(
            Segment::new(1, "/virtual/segment-000001.log"),
            FramedRecordKind::default(),
            source,
            0,
            &ReaderConfig::default().with_buffer_size(buffer_size),
        ).unwrap();

        prop_assert_eq!(drain(&mut reader), payloads);
    }

    #[test]
    fn reset_matches_fresh_reader(
        payloads in payloads_strategy(),
        buffer_size in 8usize..256,
        start in any::<prop::sample::Index>(),
        target in any::<prop::sample::Index>(),
    ) {
        let bytes = encode_all(&payloads);
        let offsets = offsets_of(&payloads);
        let start = offsets[start.index(offsets.len())];
        let target = offsets[target.index(offsets.len())];

        let mut reused = memory_reader(bytes.clone(), buffer_size, start);
        let _ = reused.has_next().unwrap();
        reused.reset(target).unwrap();

        let mut fresh = memory_reader(bytes, buffer_size, target);
        prop_assert_eq!(drain(&mut reused), drain(&mut fresh));
    }

    #[test]
    fn truncation_yields_prefix_without_error(
        payloads in payloads_strategy(),
        cut in any::<prop::sample::Index>(),
        buffer_size in 1usize..128,
    ) {
        let bytes = encode_all(&payloads);
        let cut = cut.index(bytes.len() + 1);
        let offsets = offsets_of(&payloads);
        let complete = offsets
            .iter()
            .zip(&payloads)
            .take_while(|(offset, payload)| **offset as usize + 8 + payload.len() <= cut)
            .count();

        let mut reader = memory_reader(bytes[..cut].to_vec(), buffer_size, 0);
        prop_assert_eq!(drain(&mut reader), payloads[..complete].to_vec());
    }
}
