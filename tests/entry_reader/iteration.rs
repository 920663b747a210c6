//! Forward iteration over well-formed and torn segments

use crate::{drain, encode_all, memory_reader, offsets_of, sample_payloads, TestSegment};
use seglog::{Error, ReaderConfig};

#[test]
fn test_reads_every_record_in_file_order() {
    let payloads = sample_payloads(200);
    let seg = TestSegment::with_payloads(&payloads);

    let mut reader = seg.reader(&ReaderConfig::default(), 0);
    assert_eq!(drain(&mut reader), payloads);
    assert!(!reader.has_next().unwrap());
    assert_eq!(reader.position(), seg.segment.len().unwrap());
}

#[test]
fn test_empty_segment_has_no_entries() {
    let seg = TestSegment::with_bytes(&[]);
    let mut reader = seg.reader(&ReaderConfig::default(), 0);

    assert!(!reader.has_next().unwrap());
    assert!(matches!(reader.next_entry(), Err(Error::EmptyStream)));
}

#[test]
fn test_three_records_fifty_byte_buffer() {
    // 24-byte payloads encode to 32-byte records
    let payloads: Vec<Vec<u8>> = (1..=3u8).map(|i| vec![i; 24]).collect();
    let seg = TestSegment::with_payloads(&payloads);
    let config = ReaderConfig::default().with_buffer_size(50);
    let mut reader = seg.reader(&config, 0);

    assert!(reader.has_next().unwrap());
    assert_eq!(reader.stats().source_reads, 1);

    // 18 leftover bytes are compacted and topped up by one read
    assert_eq!(reader.next_entry().unwrap().payload(), &payloads[0][..]);
    assert_eq!(reader.stats().source_reads, 2);
    assert_eq!(reader.stats().bytes_read, 82);

    assert_eq!(reader.next_entry().unwrap().payload(), &payloads[1][..]);
    assert_eq!(reader.stats().source_reads, 3);
    assert_eq!(reader.stats().bytes_read, 96);

    assert_eq!(reader.next_entry().unwrap().payload(), &payloads[2][..]);
    assert!(!reader.has_next().unwrap());
    assert_eq!(reader.stats().entries_decoded, 3);
    assert_eq!(reader.buffer_capacity(), 50);
}

#[test]
fn test_has_next_is_idempotent() {
    let payloads = sample_payloads(5);
    let mut reader = memory_reader(encode_all(&payloads), 4096, 0);

    assert!(reader.has_next().unwrap());
    let before = reader.stats();
    for _ in 0..10 {
        assert!(reader.has_next().unwrap());
    }
    assert_eq!(reader.stats(), before);
    assert_eq!(reader.next_entry().unwrap().payload(), &payloads[0][..]);
}

#[test]
fn test_next_without_has_next() {
    let payloads = sample_payloads(3);
    let mut reader = memory_reader(encode_all(&payloads), 4096, 0);

    for expected in &payloads {
        assert_eq!(reader.next_entry().unwrap().payload(), &expected[..]);
    }
    let err = reader.next_entry().unwrap_err();
    assert!(err.is_contract_violation());
    assert!(!err.is_corruption());
}

#[test]
fn test_every_truncation_point_yields_complete_prefix() {
    let payloads = sample_payloads(6);
    let bytes = encode_all(&payloads);
    let offsets = offsets_of(&payloads);

    for cut in 0..=bytes.len() {
        let complete = offsets
            .iter()
            .zip(&payloads)
            .filter(|(offset, payload)| **offset as usize + 8 + payload.len() <= cut)
            .count();

        let mut reader = memory_reader(bytes[..cut].to_vec(), 32, 0);
        let read = drain(&mut reader);
        assert_eq!(read, payloads[..complete].to_vec(), "cut at {}", cut);
    }
}

#[test]
fn test_start_at_record_boundary() {
    let payloads = sample_payloads(10);
    let offsets = offsets_of(&payloads);
    let seg = TestSegment::with_payloads(&payloads);

    let mut reader = seg.reader(&ReaderConfig::small(), offsets[4]);
    assert_eq!(reader.position(), offsets[4]);
    assert_eq!(drain(&mut reader), payloads[4..].to_vec());
}

#[test]
fn test_current_tracks_returned_record() {
    let payloads = sample_payloads(4);
    let offsets = offsets_of(&payloads);
    let mut reader = memory_reader(encode_all(&payloads), 4096, 0);

    assert!(reader.current().is_none());
    for (i, offset) in offsets.iter().enumerate() {
        reader.next_entry().unwrap();
        assert_eq!(reader.current_offset(), Some(*offset));
        assert_eq!(
            reader.current().unwrap().len,
            8 + payloads[i].len(),
            "record {}",
            i
        );
    }
}

#[test]
fn test_iterator_collects_all() {
    let payloads = sample_payloads(25);
    let seg = TestSegment::with_payloads(&payloads);

    let collected: Vec<Vec<u8>> = seg
        .reader(&ReaderConfig::small(), 0)
        .map(|r| r.unwrap().into_payload())
        .collect();
    assert_eq!(collected, payloads);
}
