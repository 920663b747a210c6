//! Segment replay through the public API

use crate::{encode_all, offsets_of, sample_payloads, TestSegment};
use seglog::{
    CorruptionPolicy, FramedRecordKind, ReaderConfig, ReplayOptions, SegmentReplay,
    FRAME_HEADER_SIZE,
};

#[test]
fn test_replay_applies_in_order_with_offsets() {
    let payloads = sample_payloads(30);
    let seg = TestSegment::with_payloads(&payloads);

    let mut applied = Vec::new();
    let stats = SegmentReplay::replay(
        &seg.segment,
        FramedRecordKind::default(),
        0,
        &ReplayOptions::strict(),
        |offset, record| {
            applied.push((offset, record.into_payload()));
            Ok(())
        },
    )
    .unwrap();

    let expected: Vec<(u64, Vec<u8>)> = offsets_of(&payloads).into_iter().zip(payloads).collect();
    assert_eq!(applied, expected);
    assert_eq!(stats.entries, 30);
    assert!(!stats.has_issues());
}

#[test]
fn test_repair_then_append_then_replay() {
    let payloads = sample_payloads(5);
    let offsets = offsets_of(&payloads);
    let mut bytes = encode_all(&payloads);
    bytes[offsets[3] as usize + FRAME_HEADER_SIZE] ^= 0x10;
    let seg = TestSegment::with_bytes(&bytes);

    let stats = SegmentReplay::replay(
        &seg.segment,
        FramedRecordKind::default(),
        0,
        &ReplayOptions::repair(),
        |_, _| Ok(()),
    )
    .unwrap();
    assert_eq!(stats.entries, 3);
    assert_eq!(stats.corruption_offset, Some(offsets[3]));
    assert_eq!(seg.segment.len().unwrap(), offsets[3]);

    // The repaired segment accepts new records and replays cleanly
    let more = vec![b"after repair".to_vec()];
    seg.append(&encode_all(&more));

    let (entries, stats) = SegmentReplay::collect(
        &seg.segment,
        FramedRecordKind::default(),
        0,
        &ReplayOptions::strict(),
    )
    .unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[3].1.payload(), b"after repair");
    assert!(!stats.has_issues());
}

#[test]
fn test_replay_with_tiny_buffer() {
    let payloads = sample_payloads(40);
    let seg = TestSegment::with_payloads(&payloads);
    let options = ReplayOptions {
        policy: CorruptionPolicy::Fail,
        truncate_torn_tail: false,
        reader: ReaderConfig::default().with_buffer_size(3),
    };

    let (entries, _) =
        SegmentReplay::collect(&seg.segment, FramedRecordKind::default(), 0, &options).unwrap();
    let read: Vec<Vec<u8>> = entries.into_iter().map(|(_, r)| r.into_payload()).collect();
    assert_eq!(read, payloads);
}

#[test]
fn test_summary_mentions_counts() {
    let payloads = sample_payloads(3);
    let seg = TestSegment::with_payloads(&payloads);

    let (_, stats) = SegmentReplay::collect(
        &seg.segment,
        FramedRecordKind::default(),
        0,
        &ReplayOptions::default(),
    )
    .unwrap();

    let summary = stats.summary();
    assert!(summary.contains("Replayed 3 entries"));
    assert!(summary.contains("no corruption"));
}
