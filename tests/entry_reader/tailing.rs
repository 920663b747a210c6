//! Reading a segment that is still being appended to

use crate::{encode_all, sample_payloads, TestSegment};
use seglog::{FramedRecord, ReaderConfig};

#[test]
fn test_records_appended_after_end_become_visible() {
    let payloads = sample_payloads(4);
    let seg = TestSegment::with_payloads(&payloads[..2]);
    let mut reader = seg.reader(&ReaderConfig::small(), 0);

    reader.next_entry().unwrap();
    reader.next_entry().unwrap();
    assert!(!reader.has_next().unwrap());

    seg.append(&encode_all(&payloads[2..]));

    assert!(reader.has_next().unwrap());
    assert_eq!(reader.next_entry().unwrap().payload(), &payloads[2][..]);
    assert_eq!(reader.next_entry().unwrap().payload(), &payloads[3][..]);
    assert!(!reader.has_next().unwrap());
}

#[test]
fn test_partial_append_completes_later() {
    let seg = TestSegment::with_bytes(&[]);
    let record = FramedRecord::new(b"written in two halves".to_vec()).unwrap().encode();
    let (first, second) = record.split_at(11);

    seg.append(first);
    let mut reader = seg.reader(&ReaderConfig::small(), 0);
    assert!(!reader.has_next().unwrap());

    seg.append(second);
    assert!(reader.has_next().unwrap());
    assert_eq!(
        reader.next_entry().unwrap().payload(),
        b"written in two halves"
    );
    assert_eq!(reader.position(), record.len() as u64);
}
