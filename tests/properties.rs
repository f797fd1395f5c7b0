//! Property tests over arbitrary segments, containers and messages.
//!
//! Every generated value must survive flatten → unflatten unchanged, and the
//! size query must always agree with the number of bytes actually written.

use jbitpack::{count_segments, Document, Field, Message, Segment, SegmentList, SegmentMap};
use proptest::prelude::*;

fn arb_field() -> impl Strategy<Value = Field> {
    prop_oneof![
        any::<i8>().prop_map(Field::from),
        any::<u8>().prop_map(Field::from),
        any::<i16>().prop_map(Field::from),
        any::<u16>().prop_map(Field::from),
        any::<i32>().prop_map(Field::from),
        any::<u32>().prop_map(Field::from),
        any::<i64>().prop_map(Field::from),
        any::<u64>().prop_map(Field::from),
        any::<bool>().prop_map(Field::from),
        // NaN never compares equal, so floats come from the finite range.
        (-1.0e30f32..1.0e30f32).prop_map(Field::from),
        (-1.0e300f64..1.0e300f64).prop_map(Field::from),
        ".{0,40}".prop_map(Field::from),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Field::from),
    ]
}

fn arb_map() -> impl Strategy<Value = SegmentMap> {
    prop::collection::btree_map("[a-zA-Z0-9_]{1,12}", arb_field(), 0..16)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn field_round_trips(field in arb_field()) {
        let seg = field.segment();
        let bytes = seg.flatten().unwrap();
        prop_assert_eq!(bytes.len() as u64, seg.size());
        let back = Segment::unflatten(&bytes).unwrap();
        prop_assert_eq!(&back, seg);
    }

    #[test]
    fn string_round_trips(s in ".{0,200}") {
        let seg = Segment::from(s.as_str());
        let back = Segment::unflatten(&seg.flatten().unwrap()).unwrap();
        prop_assert_eq!(back.get_string().unwrap(), s.as_str());
    }

    #[test]
    fn binary_round_trips(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let seg = Segment::from(data.as_slice());
        let back = Segment::unflatten(&seg.flatten().unwrap()).unwrap();
        prop_assert_eq!(back.get_binary().unwrap(), data.as_slice());
    }

    #[test]
    fn list_round_trips(items in prop::collection::vec(arb_field(), 0..24)) {
        let list: SegmentList = items.into_iter().collect();
        let bytes = list.flatten().unwrap();
        prop_assert_eq!(bytes.len() as u64, list.size());
        prop_assert_eq!(SegmentList::unflatten(&bytes).unwrap(), list);
    }

    #[test]
    fn map_round_trips(map in arb_map()) {
        let bytes = map.flatten().unwrap();
        prop_assert_eq!(bytes.len() as u64, map.size());
        prop_assert_eq!(SegmentMap::unflatten(&bytes).unwrap(), map);
    }

    #[test]
    fn message_round_trips(command in "[A-Za-z]{1,24}", attachments in arb_map()) {
        let mut msg = Message::new(command);
        for (name, field) in attachments.iter() {
            msg.attach(name, field.clone());
        }
        let bytes = msg.flatten().unwrap();
        prop_assert_eq!(bytes.len() as u64, msg.size());
        prop_assert_eq!(msg.integrity_count(), 2 + 2 * attachments.len() as u64);

        let back = Message::unflatten(&bytes).unwrap();
        prop_assert_eq!(&back, &msg);
        prop_assert_eq!(back.fingerprint().unwrap(), msg.fingerprint().unwrap());
    }

    #[test]
    fn document_round_trips(members in prop::collection::vec(arb_field(), 0..24)) {
        let mut doc = Document::new();
        for field in members {
            doc.push(field.into_segment()).unwrap();
        }
        let bytes = doc.flatten().unwrap();
        prop_assert_eq!(bytes.len() as u64, doc.size());
        prop_assert_eq!(Document::unflatten(&bytes).unwrap(), doc);
    }

    #[test]
    fn scan_counts_nonempty_segments(values in prop::collection::vec(any::<u32>(), 0..32)) {
        let mut buf = Vec::new();
        for v in &values {
            Segment::from(*v).write(&mut buf).unwrap();
        }
        prop_assert_eq!(count_segments(&buf).unwrap(), values.len());
    }

    #[test]
    fn decoder_never_panics_on_garbage(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let _ = Segment::unflatten(&bytes);
        let _ = count_segments(&bytes);
        let _ = SegmentMap::unflatten(&bytes);
        let _ = Document::unflatten(&bytes);
        let _ = Message::unflatten(&bytes);
    }
}
