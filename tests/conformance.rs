//! JBitPack conformance test suite.
//!
//! Runs every vector in vectors/conformance.json.  Each vector names a
//! decode mode, a base64 input and either the expected decode summary or
//! the expected error code.

use base64::Engine;
use serde::Deserialize;

use jbitpack::{count_segments, CodecError, Document, Message, Segment, SegmentList, SegmentMap};

// ── Load conformance data ────────────────────────────────────

#[derive(Deserialize, Debug)]
struct VectorsFile {
    vectors: Vec<Vector>,
}

#[derive(Deserialize, Debug, Clone)]
struct Vector {
    test_id: String,
    mode: String,
    input_b64: String,
    expect: Expected,
}

#[derive(Deserialize, Debug, Clone, Default)]
struct Expected {
    #[serde(default)]
    err: Option<String>,
    #[serde(default)]
    tag: Option<u8>,
    #[serde(default)]
    value_b64: Option<String>,
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    attachments: Option<u64>,
}

/// Decode summary compared against the vector's expectation.
#[derive(Debug, PartialEq)]
enum Outcome {
    Segment { tag: u8, value: Vec<u8> },
    Count(u64),
    Message { command: String, attachments: u64 },
    Err(String),
}

fn b64(raw: &str) -> Vec<u8> {
    base64::engine::general_purpose::STANDARD
        .decode(raw)
        .expect("base64 decode failed")
}

fn run_vector(vec: &Vector) -> Outcome {
    let raw = b64(&vec.input_b64);

    let result: Result<Outcome, CodecError> = match vec.mode.as_str() {
        "segment" => Segment::unflatten(&raw).map(|seg| Outcome::Segment {
            tag: seg.tag().code(),
            value: seg.into_value(),
        }),
        "scan" => count_segments(&raw).map(|n| Outcome::Count(n as u64)),
        "list" => SegmentList::unflatten(&raw).map(|l| Outcome::Count(l.len() as u64)),
        "map" => SegmentMap::unflatten(&raw).map(|m| Outcome::Count(m.len() as u64)),
        "document" => Document::unflatten(&raw).map(|d| Outcome::Count(d.len() as u64)),
        "message" => Message::unflatten(&raw).map(|m| Outcome::Message {
            command: m.command().to_string(),
            attachments: m.attachments().len() as u64,
        }),
        other => panic!("unknown mode: {}", other),
    };

    result.unwrap_or_else(|e| Outcome::Err(e.code().to_string()))
}

fn expected_outcome(vec: &Vector) -> Outcome {
    let exp = &vec.expect;
    if let Some(ref err) = exp.err {
        return Outcome::Err(err.clone());
    }
    match vec.mode.as_str() {
        "segment" => Outcome::Segment {
            tag: exp.tag.expect("segment vector needs a tag"),
            value: b64(exp.value_b64.as_deref().expect("segment vector needs a value")),
        },
        "message" => Outcome::Message {
            command: exp.command.clone().expect("message vector needs a command"),
            attachments: exp.attachments.expect("message vector needs attachments"),
        },
        _ => Outcome::Count(exp.count.expect("vector needs a count")),
    }
}

fn load_vectors() -> Vec<Vector> {
    let raw = include_str!("vectors/conformance.json");
    let file: VectorsFile = serde_json::from_str(raw).expect("failed to parse vectors");
    file.vectors
}

// ── Test runner ──────────────────────────────────────────────

#[test]
fn conformance_all_vectors() {
    let vectors = load_vectors();

    let mut failures: Vec<(String, Outcome, Outcome)> = Vec::new();
    for vec in &vectors {
        let got = run_vector(vec);
        let want = expected_outcome(vec);
        if got != want {
            failures.push((vec.test_id.clone(), got, want));
        }
    }

    eprintln!(
        "CONFORMANCE: {}/{} PASS",
        vectors.len() - failures.len(),
        vectors.len()
    );
    for (tid, got, want) in &failures {
        eprintln!("  FAIL {}: got={:?} expected={:?}", tid, got, want);
    }
    assert!(failures.is_empty(), "{} vectors failed", failures.len());
}

#[test]
fn conformance_vector_ids_unique() {
    let vectors = load_vectors();
    let mut ids: Vec<&str> = vectors.iter().map(|v| v.test_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), vectors.len(), "duplicate test_id in vectors");
}

#[test]
fn conformance_covers_every_mode() {
    let vectors = load_vectors();
    for mode in ["segment", "scan", "list", "map", "document", "message"] {
        assert!(
            vectors.iter().any(|v| v.mode == mode),
            "no vectors for mode {}",
            mode
        );
    }
}

// ── Encoder side of the reference vectors ────────────────────

#[test]
fn reference_message_encodes_to_vector_bytes() {
    let vectors = load_vectors();
    let reference = vectors
        .iter()
        .find(|v| v.test_id == "msg_reference")
        .expect("msg_reference vector missing");

    let mut msg = Message::new("TestMsg");
    msg.attach("testString", "abcdef");
    msg.attach("testInt", 42i64);
    assert_eq!(msg.flatten().unwrap(), b64(&reference.input_b64));
}

#[test]
fn reference_string_encodes_to_vector_bytes() {
    let vectors = load_vectors();
    let reference = vectors
        .iter()
        .find(|v| v.test_id == "seg_string_abc123")
        .expect("seg_string_abc123 vector missing");

    let seg = Segment::from("ABC123");
    assert_eq!(seg.flatten().unwrap(), b64(&reference.input_b64));
}
