use std::io::Cursor;
use std::path::PathBuf;

use gattlens_core::gatt::{CharacteristicId, ServiceKind};
use gattlens_core::protocols::racp::RecordFilter;
use gattlens_core::{
    DeviceId, EventSource, RacpRequest, SourceError, TranscriptFileSource, TranscriptSource,
    TransportEvent,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn collect<S: EventSource>(mut source: S) -> Result<Vec<TransportEvent>, SourceError> {
    let mut events = Vec::new();
    while let Some(event) = source.next_event()? {
        events.push(event);
    }
    Ok(events)
}

#[test]
fn reads_every_event_from_fixture() {
    let source = TranscriptFileSource::open(&fixture("glucose_session.txt")).unwrap();
    let events = collect(source).unwrap();
    assert_eq!(events.len(), 11);
    assert!(events.iter().all(|event| event.device().as_str() == "meter"));
    assert_eq!(
        events[2],
        TransportEvent::Request {
            device: DeviceId::new("meter"),
            service: ServiceKind::Glucose,
            request: RacpRequest::Report(RecordFilter::All),
        }
    );
    assert!(matches!(events.last(), Some(TransportEvent::Disconnected { .. })));
}

#[test]
fn assigned_numbers_and_names_resolve_to_the_same_characteristic() {
    let text = "hrm notify 0x2A37 00:48\nhrm notify heart-rate-measurement 0048\n";
    let events = collect(TranscriptSource::new(Cursor::new(text))).unwrap();
    let characteristics: Vec<_> = events
        .iter()
        .map(|event| match event {
            TransportEvent::Payload { characteristic, data, .. } => (*characteristic, data.clone()),
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(
        characteristics,
        vec![
            (CharacteristicId::HeartRateMeasurement, vec![0x00, 0x48]),
            (CharacteristicId::HeartRateMeasurement, vec![0x00, 0x48]),
        ]
    );
}

#[test]
fn shared_racp_number_is_rejected_with_line() {
    let source = TranscriptFileSource::open(&fixture("malformed.txt")).unwrap();
    let err = collect(source).unwrap_err();
    match err {
        SourceError::Transcript { line, message } => {
            assert_eq!(line, 3);
            assert!(message.contains("0x2a52"), "{message}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let err = match TranscriptFileSource::open(&fixture("does-not-exist.txt")) {
        Ok(_) => panic!("expected missing transcript to be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, SourceError::Io(_)));
}

#[test]
fn unknown_event_reports_line_number() {
    let text = "# header\n\nmeter connect\nmeter explode\n";
    let err = collect(TranscriptSource::new(Cursor::new(text))).unwrap_err();
    assert!(matches!(err, SourceError::Transcript { line: 4, .. }));
}
