use gattlens_core::aggregate::DeviceRegistry;
use gattlens_core::gatt::{CharacteristicId, Record, ServiceKind};
use gattlens_core::protocols::racp::{RecordFilter, ResponseCode};
use gattlens_core::session::{Completion, RacpError, RacpOutcome, RacpState};
use gattlens_core::{DeviceId, RacpRequest, ReplayConfig, Transport, TransportError};
use tokio::sync::broadcast::error::TryRecvError;

/// Records every write; fails them while `offline` is set.
#[derive(Default)]
struct FakeLink {
    writes: Vec<(CharacteristicId, Vec<u8>)>,
    offline: bool,
}

impl Transport for FakeLink {
    fn write_command(
        &mut self,
        device: &DeviceId,
        characteristic: CharacteristicId,
        command: &[u8],
    ) -> Result<(), TransportError> {
        if self.offline {
            return Err(TransportError::NotConnected(device.clone()));
        }
        self.writes.push((characteristic, command.to_vec()));
        Ok(())
    }
}

/// Glucose measurement with a 95 + seq mg/dL capillary sample.
fn glucose_record(sequence: u16) -> Vec<u8> {
    let mut payload = vec![0x02];
    payload.extend_from_slice(&sequence.to_le_bytes());
    payload.extend_from_slice(&[0xe8, 0x07, 0x03, 0x0f, 0x0a, 0x1e, 0x00]);
    let mantissa = 95 + sequence;
    payload.extend_from_slice(&[(mantissa & 0xff) as u8, 0xb0 | (mantissa >> 8) as u8, 0x12]);
    payload
}

fn racp_success(request_opcode: u8) -> [u8; 4] {
    [0x06, 0x00, request_opcode, 0x01]
}

fn meter() -> (DeviceId, DeviceRegistry, FakeLink) {
    let device = DeviceId::new("meter");
    let mut registry = DeviceRegistry::new(ReplayConfig::default());
    registry.connect(&device);
    (device, registry, FakeLink::default())
}

#[tokio::test]
async fn report_all_collects_every_record() {
    let (device, mut registry, mut link) = meter();
    let mut records = registry
        .subscribe_records(&device, ServiceKind::Glucose)
        .unwrap();
    let outcome = registry
        .request(
            &device,
            ServiceKind::Glucose,
            RacpRequest::Report(RecordFilter::All),
            &mut link,
        )
        .unwrap();
    assert_eq!(link.writes, vec![(CharacteristicId::GlucoseRacp, vec![0x01, 0x01])]);

    for sequence in 1..=3 {
        registry.handle_payload(&device, CharacteristicId::GlucoseMeasurement, &glucose_record(sequence));
    }
    assert_eq!(
        registry.racp_state(&device, ServiceKind::Glucose),
        Some(RacpState::ReceivingRecords)
    );
    registry.handle_payload(&device, CharacteristicId::GlucoseRacp, &racp_success(0x01));

    assert_eq!(
        outcome.await.unwrap(),
        RacpOutcome::Completed(Completion::Success { received: 3 })
    );
    let snapshot = registry.snapshot(&device).unwrap();
    assert_eq!(snapshot.services[0].records.len(), 3);
    assert_eq!(snapshot.racp_sessions.len(), 1);

    let mut sequences = Vec::new();
    while let Ok(record) = records.try_recv() {
        match record {
            Record::Glucose(measurement) => sequences.push(measurement.sequence_number),
            other => panic!("unexpected record {other:?}"),
        }
    }
    assert_eq!(sequences, [1, 2, 3]);
}

#[tokio::test]
async fn records_from_an_unset_clock_still_count() {
    let (device, mut registry, mut link) = meter();
    let outcome = registry
        .request(&device, ServiceKind::Glucose, RacpRequest::Report(RecordFilter::All), &mut link)
        .unwrap();
    for sequence in 1..=2u16 {
        let mut payload = vec![0x00];
        payload.extend_from_slice(&sequence.to_le_bytes());
        payload.extend_from_slice(&[0x00; 7]);
        registry.handle_payload(&device, CharacteristicId::GlucoseMeasurement, &payload);
    }
    registry.handle_payload(&device, CharacteristicId::GlucoseRacp, &racp_success(0x01));

    assert_eq!(
        outcome.await.unwrap(),
        RacpOutcome::Completed(Completion::Success { received: 2 })
    );
    let snapshot = registry.snapshot(&device).unwrap();
    let Record::Glucose(first) = &snapshot.services[0].records[0] else {
        panic!("expected a glucose record");
    };
    assert_eq!(first.base_time, None);
    assert_eq!(snapshot.services[0].dropped_payloads, 0);
}

#[tokio::test]
async fn busy_request_is_rejected_and_session_continues() {
    let (device, mut registry, mut link) = meter();
    let outcome = registry
        .request(&device, ServiceKind::Glucose, RacpRequest::Report(RecordFilter::All), &mut link)
        .unwrap();
    registry.handle_payload(&device, CharacteristicId::GlucoseMeasurement, &glucose_record(1));

    let err = registry
        .request(&device, ServiceKind::Glucose, RacpRequest::Count(RecordFilter::All), &mut link)
        .unwrap_err();
    assert_eq!(
        err,
        RacpError::SessionBusy {
            service: ServiceKind::Glucose
        }
    );
    assert_eq!(link.writes.len(), 1);
    assert_eq!(
        registry.racp_state(&device, ServiceKind::Glucose),
        Some(RacpState::ReceivingRecords)
    );

    registry.handle_payload(&device, CharacteristicId::GlucoseMeasurement, &glucose_record(2));
    registry.handle_payload(&device, CharacteristicId::GlucoseRacp, &racp_success(0x01));
    assert_eq!(
        outcome.await.unwrap(),
        RacpOutcome::Completed(Completion::Success { received: 2 })
    );
}

#[tokio::test]
async fn count_resolves_with_number_of_records() {
    let (device, mut registry, mut link) = meter();
    let outcome = registry
        .request(&device, ServiceKind::Glucose, RacpRequest::Count(RecordFilter::All), &mut link)
        .unwrap();
    registry.handle_payload(&device, CharacteristicId::GlucoseRacp, &[0x05, 0x00, 0x11, 0x00]);
    assert_eq!(
        outcome.await.unwrap(),
        RacpOutcome::Completed(Completion::StoredRecords { count: 17 })
    );
}

#[tokio::test]
async fn no_records_found_completes_with_protocol_error() {
    let (device, mut registry, mut link) = meter();
    let outcome = registry
        .request(&device, ServiceKind::ContinuousGlucose, RacpRequest::Report(RecordFilter::Last), &mut link)
        .unwrap();
    assert_eq!(link.writes[0], (CharacteristicId::CgmRacp, vec![0x01, 0x06]));
    registry.handle_payload(&device, CharacteristicId::CgmRacp, &[0x06, 0x00, 0x01, 0x06]);
    assert_eq!(
        outcome.await.unwrap(),
        RacpOutcome::Completed(Completion::Protocol {
            code: ResponseCode::NoRecordsFound
        })
    );
}

#[tokio::test]
async fn abort_resolves_both_requests() {
    let (device, mut registry, mut link) = meter();
    let report = registry
        .request(&device, ServiceKind::Glucose, RacpRequest::Report(RecordFilter::All), &mut link)
        .unwrap();
    registry.handle_payload(&device, CharacteristicId::GlucoseMeasurement, &glucose_record(1));

    let abort = registry.cancel(&device, ServiceKind::Glucose, &mut link).unwrap();
    assert_eq!(link.writes[1], (CharacteristicId::GlucoseRacp, vec![0x03, 0x00]));
    registry.handle_payload(&device, CharacteristicId::GlucoseRacp, &racp_success(0x03));

    let expected = RacpOutcome::Aborted { received: 1 };
    assert_eq!(report.await.unwrap(), expected);
    assert_eq!(abort.await.unwrap(), expected);
    assert_eq!(
        registry.racp_state(&device, ServiceKind::Glucose),
        Some(RacpState::Aborted { received: 1 })
    );
}

#[tokio::test]
async fn failed_abort_write_completes_with_link_lost() {
    let (device, mut registry, mut link) = meter();
    let report = registry
        .request(&device, ServiceKind::Glucose, RacpRequest::Report(RecordFilter::All), &mut link)
        .unwrap();
    link.offline = true;
    let abort = registry.cancel(&device, ServiceKind::Glucose, &mut link).unwrap();

    let expected = RacpOutcome::Completed(Completion::LinkLost { received: 0 });
    assert_eq!(report.await.unwrap(), expected);
    assert_eq!(abort.await.unwrap(), expected);
}

#[tokio::test]
async fn disconnect_while_request_sent_is_link_lost() {
    let (device, mut registry, mut link) = meter();
    registry.handle_payload(&device, CharacteristicId::GlucoseMeasurement, &glucose_record(9));
    let outcome = registry
        .request(&device, ServiceKind::Glucose, RacpRequest::Report(RecordFilter::All), &mut link)
        .unwrap();

    let last = registry.disconnect(&device).unwrap();
    assert_eq!(
        outcome.await.unwrap(),
        RacpOutcome::Completed(Completion::LinkLost { received: 0 })
    );
    // the live record seen before the request survives in the final view
    assert_eq!(last.services[0].records.len(), 1);
    assert_eq!(last.racp_sessions.len(), 1);

    let err = registry
        .request(&device, ServiceKind::Glucose, RacpRequest::Report(RecordFilter::All), &mut link)
        .unwrap_err();
    assert_eq!(err, RacpError::NotConnected(device.clone()));
}

#[test]
fn undecodable_record_is_counted_and_ignored() {
    let (device, mut registry, mut link) = meter();
    registry
        .request(&device, ServiceKind::Glucose, RacpRequest::Report(RecordFilter::All), &mut link)
        .unwrap();
    registry.handle_payload(&device, CharacteristicId::GlucoseMeasurement, &[0x02, 0x01]);
    registry.handle_payload(&device, CharacteristicId::GlucoseMeasurement, &glucose_record(2));
    registry.handle_payload(&device, CharacteristicId::GlucoseRacp, &racp_success(0x01));

    let snapshot = registry.snapshot(&device).unwrap();
    let glucose = &snapshot.services[0];
    assert_eq!(glucose.records.len(), 1);
    assert_eq!(glucose.dropped_payloads, 1);
    assert_eq!(snapshot.racp_sessions[0].dropped_records, 1);
    assert_eq!(
        snapshot.racp_sessions[0].outcome,
        RacpOutcome::Completed(Completion::Success { received: 1 })
    );
}

#[test]
fn metadata_subscribers_lose_oldest_updates_on_overflow() {
    let device = DeviceId::new("band");
    let mut registry = DeviceRegistry::new(ReplayConfig {
        metadata_capacity: 2,
        ..ReplayConfig::default()
    });
    registry.connect(&device);
    let mut updates = registry
        .subscribe_metadata(&device, ServiceKind::Battery)
        .unwrap();
    for level in [90u8, 80, 70] {
        registry.handle_payload(&device, CharacteristicId::BatteryLevel, &[level]);
    }
    assert!(matches!(updates.try_recv(), Err(TryRecvError::Lagged(1))));
    assert!(updates.try_recv().is_ok());
    assert!(updates.try_recv().is_ok());
    assert!(matches!(updates.try_recv(), Err(TryRecvError::Empty)));

    let snapshot = registry.snapshot(&device).unwrap();
    assert_eq!(snapshot.services[0].metadata.battery_level, Some(70));
}
