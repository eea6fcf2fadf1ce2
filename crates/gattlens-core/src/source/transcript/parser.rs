use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::gatt::{CharacteristicId, ServiceKind};
use crate::protocols::racp::{Operand, OperandRange, RacpRequest, RecordFilter};
use crate::source::{DeviceId, EventSource, SourceError, TransportEvent};

use super::error::TranscriptError;
use super::layout;
use super::reader::{decode_hex, parse_operand, split_fields};

/// Transcript reader over any buffered input.
pub struct TranscriptSource<R> {
    lines: Lines<R>,
    line: usize,
}

pub type TranscriptFileSource = TranscriptSource<BufReader<File>>;

impl TranscriptSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(SourceError::from)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TranscriptSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> EventSource for TranscriptSource<R> {
    fn next_event(&mut self) -> Result<Option<TransportEvent>, SourceError> {
        next_event(&mut self.lines, &mut self.line).map_err(SourceError::from)
    }
}

fn next_event<R: BufRead>(
    lines: &mut Lines<R>,
    line_no: &mut usize,
) -> Result<Option<TransportEvent>, TranscriptError> {
    for line in lines {
        let line = line?;
        *line_no += 1;
        if let Some(fields) = split_fields(&line) {
            return parse_fields(*line_no, &fields).map(Some);
        }
    }
    Ok(None)
}

fn parse_fields(line: usize, fields: &[&str]) -> Result<TransportEvent, TranscriptError> {
    let [device, keyword, rest @ ..] = fields else {
        return Err(TranscriptError::syntax(
            line,
            "expected '<device> <event> [fields...]'",
        ));
    };
    let device = DeviceId::new(*device);
    match *keyword {
        layout::KEYWORD_CONNECT => {
            expect_fields(line, keyword, rest, 0)?;
            Ok(TransportEvent::Connected { device })
        }
        layout::KEYWORD_DISCONNECT => {
            expect_fields(line, keyword, rest, 0)?;
            Ok(TransportEvent::Disconnected { device })
        }
        layout::KEYWORD_NOTIFY => {
            let [characteristic, payload] = rest else {
                return Err(TranscriptError::syntax(
                    line,
                    "notify expects '<characteristic> <hex payload>'",
                ));
            };
            let characteristic = characteristic
                .parse::<CharacteristicId>()
                .map_err(|err| TranscriptError::syntax(line, err.to_string()))?;
            let data = decode_hex(payload).map_err(|msg| TranscriptError::syntax(line, msg))?;
            Ok(TransportEvent::Payload {
                device,
                characteristic,
                data,
            })
        }
        layout::KEYWORD_REQUEST => {
            let [service, op, operands @ ..] = rest else {
                return Err(TranscriptError::syntax(
                    line,
                    "request expects '<service> <operation> [operands...]'",
                ));
            };
            let service = parse_racp_service(line, service)?;
            let request = parse_request(line, op, operands)?;
            Ok(TransportEvent::Request {
                device,
                service,
                request,
            })
        }
        layout::KEYWORD_ABORT => {
            let [service] = rest else {
                return Err(TranscriptError::syntax(line, "abort expects '<service>'"));
            };
            let service = parse_racp_service(line, service)?;
            Ok(TransportEvent::Abort { device, service })
        }
        other => Err(TranscriptError::syntax(
            line,
            format!("unknown event '{other}'"),
        )),
    }
}

fn expect_fields(
    line: usize,
    keyword: &str,
    rest: &[&str],
    count: usize,
) -> Result<(), TranscriptError> {
    if rest.len() != count {
        return Err(TranscriptError::syntax(
            line,
            format!("{keyword} takes {count} field(s), got {}", rest.len()),
        ));
    }
    Ok(())
}

fn parse_racp_service(line: usize, text: &str) -> Result<ServiceKind, TranscriptError> {
    let service = text
        .parse::<ServiceKind>()
        .map_err(|err| TranscriptError::syntax(line, err.to_string()))?;
    if service.racp_characteristic().is_none() {
        return Err(TranscriptError::syntax(
            line,
            format!("service '{service}' has no record access control point"),
        ));
    }
    Ok(service)
}

fn parse_request(line: usize, op: &str, operands: &[&str]) -> Result<RacpRequest, TranscriptError> {
    let values = operands
        .iter()
        .map(|text| parse_operand(text))
        .collect::<Result<Vec<u16>, String>>()
        .map_err(|msg| TranscriptError::syntax(line, msg))?;
    let arity = |expected: usize| {
        if values.len() == expected {
            Ok(())
        } else {
            Err(TranscriptError::syntax(
                line,
                format!("'{op}' takes {expected} operand(s), got {}", values.len()),
            ))
        }
    };
    let request = match op {
        layout::OP_ALL => {
            arity(0)?;
            RacpRequest::Report(RecordFilter::All)
        }
        layout::OP_FIRST => {
            arity(0)?;
            RacpRequest::Report(RecordFilter::First)
        }
        layout::OP_LAST => {
            arity(0)?;
            RacpRequest::Report(RecordFilter::Last)
        }
        layout::OP_COUNT => {
            arity(0)?;
            RacpRequest::Count(RecordFilter::All)
        }
        layout::OP_DELETE => {
            arity(0)?;
            RacpRequest::Delete(RecordFilter::All)
        }
        layout::OP_GREATER_OR_EQUAL => {
            arity(1)?;
            RacpRequest::Report(RecordFilter::GreaterOrEqual(Operand::Sequence(values[0])))
        }
        layout::OP_LESS_OR_EQUAL => {
            arity(1)?;
            RacpRequest::Report(RecordFilter::LessOrEqual(Operand::Sequence(values[0])))
        }
        layout::OP_WITHIN => {
            arity(2)?;
            RacpRequest::Report(RecordFilter::Within(OperandRange::Sequence {
                min: values[0],
                max: values[1],
            }))
        }
        other => {
            return Err(TranscriptError::syntax(
                line,
                format!("unknown racp operation '{other}'"),
            ));
        }
    };
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::TranscriptSource;
    use crate::gatt::{CharacteristicId, ServiceKind};
    use crate::protocols::racp::{Operand, OperandRange, RacpRequest, RecordFilter};
    use crate::source::{DeviceId, EventSource, SourceError, TransportEvent};

    fn events(text: &str) -> Result<Vec<TransportEvent>, SourceError> {
        let mut source = TranscriptSource::new(text.as_bytes());
        let mut events = Vec::new();
        while let Some(event) = source.next_event()? {
            events.push(event);
        }
        Ok(events)
    }

    #[test]
    fn parse_every_keyword() {
        let text = "\
# session
meter connect
meter request glucose all
meter notify glucose-measurement 00:01:00:e8:07:03:0f:0a:1e:00

meter abort glucose
meter disconnect
";
        let events = events(text).unwrap();
        let device = DeviceId::new("meter");
        assert_eq!(
            events,
            vec![
                TransportEvent::Connected {
                    device: device.clone()
                },
                TransportEvent::Request {
                    device: device.clone(),
                    service: ServiceKind::Glucose,
                    request: RacpRequest::Report(RecordFilter::All),
                },
                TransportEvent::Payload {
                    device: device.clone(),
                    characteristic: CharacteristicId::GlucoseMeasurement,
                    data: vec![0x00, 0x01, 0x00, 0xe8, 0x07, 0x03, 0x0f, 0x0a, 0x1e, 0x00],
                },
                TransportEvent::Abort {
                    device: device.clone(),
                    service: ServiceKind::Glucose,
                },
                TransportEvent::Disconnected { device },
            ]
        );
    }

    #[test]
    fn parse_filtered_requests() {
        let text = "\
cgm request cgm greater-or-equal 30
cgm request cgm within 0x0a 20
cgm request cgm count
";
        let events = events(text).unwrap();
        let requests: Vec<RacpRequest> = events
            .into_iter()
            .map(|event| match event {
                TransportEvent::Request { request, .. } => request,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(
            requests,
            vec![
                RacpRequest::Report(RecordFilter::GreaterOrEqual(Operand::Sequence(30))),
                RacpRequest::Report(RecordFilter::Within(OperandRange::Sequence {
                    min: 10,
                    max: 20
                })),
                RacpRequest::Count(RecordFilter::All),
            ]
        );
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = events("a connect\n\nb notify heart-rate-measurement 0z\n").unwrap_err();
        assert!(matches!(err, SourceError::Transcript { line: 3, .. }));
        assert!(err.to_string().contains("invalid hex digit"));
    }

    #[test]
    fn reject_unknown_keywords_and_services() {
        let err = events("a explode\n").unwrap_err();
        assert!(err.to_string().contains("unknown event 'explode'"));
        let err = events("a request heart-rate all\n").unwrap_err();
        assert!(err.to_string().contains("no record access control point"));
        let err = events("a request glucose within 1\n").unwrap_err();
        assert!(err.to_string().contains("takes 2 operand(s)"));
        let err = events("a notify 0x2A52 0601\n").unwrap_err();
        assert!(err.to_string().contains("shared by several services"));
    }
}
