use super::characteristic::CharacteristicId;
use super::record::{Decoded, MetadataUpdate, Record};
use crate::protocols::common::DecodeError;
use crate::protocols::{
    battery, blood_pressure, cgm, direction, glucose, heart_rate, proximity, racp, speed_cadence,
    thermometer, throughput,
};

pub type Decoder = fn(&[u8]) -> Result<Decoded, DecodeError>;

/// Select the decoder for a characteristic.
pub fn decoder_for(characteristic: CharacteristicId) -> Decoder {
    match characteristic {
        CharacteristicId::HeartRateMeasurement => |p| {
            heart_rate::parse_heart_rate_measurement(p).map(|r| Decoded::record(Record::HeartRate(r)))
        },
        CharacteristicId::BodySensorLocation => |p| {
            heart_rate::parse_body_sensor_location(p)
                .map(|l| Decoded::Metadata(MetadataUpdate::BodySensorLocation(l)))
        },
        CharacteristicId::BloodPressureMeasurement => |p| {
            blood_pressure::parse_blood_pressure_measurement(p)
                .map(|r| Decoded::record(Record::BloodPressure(r)))
        },
        CharacteristicId::IntermediateCuffPressure => |p| {
            blood_pressure::parse_intermediate_cuff_pressure(p)
                .map(|r| Decoded::record(Record::IntermediateCuffPressure(r)))
        },
        CharacteristicId::GlucoseMeasurement => |p| {
            glucose::parse_glucose_measurement(p).map(|r| Decoded::record(Record::Glucose(r)))
        },
        CharacteristicId::GlucoseMeasurementContext => |p| {
            glucose::parse_glucose_measurement_context(p)
                .map(|r| Decoded::record(Record::GlucoseContext(r)))
        },
        CharacteristicId::GlucoseRacp | CharacteristicId::CgmRacp => {
            |p| racp::parse_racp_response(p).map(Decoded::Control)
        }
        CharacteristicId::CgmMeasurement => |p| {
            cgm::parse_cgm_measurements(p)
                .map(|records| Decoded::Records(records.into_iter().map(Record::Cgm).collect()))
        },
        CharacteristicId::CgmStatus => {
            |p| cgm::parse_cgm_status(p).map(|s| Decoded::Metadata(MetadataUpdate::CgmStatus(s)))
        }
        CharacteristicId::CgmSpecificOpsControlPoint => |p| {
            cgm::parse_ops_response(p).map(|r| Decoded::Metadata(MetadataUpdate::OpsResponse(r)))
        },
        CharacteristicId::TemperatureMeasurement => |p| {
            thermometer::parse_temperature_measurement(p)
                .map(|r| Decoded::record(Record::Temperature(r)))
        },
        CharacteristicId::IntermediateTemperature => |p| {
            thermometer::parse_temperature_measurement(p)
                .map(|r| Decoded::record(Record::IntermediateTemperature(r)))
        },
        CharacteristicId::TemperatureType => |p| {
            thermometer::parse_temperature_type(p)
                .map(|t| Decoded::Metadata(MetadataUpdate::TemperatureType(t)))
        },
        CharacteristicId::AlertLevel => |p| {
            proximity::parse_alert_level(p).map(|l| Decoded::Metadata(MetadataUpdate::AlertLevel(l)))
        },
        CharacteristicId::TxPowerLevel => |p| {
            proximity::parse_tx_power_level(p)
                .map(|dbm| Decoded::Metadata(MetadataUpdate::TxPowerLevel(dbm)))
        },
        CharacteristicId::CscMeasurement => |p| {
            speed_cadence::parse_csc_measurement(p)
                .map(|r| Decoded::record(Record::CyclingSpeedCadence(r)))
        },
        CharacteristicId::RscMeasurement => |p| {
            speed_cadence::parse_rsc_measurement(p)
                .map(|r| Decoded::record(Record::RunningSpeedCadence(r)))
        },
        CharacteristicId::CscSensorLocation | CharacteristicId::RscSensorLocation => |p| {
            speed_cadence::parse_sensor_location(p)
                .map(|l| Decoded::Metadata(MetadataUpdate::SensorLocation(l)))
        },
        CharacteristicId::DirectionAzimuth => {
            |p| direction::parse_azimuth(p).map(|r| Decoded::record(Record::Azimuth(r)))
        }
        CharacteristicId::DirectionElevation => {
            |p| direction::parse_elevation(p).map(|r| Decoded::record(Record::Elevation(r)))
        }
        CharacteristicId::DirectionDistance => {
            |p| direction::parse_distance(p).map(|r| Decoded::record(Record::Distance(r)))
        }
        CharacteristicId::Throughput => {
            |p| throughput::parse_throughput(p).map(|r| Decoded::record(Record::Throughput(r)))
        }
        CharacteristicId::BatteryLevel => |p| {
            battery::parse_battery_level(p)
                .map(|level| Decoded::Metadata(MetadataUpdate::BatteryLevel(level)))
        },
    }
}

/// Decode one payload received on `characteristic`.
///
/// # Examples
/// ```
/// use gattlens_core::gatt::{CharacteristicId, Decoded, Record, decode};
///
/// let decoded = decode(CharacteristicId::HeartRateMeasurement, &[0x06, 0x48])?;
/// let Decoded::Records(records) = decoded else { unreachable!() };
/// assert!(matches!(&records[0], Record::HeartRate(hr) if hr.heart_rate == 72 && hr.sensor_contact));
/// # Ok::<(), gattlens_core::DecodeError>(())
/// ```
pub fn decode(characteristic: CharacteristicId, payload: &[u8]) -> Result<Decoded, DecodeError> {
    decoder_for(characteristic)(payload)
}

#[cfg(test)]
mod tests {
    use super::decode;
    use crate::gatt::{CharacteristicId, Decoded, MetadataUpdate, Record};
    use crate::protocols::racp::{Opcode, RacpResponse, ResponseCode};

    #[test]
    fn every_characteristic_rejects_empty_payload() {
        for id in CharacteristicId::ALL {
            assert!(decode(*id, &[]).is_err(), "{id} accepted an empty payload");
        }
    }

    #[test]
    fn cgm_notification_yields_each_record() {
        let payload = [
            0x06, 0x00, 0x78, 0x00, 0x0a, 0x00, 0x06, 0x00, 0x79, 0x00, 0x0f, 0x00,
        ];
        let Decoded::Records(records) = decode(CharacteristicId::CgmMeasurement, &payload).unwrap()
        else {
            panic!("expected records");
        };
        assert_eq!(records.len(), 2);
        assert!(matches!(&records[1], Record::Cgm(r) if r.time_offset == 15));
    }

    #[test]
    fn metadata_and_control_routes() {
        assert_eq!(
            decode(CharacteristicId::BatteryLevel, &[0x50]).unwrap(),
            Decoded::Metadata(MetadataUpdate::BatteryLevel(80))
        );
        assert_eq!(
            decode(CharacteristicId::GlucoseRacp, &[0x06, 0x00, 0x01, 0x06]).unwrap(),
            Decoded::Control(RacpResponse::ResponseCode {
                request_opcode: Opcode::ReportStoredRecords,
                code: ResponseCode::NoRecordsFound
            })
        );
    }

    #[test]
    fn decoded_serializes_with_tags() {
        let decoded = decode(CharacteristicId::TxPowerLevel, &[0xf6]).unwrap();
        let json = serde_json::to_value(&decoded).unwrap();
        assert_eq!(json["kind"], "metadata");
        assert_eq!(json["value"]["kind"], "tx_power_level");
        assert_eq!(json["value"]["value"], -10);
    }
}
