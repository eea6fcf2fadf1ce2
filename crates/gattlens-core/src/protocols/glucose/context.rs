use serde::Serialize;

use super::codes::{CarbohydrateId, Health, Meal, MedicationId, Tester};
use super::layout;
use crate::protocols::common::{ByteCursor, DecodeError, bit};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Carbohydrate {
    pub id: CarbohydrateId,
    pub grams: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exercise {
    /// Seconds; `None` when the device reports an overrun.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_s: Option<u16>,
    /// Percent.
    pub intensity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicationUnit {
    Kilograms,
    Liters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Medication {
    pub id: MedicationId,
    pub quantity: f32,
    pub unit: MedicationUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlucoseMeasurementContext {
    pub sequence_number: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_flags: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbohydrate: Option<Carbohydrate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal: Option<Meal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tester: Option<Tester>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<Health>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise: Option<Exercise>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication: Option<Medication>,
    /// Percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hba1c: Option<f32>,
}

pub fn parse_glucose_measurement_context(
    payload: &[u8],
) -> Result<GlucoseMeasurementContext, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(layout::CONTEXT_MIN_LEN)?;

    let flags = cursor.read_u8()?;
    let sections = [
        (layout::CONTEXT_FLAG_EXTENDED, layout::EXTENDED_FLAGS_LEN),
        (layout::CONTEXT_FLAG_CARBOHYDRATE, layout::CARBOHYDRATE_LEN),
        (layout::CONTEXT_FLAG_MEAL, layout::MEAL_LEN),
        (layout::CONTEXT_FLAG_TESTER_HEALTH, layout::TESTER_HEALTH_LEN),
        (layout::CONTEXT_FLAG_EXERCISE, layout::EXERCISE_LEN),
        (layout::CONTEXT_FLAG_MEDICATION, layout::MEDICATION_LEN),
        (layout::CONTEXT_FLAG_HBA1C, layout::HBA1C_LEN),
    ];
    let needed = layout::SEQUENCE_LEN
        + sections
            .iter()
            .filter(|(flag, _)| bit(flags, *flag))
            .map(|(_, len)| len)
            .sum::<usize>();
    cursor.require(needed)?;

    let sequence_number = cursor.read_u16_le()?;
    let extended_flags = if bit(flags, layout::CONTEXT_FLAG_EXTENDED) {
        Some(cursor.read_u8()?)
    } else {
        None
    };
    let carbohydrate = if bit(flags, layout::CONTEXT_FLAG_CARBOHYDRATE) {
        let id = CarbohydrateId::from_code(cursor.read_u8()?)?;
        Some(Carbohydrate {
            id,
            grams: cursor.read_sfloat()? * 1000.0,
        })
    } else {
        None
    };
    let meal = if bit(flags, layout::CONTEXT_FLAG_MEAL) {
        Some(Meal::from_code(cursor.read_u8()?)?)
    } else {
        None
    };
    let (tester, health) = if bit(flags, layout::CONTEXT_FLAG_TESTER_HEALTH) {
        let packed = cursor.read_u8()?;
        (
            Some(Tester::from_code(packed & 0x0f)?),
            Some(Health::from_code(packed >> 4)?),
        )
    } else {
        (None, None)
    };
    let exercise = if bit(flags, layout::CONTEXT_FLAG_EXERCISE) {
        let duration = cursor.read_u16_le()?;
        Some(Exercise {
            duration_s: Some(duration).filter(|d| *d != layout::EXERCISE_DURATION_OVERRUN),
            intensity: cursor.read_u8()?,
        })
    } else {
        None
    };
    let medication = if bit(flags, layout::CONTEXT_FLAG_MEDICATION) {
        let id = MedicationId::from_code(cursor.read_u8()?)?;
        let unit = if bit(flags, layout::CONTEXT_FLAG_MEDICATION_LITERS) {
            MedicationUnit::Liters
        } else {
            MedicationUnit::Kilograms
        };
        Some(Medication {
            id,
            quantity: cursor.read_sfloat()?,
            unit,
        })
    } else {
        None
    };
    let hba1c = if bit(flags, layout::CONTEXT_FLAG_HBA1C) {
        Some(cursor.read_sfloat()?)
    } else {
        None
    };

    Ok(GlucoseMeasurementContext {
        sequence_number,
        extended_flags,
        carbohydrate,
        meal,
        tester,
        health,
        exercise,
        medication,
        hba1c,
    })
}

#[cfg(test)]
mod tests {
    use super::{MedicationUnit, parse_glucose_measurement_context};
    use crate::protocols::common::DecodeError;
    use crate::protocols::glucose::codes::{CarbohydrateId, Health, Meal, MedicationId, Tester};

    #[test]
    fn parse_sequence_only() {
        let parsed = parse_glucose_measurement_context(&[0x00, 0x05, 0x00]).unwrap();
        assert_eq!(parsed.sequence_number, 5);
        assert!(parsed.carbohydrate.is_none());
        assert!(parsed.meal.is_none());
        assert!(parsed.hba1c.is_none());
    }

    #[test]
    fn parse_carbohydrate_meal_and_tester() {
        // carbohydrate lunch 0.05 kg (50 g), postprandial, self test / no issues
        let payload = [0x07, 0x09, 0x00, 0x02, 0x05, 0xe0, 0x02, 0x51];
        let parsed = parse_glucose_measurement_context(&payload).unwrap();
        assert_eq!(parsed.sequence_number, 9);
        let carbs = parsed.carbohydrate.unwrap();
        assert_eq!(carbs.id, CarbohydrateId::Lunch);
        assert!((carbs.grams - 50.0).abs() < 0.01);
        assert_eq!(parsed.meal, Some(Meal::Postprandial));
        assert_eq!(parsed.tester, Some(Tester::SelfTest));
        assert_eq!(parsed.health, Some(Health::NoHealthIssues));
    }

    #[test]
    fn parse_exercise_medication_hba1c_and_extended_flags() {
        let payload = [
            0xf8, 0x01, 0x00, // flags, sequence
            0x00, // extended flags
            0xff, 0xff, 0x50, // exercise overrun, 80 %
            0x01, 0x0a, 0xd0, // rapid acting insulin, 10e-3 l
            0x3a, 0xf0, // HbA1c 5.8 %
        ];
        let parsed = parse_glucose_measurement_context(&payload).unwrap();
        assert_eq!(parsed.extended_flags, Some(0));
        let exercise = parsed.exercise.unwrap();
        assert_eq!(exercise.duration_s, None);
        assert_eq!(exercise.intensity, 80);
        let medication = parsed.medication.unwrap();
        assert_eq!(medication.id, MedicationId::RapidActingInsulin);
        assert_eq!(medication.unit, MedicationUnit::Liters);
        assert!((medication.quantity - 0.01).abs() < 1e-6);
        assert!((parsed.hba1c.unwrap() - 5.8).abs() < 0.001);
    }

    #[test]
    fn unknown_meal_code_fails() {
        let err = parse_glucose_measurement_context(&[0x02, 0x01, 0x00, 0x06]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnrecognizedCode {
                field: "meal",
                code: 6
            }
        ));
    }

    #[test]
    fn unknown_carbohydrate_code_fails() {
        let payload = [0x01, 0x01, 0x00, 0x09, 0x05, 0xe0];
        let err = parse_glucose_measurement_context(&payload).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnrecognizedCode {
                field: "carbohydrate",
                ..
            }
        ));
    }

    #[test]
    fn flagged_section_must_be_present() {
        let err = parse_glucose_measurement_context(&[0x40, 0x01, 0x00, 0x3a]).unwrap_err();
        assert_eq!(err, DecodeError::TruncatedPayload { needed: 5, actual: 4 });
    }
}
