use serde::Serialize;

use crate::protocols::speed_cadence::layout::EVENT_TIME_RESOLUTION;
use crate::protocols::speed_cadence::{CrankRevolutions, CscMeasurement, WheelRevolutions};

/// Speed, distance and cadence derived from consecutive CSC samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CscMetrics {
    /// Metres per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_mps: Option<f64>,
    /// Metres since the first wheel sample.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    /// Crank revolutions per minute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence_rpm: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CscTracker {
    wheel_circumference_m: f64,
    last_wheel: Option<WheelRevolutions>,
    last_crank: Option<CrankRevolutions>,
    wheel_revolutions: u64,
    metrics: CscMetrics,
}

impl CscTracker {
    pub fn new(wheel_circumference_mm: u32) -> Self {
        Self {
            wheel_circumference_m: f64::from(wheel_circumference_mm) / 1000.0,
            last_wheel: None,
            last_crank: None,
            wheel_revolutions: 0,
            metrics: CscMetrics::default(),
        }
    }

    pub fn metrics(&self) -> CscMetrics {
        self.metrics
    }

    pub fn update(&mut self, measurement: &CscMeasurement) {
        if let Some(wheel) = measurement.wheel {
            if let Some(previous) = self.last_wheel {
                // counters and event times wrap; deltas are taken modulo
                let revolutions = wheel.cumulative.wrapping_sub(previous.cumulative);
                let ticks = wheel.last_event_time.wrapping_sub(previous.last_event_time);
                self.wheel_revolutions += u64::from(revolutions);
                self.metrics.distance_m =
                    Some(self.wheel_revolutions as f64 * self.wheel_circumference_m);
                if ticks > 0 {
                    let seconds = f64::from(ticks) / EVENT_TIME_RESOLUTION;
                    self.metrics.speed_mps =
                        Some(f64::from(revolutions) * self.wheel_circumference_m / seconds);
                }
            }
            self.last_wheel = Some(wheel);
        }
        if let Some(crank) = measurement.crank {
            if let Some(previous) = self.last_crank {
                let revolutions = crank.cumulative.wrapping_sub(previous.cumulative);
                let ticks = crank.last_event_time.wrapping_sub(previous.last_event_time);
                if ticks > 0 {
                    let minutes = f64::from(ticks) / EVENT_TIME_RESOLUTION / 60.0;
                    self.metrics.cadence_rpm = Some(f64::from(revolutions) / minutes);
                }
            }
            self.last_crank = Some(crank);
        }
    }

    pub fn reset(&mut self) {
        *self = Self {
            wheel_circumference_m: self.wheel_circumference_m,
            last_wheel: None,
            last_crank: None,
            wheel_revolutions: 0,
            metrics: CscMetrics::default(),
        };
    }
}
