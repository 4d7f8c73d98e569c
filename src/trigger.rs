//! Anomalous trigger detection and filtering.
//!
//! Some gamepad triggers report a resting value of −1 (or +1) instead of 0
//! and travel over the full [−1, 1] interval instead of half of it. Other
//! axes are really discrete D-pads that only ever report −1, 0, or +1.
//! [`AnomalousTrigger`] watches the raw values of a single axis, classifies
//! it, and — when filtering is enabled — re-centers an anomalous trigger to
//! zero and normalizes its travel to a unit interval.
//!
//! The detected center and range feed the device's
//! [`AxisConfig`](crate::device::AxisConfig) bookkeeping.

use crate::device::AxisConfig;

const ANOMALOUS_MAGNITUDE: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TriggerState {
    Unknown,
    NotDiscreteDpad,
    CenterKnown,
    RangeKnown,
    DiscreteDpad,
}

/// Resting position of an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisCenter {
    NegativeOne,
    Zero,
    PositiveOne,
}

impl AxisCenter {
    /// Offset to subtract when re-centering to zero.
    pub fn offset(&self) -> f32 {
        match self {
            AxisCenter::NegativeOne => -1.0,
            AxisCenter::Zero => 0.0,
            AxisCenter::PositiveOne => 1.0,
        }
    }
}

/// Travel interval of a trigger axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerRange {
    /// Travels over an interval of length 1.
    Half,
    /// Travels over an interval of length 2.
    Full,
}

impl TriggerRange {
    pub fn multiplier(&self) -> u32 {
        match self {
            TriggerRange::Half => 1,
            TriggerRange::Full => 2,
        }
    }
}

/// Per-axis state machine classifying and filtering one driver axis.
pub struct AnomalousTrigger {
    axis_index: u32,
    state: TriggerState,
    center: AxisCenter,
    range: TriggerRange,
    center_seen: bool,
    positive_one_seen: bool,
    negative_one_seen: bool,
    fix_triggers: bool,
}

impl AnomalousTrigger {
    /// Filter for one axis. `fix_triggers` enables value rewriting;
    /// detection runs either way.
    pub fn new(axis_index: u32, fix_triggers: bool) -> Self {
        Self {
            axis_index,
            state: TriggerState::Unknown,
            center: AxisCenter::Zero,
            range: TriggerRange::Half,
            center_seen: false,
            positive_one_seen: false,
            negative_one_seen: false,
            fix_triggers,
        }
    }

    #[inline]
    pub fn axis_index(&self) -> u32 {
        self.axis_index
    }

    /// True once the axis has been seen resting away from zero.
    pub fn is_anomalous(&self) -> bool {
        self.center != AxisCenter::Zero
    }

    /// Detected calibration, suitable for
    /// [`DeviceConfig::set_axis`](crate::device::DeviceConfig::set_axis).
    pub fn axis_config(&self) -> AxisConfig {
        AxisConfig {
            center: self.center.offset() as i32,
            range: self.range.multiplier(),
        }
    }

    /// Feed one raw axis value; returns the (possibly rewritten) value.
    pub fn filter(&mut self, value: f32) -> f32 {
        let mut value = value;

        // A discrete D-pad only ever reports -1, 0 and 1. Withhold judgment
        // until a fractional value rules that out.
        if self.state == TriggerState::Unknown {
            if value == -1.0 || value == 0.0 || value == 1.0 {
                if value == 0.0 {
                    self.center_seen = true;
                } else if value == 1.0 {
                    self.positive_one_seen = true;
                } else {
                    self.negative_one_seen = true;
                }

                if self.center_seen && self.positive_one_seen && self.negative_one_seen {
                    self.state = TriggerState::DiscreteDpad;
                    tracing::debug!("discrete D-pad detected on axis {}", self.axis_index);
                }
            } else {
                self.state = TriggerState::NotDiscreteDpad;
            }
        }

        if self.state == TriggerState::NotDiscreteDpad {
            self.center = if value < -ANOMALOUS_MAGNITUDE {
                AxisCenter::NegativeOne
            } else if value > ANOMALOUS_MAGNITUDE {
                AxisCenter::PositiveOne
            } else {
                AxisCenter::Zero
            };

            if self.is_anomalous() {
                tracing::debug!(
                    "anomalous trigger detected on axis {} (initial value = {value})",
                    self.axis_index
                );
            }

            self.state = TriggerState::CenterKnown;
        }

        if self.is_anomalous() {
            // Widen to full range once the value crosses into the opposite
            // semi-axis
            if self.state == TriggerState::CenterKnown {
                let crossed = match self.center {
                    AxisCenter::NegativeOne => value > 0.0,
                    AxisCenter::PositiveOne => value < 0.0,
                    AxisCenter::Zero => false,
                };
                if crossed {
                    self.range = TriggerRange::Full;
                    self.state = TriggerState::RangeKnown;
                }
            }

            if self.fix_triggers {
                value -= self.center.offset();
                if self.range == TriggerRange::Full {
                    value /= 2.0;
                }
            }
        }

        value
    }
}
