//! Device identity and per-axis configuration.
//!
//! The store and the transformer only need a narrow view of a device: a
//! stable identity for equality checks, and the axis bookkeeping that mapped
//! semi-axis primitives feed into.
//!
//! ## Persistence notes
//! - `vid`/`pid` are generally stable and useful for re-identification.
//! - Observed-device matching ([`create_device`](crate::transformer::ControllerTransformer::create_device))
//!   uses full structural equality of [`DeviceIdentity`], not a subset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static identity of a physical device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// User-facing product name reported by the driver.
    pub name: String,
    /// Backend that enumerated the device (e.g. `"hid"`, `"xinput"`).
    pub provider: String,
    /// USB Vendor ID.
    pub vid: u16,
    /// USB Product ID.
    pub pid: u16,
}

impl DeviceIdentity {
    pub fn new(name: impl Into<String>, provider: impl Into<String>, vid: u16, pid: u16) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            vid,
            pid,
        }
    }
}

/// Learned calibration for one driver axis.
///
/// `center` is the resting offset (−1, 0, or +1) and `range` the interval
/// multiplier (1 = half range, 2 = full range), as detected by
/// [`AnomalousTrigger`](crate::trigger::AnomalousTrigger).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub center: i32,
    pub range: u32,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self { center: 0, range: 1 }
    }
}

/// Per-device axis bookkeeping.
///
/// Keyed by driver axis index. The store notifies this collaborator through
/// [`DeviceConfig::refresh_axis`] whenever a newly mapped feature touches a
/// semi-axis, keeping axis calibration concerns out of the merge algorithm.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    axes: BTreeMap<u32, AxisConfig>,
}

impl DeviceConfig {
    /// Configuration for one axis, if any has been recorded.
    pub fn axis(&self, index: u32) -> Option<&AxisConfig> {
        self.axes.get(&index)
    }

    /// Record or overwrite the configuration for one axis.
    pub fn set_axis(&mut self, index: u32, config: AxisConfig) {
        self.axes.insert(index, config);
    }

    /// Notification that a mapped feature touched `index`.
    ///
    /// Ensures the axis has an entry so later calibration has somewhere to
    /// land; an axis already configured keeps its values.
    pub fn refresh_axis(&mut self, index: u32) {
        self.axes.entry(index).or_default();
        tracing::debug!("axis {index} configuration refreshed");
    }

    /// Iterate `(axis index, config)` pairs in ascending index order.
    pub fn axes(&self) -> impl Iterator<Item = (&u32, &AxisConfig)> {
        self.axes.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }
}

/// A device together with its learned configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub identity: DeviceIdentity,
    pub config: DeviceConfig,
}

impl DeviceRecord {
    pub fn new(identity: DeviceIdentity) -> Self {
        Self {
            identity,
            config: DeviceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_axis_inserts_default_once() {
        let mut config = DeviceConfig::default();
        config.refresh_axis(2);
        assert_eq!(config.axis(2), Some(&AxisConfig::default()));

        config.set_axis(2, AxisConfig { center: -1, range: 2 });
        config.refresh_axis(2);
        assert_eq!(config.axis(2), Some(&AxisConfig { center: -1, range: 2 }));
    }

    #[test]
    fn identity_equality_is_structural() {
        let a = DeviceIdentity::new("Pad", "hid", 0x054c, 0x05c4);
        let mut b = a.clone();
        assert_eq!(a, b);
        b.pid = 0x09cc;
        assert_ne!(a, b);
    }
}
