//! Learned translation between controller profiles.
//!
//! Devices are frequently mapped for several controller profiles at once.
//! [`ControllerTransformer`] watches those button maps as devices are
//! discovered and, for every pair of profiles a device covers, records which
//! feature of one profile sits on the same physical primitives as which
//! feature of the other. The learned model is a plain frequency table: each
//! distinct [`TranslationSet`] ever observed for a profile pair keeps a count
//! of how many devices produced it.
//!
//! [`transform`](ControllerTransformer::transform) then projects a feature
//! list authored for one profile onto another profile by applying the
//! most-frequently-observed translation set. It is a best-effort projection:
//! features without a learned counterpart are simply omitted.
//!
//! The transformer is plain owned state. Construct one per process and pass
//! it by reference wherever observations or transformations are needed.

use crate::device::{DeviceIdentity, DeviceRecord};
use crate::feature::{primitives_equal, ButtonMap, FeatureVector};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Ceiling on how many devices are ever learned from.
///
/// A sanity bound, not an eviction policy: once reached, new devices are
/// silently ignored.
pub const DEFAULT_OBSERVED_DEVICE_CAP: usize = 200;

/// One learned feature correspondence between two controller profiles.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Translation {
    pub from_feature: String,
    pub to_feature: String,
}

/// One complete observed correspondence between two profiles for one device.
pub type TranslationSet = BTreeSet<Translation>;

/// Observation counts per distinct translation set.
pub type TranslationCounts = BTreeMap<TranslationSet, u32>;

/// Canonical, ordered pair of controller profile ids.
///
/// The constructor orders its two fields, so `(a, b)` and `(b, a)` always
/// produce the same key and observations collapse into one bucket.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ControllerPair {
    low: String,
    high: String,
}

impl ControllerPair {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self {
                low: a.to_string(),
                high: b.to_string(),
            }
        } else {
            Self {
                low: b.to_string(),
                high: a.to_string(),
            }
        }
    }

    #[inline]
    pub fn low(&self) -> &str {
        &self.low
    }

    #[inline]
    pub fn high(&self) -> &str {
        &self.high
    }
}

/// Process-wide learner of controller-to-controller feature translations.
pub struct ControllerTransformer {
    observed: Vec<DeviceRecord>,
    table: BTreeMap<ControllerPair, TranslationCounts>,
    device_cap: usize,
}

impl Default for ControllerTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerTransformer {
    pub fn new() -> Self {
        Self::with_cap(DEFAULT_OBSERVED_DEVICE_CAP)
    }

    /// Transformer with a caller-chosen observed-device ceiling.
    pub fn with_cap(device_cap: usize) -> Self {
        Self {
            observed: Vec::new(),
            table: BTreeMap::new(),
            device_cap,
        }
    }

    /// Number of devices learned from so far.
    #[inline]
    pub fn observed_devices(&self) -> usize {
        self.observed.len()
    }

    /// Observation counts for one profile pair, in either order.
    pub fn translation_counts(&self, a: &str, b: &str) -> Option<&TranslationCounts> {
        self.table.get(&ControllerPair::new(a, b))
    }

    /// Learn from a newly discovered device and its button map.
    ///
    /// Returns `false` without learning anything when the observed-device
    /// ceiling is reached or this device identity was already seen.
    pub fn observe(&mut self, device: &DeviceRecord, button_map: &ButtonMap) -> bool {
        if self.observed.len() >= self.device_cap {
            tracing::debug!(
                "ignoring \"{}\": observed-device ceiling ({}) reached",
                device.identity.name,
                self.device_cap
            );
            return false;
        }

        if self
            .observed
            .iter()
            .any(|seen| seen.identity == device.identity)
        {
            return false;
        }

        self.observed.push(device.clone());

        for (from_id, from_features) in button_map {
            for (to_id, to_features) in button_map {
                // Canonical direction only: "from" strictly before "to"
                if from_id >= to_id {
                    continue;
                }
                self.add_controller_map(from_id, from_features, to_id, to_features);
            }
        }

        true
    }

    /// Build a device record for `identity`, reusing configuration learned
    /// from an identity-equal observed device when one exists.
    pub fn create_device(&self, identity: &DeviceIdentity) -> DeviceRecord {
        let mut record = DeviceRecord::new(identity.clone());
        for device in &self.observed {
            if device.identity == *identity {
                record.config = device.config.clone();
            }
        }
        record
    }

    fn add_controller_map(
        &mut self,
        from_id: &str,
        from_features: &FeatureVector,
        to_id: &str,
        to_features: &FeatureVector,
    ) -> bool {
        debug_assert!(from_id < to_id);

        let mut translations = TranslationSet::new();

        for from_feature in from_features {
            let matched = to_features
                .iter()
                .find(|to_feature| primitives_equal(from_feature, to_feature));

            if let Some(to_feature) = matched {
                translations.insert(Translation {
                    from_feature: from_feature.name().to_string(),
                    to_feature: to_feature.name().to_string(),
                });
            }
        }

        if translations.is_empty() {
            return false;
        }

        let counts = self
            .table
            .entry(ControllerPair::new(from_id, to_id))
            .or_default();
        *counts.entry(translations).or_insert(0) += 1;
        true
    }

    /// Project `features` authored for `from_controller` onto
    /// `to_controller` using the most-frequently-observed translation set.
    ///
    /// An unknown profile pair yields an empty result; entries whose source
    /// feature is absent from the input are omitted. Ties between equally
    /// frequent translation sets go to the lexicographically smallest set.
    /// Read-only: the learned table is never modified here.
    pub fn transform(
        &self,
        from_controller: &str,
        to_controller: &str,
        features: &FeatureVector,
    ) -> FeatureVector {
        let swap = from_controller >= to_controller;
        let key = ControllerPair::new(from_controller, to_controller);

        let mut transformed = FeatureVector::new();

        let Some(counts) = self.table.get(&key) else {
            return transformed;
        };

        let mut best: Option<(&TranslationSet, u32)> = None;
        for (set, &count) in counts {
            tracing::debug!(
                "{count} observation(s) from {from_controller} to {to_controller} with {} translation(s)",
                set.len()
            );
            match best {
                Some((_, max)) if count <= max => {}
                _ => best = Some((set, count)),
            }
        }

        let Some((best_set, _)) = best else {
            return transformed;
        };

        for translation in best_set {
            let (from_name, to_name) = if swap {
                (&translation.to_feature, &translation.from_feature)
            } else {
                (&translation.from_feature, &translation.to_feature)
            };

            if let Some(feature) = features.iter().find(|f| f.name() == from_name.as_str()) {
                let mut out = feature.clone();
                out.set_name(to_name.clone());
                transformed.push(out);
            }
        }

        transformed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceRecord;
    use crate::feature::Feature;
    use crate::primitive::Primitive;

    const PROFILE_A: &str = "game.controller.a";
    const PROFILE_B: &str = "game.controller.b";

    fn button(index: u32) -> Primitive {
        Primitive::Button { index }
    }

    fn device(serial: u16) -> DeviceRecord {
        DeviceRecord::new(DeviceIdentity::new("Pad", "hid", 0x054c, serial))
    }

    /// Map covering both profiles, where A's "fire" shares button 5 with B's
    /// feature named `b_name`.
    fn dual_profile_map(b_name: &str) -> ButtonMap {
        let mut map = ButtonMap::new();
        map.insert(
            PROFILE_A.into(),
            vec![
                Feature::scalar("fire", button(5)),
                Feature::scalar("jump", button(6)),
            ],
        );
        map.insert(PROFILE_B.into(), vec![Feature::scalar(b_name, button(5))]);
        map
    }

    #[test]
    fn observe_records_matching_features() {
        let mut transformer = ControllerTransformer::new();
        assert!(transformer.observe(&device(1), &dual_profile_map("trigger")));

        let counts = transformer
            .translation_counts(PROFILE_A, PROFILE_B)
            .expect("bucket");
        assert_eq!(counts.len(), 1);
        let (set, count) = counts.iter().next().unwrap();
        assert_eq!(*count, 1);
        assert_eq!(set.len(), 1);
        let entry = set.iter().next().unwrap();
        assert_eq!(entry.from_feature, "fire");
        assert_eq!(entry.to_feature, "trigger");
    }

    #[test]
    fn observe_is_idempotent_per_device() {
        let mut transformer = ControllerTransformer::new();
        let map = dual_profile_map("trigger");
        assert!(transformer.observe(&device(1), &map));
        assert!(!transformer.observe(&device(1), &map));
        assert_eq!(transformer.observed_devices(), 1);

        let counts = transformer
            .translation_counts(PROFILE_A, PROFILE_B)
            .expect("bucket");
        assert_eq!(counts.values().sum::<u32>(), 1);
    }

    #[test]
    fn observe_stops_at_device_ceiling() {
        let mut transformer = ControllerTransformer::with_cap(2);
        assert!(transformer.observe(&device(1), &dual_profile_map("trigger")));
        assert!(transformer.observe(&device(2), &dual_profile_map("trigger")));
        assert!(!transformer.observe(&device(3), &dual_profile_map("trigger")));

        assert_eq!(transformer.observed_devices(), 2);
        let counts = transformer
            .translation_counts(PROFILE_A, PROFILE_B)
            .expect("bucket");
        assert_eq!(counts.values().sum::<u32>(), 2);
    }

    #[test]
    fn empty_correspondence_is_not_recorded() {
        let mut map = ButtonMap::new();
        map.insert(PROFILE_A.into(), vec![Feature::scalar("fire", button(5))]);
        map.insert(PROFILE_B.into(), vec![Feature::scalar("other", button(9))]);

        let mut transformer = ControllerTransformer::new();
        assert!(transformer.observe(&device(1), &map));
        assert!(transformer
            .translation_counts(PROFILE_A, PROFILE_B)
            .is_none());
    }

    #[test]
    fn transform_is_symmetric_across_direction_swap() {
        let mut transformer = ControllerTransformer::new();
        transformer.observe(&device(1), &dual_profile_map("trigger"));

        let forward = transformer.transform(
            PROFILE_A,
            PROFILE_B,
            &vec![Feature::scalar("fire", button(5))],
        );
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].name(), "trigger");

        let backward = transformer.transform(
            PROFILE_B,
            PROFILE_A,
            &vec![Feature::scalar("trigger", button(5))],
        );
        assert_eq!(backward.len(), 1);
        assert_eq!(backward[0].name(), "fire");
    }

    #[test]
    fn transform_applies_most_frequent_translation_set() {
        let mut transformer = ControllerTransformer::new();
        let mut serial = 0;

        for _ in 0..3 {
            serial += 1;
            transformer.observe(&device(serial), &dual_profile_map("trigger"));
        }
        for _ in 0..5 {
            serial += 1;
            transformer.observe(&device(serial), &dual_profile_map("shoot"));
        }

        let out = transformer.transform(
            PROFILE_A,
            PROFILE_B,
            &vec![Feature::scalar("fire", button(5))],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name(), "shoot");
    }

    #[test]
    fn transform_without_learned_pair_is_empty() {
        let transformer = ControllerTransformer::new();
        let out = transformer.transform(
            PROFILE_A,
            PROFILE_B,
            &vec![Feature::scalar("fire", button(5))],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn transform_omits_features_missing_from_input() {
        let mut transformer = ControllerTransformer::new();
        transformer.observe(&device(1), &dual_profile_map("trigger"));

        // Input lacks "fire", so nothing can be projected
        let out = transformer.transform(
            PROFILE_A,
            PROFILE_B,
            &vec![Feature::scalar("jump", button(6))],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn transform_preserves_input_primitives() {
        let mut transformer = ControllerTransformer::new();
        transformer.observe(&device(1), &dual_profile_map("trigger"));

        let input = vec![Feature::scalar("fire", button(42))];
        let out = transformer.transform(PROFILE_A, PROFILE_B, &input);
        assert_eq!(out[0].primitives(), input[0].primitives());
    }

    #[test]
    fn create_device_copies_known_configuration() {
        use crate::device::AxisConfig;

        let mut seen = device(1);
        seen.config.set_axis(2, AxisConfig { center: -1, range: 2 });

        let mut transformer = ControllerTransformer::new();
        transformer.observe(&seen, &dual_profile_map("trigger"));

        let rebuilt = transformer.create_device(&seen.identity);
        assert_eq!(rebuilt.config.axis(2), Some(&AxisConfig { center: -1, range: 2 }));

        let unseen = transformer.create_device(&device(99).identity);
        assert!(unseen.config.is_empty());
    }

    #[test]
    fn controller_pair_is_order_insensitive() {
        assert_eq!(
            ControllerPair::new(PROFILE_B, PROFILE_A),
            ControllerPair::new(PROFILE_A, PROFILE_B)
        );
        assert_eq!(ControllerPair::new(PROFILE_B, PROFILE_A).low(), PROFILE_A);
    }
}
