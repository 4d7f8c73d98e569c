//! Per-device button map store.
//!
//! [`ButtonMapStore`] owns one device's current [`ButtonMap`], a backup copy
//! for revert, and a freshness timestamp. Reads go through a time-bounded
//! cache (default 2 s) in front of the backing [`MapStorage`]; writes are
//! deferred until an explicit [`save`](ButtonMapStore::save).
//!
//! # Semantics
//! - Merging ([`map_features`](ButtonMapStore::map_features)) replaces
//!   same-named features wholesale, then sanitizes and re-sorts the profile.
//! - The first mutation after a load or save snapshots the whole map, so
//!   [`revert`](ButtonMapStore::revert) can restore the pre-edit state.
//! - A failed load or save leaves the in-memory map untouched.

use crate::device::DeviceRecord;
use crate::feature::{ButtonMap, ControllerId, FeatureVector};
use crate::primitive::Primitive;
use crate::storage::{MapStorage, StorageError};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How long a loaded button map stays fresh.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_millis(2000);

/// Failure reported by a store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("no modification to revert")]
    NothingToRevert,

    #[error("profile \"{0}\" has no features to reset")]
    EmptyProfile(ControllerId),
}

/// Stores and maintains the button map for a single device.
pub struct ButtonMapStore<S> {
    storage: S,
    device: DeviceRecord,
    button_map: ButtonMap,
    /// Snapshot taken on the first mutation since the last load/save.
    original: ButtonMap,
    refreshed_at: Option<Instant>,
    modified: bool,
    ttl: Duration,
}

impl<S: MapStorage> ButtonMapStore<S> {
    pub fn new(storage: S, device: DeviceRecord) -> Self {
        Self::with_ttl(storage, device, DEFAULT_CACHE_TTL)
    }

    /// Store with a caller-chosen cache TTL.
    pub fn with_ttl(storage: S, device: DeviceRecord, ttl: Duration) -> Self {
        Self {
            storage,
            device,
            button_map: ButtonMap::new(),
            original: ButtonMap::new(),
            refreshed_at: None,
            modified: false,
            ttl,
        }
    }

    #[inline]
    pub fn device(&self) -> &DeviceRecord {
        &self.device
    }

    #[inline]
    pub fn device_mut(&mut self) -> &mut DeviceRecord {
        &mut self.device
    }

    /// Current button map, refreshed from the backing resource when the
    /// cache is stale and there is no pending local modification.
    ///
    /// A failed refresh is logged and the last-known-good map returned.
    pub fn button_map(&mut self) -> &ButtonMap {
        if !self.modified {
            if let Err(err) = self.refresh() {
                tracing::error!("button map refresh failed: {err}");
            }
        }
        &self.button_map
    }

    /// Reload from the backing resource if the cache TTL has elapsed.
    ///
    /// A fresh cache makes this a no-op success. On reload, every profile is
    /// sanitized and the revert backup is discarded; on failure the in-memory
    /// map is left untouched.
    pub fn refresh(&mut self) -> Result<(), StoreError> {
        let stale = match self.refreshed_at {
            Some(at) => at.elapsed() >= self.ttl,
            None => true,
        };
        if !stale {
            return Ok(());
        }

        let loaded = self.storage.load()?;
        self.button_map = loaded;
        for (controller_id, features) in self.button_map.iter_mut() {
            sanitize(controller_id, features);
        }
        self.refreshed_at = Some(Instant::now());
        self.original.clear();
        Ok(())
    }

    /// Merge newly mapped features into `controller_id`'s feature-set.
    ///
    /// Feature name is the merge key: a new definition fully replaces an old
    /// one of the same name. Semi-axis primitives trigger an axis
    /// notification to the device configuration. The profile is sanitized and
    /// re-sorted by name afterwards; persistence waits for
    /// [`save`](ButtonMapStore::save).
    pub fn map_features(&mut self, controller_id: &str, features: FeatureVector) {
        if self.original.is_empty() {
            self.original = self.button_map.clone();
        }

        // Axis configuration updates for every distinct semi-axis touched
        let mut touched_axes = BTreeSet::new();
        for feature in &features {
            for primitive in feature.primitives() {
                if let Some(axis) = primitive.semi_axis_index() {
                    touched_axes.insert(axis);
                }
            }
        }
        for axis in touched_axes {
            self.device.config.refresh_axis(axis);
        }

        let profile = self.button_map.entry(controller_id.to_string()).or_default();

        profile.retain(|existing| {
            if features.iter().any(|f| f.name() == existing.name()) {
                tracing::debug!(
                    "{controller_id}: overwriting feature \"{}\"",
                    existing.name()
                );
                false
            } else {
                true
            }
        });

        profile.extend(features);
        sanitize(controller_id, profile);
        profile.sort_by(|lhs, rhs| lhs.name().cmp(rhs.name()));

        self.modified = true;
    }

    /// Persist the current map.
    ///
    /// A successful save counts as a fresh load: the backup is discarded and
    /// the cache timestamp reset. A failed save changes nothing.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.storage.save(&self.button_map)?;
        self.refreshed_at = Some(Instant::now());
        self.original.clear();
        self.modified = false;
        Ok(())
    }

    /// Restore the map to its state before the current run of modifications.
    pub fn revert(&mut self) -> Result<(), StoreError> {
        if self.original.is_empty() {
            return Err(StoreError::NothingToRevert);
        }
        self.button_map = self.original.clone();
        Ok(())
    }

    /// Clear all features for one profile and save immediately.
    pub fn reset(&mut self, controller_id: &str) -> Result<(), StoreError> {
        let features = self.button_map.entry(controller_id.to_string()).or_default();
        if features.is_empty() {
            return Err(StoreError::EmptyProfile(controller_id.to_string()));
        }
        features.clear();
        self.save()
    }
}

/// Resolve primitive conflicts within one profile's feature-set.
///
/// First claim wins: for each primitive, any exact match in an earlier
/// feature — or an earlier slot of the same feature — invalidates the later
/// occurrence by overwriting it with [`Primitive::Unknown`]. Features left
/// with no valid primitive are removed.
///
/// Idempotent, and guarantees afterwards that no primitive is claimed twice
/// and no surviving feature is empty.
pub fn sanitize(controller_id: &str, features: &mut FeatureVector) {
    for i_feature in 0..features.len() {
        let slot_count = features[i_feature].primitives().len();
        for i_slot in 0..slot_count {
            let primitive = features[i_feature].primitives()[i_slot].clone();
            if !primitive.is_valid() {
                continue;
            }

            // Earlier feature already claiming this primitive, if any
            let mut owner = None;
            for i_existing in 0..i_feature {
                if features[i_existing].primitives().contains(&primitive) {
                    owner = Some(i_existing);
                    break;
                }
            }

            let conflict = owner.is_some()
                || features[i_feature].primitives()[..i_slot].contains(&primitive);

            if conflict {
                let feature_name = features[i_feature].name().to_string();
                let owner_name = owner
                    .map(|i| features[i].name().to_string())
                    .unwrap_or_else(|| feature_name.clone());
                tracing::error!(
                    "{controller_id}: {primitive} on \"{feature_name}\" conflicts with \"{owner_name}\""
                );
                features[i_feature].primitives_mut()[i_slot] = Primitive::Unknown;
            }
        }
    }

    features.retain(|feature| {
        if feature.has_valid_primitive() {
            true
        } else {
            tracing::debug!(
                "{controller_id}: removing \"{}\" from button map",
                feature.name()
            );
            false
        }
    });
}
