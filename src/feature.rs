//! Features, feature-sets, and button maps.
//!
//! A [`Feature`] is one logical capability of a controller profile (a button,
//! a stick, a rumble motor, …) bound to one or more physical
//! [`Primitive`](crate::primitive::Primitive)s. The number and meaning of the
//! primitive slots is fixed by the [`FeatureKind`]:
//!
//! | kind                  | slots | meaning                        |
//! |-----------------------|-------|--------------------------------|
//! | `Scalar`/`Motor`/`Key`| 1     | the single primitive           |
//! | `AnalogStick`         | 4     | up, down, right, left          |
//! | `Accelerometer`       | 3     | positive X, Y, Z               |
//!
//! A [`ButtonMap`] is the full controller-profile → feature-set mapping for
//! one device. Within each profile the feature-set is kept sorted by name;
//! [`crate::store::ButtonMapStore`] restores that invariant after every
//! mutation.

use crate::primitive::Primitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a controller profile (e.g. `"game.controller.default"`).
pub type ControllerId = String;

/// One controller profile's ordered feature list.
pub type FeatureVector = Vec<Feature>;

/// All feature bindings for one device, keyed by controller profile.
///
/// An ordered map so profile pairs iterate in a canonical order.
pub type ButtonMap = BTreeMap<ControllerId, FeatureVector>;

/// Primitive slot indices, per feature kind.
pub mod slot {
    /// The single slot of a scalar, motor, or key feature.
    pub const SCALAR: usize = 0;

    pub const STICK_UP: usize = 0;
    pub const STICK_DOWN: usize = 1;
    pub const STICK_RIGHT: usize = 2;
    pub const STICK_LEFT: usize = 3;

    pub const ACCEL_X: usize = 0;
    pub const ACCEL_Y: usize = 1;
    pub const ACCEL_Z: usize = 2;
}

/// Category of a feature, fixing its primitive slot layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// A digital or analog button.
    Scalar,
    /// A rumble motor.
    Motor,
    /// A two-dimensional stick with four directional bindings.
    AnalogStick,
    /// A three-axis accelerometer.
    Accelerometer,
    /// A keyboard key relay.
    Key,
}

impl FeatureKind {
    /// Number of primitive slots a feature of this kind carries.
    pub fn slot_count(&self) -> usize {
        match self {
            FeatureKind::Scalar | FeatureKind::Motor | FeatureKind::Key => 1,
            FeatureKind::AnalogStick => 4,
            FeatureKind::Accelerometer => 3,
        }
    }
}

/// One logical input/output capability bound to physical primitives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    name: String,
    kind: FeatureKind,
    primitives: Vec<Primitive>,
}

impl Feature {
    /// New feature with every slot set to [`Primitive::Unknown`].
    pub fn new(name: impl Into<String>, kind: FeatureKind) -> Self {
        Self {
            name: name.into(),
            kind,
            primitives: vec![Primitive::Unknown; kind.slot_count()],
        }
    }

    /// Scalar feature bound to a single primitive.
    pub fn scalar(name: impl Into<String>, primitive: Primitive) -> Self {
        let mut feature = Self::new(name, FeatureKind::Scalar);
        feature.primitives[slot::SCALAR] = primitive;
        feature
    }

    /// Motor feature bound to a single primitive.
    pub fn motor(name: impl Into<String>, primitive: Primitive) -> Self {
        let mut feature = Self::new(name, FeatureKind::Motor);
        feature.primitives[slot::SCALAR] = primitive;
        feature
    }

    /// Analog stick with its four directional bindings.
    pub fn analog_stick(
        name: impl Into<String>,
        up: Primitive,
        down: Primitive,
        right: Primitive,
        left: Primitive,
    ) -> Self {
        let mut feature = Self::new(name, FeatureKind::AnalogStick);
        feature.primitives[slot::STICK_UP] = up;
        feature.primitives[slot::STICK_DOWN] = down;
        feature.primitives[slot::STICK_RIGHT] = right;
        feature.primitives[slot::STICK_LEFT] = left;
        feature
    }

    /// Accelerometer with its three positive-axis bindings.
    pub fn accelerometer(
        name: impl Into<String>,
        x: Primitive,
        y: Primitive,
        z: Primitive,
    ) -> Self {
        let mut feature = Self::new(name, FeatureKind::Accelerometer);
        feature.primitives[slot::ACCEL_X] = x;
        feature.primitives[slot::ACCEL_Y] = y;
        feature.primitives[slot::ACCEL_Z] = z;
        feature
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    /// Primitive in `slot`, or [`Primitive::Unknown`] when out of range.
    pub fn primitive(&self, slot: usize) -> &Primitive {
        self.primitives.get(slot).unwrap_or(&Primitive::Unknown)
    }

    /// Rebind one slot. Out-of-range slots are ignored.
    pub fn set_primitive(&mut self, slot: usize, primitive: Primitive) {
        if let Some(entry) = self.primitives.get_mut(slot) {
            *entry = primitive;
        }
    }

    #[inline]
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    #[inline]
    pub fn primitives_mut(&mut self) -> &mut [Primitive] {
        &mut self.primitives
    }

    /// True if at least one slot holds a valid primitive.
    pub fn has_valid_primitive(&self) -> bool {
        self.primitives.iter().any(Primitive::is_valid)
    }
}

/// Check whether two features are bound to the same physical input.
///
/// The features must share a [`FeatureKind`]; the kind then fixes which slots
/// are compared. Kinds without a defined comparison never match.
pub fn primitives_equal(lhs: &Feature, rhs: &Feature) -> bool {
    if lhs.kind() != rhs.kind() {
        return false;
    }

    match lhs.kind() {
        FeatureKind::Scalar | FeatureKind::Motor => {
            lhs.primitive(slot::SCALAR) == rhs.primitive(slot::SCALAR)
        }
        FeatureKind::AnalogStick => {
            lhs.primitive(slot::STICK_UP) == rhs.primitive(slot::STICK_UP)
                && lhs.primitive(slot::STICK_DOWN) == rhs.primitive(slot::STICK_DOWN)
                && lhs.primitive(slot::STICK_RIGHT) == rhs.primitive(slot::STICK_RIGHT)
                && lhs.primitive(slot::STICK_LEFT) == rhs.primitive(slot::STICK_LEFT)
        }
        FeatureKind::Accelerometer => {
            lhs.primitive(slot::ACCEL_X) == rhs.primitive(slot::ACCEL_X)
                && lhs.primitive(slot::ACCEL_Y) == rhs.primitive(slot::ACCEL_Y)
                && lhs.primitive(slot::ACCEL_Z) == rhs.primitive(slot::ACCEL_Z)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::SemiAxisDirection;

    fn button(index: u32) -> Primitive {
        Primitive::Button { index }
    }

    fn axis(index: u32, direction: SemiAxisDirection) -> Primitive {
        Primitive::SemiAxis { index, direction }
    }

    #[test]
    fn scalar_features_match_on_single_primitive() {
        let a = Feature::scalar("a", button(2));
        let b = Feature::scalar("b", button(2));
        let c = Feature::scalar("c", button(3));
        assert!(primitives_equal(&a, &b));
        assert!(!primitives_equal(&a, &c));
    }

    #[test]
    fn kind_mismatch_never_matches() {
        let scalar = Feature::scalar("x", button(2));
        let motor = Feature::motor("x", button(2));
        assert!(!primitives_equal(&scalar, &motor));
    }

    #[test]
    fn stick_requires_all_four_directions() {
        use SemiAxisDirection::{Negative, Positive};
        let lhs = Feature::analog_stick(
            "leftstick",
            axis(1, Negative),
            axis(1, Positive),
            axis(0, Positive),
            axis(0, Negative),
        );
        let mut rhs = lhs.clone();
        rhs.set_name("rightstick");
        assert!(primitives_equal(&lhs, &rhs));

        rhs.set_primitive(slot::STICK_LEFT, axis(2, Negative));
        assert!(!primitives_equal(&lhs, &rhs));
    }

    #[test]
    fn accelerometer_compares_positive_axes() {
        use SemiAxisDirection::Positive;
        let lhs = Feature::accelerometer(
            "accel",
            axis(3, Positive),
            axis(4, Positive),
            axis(5, Positive),
        );
        let rhs = Feature::accelerometer(
            "tilt",
            axis(3, Positive),
            axis(4, Positive),
            axis(5, Positive),
        );
        assert!(primitives_equal(&lhs, &rhs));
    }

    #[test]
    fn unlisted_kinds_are_conservatively_unequal() {
        let mut a = Feature::new("k", FeatureKind::Key);
        let mut b = Feature::new("k", FeatureKind::Key);
        a.set_primitive(slot::SCALAR, Primitive::Key { keycode: 30 });
        b.set_primitive(slot::SCALAR, Primitive::Key { keycode: 30 });
        assert!(!primitives_equal(&a, &b));
    }

    #[test]
    fn out_of_range_slot_reads_unknown() {
        let feature = Feature::scalar("a", button(1));
        assert_eq!(feature.primitive(7), &Primitive::Unknown);
    }
}
