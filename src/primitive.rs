//! Physical input primitives.
//!
//! A [`Primitive`] names one raw input element a driver exposes: a button, a
//! hat direction, half of an axis, or a key. Features (see
//! [`crate::feature`]) bind their semantic slots to primitives, and the whole
//! conflict-resolution machinery in [`crate::store`] works on exact primitive
//! equality.
//!
//! # Conventions
//! - `index` fields are driver-local indices, in whatever order the backend
//!   enumerates them.
//! - [`Primitive::Unknown`] is the explicit invalid value. Sanitization
//!   overwrites conflicting bindings with it rather than deleting slots, so
//!   slot arity stays fixed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a hat (POV/D-pad) press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HatDirection {
    Up,
    Right,
    Down,
    Left,
}

/// Which half of an axis a semi-axis primitive covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SemiAxisDirection {
    Positive,
    Negative,
}

/// Reference to one physical input element on a device.
///
/// Two primitives are equal iff the variant and every identifying field
/// match exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Primitive {
    /// The explicit null/invalid primitive.
    #[default]
    Unknown,
    /// A digital button, by driver index.
    Button { index: u32 },
    /// One direction of a hat switch.
    Hat { index: u32, direction: HatDirection },
    /// Half of an analog axis.
    SemiAxis {
        index: u32,
        direction: SemiAxisDirection,
    },
    /// A keyboard key, by keycode.
    Key { keycode: u32 },
}

impl Primitive {
    /// True for every variant except [`Primitive::Unknown`].
    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, Primitive::Unknown)
    }

    /// Driver axis index, when the primitive refers to half an axis.
    #[inline]
    pub fn semi_axis_index(&self) -> Option<u32> {
        match self {
            Primitive::SemiAxis { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Unknown => write!(f, "unknown"),
            Primitive::Button { index } => write!(f, "button {index}"),
            Primitive::Hat { index, direction } => {
                let dir = match direction {
                    HatDirection::Up => "up",
                    HatDirection::Right => "right",
                    HatDirection::Down => "down",
                    HatDirection::Left => "left",
                };
                write!(f, "hat {index} {dir}")
            }
            Primitive::SemiAxis { index, direction } => {
                let sign = match direction {
                    SemiAxisDirection::Positive => '+',
                    SemiAxisDirection::Negative => '-',
                };
                write!(f, "axis {sign}{index}")
            }
            Primitive::Key { keycode } => write!(f, "key {keycode}"),
        }
    }
}
