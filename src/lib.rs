//! padmap — button map storage and controller-to-controller translation.
//!
//! Maintains per-device button maps (bindings from a controller profile's
//! logical features to a device's physical primitives) and learns, from
//! devices mapped for several profiles at once, how to translate a feature
//! set authored for one controller profile into an equivalent set for
//! another.

pub mod config;
pub mod device;
pub mod feature;
pub mod primitive;
pub mod storage;
pub mod store;
pub mod transformer;
pub mod trigger;

pub use config::*;
pub use device::*;
pub use feature::*;
pub use primitive::*;
pub use storage::*;
pub use store::*;
pub use transformer::*;
pub use trigger::*;
