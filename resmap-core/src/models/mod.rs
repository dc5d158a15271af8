pub mod interval;
pub mod mapping;
pub mod token;

// re-export for cleaner imports
pub use self::interval::ResidueInterval;
pub use self::mapping::{CoordinateMapping, Direction};
pub use self::token::{PosToken, RawPos};
