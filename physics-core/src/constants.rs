pub const PI: f64 = core::f64::consts::PI;

pub const E: f64 = core::f64::consts::E;

pub const LN_10: f64 = core::f64::consts::LN_10;

/// Decimal places used when no precision is given.
pub const DEFAULT_DECIMALS: i32 = 4;

/// Most significant digits an `f64` can carry.
pub const MAX_SIGNIFICANT: u32 = 17;

/// Largest decimal count accepted by the rounding helpers; beyond this `10^d`
/// leaves the finite `f64` range.
pub const MAX_DECIMALS: i32 = 300;
