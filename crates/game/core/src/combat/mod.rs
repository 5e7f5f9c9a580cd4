//! Hit zone resolution and damage.
//!
//! Pure functions used by the session state machine:
//!
//! - `effective_angle`: tap angle relative to the dial rotation
//! - `locate_zone` / `resolve_zone`: classify an angle against adjusted bands
//! - `calculate_damage`: base power × zone multiplier × external scaling
//! - `apply_damage`: HP reduction clamped at 0

pub mod damage;
pub mod hit;

pub use damage::{DamageScaling, apply_damage, calculate_damage};
pub use hit::{DialAngle, ZoneHit, effective_angle, locate_zone, resolve_zone};
