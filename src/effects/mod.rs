//! Effect system for stack entries.
//!
//! - `Effect`: closed set of tagged effect descriptors
//! - `Amount`: fixed values or values taken from the resolving entry
//! - `EffectResolver`: applies an effect for the entry that is resolving
//!
//! ## Design Philosophy
//!
//! Effects are data, not callbacks: they serialize, compare, and match
//! exhaustively. Games give meaning to the state keys they touch.

mod effect;
mod resolver;

pub use effect::{Amount, Effect};
pub use resolver::{EffectResolver, ResolverContext};
