//! Secret redaction applied to assembled output before it leaves the machine.

pub mod rules;
pub mod scrubber;

pub use scrubber::{scrub, ScrubOutcome, Scrubber};
