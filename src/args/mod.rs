//! Classifier-driven token reading.
//!
//! ```text
//! tokens → Reader ⇄ classifier (+ one lookahead) → Accumulator → converter → T
//! ```
//!
//! The classifier encodes the whole grammar (prefixes, sub-command
//! switches, sentinels); the reader only interprets its answers.

mod accumulator;
mod classification;
mod reader;

pub use accumulator::Accumulator;
pub use classification::{Action, Classification, LookAheadFn, Tagged, Verdict, REST_ARGUMENT};
pub use reader::Reader;
