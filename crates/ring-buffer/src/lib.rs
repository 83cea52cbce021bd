//! Bounded Ring Buffer
//!
//! Fixed-capacity history storage for per-frame driver signals.
//! Pushing into a full buffer overwrites the oldest sample.

mod buffer;

pub use buffer::RingBuffer;
