//! Pacing port trait.
//!
//! All blocking pauses (retry backoff, periodic cooldown) go through this
//! trait so tests can count them instead of sleeping.

use std::time::Duration;

pub trait Pacer {
    fn pause(&self, duration: Duration);
}
