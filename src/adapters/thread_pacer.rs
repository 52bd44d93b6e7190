//! Pacer backed by `std::thread::sleep`.

use crate::ports::pacing_port::Pacer;
use std::time::Duration;

pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
