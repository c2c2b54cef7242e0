//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use otherworlds_core::rng::DeterministicRng;

/// An RNG that always rolls the lowest face: `min` for `next_u32_range` and
/// `0.0` for `next_f64`. Suitable for tests that do not depend on specific
/// random values.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// An RNG that replays a scripted list of die faces, one per
/// `next_u32_range` call, ignoring the requested range.
///
/// # Panics
///
/// Rolling past the end of the script panics, which flags a test that rolls
/// more dice than it scripted.
#[derive(Debug)]
pub struct SequenceRng {
    faces: Vec<u32>,
    next: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` that yields `faces` in order.
    #[must_use]
    pub fn new(faces: Vec<u32>) -> Self {
        Self { faces, next: 0 }
    }

    /// Number of scripted faces not yet rolled.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.faces.len() - self.next
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let face = *self
            .faces
            .get(self.next)
            .unwrap_or_else(|| panic!("SequenceRng exhausted after {} rolls", self.faces.len()));
        self.next += 1;
        face
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}
