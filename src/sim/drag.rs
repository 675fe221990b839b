//! Drag sampling
//!
//! Keeps only the two newest pointer-plane samples. The flick direction is the
//! direction of the very last motion, not an average over a time window.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Number of samples retained
pub const DRAG_WINDOW: usize = 2;

/// One pointer-plane sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSample {
    pub position: Vec3,
    pub time: f32,
}

/// Rolling two-sample drag history (oldest first)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DragSampler {
    samples: Vec<DragSample>,
}

impl DragSampler {
    pub fn new() -> Self {
        Self {
            samples: Vec::with_capacity(DRAG_WINDOW),
        }
    }

    /// Append a sample, evicting all but the newest two.
    ///
    /// Timestamps stay strictly increasing: a sample that is not newer than
    /// the newest one overwrites that sample's position instead.
    pub fn record(&mut self, position: Vec3, time: f32) {
        if let Some(newest) = self.samples.last_mut() {
            if time <= newest.time {
                newest.position = position;
                return;
            }
        }
        self.samples.push(DragSample { position, time });
        if self.samples.len() > DRAG_WINDOW {
            let excess = self.samples.len() - DRAG_WINDOW;
            self.samples.drain(..excess);
        }
    }

    /// Flick direction, or `Vec3::Z` with fewer than two samples
    pub fn direction(&self) -> Vec3 {
        self.direction_or(Vec3::Z)
    }

    /// Flick direction, or `fallback` when there is no usable motion
    pub fn direction_or(&self, fallback: Vec3) -> Vec3 {
        match self.samples.as_slice() {
            [.., previous, newest] => (newest.position - previous.position).normalize_or(fallback),
            _ => fallback,
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn newest(&self) -> Option<&DragSample> {
        self.samples.last()
    }

    pub fn samples(&self) -> &[DragSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
