//! Frame-differencing motion detector
//!
//! A cheap secondary input that works without the pose model. It compares
//! consecutive down-sampled RGBA frames and reports:
//! - a presence level (how much of the view is moving)
//! - a coarse wave side, when one horizontal third moves much more than the other
//!
//! ## Per frame
//!
//! diff(px) = (|dr| + |dg| + |db|) / 3, counted only when above the pixel threshold
//! motion   = min(sum(diff) / (w*h*255), 1)
//! presence = smoothstep(edge_low, edge_high, motion)

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::config::MotionConfig;
use crate::gesture::Side;
use crate::math::smoothstep;

/// Result of comparing one frame against the previous one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Normalized overall motion in [0, 1]
    pub motion: f32,
    /// Presence level in [0, 1]
    pub presence: f32,
    /// Side with dominant motion, if lopsided enough
    pub wave: Option<Side>,
}

pub struct MotionDetector {
    config: MotionConfig,
    previous: Option<Vec<u8>>,
}

impl MotionDetector {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            previous: None,
        }
    }

    /// Expected RGBA byte length of one frame
    pub fn frame_len(&self) -> usize {
        self.config.frame_width * self.config.frame_height * 4
    }

    /// Compare `rgba` with the previous frame.
    ///
    /// The first frame only primes the detector. A frame of the wrong size
    /// is dropped and also clears the stored frame.
    pub fn process(&mut self, rgba: &[u8]) -> Option<MotionSample> {
        if rgba.len() != self.frame_len() {
            log::debug!(
                "Motion frame has {} bytes, expected {}",
                rgba.len(),
                self.frame_len()
            );
            self.previous = None;
            return None;
        }

        let Some(previous) = self.previous.as_mut() else {
            self.previous = Some(rgba.to_vec());
            return None;
        };

        let width = self.config.frame_width;
        let pixels = (width * self.config.frame_height) as f32;
        let left_edge = width as f32 / 3.0;
        let right_edge = width as f32 * 2.0 / 3.0;

        let mut total = 0.0_f32;
        let mut regions = [0.0_f32; 3];

        for (i, (cur, prev)) in rgba.chunks_exact(4).zip(previous.chunks_exact(4)).enumerate() {
            let channel_sum: u32 = (0..3).map(|c| cur[c].abs_diff(prev[c]) as u32).sum();
            let diff = channel_sum as f32 / 3.0;

            if diff > self.config.pixel_threshold {
                total += diff;
                let x = (i % width) as f32;
                let region = if x < left_edge {
                    0
                } else if x < right_edge {
                    1
                } else {
                    2
                };
                regions[region] += diff;
            }
        }

        previous.copy_from_slice(rgba);

        let motion = (total / (pixels * 255.0)).min(1.0);
        let third = pixels * 255.0 / 3.0;
        let left = regions[0] / third;
        let right = regions[2] / third;
        let ratio = left.max(right) / (left.min(right) + self.config.side_bias);

        let wave = (ratio > self.config.side_ratio && motion > self.config.wave_min).then(|| {
            if left > right {
                Side::Left
            } else {
                Side::Right
            }
        });

        Some(MotionSample {
            motion,
            presence: smoothstep(
                self.config.presence_edge_low,
                self.config.presence_edge_high,
                motion,
            ),
            wave,
        })
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }
}


// App methods for the motion detector
#[cfg(target_arch = "wasm32")]
use crate::state::App;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Feed one down-sampled RGBA camera frame. Returns the presence level.
    pub fn process_motion_frame(&mut self, rgba: &[u8]) -> Option<f32> {
        let now = crate::state::now_ms();
        self.engine
            .borrow_mut()
            .process_motion(rgba, now)
            .map(|sample| sample.presence)
    }
}
