//! Audio feature extraction
//!
//! Maps a byte frequency spectrum to a perceptual "mood": overall loudness
//! plus low/mid/high band levels, each passed through a smoothstep curve that
//! pushes near-silence to 0 and saturates loud input to 1.
//! Each call is independent; no smoothing state is kept between ticks.

use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::config::AudioConfig;
use crate::constants::SPECTRUM_MAX;
use crate::math::{map_range, smoothstep};

/// Current perceptual snapshot of the audio input, every field in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioMood {
    pub loudness: f32,
    pub low_band: f32,
    pub mid_band: f32,
    pub high_band: f32,
}

pub struct AudioFeatureExtractor {
    config: AudioConfig,
}

impl AudioFeatureExtractor {
    pub fn new(config: AudioConfig) -> Self {
        Self { config }
    }

    /// Extract the mood of one spectrum. An empty spectrum yields no mood.
    pub fn extract(&self, spectrum: &[u8]) -> Option<AudioMood> {
        if spectrum.is_empty() {
            return None;
        }

        let n = spectrum.len();
        let low_end = (n as f32 * self.config.low_band_end).floor() as usize;
        let mid_end = ((n as f32 * self.config.mid_band_end).floor() as usize).max(low_end);

        let curve = |raw: f32| smoothstep(self.config.edge_low, self.config.edge_high, raw);

        Some(AudioMood {
            loudness: curve(band_level(spectrum)),
            low_band: curve(band_level(&spectrum[..low_end])),
            mid_band: curve(band_level(&spectrum[low_end..mid_end])),
            high_band: curve(band_level(&spectrum[mid_end..])),
        })
    }
}

/// Mean bin magnitude mapped to [0, 1]; 0 for an empty band
fn band_level(bins: &[u8]) -> f32 {
    crate::math::mean(bins.iter().map(|&b| b as f32))
        .map(|m| map_range(m, 0.0, SPECTRUM_MAX, 0.0, 1.0))
        .unwrap_or(0.0)
}


// App methods for audio
#[cfg(target_arch = "wasm32")]
use crate::state::App;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Feed one byte frequency spectrum (e.g. from an analyser node).
    /// Notifies audio listeners when a mood was produced.
    pub fn process_audio(&mut self, spectrum: &[u8]) -> Option<f32> {
        let mood = self.engine.borrow_mut().process_audio(spectrum)?;
        self.listeners.dispatch_audio(&mood);
        Some(mood.loudness)
    }
}
