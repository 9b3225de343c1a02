//! Biome presets and the audio-reactive environment response
//!
//! The renderer owns the actual scene; this module only decides the numbers.
//! Louder audio brightens the key light, thickens the fog slightly and makes
//! emissive materials glow harder:
//!
//! light    = lerp(0.5 * I, 1.5 * I, loudness)
//! fog      = lerp(d, 1.5 * d, 0.3 * loudness)
//! emissive = lerp(0.3, 1.0, loudness)

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::audio::AudioMood;
use crate::config::EnvironmentConfig;
use crate::error::{EngineError, Result};
use crate::math::lerp;

/// Bundled presets, validated by build.rs
const BUNDLED_BIOMES: &str = include_str!("../assets/biomes.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionalLight {
    /// 0xRRGGBB
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiomePreset {
    pub id: String,
    pub name: String,
    pub background_color: u32,
    pub fog_color: u32,
    pub fog_density: f32,
    pub ambient_light: f32,
    pub directional_light: DirectionalLight,
    pub creature_speed: f32,
    pub creature_scale: f32,
}

impl Default for BiomePreset {
    fn default() -> Self {
        Self {
            id: "abyssarium".to_string(),
            name: "Abyssarium".to_string(),
            background_color: 0x000000,
            fog_color: 0x000000,
            fog_density: 0.01,
            ambient_light: 1.2,
            directional_light: DirectionalLight {
                color: 0xffffff,
                intensity: 2.5,
                position: Vec3::new(5.0, 10.0, 5.0),
            },
            creature_speed: 1.0,
            creature_scale: 1.0,
        }
    }
}

/// Ordered, non-empty list of presets. The first one is the fallback.
#[derive(Debug, Clone)]
pub struct BiomeCatalog {
    presets: Vec<BiomePreset>,
}

impl BiomeCatalog {
    /// Presets shipped with the crate
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_BIOMES)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let presets: Vec<BiomePreset> = serde_json::from_str(json)?;
        if presets.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        Ok(Self { presets })
    }

    /// First preset in the catalog
    pub fn fallback(&self) -> &BiomePreset {
        &self.presets[0]
    }

    /// Look up a preset, falling back to the first one for unknown ids
    pub fn get(&self, id: &str) -> &BiomePreset {
        self.presets
            .iter()
            .find(|p| p.id == id)
            .unwrap_or_else(|| self.fallback())
    }

    /// Preset following `id`, wrapping around at the end
    pub fn next_after(&self, id: &str) -> &BiomePreset {
        let next = self
            .presets
            .iter()
            .position(|p| p.id == id)
            .map_or(0, |i| (i + 1) % self.presets.len());
        &self.presets[next]
    }

    pub fn ids(&self) -> Vec<String> {
        self.presets.iter().map(|p| p.id.clone()).collect()
    }
}

/// Per-frame environment values for the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentResponse {
    pub light_intensity: f32,
    pub fog_density: f32,
    pub emissive_intensity: f32,
}

impl EnvironmentResponse {
    pub fn from_mood(config: &EnvironmentConfig, biome: &BiomePreset, mood: &AudioMood) -> Self {
        let loudness = mood.loudness.clamp(0.0, 1.0);
        let intensity = biome.directional_light.intensity;
        let density = biome.fog_density;

        Self {
            light_intensity: lerp(
                intensity * config.light_min_scale,
                intensity * config.light_max_scale,
                loudness,
            ),
            fog_density: lerp(
                density,
                density * config.fog_max_scale,
                loudness * config.fog_loudness_weight,
            ),
            emissive_intensity: lerp(config.emissive_min, config.emissive_max, loudness),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn mood(loudness: f32) -> AudioMood {
        AudioMood {
            loudness,
            ..AudioMood::default()
        }
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_bundled_catalog_parses() {
        let catalog = BiomeCatalog::bundled().unwrap();
        assert_eq!(catalog.ids(), vec!["abyssarium", "void", "eldritch"]);
        assert_eq!(catalog.get("abyssarium"), &BiomePreset::default());
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_unknown_biome_falls_back_to_first() {
        let catalog = BiomeCatalog::bundled().unwrap();
        assert_eq!(catalog.get("coral_reef").id, "abyssarium");
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_next_after_cycles() {
        let catalog = BiomeCatalog::bundled().unwrap();
        assert_eq!(catalog.next_after("abyssarium").id, "void");
        assert_eq!(catalog.next_after("eldritch").id, "abyssarium");
        assert_eq!(catalog.next_after("missing").id, "abyssarium");
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            BiomeCatalog::from_json("[]"),
            Err(EngineError::EmptyCatalog)
        ));
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_response_endpoints() {
        let config = EnvironmentConfig::default();
        let biome = BiomePreset::default();

        let quiet = EnvironmentResponse::from_mood(&config, &biome, &mood(0.0));
        assert_eq!(quiet.light_intensity, 1.25);
        assert_eq!(quiet.fog_density, 0.01);
        assert_eq!(quiet.emissive_intensity, 0.3);

        let loud = EnvironmentResponse::from_mood(&config, &biome, &mood(1.0));
        assert!((loud.light_intensity - 3.75).abs() < 1e-5);
        // Fog only moves 30% of the way to its maximum
        assert!((loud.fog_density - 0.0115).abs() < 1e-6);
        assert!((loud.emissive_intensity - 1.0).abs() < 1e-6);
    }
}

// App methods for the environment
#[cfg(target_arch = "wasm32")]
use crate::state::App;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Switch biome; unknown ids fall back to the default. Returns the preset.
    pub fn set_biome(&mut self, id: &str) -> std::result::Result<JsValue, JsValue> {
        let mut engine = self.engine.borrow_mut();
        let preset = engine.set_biome(id);
        serde_wasm_bindgen::to_value(preset).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Cycle to the next biome and return its id
    pub fn next_biome(&mut self) -> String {
        let mut engine = self.engine.borrow_mut();
        let next = engine.biomes().next_after(&engine.biome().id).id.clone();
        engine.set_biome(&next).id.clone()
    }
}
