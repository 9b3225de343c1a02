//! Build script for biome preset validation
//!
//! This script runs at compile time and validates the bundled biome presets
//! so that a malformed asset fails the build instead of the first page load.

// Include the shared tuning constants
#[path = "src/constants.rs"]
mod constants;

use constants::{MAX_CREATURE_SCALE, MAX_FOG_DENSITY, MAX_LIGHT_INTENSITY};
use heck::ToSnakeCase;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectionalLight {
    color: u32,
    intensity: f32,
    position: [f32; 3],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Biome {
    id: String,
    name: String,
    background_color: u32,
    fog_color: u32,
    fog_density: f32,
    ambient_light: f32,
    directional_light: DirectionalLight,
    creature_speed: f32,
    creature_scale: f32,
}

/// Validate a single preset against the shared bounds
fn validate_biome(biome: &Biome) -> Vec<String> {
    let mut errors = Vec::new();

    let expected_id = biome.name.to_snake_case();
    if biome.id != expected_id {
        errors.push(format!(
            "  id '{}' should be '{}' (snake_case of name)",
            biome.id, expected_id
        ));
    }

    for (label, color) in [
        ("backgroundColor", biome.background_color),
        ("fogColor", biome.fog_color),
        ("directionalLight.color", biome.directional_light.color),
    ] {
        if color > 0xffffff {
            errors.push(format!("  {} {:#x} is not a 24-bit colour", label, color));
        }
    }

    let mut check = |label: &str, value: f32, max: f32| {
        if !value.is_finite() || value < 0.0 || value > max {
            errors.push(format!("  {} {} outside [0, {}]", label, value, max));
        }
    };
    check("fogDensity", biome.fog_density, MAX_FOG_DENSITY);
    check("ambientLight", biome.ambient_light, MAX_LIGHT_INTENSITY);
    check(
        "directionalLight.intensity",
        biome.directional_light.intensity,
        MAX_LIGHT_INTENSITY,
    );
    check("creatureScale", biome.creature_scale, MAX_CREATURE_SCALE);

    if !(biome.creature_speed > 0.0) {
        errors.push(format!(
            "  creatureSpeed {} must be positive",
            biome.creature_speed
        ));
    }
    if biome.directional_light.position.iter().any(|c| !c.is_finite()) {
        errors.push("  directionalLight.position has non-finite components".to_string());
    }

    errors
}

/// Validate the preset file
fn validate_biome_file(path: &Path) -> Result<usize, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let biomes: Vec<Biome> = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    if biomes.is_empty() {
        return Err(format!("{} contains no biomes", path.display()));
    }

    let mut seen = HashSet::new();
    let mut all_errors = Vec::new();

    for biome in &biomes {
        let mut errors = validate_biome(biome);
        if !seen.insert(biome.id.as_str()) {
            errors.push("  duplicate id".to_string());
        }
        if !errors.is_empty() {
            all_errors.push(format!("Biome '{}':\n{}", biome.name, errors.join("\n")));
        }
    }

    if all_errors.is_empty() {
        Ok(biomes.len())
    } else {
        Err(all_errors.join("\n\n"))
    }
}

fn main() {
    let biome_file = Path::new("assets/biomes.json");

    // Rerun if shared constants or the presets change
    println!("cargo:rerun-if-changed=src/constants.rs");
    println!("cargo:rerun-if-changed={}", biome_file.display());

    match validate_biome_file(biome_file) {
        Ok(count) => println!("cargo:warning=✓ {} biome presets validated", count),
        Err(e) => {
            println!("cargo:warning=VALIDATION ERROR: {}", e);
            panic!("Biome validation failed! Fix assets/biomes.json.");
        }
    }
}
