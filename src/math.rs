//! Scalar helpers shared by the detectors and the environment response.

/// Clamp `value` into `[min, max]`
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Linear interpolation from `start` to `end`
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Hermite smoothstep between two edges.
///
/// Values at or below `edge0` map to 0, at or above `edge1` to 1.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = clamp((x - edge0) / (edge1 - edge0), 0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Remap `value` from `[in_min, in_max]` to `[out_min, out_max]` (unclamped)
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Arithmetic mean, or `None` for an empty input
pub fn mean<I>(values: I) -> Option<f32>
where
    I: IntoIterator<Item = f32>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f32, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[test]

    #[wasm_bindgen_test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(0.1, 0.8, 0.05), 0.0);
        assert_eq!(smoothstep(0.1, 0.8, 0.1), 0.0);
        assert_eq!(smoothstep(0.1, 0.8, 0.8), 1.0);
        assert_eq!(smoothstep(0.1, 0.8, 0.95), 1.0);

        let mid = smoothstep(0.1, 0.8, 0.45);
        assert!((mid - 0.5).abs() < 1e-5, "Midpoint should be 0.5, got {}", mid);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_map_range() {
        assert_eq!(map_range(0.0, 0.0, 255.0, 0.0, 1.0), 0.0);
        assert_eq!(map_range(255.0, 0.0, 255.0, 0.0, 1.0), 1.0);
        assert!((map_range(51.0, 0.0, 255.0, 0.0, 1.0) - 0.2).abs() < 1e-6);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_mean() {
        assert_eq!(mean(Vec::<f32>::new()), None);
        assert_eq!(mean([1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_lerp_and_clamp() {
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
        assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
    }
}
