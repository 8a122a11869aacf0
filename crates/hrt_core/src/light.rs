//! Point light.

use hrt_math::Vec3;

use crate::material::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Color::ONE,
            intensity: 1.0,
        }
    }
}

impl Light {
    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position,
            color,
            ..Default::default()
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Color scaled by intensity, as seen by shading.
    pub fn radiance(&self) -> Color {
        self.color * self.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_radiance() {
        let light = Light::new(Vec3::new(0.0, 10.0, 0.0), Color::new(1.0, 0.5, 0.25)).with_intensity(2.0);
        assert_eq!(light.radiance(), Color::new(2.0, 1.0, 0.5));
    }
}
