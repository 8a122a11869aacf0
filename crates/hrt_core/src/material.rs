//! Phong-style surface coefficients carried by every primitive.
//!
//! Shading itself happens on the GPU (or in external CPU shading code); the
//! core only stores and serializes these values.

use hrt_math::Vec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Surface material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse color
    pub color: Color,
    /// Weight of the Fresnel reflection term (0 = matte, 1 = full mirror)
    pub fresnel_strength: f32,
    /// Ambient coefficient
    pub ambient_strength: f32,
    /// Diffuse coefficient
    pub diffuse_strength: f32,
    /// Specular coefficient
    pub specular_strength: f32,
    /// Specular exponent
    pub shininess: i32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::ONE,
            fresnel_strength: 1.0,
            ambient_strength: 0.4,
            diffuse_strength: 1.0,
            specular_strength: 0.5,
            shininess: 32,
        }
    }
}

impl Material {
    /// Create a material with the given color and default coefficients.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Set the Phong coefficients (ambient, diffuse, specular).
    pub fn with_phong(mut self, ambient: f32, diffuse: f32, specular: f32) -> Self {
        self.ambient_strength = ambient;
        self.diffuse_strength = diffuse;
        self.specular_strength = specular;
        self
    }

    /// Set the Fresnel reflection weight.
    pub fn with_fresnel(mut self, fresnel: f32) -> Self {
        self.fresnel_strength = fresnel;
        self
    }

    /// Set the specular exponent.
    pub fn with_shininess(mut self, shininess: i32) -> Self {
        self.shininess = shininess;
        self
    }
}
