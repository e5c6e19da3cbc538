use std::{fmt, sync::Arc};

use crate::{
    hit::Hit,
    integrators::IntegratorRay,
    math::{Point2, Ray, Spectrum, Vec3},
    scene::Scene,
    textures::Texture,
};

/// Phong material with the coefficients the recursive tracer reads.
#[derive(Clone)]
pub struct Material {
    /// Emissive color.
    pub ke: Spectrum<f32>,
    /// Ambient reflectance.
    pub ka: Spectrum<f32>,
    /// Specular reflectance.
    pub ks: Spectrum<f32>,
    /// Diffuse reflectance, replaced by `diffuse_texture` when one is set.
    pub kd: Spectrum<f32>,
    pub diffuse_texture: Option<Arc<dyn Texture<Spectrum<f32>>>>,
    /// Mirror reflection coefficient.
    pub kr: Spectrum<f32>,
    /// Transmission coefficient.
    pub kt: Spectrum<f32>,
    /// Phong exponent.
    pub shininess: f32,
    /// Index of refraction.
    pub index: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ke: Spectrum::zeros(),
            ka: Spectrum::zeros(),
            ks: Spectrum::zeros(),
            kd: Spectrum::zeros(),
            diffuse_texture: None,
            kr: Spectrum::zeros(),
            kt: Spectrum::zeros(),
            shininess: 0.0,
            index: 1.0,
        }
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("ke", &self.ke)
            .field("ka", &self.ka)
            .field("ks", &self.ks)
            .field("kd", &self.kd)
            .field("diffuse_texture", &self.diffuse_texture.is_some())
            .field("kr", &self.kr)
            .field("kt", &self.kt)
            .field("shininess", &self.shininess)
            .field("index", &self.index)
            .finish()
    }
}

impl Material {
    /// Creates a diffuse `Material` that also reflects `kd` of the ambient light.
    pub fn diffuse(kd: Spectrum<f32>) -> Self {
        Self {
            ka: kd,
            kd,
            ..Self::default()
        }
    }

    /// Creates a perfect mirror.
    pub fn mirror() -> Self {
        Self {
            kr: Spectrum::ones(),
            ..Self::default()
        }
    }

    /// Creates a clear dielectric with index of refraction `index`.
    pub fn glass(index: f32) -> Self {
        Self {
            ks: Spectrum::from(0.2),
            kt: Spectrum::ones(),
            shininess: 64.0,
            index,
            ..Self::default()
        }
    }

    /// Returns the diffuse reflectance at `uv`.
    pub fn kd(&self, uv: Point2<f32>) -> Spectrum<f32> {
        match &self.diffuse_texture {
            Some(texture) => texture.evaluate(uv),
            None => self.kd,
        }
    }

    /// Blends three `Material`s with barycentric weights.
    ///
    /// Textures are not blended, the first material's texture is kept.
    pub fn blend(materials: [&Material; 3], bary: [f32; 3]) -> Self {
        let mix = |f: fn(&Material) -> Spectrum<f32>| {
            f(materials[0]) * bary[0] + f(materials[1]) * bary[1] + f(materials[2]) * bary[2]
        };
        let mix_scalar = |f: fn(&Material) -> f32| {
            f(materials[0]) * bary[0] + f(materials[1]) * bary[1] + f(materials[2]) * bary[2]
        };

        Self {
            ke: mix(|m| m.ke),
            ka: mix(|m| m.ka),
            ks: mix(|m| m.ks),
            kd: mix(|m| m.kd),
            diffuse_texture: materials[0].diffuse_texture.clone(),
            kr: mix(|m| m.kr),
            kt: mix(|m| m.kt),
            shininess: mix_scalar(|m| m.shininess),
            index: mix_scalar(|m| m.index),
        }
    }

    /// Evaluates the local Phong model at `hit` for a ray arriving along `ray`.
    ///
    /// Every light is attenuated by distance and by the occluders between it and the hit.
    /// Shadow rays are appended to `rays` if given.
    pub fn shade(
        &self,
        scene: &Scene,
        ray: &Ray<f32>,
        hit: &Hit,
        mut rays: Option<&mut Vec<IntegratorRay>>,
    ) -> Spectrum<f32> {
        let n = Vec3::from(hit.n);
        let v = -ray.d;
        let kd = self.kd(hit.uv);

        let mut color = self.ke + self.ka * scene.ambient;
        for light in &scene.lights {
            let sample = light.sample_li(hit.p);
            let n_dot_l = n.dot(sample.l);
            if n_dot_l <= 0.0 {
                continue;
            }

            let diffuse = kd * n_dot_l;
            let r = n * (n_dot_l + n_dot_l) - sample.l;
            let v_dot_r = v.dot(r).max(0.0);
            let specular = if v_dot_r > 0.0 {
                self.ks * v_dot_r.powf(self.shininess)
            } else {
                Spectrum::zeros()
            };

            let shadow = sample.vis.attenuation(scene, rays.as_deref_mut());
            color += shadow * (diffuse + specular) * sample.distance_attenuation;
        }

        color
    }
}
