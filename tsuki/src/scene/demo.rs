use std::{f32::consts::FRAC_PI_2, sync::Arc};

use super::{Scene, SceneError};
use crate::{
    camera::CameraParameters,
    environment::CubeMap,
    lights::{DirectionalLight, PointLight},
    materials::Material,
    math::{
        spectrum,
        transforms::{rotation_x, rotation_y, scale, translation},
        Point3, Spectrum, Vec3,
    },
    shapes::{Cuboid, Mesh, Sphere, Square},
    textures::{CheckerTexture, ConstantTexture, Texture},
};

/// Builds a Cornell-style box with a mirror sphere, a glass cube and a small pyramid mesh.
///
/// The box spans `[-1, 1]^3` with the open side facing the camera at +z.
pub fn cornell_box() -> Result<Scene, SceneError> {
    let mut scene = Scene::new("Cornell box");
    scene.ambient = Spectrum::from(0.1);

    let root = scene.transforms().root();
    let walls = scene.add_transform(root, scale(2.0, 2.0, 2.0))?;

    let white = Material::diffuse(Spectrum::from(0.75));
    let mut checker = white.clone();
    checker.diffuse_texture = Some(Arc::new(CheckerTexture::new(
        Spectrum::from(0.75),
        Spectrum::from(0.25),
        8.0,
    )));

    // Unit squares face +z before they are rotated into place
    let placements = [
        (
            &translation(Vec3::new(0.0, -0.5, 0.0)) * &rotation_x(-FRAC_PI_2),
            checker,
        ),
        (
            &translation(Vec3::new(0.0, 0.5, 0.0)) * &rotation_x(FRAC_PI_2),
            white.clone(),
        ),
        (translation(Vec3::new(0.0, 0.0, -0.5)), white),
        (
            &translation(Vec3::new(-0.5, 0.0, 0.0)) * &rotation_y(FRAC_PI_2),
            Material::diffuse(spectrum(0.75, 0.1, 0.1)),
        ),
        (
            &translation(Vec3::new(0.5, 0.0, 0.0)) * &rotation_y(-FRAC_PI_2),
            Material::diffuse(spectrum(0.1, 0.75, 0.1)),
        ),
    ];
    for (local, material) in placements {
        let wall = scene.add_transform(walls, local)?;
        scene.add_shape(Arc::new(Square::new(material)), wall)?;
    }

    let sphere = scene.add_transform(
        root,
        &translation(Vec3::new(-0.45, -0.6, -0.3)) * &scale(0.4, 0.4, 0.4),
    )?;
    scene.add_shape(Arc::new(Sphere::new(Material::mirror())), sphere)?;

    let cube = scene.add_transform(
        root,
        &translation(Vec3::new(0.45, -0.7, 0.2)) * &(&rotation_y(0.5) * &scale(0.5, 0.6, 0.5)),
    )?;
    scene.add_shape(Arc::new(Cuboid::new(Material::glass(1.5))), cube)?;

    let mut pyramid = Mesh::from_triangles(
        vec![
            Point3::new(-0.5, 0.0, -0.5),
            Point3::new(0.5, 0.0, -0.5),
            Point3::new(0.5, 0.0, 0.5),
            Point3::new(-0.5, 0.0, 0.5),
            Point3::new(0.0, 0.8, 0.0),
        ],
        &[[0, 4, 1], [1, 4, 2], [2, 4, 3], [3, 4, 0], [0, 1, 2], [0, 2, 3]],
        Material {
            ks: Spectrum::from(0.5),
            shininess: 32.0,
            ..Material::diffuse(spectrum(0.8, 0.6, 0.2))
        },
    )?;
    pyramid.generate_normals();
    let pyramid_transform = scene.add_transform(
        root,
        &translation(Vec3::new(0.0, -1.0, -0.6)) * &scale(0.4, 0.4, 0.4),
    )?;
    scene.add_mesh(Arc::new(pyramid), pyramid_transform)?;

    scene.add_light(Arc::new(PointLight::with_falloff(
        Point3::new(0.0, 0.9, 0.0),
        Spectrum::from(1.0),
        [1.0, 0.1, 0.05],
    )));
    scene.add_light(Arc::new(DirectionalLight::new(
        Vec3::new(-0.3, -1.0, -0.8),
        Spectrum::from(0.2),
    )));

    // Seen through the open side when the environment map is enabled
    let sky = |c: Spectrum<f32>| -> Arc<dyn Texture<Spectrum<f32>>> {
        Arc::new(ConstantTexture::from(c))
    };
    let horizon = spectrum(0.6, 0.7, 0.8);
    scene.environment = Some(Arc::new(CubeMap::new([
        sky(horizon),
        sky(horizon),
        sky(spectrum(0.3, 0.5, 0.9)),
        sky(spectrum(0.2, 0.2, 0.2)),
        sky(horizon),
        sky(horizon),
    ])));

    scene.set_camera(CameraParameters {
        position: Point3::new(0.0, 0.0, 3.4),
        target: Point3::new(0.0, 0.0, 0.0),
        up: Vec3::new(0.0, 1.0, 0.0),
        fov_y: 40.0,
    })?;

    Ok(scene)
}
