#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    use tsuki::{
        hit::spawn_ray,
        materials::Material,
        math::{
            normal, point3, spectrum, transforms::{rotation_y, scale, translation}, vec3, Point3,
            Ray, Vec3,
        },
        shapes::{intersect_linear, Cuboid, Geometry, Mesh, Shape, Sphere, Square, Triangle},
    };

    fn sphere() -> Arc<dyn Shape> {
        Arc::new(Sphere::new(Material::default()))
    }

    #[test]
    fn sphere_local() {
        let s = Sphere::new(Material::diffuse(spectrum(0.5, 0.5, 0.5)));

        let hit = s
            .intersect_local(Ray::unbounded(point3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0)))
            .unwrap();
        assert_abs_diff_eq!(hit.t, 4.0);
        assert_abs_diff_eq!(hit.p, point3(0.0, 0.0, -1.0));
        assert_abs_diff_eq!(hit.n, normal(0.0, 0.0, -1.0));
        assert_abs_diff_eq!(hit.material.kd, spectrum(0.5, 0.5, 0.5));
        assert!((0.0..=1.0).contains(&hit.uv.x) && (0.0..=1.0).contains(&hit.uv.y));

        // From the inside the far side is hit
        let hit = s
            .intersect_local(Ray::unbounded(point3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0)))
            .unwrap();
        assert_abs_diff_eq!(hit.t, 1.0);
        assert_abs_diff_eq!(hit.n, normal(1.0, 0.0, 0.0));

        // Misses
        assert!(s
            .intersect_local(Ray::unbounded(point3(0.0, 2.0, -5.0), vec3(0.0, 0.0, 1.0)))
            .is_none());
        assert!(s
            .intersect_local(Ray::unbounded(point3(0.0, 0.0, -5.0), vec3(0.0, 0.0, -1.0)))
            .is_none());
        assert!(s
            .intersect_local(Ray::new(point3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0), 3.9))
            .is_none());
    }

    #[test]
    fn square_local() {
        let s = Square::new(Material::default());

        let hit = s
            .intersect_local(Ray::unbounded(point3(0.25, -0.25, 2.0), vec3(0.0, 0.0, -1.0)))
            .unwrap();
        assert_abs_diff_eq!(hit.t, 2.0);
        assert_abs_diff_eq!(hit.p, point3(0.25, -0.25, 0.0));
        assert_abs_diff_eq!(hit.n, normal(0.0, 0.0, 1.0));
        assert_abs_diff_eq!(hit.uv.x, 0.75);
        assert_abs_diff_eq!(hit.uv.y, 0.25);

        // Hit from below too
        assert!(s
            .intersect_local(Ray::unbounded(point3(0.0, 0.0, -1.0), vec3(0.0, 0.0, 1.0)))
            .is_some());
        // Outside the unit square
        assert!(s
            .intersect_local(Ray::unbounded(point3(0.6, 0.0, 1.0), vec3(0.0, 0.0, -1.0)))
            .is_none());
        // Parallel
        assert!(s
            .intersect_local(Ray::unbounded(point3(-1.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0)))
            .is_none());
    }

    #[test]
    fn cuboid_local() {
        let c = Cuboid::new(Material::default());

        let hit = c
            .intersect_local(Ray::unbounded(point3(0.1, 0.2, -5.0), vec3(0.0, 0.0, 1.0)))
            .unwrap();
        assert_abs_diff_eq!(hit.t, 4.5);
        assert_abs_diff_eq!(hit.n, normal(0.0, 0.0, -1.0));

        let hit = c
            .intersect_local(Ray::unbounded(point3(3.0, 0.0, 0.0), vec3(-1.0, 0.0, 0.0)))
            .unwrap();
        assert_abs_diff_eq!(hit.t, 2.5);
        assert_abs_diff_eq!(hit.n, normal(1.0, 0.0, 0.0));

        // Exit face from the inside
        let hit = c
            .intersect_local(Ray::unbounded(point3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)))
            .unwrap();
        assert_abs_diff_eq!(hit.t, 0.5);
        assert_abs_diff_eq!(hit.n, normal(0.0, 1.0, 0.0));

        // Diagonal miss past a corner
        let d = vec3(1.0, 1.0, 0.0).normalized();
        assert!(c
            .intersect_local(Ray::unbounded(point3(-1.5, 0.0, 0.0), d))
            .is_none());
        assert_eq!(c.local_bound().p_max, point3(0.5, 0.5, 0.5));
    }

    #[test]
    fn geometry_scaled() {
        // Radius 2 sphere at z = 10
        let to_world = &translation(vec3(0.0, 0.0, 10.0)) * &scale(2.0, 2.0, 2.0);
        let g = Geometry::new(sphere(), to_world);
        assert_abs_diff_eq!(g.world_bound().p_min, point3(-2.0, -2.0, 8.0));
        assert_abs_diff_eq!(g.world_bound().p_max, point3(2.0, 2.0, 12.0));

        let hit = g
            .intersect(Ray::unbounded(point3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0)))
            .unwrap();
        // World units
        assert_abs_diff_eq!(hit.t, 8.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.p, point3(0.0, 0.0, 8.0), epsilon = 1e-5);
        assert_abs_diff_eq!(hit.n, normal(0.0, 0.0, -1.0), epsilon = 1e-6);

        // Non-unit directions get t in their own units
        let hit = g
            .intersect(Ray::unbounded(point3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 2.0)))
            .unwrap();
        assert_abs_diff_eq!(hit.t, 4.0, epsilon = 1e-5);

        // t_max is respected in world units
        assert!(g
            .intersect(Ray::new(point3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0), 7.9))
            .is_none());
        // Bound misses skip the shape
        assert!(g
            .intersect(Ray::unbounded(point3(3.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0)))
            .is_none());
    }

    #[test]
    fn geometry_normals() {
        // Ellipsoid stretched along z
        let g = Geometry::new(sphere(), scale(1.0, 1.0, 3.0));

        let p = point3(
            std::f32::consts::FRAC_1_SQRT_2,
            0.0,
            3.0 * std::f32::consts::FRAC_1_SQRT_2,
        );
        // Gradient of x^2 + y^2 + (z / 3)^2
        let n = vec3(p.x, p.y, p.z / 9.0).normalized();
        let ray = Ray::unbounded(p + n * 5.0, -n);

        let hit = g.intersect(ray).unwrap();
        assert_abs_diff_eq!(hit.t, 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(hit.p, p, epsilon = 1e-4);
        assert_abs_diff_eq!(Vec3::from(hit.n), n, epsilon = 1e-4);
        assert_abs_diff_eq!(hit.n.len(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn geometry_rotated_square() {
        // Square facing +x
        let g = Geometry::new(
            Arc::new(Square::new(Material::default())),
            &translation(vec3(2.0, 0.0, 0.0)) * &rotation_y(std::f32::consts::FRAC_PI_2),
        );
        let hit = g
            .intersect(Ray::unbounded(point3(5.0, 0.1, 0.1), vec3(-1.0, 0.0, 0.0)))
            .unwrap();
        assert_abs_diff_eq!(hit.t, 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.n, normal(1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn mesh_and_triangles_agree() {
        let mesh = Arc::new(
            Mesh::from_triangles(
                vec![
                    point3(-1.0, -1.0, 0.0),
                    point3(1.0, -1.0, 0.0),
                    point3(1.0, 1.0, 0.0),
                    point3(-1.0, 1.0, 0.0),
                    point3(0.0, 0.0, 1.0),
                ],
                &[[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]],
                Material::default(),
            )
            .unwrap(),
        );
        let to_world = translation(vec3(0.0, 0.0, -3.0));
        let whole = vec![Geometry::new(Arc::clone(&mesh) as Arc<dyn Shape>, to_world)];
        let faces: Vec<Geometry> = (0..mesh.faces().len())
            .map(|f| Geometry::new(Arc::new(Triangle::new(Arc::clone(&mesh), f)), to_world))
            .collect();

        for &(x, y) in &[(0.01, 0.02), (0.5, 0.1), (-0.3, -0.6), (0.9, -0.9), (2.0, 0.0)] {
            let ray = Ray::unbounded(point3(x, y, 0.0), vec3(0.0, 0.0, -1.0));
            let a = intersect_linear(&whole, ray);
            let b = intersect_linear(&faces, ray);
            assert_eq!(a.is_some(), b.is_some());
            if let (Some(a), Some(b)) = (a, b) {
                assert_abs_diff_eq!(a.t, b.t, epsilon = 1e-5);
                assert_abs_diff_eq!(a.n, b.n, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn linear_closest() {
        let objects: Vec<Geometry> = [5.0, 3.0, 8.0]
            .iter()
            .map(|&z| Geometry::new(sphere(), translation(vec3(0.0, 0.0, z))))
            .collect();
        let ray = Ray::unbounded(Point3::zeros(), vec3(0.0, 0.0, 1.0));
        let hit = intersect_linear(&objects, ray).unwrap();
        assert_eq!(hit.object, 1);
        assert_abs_diff_eq!(hit.t, 2.0, epsilon = 1e-5);

        assert!(intersect_linear(&objects, Ray::unbounded(Point3::zeros(), -ray.d)).is_none());
        assert!(intersect_linear(&[], ray).is_none());
    }

    #[test]
    fn spawned_rays_leave_the_surface() {
        let g = vec![Geometry::new(sphere(), scale(2.0, 2.0, 2.0))];
        let ray = Ray::unbounded(point3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0));
        let hit = intersect_linear(&g, ray).unwrap();

        // Tangent and outward rays don't find the surface they start on
        let out = hit.spawn_ray(Vec3::from(hit.n));
        assert!(intersect_linear(&g, out).is_none());
        // Inward rays find the far side
        let inward = spawn_ray(hit.p, ray.d, f32::INFINITY);
        let far = intersect_linear(&g, inward).unwrap();
        assert_abs_diff_eq!(far.p, point3(0.0, 0.0, 2.0), epsilon = 1e-4);
    }
}
