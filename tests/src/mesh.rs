#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use tsuki::{
        materials::Material,
        math::{normal, point2, point3, spectrum, vec3, Point3, Ray, Vec3},
        shapes::{Mesh, MeshError, Shape},
    };

    // Möller-Trumbore, kept independent from the plane based test in the mesh
    fn reference_intersect(
        ray: &Ray<f32>,
        a: Point3<f32>,
        b: Point3<f32>,
        c: Point3<f32>,
    ) -> Option<(f32, f32, f32)> {
        let e1 = b - a;
        let e2 = c - a;
        let p = ray.d.cross(e2);
        let det = e1.dot(p);
        if det.abs() < 1e-8 {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = ray.o - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(e1);
        let v = ray.d.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(q) * inv_det;
        if t <= 0.0 {
            return None;
        }
        Some((t, u, v))
    }

    fn random_point(rng: &mut Pcg32, extent: f32) -> Point3<f32> {
        point3(
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
        )
    }

    fn single_triangle(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Mesh {
        Mesh::from_triangles(vec![a, b, c], &[[0, 1, 2]], Material::default()).unwrap()
    }

    #[test]
    fn triangle_hit() {
        let mesh = single_triangle(
            point3(-1.0, -1.0, 0.0),
            point3(1.0, -1.0, 0.0),
            point3(-1.0, 1.0, 0.0),
        );
        assert_eq!(mesh.faces().len(), 1);
        let face = &mesh.faces()[0];
        assert_abs_diff_eq!(face.normal, normal(0.0, 0.0, 1.0));
        assert_abs_diff_eq!(face.area, 2.0);
        assert_abs_diff_eq!(face.dist, 0.0);

        let ray = Ray::unbounded(point3(-0.5, -0.5, 2.0), vec3(0.0, 0.0, -1.0));
        let hit = mesh.intersect_local(ray).unwrap();
        assert_abs_diff_eq!(hit.t, 2.0);
        assert_abs_diff_eq!(hit.p, point3(-0.5, -0.5, 0.0));
        assert_abs_diff_eq!(hit.n, normal(0.0, 0.0, 1.0));
        assert_abs_diff_eq!(hit.bary[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(hit.bary[1], 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(hit.bary[2], 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(hit.uv, point2(0.25, 0.25), epsilon = 1e-6);

        // Faces are two-sided
        let ray = Ray::unbounded(point3(-0.5, -0.5, -2.0), vec3(0.0, 0.0, 1.0));
        assert!(mesh.intersect_local(ray).is_some());

        // Outside the edges
        let ray = Ray::unbounded(point3(0.5, 0.5, 2.0), vec3(0.0, 0.0, -1.0));
        assert!(mesh.intersect_local(ray).is_none());
        // Parallel to the plane
        let ray = Ray::unbounded(point3(-2.0, -0.5, 0.0), vec3(1.0, 0.0, 0.0));
        assert!(mesh.intersect_local(ray).is_none());
        // Behind the origin
        let ray = Ray::unbounded(point3(-0.5, -0.5, 2.0), vec3(0.0, 0.0, 1.0));
        assert!(mesh.intersect_local(ray).is_none());
        // Past t_max
        let ray = Ray::new(point3(-0.5, -0.5, 2.0), vec3(0.0, 0.0, -1.0), 1.5);
        assert!(mesh.intersect_local(ray).is_none());
    }

    #[test]
    fn triangle_matches_reference() {
        let mut rng = Pcg32::seed_from_u64(0x5EED);
        let mut hits = 0;
        let mut misses = 0;
        for _ in 0..5000 {
            let a = random_point(&mut rng, 1.0);
            let b = random_point(&mut rng, 1.0);
            let c = random_point(&mut rng, 1.0);
            let mesh = single_triangle(a, b, c);
            // Slivers lose too much precision in either test
            if mesh.faces().first().map_or(true, |f| f.area < 0.05) {
                continue;
            }

            // Aim around the triangle so that a good share of the rays miss
            let u: f32 = rng.gen_range(-0.25..1.0);
            let v: f32 = rng.gen_range(-0.25..1.0);
            let target = a + (b - a) * u + (c - a) * v;
            let o = random_point(&mut rng, 3.0);
            if o.dist(target) < 0.1 {
                continue;
            }
            let ray = Ray::unbounded(o, (target - o).normalized());

            let expected = reference_intersect(&ray, a, b, c);
            // Skip grazing rays and hits on the edges where both tests are allowed to differ
            let face_normal = Vec3::from(mesh.faces()[0].normal);
            if face_normal.dot(ray.d).abs() < 1e-2 {
                continue;
            }
            if let Some((t, u, v)) = expected {
                let w = 1.0 - u - v;
                if u.min(v).min(w) < 1e-3 || t < 1e-3 {
                    continue;
                }
            } else {
                let (t, u, v) = match reference_intersect_unclipped(&ray, a, b, c) {
                    Some(r) => r,
                    None => (0.0, 0.5, 0.5),
                };
                let w = 1.0 - u - v;
                if (u.abs().min(v.abs()).min(w.abs()) < 1e-3) || t.abs() < 1e-3 {
                    continue;
                }
            }

            let hit = mesh.intersect_local(ray);
            match (expected, hit) {
                (Some((t, u, v)), Some(hit)) => {
                    hits += 1;
                    assert_abs_diff_eq!(hit.t, t, epsilon = 1e-3 * t.max(1.0));
                    assert_abs_diff_eq!(hit.bary[1], u, epsilon = 1e-3);
                    assert_abs_diff_eq!(hit.bary[2], v, epsilon = 1e-3);
                    assert_abs_diff_eq!(hit.p, ray.point(t), epsilon = 1e-3);
                }
                (None, None) => misses += 1,
                (expected, hit) => panic!(
                    "Mismatch for {:?} with ({:?}, {:?}, {:?}): expected {:?}, got {:?}",
                    ray,
                    a,
                    b,
                    c,
                    expected,
                    hit.map(|h| h.t)
                ),
            }
        }
        assert!(hits > 300, "Only {} hits", hits);
        assert!(misses > 300, "Only {} misses", misses);
    }

    // Plane crossing and barycentrics without the inside and front checks
    fn reference_intersect_unclipped(
        ray: &Ray<f32>,
        a: Point3<f32>,
        b: Point3<f32>,
        c: Point3<f32>,
    ) -> Option<(f32, f32, f32)> {
        let e1 = b - a;
        let e2 = c - a;
        let p = ray.d.cross(e2);
        let det = e1.dot(p);
        if det.abs() < 1e-8 {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = ray.o - a;
        let q = s.cross(e1);
        Some((
            e2.dot(q) * inv_det,
            s.dot(p) * inv_det,
            ray.d.dot(q) * inv_det,
        ))
    }

    #[test]
    fn closest_face() {
        let mesh = Mesh::from_triangles(
            vec![
                point3(-1.0, -1.0, 0.0),
                point3(1.0, -1.0, 0.0),
                point3(0.0, 1.0, 0.0),
                point3(-1.0, -1.0, -1.0),
                point3(1.0, -1.0, -1.0),
                point3(0.0, 1.0, -1.0),
            ],
            // Far face first
            &[[3, 4, 5], [0, 1, 2]],
            Material::default(),
        )
        .unwrap();

        let ray = Ray::unbounded(point3(0.0, 0.0, 2.0), vec3(0.0, 0.0, -1.0));
        assert_abs_diff_eq!(mesh.intersect_local(ray).unwrap().t, 2.0);
        let ray = Ray::unbounded(point3(0.0, 0.0, -3.0), vec3(0.0, 0.0, 1.0));
        assert_abs_diff_eq!(mesh.intersect_local(ray).unwrap().t, 2.0);
    }

    #[test]
    fn degenerate_faces() {
        let mut mesh = Mesh::new(Material::default());
        mesh.add_vertex(point3(0.0, 0.0, 0.0));
        mesh.add_vertex(point3(1.0, 0.0, 0.0));
        mesh.add_vertex(point3(2.0, 0.0, 0.0));
        mesh.add_vertex(point3(0.0, 1.0, 0.0));

        // Collinear and repeated vertices are dropped
        assert_eq!(mesh.add_face(0, 1, 2), Ok(false));
        assert_eq!(mesh.add_face(0, 0, 3), Ok(false));
        assert_eq!(mesh.add_face(0, 1, 3), Ok(true));
        assert_eq!(mesh.faces().len(), 1);
    }

    #[test]
    fn sliver_faces() {
        // Large enough area but the barycentric solve rounds to a zero determinant
        let mesh = Mesh::from_triangles(
            vec![
                point3(0.0, 0.0, 0.0),
                point3(1.0, 0.0, 0.0),
                point3(1.0, 1e-6, 0.0),
                point3(5.0, 5.0, 0.0),
                point3(6.0, 5.0, 0.0),
                point3(5.0, 6.0, 0.0),
            ],
            &[[0, 1, 2], [3, 4, 5]],
            Material::default(),
        )
        .unwrap();
        assert_eq!(mesh.faces().len(), 1);
        assert_eq!(mesh.faces()[0].ids, [3, 4, 5]);

        // The plane outside both faces
        let miss = Ray::unbounded(point3(2.0, 0.0, 1.0), vec3(0.0, 0.0, -1.0));
        assert!(mesh.intersect_local(miss).is_none());
        let miss = Ray::unbounded(point3(0.5, 0.0, 1.0), vec3(0.0, 0.0, -1.0));
        assert!(mesh.intersect_local(miss).is_none());

        let hit = Ray::unbounded(point3(5.25, 5.25, 1.0), vec3(0.0, 0.0, -1.0));
        let hit = mesh.intersect_local(hit).unwrap();
        assert_abs_diff_eq!(hit.t, 1.0, epsilon = 1e-6);
        assert!(hit.bary.iter().all(|b| b.is_finite() && *b >= 0.0));
    }

    #[test]
    fn face_index_out_of_range() {
        let mut mesh = Mesh::new(Material::default());
        mesh.add_vertex(point3(0.0, 0.0, 0.0));
        mesh.add_vertex(point3(1.0, 0.0, 0.0));
        mesh.add_vertex(point3(0.0, 1.0, 0.0));
        assert_eq!(
            mesh.add_face(0, 1, 3),
            Err(MeshError::FaceIndexOutOfRange {
                index: 3,
                vertices: 3
            })
        );

        let result = Mesh::from_triangles(
            vec![point3(0.0, 0.0, 0.0)],
            &[[0, 1, 2]],
            Material::default(),
        );
        assert!(matches!(
            result,
            Err(MeshError::FaceIndexOutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn validate() {
        let mut mesh = single_triangle(
            point3(0.0, 0.0, 0.0),
            point3(1.0, 0.0, 0.0),
            point3(0.0, 1.0, 0.0),
        );
        assert_eq!(mesh.validate(), Ok(()));

        mesh.add_normal(normal(0.0, 0.0, 1.0));
        assert_eq!(
            mesh.validate(),
            Err(MeshError::WrongNormalCount {
                normals: 1,
                vertices: 3
            })
        );
        mesh.add_normal(normal(0.0, 0.0, 1.0));
        mesh.add_normal(normal(0.0, 0.0, 1.0));
        assert_eq!(mesh.validate(), Ok(()));

        mesh.add_material(Material::default());
        mesh.add_material(Material::default());
        assert_eq!(
            mesh.validate(),
            Err(MeshError::WrongMaterialCount {
                materials: 2,
                vertices: 3
            })
        );
        mesh.add_material(Material::default());
        assert_eq!(mesh.validate(), Ok(()));

        // Errors read like errors
        let why = MeshError::WrongNormalCount {
            normals: 1,
            vertices: 3,
        };
        assert!(why.to_string().contains("1 normals"));
    }

    #[test]
    fn generate_normals() {
        // Two faces folded 90 degrees along the x-axis and a loose vertex
        let mut mesh = Mesh::from_triangles(
            vec![
                point3(0.0, 0.0, 0.0),
                point3(1.0, 0.0, 0.0),
                point3(0.0, 1.0, 0.0),
                point3(0.0, 0.0, 1.0),
                point3(5.0, 5.0, 5.0),
            ],
            &[[0, 1, 2], [0, 3, 1]],
            Material::default(),
        )
        .unwrap();
        mesh.generate_normals();

        let normals = mesh.normals();
        assert_eq!(normals.len(), 5);
        assert_abs_diff_eq!(normals[2], normal(0.0, 0.0, 1.0));
        assert_abs_diff_eq!(normals[3], normal(0.0, 1.0, 0.0));
        // Shared vertices average the adjacent faces
        assert_abs_diff_eq!(normals[0], normal(0.0, 0.5, 0.5));
        assert_abs_diff_eq!(normals[1], normal(0.0, 0.5, 0.5));
        assert_abs_diff_eq!(normals[4], normal(0.0, 0.0, 0.0));
        assert_eq!(mesh.validate(), Ok(()));

        // Hits interpolate the vertex normals
        let ray = Ray::unbounded(point3(0.5, 0.01, 1.0), vec3(0.0, 0.0, -1.0));
        let hit = mesh.intersect_local(ray).unwrap();
        assert_abs_diff_eq!(hit.n.len(), 1.0, epsilon = 1e-6);
        assert!(hit.n.y > 0.0 && hit.n.z > hit.n.y);
    }

    #[test]
    fn vertex_materials() {
        let mut mesh = single_triangle(
            point3(0.0, 0.0, 0.0),
            point3(3.0, 0.0, 0.0),
            point3(0.0, 3.0, 0.0),
        );
        mesh.add_material(Material::diffuse(spectrum(1.0, 0.0, 0.0)));
        mesh.add_material(Material::diffuse(spectrum(0.0, 1.0, 0.0)));
        mesh.add_material(Material::diffuse(spectrum(0.0, 0.0, 1.0)));
        assert_eq!(mesh.validate(), Ok(()));

        // Through the centroid
        let ray = Ray::unbounded(point3(1.0, 1.0, 1.0), vec3(0.0, 0.0, -1.0));
        let hit = mesh.intersect_local(ray).unwrap();
        let third = 1.0 / 3.0;
        assert_abs_diff_eq!(hit.material.kd, spectrum(third, third, third), epsilon = 1e-5);

        // Next to a vertex
        let ray = Ray::unbounded(point3(2.9, 0.05, 1.0), vec3(0.0, 0.0, -1.0));
        let hit = mesh.intersect_local(ray).unwrap();
        assert!(hit.material.kd.g > 0.9);
    }

    #[test]
    fn bounds() {
        let mesh = single_triangle(
            point3(0.0, -1.0, 0.0),
            point3(3.0, 0.0, 2.0),
            point3(0.0, 3.0, 0.0),
        );
        let bb = mesh.local_bound();
        assert_eq!(bb.p_min, point3(0.0, -1.0, 0.0));
        assert_eq!(bb.p_max, point3(3.0, 3.0, 2.0));
        assert_eq!(mesh.face_bound(0), bb);
    }
}
