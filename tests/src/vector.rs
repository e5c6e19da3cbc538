#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_abs_diff_ne, assert_relative_eq, assert_relative_ne};
    use std::panic;

    use tsuki::math::{normal, point3, vec2, vec3, Normal, Point3, Vec2, Vec3};

    // The component-wise impls are generated by the same macros for every vector-like type so
    // Vec2 and Vec3 stand in for the rest here.

    #[test]
    fn new() {
        let v = Vec2::new(0.0, 1.0);
        assert_eq!(v.x, 0.0);
        assert_eq!(v.y, 1.0);
        assert_eq!(vec2(0.0, 1.0), v);

        let v = Vec3::new(0.0, 1.0, 2.0);
        assert_eq!(v.x, 0.0);
        assert_eq!(v.y, 1.0);
        assert_eq!(v.z, 2.0);
        assert_eq!(vec3(0.0, 1.0, 2.0), v);
    }

    #[test]
    fn zeros() {
        assert_eq!(Vec2::zeros(), Vec2::new(0, 0));
        assert_eq!(Vec3::zeros(), Vec3::new(0, 0, 0));
    }

    #[test]
    fn ones() {
        assert_eq!(Vec2::ones(), Vec2::new(1, 1));
        assert_eq!(Vec3::ones(), Vec3::new(1, 1, 1));
    }

    #[test]
    fn has_nans() {
        let result = panic::catch_unwind(|| Vec2::new(f32::NAN, 0.0));
        assert!(result.is_err());
        let result = panic::catch_unwind(|| Vec2::new(0.0, f32::NAN));
        assert!(result.is_err());

        let result = panic::catch_unwind(|| Vec3::new(0.0, 0.0, f32::NAN));
        assert!(result.is_err());

        let result = panic::catch_unwind(|| vec3(f32::NAN, 0.0, 0.0));
        assert!(result.is_err());
    }

    #[test]
    fn dot() {
        assert_eq!(Vec2::new(2, 3).dot(Vec2::new(4, 5)), 2 * 4 + 3 * 5);
        assert_eq!(
            Vec3::new(2, 3, 4).dot(Vec3::new(5, 6, 7)),
            2 * 5 + 3 * 6 + 4 * 7
        );
        assert_eq!(
            Vec3::new(2.0, 3.0, 4.0).dot_n(Normal::new(5.0, 6.0, 7.0)),
            2.0 * 5.0 + 3.0 * 6.0 + 4.0 * 7.0
        );
    }

    #[test]
    fn cross() {
        assert_eq!(
            Vec3::new(2.0, 3.0, 4.0).cross(Vec3::new(5.0, 6.0, -7.0)),
            Vec3::new(-45.0, 34.0, -3.0)
        );
        // Right-handed
        assert_eq!(
            vec3(1.0, 0.0, 0.0).cross(vec3(0.0, 1.0, 0.0)),
            vec3(0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn len_sqr() {
        assert_eq!(Vec2::new(2, 3).len_sqr(), 2 * 2 + 3 * 3);
        assert_eq!(Vec3::new(2, 3, 4).len_sqr(), 2 * 2 + 3 * 3 + 4 * 4);
    }

    #[test]
    fn len() {
        assert_abs_diff_eq!(
            Vec3::new(2.0, 3.0, 4.0).len(),
            (2.0f32 * 2.0f32 + 3.0f32 * 3.0f32 + 4.0f32 * 4.0f32).sqrt()
        );
    }

    #[test]
    fn normalized() {
        assert_abs_diff_eq!(Vec3::new(1.0, 1.0, 1.0).normalized().len(), 1.0);
        assert_abs_diff_eq!(
            Vec3::new(0.0, -2.0, 0.0).normalized(),
            vec3(0.0, -1.0, 0.0)
        );
    }

    #[test]
    fn abs() {
        assert_eq!(vec3(-1.0, 2.0, -3.0).abs(), vec3(1.0, 2.0, 3.0));
    }

    #[test]
    fn reflected() {
        let n = normal(0.0, 1.0, 0.0);
        assert_abs_diff_eq!(vec3(1.0, -1.0, 0.0).reflected(n), vec3(1.0, 1.0, 0.0));
        // Side of the normal doesn't matter
        assert_abs_diff_eq!(
            vec3(1.0, -1.0, 0.5).reflected(-n),
            vec3(1.0, 1.0, 0.5)
        );
        // Head-on bounces straight back
        assert_abs_diff_eq!(vec3(0.0, -1.0, 0.0).reflected(n), vec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn mul_elem() {
        assert_eq!(
            Vec3::new(1, 2, 3).mul_elem(Vec3::new(4, 5, 6)),
            Vec3::new(4, 10, 18)
        );
    }

    #[test]
    fn min() {
        let a = Vec2::new(0, 2);
        let b = Vec2::new(3, 1);
        assert_eq!(a.min(b), Vec2::new(0, 1));
        assert_eq!(a.min(b), b.min(a));

        let a = Vec3::new(0, 2, 4);
        let b = Vec3::new(3, 1, 5);
        assert_eq!(a.min(b), Vec3::new(0, 1, 4));
        assert_eq!(a.min(b), b.min(a));
    }

    #[test]
    fn max() {
        let a = Vec2::new(0, 2);
        let b = Vec2::new(3, 1);
        assert_eq!(a.max(b), Vec2::new(3, 2));
        assert_eq!(a.max(b), b.max(a));

        let a = Vec3::new(0, 2, 4);
        let b = Vec3::new(3, 1, 5);
        assert_eq!(a.max(b), Vec3::new(3, 2, 5));
        assert_eq!(a.max(b), b.max(a));
    }

    #[test]
    fn min_comp() {
        assert_eq!(Vec3::new(0.0, 1.0, 2.0).min_comp(), 0.0);
        assert_eq!(Vec3::new(1.0, -1.0, 2.0).min_comp(), -1.0);
        assert_eq!(Vec3::new(1.0, 1.0, -2.0).min_comp(), -2.0);
    }

    #[test]
    fn max_comp() {
        assert_eq!(Vec3::new(0.0, 1.0, 2.0).max_comp(), 2.0);
        assert_eq!(Vec3::new(0.0, 3.0, 2.0).max_comp(), 3.0);
        assert_eq!(Vec3::new(4.0, 3.0, 2.0).max_comp(), 4.0);
    }

    #[test]
    fn max_dimension() {
        assert_eq!(Vec3::new(0.0, 1.0, 2.0).max_dimension(), 2);
        assert_eq!(Vec3::new(0.0, 3.0, 2.0).max_dimension(), 1);
        assert_eq!(Vec3::new(4.0, 3.0, 2.0).max_dimension(), 0);
    }

    #[test]
    fn from() {
        assert_eq!(Vec2::from(2), Vec2::new(2, 2));
        assert_eq!(Vec3::from(2), Vec3::new(2, 2, 2));

        assert_eq!(
            Vec3::from(Normal::new(1.0, 2.0, 3.0)),
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(
            Vec3::from(Point3::new(1.0, 2.0, 3.0)),
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(Vec3::from(point3(1, 2, 3)), Vec3::new(1, 2, 3));
    }

    #[test]
    fn index() {
        let v = Vec2::new(0.0, 1.0);
        assert_eq!(v.x, v[0]);
        assert_eq!(v.y, v[1]);

        let v = Vec3::new(0.0, 1.0, 2.0);
        assert_eq!(v.x, v[0]);
        assert_eq!(v.y, v[1]);
        assert_eq!(v.z, v[2]);

        let mut v = Vec3::zeros();
        v[0] = 1.0;
        v[2] = 2.0;
        assert_eq!(v, Vec3::new(1.0, 0.0, 2.0));

        let result = panic::catch_unwind(|| Vec3::new(0, 1, 2)[3]);
        assert!(result.is_err());
    }

    #[test]
    fn neg() {
        assert_eq!(-Vec2::new(1, 2), Vec2::new(-1, -2));
        assert_eq!(-Vec3::new(1, 2, 3), Vec3::new(-1, -2, -3));
    }

    #[test]
    fn add() {
        assert_eq!(Vec2::new(1, 2) + Vec2::new(4, 6), Vec2::new(5, 8));
        assert_eq!(Vec3::new(1, 2, 3) + Vec3::new(4, 6, 7), Vec3::new(5, 8, 10));
    }

    #[test]
    fn sub() {
        assert_eq!(Vec2::new(5, 5) - Vec2::new(1, 2), Vec2::new(4, 3));
        assert_eq!(Vec3::new(7, 7, 7) - Vec3::new(1, 2, 3), Vec3::new(6, 5, 4));
    }

    #[test]
    fn mul() {
        assert_eq!(Vec2::new(2, 3) * 4, Vec2::new(8, 12));
        assert_eq!(Vec3::new(2, 3, 4) * 5, Vec3::new(10, 15, 20));
    }

    #[test]
    fn div() {
        assert_eq!(Vec2::new(8, 12) / 4, Vec2::new(2, 3));
        assert_eq!(Vec3::new(10, 15, 20) / 5, Vec3::new(2, 3, 4));
    }

    #[test]
    fn assign_ops() {
        let mut v = Vec3::new(1, 2, 3);
        v += Vec3::new(4, 6, 7);
        assert_eq!(v, Vec3::new(5, 8, 10));
        v -= Vec3::new(1, 2, 3);
        assert_eq!(v, Vec3::new(4, 6, 7));
        v *= 2;
        assert_eq!(v, Vec3::new(8, 12, 14));
        v /= 2;
        assert_eq!(v, Vec3::new(4, 6, 7));

        let mut v = Vec2::new(1, 2);
        v += Vec2::new(4, 6);
        v -= Vec2::new(1, 1);
        assert_eq!(v, Vec2::new(4, 7));
    }

    #[test]
    fn abs_diff_eq() {
        assert_abs_diff_eq!(&Vec2::<f32>::zeros(), &Vec2::<f32>::zeros());
        assert_abs_diff_ne!(&Vec2::<f32>::zeros(), &Vec2::<f32>::ones());

        // Should fail on diff in any coordinate if no epsilon is given
        assert_abs_diff_ne!(&Vec3::new(0.0, 1.0, 0.0), &Vec3::zeros());
        assert_abs_diff_ne!(&Vec3::new(0.0, 0.0, 1.0), &Vec3::zeros());

        assert_abs_diff_eq!(&Vec2::new(1.0, 1.0), &Vec2::zeros(), epsilon = 1.0);
    }

    #[test]
    fn relative_eq() {
        assert_relative_eq!(&Vec2::<f32>::zeros(), &Vec2::<f32>::zeros());
        assert_relative_ne!(&Vec2::<f32>::zeros(), &Vec2::<f32>::ones());

        assert_relative_ne!(&Vec3::new(1.0, 0.0, 0.0), &Vec3::zeros());

        assert_relative_eq!(&Vec2::new(1.0, 1.0), &Vec2::zeros(), epsilon = 1.0);
        assert_relative_eq!(
            &Vec2::new(2.0, 2.0),
            &Vec2::ones(),
            epsilon = 0.0,
            max_relative = 0.5
        );
    }
}
