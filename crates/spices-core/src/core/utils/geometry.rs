use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};
use rand::Rng;
use std::f64::consts::{FRAC_PI_2, PI};

/// Arithmetic mean of `points`, `None` for an empty slice.
pub fn center(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Largest pairwise distance between `points`.
pub fn diameter(points: &[Point3<f64>]) -> f64 {
    let mut longest = 0.0f64;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            longest = longest.max(nalgebra::distance(a, b));
        }
    }
    longest
}

/// Uniformly distributed random rotation.
///
/// Follows the subgroup algorithm; the third and fourth sampled components are
/// stored as `z = w'` and `w = z'`, which keeps seeded orientations stable
/// across versions.
pub fn random_quaternion(rng: &mut impl Rng) -> Quaternion<f64> {
    let u1: f64 = rng.r#gen();
    let u2: f64 = rng.r#gen();
    let u3: f64 = rng.r#gen();

    let root = u1.sqrt();
    let root_complement = (1.0 - u1).sqrt();
    let x = root_complement * (2.0 * PI * u2).sin();
    let y = root_complement * (2.0 * PI * u2).cos();
    let z = root * (2.0 * PI * u3).sin();
    let w = root * (2.0 * PI * u3).cos();

    Quaternion::new(z, x, y, w)
}

/// Euler angles (heading about y, attitude about z, bank about x) of `q`.
///
/// The returned vector holds bank in `x`, heading in `y` and attitude in `z`.
pub fn quaternion_to_euler(q: &Quaternion<f64>) -> Vector3<f64> {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);
    let sqw = w * w;
    let sqx = x * x;
    let sqy = y * y;
    let sqz = z * z;
    let unit = sqx + sqy + sqz + sqw;
    let test = x * y + z * w;

    // Singularities at the poles.
    if test > 0.499 * unit {
        return Vector3::new(0.0, 2.0 * x.atan2(w), FRAC_PI_2);
    }
    if test < -0.499 * unit {
        return Vector3::new(0.0, -2.0 * x.atan2(w), -FRAC_PI_2);
    }

    let heading = (2.0 * y * w - 2.0 * x * z).atan2(sqx - sqy - sqz + sqw);
    let attitude = (2.0 * test / unit).asin();
    let bank = (2.0 * x * w - 2.0 * y * z).atan2(-sqx + sqy - sqz + sqw);
    Vector3::new(bank, heading, attitude)
}

/// Inverse of [`quaternion_to_euler`], angles in radians.
pub fn euler_to_quaternion(angles: &Vector3<f64>) -> Quaternion<f64> {
    let (c1, s1) = ((angles.y / 2.0).cos(), (angles.y / 2.0).sin());
    let (c2, s2) = ((angles.z / 2.0).cos(), (angles.z / 2.0).sin());
    let (c3, s3) = ((angles.x / 2.0).cos(), (angles.x / 2.0).sin());
    let c1c2 = c1 * c2;
    let s1s2 = s1 * s2;
    Quaternion::new(
        c1c2 * c3 - s1s2 * s3,
        c1c2 * s3 + s1s2 * c3,
        s1 * c2 * c3 + c1 * s2 * s3,
        c1 * s2 * c3 - s1 * c2 * s3,
    )
}

/// Places `points` inside a sphere of `radius` around `target`.
///
/// The points are centered on the origin, optionally rotated, scaled so that
/// their diameter becomes `2 * radius` and finally moved onto `target`. The
/// rotation is given in the viewer frame and is applied with its Euler angles
/// remapped to `(x, -z, y)`.
pub fn fit_into_sphere(
    points: &[Point3<f64>],
    target: &Point3<f64>,
    radius: f64,
    rotation: Option<&Quaternion<f64>>,
) -> Vec<Point3<f64>> {
    let Some(origin) = center(points) else {
        return Vec::new();
    };
    let mut moved: Vec<Point3<f64>> = points
        .iter()
        .map(|p| Point3::from(p - origin))
        .collect();

    if let Some(rotation) = rotation {
        let angles = quaternion_to_euler(rotation);
        let remapped = Vector3::new(angles.x, -angles.z, angles.y);
        let rotation = UnitQuaternion::from_quaternion(euler_to_quaternion(&remapped));
        for p in moved.iter_mut() {
            *p = rotation * *p;
        }
    }

    let extent = diameter(&moved);
    if extent > 0.0 {
        let ratio = 2.0 * radius / extent;
        for p in moved.iter_mut() {
            p.coords *= ratio;
        }
    }

    let shift = match center(&moved) {
        Some(current) => target - current,
        None => Vector3::zeros(),
    };
    moved.into_iter().map(|p| p + shift).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EPS: f64 = 1e-9;

    fn assert_vec_eq(a: &Vector3<f64>, b: &Vector3<f64>) {
        assert!((a - b).norm() < EPS, "{:?} != {:?}", a, b);
    }

    #[test]
    fn center_of_empty_slice_is_none() {
        assert!(center(&[]).is_none());
        let c = center(&[Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, -2.0)]).unwrap();
        assert_eq!(c, Point3::new(1.0, 2.0, -1.0));
    }

    #[test]
    fn diameter_is_longest_pairwise_distance() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ];
        assert!((diameter(&points) - 5.0).abs() < EPS);
        assert_eq!(diameter(&points[..1]), 0.0);
    }

    #[test]
    fn euler_angles_survive_quaternion_round_trip() {
        let angles = Vector3::new(0.3, -0.7, 0.4);
        let q = euler_to_quaternion(&angles);
        assert!((q.norm() - 1.0).abs() < EPS);
        assert_vec_eq(&quaternion_to_euler(&q), &angles);
    }

    #[test]
    fn identity_quaternion_has_zero_angles() {
        assert_vec_eq(&quaternion_to_euler(&Quaternion::identity()), &Vector3::zeros());
    }

    #[test]
    fn pole_singularity_is_handled() {
        let q = euler_to_quaternion(&Vector3::new(0.0, 0.0, FRAC_PI_2));
        let angles = quaternion_to_euler(&q);
        assert!((angles.z - FRAC_PI_2).abs() < 1e-6);
        assert_eq!(angles.x, 0.0);
    }

    #[test]
    fn random_quaternions_are_unit_and_seed_stable() {
        let mut first = StdRng::seed_from_u64(1);
        let mut second = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            let q = random_quaternion(&mut first);
            assert!((q.norm() - 1.0).abs() < EPS);
            assert_eq!(q, random_quaternion(&mut second));
        }
    }

    #[test]
    fn fitted_points_span_the_requested_sphere() {
        let points = [
            Point3::new(10.0, 10.0, 10.0),
            Point3::new(14.0, 10.0, 10.0),
            Point3::new(12.0, 13.0, 10.0),
        ];
        let target = Point3::new(5.0, 5.0, 5.0);
        let rotation = euler_to_quaternion(&Vector3::new(0.2, 0.5, -0.3));
        let fitted = fit_into_sphere(&points, &target, 2.0, Some(&rotation));
        assert!((diameter(&fitted) - 4.0).abs() < 1e-9);
        let c = center(&fitted).unwrap();
        assert!((c - target).norm() < 1e-9);
    }

    #[test]
    fn single_point_moves_onto_target() {
        let fitted = fit_into_sphere(&[Point3::new(1.0, 2.0, 3.0)], &Point3::origin(), 5.0, None);
        assert_eq!(fitted, vec![Point3::origin()]);
    }
}
