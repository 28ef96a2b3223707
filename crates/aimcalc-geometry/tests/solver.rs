use aimcalc_geometry::{
    MountGeometry, Orientation, OrientedBox, PlanePoint, Vec3, compute_base,
    compute_output_angles, compute_ray, compute_target,
};

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() < tol,
        "expected {expected}, got {actual} (tol {tol})"
    );
}

fn assert_vec_close(actual: Vec3, expected: Vec3, tol: f64) {
    assert_close(actual.x, expected.x, tol);
    assert_close(actual.y, expected.y, tol);
    assert_close(actual.z, expected.z, tol);
}

#[test]
fn ray_is_always_unit_length() {
    let mut eta = -400.0;
    while eta <= 400.0 {
        let mut theta = 0.0;
        while theta <= 180.0 {
            let ray = compute_ray(eta, 0.0, theta);
            assert_close(ray.dir.length(), 1.0, 1.0e-9);
            theta += 7.5;
        }
        eta += 13.0;
    }
}

#[test]
fn canonical_directions() {
    assert_vec_close(compute_ray(0.0, 0.0, 90.0).dir, Vec3::UNIT_X, 1.0e-9);
    assert_vec_close(compute_ray(0.0, 0.0, 0.0).dir, Vec3::UNIT_Z, 1.0e-9);
    assert_vec_close(compute_ray(0.0, 0.0, 180.0).dir, -Vec3::UNIT_Z, 1.0e-9);
    assert_vec_close(compute_ray(90.0, 0.0, 90.0).dir, Vec3::UNIT_Y, 1.0e-9);
}

#[test]
fn output_distance_round_trips() {
    let bases = [
        Vec3::ZERO,
        Vec3::new(1338.0, -5.0, 0.0),
        Vec3::new(-2500.0, 780.0, 1200.0),
    ];
    let angles = [(0.0, 0.0, 90.0), (12.0, 3.5, 45.0), (-170.0, 20.0, 135.0), (5.0, 5.0, 0.0)];
    let distances = [0.0, 1.0, 1000.0, 18_500.0];
    for base in bases {
        for (eps, alpha, theta) in angles {
            let ray = compute_ray(eps, alpha, theta);
            for v in distances {
                let target = compute_target(base, &ray, v);
                let out = compute_output_angles(base, target, alpha);
                assert_close(out.distance, v, 1.0e-6);
            }
        }
    }
}

#[test]
fn recovered_eps_matches_input_for_non_vertical_rays() {
    let base = Vec3::new(100.0, 200.0, 300.0);
    let ray = compute_ray(25.0, 10.0, 60.0);
    let out = compute_output_angles(base, compute_target(base, &ray, 500.0), 10.0);
    assert!(out.valid);
    assert_close(out.eta_deg, 15.0, 1.0e-9);
    assert_close(out.theta_deg, 60.0, 1.0e-9);
    assert_close(out.elev_deg, 30.0, 1.0e-9);
    assert_close(out.eps_deg, 25.0, 1.0e-9);
}

#[test]
fn coincident_points_are_invalid_not_fatal() {
    let p = Vec3::new(12.0, -4.0, 9.0);
    let out = compute_output_angles(p, p, 33.0);
    assert!(!out.valid);
    assert_eq!(out.distance, 0.0);
    assert_eq!(out.eta_deg, 0.0);
    assert_eq!(out.theta_deg, 0.0);
    assert_eq!(out.eps_deg, 0.0);
}

#[test]
fn reference_mount_scenario() {
    let mount = MountGeometry {
        flr: Vec3::new(5638.0, 0.0, 0.0),
        d1_left: PlanePoint::new(-4300.0, 1245.0),
        d1_right: PlanePoint::new(-4300.0, -1255.0),
    };
    let solved = compute_base(&mount, 0.0);
    assert_eq!(solved.center, PlanePoint::new(-4300.0, -5.0));
    assert_vec_close(solved.base, Vec3::new(1338.0, -5.0, 0.0), 1.0e-9);

    let ray = compute_ray(0.0, 0.0, 90.0);
    let target = compute_target(solved.base, &ray, 1000.0);
    assert_vec_close(target, Vec3::new(2338.0, -5.0, 0.0), 1.0e-9);

    let out = compute_output_angles(solved.base, target, 0.0);
    assert!(out.valid);
    assert_close(out.distance, 1000.0, 1.0e-9);
    assert_close(out.eta_deg, 0.0, 1.0e-9);
    assert_close(out.theta_deg, 90.0, 1.0e-9);
    assert_close(out.elev_deg, 0.0, 1.0e-9);
    assert_close(out.eps_deg, 0.0, 1.0e-9);
}

#[test]
fn unrotated_box_is_axis_aligned() {
    let center = Vec3::new(1000.0, 0.0, 400.0);
    let solid = OrientedBox {
        center,
        size: Vec3::new(900.0, 600.0, 500.0),
        orientation: Orientation::default(),
    };
    let verts = solid.vertices();
    for v in verts {
        let local = v - center;
        assert_close(local.x.abs(), 450.0, 1.0e-9);
        assert_close(local.y.abs(), 300.0, 1.0e-9);
        assert_close(local.z.abs(), 250.0, 1.0e-9);
    }
    let mut signs: Vec<(bool, bool, bool)> = verts
        .iter()
        .map(|v| (v.x > center.x, v.y > center.y, v.z > center.z))
        .collect();
    signs.sort();
    signs.dedup();
    assert_eq!(signs.len(), 8);
}

#[test]
fn yaw_only_box_is_a_pure_z_rotation() {
    let center = Vec3::new(-50.0, 75.0, 10.0);
    let size = Vec3::new(400.0, 200.0, 100.0);
    let yaw = 33.0_f64;
    let rotated = OrientedBox {
        center,
        size,
        orientation: Orientation::from_degrees(yaw, 0.0, 0.0),
    }
    .vertices();
    let aligned = OrientedBox {
        center,
        size,
        orientation: Orientation::default(),
    }
    .vertices();
    let (s, c) = yaw.to_radians().sin_cos();
    for (r, a) in rotated.iter().zip(aligned.iter()) {
        // heights are untouched
        assert_close(r.z, a.z, 1.0e-9);
        let local = *a - center;
        let expected = Vec3::new(local.x * c - local.y * s, local.x * s + local.y * c, local.z);
        assert_vec_close(*r - center, expected, 1.0e-9);
    }
}
