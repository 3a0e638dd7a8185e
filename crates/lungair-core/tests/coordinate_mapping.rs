use lungair_core::spatial::{Direction3, Point3, Spacing3, Vector3};
use lungair_core::transform::{model_grid_to_ras, PlacementChain};
use lungair_core::ImageGeometry;
use nalgebra::Matrix2;
use proptest::prelude::*;

fn make_rotation(angle_x: f64, angle_y: f64, angle_z: f64) -> Direction3 {
    let cx = angle_x.cos(); let sx = angle_x.sin();
    let cy = angle_y.cos(); let sy = angle_y.sin();
    let cz = angle_z.cos(); let sz = angle_z.sin();

    let rz = nalgebra::Matrix3::new(
        cz, -sz, 0.0,
        sz, cz, 0.0,
        0.0, 0.0, 1.0,
    );
    let ry = nalgebra::Matrix3::new(
        cy, 0.0, sy,
        0.0, 1.0, 0.0,
        -sy, 0.0, cy,
    );
    let rx = nalgebra::Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, cx, -sx,
        0.0, sx, cx,
    );

    let mut rot = Direction3::identity();
    *rot.inner_mut() = rx * ry * rz;
    rot
}

/// Direction of a hardened PNG radiograph: i -> left, j -> inferior, k -> posterior.
fn hardened_png_direction() -> Direction3 {
    Direction3::from_columns([
        Vector3::new([-1.0, 0.0, 0.0]),
        Vector3::new([0.0, 0.0, -1.0]),
        Vector3::new([0.0, -1.0, 0.0]),
    ])
}

fn close(a: &Point3, b: &Point3, tol: f64) -> bool {
    (0..3).all(|i| (a[i] - b[i]).abs() < tol)
}

proptest! {
    #[test]
    fn test_stepwise_matches_composed_placement(
        ox in -100.0f64..100.0, oy in -100.0f64..100.0, oz in -100.0f64..100.0,
        sx in 0.1f64..5.0, sy in 0.1f64..5.0, sz in 0.1f64..5.0,
        ax in -3.14f64..3.14, ay in -3.14f64..3.14, az in -3.14f64..3.14,
        a00 in -4.0f64..4.0, a01 in -4.0f64..4.0, a10 in -4.0f64..4.0, a11 in -4.0f64..4.0,
        px in -50.0f64..50.0, py in -50.0f64..50.0, pz in -50.0f64..50.0
    ) {
        let direction = make_rotation(ax, ay, az);
        let geometry = ImageGeometry::new(
            Point3::new([ox, oy, oz]),
            Spacing3::new([sx, sy, sz]),
            direction,
        );
        let model_to_array = Matrix2::new(a00, a01, a10, a11);

        let chain = PlacementChain::compose(&model_to_array, &geometry.index_to_world(), &direction).unwrap();
        let point = Point3::new([px, py, pz]);

        let direct = chain.placement().transform_point(&point);
        let stepwise = chain.transform_point_stepwise(&point);
        prop_assert!(close(&direct, &stepwise, 1e-6), "{:?} vs {:?}", direct, stepwise);

        let recomposed = chain.recompose().unwrap();
        prop_assert!(recomposed.max_abs_diff(chain.placement()) < 1e-9);
    }

    #[test]
    fn test_placement_inverse_roundtrip(
        ox in -100.0f64..100.0, oy in -100.0f64..100.0, oz in -100.0f64..100.0,
        sx in 0.1f64..5.0, sy in 0.1f64..5.0, sz in 0.1f64..5.0,
        ax in -3.14f64..3.14, ay in -3.14f64..3.14, az in -3.14f64..3.14,
        scale_r in 0.1f64..8.0, scale_c in 0.1f64..8.0,
        px in -50.0f64..50.0, py in -50.0f64..50.0, pz in -50.0f64..50.0
    ) {
        let direction = make_rotation(ax, ay, az);
        let geometry = ImageGeometry::new(
            Point3::new([ox, oy, oz]),
            Spacing3::new([sx, sy, sz]),
            direction,
        );
        let chain = PlacementChain::compose(
            &Matrix2::new(scale_r, 0.0, 0.0, scale_c),
            &geometry.index_to_world(),
            &direction,
        ).unwrap();

        let point = Point3::new([px, py, pz]);
        let world = chain.placement().transform_point(&point);
        let back = chain.placement().inverse().unwrap().transform_point(&world);
        prop_assert!(close(&point, &back, 1e-4), "{:?} vs {:?}", point, back);
    }

    #[test]
    fn test_model_corners_land_on_image_corners(
        ox in -100.0f64..100.0, oy in -100.0f64..100.0, oz in -100.0f64..100.0,
        sx in 0.1f64..2.0, sy in 0.1f64..2.0,
        rows in 1usize..2048, cols in 1usize..2048,
        n in 1usize..512
    ) {
        let direction = hardened_png_direction();
        let geometry = ImageGeometry::new(
            Point3::new([ox, oy, oz]),
            Spacing3::new([sx, sy, 1.0]),
            direction,
        );
        let model_to_array = Matrix2::new(rows as f64 / n as f64, 0.0, 0.0, cols as f64 / n as f64);

        let chain = PlacementChain::compose(&model_to_array, &geometry.index_to_world(), &direction).unwrap();
        let model_to_world = model_grid_to_ras().then(chain.placement()).unwrap();

        let n = n as f64;
        for (r, c) in [(0.0, 0.0), (0.0, n), (n, 0.0), (n, n)] {
            let placed = model_to_world.transform_point(&Point3::new([r, c, 0.0]));
            // Model row follows image row (index j), model column follows image column (index i).
            let index = Point3::new([c / n * cols as f64, r / n * rows as f64, 0.0]);
            let expected = geometry.index_to_physical(&index);
            prop_assert!(close(&placed, &expected, 1e-6), "corner ({}, {}): {:?} vs {:?}", r, c, placed, expected);
        }
    }
}
