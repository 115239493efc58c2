//! Tests for polygon label lines.

use crate::format::{FormatError, LabelLine, decode_labels};
use crate::model::{Point, Polygon};

fn triangle() -> Polygon {
    Polygon::new(
        vec![
            Point::new(20.0, 10.0),
            Point::new(180.0, 10.0),
            Point::new(100.0, 90.0),
        ],
        1,
    )
}

#[test]
fn test_polygon_line_normalization() {
    let line = triangle().encode(200.0, 100.0).unwrap();
    assert_eq!(
        line,
        "1 0.100000 0.100000 0.900000 0.100000 0.500000 0.900000"
    );
}

#[test]
fn test_polygon_line_decodes_to_pixels() {
    let poly = Polygon::decode(
        "1 0.100000 0.100000 0.900000 0.100000 0.500000 0.900000",
        200.0,
        100.0,
    )
    .unwrap();
    assert_eq!(poly.class_id, 1);
    assert_eq!(poly.points.len(), 3);
    for (got, want) in poly.points.iter().zip(triangle().points.iter()) {
        assert!(got.distance_to(want) < 0.01, "{:?} != {:?}", got, want);
    }
}

#[test]
fn test_polygon_line_field_counts() {
    // Two points only
    let err = Polygon::decode("0 0.1 0.1 0.2 0.2", 100.0, 100.0).unwrap_err();
    assert!(matches!(err, FormatError::FieldCount { found: 5, .. }));

    // Dangling coordinate
    let err = Polygon::decode("0 0.1 0.1 0.2 0.2 0.3 0.3 0.4", 100.0, 100.0).unwrap_err();
    assert!(matches!(err, FormatError::FieldCount { found: 8, .. }));

    // Four points is fine
    let poly = Polygon::decode("0 0.1 0.1 0.2 0.1 0.2 0.2 0.1 0.2", 100.0, 100.0).unwrap();
    assert_eq!(poly.points.len(), 4);
}

#[test]
fn test_polygon_line_non_numeric() {
    assert!(Polygon::decode("0 0.1 0.1 0.2 x 0.3 0.3", 100.0, 100.0).is_err());
    assert!(Polygon::decode("a 0.1 0.1 0.2 0.2 0.3 0.3", 100.0, 100.0).is_err());
}

#[test]
fn test_polygon_non_finite_not_encoded() {
    let mut poly = triangle();
    poly.points[1].y = f32::NAN;
    assert_eq!(poly.encode(200.0, 100.0), None);
}

#[test]
fn test_polygon_file_skips_bad_lines() {
    let content = "0 0.1 0.1 0.2 0.1 0.2 0.2\n0 0.1 0.1\n2 0.5 0.5 0.6 0.5 0.6 0.6 0.5 0.6\n";
    let polys: Vec<Polygon> = decode_labels(content, 100, 100);
    assert_eq!(polys.len(), 2);
    assert_eq!(polys[1].class_id, 2);
    assert_eq!(polys[1].points.len(), 4);
}
