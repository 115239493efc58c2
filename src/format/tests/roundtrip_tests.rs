//! Save/load through real label files.

use crate::format::{LabelLayout, read_label_file, write_label_file};
use crate::model::{BoundingBox, LabelType, Point, Polygon};
use crate::test_image::scratch_dir;

#[test]
fn test_box_file_roundtrip() {
    let dir = scratch_dir("box-roundtrip");
    let layout = LabelLayout::new(&dir);
    layout.ensure_dirs(LabelType::Box).unwrap();

    let boxes = vec![
        BoundingBox::new(10.0, 10.0, 110.0, 60.0, 2),
        BoundingBox::new(0.0, 0.0, 200.0, 100.0, 0),
        BoundingBox::new(33.4, 12.6, 71.2, 48.9, 1),
    ];
    let path = layout.label_path(LabelType::Box, "frame.png");
    let report = write_label_file(&path, &boxes, 200, 100).unwrap();
    assert_eq!(report.written, 3);
    assert!(!report.has_skipped());

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content.lines().next(),
        Some("2 0.300000 0.350000 0.500000 0.500000")
    );

    let loaded: Vec<BoundingBox> = read_label_file(&path, 200, 100).unwrap();
    assert_eq!(loaded.len(), boxes.len());
    for (got, want) in loaded.iter().zip(boxes.iter()) {
        assert_eq!(got.class_id, want.class_id);
        assert!((got.x1 - want.x1).abs() <= 1.0);
        assert!((got.y1 - want.y1).abs() <= 1.0);
        assert!((got.x2 - want.x2).abs() <= 1.0);
        assert!((got.y2 - want.y2).abs() <= 1.0);
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_polygon_file_roundtrip() {
    let dir = scratch_dir("poly-roundtrip");
    let layout = LabelLayout::new(&dir);
    layout.ensure_dirs(LabelType::Polygon).unwrap();

    let polys = vec![
        Polygon::new(
            vec![
                Point::new(12.5, 8.25),
                Point::new(150.0, 20.0),
                Point::new(140.75, 90.5),
                Point::new(30.0, 70.0),
            ],
            3,
        ),
        Polygon::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(200.0, 0.0),
                Point::new(100.0, 100.0),
            ],
            0,
        ),
    ];
    let path = layout.label_path(LabelType::Polygon, "frame.png");
    write_label_file(&path, &polys, 200, 100).unwrap();

    let loaded: Vec<Polygon> = read_label_file(&path, 200, 100).unwrap();
    assert_eq!(loaded.len(), 2);
    for (got, want) in loaded.iter().zip(polys.iter()) {
        assert_eq!(got.class_id, want.class_id);
        assert_eq!(got.points.len(), want.points.len());
        for (a, b) in got.points.iter().zip(want.points.iter()) {
            assert!(a.distance_to(b) < 0.01);
        }
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_label_file_is_empty() {
    let dir = scratch_dir("missing-labels");
    let layout = LabelLayout::new(&dir);
    let path = layout.label_path(LabelType::Box, "nothing.png");

    let loaded: Vec<BoundingBox> = read_label_file(&path, 100, 100).unwrap();
    assert!(loaded.is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_write_without_dirs_fails() {
    let dir = scratch_dir("no-dirs");
    let layout = LabelLayout::new(dir.join("absent"));
    let path = layout.label_path(LabelType::Box, "frame.png");
    let boxes = vec![BoundingBox::new(1.0, 1.0, 20.0, 20.0, 0)];

    assert!(write_label_file(&path, &boxes, 100, 100).is_err());

    std::fs::remove_dir_all(&dir).ok();
}
