use super::*;

#[test]
fn remove_duplicates_collapses_repeats() {
    let pts = vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(2.0, 0.0),
    ];
    let out = remove_duplicates(&pts);
    assert_eq!(
        out,
        vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)]
    );
}

#[test]
fn remove_duplicates_short_input_passthrough() {
    let pts = vec![Point::new(1.0, 1.0)];
    assert_eq!(remove_duplicates(&pts), pts);
    let empty: Vec<Point> = vec![];
    assert_eq!(remove_duplicates(&empty), empty);
}

#[test]
fn linearize_rejects_bad_input() {
    assert!(linearize(&[], 1.0).is_err());
    let pts = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
    assert!(linearize(&pts, 0.0).is_err());
}

#[test]
fn linearize_produces_uniform_spacing_on_straight_line() {
    let pts = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
    let out = linearize(&pts, 2.0).unwrap();
    assert_eq!(out.first().unwrap(), &Point::new(0.0, 0.0));
    assert_eq!(out.last().unwrap(), &Point::new(10.0, 0.0));
    for pair in out.windows(2) {
        let d = pair[0].distance_to(pair[1]);
        assert!(d <= 2.0 + 1e-9);
    }
}

#[test]
fn linearize_single_segment_shorter_than_md() {
    let pts = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
    let out = linearize(&pts, 5.0).unwrap();
    assert_eq!(out, vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
}

#[test]
fn rdp_reduce_keeps_corner_drops_colinear() {
    let pts = vec![
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(2.0, 0.0),
        Point::new(3.0, 0.0),
        Point::new(3.0, 3.0),
    ];
    let out = rdp_reduce(&pts, 0.01).unwrap();
    assert_eq!(out.first().unwrap(), &Point::new(0.0, 0.0));
    assert_eq!(out.last().unwrap(), &Point::new(3.0, 3.0));
    assert!(out.len() < pts.len());
}

#[test]
fn rdp_reduce_rejects_empty() {
    assert!(rdp_reduce(&[], 0.1).is_err());
}

#[test]
fn rdp_reduce_short_input_passthrough() {
    let pts = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
    let out = rdp_reduce(&pts, 0.1).unwrap();
    assert_eq!(out, pts);
}
