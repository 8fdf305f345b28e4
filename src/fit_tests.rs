use super::*;
use crate::point::Point;

fn straight_line(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| Point::new(i as f64, 0.0))
        .collect()
}

fn quarter_circle(n: usize, radius: f64) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let t = (i as f64 / (n - 1) as f64) * std::f64::consts::FRAC_PI_2;
            Point::new(radius * t.cos(), radius * t.sin())
        })
        .collect()
}

#[test]
fn fit_rejects_tiny_max_error() {
    let pts = straight_line(5);
    assert!(fit_curve_raw(&pts, 0.0).is_err());
}

#[test]
fn fit_empty_input_returns_empty() {
    assert_eq!(fit(&[], 1.0).unwrap(), Vec::new());
}

#[test]
fn fit_single_point_returns_no_segments() {
    let pts = vec![Point::new(1.0, 1.0)];
    let curves = fit_curve_raw(&pts, 0.5).unwrap();
    assert!(curves.is_empty());
}

#[test]
fn fit_two_points_produces_one_linear_segment() {
    let pts = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
    let curves = fit_curve_raw(&pts, 0.1).unwrap();
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].p0, pts[0]);
    assert_eq!(curves[0].p3, pts[1]);
}

#[test]
fn fit_straight_line_is_one_segment_within_error() {
    let pts = straight_line(50);
    let curves = fit_curve_raw(&pts, 0.01).unwrap();
    assert_eq!(curves.len(), 1);
    for p in &pts {
        let closest = (0..=100)
            .map(|i| curves[0].sample(i as f64 / 100.0))
            .map(|s| s.distance_to(*p))
            .fold(f64::INFINITY, f64::min);
        assert!(closest < 0.05, "point {p:?} too far from fitted curve");
    }
}

#[test]
fn fit_respects_error_bound_on_curved_input() {
    let pts = quarter_circle(80, 20.0);
    let max_error = 0.3;
    let curves = fit_curve_raw(&pts, max_error).unwrap();
    assert!(!curves.is_empty());

    for p in &pts {
        let mut best = f64::INFINITY;
        for c in &curves {
            for i in 0..=50 {
                let s = c.sample(i as f64 / 50.0);
                best = best.min(s.distance_to(*p));
            }
        }
        assert!(
            best < max_error * 3.0,
            "point {p:?} farther than expected from any fitted segment: {best}"
        );
    }
}

#[test]
fn fit_tightening_error_increases_segment_count() {
    let pts = quarter_circle(100, 50.0);
    let loose = fit_curve_raw(&pts, 5.0).unwrap();
    let tight = fit_curve_raw(&pts, 0.05).unwrap();
    assert!(tight.len() >= loose.len());
}

#[test]
fn fit_curves_are_c0_continuous() {
    let pts = quarter_circle(60, 30.0);
    let curves = fit_curve_raw(&pts, 0.2).unwrap();
    for pair in curves.windows(2) {
        assert!(pair[0].p3.distance_to(pair[1].p0) < 1e-9);
    }
}

#[test]
fn arc_length_parameterize_endpoints() {
    let pts = straight_line(5);
    let arclen = initialize_arc_lengths(&pts);
    let u = arc_length_parameterize(&arclen, 0, 4);
    assert_eq!(u.first(), Some(&0.0));
    assert_eq!(u.last(), Some(&1.0));
}

#[test]
fn get_left_and_right_tangent_on_line_point_inward() {
    let pts = straight_line(10);
    let arclen = initialize_arc_lengths(&pts);
    let tan_l = get_left_tangent(&pts, &arclen, 9);
    let tan_r = get_right_tangent(&pts, &arclen, 0);
    assert!((tan_l.x - 1.0).abs() < 1e-9);
    assert!((tan_r.x + 1.0).abs() < 1e-9);
}

#[test]
fn fit_applies_rdp_reduction_before_fitting() {
    let pts = straight_line(500);
    let curves = fit(&pts, 0.01).unwrap();
    assert_eq!(curves.len(), 1);
}
