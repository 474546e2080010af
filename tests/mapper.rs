use volcano::data::mapper::*;
use volcano::data::points::{Extent, Point};

fn pt(gene: &str, x: f64, y: f64) -> Point {
    Point {
        gene: gene.into(),
        x,
        y,
    }
}

fn mapper() -> CoordinateMapper {
    let mut m = CoordinateMapper::default();
    m.fit_domain(
        Some(Extent {
            x: (-4.0, 4.0),
            y: (0.0, 10.0),
        }),
        (0.5, 0.5),
    );
    m
}

#[test]
fn domain_corners_land_on_plot_area_corners() {
    let m = mapper();
    let layout = *m.layout();
    let top_left = m.to_draw_xy(-4.5, 10.5);
    assert!((top_left.x - layout.left_offset()).abs() < 1e-9);
    assert!((top_left.y - layout.top_offset()).abs() < 1e-9);
    let bottom_right = m.to_draw_xy(4.5, -0.5);
    assert!((bottom_right.x - (layout.left_offset() + layout.width)).abs() < 1e-9);
    assert!((bottom_right.y - (layout.top_offset() + layout.height)).abs() < 1e-9);
}

#[test]
fn event_coordinates_account_for_widget_origin() {
    let mut m = mapper();
    m.set_origin(100.0, 40.0);
    let d = m.to_draw_xy(1.5, 3.0);
    let ev = m.from_event(d.x + 100.0, d.y + 40.0);
    assert!((ev.draw.x - d.x).abs() < 1e-9);
    assert!((ev.domain.x - 1.5).abs() < 1e-9);
    assert!((ev.domain.y - 3.0).abs() < 1e-9);
}

#[test]
fn zoom_at_keeps_anchor_point_under_cursor() {
    let mut m = mapper();
    let anchor = m.to_draw_xy(2.0, 6.0);
    m.zoom_at(2.0, anchor);
    let after = m.to_draw_xy(2.0, 6.0);
    assert!((after.x - anchor.x).abs() < 1e-9);
    assert!((after.y - anchor.y).abs() < 1e-9);
    assert_eq!(m.transform().k, 2.0);
}

#[test]
fn zoom_factor_is_clamped() {
    let mut m = mapper();
    let t = m.apply_zoom(ZoomTransform::new(0.1, 0.0, 0.0));
    assert_eq!(t.k, 0.5);
    let centre = m.to_draw_xy(0.0, 5.0);
    m.reset_zoom();
    m.zoom_at(50.0, centre);
    assert_eq!(m.transform().k, 5.0);
}

#[test]
fn zooming_in_hides_points_outside_visible_domain() {
    let mut m = mapper();
    let near = pt("near", 0.1, 5.0);
    let far = pt("far", -4.0, 0.0);
    assert!(m.is_in_view(&far));
    let centre = m.to_draw_xy(0.0, 5.0);
    m.zoom_at(4.0, centre);
    assert!(m.is_in_view(&near));
    assert!(!m.is_in_view(&far));
}

#[test]
fn clamp_to_domain_limits_both_axes() {
    let m = mapper();
    let p = m.clamp_to_domain(DomainPos { x: 9.0, y: -3.0 });
    assert_eq!(p.x, 4.5);
    assert_eq!(p.y, -0.5);
}

#[test]
fn hit_test_picks_nearest_point_within_radius() {
    let m = mapper();
    let points = vec![pt("a", 1.0, 1.0), pt("b", 1.05, 1.0), pt("c", -3.0, 9.0)];
    let d = m.to_draw_xy(1.06, 1.0);
    assert_eq!(m.hit_test(&points, d, 4.0), Some(1));
    let empty = m.to_draw_xy(0.0, 5.0);
    assert_eq!(m.hit_test(&points, empty, 4.0), None);
}

#[test]
fn threshold_lines_are_symmetric_about_zero() {
    let m = mapper();
    let [left, right, horizontal] = m.threshold_lines(1.0, 2.0);
    let zero = m.to_draw_xy(0.0, 0.0).x;
    assert!(((zero - left.from.x) - (right.from.x - zero)).abs() < 1e-9);
    assert_eq!(left.from.x, left.to.x);
    assert_eq!(horizontal.from.y, horizontal.to.y);
    assert!((horizontal.from.y - m.to_draw_xy(0.0, 2.0).y).abs() < 1e-9);
}

#[test]
fn empty_store_keeps_unit_domain() {
    let mut m = mapper();
    m.fit_domain(None, (0.5, 0.5));
    let d = m.domain();
    assert_eq!((d.min.x, d.max.x), (0.0, 1.0));
    assert!(!DomainRect::from_corners(DomainPos { x: 1.0, y: 0.0 }, DomainPos { x: 1.0, y: 2.0 }).contains(1.5, 1.0));
}

#[test]
fn event_round_trip_holds_under_zoom_and_pan() {
    let mut m = mapper();
    m.set_origin(30.0, 12.0);
    m.apply_zoom(ZoomTransform::new(2.5, -140.0, -60.0));
    for &(x, y) in &[(1.5, 3.0), (-0.25, 7.5), (0.0, 0.0)] {
        let d = m.to_draw_xy(x, y);
        let ev = m.from_event(d.x + 30.0, d.y + 12.0);
        assert!((ev.domain.x - x).abs() < 1e-9);
        assert!((ev.domain.y - y).abs() < 1e-9);
    }
}

#[test]
fn non_finite_zoom_is_ignored() {
    let mut m = mapper();
    m.apply_zoom(ZoomTransform::new(2.0, 0.0, 0.0));
    let before = m.transform();
    let kept = m.apply_zoom(ZoomTransform::new(f64::NAN, 0.0, 0.0));
    assert_eq!(kept, before);
    let kept = m.apply_zoom(ZoomTransform::new(3.0, f64::INFINITY, 0.0));
    assert_eq!(kept, before);
    assert!(m.is_in_view(&pt("centre", 0.0, 5.0)));
}
