//! Snap functionality for aligning points to the grid.

use crate::camera::Camera;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default grid spacing in world units (matches the visual grid).
pub const GRID_SIZE: f64 = 70.0;

/// Snap mode for placing nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapMode {
    /// No snapping, nodes follow the cursor freely.
    None,
    /// Snap to grid intersections.
    #[default]
    Grid,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Grid,
            SnapMode::Grid => SnapMode::None,
        }
    }

    /// Check if grid snapping is enabled.
    pub fn snaps_to_grid(self) -> bool {
        matches!(self, SnapMode::Grid)
    }

    /// Apply this mode to a world point.
    pub fn apply(self, point: Point, grid_size: f64) -> Point {
        match self {
            SnapMode::None => point,
            SnapMode::Grid => snap_to_grid(point, grid_size),
        }
    }
}

fn valid_spacing(grid_size: f64) -> bool {
    grid_size.is_finite() && grid_size > 0.0
}

/// Snap a point to the nearest grid intersection.
///
/// Uses `f64::round`, so exact halves round away from zero:
/// `35 / 70 = 0.5` snaps to 70 and `-35 / 70 = -0.5` snaps to -70.
/// An invalid spacing leaves the point untouched.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if !valid_spacing(grid_size) {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Grid-aligned point at or before `top_left` on both axes.
pub fn visible_cell_origin(top_left: Point, grid_size: f64) -> Point {
    if !valid_spacing(grid_size) {
        return top_left;
    }
    Point::new(
        (top_left.x / grid_size).floor() * grid_size,
        (top_left.y / grid_size).floor() * grid_size,
    )
}

/// Block of grid intersections covering the visible part of the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRange {
    /// First (top-left) grid point.
    pub origin: Point,
    /// Grid spacing.
    pub spacing: f64,
    /// Number of columns.
    pub columns: usize,
    /// Number of rows.
    pub rows: usize,
}

impl GridRange {
    /// Range covering the camera's view plus one extra cell on each axis,
    /// so cells cut by the right and bottom edges are still drawn.
    pub fn visible(camera: &Camera, grid_size: f64) -> Self {
        let origin = visible_cell_origin(camera.top_left_world(), grid_size);
        if !valid_spacing(grid_size) {
            return Self {
                origin,
                spacing: grid_size,
                columns: 0,
                rows: 0,
            };
        }

        let size = camera.view_size();
        let count = |extent: f64| ((extent + grid_size) / grid_size).ceil().max(0.0) as usize;
        Self {
            origin,
            spacing: grid_size,
            columns: count(size.width),
            rows: count(size.height),
        }
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    /// Check if the range contains no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all grid points, column by column.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.columns).flat_map(move |column| {
            (0..self.rows).map(move |row| {
                Point::new(
                    self.origin.x + column as f64 * self.spacing,
                    self.origin.y + row as f64 * self.spacing,
                )
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Size, Vec2};

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(Point::new(34.0, 104.0), 70.0), Point::new(0.0, 70.0));
        assert_eq!(snap_to_grid(Point::new(36.0, 106.0), 70.0), Point::new(70.0, 140.0));
        assert_eq!(snap_to_grid(Point::new(140.0, 70.0), 70.0), Point::new(140.0, 70.0));
    }

    #[test]
    fn test_snap_ties_round_away_from_zero() {
        assert_eq!(snap_to_grid(Point::new(35.0, 104.0), 70.0), Point::new(70.0, 70.0));
        // 105 / 70 = 1.5 is a tie too, and goes up to 140.
        assert_eq!(snap_to_grid(Point::new(35.0, 105.0), 70.0), Point::new(70.0, 140.0));
        assert_eq!(snap_to_grid(Point::new(-35.0, -35.0), 70.0), Point::new(-70.0, -70.0));
        assert_eq!(snap_to_grid(Point::new(-35.0, -105.0), 70.0), Point::new(-70.0, -140.0));
        assert_eq!(snap_to_grid(Point::new(105.0, 175.0), 70.0), Point::new(140.0, 210.0));
    }

    #[test]
    fn test_snap_is_idempotent() {
        for &spacing in &[70.0, 20.0, 0.5, 13.0] {
            for &(x, y) in &[(35.0, 105.0), (-12.3, 99.9), (1e5 + 0.3, -7.0), (0.0, 0.0)] {
                let once = snap_to_grid(Point::new(x, y), spacing);
                assert_eq!(snap_to_grid(once, spacing), once);
            }
        }
    }

    #[test]
    fn test_invalid_spacing_leaves_point() {
        let point = Point::new(12.0, 34.0);
        assert_eq!(snap_to_grid(point, 0.0), point);
        assert_eq!(snap_to_grid(point, -70.0), point);
        assert_eq!(snap_to_grid(point, f64::NAN), point);
    }

    #[test]
    fn test_snap_mode_cycle() {
        assert_eq!(SnapMode::default(), SnapMode::Grid);
        assert_eq!(SnapMode::Grid.next(), SnapMode::None);
        assert_eq!(SnapMode::None.next(), SnapMode::Grid);

        let point = Point::new(33.0, 40.0);
        assert_eq!(SnapMode::None.apply(point, 70.0), point);
        assert_eq!(SnapMode::Grid.apply(point, 70.0), Point::new(0.0, 70.0));
    }

    #[test]
    fn test_visible_cell_origin_floors() {
        assert_eq!(visible_cell_origin(Point::new(69.0, 70.0), 70.0), Point::new(0.0, 70.0));
        assert_eq!(visible_cell_origin(Point::new(-1.0, -140.0), 70.0), Point::new(-70.0, -140.0));
    }

    #[test]
    fn test_grid_range_covers_viewport() {
        let mut camera = Camera::new(Size::new(1600.0, 960.0), 0.3, 1.7);
        camera.offset = Vec2::new(-33.0, 12.0);
        camera.set_zoom(1.3);

        let range = GridRange::visible(&camera, 70.0);
        let top_left = camera.top_left_world();
        let bottom_right = camera.screen_to_world(Point::new(1600.0, 960.0));

        assert!(range.origin.x <= top_left.x && range.origin.y <= top_left.y);
        let last_x = range.origin.x + (range.columns - 1) as f64 * range.spacing;
        let last_y = range.origin.y + (range.rows - 1) as f64 * range.spacing;
        // Every grid point up to the bottom-right corner is included.
        assert!(last_x >= (bottom_right.x / 70.0).floor() * 70.0);
        assert!(last_y >= (bottom_right.y / 70.0).floor() * 70.0);
        assert_eq!(range.points().count(), range.len());
    }

    #[test]
    fn test_grid_range_points_are_on_grid() {
        let camera = Camera::new(Size::new(140.0, 70.0), 0.3, 1.7);
        let range = GridRange::visible(&camera, 70.0);
        assert_eq!(range.origin, Point::ZERO);
        assert_eq!((range.columns, range.rows), (3, 2));
        let points: Vec<Point> = range.points().collect();
        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert_eq!(points[1], Point::new(0.0, 70.0));
        assert_eq!(points[5], Point::new(140.0, 70.0));
        for point in points {
            assert_eq!(snap_to_grid(point, 70.0), point);
        }
    }

    #[test]
    fn test_grid_range_invalid_spacing_is_empty() {
        let camera = Camera::new(Size::new(100.0, 100.0), 0.3, 1.7);
        assert!(GridRange::visible(&camera, 0.0).is_empty());
    }
}
