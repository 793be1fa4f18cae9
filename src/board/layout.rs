//! Screen placement of a board.
//!
//! Tiles are square. The side length leaves one tile of margin on each side of the
//! chosen board axis, the viewport is conceptually tiled with whole tiles, and the
//! board is centered on that tile grid by a whole-tile offset. Input mapping and
//! rendering both go through [`BoardGeometry`] so a click always lands on the tile
//! that was drawn under it.

/// Drawable area in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pointer position in CSS pixels, relative to the viewport's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which board axis the tile side is derived from.
///
/// Both variants existed in earlier builds and scale non-square boards differently;
/// `LongestAxis` always fits the whole board on screen, `ShortestAxis` produces
/// larger tiles that may push the long axis past the viewport edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TileSizing {
    #[default]
    LongestAxis,
    ShortestAxis,
}

/// Resolved tile side and centering offset for one board in one viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardGeometry {
    /// Tile side length in pixels.
    pub side: f64,
    /// Whole tiles that fit in the viewport along x / y.
    pub tiles_fitting: (i64, i64),
    /// Board origin in whole tiles from the viewport origin.
    pub offset_tiles: (i64, i64),
    board_width: u32,
    board_height: u32,
}

impl BoardGeometry {
    pub fn new(viewport: Viewport, board_width: u32, board_height: u32, sizing: TileSizing) -> Self {
        let axis = match sizing {
            TileSizing::LongestAxis => board_width.max(board_height),
            TileSizing::ShortestAxis => board_width.min(board_height),
        };
        let side = viewport.width.min(viewport.height) / (f64::from(axis) + 2.0);
        let tiles_fitting = (
            (viewport.width / side).floor() as i64,
            (viewport.height / side).floor() as i64,
        );
        let offset_tiles = (
            centering_offset(tiles_fitting.0, board_width),
            centering_offset(tiles_fitting.1, board_height),
        );
        Self {
            side,
            tiles_fitting,
            offset_tiles,
            board_width,
            board_height,
        }
    }

    /// Pixel position of the board's top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(
            self.offset_tiles.0 as f64 * self.side,
            self.offset_tiles.1 as f64 * self.side,
        )
    }

    /// Top-left pixel of the tile at `index`.
    pub fn cell_origin(&self, index: usize) -> Point {
        let w = self.board_width.max(1) as usize;
        let origin = self.origin();
        Point::new(
            origin.x + (index % w) as f64 * self.side,
            origin.y + (index / w) as f64 * self.side,
        )
    }

    /// Flat cell index under `pointer`, or `None` when the pointer misses the board.
    pub fn cell_at(&self, pointer: Point) -> Option<usize> {
        if !self.side.is_finite() || self.side <= 0.0 {
            return None;
        }
        let origin = self.origin();
        let col = ((pointer.x - origin.x) / self.side).floor();
        let row = ((pointer.y - origin.y) / self.side).floor();
        if col < 0.0
            || row < 0.0
            || col >= f64::from(self.board_width)
            || row >= f64::from(self.board_height)
        {
            return None;
        }
        Some(row as usize * self.board_width as usize + col as usize)
    }
}

/// Map a pointer position to a cell index. `None` means "missed the board" and
/// must not produce a turn.
pub fn screen_to_cell(
    pointer: Point,
    viewport: Viewport,
    board_width: u32,
    board_height: u32,
    sizing: TileSizing,
) -> Option<usize> {
    BoardGeometry::new(viewport, board_width, board_height, sizing).cell_at(pointer)
}

// Rounds halves toward +inf, so -0.5 tiles becomes 0 rather than -1.
fn centering_offset(fitting: i64, board_dim: u32) -> i64 {
    let half = (fitting - i64::from(board_dim)) as f64 / 2.0;
    (half + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_view() -> Viewport {
        Viewport::new(900.0, 900.0)
    }

    #[test]
    fn test_center_of_square_viewport_hits_center_cell() {
        let geom = BoardGeometry::new(square_view(), 3, 3, TileSizing::LongestAxis);
        assert!((geom.side - 180.0).abs() < 1e-9);
        assert_eq!(geom.tiles_fitting, (5, 5));
        assert_eq!(geom.offset_tiles, (1, 1));
        assert_eq!(
            screen_to_cell(Point::new(450.0, 450.0), square_view(), 3, 3, TileSizing::LongestAxis),
            Some(4)
        );
    }

    #[test]
    fn test_margin_and_far_edge_are_out_of_bounds() {
        let view = square_view();
        let hit = |x, y| screen_to_cell(Point::new(x, y), view, 3, 3, TileSizing::LongestAxis);
        assert_eq!(hit(179.9, 450.0), None);
        assert_eq!(hit(180.0, 180.0), Some(0));
        assert_eq!(hit(719.9, 719.9), Some(8));
        assert_eq!(hit(720.0, 450.0), None);
        assert_eq!(hit(450.0, 720.0), None);
        assert_eq!(hit(-10.0, -10.0), None);
    }

    #[test]
    fn test_column_overflow_does_not_wrap_into_next_row() {
        // A 4x2 board: clicking just right of row 0 must not select row 1, col 0.
        let view = Viewport::new(600.0, 600.0);
        let geom = BoardGeometry::new(view, 4, 2, TileSizing::LongestAxis);
        let origin = geom.origin();
        let right_of_row0 = Point::new(origin.x + 4.5 * geom.side, origin.y + 0.5 * geom.side);
        assert_eq!(geom.cell_at(right_of_row0), None);
    }

    #[test]
    fn test_wide_viewport_centers_horizontally() {
        let view = Viewport::new(1600.0, 800.0);
        let geom = BoardGeometry::new(view, 2, 2, TileSizing::LongestAxis);
        assert!((geom.side - 200.0).abs() < 1e-9);
        assert_eq!(geom.tiles_fitting, (8, 4));
        assert_eq!(geom.offset_tiles, (3, 1));
        assert_eq!(geom.cell_at(Point::new(610.0, 210.0)), Some(0));
        assert_eq!(geom.cell_at(Point::new(990.0, 590.0)), Some(3));
    }

    #[test]
    fn test_sizing_policies_differ_for_non_square_boards() {
        let view = Viewport::new(1000.0, 1000.0);
        let longest = BoardGeometry::new(view, 8, 3, TileSizing::LongestAxis);
        let shortest = BoardGeometry::new(view, 8, 3, TileSizing::ShortestAxis);
        assert!((longest.side - 100.0).abs() < 1e-9);
        assert!((shortest.side - 200.0).abs() < 1e-9);
        // Five tiles fit but the board is eight wide: offset rounds -1.5 up to -1.
        assert_eq!(shortest.offset_tiles.0, -1);
        assert_eq!(shortest.cell_origin(0), Point::new(-200.0, 200.0));
    }

    #[test]
    fn test_half_offsets_round_up() {
        assert_eq!(centering_offset(5, 2), 2);
        assert_eq!(centering_offset(4, 5), 0);
        assert_eq!(centering_offset(4, 7), -1);
    }

    #[test]
    fn test_cell_origin_matches_hit_testing() {
        let view = Viewport::new(1280.0, 720.0);
        let geom = BoardGeometry::new(view, 6, 4, TileSizing::LongestAxis);
        for idx in 0..24 {
            let o = geom.cell_origin(idx);
            let centre = Point::new(o.x + geom.side / 2.0, o.y + geom.side / 2.0);
            assert_eq!(geom.cell_at(centre), Some(idx));
        }
    }

    #[test]
    fn test_degenerate_viewport_misses() {
        let view = Viewport::new(0.0, 0.0);
        assert_eq!(
            screen_to_cell(Point::new(0.0, 0.0), view, 3, 3, TileSizing::LongestAxis),
            None
        );
    }
}
