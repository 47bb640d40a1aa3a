//! Tile layout provider.
//!
//! Responsibilities:
//! - Flow a fixed number of equally sized tiles into the grid area.
//! - Answer `LayoutProvider` queries with the tile rectangles.
//!
//! Does NOT handle:
//! - Scrolling; rectangles below the visible area are reported as-is.
//! - Rendering (see `ui`).

use keygrid_core::{LayoutError, LayoutProvider};
use ratatui::layout::Rect;

/// Container handle of the tile grid.
pub const GRID_CONTAINER: &str = "grid";

/// Member handle of a tile.
pub const TILE_MEMBER: &str = "tile";

/// Height of a tile, borders included.
pub const TILE_HEIGHT: u16 = 3;

/// Tiles laid out left to right, wrapping at the area width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayout {
    area: Rect,
    items: usize,
    tile_width: u16,
}

impl TileLayout {
    pub fn new(items: usize, tile_width: u16) -> Self {
        Self {
            area: Rect::default(),
            items,
            tile_width: tile_width.max(1),
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn items(&self) -> usize {
        self.items
    }

    pub fn set_items(&mut self, items: usize) {
        self.items = items;
    }

    /// Tiles per row; at least one even in a zero-width area.
    pub fn per_row(&self) -> usize {
        usize::from((self.area.width / self.tile_width).max(1))
    }

    fn tile(&self, index: usize) -> Rect {
        let per_row = self.per_row();
        let column = u16::try_from(index % per_row).unwrap_or(u16::MAX);
        let row = u16::try_from(index / per_row).unwrap_or(u16::MAX);
        Rect::new(
            self.area.x.saturating_add(column.saturating_mul(self.tile_width)),
            self.area.y.saturating_add(row.saturating_mul(TILE_HEIGHT)),
            self.tile_width,
            TILE_HEIGHT,
        )
    }
}

impl LayoutProvider for TileLayout {
    fn members(&self, container: &str, member: &str) -> Result<Vec<Rect>, LayoutError> {
        if container != GRID_CONTAINER {
            return Err(LayoutError::ContainerNotFound {
                container: container.to_string(),
            });
        }
        if member != TILE_MEMBER {
            return Err(LayoutError::MembersUnavailable {
                container: container.to_string(),
                member: member.to_string(),
                reason: "unknown member handle".to_string(),
            });
        }
        Ok((0..self.items).map(|i| self.tile(i)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiles_flow_into_rows() {
        let mut layout = TileLayout::new(7, 10);
        layout.set_area(Rect::new(2, 1, 35, 20));
        let rects = layout.members(GRID_CONTAINER, TILE_MEMBER).unwrap();

        assert_eq!(layout.per_row(), 3);
        assert_eq!(rects[0], Rect::new(2, 1, 10, 3));
        assert_eq!(rects[2], Rect::new(22, 1, 10, 3));
        assert_eq!(rects[3], Rect::new(2, 4, 10, 3));
        assert_eq!(rects[6], Rect::new(2, 7, 10, 3));
    }

    #[test]
    fn test_zero_area_stacks_tiles() {
        let layout = TileLayout::new(3, 10);
        let rects = layout.members(GRID_CONTAINER, TILE_MEMBER).unwrap();
        assert_eq!(layout.per_row(), 1);
        assert_eq!(rects.iter().map(|r| r.y).collect::<Vec<_>>(), vec![0, 3, 6]);
    }

    #[test]
    fn test_unknown_handles() {
        let layout = TileLayout::new(3, 10);
        assert!(matches!(
            layout.members("sidebar", TILE_MEMBER),
            Err(LayoutError::ContainerNotFound { .. })
        ));
        assert!(matches!(
            layout.members(GRID_CONTAINER, "row"),
            Err(LayoutError::MembersUnavailable { .. })
        ));
    }
}
