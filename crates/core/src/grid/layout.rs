//! Layout provider seam and row inference.

use ratatui::layout::Rect;
use thiserror::Error;

/// Errors raised while querying item rectangles.
///
/// These only surface during setup or an explicit refresh; navigation itself
/// never fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The container handle does not resolve to anything.
    #[error("Layout container '{container}' not found")]
    ContainerNotFound {
        /// The unresolved container handle
        container: String,
    },

    /// The provider could not enumerate the members.
    #[error("Cannot list '{member}' members of '{container}': {reason}")]
    MembersUnavailable {
        /// Container handle
        container: String,
        /// Member handle
        member: String,
        /// Provider-specific reason
        reason: String,
    },
}

/// Source of item rectangles, in display order.
pub trait LayoutProvider {
    /// Rectangles of the `member` items inside `container`.
    fn members(&self, container: &str, member: &str) -> Result<Vec<Rect>, LayoutError>;
}

impl<P: LayoutProvider + ?Sized> LayoutProvider for &P {
    fn members(&self, container: &str, member: &str) -> Result<Vec<Rect>, LayoutError> {
        (**self).members(container, member)
    }
}

impl<P: LayoutProvider + ?Sized> LayoutProvider for Box<P> {
    fn members(&self, container: &str, member: &str) -> Result<Vec<Rect>, LayoutError> {
        (**self).members(container, member)
    }
}

/// Group consecutive rectangles into rows by their top edge.
///
/// A rectangle joins the current row when its `y` is within `tolerance` of
/// the row's first rectangle; widths are never consulted. Returns row lengths.
pub fn infer_rows(rects: &[Rect], tolerance: u16) -> Vec<usize> {
    let mut rows = Vec::new();
    let mut row_top: Option<u16> = None;

    for rect in rects {
        match row_top {
            Some(top) if rect.y.abs_diff(top) <= tolerance => {
                if let Some(last) = rows.last_mut() {
                    *last += 1;
                }
            }
            _ => {
                rows.push(1);
                row_top = Some(rect.y);
            }
        }
    }

    rows
}
