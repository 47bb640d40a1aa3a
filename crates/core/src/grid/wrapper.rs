//! Grid navigation bound to a layout provider.

use std::cell::RefCell;
use std::rc::Rc;

use keygrid_config::GridConfig;

use super::layout::{LayoutError, LayoutProvider};
use super::navigation::{GridNavigation, HorizontalWrap};

/// Navigation state shared between the wrapper and hotkey handlers.
pub type SharedGrid = Rc<RefCell<GridNavigation>>;

/// Owns the selectors and provider behind a [`GridNavigation`].
///
/// The layout is queried once by [`setup`](Self::setup) and again only when
/// [`refresh`](Self::refresh) or [`change_container`](Self::change_container)
/// is called.
pub struct GridNavigationWrapper<P> {
    provider: P,
    container: String,
    member: String,
    row_tolerance: u16,
    grid: SharedGrid,
}

impl<P: LayoutProvider> GridNavigationWrapper<P> {
    /// Query the provider and build the grid.
    ///
    /// # Errors
    ///
    /// Returns the provider's error when the container or its members cannot
    /// be resolved.
    pub fn setup(
        provider: P,
        container: impl Into<String>,
        member: impl Into<String>,
        config: &GridConfig,
        wrap: HorizontalWrap,
    ) -> Result<Self, LayoutError> {
        let container = container.into();
        let member = member.into();
        let rects = provider.members(&container, &member)?;
        let grid = GridNavigation::from_rects(&rects, config.row_tolerance).with_wrap(wrap);
        tracing::debug!(
            container = %container,
            member = %member,
            items = grid.len(),
            rows = grid.row_count(),
            "Grid navigation set up"
        );

        Ok(Self {
            provider,
            container,
            member,
            row_tolerance: config.row_tolerance,
            grid: Rc::new(RefCell::new(grid)),
        })
    }

    /// Re-query the layout; the cursor is clamped into the new item range.
    pub fn refresh(&mut self) -> Result<(), LayoutError> {
        let rects = self.provider.members(&self.container, &self.member)?;
        let mut grid = self.grid.borrow_mut();
        grid.relayout(&rects, self.row_tolerance);
        tracing::debug!(
            container = %self.container,
            items = grid.len(),
            rows = grid.row_count(),
            "Grid layout refreshed"
        );
        Ok(())
    }

    /// Point the wrapper at another container and rebuild the layout.
    ///
    /// On error the previous container is kept.
    pub fn change_container(&mut self, container: impl Into<String>) -> Result<(), LayoutError> {
        let previous = std::mem::replace(&mut self.container, container.into());
        if let Err(e) = self.refresh() {
            self.container = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Handle to the navigation state, for binding handlers.
    pub fn grid(&self) -> SharedGrid {
        Rc::clone(&self.grid)
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access to the provider, e.g. after a resize. Call
    /// [`refresh`](Self::refresh) afterwards.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}
