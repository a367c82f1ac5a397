//! Panel Geometry
//!
//! Where the panel sits when shown and where it parks when hidden.

pub const PANEL_WIDTH: u32 = 280;
pub const PANEL_HEIGHT: u32 = 500;
pub const MARGIN: i32 = 10;
/// Used when no monitor can be queried
pub const FALLBACK_SCREEN_WIDTH: i32 = 1440;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    pub visible_x: i32,
    pub hidden_x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PanelGeometry {
    /// Panel hugging the right edge of a screen `screen_width` logical pixels wide
    pub fn for_screen_width(screen_width: i32) -> Self {
        Self {
            visible_x: screen_width - PANEL_WIDTH as i32 - MARGIN,
            hidden_x: screen_width + MARGIN,
            y: MARGIN,
            width: PANEL_WIDTH,
            height: PANEL_HEIGHT,
        }
    }
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self::for_screen_width(FALLBACK_SCREEN_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_for_screen() {
        let g = PanelGeometry::for_screen_width(1920);
        assert_eq!(g.visible_x, 1920 - 280 - 10);
        assert_eq!(g.hidden_x, 1930);
        assert_eq!(g.y, 10);
        assert_eq!((g.width, g.height), (280, 500));
    }

    #[test]
    fn test_hidden_is_off_screen() {
        let g = PanelGeometry::default();
        assert!(g.hidden_x > FALLBACK_SCREEN_WIDTH);
        assert!(g.visible_x + g.width as i32 <= FALLBACK_SCREEN_WIDTH);
    }
}
