use geo_types::{Coord, Rect};
use serde::{Deserialize, Serialize};

/// The minimal axis-aligned rectangle containing every included position.
/// Grows in O(1) per position; empty until the first one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingRegion {
    extent: Option<(Coord, Coord)>,
}

impl BoundingRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand the region to contain `position`.
    pub fn include(&mut self, position: Coord) {
        match &mut self.extent {
            Some((min, max)) => {
                min.x = min.x.min(position.x);
                min.y = min.y.min(position.y);
                max.x = max.x.max(position.x);
                max.y = max.y.max(position.y);
            }
            None => self.extent = Some((position, position)),
        }
    }

    pub fn contains(&self, position: Coord) -> bool {
        match self.extent {
            Some((min, max)) => {
                min.x <= position.x
                    && position.x <= max.x
                    && min.y <= position.y
                    && position.y <= max.y
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    pub fn clear(&mut self) {
        self.extent = None;
    }

    pub fn to_rect(&self) -> Option<Rect> {
        self.extent.map(|(min, max)| Rect::new(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let region = BoundingRegion::new();
        assert!(region.is_empty());
        assert!(region.to_rect().is_none());
        assert!(!region.contains(Coord { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn expands_to_cover_included_positions() {
        let mut region = BoundingRegion::new();
        region.include(Coord { x: 1.0, y: 1.0 });
        region.include(Coord { x: 2.0, y: 2.0 });
        region.include(Coord { x: 3.0, y: 1.5 });

        let rect = region.to_rect().unwrap();
        assert_eq!(rect.min(), Coord { x: 1.0, y: 1.0 });
        assert_eq!(rect.max(), Coord { x: 3.0, y: 2.0 });
        assert!(region.contains(Coord { x: 2.5, y: 1.2 }));
        assert!(!region.contains(Coord { x: 0.5, y: 1.2 }));
    }

    #[test]
    fn single_position_is_a_degenerate_rectangle() {
        let mut region = BoundingRegion::new();
        region.include(Coord { x: 10.2, y: 56.1 });
        assert!(region.contains(Coord { x: 10.2, y: 56.1 }));
        let rect = region.to_rect().unwrap();
        assert_eq!(rect.min(), rect.max());
    }
}
