//! XYZ ("slippy map") tile overlay

use std::f64::consts::PI;

use super::{Coordinate, Region};

/// Web Mercator latitude limit
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Deepest zoom level served by XYZ tile sources
pub const MAX_TILE_ZOOM: u8 = 19;

/// Upper bound on tiles reported for one viewport
const MAX_VISIBLE_TILES: usize = 64;

/// Tile address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    /// Geographic bounds of the tile as `(west, south, east, north)`
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let n = tiles_per_axis(self.z);
        let west = self.x as f64 / n * 360.0 - 180.0;
        let east = (self.x + 1) as f64 / n * 360.0 - 180.0;
        let north = tile_y_to_lat(self.y as f64, n);
        let south = tile_y_to_lat((self.y + 1) as f64, n);
        (west, south, east, north)
    }
}

/// Third-party tile source drawn over the map
#[derive(Debug, Clone, PartialEq)]
pub struct TileOverlay {
    pub url_template: String,
    pub max_zoom: u8,
    pub tile_size: u32,
}

impl TileOverlay {
    /// `max_zoom` is capped at [`MAX_TILE_ZOOM`]
    pub fn new(url_template: impl Into<String>, max_zoom: u8, tile_size: u32) -> Self {
        Self {
            url_template: url_template.into(),
            max_zoom: max_zoom.min(MAX_TILE_ZOOM),
            tile_size,
        }
    }

    /// Zoom level whose tiles best match the region's longitude span
    pub fn zoom_for(&self, region: &Region) -> u8 {
        if region.longitude_delta <= 0.0 {
            return self.max_zoom;
        }
        let z = (360.0 / region.longitude_delta).log2().floor();
        z.clamp(0.0, self.max_zoom as f64) as u8
    }

    /// Tile containing a coordinate at zoom `z`
    pub fn tile_for(&self, point: Coordinate, z: u8) -> TileCoord {
        let z = z.min(self.max_zoom);
        let n = tiles_per_axis(z);
        let max_index = n as u32 - 1;

        let lon = point.longitude.clamp(-180.0, 180.0);
        let lat = point.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

        let x = ((lon + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n).floor();

        TileCoord {
            x: (x.max(0.0) as u32).min(max_index),
            y: (y.max(0.0) as u32).min(max_index),
            z,
        }
    }

    /// Tiles covering the region, row by row from the north-west corner
    pub fn visible_tiles(&self, region: &Region) -> Vec<TileCoord> {
        let z = self.zoom_for(region);
        let [west, east] = region.x_bounds();
        let [south, north] = region.y_bounds();

        let top_left = self.tile_for(Coordinate::new(north, west), z);
        let bottom_right = self.tile_for(Coordinate::new(south, east), z);

        let mut tiles = Vec::new();
        'rows: for y in top_left.y..=bottom_right.y {
            for x in top_left.x..=bottom_right.x {
                if tiles.len() == MAX_VISIBLE_TILES {
                    break 'rows;
                }
                tiles.push(TileCoord { x, y, z });
            }
        }
        tiles
    }

    /// Expand the URL template for a tile
    pub fn url(&self, tile: TileCoord) -> String {
        self.url_template
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

impl Default for TileOverlay {
    fn default() -> Self {
        Self::new(
            "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            MAX_TILE_ZOOM,
            256,
        )
    }
}

fn tiles_per_axis(z: u8) -> f64 {
    (1u64 << z) as f64
}

fn tile_y_to_lat(y: f64, n: f64) -> f64 {
    (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_for_default_region() {
        let overlay = TileOverlay::default();
        assert_eq!(overlay.zoom_for(&Region::campus_default()), 14);
        let fix = Region::around_fix(Coordinate::new(35.0, 139.0));
        assert_eq!(overlay.zoom_for(&fix), 16);
    }

    #[test]
    fn test_zoom_is_capped_at_max() {
        let overlay = TileOverlay::default();
        let tiny = Region {
            longitude_delta: 1e-6,
            ..Region::campus_default()
        };
        assert_eq!(overlay.zoom_for(&tiny), 19);
    }

    #[test]
    fn test_configured_zoom_above_limit_is_capped() {
        let overlay = TileOverlay::new("https://t/{z}/{x}/{y}.png", 64, 256);
        assert_eq!(overlay.max_zoom, MAX_TILE_ZOOM);

        let flat = Region {
            longitude_delta: 0.0,
            ..Region::campus_default()
        };
        let tiles = overlay.visible_tiles(&flat);
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.z == MAX_TILE_ZOOM));
    }

    #[test]
    fn test_tile_for_known_points() {
        let overlay = TileOverlay::default();
        assert_eq!(
            overlay.tile_for(Coordinate::new(0.0, 0.0), 1),
            TileCoord { x: 1, y: 1, z: 1 }
        );
        assert_eq!(
            overlay.tile_for(Coordinate::new(0.0, 0.0), 0),
            TileCoord { x: 0, y: 0, z: 0 }
        );
        // Fujisawa at z14
        let tile = overlay.tile_for(Coordinate::new(35.3396, 139.4876), 14);
        assert_eq!((tile.x, tile.y), (14540, 6470));
    }

    #[test]
    fn test_tile_bounds_contain_point() {
        let overlay = TileOverlay::default();
        let point = Coordinate::new(35.3660, 139.4315);
        let tile = overlay.tile_for(point, 15);
        let (west, south, east, north) = tile.bounds();
        assert!(west <= point.longitude && point.longitude < east);
        assert!(south <= point.latitude && point.latitude < north);
    }

    #[test]
    fn test_visible_tiles_cover_region() {
        let overlay = TileOverlay::default();
        let region = Region::campus_default();
        let tiles = overlay.visible_tiles(&region);
        assert!(!tiles.is_empty());
        assert!(tiles.len() <= MAX_VISIBLE_TILES);
        assert!(tiles.iter().all(|t| t.z == 14));
        let center = overlay.tile_for(region.center(), 14);
        assert!(tiles.contains(&center));
    }

    #[test]
    fn test_url_expansion() {
        let overlay = TileOverlay::default();
        let url = overlay.url(TileCoord { x: 3, y: 5, z: 4 });
        assert_eq!(url, "https://tile.openstreetmap.org/4/3/5.png");
    }
}
