//! Slippy map tile arithmetic.
//!
//! See <https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames>.

use std::f64::consts::PI;

/// Deepest zoom level served by common tile sources.
pub const MAX_ZOOM: u8 = 17;

/// Number of tiles along one axis at `zoom`, capped at [`MAX_ZOOM`].
pub fn num_tiles(zoom: u8) -> u32 {
    1u32 << zoom.min(MAX_ZOOM)
}

/// Tile column and row containing the given position.
pub fn deg2num(lat_deg: f64, lon_deg: f64, zoom: u8) -> (u32, u32) {
    let n = f64::from(num_tiles(zoom));
    let lat_rad = lat_deg.to_radians();
    let x = (lon_deg + 180.0) / 360.0 * n;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;
    let last = n - 1.0;
    (x.clamp(0.0, last) as u32, y.clamp(0.0, last) as u32)
}

/// North-west corner of a tile as `(lat, lon)`.
///
/// Pass `x + 1` and/or `y + 1` for the other corners.
pub fn num2deg(x: u32, y: u32, zoom: u8) -> (f64, f64) {
    let n = f64::from(num_tiles(zoom));
    let lon_deg = f64::from(x) / n * 360.0 - 180.0;
    let lat_rad = (PI * (1.0 - 2.0 * f64::from(y) / n)).sinh().atan();
    (lat_rad.to_degrees(), lon_deg)
}

/// Fills `{z}`, `{x}` and `{y}` in a tile url template.
pub fn tile_url(template: &str, x: u32, y: u32, zoom: u8) -> String {
    template
        .replace("{z}", &zoom.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_is_one_tile() {
        assert_eq!(num_tiles(0), 1);
        assert_eq!(deg2num(52.0, 7.5, 0), (0, 0));
    }

    #[test]
    fn muenster_tiles() {
        assert_eq!(deg2num(52.0, 7.5, 1), (1, 0));
        assert_eq!(deg2num(52.0, 7.5, 10), (533, 338));
    }

    #[test]
    fn corners() {
        let (lat, lon) = num2deg(0, 0, 3);
        assert_eq!(lon, -180.0);
        assert!((lat - 85.0511).abs() < 1e-4);

        let (lat, lon) = num2deg(4, 4, 3);
        assert_eq!(lon, 0.0);
        assert!(lat.abs() < 1e-9);
    }

    #[test]
    fn poles_clamp_to_grid() {
        assert_eq!(deg2num(89.9, 179.99, 2), (3, 0));
        assert_eq!(deg2num(-89.9, -180.0, 2), (0, 3));
    }

    #[test]
    fn zoom_capped_at_max() {
        assert_eq!(num_tiles(MAX_ZOOM), 1 << 17);
        assert_eq!(num_tiles(32), num_tiles(MAX_ZOOM));
        assert_eq!(num_tiles(u8::MAX), num_tiles(MAX_ZOOM));
        assert_eq!(deg2num(0.0, 0.0, 40), deg2num(0.0, 0.0, MAX_ZOOM));
        assert_eq!(num2deg(0, 0, 40).1, -180.0);
    }

    #[test]
    fn fill_template() {
        assert_eq!(
            tile_url("https://tile.openstreetmap.org/{z}/{x}/{y}.png", 533, 338, 10),
            "https://tile.openstreetmap.org/10/533/338.png"
        );
    }
}
