use serde::{Deserialize, Serialize};

use crate::LonLat;

/// Share of the extent (in percent) one navigation step moves the view.
pub const STEP_FACTOR: f64 = 10.0;

/// Rectangular extent in lon/lat axis order (EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lon_min: f64,
    pub lat_min: f64,
    pub lon_max: f64,
    pub lat_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "east" | "e" => Ok(Direction::East),
            "south" | "s" => Ok(Direction::South),
            "west" | "w" => Ok(Direction::West),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

impl BoundingBox {
    /// The whole world.
    pub const MAX_EXTENT: BoundingBox = BoundingBox {
        lon_min: -180.0,
        lat_min: -90.0,
        lon_max: 180.0,
        lat_max: 90.0,
    };

    pub fn new(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> Self {
        BoundingBox {
            lon_min,
            lat_min,
            lon_max,
            lat_max,
        }
    }

    pub fn width(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    pub fn height(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Height divided by width.
    pub fn ratio(&self) -> f64 {
        self.height() / self.width()
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(
            self.lon_min + self.width() / 2.0,
            self.lat_min + self.height() / 2.0,
        )
    }

    /// Strict interior test; points on an edge are outside.
    pub fn contains(&self, point: &LonLat) -> bool {
        point.lon > self.lon_min
            && point.lat > self.lat_min
            && point.lon < self.lon_max
            && point.lat < self.lat_max
    }

    pub fn covers_max_extent(&self) -> bool {
        self.lon_min <= Self::MAX_EXTENT.lon_min
            && self.lat_min <= Self::MAX_EXTENT.lat_min
            && self.lon_max >= Self::MAX_EXTENT.lon_max
            && self.lat_max >= Self::MAX_EXTENT.lat_max
    }

    /// Extends this box so it also contains `other`.
    pub fn merge(&mut self, other: &BoundingBox) {
        self.lon_min = self.lon_min.min(other.lon_min);
        self.lat_min = self.lat_min.min(other.lat_min);
        self.lon_max = self.lon_max.max(other.lon_max);
        self.lat_max = self.lat_max.max(other.lat_max);
    }

    /// Moves the box by [`STEP_FACTOR`] percent of its size. A box covering
    /// the whole world does not move.
    pub fn step(&mut self, direction: Direction) {
        if self.covers_max_extent() {
            return;
        }
        let dx = self.width() / 100.0 * STEP_FACTOR;
        let dy = self.height() / 100.0 * STEP_FACTOR;
        let (dx, dy) = match direction {
            Direction::North => (0.0, dy),
            Direction::East => (dx, 0.0),
            Direction::South => (0.0, -dy),
            Direction::West => (-dx, 0.0),
        };
        self.lon_min += dx;
        self.lon_max += dx;
        self.lat_min += dy;
        self.lat_max += dy;
    }

    /// Same size, centered on `center`.
    pub fn centered_on(&self, center: LonLat) -> BoundingBox {
        let half_width = self.width() / 2.0;
        let half_height = self.height() / 2.0;
        BoundingBox::new(
            center.lon - half_width,
            center.lat - half_height,
            center.lon + half_width,
            center.lat + half_height,
        )
    }

    /// Same center, each side multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> BoundingBox {
        let center = self.center();
        let half_width = self.width() * factor / 2.0;
        let half_height = self.height() * factor / 2.0;
        BoundingBox::new(
            center.lon - half_width,
            center.lat - half_height,
            center.lon + half_width,
            center.lat + half_height,
        )
    }

    /// Stretches the shorter side around the center so the box has the
    /// aspect ratio of a `width` x `height` pixel viewport. Never shrinks.
    pub fn fit_to(&self, width: u32, height: u32) -> BoundingBox {
        if width == 0 || height == 0 || self.width() <= 0.0 || self.height() <= 0.0 {
            return *self;
        }
        let target = f64::from(height) / f64::from(width);
        let center = self.center();
        let (half_width, half_height) = if self.ratio() < target {
            (self.width() / 2.0, self.width() * target / 2.0)
        } else {
            (self.height() / target / 2.0, self.height() / 2.0)
        };
        BoundingBox::new(
            center.lon - half_width,
            center.lat - half_height,
            center.lon + half_width,
            center.lat + half_height,
        )
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::MAX_EXTENT
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.lon_min, self.lat_min, self.lon_max, self.lat_max
        )
    }
}
