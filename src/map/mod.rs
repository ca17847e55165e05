//! Map viewport model
//!
//! A region is a centre coordinate plus the full latitude/longitude span
//! visible in the viewport.

mod tiles;

pub use tiles::{TileOverlay, MAX_TILE_ZOOM};

use serde::Deserialize;
use std::time::{Duration, Instant};

/// Span used when centring on a location fix
pub const FIX_LATITUDE_DELTA: f64 = 0.01;
pub const FIX_LONGITUDE_DELTA: f64 = 0.005;

/// Duration of the recenter animation
pub const RECENTER_DURATION: Duration = Duration::from_millis(1000);

/// Smallest and largest spans the zoom controls allow
const MIN_DELTA: f64 = 0.0005;
const MAX_DELTA: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Map viewport descriptor
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    /// Default campus-area viewport (Fujisawa)
    pub fn campus_default() -> Self {
        Self {
            latitude: 35.3396,
            longitude: 139.4876,
            latitude_delta: 0.04,
            longitude_delta: 0.02,
        }
    }

    /// Tightly zoomed region centred on a location fix
    pub fn around_fix(fix: Coordinate) -> Self {
        Self {
            latitude: fix.latitude,
            longitude: fix.longitude,
            latitude_delta: FIX_LATITUDE_DELTA,
            longitude_delta: FIX_LONGITUDE_DELTA,
        }
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Longitude bounds `[west, east]`
    pub fn x_bounds(&self) -> [f64; 2] {
        let half = self.longitude_delta / 2.0;
        [self.longitude - half, self.longitude + half]
    }

    /// Latitude bounds `[south, north]`
    pub fn y_bounds(&self) -> [f64; 2] {
        let half = self.latitude_delta / 2.0;
        [self.latitude - half, self.latitude + half]
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        let [west, east] = self.x_bounds();
        let [south, north] = self.y_bounds();
        (west..=east).contains(&point.longitude) && (south..=north).contains(&point.latitude)
    }

    /// Scale both spans by `factor` (< 1 zooms in)
    pub fn zoomed(&self, factor: f64) -> Self {
        Self {
            latitude_delta: (self.latitude_delta * factor).clamp(MIN_DELTA, MAX_DELTA),
            longitude_delta: (self.longitude_delta * factor).clamp(MIN_DELTA, MAX_DELTA * 2.0),
            ..*self
        }
    }

    /// Move the centre by a fraction of the visible span
    pub fn panned(&self, dx: f64, dy: f64) -> Self {
        Self {
            latitude: (self.latitude + dy * self.latitude_delta).clamp(-85.0, 85.0),
            longitude: wrap_longitude(self.longitude + dx * self.longitude_delta),
            ..*self
        }
    }

    /// Linear interpolation between two regions, `t` in `0.0..=1.0`
    pub fn lerp(&self, to: &Region, t: f64) -> Self {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *to;
        }
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            latitude: mix(self.latitude, to.latitude),
            longitude: mix(self.longitude, to.longitude),
            latitude_delta: mix(self.latitude_delta, to.latitude_delta),
            longitude_delta: mix(self.longitude_delta, to.longitude_delta),
        }
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Fire-and-forget viewport transition
#[derive(Debug, Clone)]
pub struct RegionAnimation {
    from: Region,
    to: Region,
    started: Instant,
    duration: Duration,
}

impl RegionAnimation {
    pub fn starting_at(from: Region, to: Region, duration: Duration, started: Instant) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    /// Region to display at `now`
    pub fn sample(&self, now: Instant) -> Region {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started);
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        // Ease-out so the viewport settles gently on the target
        let eased = 1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(3);
        self.from.lerp(&self.to, eased)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}
