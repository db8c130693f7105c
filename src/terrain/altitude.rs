//! How altitude is measured and how points are moved onto a height band.
//!
//! Flat terrain measures altitude along +Z; spherical terrain measures it as
//! distance from the origin. The slicer only talks to [`AltitudeMetric`], so
//! both shapes share one terracing implementation.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::{direction_to_lon_lat_uv, spherify_point};
use crate::noise::NoisePoint;

/// Domain policy for a terrain shape.
pub trait AltitudeMetric: Send + Sync {
    /// Coordinates the height noise is sampled at.
    type Coords: NoisePoint;

    fn noise_coords(&self, raw: Vec3) -> Self::Coords;

    /// Moves a raw base-mesh vertex to its displaced position for `height`.
    fn displace(&self, raw: Vec3, height: f32) -> Vec3;

    /// Altitude of a displaced vertex.
    fn measure(&self, v: Vec3) -> f32;

    /// Moves `v`, whose altitude is `altitude`, onto the band at `h`.
    fn project(&self, v: Vec3, altitude: f32, h: f32) -> Vec3;

    fn project_current(&self, v: Vec3, altitude: f32, h: f32) -> Vec3 {
        self.project(v, altitude, h)
    }

    fn project_below(&self, v: Vec3, altitude: f32, h: f32, wall_depth: f32) -> Vec3 {
        self.project(v, altitude, h - wall_depth)
    }

    /// Altitude of undisplaced terrain.
    fn baseline(&self) -> f32;

    /// Value looked up in the colour theme for the band at `h`.
    fn color_key(&self, h: f32) -> f32 {
        h - self.baseline()
    }

    fn roof_normal(&self, p: Vec3) -> Vec3;

    /// Horizontal direction of `p`, or zero on the vertical axis.
    fn wall_normal(&self, p: Vec3) -> Vec3 {
        Vec3::new(p.x, p.y, 0.0).normalize_or_zero()
    }

    fn uv(&self, p: Vec3) -> Vec2;
}

/// Altitude along +Z over a disc of `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatMetric {
    radius: f32,
}

impl FlatMetric {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl AltitudeMetric for FlatMetric {
    type Coords = Vec2;

    fn noise_coords(&self, raw: Vec3) -> Vec2 {
        Vec2::new(raw.x, raw.y)
    }

    fn displace(&self, raw: Vec3, height: f32) -> Vec3 {
        Vec3::new(raw.x, raw.y, height)
    }

    fn measure(&self, v: Vec3) -> f32 {
        v.z
    }

    fn project(&self, v: Vec3, _altitude: f32, h: f32) -> Vec3 {
        Vec3::new(v.x, v.y, h)
    }

    fn baseline(&self) -> f32 {
        0.0
    }

    fn roof_normal(&self, _p: Vec3) -> Vec3 {
        Vec3::Z
    }

    fn uv(&self, p: Vec3) -> Vec2 {
        Vec2::new(0.5 + p.x / self.radius * 0.5, 0.5 + p.y / self.radius * 0.5)
    }
}

/// How cube-surface points are pushed onto the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SphereProjection {
    /// Plain normalisation.
    #[default]
    Normalize,
    /// Analytic cube-to-sphere mapping with more even spacing.
    Spherify,
}

/// Altitude as distance from the origin; undisplaced terrain sits on the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereMetric {
    projection: SphereProjection,
    terrain_scale: f32,
}

impl SphereMetric {
    /// `terrain_scale` is the half-extent of the cube the base mesh was cut from.
    pub fn new(projection: SphereProjection, terrain_scale: f32) -> Self {
        Self {
            projection,
            terrain_scale,
        }
    }

    pub fn projection(&self) -> SphereProjection {
        self.projection
    }

    fn direction(&self, raw: Vec3) -> Vec3 {
        match self.projection {
            SphereProjection::Normalize => raw.normalize_or_zero(),
            SphereProjection::Spherify => spherify_point(raw / self.terrain_scale),
        }
    }
}

impl AltitudeMetric for SphereMetric {
    type Coords = Vec3;

    fn noise_coords(&self, raw: Vec3) -> Vec3 {
        raw
    }

    fn displace(&self, raw: Vec3, height: f32) -> Vec3 {
        self.direction(raw) * (1.0 + height)
    }

    fn measure(&self, v: Vec3) -> f32 {
        v.length()
    }

    // Altitude stays positive as long as heights are floored above -1.
    fn project(&self, v: Vec3, altitude: f32, h: f32) -> Vec3 {
        v / altitude * h
    }

    fn baseline(&self) -> f32 {
        1.0
    }

    fn roof_normal(&self, p: Vec3) -> Vec3 {
        p.normalize_or_zero()
    }

    fn uv(&self, p: Vec3) -> Vec2 {
        direction_to_lon_lat_uv(p)
    }
}
