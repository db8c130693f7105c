//! Cube-surface points and their mapping onto the unit sphere.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::face::CubeFaceId;

/// Converts UV coordinates on a face to a 3D point on the unit cube surface.
///
/// UV coordinates are in [0, 1] range and map to [-1, 1] on the cube face.
///
/// # Arguments
/// * `face` - The cube face
/// * `u` - U coordinate in [0, 1]
/// * `v` - V coordinate in [0, 1]
///
/// # Returns
/// A point on the surface of the unit cube
pub fn face_uv_to_cube(face: CubeFaceId, u: f32, v: f32) -> Vec3 {
    let s = u * 2.0 - 1.0;
    let t = v * 2.0 - 1.0;

    match face {
        CubeFaceId::PosX => Vec3::new(1.0, t, -s),
        CubeFaceId::NegX => Vec3::new(-1.0, t, s),
        CubeFaceId::PosY => Vec3::new(s, 1.0, t),
        CubeFaceId::NegY => Vec3::new(s, -1.0, -t),
        CubeFaceId::PosZ => Vec3::new(s, t, 1.0),
        CubeFaceId::NegZ => Vec3::new(-s, t, -1.0),
    }
}

/// Maps a point on the unit cube surface to the unit sphere.
///
/// Analytic spherification spreads subdivided face points more evenly than
/// plain normalisation, which bunches them up towards the cube corners.
///
/// # Example
/// ```
/// use glam::Vec3;
/// use terrace::geometry::spherify_point;
///
/// let p = spherify_point(Vec3::new(1.0, -1.0, 0.25));
/// assert!((p.length() - 1.0).abs() < 1e-5);
/// ```
pub fn spherify_point(cube_pos: Vec3) -> Vec3 {
    let x2 = cube_pos.x * cube_pos.x;
    let y2 = cube_pos.y * cube_pos.y;
    let z2 = cube_pos.z * cube_pos.z;

    Vec3::new(
        cube_pos.x * (1.0 - y2 / 2.0 - z2 / 2.0 + y2 * z2 / 3.0).max(0.0).sqrt(),
        cube_pos.y * (1.0 - x2 / 2.0 - z2 / 2.0 + x2 * z2 / 3.0).max(0.0).sqrt(),
        cube_pos.z * (1.0 - x2 / 2.0 - y2 / 2.0 + x2 * y2 / 3.0).max(0.0).sqrt(),
    )
}

/// Longitude/latitude texture coordinates of a direction, both in [0, 1].
///
/// Longitude is measured around +Z (the flat terrain's up axis) so the seam
/// runs along -X.
pub fn direction_to_lon_lat_uv(dir: Vec3) -> Vec2 {
    let len = dir.length();
    if len == 0.0 {
        return Vec2::splat(0.5);
    }
    let lon = dir.y.atan2(dir.x);
    let lat = (dir.z / len).clamp(-1.0, 1.0).asin();
    Vec2::new(0.5 + lon / TAU, 0.5 + lat / PI)
}
