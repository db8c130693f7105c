//! Turning a synthesized height into a displaced vertex.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::altitude::AltitudeMetric;
use super::theme::Theme;

/// How raw noise heights are floored before displacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HeightPolicy {
    /// Heights below the theme's lowest band are raised to it.
    ClampToLowestBand,
    /// A radial falloff is subtracted from the height; heights the mask
    /// swallows entirely are set to `floor`.
    Island { floor: f32 },
}

/// A planar falloff mask sampled at raw base-mesh coordinates.
pub trait RadialMask: Send + Sync {
    fn gradient_at(&self, x: f32, y: f32) -> f32;
}

/// Quadratic falloff from 0 at `center` to 1 at `radius` and beyond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub radius: f32,
}

impl RadialGradient {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl RadialMask for RadialGradient {
    fn gradient_at(&self, x: f32, y: f32) -> f32 {
        let d = ((Vec2::new(x, y) - self.center).length() / self.radius).clamp(0.0, 1.0);
        d * d
    }
}

/// Applies a theme's height policy and hands the result to the altitude metric.
pub struct HeightProjector {
    policy: HeightPolicy,
    floor: f32,
    mask: Option<Box<dyn RadialMask>>,
}

impl HeightProjector {
    /// Projector for `theme`; `mask` is only consulted by the island policy.
    pub fn new(theme: &Theme, mask: Option<Box<dyn RadialMask>>) -> Self {
        Self {
            policy: theme.height_policy(),
            floor: theme.lowest_threshold(),
            mask,
        }
    }

    /// Projector for `theme` with a radial gradient centred on the origin
    /// when the theme asks for one.
    pub fn for_theme(theme: &Theme, radius: f32) -> Self {
        let mask: Option<Box<dyn RadialMask>> = match theme.height_policy() {
            HeightPolicy::Island { .. } => Some(Box::new(RadialGradient::new(Vec2::ZERO, radius))),
            HeightPolicy::ClampToLowestBand => None,
        };
        Self::new(theme, mask)
    }

    pub fn policy(&self) -> HeightPolicy {
        self.policy
    }

    /// Height after the policy's floor is applied.
    pub fn clamp_height(&self, raw: Vec3, height: f32) -> f32 {
        match self.policy {
            HeightPolicy::ClampToLowestBand => {
                if height < self.floor {
                    self.floor
                } else {
                    height
                }
            }
            HeightPolicy::Island { floor } => {
                let r = self.mask.as_ref().map_or(0.0, |m| m.gradient_at(raw.x, raw.y));
                if r >= height {
                    floor
                } else {
                    height - r
                }
            }
        }
    }

    /// Displaced position of `raw` for a synthesized `height`.
    pub fn project<M: AltitudeMetric + ?Sized>(&self, metric: &M, raw: Vec3, height: f32) -> Vec3 {
        metric.displace(raw, self.clamp_height(raw, height))
    }
}
