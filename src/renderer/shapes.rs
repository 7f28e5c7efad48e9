//! Breath circle shapes
//!
//! The frame is a pure function of the session radius: a soft aura, a
//! translucent disc and a thin ring, all brightening with the glow factor.

use glam::Vec2;

use super::surface::{Color, ColorStop, RadialGradient, Surface};
use crate::sim::BreathSession;

/// Disc and aura color
pub const CIRCLE_COLOR: Color = Color::rgb(122, 167, 255);
/// Ring color
pub const RING_COLOR: Color = Color::rgb(232, 235, 255);

/// Aura spans from 0.6x to 1.8x the radius
const AURA_INNER_SCALE: f32 = 0.6;
const AURA_OUTER_SCALE: f32 = 1.8;

/// Derived drawing parameters for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStyle {
    pub radius: f32,
    /// Normalized radius in [0, 1]
    pub glow: f32,
    pub aura_inner_radius: f32,
    pub aura_outer_radius: f32,
    /// Alpha at the aura's inner edge (fades to 0 outward)
    pub aura_alpha: f32,
    pub fill_alpha: f32,
    pub ring_width: f32,
    /// Ring sits inside the disc edge
    pub ring_radius: f32,
}

impl FrameStyle {
    pub fn new(radius: f32, min_radius: f32, max_radius: f32) -> Self {
        let glow = crate::normalize(radius, min_radius, max_radius);
        let ring_width = 2.0 + glow * 3.0;
        Self {
            radius,
            glow,
            aura_inner_radius: radius * AURA_INNER_SCALE,
            aura_outer_radius: radius * AURA_OUTER_SCALE,
            aura_alpha: 0.20 + glow * 0.15,
            fill_alpha: 0.25 + glow * 0.35,
            ring_width,
            ring_radius: (radius - ring_width).max(0.0),
        }
    }

    pub fn for_session(session: &BreathSession) -> Self {
        Self::new(session.radius, session.min_radius, session.max_radius)
    }

    /// Aura gradient centered on `center`
    pub fn aura(&self, center: Vec2) -> RadialGradient {
        RadialGradient {
            center,
            inner_radius: self.aura_inner_radius,
            outer_radius: self.aura_outer_radius,
            stops: vec![
                ColorStop {
                    offset: 0.0,
                    color: CIRCLE_COLOR.with_alpha(self.aura_alpha),
                },
                ColorStop {
                    offset: 1.0,
                    color: Color::TRANSPARENT,
                },
            ],
        }
    }
}

/// Draw one frame of the breath circle, centered on the surface
pub fn draw_breath<S: Surface>(surface: &mut S, session: &BreathSession) -> FrameStyle {
    let style = FrameStyle::for_session(session);
    let center = surface.size() / 2.0;

    surface.clear();

    // Outer aura
    surface.fill_circle_gradient(center, style.aura_outer_radius, &style.aura(center));

    // Main disc
    surface.set_alpha(style.fill_alpha);
    surface.fill_circle(center, style.radius, CIRCLE_COLOR);
    surface.set_alpha(1.0);

    // Ring
    surface.stroke_circle(center, style.ring_radius, style.ring_width, RING_COLOR);

    style
}
