//! 2D drawing surface abstraction
//!
//! The breath scene only needs a handful of primitives, so any host that can
//! clear, fill and stroke circles with opacity can display it.

use glam::Vec2;

/// RGB color with separate alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS color string (`#rrggbb` when opaque, `rgba(..)` otherwise)
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

/// A radial gradient color stop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient, 0 = inner circle, 1 = outer
    pub offset: f32,
    pub color: Color,
}

/// Radial gradient between two concentric circles
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub stops: Vec<ColorStop>,
}

/// Drawing primitives the renderer relies on
pub trait Surface {
    /// Logical size in px
    fn size(&self) -> Vec2;
    /// Erase the previous frame
    fn clear(&mut self);
    /// Global opacity for subsequent fills and strokes
    fn set_alpha(&mut self, alpha: f32);
    /// Fill a circle with a radial gradient
    fn fill_circle_gradient(&mut self, center: Vec2, radius: f32, gradient: &RadialGradient);
    /// Fill a circle with a solid color
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Stroke a circle outline
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color);
}

/// A recorded drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetAlpha(f32),
    FillGradient {
        center: Vec2,
        radius: f32,
        gradient: RadialGradient,
    },
    Fill {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Stroke {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
    },
}

/// Headless surface that keeps the commands of the latest frame
#[derive(Debug, Clone)]
pub struct DisplayList {
    size: Vec2,
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl DisplayList {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
            frames: 0,
        }
    }

    /// Commands since the last clear
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of clears (one per rendered frame)
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Surface for DisplayList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.frames += 1;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::SetAlpha(alpha));
    }

    fn fill_circle_gradient(&mut self, center: Vec2, radius: f32, gradient: &RadialGradient) {
        self.commands.push(DrawCommand::FillGradient {
            center,
            radius,
            gradient: gradient.clone(),
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Fill {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.commands.push(DrawCommand::Stroke {
            center,
            radius,
            width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_colors() {
        assert_eq!(Color::rgb(122, 167, 255).to_css(), "#7aa7ff");
        assert_eq!(
            Color::rgb(122, 167, 255).with_alpha(0.2).to_css(),
            "rgba(122,167,255,0.2)"
        );
        assert_eq!(Color::TRANSPARENT.to_css(), "rgba(0,0,0,0)");
    }

    #[test]
    fn test_display_list_keeps_latest_frame() {
        let mut list = DisplayList::new(Vec2::splat(100.0));
        list.clear();
        list.fill_circle(Vec2::ZERO, 5.0, Color::rgb(1, 2, 3));
        list.clear();
        list.set_alpha(0.5);
        assert_eq!(list.commands(), &[DrawCommand::SetAlpha(0.5)]);
        assert_eq!(list.frames(), 2);
    }
}
