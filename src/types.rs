use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

use crate::config;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    /// Rescales the vector to magnitude `len`. The zero vector is the rest
    /// state and passes through unchanged.
    pub fn normalized_to(self, len: f32) -> Vec2 {
        let mag = self.length();
        if mag > 0.0 {
            self * (len / mag)
        } else {
            self
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2> for f32 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self * rhs.x, self * rhs.y)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

/// Strict containment: true iff `a` lies inside the open disc of radius `r`
/// around `b`. A point exactly on the rim is outside.
pub fn within_radius(a: Vec2, b: Vec2, r: f32) -> bool {
    (a - b).length_sq() < r * r
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    White,
    Red,
    Yellow,
    Green,
    Cyan,
    Blue,
    Magenta,
}

impl Tint {
    pub const ALL: [Tint; 7] = [
        Tint::White,
        Tint::Red,
        Tint::Yellow,
        Tint::Green,
        Tint::Cyan,
        Tint::Blue,
        Tint::Magenta,
    ];

    pub fn rgb(self) -> [f32; 3] {
        config::PALETTE[self as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Tint::White => "white",
            Tint::Red => "red",
            Tint::Yellow => "yellow",
            Tint::Green => "green",
            Tint::Cyan => "cyan",
            Tint::Blue => "blue",
            Tint::Magenta => "magenta",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ship {
    pub pos: Vec2,
    /// Direction the ship points, held at magnitude `config::HEADING_LEN`
    /// whenever nonzero. Independent of `vel`.
    pub heading: Vec2,
    /// Per-tick free-flight increment; `vel.length() == speed` at spawn.
    pub vel: Vec2,
    pub speed: f32,
    pub tint: Tint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub pos: Vec2,
    pub radius: f32,
    /// `None` is the invisible ripple: it perturbs ships of every tint.
    pub tint: Option<Tint>,
}

impl Ripple {
    /// Remaining strength in `[0, 1]`, falling linearly as the ripple grows.
    pub fn intensity(self) -> f32 {
        (config::RIPPLE_MAX_RADIUS - self.radius)
            / (config::RIPPLE_MAX_RADIUS - config::RIPPLE_START_RADIUS)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub half_width: f32,
    pub half_height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            half_width: 1.0,
            half_height: 1.0,
        }
    }
}

impl Bounds {
    /// Maps the shorter viewport side to 2.0 world units and stretches the
    /// longer side by the aspect ratio, so a resize never crops the domain.
    pub fn from_viewport(width: u16, height: u16) -> Self {
        if width == 0 || height == 0 {
            return Self::default();
        }
        let (w, h) = (width as f32, height as f32);
        if w <= h {
            Self {
                half_width: 1.0,
                half_height: h / w,
            }
        } else {
            Self {
                half_width: w / h,
                half_height: 1.0,
            }
        }
    }
}
