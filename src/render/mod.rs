use std::f32::consts::TAU;

use crate::{
    config,
    types::{Bounds, Ripple, Ship, Vec2},
};

#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

#[derive(Clone, Copy, Debug)]
pub struct RenderCell {
    pub ch: char,
    pub weight: f32,
    pub rgb: [u8; 3],
}

#[derive(Debug)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<RenderCell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let mut buffer = Self {
            width,
            height,
            cells: Vec::new(),
        };
        buffer.resize(width, height);
        buffer
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let len = (width as usize).saturating_mul(height as usize);
        if self.cells.len() != len {
            self.cells.resize(
                len,
                RenderCell {
                    ch: ' ',
                    weight: f32::NEG_INFINITY,
                    rgb: [0, 0, 0],
                },
            );
        }
        self.clear();
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.ch = ' ';
            cell.weight = f32::NEG_INFINITY;
            cell.rgb = [0, 0, 0];
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> RenderCell {
        debug_assert!(x < self.width && y < self.height, "get() out of bounds");
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.cells[idx]
    }

    fn set(&mut self, x: u16, y: u16, ch: char, weight: f32, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        let cell = &mut self.cells[idx];
        if weight >= cell.weight {
            cell.weight = weight;
            cell.ch = ch;
            cell.rgb = rgb;
        }
    }
}

pub fn draw(
    ships: &[Ship],
    ripples: &[Ripple],
    bounds: Bounds,
    viewport: Viewport,
    frame: &mut FrameBuffer,
) {
    if frame.width() != viewport.width || frame.height() != viewport.height {
        frame.resize(viewport.width, viewport.height);
    } else {
        frame.clear();
    }

    for ripple in ripples {
        draw_ripple(ripple, bounds, viewport, frame);
    }
    for ship in ships {
        if let Some((x, y)) = project(ship.pos, bounds, viewport) {
            let base = ship.tint.rgb();
            frame.set(x, y, heading_glyph(ship.heading), 2.0, scale_rgb(base, 1.0));
        }
    }
}

/// Plots the ripple as a ring of points whose glyph and color dissipate as
/// the ripple expands. Invisible ripples draw nothing.
fn draw_ripple(ripple: &Ripple, bounds: Bounds, viewport: Viewport, frame: &mut FrameBuffer) {
    let Some(tint) = ripple.tint else {
        return;
    };
    let intensity = ripple.intensity();
    let glyph = if intensity > 0.66 {
        'O'
    } else if intensity > 0.33 {
        'o'
    } else {
        '·'
    };
    let rgb = scale_rgb(tint.rgb(), intensity);
    for i in 0..config::RIPPLE_SEGMENTS {
        let theta = TAU * i as f32 / config::RIPPLE_SEGMENTS as f32;
        let point = Vec2::new(
            ripple.pos.x + ripple.radius * theta.cos(),
            ripple.pos.y + ripple.radius * theta.sin(),
        );
        if let Some((x, y)) = project(point, bounds, viewport) {
            frame.set(x, y, glyph, intensity, rgb);
        }
    }
}

/// World coordinates to a viewport cell, with screen y growing downward.
/// Returns `None` for points outside the viewport.
fn project(pos: Vec2, bounds: Bounds, viewport: Viewport) -> Option<(u16, u16)> {
    let half_w = viewport.width as f32 / 2.0;
    let half_h = viewport.height as f32 / 2.0;
    let sx = (pos.x / bounds.half_width * half_w + half_w).round() as i32;
    let sy = (half_h - pos.y / bounds.half_height * half_h).round() as i32;
    if sx < 0 || sy < 0 || sx >= viewport.width as i32 || sy >= viewport.height as i32 {
        return None;
    }
    Some((sx as u16, sy as u16))
}

fn heading_glyph(heading: Vec2) -> char {
    if heading == Vec2::ZERO {
        return '•';
    }
    let angle = heading.y.atan2(heading.x);
    // Eight sectors counterclockwise from east, TAU/8 wide each.
    let octant = ((angle / (TAU / 8.0)).round() as i32).rem_euclid(8);
    match octant {
        0 => '>',
        1 => '/',
        2 => '^',
        3 => '\\',
        4 => '<',
        5 => '/',
        6 => 'v',
        _ => '\\',
    }
}

fn scale_rgb(base: [f32; 3], intensity: f32) -> [u8; 3] {
    let clamp = |v: f32| (v * intensity * 255.0).clamp(0.0, 255.0) as u8;
    [clamp(base[0]), clamp(base[1]), clamp(base[2])]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tint;

    fn ship_at(pos: Vec2, heading: Vec2, tint: Tint) -> Ship {
        Ship {
            pos,
            heading,
            vel: Vec2::ZERO,
            speed: 0.0,
            tint,
        }
    }

    mod framebuffer {
        use super::*;

        #[test]
        fn creates_with_correct_dimensions() {
            let fb = FrameBuffer::new(80, 24);
            assert_eq!(fb.width(), 80);
            assert_eq!(fb.height(), 24);
        }

        #[test]
        fn clear_resets_cells_to_space() {
            let mut fb = FrameBuffer::new(4, 4);
            fb.set(1, 1, 'x', 1.0, [255, 0, 0]);
            fb.clear();
            assert_eq!(fb.get(1, 1).ch, ' ');
        }

        #[test]
        fn heavier_writes_win() {
            let mut fb = FrameBuffer::new(4, 4);
            fb.set(2, 2, 'a', 1.0, [10, 10, 10]);
            fb.set(2, 2, 'b', 0.5, [20, 20, 20]);
            assert_eq!(fb.get(2, 2).ch, 'a');
            fb.set(2, 2, 'c', 2.0, [30, 30, 30]);
            assert_eq!(fb.get(2, 2).ch, 'c');
        }

        #[test]
        fn out_of_bounds_set_is_ignored() {
            let mut fb = FrameBuffer::new(4, 4);
            fb.set(100, 100, 'x', 1.0, [0, 0, 0]);
        }
    }

    mod projection {
        use super::*;

        #[test]
        fn origin_maps_to_viewport_center() {
            let viewport = Viewport {
                width: 80,
                height: 24,
            };
            let cell = project(Vec2::ZERO, Bounds::default(), viewport);
            assert_eq!(cell, Some((40, 12)));
        }

        #[test]
        fn top_of_domain_maps_to_row_zero() {
            let viewport = Viewport {
                width: 80,
                height: 24,
            };
            let cell = project(Vec2::new(0.0, 1.0), Bounds::default(), viewport);
            assert_eq!(cell, Some((40, 0)));
        }

        #[test]
        fn point_far_outside_domain_is_culled() {
            let viewport = Viewport {
                width: 80,
                height: 24,
            };
            assert_eq!(project(Vec2::new(50.0, 0.0), Bounds::default(), viewport), None);
        }
    }

    mod heading_glyphs {
        use super::*;

        #[test]
        fn cardinal_directions_pick_the_matching_arrow() {
            assert_eq!(heading_glyph(Vec2::new(0.01, 0.0)), '>');
            assert_eq!(heading_glyph(Vec2::new(-0.01, 0.0)), '<');
            assert_eq!(heading_glyph(Vec2::new(0.0, 0.01)), '^');
            assert_eq!(heading_glyph(Vec2::new(0.0, -0.01)), 'v');
        }

        #[test]
        fn rest_state_gets_a_dot() {
            assert_eq!(heading_glyph(Vec2::ZERO), '•');
        }
    }

    mod draw_fn {
        use super::*;

        fn viewport() -> Viewport {
            Viewport {
                width: 80,
                height: 24,
            }
        }

        #[test]
        fn empty_scene_produces_blank_frame() {
            let mut frame = FrameBuffer::new(80, 24);
            draw(&[], &[], Bounds::default(), viewport(), &mut frame);
            for y in 0..24 {
                for x in 0..80 {
                    assert_eq!(frame.get(x, y).ch, ' ');
                }
            }
        }

        #[test]
        fn ship_at_origin_is_drawn_at_center() {
            let ships = [ship_at(Vec2::ZERO, Vec2::new(0.01, 0.0), Tint::Red)];
            let mut frame = FrameBuffer::new(80, 24);
            draw(&ships, &[], Bounds::default(), viewport(), &mut frame);
            assert_eq!(frame.get(40, 12).ch, '>');
        }

        #[test]
        fn invisible_ripple_draws_nothing() {
            let ripples = [Ripple {
                pos: Vec2::ZERO,
                radius: 0.25,
                tint: None,
            }];
            let mut frame = FrameBuffer::new(80, 24);
            draw(&[], &ripples, Bounds::default(), viewport(), &mut frame);
            for y in 0..24 {
                for x in 0..80 {
                    assert_eq!(frame.get(x, y).ch, ' ');
                }
            }
        }

        #[test]
        fn visible_ripple_plots_ring_points() {
            let ripples = [Ripple {
                pos: Vec2::ZERO,
                radius: 0.25,
                tint: Some(Tint::Cyan),
            }];
            let mut frame = FrameBuffer::new(80, 24);
            draw(&[], &ripples, Bounds::default(), viewport(), &mut frame);
            let drawn = (0..24)
                .flat_map(|y| (0..80).map(move |x| (x, y)))
                .filter(|&(x, y)| frame.get(x, y).ch != ' ')
                .count();
            assert!(drawn > 0);
        }

        #[test]
        fn ship_wins_the_cell_over_a_ripple_point() {
            // The rightmost ring point of this ripple lands exactly on the
            // ship's cell; the ship's weight must take it.
            let ships = [ship_at(Vec2::new(0.25, 0.0), Vec2::new(0.01, 0.0), Tint::Red)];
            let ripples = [Ripple {
                pos: Vec2::ZERO,
                radius: 0.25,
                tint: Some(Tint::Cyan),
            }];
            let mut frame = FrameBuffer::new(80, 24);
            draw(&ships, &ripples, Bounds::default(), viewport(), &mut frame);
            let (x, y) = project(Vec2::new(0.25, 0.0), Bounds::default(), viewport()).unwrap();
            assert_eq!(frame.get(x, y).ch, '>');
        }
    }
}
