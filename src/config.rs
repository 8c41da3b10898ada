pub const TICK_MS: u64 = 20;
pub const RENDER_HZ: f32 = 30.0;

pub const SHIP_COUNT: usize = 1000;

pub const RIPPLE_START_RADIUS: f32 = 0.0;
pub const RIPPLE_MAX_RADIUS: f32 = 0.5;
pub const RIPPLE_GROWTH: f32 = 0.01;
pub const RIPPLE_SEGMENTS: usize = 25;

pub const SHIP_RADIUS: f32 = 0.02;
pub const HEADING_LEN: f32 = 0.01;
pub const HEADING_SEED_MIN: f32 = -0.0001;
pub const HEADING_SEED_MAX: f32 = 0.0001;
pub const SHIP_SPEED_MIN: f32 = 0.010;
pub const SHIP_SPEED_MAX: f32 = 0.045;

pub const DISPLACE_GAIN: f32 = 0.05;

// Ship positions are scaled by this factor before the wall test, which makes
// the reflective boundary far larger than the nominal viewport. Inherited
// tuning constant; it matches SHIP_RADIUS by coincidence, not by derivation.
pub const REFLECT_SCALE: f32 = 0.02;

pub const PALETTE: [[f32; 3]; 7] = [
    [1.0, 1.0, 1.0],
    [1.0, 0.3, 0.3],
    [1.0, 1.0, 0.3],
    [0.3, 1.0, 0.3],
    [0.3, 1.0, 1.0],
    [0.3, 0.3, 1.0],
    [1.0, 0.3, 1.0],
];
