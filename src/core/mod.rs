use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config,
    ring::Ring,
    types::{within_radius, Bounds, Ripple, Ship, Tint, Vec2},
};

/// How the cohesion and alignment passes count the divisor of their running
/// average.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Averaging {
    /// Count every (ship, ripple) pair the pass examines, overlapping or
    /// not. Historical behavior; the average then depends on the live ripple
    /// count even when nothing overlaps.
    #[default]
    EveryPair,
    /// Count only pairs that actually overlap.
    OverlapOnly,
}

impl Averaging {
    pub fn label(self) -> &'static str {
        match self {
            Averaging::EveryPair => "every-pair",
            Averaging::OverlapOnly => "overlap-only",
        }
    }
}

/// Operator-facing tunables, owned by the shell and passed into `tick` and
/// `spawn_ripple` rather than living inside the world.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimConfig {
    pub cohesion: u32,
    pub alignment: u32,
    pub separation: u32,
    /// Tint for the next spawned ripple; `None` spawns invisible.
    pub brush: Option<Tint>,
    pub averaging: Averaging,
}

impl SimConfig {
    pub fn raise_cohesion(&mut self) {
        self.cohesion += 1;
    }

    pub fn lower_cohesion(&mut self) {
        self.cohesion = self.cohesion.saturating_sub(1);
    }

    pub fn raise_alignment(&mut self) {
        self.alignment += 1;
    }

    pub fn lower_alignment(&mut self) {
        self.alignment = self.alignment.saturating_sub(1);
    }

    pub fn raise_separation(&mut self) {
        self.separation += 1;
    }

    pub fn lower_separation(&mut self) {
        self.separation = self.separation.saturating_sub(1);
    }

    pub fn toggle_averaging(&mut self) {
        self.averaging = match self.averaging {
            Averaging::EveryPair => Averaging::OverlapOnly,
            Averaging::OverlapOnly => Averaging::EveryPair,
        };
    }
}

#[derive(Debug)]
pub struct World {
    pub ships: Ring<Ship>,
    pub ripples: Ring<Ripple>,
}

impl World {
    pub fn new(bounds: Bounds) -> Self {
        let mut rng = StdRng::from_entropy();
        Self {
            ships: populate(&mut rng, bounds),
            ripples: Ring::new(),
        }
    }

    /// Reproducible population, for headless runs and tests.
    #[allow(dead_code)]
    pub fn seeded(bounds: Bounds, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            ships: populate(&mut rng, bounds),
            ripples: Ring::new(),
        }
    }

    pub fn spawn_ripple(&mut self, pos: Vec2, tint: Option<Tint>) {
        self.ripples.insert_head(Ripple {
            pos,
            radius: config::RIPPLE_START_RADIUS,
            tint,
        });
    }

    /// One simulation step. Ripples age before any ship moves; the ship
    /// passes then run in fixed order, each reading the previous pass's
    /// output.
    pub fn tick(&mut self, cfg: &SimConfig, bounds: Bounds) {
        self.age_ripples();
        self.drift_ships(bounds);
        self.displace_ships();
        self.cohere_ships(cfg);
        self.align_ships(cfg);
        self.separate_ships(cfg);
    }

    pub fn snapshot(&self, out: &mut Vec<Ship>) {
        out.clear();
        out.extend(self.ships.iter().copied());
    }

    pub fn ripples_snapshot(&self, out: &mut Vec<Ripple>) {
        out.clear();
        out.extend(self.ripples.iter().copied());
    }

    fn age_ripples(&mut self) {
        for _ in 0..self.ripples.len() {
            let mut ripple = *self.ripples.head();
            self.ripples.remove_head();
            ripple.radius += config::RIPPLE_GROWTH;
            if ripple.radius < config::RIPPLE_MAX_RADIUS {
                self.ripples.insert_head(ripple);
                self.ripples.rotate();
            }
        }
    }

    fn drift_ships(&mut self, bounds: Bounds) {
        self.update_ships(|ship, _| {
            ship.pos += ship.vel;
            reflect_into_bounds(ship, bounds);
        });
    }

    /// Every overlapping ripple of a matching (or invisible) tint pushes the
    /// ship radially away from the ripple's center, with force fading as the
    /// ripple expands. Pushes from multiple ripples accumulate.
    fn displace_ships(&mut self) {
        self.update_ships(|ship, ripples| {
            each_ripple(ripples, |ripple| {
                let tint_matches = ripple.tint.is_none() || ripple.tint == Some(ship.tint);
                if tint_matches && within_radius(ripple.pos, ship.pos, ripple.radius) {
                    let push = (ship.pos - ripple.pos) * (config::DISPLACE_GAIN * ripple.intensity());
                    ship.heading += push;
                    ship.pos += push;
                }
            });
            ship.heading = ship.heading.normalized_to(config::HEADING_LEN);
        });
    }

    /// The sum and tally persist across the whole walk, so later ships are
    /// averaged against everything examined before them.
    fn cohere_ships(&mut self, cfg: &SimConfig) {
        let mut sum = Vec2::ZERO;
        let mut tally = 0u32;
        self.update_ships(|ship, ripples| {
            each_ripple(ripples, |ripple| {
                let overlaps = within_radius(ripple.pos, ship.pos, ripple.radius);
                if cfg.averaging == Averaging::EveryPair || overlaps {
                    tally += 1;
                }
                if overlaps {
                    sum += ship.pos;
                    ship.pos = (sum / tally as f32) * cfg.cohesion as f32;
                }
            });
            ship.heading = ship.heading.normalized_to(config::HEADING_LEN);
        });
    }

    fn align_ships(&mut self, cfg: &SimConfig) {
        let mut sum = Vec2::ZERO;
        let mut tally = 0u32;
        self.update_ships(|ship, ripples| {
            each_ripple(ripples, |ripple| {
                let overlaps = within_radius(ripple.pos, ship.pos, ripple.radius);
                if cfg.averaging == Averaging::EveryPair || overlaps {
                    tally += 1;
                }
                if overlaps {
                    sum += ship.heading;
                    ship.pos = (sum / tally as f32) * cfg.alignment as f32;
                }
            });
            ship.heading = ship.heading.normalized_to(config::HEADING_LEN);
        });
    }

    fn separate_ships(&mut self, cfg: &SimConfig) {
        self.update_ships(|ship, ripples| {
            each_ripple(ripples, |ripple| {
                if within_radius(ripple.pos, ship.pos, ripple.radius) {
                    // Whichever overlapping ripple is examined last wins.
                    ship.pos = ship.pos * cfg.separation as f32;
                }
            });
            ship.heading = ship.heading.normalized_to(config::HEADING_LEN);
        });
    }

    /// Drain-rebuild walk over the ship ring: each ship is copied out,
    /// handed to the pass, reinserted at the head, and rotated past, so a
    /// full walk touches every ship exactly once.
    fn update_ships(&mut self, mut pass: impl FnMut(&mut Ship, &mut Ring<Ripple>)) {
        for _ in 0..self.ships.len() {
            let mut ship = *self.ships.head();
            self.ships.remove_head();
            pass(&mut ship, &mut self.ripples);
            self.ships.insert_head(ship);
            self.ships.rotate();
        }
    }
}

/// Rotate-only walk of the ripple ring: one rotation per ripple examined, so
/// the ring ends where it started.
fn each_ripple(ripples: &mut Ring<Ripple>, mut f: impl FnMut(Ripple)) {
    for _ in 0..ripples.len() {
        f(*ripples.head());
        ripples.rotate();
    }
}

fn reflect_into_bounds(ship: &mut Ship, bounds: Bounds) {
    let scaled = ship.pos * config::REFLECT_SCALE;
    if scaled.x > bounds.half_width {
        ship.vel.x = -ship.vel.x;
        ship.pos.x = bounds.half_width - config::SHIP_RADIUS;
    } else if scaled.x < -bounds.half_width {
        ship.vel.x = -ship.vel.x;
        ship.pos.x = -(bounds.half_width - config::SHIP_RADIUS);
    }
    if scaled.y > bounds.half_height {
        ship.vel.y = -ship.vel.y;
        ship.pos.y = bounds.half_height - config::SHIP_RADIUS;
    } else if scaled.y < -bounds.half_height {
        ship.vel.y = -ship.vel.y;
        ship.pos.y = -(bounds.half_height - config::SHIP_RADIUS);
    }
}

fn populate(rng: &mut StdRng, bounds: Bounds) -> Ring<Ship> {
    let mut ships = Ring::new();
    for _ in 0..config::SHIP_COUNT {
        ships.insert_head(spawn_ship(rng, bounds));
    }
    ships
}

fn spawn_ship(rng: &mut StdRng, bounds: Bounds) -> Ship {
    let pos = Vec2::new(
        rng.gen_range(-bounds.half_width..bounds.half_width),
        rng.gen_range(-bounds.half_height..bounds.half_height),
    );
    let heading = Vec2::new(
        rng.gen_range(config::HEADING_SEED_MIN..config::HEADING_SEED_MAX),
        rng.gen_range(config::HEADING_SEED_MIN..config::HEADING_SEED_MAX),
    )
    .normalized_to(config::HEADING_LEN);
    let tint = Tint::ALL[rng.gen_range(0..Tint::ALL.len())];

    // Split the speed across the axes so the per-axis increments always
    // combine back to the drawn speed, then flip signs independently.
    let speed = rng.gen_range(config::SHIP_SPEED_MIN..config::SHIP_SPEED_MAX);
    let mut vel = Vec2::new(rng.gen_range(speed / 4.0..speed), 0.0);
    vel.y = (speed * speed - vel.x * vel.x).sqrt();
    if rng.gen_bool(0.5) {
        vel.x = -vel.x;
    }
    if rng.gen_bool(0.5) {
        vel.y = -vel.y;
    }

    Ship {
        pos,
        heading,
        vel,
        speed,
        tint,
    }
}
