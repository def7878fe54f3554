//! World simulation: the bird, the scrolling pipes and the score.
//!
//! Units are world pixels and milliseconds. The world is pure state and
//! knows nothing about glyphs; [`crate::scene`] turns it into draw calls.

use arrayvec::ArrayVec;

use crate::rng::SimpleRng;
use crate::types::{WORLD_HEIGHT, WORLD_WIDTH};

/// Downward acceleration in px/s².
pub const GRAVITY: f32 = 400.0;
/// Vertical speed right after a flap, in px/s.
pub const UPDRAFT_SPEED: f32 = -670.0;
/// Initial horizontal pipe speed in px/s.
pub const SCROLL_SPEED: f32 = -300.0;
/// Speed added (leftwards) on every speed-up.
pub const SPEEDUP_STEP: f32 = 5.0;
pub const SPEEDUP_INTERVAL_MS: u32 = 1000;
/// Points awarded on every speed-up.
pub const SCORE_STEP: u32 = 100;
pub const START_SCORE: u32 = 100;

pub const BIRD_X: f32 = 200.0;
pub const BIRD_Y: f32 = 200.0;
pub const BIRD_WIDTH: f32 = 64.0;
pub const BIRD_HEIGHT: f32 = 48.0;

pub const PIPE_PAIRS: usize = 3;
pub const FIRST_PIPE_X: f32 = 1000.0;
pub const PIPE_SPACING: f32 = 500.0;
pub const PIPE_WIDTH: f32 = 80.0;
pub const PIPE_HEIGHT: f32 = 500.0;
/// Pairs left of this are moved back to the right edge.
pub const RECYCLE_X: f32 = -210.0;
pub const GAP_MIN: i32 = 180;
pub const GAP_MAX: i32 = 280;

/// Axis-aligned box, edges inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        !(other.x > self.x + self.w
            || other.x + other.w < self.x
            || other.y + other.h < self.y
            || other.y > self.y + self.h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipePair {
    pub top: Rect,
    pub bottom: Rect,
}

impl PipePair {
    fn at(x: f32) -> Self {
        Self {
            top: Rect::new(x, 0.0, PIPE_WIDTH, PIPE_HEIGHT),
            bottom: Rect::new(x, 0.0, PIPE_WIDTH, PIPE_HEIGHT),
        }
    }

    /// Space between the two pipes.
    pub fn gap(&self) -> f32 {
        self.bottom.y - (self.top.y + self.top.h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Crashed,
}

#[derive(Debug, Clone)]
pub struct World {
    bird: Rect,
    /// Vertical bird speed in px/s.
    dy: f32,
    pipes: ArrayVec<PipePair, PIPE_PAIRS>,
    scroll_speed: f32,
    speedup_ms: u32,
    score: u32,
    updraft: bool,
    rng: SimpleRng,
}

impl World {
    pub fn new(seed: u32) -> Self {
        let mut world = Self {
            bird: Rect::new(BIRD_X, BIRD_Y, BIRD_WIDTH, BIRD_HEIGHT),
            dy: 0.0,
            pipes: ArrayVec::new(),
            scroll_speed: SCROLL_SPEED,
            speedup_ms: 0,
            score: START_SCORE,
            updraft: false,
            rng: SimpleRng::new(seed),
        };
        world.spawn_pipes();
        world
    }

    /// Start a new run. The pipe sequence continues from the current RNG
    /// state.
    pub fn reset(&mut self) {
        self.bird = Rect::new(BIRD_X, BIRD_Y, BIRD_WIDTH, BIRD_HEIGHT);
        self.dy = 0.0;
        self.scroll_speed = SCROLL_SPEED;
        self.speedup_ms = 0;
        self.score = START_SCORE;
        self.updraft = false;
        self.spawn_pipes();
    }

    fn spawn_pipes(&mut self) {
        self.pipes.clear();
        for i in 0..PIPE_PAIRS {
            let mut pair = PipePair::at(FIRST_PIPE_X + PIPE_SPACING * i as f32);
            randomize(&mut self.rng, &mut pair);
            self.pipes.push(pair);
        }
    }

    pub fn bird(&self) -> Rect {
        self.bird
    }

    pub fn pipes(&self) -> &[PipePair] {
        &self.pipes
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn scroll_speed(&self) -> f32 {
        self.scroll_speed
    }

    pub fn vertical_speed(&self) -> f32 {
        self.dy
    }

    /// Queue an updraft for the next step.
    pub fn flap(&mut self) {
        self.updraft = true;
    }

    /// Bird box followed by every pipe box.
    pub fn hitboxes(&self) -> impl Iterator<Item = Rect> + '_ {
        std::iter::once(self.bird).chain(self.pipes.iter().flat_map(|p| [p.top, p.bottom]))
    }

    /// Advance by `dt_ms` milliseconds.
    pub fn step(&mut self, dt_ms: u32) -> Step {
        let dt = dt_ms as f32 / 1000.0;

        self.scroll(self.scroll_speed * dt);

        self.speedup_ms += dt_ms;
        if self.speedup_ms >= SPEEDUP_INTERVAL_MS {
            self.scroll_speed -= SPEEDUP_STEP;
            self.score += SCORE_STEP;
            self.speedup_ms = 0;
        }

        if self.updraft {
            self.dy = UPDRAFT_SPEED;
        } else if self.dy < 0.0 {
            // Rising birds slow down faster than falling ones speed up.
            self.dy += 3.0 * GRAVITY * dt;
        } else {
            self.dy += GRAVITY * dt;
        }
        self.updraft = false;
        self.bird.y += self.dy * dt;

        if self.collides() {
            tracing::debug!(score = self.score, bird_y = self.bird.y, "bird crashed");
            return Step::Crashed;
        }
        Step::Continue
    }

    fn scroll(&mut self, dx: f32) {
        for pair in &mut self.pipes {
            if pair.top.x < RECYCLE_X {
                pair.top.x = WORLD_WIDTH as f32 + 1.0;
                pair.bottom.x = pair.top.x;
                randomize(&mut self.rng, pair);
            }
            pair.top.x += dx;
            pair.bottom.x += dx;
        }
    }

    /// Pipe contact, or the bird leaving the screen vertically.
    pub fn collides(&self) -> bool {
        let out_of_world =
            self.bird.y > WORLD_HEIGHT as f32 || self.bird.y + self.bird.h < 0.0;
        out_of_world
            || self
                .pipes
                .iter()
                .any(|p| self.bird.overlaps(&p.top) || self.bird.overlaps(&p.bottom))
    }
}

fn randomize(rng: &mut SimpleRng, pair: &mut PipePair) {
    let gap = rng.range(GAP_MIN, GAP_MAX);
    let h = WORLD_HEIGHT as i32;
    pair.bottom.y = rng.range(h / 2, h - 70);
    pair.top.y = pair.bottom.y - pair.top.h - gap;
}
