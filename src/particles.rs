//! Drifting petal field with proximity links.
//!
//! The engine is host-agnostic: it integrates particle motion and emits draw
//! calls through the [`Surface`] trait. The browser adapter implements
//! `Surface` on a canvas 2D context and drives [`ParticleField::tick`] from
//! the animation loop.

use crate::color::{Rgba, ThemeColors};
use crate::constants::*;
use glam::Vec2;
use rand::prelude::*;

#[derive(Clone, Debug)]
pub struct ParticleConfig {
    pub count: usize,
    pub connect_distance: f32,
    pub reset_offset: f32,
    pub size: (f32, f32),
    pub speed: (f32, f32),
    pub sway: (f32, f32),
    pub drift_max: f32,
    pub spin_max: f32,
    pub paused_opacity: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTICLE_COUNT,
            connect_distance: CONNECT_DISTANCE,
            reset_offset: RESET_OFFSET,
            size: (PARTICLE_SIZE_MIN, PARTICLE_SIZE_MAX),
            speed: (PARTICLE_SPEED_MIN, PARTICLE_SPEED_MAX),
            sway: (PARTICLE_SWAY_MIN, PARTICLE_SWAY_MAX),
            drift_max: PARTICLE_DRIFT_MAX,
            spin_max: PARTICLE_SPIN_MAX,
            paused_opacity: PAUSED_OPACITY,
        }
    }
}

impl ParticleConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Count actually spawned; the link pass is quadratic so this is capped.
    pub fn effective_count(&self) -> usize {
        self.count.min(MAX_PARTICLES)
    }
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub sway: f32,
    pub phase: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub drift: f32,
    pub fill: Rgba,
    pub stroke: Rgba,
}

impl Particle {
    /// One frame of motion. Returns true if the particle wrapped to the top,
    /// where it re-enters at `-reset_offset`.
    #[inline]
    fn advance(&mut self, width: f32, height: f32, reset_offset: f32, rng: &mut impl Rng) -> bool {
        self.pos.y += self.speed;
        self.pos.x += self.phase.cos() * self.sway + self.drift;
        self.phase += PHASE_STEP;
        self.rotation += self.rotation_speed;
        if self.pos.y > height + reset_offset {
            self.pos.x = rng.gen::<f32>() * width;
            self.pos.y = -reset_offset;
            return true;
        }
        false
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Running,
    Paused,
    Terminated,
}

/// The two independent reasons to hold the field still: the visitor's
/// petals toggle and the device's motion gate. Either one pauses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PauseGate {
    pub user_paused: bool,
    pub motion_blocked: bool,
}

impl PauseGate {
    #[inline]
    pub fn paused(self) -> bool {
        self.user_paused || self.motion_blocked
    }

    /// Flip the visitor's choice. Returns whether the field ends up paused.
    pub fn toggle_user(&mut self) -> bool {
        self.user_paused = !self.user_paused;
        self.paused()
    }

    pub fn set_motion_allowed(&mut self, allowed: bool) {
        self.motion_blocked = !allowed;
    }
}

/// Canvas backing-store size in device pixels for a CSS box. A missing or
/// bogus ratio counts as 1, and each side is at least one pixel.
pub fn backing_size(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> (u32, u32) {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    let px = |css: f64| (css.max(0.0) * dpr).round().max(1.0) as u32;
    (px(css_width), px(css_height))
}

/// Placement of one petal: translate, then rotate, then scale the unit path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PetalTransform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCmd {
    MoveTo(Vec2),
    CubicTo(Vec2, Vec2, Vec2),
    Close,
}

/// Teardrop outline in unit space, tip at the top, round end at the bottom.
pub const PETAL_PATH: [PathCmd; 4] = [
    PathCmd::MoveTo(Vec2::new(0.0, -1.0)),
    PathCmd::CubicTo(Vec2::new(0.6, -0.6), Vec2::new(0.7, 0.5), Vec2::new(0.0, 1.0)),
    PathCmd::CubicTo(Vec2::new(-0.7, 0.5), Vec2::new(-0.6, -0.6), Vec2::new(0.0, -1.0)),
    PathCmd::Close,
];

/// Draw target for the engine.
pub trait Surface {
    fn clear(&mut self, width: f32, height: f32);
    fn draw_petal(&mut self, transform: &PetalTransform, fill: Rgba, stroke: Rgba);
    fn draw_link(&mut self, from: Vec2, to: Vec2, color: Rgba);
}

/// A proximity link between particles `a < b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub alpha: f32,
}

/// Link opacity for two positions, or `None` when they are too far apart.
/// Symmetric in its first two arguments.
#[inline]
pub fn link_alpha(p: Vec2, q: Vec2, threshold: f32) -> Option<f32> {
    let d2 = p.distance_squared(q);
    if d2 < threshold * threshold {
        Some((1.0 - d2.sqrt() / threshold) * LINK_ALPHA)
    } else {
        None
    }
}

pub struct ParticleField {
    config: ParticleConfig,
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    state: EngineState,
    colors: ThemeColors,
    rng: StdRng,
    frames: u64,
}

impl ParticleField {
    pub fn new(config: ParticleConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: ParticleConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    fn with_rng(config: ParticleConfig, rng: StdRng) -> Self {
        Self {
            config,
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
            state: EngineState::Uninitialized,
            colors: ThemeColors::default(),
            rng,
            frames: 0,
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn colors(&self) -> ThemeColors {
        self.colors
    }

    /// Spawn the batch for a canvas of the given size and start running.
    pub fn init(&mut self, width: f32, height: f32) {
        if self.state == EngineState::Terminated {
            return;
        }
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.spawn_all();
        self.state = EngineState::Running;
        log::info!(
            "[particles] init count={} size={}x{}",
            self.particles.len(),
            self.width,
            self.height
        );
    }

    /// Apply a new canvas size. Existing particles keep their motion state
    /// and are scaled into the new bounds; y stays inside the wrap band
    /// `[-reset_offset, height + reset_offset]`. Returns false if nothing
    /// changed.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let (width, height) = (width.max(0.0), height.max(0.0));
        if self.state == EngineState::Terminated || (width == self.width && height == self.height) {
            return false;
        }
        if self.state == EngineState::Uninitialized {
            self.init(width, height);
            return true;
        }
        if self.width <= 0.0 || self.height <= 0.0 || self.particles.is_empty() {
            self.width = width;
            self.height = height;
            self.spawn_all();
        } else {
            let scale = Vec2::new(width / self.width, height / self.height);
            let off = self.config.reset_offset.max(0.0);
            for p in &mut self.particles {
                p.pos.x *= scale.x;
                p.pos.y = (p.pos.y * scale.y).clamp(-off, height + off);
            }
            self.width = width;
            self.height = height;
        }
        log::debug!("[particles] resize {}x{}", width, height);
        true
    }

    pub fn pause(&mut self) {
        if self.state == EngineState::Running {
            self.state = EngineState::Paused;
            log::info!("[particles] paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state == EngineState::Paused {
            self.state = EngineState::Running;
            log::info!("[particles] resumed");
        }
    }

    /// Pause or resume to match `gate`.
    pub fn apply_gate(&mut self, gate: PauseGate) {
        if gate.paused() {
            self.pause();
        } else {
            self.resume();
        }
    }

    pub fn toggle_paused(&mut self) -> bool {
        match self.state {
            EngineState::Running => self.pause(),
            EngineState::Paused => self.resume(),
            _ => {}
        }
        self.state == EngineState::Paused
    }

    /// Drop all particles; the engine will not run again.
    pub fn terminate(&mut self) {
        self.particles = Vec::new();
        self.state = EngineState::Terminated;
    }

    pub fn set_colors(&mut self, colors: ThemeColors) {
        self.colors = colors;
        for p in &mut self.particles {
            p.fill = colors.fill;
            p.stroke = colors.stroke;
        }
    }

    /// Advance every particle by one frame. No-op unless running.
    pub fn step(&mut self) {
        if self.state != EngineState::Running {
            return;
        }
        let (w, h, off) = (self.width, self.height, self.config.reset_offset.max(0.0));
        for p in &mut self.particles {
            p.advance(w, h, off, &mut self.rng);
        }
        self.frames += 1;
    }

    /// All current links. Reads positions only, so it always reflects a
    /// single frame.
    pub fn links(&self) -> Vec<Link> {
        let threshold = self.config.connect_distance;
        let mut out = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for (j, b) in self.particles.iter().enumerate().skip(i + 1) {
                if let Some(alpha) = link_alpha(a.pos, b.pos, threshold) {
                    out.push(Link { a: i, b: j, alpha });
                }
            }
        }
        out
    }

    pub fn render(&self, surface: &mut impl Surface) {
        if matches!(
            self.state,
            EngineState::Uninitialized | EngineState::Terminated
        ) {
            return;
        }
        let opacity = if self.state == EngineState::Paused {
            self.config.paused_opacity
        } else {
            1.0
        };
        surface.clear(self.width, self.height);
        for p in &self.particles {
            let t = PetalTransform {
                position: p.pos,
                rotation: p.rotation,
                scale: p.size * 0.5,
            };
            surface.draw_petal(&t, p.fill.faded(opacity), p.stroke.faded(opacity));
        }
        let base = self.colors.stroke.rgb;
        for link in self.links() {
            let color = base.with_alpha(link.alpha * opacity);
            surface.draw_link(
                self.particles[link.a].pos,
                self.particles[link.b].pos,
                color,
            );
        }
    }

    /// Integrate then draw, in that order.
    pub fn tick(&mut self, surface: &mut impl Surface) {
        self.step();
        self.render(surface);
    }

    fn spawn_all(&mut self) {
        let n = self.config.effective_count();
        let particles = (0..n).map(|_| self.spawn_one()).collect();
        self.particles = particles;
    }

    fn spawn_one(&mut self) -> Particle {
        let c = &self.config;
        let rng = &mut self.rng;
        Particle {
            pos: Vec2::new(rng.gen::<f32>() * self.width, rng.gen::<f32>() * self.height),
            size: sample(rng, c.size),
            speed: sample(rng, c.speed),
            sway: sample(rng, c.sway),
            phase: rng.gen::<f32>() * std::f32::consts::TAU,
            rotation: rng.gen::<f32>() * std::f32::consts::TAU,
            rotation_speed: sample(rng, (-c.spin_max, c.spin_max)),
            drift: sample(rng, (-c.drift_max, c.drift_max)),
            fill: self.colors.fill,
            stroke: self.colors.stroke,
        }
    }
}

#[inline]
fn sample(rng: &mut impl Rng, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}
