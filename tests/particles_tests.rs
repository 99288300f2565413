// Host-side tests for the petal field engine.

use glam::Vec2;
use petalfield::color::{Rgb, Rgba, ThemeColors};
use petalfield::constants::{CONNECT_DISTANCE, MAX_PARTICLES, RESET_OFFSET};
use petalfield::particles::*;
use petalfield::theme::ThemeMode;
use proptest::prelude::*;

#[derive(Default)]
struct Recorder {
    clears: usize,
    petals: Vec<(PetalTransform, Rgba)>,
    links: Vec<(Vec2, Vec2, Rgba)>,
}

impl Surface for Recorder {
    fn clear(&mut self, _w: f32, _h: f32) {
        self.clears += 1;
        self.petals.clear();
        self.links.clear();
    }
    fn draw_petal(&mut self, t: &PetalTransform, fill: Rgba, _stroke: Rgba) {
        self.petals.push((*t, fill));
    }
    fn draw_link(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        self.links.push((from, to, color));
    }
}

fn field(count: usize) -> ParticleField {
    let mut f = ParticleField::new(ParticleConfig::default().with_count(count), 7);
    f.init(800.0, 600.0);
    f
}

#[test]
fn starts_uninitialized_and_draws_nothing() {
    let f = ParticleField::new(ParticleConfig::default(), 1);
    assert_eq!(f.state(), EngineState::Uninitialized);
    let mut r = Recorder::default();
    f.render(&mut r);
    assert_eq!(r.clears, 0);
    assert!(r.petals.is_empty());
}

#[test]
fn init_spawns_configured_count_inside_canvas() {
    let f = field(25);
    assert_eq!(f.state(), EngineState::Running);
    assert_eq!(f.particles().len(), 25);
    for p in f.particles() {
        assert!(p.pos.x >= 0.0 && p.pos.x <= 800.0);
        assert!(p.pos.y >= 0.0 && p.pos.y <= 600.0);
    }
}

#[test]
fn count_is_capped() {
    let f = field(MAX_PARTICLES * 4);
    assert_eq!(f.particles().len(), MAX_PARTICLES);
}

#[test]
fn step_moves_particles_down() {
    let mut f = field(10);
    let before: Vec<f32> = f.particles().iter().map(|p| p.pos.y).collect();
    f.step();
    for (p, y0) in f.particles().iter().zip(before) {
        assert!(p.pos.y > y0 || p.pos.y == -RESET_OFFSET);
    }
    assert_eq!(f.frames(), 1);
}

#[test]
fn particles_wrap_and_stay_bounded() {
    let mut f = field(30);
    let (_, h) = f.size();
    let offset = f.config().reset_offset;
    for _ in 0..5000 {
        f.step();
        for p in f.particles() {
            assert!(p.pos.y >= -offset && p.pos.y <= h + offset, "y={}", p.pos.y);
        }
    }
}

#[test]
fn paused_field_does_not_move_but_still_draws_faded() {
    let mut f = field(12);
    f.pause();
    assert_eq!(f.state(), EngineState::Paused);
    let before: Vec<Vec2> = f.particles().iter().map(|p| p.pos).collect();
    let mut r = Recorder::default();
    for _ in 0..10 {
        f.tick(&mut r);
    }
    let after: Vec<Vec2> = f.particles().iter().map(|p| p.pos).collect();
    assert_eq!(before, after);
    assert_eq!(r.petals.len(), 12);
    let full = f.particles()[0].fill.alpha;
    let drawn = r.petals[0].1.alpha;
    assert!((drawn - full * f.config().paused_opacity).abs() < 1e-6);

    f.resume();
    f.step();
    assert_ne!(
        before,
        f.particles().iter().map(|p| p.pos).collect::<Vec<_>>()
    );
}

#[test]
fn toggle_paused_flips_between_running_and_paused() {
    let mut f = field(3);
    assert!(f.toggle_paused());
    assert!(!f.toggle_paused());
    assert_eq!(f.state(), EngineState::Running);
}

#[test]
fn resize_scales_positions_without_respawning() {
    let mut f = field(8);
    let before: Vec<Vec2> = f.particles().iter().map(|p| p.pos).collect();
    let speeds: Vec<f32> = f.particles().iter().map(|p| p.speed).collect();
    assert!(f.resize(1600.0, 300.0));
    assert_eq!(f.particles().len(), 8);
    for ((p, b), s) in f.particles().iter().zip(before).zip(speeds) {
        assert!((p.pos.x - b.x * 2.0).abs() < 1e-3);
        assert!((p.pos.y - b.y * 0.5).abs() < 1e-3);
        assert_eq!(p.speed, s);
    }
    assert!(!f.resize(1600.0, 300.0), "same size is not a change");
}

#[test]
fn resize_before_init_initializes() {
    let mut f = ParticleField::new(ParticleConfig::default().with_count(5), 3);
    assert!(f.resize(400.0, 400.0));
    assert_eq!(f.state(), EngineState::Running);
    assert_eq!(f.particles().len(), 5);
}

#[test]
fn terminate_discards_everything() {
    let mut f = field(5);
    f.terminate();
    assert_eq!(f.state(), EngineState::Terminated);
    assert!(f.particles().is_empty());
    f.resume();
    f.init(100.0, 100.0);
    assert_eq!(f.state(), EngineState::Terminated);
    let mut r = Recorder::default();
    f.tick(&mut r);
    assert_eq!(r.clears, 0);
}

fn assert_in_wrap_band(f: &ParticleField) {
    let (_, h) = f.size();
    let off = f.config().reset_offset;
    for p in f.particles() {
        assert!(p.pos.y >= -off && p.pos.y <= h + off, "y={} h={} off={}", p.pos.y, h, off);
    }
}

#[test]
fn resize_after_wrap_keeps_the_wrap_band() {
    let mut f = field(30);
    let mut wrapped = false;
    for _ in 0..5000 {
        f.step();
        if f.particles().iter().any(|p| p.pos.y < 0.0) {
            wrapped = true;
            break;
        }
    }
    assert!(wrapped, "some petal should wrap within 5000 frames");

    assert!(f.resize(800.0, 1800.0));
    assert_in_wrap_band(&f);
    assert!(f.resize(800.0, 200.0));
    assert_in_wrap_band(&f);
    for _ in 0..500 {
        f.step();
        assert_in_wrap_band(&f);
    }
}

#[test]
fn wrapped_petals_respawn_inside_a_narrow_reset_band() {
    let config = ParticleConfig {
        reset_offset: 2.0,
        ..ParticleConfig::default()
    }
    .with_count(20);
    let mut f = ParticleField::new(config, 5);
    f.init(300.0, 200.0);
    for _ in 0..5000 {
        f.step();
        assert_in_wrap_band(&f);
    }
}

#[test]
fn visitor_pause_survives_motion_gate_changes() {
    let mut f = field(4);
    let mut gate = PauseGate::default();
    assert!(!gate.paused());

    assert!(gate.toggle_user());
    f.apply_gate(gate);
    assert_eq!(f.state(), EngineState::Paused);

    // Device crosses a breakpoint and motion is still allowed.
    gate.set_motion_allowed(true);
    f.apply_gate(gate);
    assert_eq!(f.state(), EngineState::Paused);

    // Motion blocked then allowed again while the visitor still wants a pause.
    gate.set_motion_allowed(false);
    f.apply_gate(gate);
    gate.set_motion_allowed(true);
    f.apply_gate(gate);
    assert_eq!(f.state(), EngineState::Paused);

    assert!(!gate.toggle_user());
    f.apply_gate(gate);
    assert_eq!(f.state(), EngineState::Running);
}

#[test]
fn motion_gate_pauses_even_without_visitor_pause() {
    let mut f = field(4);
    let mut gate = PauseGate::default();
    gate.set_motion_allowed(false);
    f.apply_gate(gate);
    assert_eq!(f.state(), EngineState::Paused);
    // Toggling on top of a blocked gate keeps the field still.
    assert!(gate.toggle_user());
    assert!(gate.toggle_user());
    assert!(!gate.user_paused);
}

#[test]
fn backing_size_follows_device_pixel_ratio() {
    assert_eq!(backing_size(400.0, 300.0, 2.0), (800, 600));
    assert_eq!(backing_size(401.0, 300.5, 1.5), (602, 451));
    assert_eq!(backing_size(400.0, 300.0, 0.0), (400, 300));
    assert_eq!(backing_size(400.0, 300.0, f64::NAN), (400, 300));
    assert_eq!(backing_size(0.0, -5.0, 2.0), (1, 1));
}

#[test]
fn recolor_applies_to_every_particle() {
    let mut f = field(6);
    let colors = ThemeColors::from_rgb(Rgb::new(10, 20, 30), ThemeMode::Light);
    f.set_colors(colors);
    for p in f.particles() {
        assert_eq!(p.fill, colors.fill);
        assert_eq!(p.stroke, colors.stroke);
    }
}

#[test]
fn rendered_links_match_link_pass() {
    let mut f = field(40);
    let mut r = Recorder::default();
    f.tick(&mut r);
    let links = f.links();
    assert_eq!(r.links.len(), links.len());
    for l in &links {
        assert!(l.a < l.b);
        let d = f.particles()[l.a].pos.distance(f.particles()[l.b].pos);
        assert!(d < CONNECT_DISTANCE);
    }
}

#[test]
fn link_alpha_decays_with_distance() {
    let origin = Vec2::ZERO;
    let near = link_alpha(origin, Vec2::new(10.0, 0.0), 80.0).unwrap();
    let far = link_alpha(origin, Vec2::new(70.0, 0.0), 80.0).unwrap();
    assert!(near > far);
    assert!(link_alpha(origin, Vec2::new(80.0, 0.0), 80.0).is_none());
}

#[test]
fn petal_path_is_closed() {
    assert!(matches!(PETAL_PATH.first(), Some(PathCmd::MoveTo(_))));
    assert!(matches!(PETAL_PATH.last(), Some(PathCmd::Close)));
}

proptest! {
    #[test]
    fn link_is_symmetric(ax in -200.0f32..200.0, ay in -200.0f32..200.0,
                         bx in -200.0f32..200.0, by in -200.0f32..200.0) {
        let a = Vec2::new(ax, ay);
        let b = Vec2::new(bx, by);
        let ab = link_alpha(a, b, CONNECT_DISTANCE);
        let ba = link_alpha(b, a, CONNECT_DISTANCE);
        prop_assert_eq!(ab.is_some(), ba.is_some());
        prop_assert_eq!(ab.is_some(), a.distance_squared(b) < CONNECT_DISTANCE * CONNECT_DISTANCE);
        if let (Some(x), Some(y)) = (ab, ba) {
            prop_assert!((x - y).abs() < 1e-6);
        }
    }
}
