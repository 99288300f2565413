use crate::canvas::CanvasSurface;
use crate::color::ThemeColors;
use crate::constants::{ACCENT_CSS_VAR, THEME_ATTRIBUTE};
use crate::dom;
use crate::particles::{ParticleConfig, ParticleField, PauseGate};
use crate::schedule::{AnimationLoop, FrameScheduler, TickCallback};
use crate::subscription::Subscription;
use crate::theme::ThemeMode;
use instant::Instant;
use fnv::FnvHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Default)]
struct RafSlots {
    pending: RefCell<FnvHashMap<i32, Closure<dyn FnMut()>>>,
    // Closure of the frame that ran last; freed when the next frame runs.
    retired: RefCell<Option<Closure<dyn FnMut()>>>,
}

/// `requestAnimationFrame`-backed scheduler. Queued closures stay owned on
/// the Rust side so a cancelled frame frees its closure.
#[derive(Default)]
pub struct RafScheduler {
    slots: Rc<RafSlots>,
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn schedule_next_tick(&self, callback: TickCallback) -> i32 {
        let Some(window) = web::window() else {
            return 0;
        };
        let id = Rc::new(Cell::new(0));
        let id_cb = id.clone();
        let slots = Rc::downgrade(&self.slots);
        let closure = Closure::once(move || {
            if let Some(slots) = slots.upgrade() {
                let own = slots.pending.borrow_mut().remove(&id_cb.get());
                drop(slots.retired.replace(own));
            }
            callback();
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => {
                id.set(handle);
                self.slots.pending.borrow_mut().insert(handle, closure);
                handle
            }
            Err(e) => {
                log::warn!("[particles] requestAnimationFrame failed: {:?}", e);
                0
            }
        }
    }

    fn cancel(&self, handle: i32) {
        if let Some(w) = web::window() {
            _ = w.cancel_animation_frame(handle);
        }
        drop(self.slots.pending.borrow_mut().remove(&handle));
    }
}

struct FrameStats {
    window_start: Instant,
    frames: u32,
}

impl FrameStats {
    const WINDOW_SECS: f32 = 5.0;

    fn record(&mut self) {
        self.frames += 1;
        let elapsed = self.window_start.elapsed().as_secs_f32();
        if elapsed >= Self::WINDOW_SECS {
            log::debug!("[particles] fps={:.1}", self.frames as f32 / elapsed);
            self.frames = 0;
            self.window_start = Instant::now();
        }
    }
}

/// A mounted petal canvas. Dropping it stops the loop, disconnects the
/// observers and discards the particles.
pub struct PetalCanvas {
    field: Rc<RefCell<ParticleField>>,
    gate: Cell<PauseGate>,
    anim: AnimationLoop<RafScheduler>,
    _resize: Subscription,
    _theme: Subscription,
}

impl PetalCanvas {
    /// Returns `None` when a 2D context is unavailable; nothing is drawn then.
    pub fn mount(canvas: web::HtmlCanvasElement, config: ParticleConfig) -> Option<PetalCanvas> {
        let ctx = match canvas.get_context("2d") {
            Ok(Some(obj)) => obj.dyn_into::<web::CanvasRenderingContext2d>().ok()?,
            _ => {
                log::warn!("[particles] 2d context unavailable, not rendering");
                return None;
            }
        };

        let metrics =
            dom::sync_canvas_backing_size(&canvas).unwrap_or_else(|| dom::canvas_metrics(&canvas));
        apply_pixel_ratio(&ctx, metrics.dpr);
        let mut field = ParticleField::from_entropy(config);
        field.set_colors(current_theme_colors());
        field.init(metrics.css_width as f32, metrics.css_height as f32);
        let field = Rc::new(RefCell::new(field));

        let resize = observe_resize(&canvas, &ctx, field.clone());
        let theme = observe_theme(field.clone());

        let field_tick = field.clone();
        let mut stats = FrameStats {
            window_start: Instant::now(),
            frames: 0,
        };
        let anim = AnimationLoop::start(Rc::new(RafScheduler::default()), move || {
            field_tick
                .borrow_mut()
                .tick(&mut CanvasSurface::new(&ctx));
            stats.record();
        });

        Some(PetalCanvas {
            field,
            gate: Cell::new(PauseGate::default()),
            anim,
            _resize: resize,
            _theme: theme,
        })
    }

    /// The visitor's petals toggle. Returns true if the field is now paused.
    pub fn toggle_paused(&self) -> bool {
        let mut gate = self.gate.get();
        let paused = gate.toggle_user();
        self.set_gate(gate);
        paused
    }

    /// Device motion gate; does not override a pause the visitor asked for.
    pub fn set_motion_allowed(&self, allowed: bool) {
        let mut gate = self.gate.get();
        gate.set_motion_allowed(allowed);
        self.set_gate(gate);
    }

    fn set_gate(&self, gate: PauseGate) {
        self.gate.set(gate);
        self.field.borrow_mut().apply_gate(gate);
    }
}

impl Drop for PetalCanvas {
    fn drop(&mut self) {
        self.anim.stop();
        self.field.borrow_mut().terminate();
        log::info!("[particles] unmounted");
    }
}

/// Draw in CSS pixels on a backing store sized at `dpr`. Resizing the
/// backing store resets the transform, so this runs after every resize.
fn apply_pixel_ratio(ctx: &web::CanvasRenderingContext2d, dpr: f64) {
    if let Err(e) = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0) {
        log::warn!("[particles] set_transform failed: {:?}", e);
    }
}

pub fn current_theme_colors() -> ThemeColors {
    let mode = dom::root_attribute(THEME_ATTRIBUTE)
        .and_then(|m| m.parse::<ThemeMode>().ok())
        .unwrap_or_default();
    ThemeColors::from_css_value(&dom::root_css_var(ACCENT_CSS_VAR), mode)
}

fn observe_resize(
    canvas: &web::HtmlCanvasElement,
    ctx: &web::CanvasRenderingContext2d,
    field: Rc<RefCell<ParticleField>>,
) -> Subscription {
    let canvas_cb = canvas.clone();
    let ctx = ctx.clone();
    let closure = Closure::wrap(Box::new(move || {
        if let Some(m) = dom::sync_canvas_backing_size(&canvas_cb) {
            apply_pixel_ratio(&ctx, m.dpr);
            field
                .borrow_mut()
                .resize(m.css_width as f32, m.css_height as f32);
        }
    }) as Box<dyn FnMut()>);
    let observer = match web::ResizeObserver::new(closure.as_ref().unchecked_ref()) {
        Ok(o) => o,
        Err(e) => {
            log::warn!("[particles] ResizeObserver unavailable: {:?}", e);
            return Subscription::noop();
        }
    };
    observer.observe(canvas);
    Subscription::new(move || {
        observer.disconnect();
        drop(closure);
    })
}

fn observe_theme(field: Rc<RefCell<ParticleField>>) -> Subscription {
    let Some(root) = dom::window_document().and_then(|d| d.document_element()) else {
        return Subscription::noop();
    };
    let closure = Closure::wrap(Box::new(move || {
        field.borrow_mut().set_colors(current_theme_colors());
    }) as Box<dyn FnMut()>);
    let observer = match web::MutationObserver::new(closure.as_ref().unchecked_ref()) {
        Ok(o) => o,
        Err(e) => {
            log::warn!("[particles] MutationObserver unavailable: {:?}", e);
            return Subscription::noop();
        }
    };
    let opts = web::MutationObserverInit::new();
    opts.set_attributes(true);
    let filter = js_sys::Array::of3(
        &THEME_ATTRIBUTE.into(),
        &"class".into(),
        &"style".into(),
    );
    opts.set_attribute_filter(&filter);
    if let Err(e) = observer.observe_with_options(&root, &opts) {
        log::warn!("[particles] theme observer failed: {:?}", e);
    }
    Subscription::new(move || {
        observer.disconnect();
        drop(closure);
    })
}
