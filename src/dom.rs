use crate::particles::backing_size;
use crate::subscription::Subscription;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Attach `handler` to `event` on `target`; the listener lives as long as the
/// returned subscription.
pub fn listen<E: JsCast + 'static>(
    target: &web::EventTarget,
    event: &'static str,
    mut handler: impl FnMut(E) + 'static,
) -> Subscription {
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(web::Event)>);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        log::warn!("[dom] add_event_listener({}) failed: {:?}", event, e);
        return Subscription::noop();
    }
    let target = target.clone();
    Subscription::new(move || {
        _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    })
}

#[inline]
pub fn on_click(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) -> Subscription {
    match document.get_element_by_id(element_id) {
        Some(el) => listen(&el, "click", move |_: web::MouseEvent| handler()),
        None => Subscription::noop(),
    }
}

/// Elements matching `selector`, skipping non-element nodes.
pub fn query_all(document: &web::Document, selector: &str) -> Vec<web::Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<web::Element>().ok())
        .collect()
}

pub fn viewport_width() -> f64 {
    web::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

pub fn reduced_motion_query() -> Option<web::MediaQueryList> {
    web::window()?
        .match_media(crate::constants::REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
}

/// Computed value of a CSS custom property on the root element, trimmed.
pub fn root_css_var(name: &str) -> String {
    let Some(window) = web::window() else {
        return String::new();
    };
    let Some(root) = window.document().and_then(|d| d.document_element()) else {
        return String::new();
    };
    window
        .get_computed_style(&root)
        .ok()
        .flatten()
        .and_then(|style| style.get_property_value(name).ok())
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

pub fn root_attribute(name: &str) -> Option<String> {
    window_document()?.document_element()?.get_attribute(name)
}

/// CSS size of a canvas and the device pixel ratio its backing store uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasMetrics {
    pub css_width: f64,
    pub css_height: f64,
    pub dpr: f64,
}

pub fn canvas_metrics(canvas: &web::HtmlCanvasElement) -> CanvasMetrics {
    let dpr = web::window()
        .map(|w| w.device_pixel_ratio())
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(1.0);
    let rect = canvas.get_bounding_client_rect();
    CanvasMetrics {
        css_width: rect.width(),
        css_height: rect.height(),
        dpr,
    }
}

/// Match the canvas backing store to its CSS box at the device pixel ratio.
/// Only assigns when the size changed, since assigning clears the canvas and
/// resets its transform. Returns the metrics if it did.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> Option<CanvasMetrics> {
    let metrics = canvas_metrics(canvas);
    let (w_px, h_px) = backing_size(metrics.css_width, metrics.css_height, metrics.dpr);
    if canvas.width() == w_px && canvas.height() == h_px {
        return None;
    }
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    Some(metrics)
}

/// Integer `data-*` attribute on an element, if present and well formed.
pub fn data_usize(el: &web::Element, name: &str) -> Option<usize> {
    el.get_attribute(&format!("data-{}", name))?.trim().parse().ok()
}
