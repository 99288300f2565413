use crate::constants::{ACCENT_CSS_VAR, CONTACT_EMAIL, THEME_ATTRIBUTE, TERMINAL_PROMPT};
use crate::contact::ContactMessage;
use crate::device::{Category, DeviceCapability, DeviceWatcher};
use crate::dom;
use crate::frame::PetalCanvas;
use crate::menu::{Exclusivity, MenuListener, MenuRegistry};
use crate::overlay;
use crate::particles::ParticleConfig;
use crate::subscription::{Subscription, Watch};
use crate::terminal::{Effect, Line, Terminal};
use crate::theme::{Accent, Theme};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

const PETAL_CANVAS_ID: &str = "petal-canvas";
const PETALS_TOGGLE_ID: &str = "petals-toggle";
const PETALS_TOGGLE_EVENT: &str = "petals-toggle";
const THEME_TOGGLE_ID: &str = "theme-toggle";
const COLOR_MENU_ID: &str = "color-menu";
const CONTACT_FORM_ID: &str = "contact-form";
const CONTACT_ERRORS_ID: &str = "contact-errors";
const TERMINAL_INPUT_ID: &str = "terminal-input";
const TERMINAL_OUTPUT_ID: &str = "terminal-output";

/// Shared state behind every wired control.
#[derive(Clone)]
pub struct Shell {
    pub document: web::Document,
    pub theme: Watch<Theme>,
    pub menus: Rc<RefCell<MenuRegistry>>,
    pub device: Rc<RefCell<DeviceWatcher>>,
    pub terminal: Rc<RefCell<Terminal>>,
    pub petals: Rc<RefCell<Option<PetalCanvas>>>,
}

// ---------------- Theme ----------------

pub fn apply_theme(document: &web::Document, theme: &Theme) {
    let Some(root) = document.document_element() else {
        return;
    };
    let cl = root.class_list();
    for class in Theme::all_theme_classes() {
        _ = cl.remove_1(&class);
    }
    for class in theme.root_classes() {
        _ = cl.add_1(&class);
    }
    _ = root.set_attribute(THEME_ATTRIBUTE, theme.data_theme());
    if let Ok(html) = root.dyn_into::<web::HtmlElement>() {
        _ = html.style().set_property(ACCENT_CSS_VAR, &theme.accent_hex());
    }
}

pub fn wire_theme(shell: &Shell) -> Vec<Subscription> {
    let mut subs = Vec::new();
    let doc = shell.document.clone();
    subs.push(shell.theme.subscribe(move |t| {
        log::info!("[theme] mode={} accent={}", t.mode, t.accent);
        apply_theme(&doc, t);
    }));

    let theme = shell.theme.clone();
    subs.push(dom::on_click(&shell.document, THEME_TOGGLE_ID, move || {
        theme.update(|t| {
            let mut next = *t;
            next.toggle_mode();
            next
        });
    }));

    for el in dom::query_all(&shell.document, "[data-accent]") {
        let Some(accent) = el
            .get_attribute("data-accent")
            .and_then(|a| a.parse::<Accent>().ok())
        else {
            continue;
        };
        let theme = shell.theme.clone();
        let menus = shell.menus.clone();
        subs.push(dom::listen(&el, "click", move |_: web::MouseEvent| {
            theme.update(|t| Theme::new(t.mode, accent));
            menus.borrow_mut().close(COLOR_MENU_ID);
        }));
    }
    subs
}

// ---------------- Menus ----------------

/// Each `[data-menu-toggle="<id>"]` button opens the panel with that id,
/// closing any other open panel.
pub fn wire_menus(shell: &Shell) -> Vec<Subscription> {
    let mut subs = Vec::new();
    for button in dom::query_all(&shell.document, "[data-menu-toggle]") {
        let Some(id) = button.get_attribute("data-menu-toggle") else {
            continue;
        };
        let doc_close = shell.document.clone();
        let doc_update = shell.document.clone();
        let id_close = id.clone();
        let id_update = id.clone();
        let button_update = button.clone();
        shell.menus.borrow_mut().register(
            &id,
            MenuListener::new(
                move || overlay::hide(&doc_close, &id_close),
                move |open| {
                    let visible = open.contains(&id_update);
                    overlay::set_visible(&doc_update, &id_update, visible);
                    _ = button_update
                        .set_attribute("aria-expanded", if visible { "true" } else { "false" });
                },
            ),
        );

        let menus = shell.menus.clone();
        let id_click = id.clone();
        subs.push(dom::listen(&button, "click", move |ev: web::MouseEvent| {
            ev.stop_propagation();
            let open = menus.borrow_mut().toggle(&id_click, Exclusivity::Exclusive);
            log::debug!("[menu] {} open={}", id_click, open);
        }));

        let menus = shell.menus.clone();
        subs.push(Subscription::new(move || {
            menus.borrow_mut().unregister(&id);
        }));
    }

    let menus = shell.menus.clone();
    subs.push(dom::listen(
        &shell.document,
        "keydown",
        move |ev: web::KeyboardEvent| {
            if ev.key() == "Escape" {
                menus.borrow_mut().close_all();
            }
        },
    ));
    subs
}

// ---------------- Device + petals ----------------

fn petal_config(canvas: &web::HtmlCanvasElement) -> ParticleConfig {
    let config = ParticleConfig::default();
    match dom::data_usize(canvas, "particle-count") {
        Some(n) => config.with_count(n),
        None => config,
    }
}

/// Mount or unmount the petal canvas to match the current capability.
pub fn sync_petals(shell: &Shell, cap: &DeviceCapability) {
    let wanted = cap.is_enabled(Category::Background, "particles");
    let mut slot = shell.petals.borrow_mut();
    match (wanted, slot.is_some()) {
        (true, false) => {
            let canvas = shell
                .document
                .get_element_by_id(PETAL_CANVAS_ID)
                .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok());
            if let Some(canvas) = canvas {
                let config = petal_config(&canvas);
                *slot = PetalCanvas::mount(canvas, config);
            }
        }
        (false, true) => {
            *slot = None;
        }
        _ => {}
    }
    if let Some(p) = slot.as_ref() {
        p.set_motion_allowed(cap.is_enabled(Category::Animations, "continuousAnimations"));
    }
    if let Some(root) = shell.document.document_element() {
        _ = root.set_attribute("data-tier", cap.tier.as_str());
    }
}

pub fn wire_device(shell: &Shell) -> Vec<Subscription> {
    let mut subs = Vec::new();

    let shell_cb = shell.clone();
    subs.push(
        shell
            .device
            .borrow()
            .subscribe(move |cap| sync_petals(&shell_cb, cap)),
    );

    if let Some(window) = web::window() {
        let device = shell.device.clone();
        subs.push(dom::listen(&window, "resize", move |_: web::Event| {
            device.borrow_mut().set_viewport_width(dom::viewport_width());
        }));
    }

    if let Some(mql) = dom::reduced_motion_query() {
        let device = shell.device.clone();
        subs.push(dom::listen(
            &mql,
            "change",
            move |ev: web::MediaQueryListEvent| {
                device.borrow_mut().set_reduced_motion(ev.matches());
            },
        ));
    }
    subs
}

pub fn wire_petals_toggle(shell: &Shell) -> Vec<Subscription> {
    let toggle = {
        let petals = shell.petals.clone();
        move || {
            if let Some(p) = petals.borrow().as_ref() {
                let paused = p.toggle_paused();
                log::debug!("[particles] toggled paused={}", paused);
            }
        }
    };
    let mut subs = vec![dom::on_click(&shell.document, PETALS_TOGGLE_ID, toggle.clone())];
    if let Some(window) = web::window() {
        subs.push(dom::listen(
            &window,
            PETALS_TOGGLE_EVENT,
            move |_: web::Event| toggle(),
        ));
    }
    subs
}

// ---------------- Contact ----------------

fn form_value(form: &web::HtmlFormElement, name: &str) -> String {
    let Ok(Some(el)) = form.query_selector(&format!("[name=\"{}\"]", name)) else {
        return String::new();
    };
    if let Some(input) = el.dyn_ref::<web::HtmlInputElement>() {
        return input.value();
    }
    if let Some(area) = el.dyn_ref::<web::HtmlTextAreaElement>() {
        return area.value();
    }
    String::new()
}

pub fn wire_contact(shell: &Shell) -> Vec<Subscription> {
    let Some(form) = shell
        .document
        .get_element_by_id(CONTACT_FORM_ID)
        .and_then(|el| el.dyn_into::<web::HtmlFormElement>().ok())
    else {
        return Vec::new();
    };
    let doc = shell.document.clone();
    let form_cb = form.clone();
    vec![dom::listen(&form, "submit", move |ev: web::Event| {
        ev.prevent_default();
        let msg = ContactMessage {
            name: form_value(&form_cb, "name"),
            email: form_value(&form_cb, "email"),
            subject: form_value(&form_cb, "subject"),
            message: form_value(&form_cb, "message"),
        };
        match msg.mailto_url(CONTACT_EMAIL) {
            Ok(url) => {
                overlay::set_text(&doc, CONTACT_ERRORS_ID, "");
                if let Some(w) = web::window() {
                    if let Err(e) = w.location().set_href(&url) {
                        log::error!("[contact] could not open mail client: {:?}", e);
                    }
                }
            }
            Err(errors) => {
                let text: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                log::warn!("[contact] invalid form: {}", text.join(", "));
                overlay::set_text(&doc, CONTACT_ERRORS_ID, &text.join(". "));
            }
        }
    })]
}

// ---------------- Terminal ----------------

fn append_lines(document: &web::Document, lines: &[Line]) {
    let Some(output) = document.get_element_by_id(TERMINAL_OUTPUT_ID) else {
        return;
    };
    for line in lines {
        let Ok(el) = document.create_element("div") else {
            continue;
        };
        el.set_class_name(line.class());
        let text = match line {
            Line::Input(s) => format!("{} {}", TERMINAL_PROMPT, s),
            other => other.text().to_string(),
        };
        el.set_text_content(Some(&text));
        _ = output.append_child(&el);
    }
    output.set_scroll_top(output.scroll_height());
}

fn apply_effect(shell: &Shell, effect: Effect) {
    match effect {
        Effect::Clear => {
            if let Some(out) = shell.document.get_element_by_id(TERMINAL_OUTPUT_ID) {
                out.set_inner_html("");
            }
        }
        Effect::ToggleTheme => {
            shell.theme.update(|t| {
                let mut next = *t;
                next.toggle_mode();
                next
            });
        }
        Effect::SetTheme(mode) => {
            shell.theme.update(|t| Theme::new(mode, t.accent));
        }
        Effect::SetAccent(accent) => {
            shell.theme.update(|t| Theme::new(t.mode, accent));
        }
        Effect::OpenContact => {
            if let Some(w) = web::window() {
                _ = w.location().set_hash("contact");
            }
        }
    }
}

pub fn wire_terminal(shell: &Shell) -> Vec<Subscription> {
    let Some(input) = shell
        .document
        .get_element_by_id(TERMINAL_INPUT_ID)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    else {
        return Vec::new();
    };
    let shell_cb = shell.clone();
    let input_cb = input.clone();
    vec![dom::listen(&input, "keydown", move |ev: web::KeyboardEvent| {
        match ev.key().as_str() {
            "Enter" => {
                let resp = shell_cb.terminal.borrow_mut().execute(&input_cb.value());
                input_cb.set_value("");
                append_lines(&shell_cb.document, &resp.lines);
                if let Some(effect) = resp.effect {
                    apply_effect(&shell_cb, effect);
                }
                ev.prevent_default();
            }
            "ArrowUp" => {
                if let Some(prev) = shell_cb.terminal.borrow_mut().recall_previous() {
                    input_cb.set_value(prev);
                }
                ev.prevent_default();
            }
            "ArrowDown" => {
                let next = shell_cb
                    .terminal
                    .borrow_mut()
                    .recall_next()
                    .map(str::to_string)
                    .unwrap_or_default();
                input_cb.set_value(&next);
                ev.prevent_default();
            }
            _ => {}
        }
    })]
}
