//! Client-side runtime for the portfolio site.
//!
//! The pure modules (device tiers, particle engine, menu registry, theme,
//! catalog, terminal, contact form) build on any target so they can be tested
//! natively. The browser shell that binds them to the DOM only exists on
//! `wasm32`.

pub mod catalog;
pub mod color;
pub mod constants;
pub mod contact;
pub mod device;
pub mod menu;
pub mod particles;
pub mod schedule;
pub mod subscription;
pub mod terminal;
pub mod theme;

#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod overlay;

#[cfg(target_arch = "wasm32")]
pub use web_entry::start;

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use crate::device::{DeviceWatcher, Environment};
    use crate::events::{self, Shell};
    use crate::menu::MenuRegistry;
    use crate::subscription::{Subscription, Watch};
    use crate::terminal::Terminal;
    use crate::theme::{Theme, ThemeMode};
    use crate::{dom, overlay};
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{spawn_local, JsFuture};
    use web_sys as web;

    struct Mounted {
        _shell: Shell,
        _subscriptions: Vec<Subscription>,
    }

    thread_local! {
        static MOUNTED: RefCell<Option<Mounted>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("petalfield starting");

        if let Err(e) = init() {
            log::error!("init error: {:?}", e);
        }
        spawn_local(async {
            if let Err(e) = register_service_worker().await {
                log::warn!("[sw] registration skipped: {:?}", e);
            }
        });
        Ok(())
    }

    fn initial_theme(document: &web::Document) -> Theme {
        let root = document.document_element();
        let mode = root
            .as_ref()
            .and_then(|r| r.get_attribute(crate::constants::THEME_ATTRIBUTE))
            .and_then(|m| m.parse::<ThemeMode>().ok())
            .unwrap_or_default();
        let accent = root
            .as_ref()
            .and_then(|r| r.get_attribute("data-accent"))
            .and_then(|a| a.parse().ok())
            .unwrap_or_default();
        Theme::new(mode, accent)
    }

    fn init() -> anyhow::Result<()> {
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

        let env = Environment {
            viewport_width: dom::viewport_width(),
            reduced_motion: dom::reduced_motion_query()
                .map(|q| q.matches())
                .unwrap_or(false),
        };
        let device = DeviceWatcher::new(env);
        let cap = device.current();
        log::info!(
            "[device] tier={} reduced_motion={}",
            cap.tier,
            cap.reduced_motion
        );

        let theme = initial_theme(&document);
        events::apply_theme(&document, &theme);

        let shell = Shell {
            document: document.clone(),
            theme: Watch::new(theme),
            menus: Rc::new(RefCell::new(MenuRegistry::new())),
            device: Rc::new(RefCell::new(device)),
            terminal: Rc::new(RefCell::new(Terminal::new())),
            petals: Rc::new(RefCell::new(None)),
        };

        let mut subscriptions = Vec::new();
        subscriptions.extend(events::wire_theme(&shell));
        subscriptions.extend(events::wire_menus(&shell));
        subscriptions.extend(events::wire_device(&shell));
        subscriptions.extend(events::wire_petals_toggle(&shell));
        subscriptions.extend(events::wire_contact(&shell));
        subscriptions.extend(events::wire_terminal(&shell));

        events::sync_petals(&shell, &cap);
        overlay::set_text(&document, "contact-errors", "");

        MOUNTED.with(|m| {
            *m.borrow_mut() = Some(Mounted {
                _shell: shell,
                _subscriptions: subscriptions,
            });
        });
        Ok(())
    }

    async fn register_service_worker() -> anyhow::Result<()> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let container = window.navigator().service_worker();
        let promise = container.register("/sw.js");
        JsFuture::from(promise)
            .await
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        log::info!("[sw] registered");
        Ok(())
    }
}
