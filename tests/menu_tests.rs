// Host-side tests for menu mutual exclusion.

use petalfield::menu::*;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Probe {
    closes: usize,
    last_update: Option<Vec<String>>,
}

fn register(reg: &mut MenuRegistry, id: &str) -> Rc<RefCell<Probe>> {
    let probe = Rc::new(RefCell::new(Probe::default()));
    let on_close = probe.clone();
    let on_update = probe.clone();
    reg.register(
        id,
        MenuListener::new(
            move || on_close.borrow_mut().closes += 1,
            move |open| on_update.borrow_mut().last_update = Some(open.iter().cloned().collect()),
        ),
    );
    probe
}

fn open_ids(reg: &MenuRegistry) -> Vec<&str> {
    reg.open_menus().iter().map(String::as_str).collect()
}

#[test]
fn opening_color_then_music_leaves_only_music_open() {
    let mut reg = MenuRegistry::new();
    let color = register(&mut reg, "color-menu");
    let _music = register(&mut reg, "music-menu");

    reg.open("color-menu", Exclusivity::Exclusive);
    reg.open("music-menu", Exclusivity::Exclusive);

    assert_eq!(open_ids(&reg), vec!["music-menu"]);
    assert!(!reg.is_open("color-menu"));
    assert!(color.borrow().closes >= 1);
}

#[test]
fn exclusive_open_closes_every_other_menu() {
    let mut reg = MenuRegistry::new();
    let ids = ["theme-menu", "color-menu", "music-menu", "petals-menu"];
    let probes: Vec<_> = ids.iter().map(|id| register(&mut reg, id)).collect();

    reg.open("theme-menu", Exclusivity::Shared);
    reg.open("color-menu", Exclusivity::Shared);
    assert_eq!(reg.open_menus().len(), 2);

    reg.open("petals-menu", Exclusivity::Exclusive);
    assert_eq!(open_ids(&reg), vec!["petals-menu"]);
    for (id, p) in ids.iter().zip(&probes) {
        let expected = if *id == "petals-menu" { 0 } else { 1 };
        assert_eq!(p.borrow().closes, expected, "{id}");
    }
}

#[test]
fn every_change_broadcasts_the_full_open_set() {
    let mut reg = MenuRegistry::new();
    let a = register(&mut reg, "a");
    let b = register(&mut reg, "b");

    reg.open("a", Exclusivity::Shared);
    reg.open("b", Exclusivity::Shared);
    let both = Some(vec!["a".to_string(), "b".to_string()]);
    assert_eq!(a.borrow().last_update, both);
    assert_eq!(b.borrow().last_update, both);

    reg.close("a");
    assert_eq!(a.borrow().last_update, Some(vec!["b".to_string()]));
    assert_eq!(a.borrow().closes, 1);
}

#[test]
fn toggle_opens_and_closes() {
    let mut reg = MenuRegistry::new();
    register(&mut reg, "m");
    assert!(reg.toggle("m", Exclusivity::Exclusive));
    assert!(reg.is_open("m"));
    assert!(!reg.toggle("m", Exclusivity::Exclusive));
    assert!(reg.open_menus().is_empty());
}

#[test]
fn unregistering_an_open_menu_releases_it() {
    let mut reg = MenuRegistry::new();
    register(&mut reg, "a");
    let b = register(&mut reg, "b");
    reg.open("a", Exclusivity::Exclusive);
    reg.unregister("a");
    assert!(!reg.is_open("a"));
    assert!(!reg.is_registered("a"));
    assert_eq!(b.borrow().last_update, Some(vec![]));
}

#[test]
fn close_all_notifies_open_menus_only() {
    let mut reg = MenuRegistry::new();
    let a = register(&mut reg, "a");
    let b = register(&mut reg, "b");
    reg.open("a", Exclusivity::Shared);
    reg.close_all();
    assert!(reg.open_menus().is_empty());
    assert_eq!(a.borrow().closes, 1);
    assert_eq!(b.borrow().closes, 0);
}

#[test]
fn independent_registries_do_not_share_state() {
    let mut one = MenuRegistry::new();
    let two = MenuRegistry::new();
    one.open("x", Exclusivity::Exclusive);
    assert!(one.is_open("x"));
    assert!(!two.is_open("x"));
}

#[test]
fn unregistered_ids_can_still_be_opened() {
    let mut reg = MenuRegistry::new();
    let a = register(&mut reg, "a");
    reg.open("a", Exclusivity::Exclusive);
    reg.open("ephemeral", Exclusivity::Exclusive);
    assert_eq!(open_ids(&reg), vec!["ephemeral"]);
    assert_eq!(a.borrow().closes, 1);
}
