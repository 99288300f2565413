// Host-side tests for device tiering and feature gates.

use petalfield::device::*;
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

fn cap(width: f64, reduced_motion: bool) -> DeviceCapability {
    DeviceCapability::classify(Environment {
        viewport_width: width,
        reduced_motion,
    })
}

#[test]
fn scenario_mobile_width() {
    let c = cap(500.0, false);
    assert_eq!(c.tier, Tier::Mobile);
    assert!(c.is_mobile && !c.is_tablet && !c.is_desktop);
    assert!(!c.is_feature_enabled("background", "particles"));
}

#[test]
fn scenario_tablet_width() {
    let c = cap(1200.0, false);
    assert_eq!(c.tier, Tier::Tablet);
    assert!(c.is_feature_enabled("background", "particles"));
}

#[test]
fn scenario_desktop_width() {
    let c = cap(1600.0, false);
    assert_eq!(c.tier, Tier::Desktop);
    assert!(c.is_feature_enabled("background", "particles"));
    assert_eq!(
        c.feature_value(Category::Animations, "framerMotion"),
        Some(FeatureValue::Level(MotionLevel::Full))
    );
    assert_eq!(c.motion_level().as_str(), "full");
}

#[test]
fn breakpoints_are_exclusive_upper_bounds() {
    assert_eq!(Tier::from_width(767.9), Tier::Mobile);
    assert_eq!(Tier::from_width(768.0), Tier::Tablet);
    assert_eq!(Tier::from_width(1439.0), Tier::Tablet);
    assert_eq!(Tier::from_width(1440.0), Tier::Desktop);
}

#[test]
fn degenerate_widths_classify_as_mobile() {
    assert_eq!(Tier::from_width(0.0), Tier::Mobile);
    assert_eq!(Tier::from_width(-20.0), Tier::Mobile);
    assert_eq!(Tier::from_width(f64::NAN), Tier::Mobile);
}

#[test]
fn unknown_features_and_categories_fail_open() {
    for tier in Tier::ALL {
        let c = DeviceCapability::new(tier, false);
        assert!(c.is_feature_enabled("background", "nonexistent-feature"));
        assert!(c.is_feature_enabled("no-such-category", "particles"));
        assert!(c.feature_value(Category::Monitoring, "nope").is_none());
    }
}

#[test]
fn reduced_motion_disables_all_animations_on_every_tier() {
    for tier in Tier::ALL {
        let c = DeviceCapability::new(tier, true);
        for feature in [
            "framerMotion",
            "continuousAnimations",
            "hoverEffects",
            "pageTransitions",
            "something-new",
        ] {
            assert!(
                !c.is_feature_enabled("animations", feature),
                "{tier}: animations.{feature} should be off"
            );
        }
        assert_eq!(c.motion_level(), MotionLevel::Off);
    }
}

#[test]
fn reduced_motion_leaves_other_categories_alone() {
    let c = DeviceCapability::new(Tier::Desktop, true);
    assert!(c.is_feature_enabled("background", "particles"));
    assert!(c.is_feature_enabled("monitoring", "performanceMonitor"));
}

#[test]
fn motion_levels_per_tier() {
    let levels: Vec<MotionLevel> = Tier::ALL
        .iter()
        .map(|t| DeviceCapability::new(*t, false).motion_level())
        .collect();
    assert_eq!(
        levels,
        vec![MotionLevel::Minimal, MotionLevel::Reduced, MotionLevel::Full]
    );
}

#[test]
fn category_parse_round_trip_and_error() {
    for c in [Category::Background, Category::Animations, Category::Monitoring] {
        assert_eq!(c.as_str().parse::<Category>(), Ok(c));
    }
    let err = "visuals".parse::<Category>().unwrap_err();
    assert_eq!(err.to_string(), "unknown feature category: visuals");
}

#[test]
fn watcher_notifies_only_on_breakpoint_or_preference_change() {
    let mut watcher = DeviceWatcher::new(Environment {
        viewport_width: 1000.0,
        reduced_motion: false,
    });
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_cb = seen.clone();
    let _sub = watcher.subscribe(move |c| seen_cb.borrow_mut().push(c.tier));

    assert!(watcher.set_viewport_width(1100.0).is_none());
    assert_eq!(
        watcher.set_viewport_width(500.0).map(|c| c.tier),
        Some(Tier::Mobile)
    );
    assert!(watcher.set_reduced_motion(true).is_some());
    assert!(watcher.set_reduced_motion(true).is_none());
    assert_eq!(watcher.environment().viewport_width, 500.0);

    assert_eq!(*seen.borrow(), vec![Tier::Mobile, Tier::Mobile]);
}

#[test]
fn dropping_the_subscription_stops_notifications() {
    let mut watcher = DeviceWatcher::new(Environment::default());
    let count = Rc::new(RefCell::new(0));
    let count_cb = count.clone();
    let sub = watcher.subscribe(move |_| *count_cb.borrow_mut() += 1);
    watcher.set_viewport_width(100.0);
    drop(sub);
    watcher.set_viewport_width(2000.0);
    assert_eq!(*count.borrow(), 1);
}

proptest! {
    #[test]
    fn tier_is_monotonic_in_width(a in 0.0f64..5000.0, b in 0.0f64..5000.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(Tier::from_width(lo) <= Tier::from_width(hi));
    }

    #[test]
    fn exactly_one_tier_flag_is_set(w in 0.0f64..10000.0, reduced in any::<bool>()) {
        let c = cap(w, reduced);
        let flags = [c.is_mobile, c.is_tablet, c.is_desktop];
        prop_assert_eq!(flags.iter().filter(|f| **f).count(), 1);
    }
}
