//! Device tiering and per-tier feature gates.
//!
//! Decorative components ask [`DeviceCapability::is_feature_enabled`] before
//! they mount. Lookups that miss the matrix are treated as enabled so that an
//! unknown feature is never hidden by accident. Reduced motion overrides the
//! whole `animations` category.

use crate::constants::{MOBILE_MAX_WIDTH, TABLET_MAX_WIDTH};
use crate::subscription::{Subscription, Watch};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Mobile,
    Tablet,
    Desktop,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Mobile, Tier::Tablet, Tier::Desktop];

    /// Classify a viewport width in CSS pixels. Negative or NaN widths are
    /// treated as zero.
    pub fn from_width(width: f64) -> Tier {
        let w = if width.is_nan() { 0.0 } else { width.max(0.0) };
        if w < MOBILE_MAX_WIDTH {
            Tier::Mobile
        } else if w < TABLET_MAX_WIDTH {
            Tier::Tablet
        } else {
            Tier::Desktop
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Mobile => "mobile",
            Tier::Tablet => "tablet",
            Tier::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Background,
    Animations,
    Monitoring,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Background => "background",
            Category::Animations => "animations",
            Category::Monitoring => "monitoring",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown feature category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "background" => Ok(Category::Background),
            "animations" => Ok(Category::Animations),
            "monitoring" => Ok(Category::Monitoring),
            other => Err(ParseCategoryError(other.to_string())),
        }
    }
}

/// Motion intensity for animation libraries that support graded output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionLevel {
    Off,
    Minimal,
    Reduced,
    Full,
}

impl MotionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            MotionLevel::Off => "off",
            MotionLevel::Minimal => "minimal",
            MotionLevel::Reduced => "reduced",
            MotionLevel::Full => "full",
        }
    }
}

impl fmt::Display for MotionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureValue {
    Flag(bool),
    Level(MotionLevel),
}

impl FeatureValue {
    pub fn enabled(self) -> bool {
        match self {
            FeatureValue::Flag(on) => on,
            FeatureValue::Level(level) => level != MotionLevel::Off,
        }
    }
}

use FeatureValue::{Flag, Level};

/// One row of the static matrix: values for mobile, tablet, desktop.
struct FeatureRow {
    category: Category,
    name: &'static str,
    per_tier: [FeatureValue; 3],
}

const fn row(category: Category, name: &'static str, per_tier: [FeatureValue; 3]) -> FeatureRow {
    FeatureRow {
        category,
        name,
        per_tier,
    }
}

#[rustfmt::skip]
static FEATURE_MATRIX: &[FeatureRow] = &[
    row(Category::Background, "particles", [Flag(false), Flag(true), Flag(true)]),
    row(Category::Background, "glow", [Flag(true), Flag(true), Flag(true)]),
    row(Category::Background, "grid", [Flag(false), Flag(true), Flag(true)]),
    row(Category::Background, "noise", [Flag(false), Flag(false), Flag(true)]),
    row(Category::Background, "texture", [Flag(false), Flag(true), Flag(true)]),
    row(Category::Animations, "framerMotion", [
        Level(MotionLevel::Minimal), Level(MotionLevel::Reduced), Level(MotionLevel::Full),
    ]),
    row(Category::Animations, "continuousAnimations", [Flag(false), Flag(true), Flag(true)]),
    row(Category::Animations, "hoverEffects", [Flag(false), Flag(true), Flag(true)]),
    row(Category::Animations, "pageTransitions", [Flag(true), Flag(true), Flag(true)]),
    row(Category::Monitoring, "performanceMonitor", [Flag(false), Flag(false), Flag(true)]),
    row(Category::Monitoring, "webVitals", [Flag(true), Flag(true), Flag(true)]),
];

fn tier_index(tier: Tier) -> usize {
    match tier {
        Tier::Mobile => 0,
        Tier::Tablet => 1,
        Tier::Desktop => 2,
    }
}

/// Raw matrix lookup for a tier, ignoring reduced motion.
pub fn matrix_value(tier: Tier, category: Category, feature: &str) -> Option<FeatureValue> {
    FEATURE_MATRIX
        .iter()
        .find(|r| r.category == category && r.name == feature)
        .map(|r| r.per_tier[tier_index(tier)])
}

/// Environment inputs the classifier depends on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    pub viewport_width: f64,
    pub reduced_motion: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            viewport_width: TABLET_MAX_WIDTH,
            reduced_motion: false,
        }
    }
}

/// Read-only snapshot handed to decorative components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceCapability {
    pub tier: Tier,
    pub reduced_motion: bool,
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub is_desktop: bool,
}

impl DeviceCapability {
    pub fn new(tier: Tier, reduced_motion: bool) -> Self {
        Self {
            tier,
            reduced_motion,
            is_mobile: tier == Tier::Mobile,
            is_tablet: tier == Tier::Tablet,
            is_desktop: tier == Tier::Desktop,
        }
    }

    pub fn classify(env: Environment) -> Self {
        Self::new(Tier::from_width(env.viewport_width), env.reduced_motion)
    }

    /// Effective matrix value after the reduced-motion override.
    pub fn feature_value(&self, category: Category, feature: &str) -> Option<FeatureValue> {
        let value = matrix_value(self.tier, category, feature)?;
        if category == Category::Animations && self.reduced_motion {
            return Some(match value {
                Flag(_) => Flag(false),
                Level(_) => Level(MotionLevel::Off),
            });
        }
        Some(value)
    }

    pub fn is_feature_enabled(&self, category: &str, feature: &str) -> bool {
        match category.parse::<Category>() {
            Ok(cat) => self.is_enabled(cat, feature),
            Err(_) => true,
        }
    }

    pub fn is_enabled(&self, category: Category, feature: &str) -> bool {
        if category == Category::Animations && self.reduced_motion {
            return false;
        }
        self.feature_value(category, feature)
            .map(FeatureValue::enabled)
            .unwrap_or(true)
    }

    pub fn motion_level(&self) -> MotionLevel {
        match self.feature_value(Category::Animations, "framerMotion") {
            Some(Level(level)) => level,
            Some(Flag(true)) | None => MotionLevel::Full,
            Some(Flag(false)) => MotionLevel::Off,
        }
    }
}

/// Keeps the latest snapshot and tells subscribers when it changes.
///
/// Environment updates that stay inside the same tier with the same
/// reduced-motion preference do not notify.
pub struct DeviceWatcher {
    env: Environment,
    capability: Watch<DeviceCapability>,
}

impl DeviceWatcher {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            capability: Watch::new(DeviceCapability::classify(env)),
        }
    }

    pub fn environment(&self) -> Environment {
        self.env
    }

    pub fn current(&self) -> DeviceCapability {
        self.capability.get()
    }

    /// Feed a new environment. Returns the new snapshot when it differs.
    pub fn update(&mut self, env: Environment) -> Option<DeviceCapability> {
        self.env = env;
        let next = DeviceCapability::classify(env);
        if self.capability.set(next) {
            log::info!(
                "[device] tier={} reduced_motion={}",
                next.tier,
                next.reduced_motion
            );
            Some(next)
        } else {
            None
        }
    }

    pub fn set_viewport_width(&mut self, width: f64) -> Option<DeviceCapability> {
        self.update(Environment {
            viewport_width: width,
            ..self.env
        })
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) -> Option<DeviceCapability> {
        self.update(Environment {
            reduced_motion: reduced,
            ..self.env
        })
    }

    pub fn subscribe(&self, on_change: impl FnMut(&DeviceCapability) + 'static) -> Subscription {
        self.capability.subscribe(on_change)
    }

    /// Shared handle to the snapshot cell for adapters that outlive `&self`.
    pub fn watch(&self) -> Watch<DeviceCapability> {
        self.capability.clone()
    }
}
