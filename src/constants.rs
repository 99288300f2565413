// Shared tuning constants for the site runtime.

// Device tiers (CSS pixels, viewport width)
pub const MOBILE_MAX_WIDTH: f64 = 768.0; // width < this -> mobile
pub const TABLET_MAX_WIDTH: f64 = 1440.0; // width < this -> tablet, else desktop

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Particle field
pub const DEFAULT_PARTICLE_COUNT: usize = 30;
pub const MAX_PARTICLES: usize = 120; // pairwise link pass is O(n^2)
pub const CONNECT_DISTANCE: f32 = 80.0;
pub const RESET_OFFSET: f32 = 10.0; // wrap band past the bottom; wrapped petals re-enter this far above the top
pub const PHASE_STEP: f32 = 0.01;
pub const LINK_ALPHA: f32 = 0.15; // opacity of a link at zero distance
pub const PAUSED_OPACITY: f32 = 0.3;

pub const PARTICLE_SIZE_MIN: f32 = 6.0;
pub const PARTICLE_SIZE_MAX: f32 = 14.0;
pub const PARTICLE_SPEED_MIN: f32 = 0.3;
pub const PARTICLE_SPEED_MAX: f32 = 1.0;
pub const PARTICLE_SWAY_MIN: f32 = 0.2;
pub const PARTICLE_SWAY_MAX: f32 = 0.8;
pub const PARTICLE_DRIFT_MAX: f32 = 0.3; // symmetric: [-max, max]
pub const PARTICLE_SPIN_MAX: f32 = 0.02; // radians per frame, symmetric

// Theme colors
pub const ACCENT_CSS_VAR: &str = "--accent-color";
pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const FALLBACK_ACCENT: &str = "#ff8fab";
pub const FILL_ALPHA_DARK: f32 = 0.6;
pub const FILL_ALPHA_LIGHT: f32 = 0.45;
pub const STROKE_ALPHA: f32 = 0.3;

// Terminal widget
pub const TERMINAL_HISTORY_LIMIT: usize = 50;
pub const TERMINAL_PROMPT: &str = "guest@folio:~$";

// Contact
pub const CONTACT_EMAIL: &str = "hello@example.dev";
