use glam::Vec2;

/// Immutable parameters for one simulation run.
///
/// A `Config` is built once (usually from a named preset), handed to
/// [`crate::engine::Engine::new`], and never mutated while the run is
/// in progress. The last three fields are rendering hints the engine
/// carries but does not interpret, except that `color_intensity`
/// scales the random color rolled for each node at construction.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Side length of the square domain `[0, window_size]²`.
    pub window_size: f32,
    /// Fixed positional bias added to every spawned child ("wind").
    pub wind: Vec2,
    /// Root placement offset from the domain center.
    pub root_offset: Vec2,
    /// Driver pacing hint: seconds to wait between steps.
    pub step_delay: f64,
    /// Root node's initial expand probability. Values above 1 still
    /// mean "always spawn" but also enlarge the rendered circle.
    pub root_probability: f32,
    /// Fraction of the half-domain used as the root's expand range.
    pub root_range_coefficient: f32,
    /// Each spawn divides the parent's expand probability by this.
    pub probability_loss_rate: f32,
    /// A child's expand probability is the parent's divided by this.
    pub child_probability_decay: f32,
    /// A child's expand range is the parent's divided by this.
    pub child_range_decay: f32,
    /// Lifetime in steps; 0 means nodes never expire.
    pub age_coefficient: u32,
    /// Rendered circle radius per unit of expand probability.
    pub circle_size_coefficient: f32,
    /// Width of rendered connection lines.
    pub line_width: f32,
    /// Per-channel RGB intensity scales in `[0, 1]`.
    pub color_intensity: [f32; 3],
}

impl Config {
    /// Names accepted by [`Config::preset`].
    pub const PRESETS: [&'static str; 2] = ["starburst", "fuzzball"];

    /// The classic star-topology pattern: immortal nodes filling the
    /// whole domain.
    pub fn starburst() -> Self {
        Self {
            window_size: 1000.0,
            wind: Vec2::ZERO,
            root_offset: Vec2::ZERO,
            step_delay: 0.0,
            root_probability: 1.0,
            root_range_coefficient: 1.0,
            probability_loss_rate: 1.1,
            child_probability_decay: 2.0,
            child_range_decay: 3.0,
            age_coefficient: 0,
            circle_size_coefficient: 10.0,
            line_width: 2.0,
            color_intensity: [1.0, 1.0, 1.0],
        }
    }

    /// A dense, short-range, finite-lifetime variant.
    pub fn fuzzball() -> Self {
        Self {
            root_range_coefficient: 0.1,
            child_probability_decay: 1.2,
            child_range_decay: 1.0,
            age_coefficient: 100,
            ..Self::starburst()
        }
    }

    /// Looks up a preset bundle by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "starburst" => Some(Self::starburst()),
            "fuzzball" => Some(Self::fuzzball()),
            _ => None,
        }
    }

    /// Root position: domain center plus the configured offset.
    pub fn root_pos(&self) -> Vec2 {
        Vec2::splat(self.window_size * 0.5) + self.root_offset
    }

    /// Root expand range before boundary clamping.
    pub fn root_range(&self) -> f32 {
        self.root_range_coefficient * self.window_size * 0.5
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::starburst()
    }
}
