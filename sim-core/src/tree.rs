use crate::config::Config;
use crate::types::NodeId;
use glam::Vec2;
use rand::Rng;

/// One growth node in the branching pattern.
#[derive(Debug)]
pub struct Node {
    pub pos: Vec2,
    /// Chance of producing a child this step. Not clamped to 1; larger
    /// values keep meaning "always spawn" and feed the rendered size.
    pub expand_probability: f32,
    /// Half-width of the square a child position is drawn from.
    pub expand_range: f32,
    pub color: [u8; 3],
    /// Steps left to live; `None` means the node never expires.
    pub remaining_life: Option<u32>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Clamps an expand range so the spawn square stays inside the domain.
fn clamp_range(range: f32, pos: Vec2, window_size: f32) -> f32 {
    range
        .min(pos.x)
        .min(window_size - pos.x)
        .min(pos.y)
        .min(window_size - pos.y)
}

/// Rolls a node color, each channel uniform and scaled by its
/// configured intensity.
fn roll_color(intensity: &[f32; 3], rng: &mut impl Rng) -> [u8; 3] {
    let mut color = [0u8; 3];
    for (channel, k) in color.iter_mut().zip(intensity) {
        *channel = (k * 255.0 * rng.random::<f32>()) as u8;
    }
    color
}

impl Node {
    fn new(
        pos: Vec2,
        expand_probability: f32,
        expand_range: f32,
        parent: Option<NodeId>,
        cfg: &Config,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            pos,
            expand_probability,
            expand_range: clamp_range(expand_range, pos, cfg.window_size),
            color: roll_color(&cfg.color_intensity, rng),
            // Age 0 is the "never expires" sentinel, not a countdown.
            remaining_life: (cfg.age_coefficient > 0).then_some(cfg.age_coefficient),
            parent,
            children: Vec::with_capacity(4),
        }
    }

    pub fn new_root(
        pos: Vec2,
        expand_probability: f32,
        expand_range: f32,
        cfg: &Config,
        rng: &mut impl Rng,
    ) -> Self {
        Self::new(pos, expand_probability, expand_range, None, cfg, rng)
    }

    pub fn new_child(
        pos: Vec2,
        expand_probability: f32,
        expand_range: f32,
        parent: NodeId,
        cfg: &Config,
        rng: &mut impl Rng,
    ) -> Self {
        Self::new(pos, expand_probability, expand_range, Some(parent), cfg, rng)
    }

    /// Counts down one step of life. Returns `true` exactly once, on
    /// the step the node expires; immortal nodes always return `false`.
    pub fn tick_life(&mut self) -> bool {
        match self.remaining_life.as_mut() {
            Some(life) => {
                *life -= 1;
                *life == 0
            }
            None => false,
        }
    }
}

/// Arena holding every node ever created.
///
/// Expired nodes are never removed; they stay reachable through their
/// parent's `children` list so connection lines can still be drawn.
#[derive(Debug)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Creates a tree with a single root placed per the config.
    pub fn new(cfg: &Config, rng: &mut impl Rng) -> Self {
        let root = Node::new_root(
            cfg.root_pos(),
            cfg.root_probability,
            cfg.root_range(),
            cfg,
            rng,
        );
        Self { nodes: vec![root] }
    }

    pub fn add_child(
        &mut self,
        parent: NodeId,
        pos: Vec2,
        expand_probability: f32,
        expand_range: f32,
        cfg: &Config,
        rng: &mut impl Rng,
    ) -> NodeId {
        let id: usize = self.nodes.len();
        self.nodes.push(Node::new_child(
            pos,
            expand_probability,
            expand_range,
            parent,
            cfg,
            rng,
        ));
        self.nodes[parent].children.push(id);
        id
    }
}
