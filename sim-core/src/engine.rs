//! The growth engine: population bookkeeping and the per-step rules.
//!
//! Each call to [`Engine::step`] advances the simulation by exactly one
//! discrete tick:
//! 1. Every node in the active set ages by one step and rolls a spawn
//!    chance against its `expand_probability`.
//! 2. Spawned children inherit decayed attributes and are buffered, so
//!    they are not themselves stepped until the next tick.
//! 3. Expired nodes leave the active set; an expired frontier node is
//!    replaced in the frontier by its children, promoting the growth
//!    front outward.

use crate::{config::Config, tree::Tree, types::NodeId};
use glam::Vec2;
use rand::Rng;

/// Owns the evolving population of growth nodes.
///
/// The arena (`tree`) keeps every node ever created; `active` and
/// `frontier` are the bookkeeping sets the step rules operate on.
/// Renderers read all three and must not mutate them mid-run.
///
/// ### Fields
/// - `tree` - Arena of all nodes, expired ones included.
/// - `active` - Ids of nodes still stepped each tick, oldest first.
/// - `frontier` - Ids of the current growth tips. Starts as `[root]`;
///   an expiring member is replaced by its children in append order.
#[derive(Debug)]
pub struct Engine {
    pub tree: Tree,
    pub active: Vec<NodeId>,
    pub frontier: Vec<NodeId>,
    cfg: Config,
}

impl Engine {
    /// Creates an engine with a single root node, placed and sized
    /// per `cfg`. The root starts as the sole active and frontier
    /// member. The configuration is copied in and stays fixed for the
    /// lifetime of the run.
    pub fn new(cfg: &Config, rng: &mut impl Rng) -> Self {
        let tree = Tree::new(cfg, rng);
        Self {
            tree,
            active: vec![0],
            frontier: vec![0],
            cfg: *cfg,
        }
    }

    /// The configuration this run was started with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Advances the simulation by one step.
    ///
    /// Iterates a snapshot of the active set, so nodes removed or
    /// spawned mid-step are neither skipped nor double-processed. For
    /// each snapshot node, in insertion order:
    ///
    /// 1. Life counts down by one ([`crate::tree::Node::tick_life`]);
    ///    immortal nodes never expire.
    /// 2. A uniform draw `r ∈ [0, 1)` is tested against the node's
    ///    `expand_probability`. On success exactly one child is
    ///    spawned, and only then is the parent's probability divided
    ///    by `probability_loss_rate` — the child inherits the
    ///    pre-division value. A probability ≤ 0 simply never spawns.
    /// 3. If the node expired this step, it leaves `active`; if it was
    ///    a frontier member it is swapped for all of its children,
    ///    including one spawned this very step. Expiring outside the
    ///    frontier is a plain removal, never an error.
    ///
    /// Children spawned during the step are merged into `active` at
    /// the end, so they first act on the following step.
    ///
    /// ### Parameters
    /// - `rng` - Source of spawn rolls, child offsets, and colors.
    pub fn step(&mut self, rng: &mut impl Rng) {
        let snapshot: Vec<NodeId> = self.active.clone();
        let mut spawned: Vec<NodeId> = Vec::with_capacity(16);

        for id in snapshot {
            let expired = self.tree.nodes[id].tick_life();

            let roll: f32 = rng.random();
            if roll < self.tree.nodes[id].expand_probability {
                spawned.push(self.spawn_child(id, rng));
                self.tree.nodes[id].expand_probability /= self.cfg.probability_loss_rate;
            }

            if expired {
                if let Some(i) = self.active.iter().position(|&n| n == id) {
                    self.active.remove(i);
                }
                if let Some(i) = self.frontier.iter().position(|&n| n == id) {
                    self.frontier.remove(i);
                    self.frontier
                        .extend(self.tree.nodes[id].children.iter().copied());
                }
            }
        }

        self.active.extend(spawned);
    }

    /// Spawns one child of `parent` at a uniform offset within the
    /// parent's expand square, shifted by the configured wind.
    fn spawn_child(&mut self, parent: NodeId, rng: &mut impl Rng) -> NodeId {
        let (pos, probability, range) = {
            let p = &self.tree.nodes[parent];
            let offset = Vec2::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            (
                p.pos + self.cfg.wind + p.expand_range * offset,
                p.expand_probability / self.cfg.child_probability_decay,
                p.expand_range / self.cfg.child_range_decay,
            )
        };
        self.tree
            .add_child(parent, pos, probability, range, &self.cfg, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    /// A config where every node spawns every step and nothing decays,
    /// so outcomes are independent of the random rolls.
    fn always_spawn_cfg() -> Config {
        let mut cfg = Config::starburst();
        cfg.root_probability = 1.0;
        cfg.probability_loss_rate = 1.0;
        cfg.child_probability_decay = 1.0;
        cfg.child_range_decay = 1.0;
        cfg
    }

    #[test]
    fn single_node_chain_promotes_frontier_each_step() {
        let mut cfg = always_spawn_cfg();
        cfg.age_coefficient = 1;
        let mut r = rng();
        let mut engine = Engine::new(&cfg, &mut r);

        // Step 1: the root spawns once, then expires.
        engine.step(&mut r);
        assert_eq!(engine.tree.nodes.len(), 2);
        assert_eq!(engine.active, vec![1]);
        assert_eq!(engine.frontier, vec![1]);

        // Step 2: same fate for the child.
        engine.step(&mut r);
        assert_eq!(engine.tree.nodes.len(), 3);
        assert_eq!(engine.active, vec![2]);
        assert_eq!(engine.frontier, vec![2]);

        // The lineage is still fully reachable through the arena.
        assert_eq!(engine.tree.nodes[0].children, vec![1]);
        assert_eq!(engine.tree.nodes[1].children, vec![2]);
    }

    #[test]
    fn zero_probability_never_spawns_and_population_dies_out() {
        let mut cfg = Config::starburst();
        cfg.root_probability = 0.0;
        cfg.age_coefficient = 3;
        let mut r = rng();
        let mut engine = Engine::new(&cfg, &mut r);

        for _ in 0..3 {
            assert_eq!(engine.active, vec![0]);
            engine.step(&mut r);
        }
        assert!(engine.active.is_empty());
        assert!(engine.tree.nodes[0].children.is_empty());

        // Further steps are harmless no-ops.
        for _ in 0..5 {
            engine.step(&mut r);
        }
        assert!(engine.active.is_empty());
        assert_eq!(engine.tree.nodes.len(), 1);
    }

    #[test]
    fn lifecycle_lasts_exactly_age_coefficient_steps() {
        for age in 1..=4 {
            let mut cfg = Config::starburst();
            cfg.root_probability = 0.0;
            cfg.age_coefficient = age;
            let mut r = rng();
            let mut engine = Engine::new(&cfg, &mut r);

            for step in 0..age {
                assert!(
                    engine.active.contains(&0),
                    "age {age}: root gone before step {step}"
                );
                engine.step(&mut r);
            }
            assert!(!engine.active.contains(&0), "age {age}: root outlived its life");
        }
    }

    #[test]
    fn spawn_probability_decays_geometrically_with_each_spawn() {
        let mut cfg = Config::starburst();
        // Large enough that the roll always succeeds despite the decay.
        cfg.root_probability = 1.0e6;
        cfg.probability_loss_rate = 1.1;
        cfg.age_coefficient = 0;
        let mut r = rng();
        let mut engine = Engine::new(&cfg, &mut r);

        let steps = 6;
        for _ in 0..steps {
            engine.step(&mut r);
        }

        assert_eq!(engine.tree.nodes[0].children.len(), steps);
        let expected = 1.0e6 / 1.1f32.powi(steps as i32);
        let got = engine.tree.nodes[0].expand_probability;
        assert!(
            (got - expected).abs() / expected < 1e-5,
            "expected {expected}, got {got}"
        );
    }

    #[test]
    fn child_inherits_pre_division_attributes() {
        let mut cfg = Config::starburst();
        cfg.root_probability = 1.0;
        cfg.probability_loss_rate = 1.1;
        cfg.child_probability_decay = 2.0;
        cfg.child_range_decay = 4.0;
        // Small root range keeps children far from the walls, so the
        // inherited range is not boundary-clamped.
        cfg.root_range_coefficient = 0.1;
        let mut r = rng();
        let mut engine = Engine::new(&cfg, &mut r);

        engine.step(&mut r);

        let root = &engine.tree.nodes[0];
        let child = &engine.tree.nodes[1];
        // Child sees the parent's probability before the loss division.
        assert_eq!(child.expand_probability, 1.0 / 2.0);
        assert_eq!(root.expand_probability, 1.0 / 1.1);
        assert_eq!(child.expand_range, cfg.root_range() / 4.0);
    }

    #[test]
    fn expired_frontier_node_is_replaced_by_children_in_order() {
        let mut cfg = always_spawn_cfg();
        cfg.age_coefficient = 2;
        let mut r = rng();
        let mut engine = Engine::new(&cfg, &mut r);

        // Step 1: root spawns child 1 and lives on.
        engine.step(&mut r);
        assert_eq!(engine.frontier, vec![0]);

        // Step 2: root spawns child 2 on its final step, then expires.
        // Both children take its frontier place, in append order.
        engine.step(&mut r);
        assert_eq!(engine.tree.nodes[0].children, vec![1, 2]);
        assert_eq!(engine.frontier, vec![1, 2]);
        assert_eq!(engine.active, vec![1, 2, 3]);
    }

    #[test]
    fn expiring_outside_the_frontier_is_a_no_op() {
        let mut cfg = Config::starburst();
        cfg.root_probability = 0.0;
        cfg.age_coefficient = 1;
        let mut r = rng();
        let mut engine = Engine::new(&cfg, &mut r);

        engine.frontier.clear();
        engine.step(&mut r);

        assert!(engine.active.is_empty());
        assert!(engine.frontier.is_empty());
    }

    #[test]
    fn new_children_first_act_on_the_following_step() {
        let cfg = always_spawn_cfg();
        let mut r = rng();
        let mut engine = Engine::new(&cfg, &mut r);

        // One active node spawns one child.
        engine.step(&mut r);
        assert_eq!(engine.tree.nodes.len(), 2);

        // Both now spawn; the step-1 child did not act early.
        engine.step(&mut r);
        assert_eq!(engine.tree.nodes.len(), 4);
    }

    #[test]
    fn all_nodes_stay_inside_the_domain() {
        let cfg = Config::starburst();
        let mut r = rng();
        let mut engine = Engine::new(&cfg, &mut r);

        for _ in 0..10 {
            engine.step(&mut r);
        }
        assert!(engine.tree.nodes.len() > 1);

        let w = cfg.window_size;
        for node in &engine.tree.nodes {
            assert!(node.pos.x >= 0.0 && node.pos.x <= w, "pos {:?}", node.pos);
            assert!(node.pos.y >= 0.0 && node.pos.y <= w, "pos {:?}", node.pos);
            // The clamp invariant: range never reaches past a wall.
            assert!(node.expand_range <= node.pos.x.min(w - node.pos.x));
            assert!(node.expand_range <= node.pos.y.min(w - node.pos.y));
        }
    }
}
