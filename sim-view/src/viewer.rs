//! Interactive viewer for the starburst growth simulation, built with
//! eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation state
//! (engine, configuration draft, camera) and implements
//! [`eframe::App`] to render and control the simulation through an
//! egui UI.

use eframe::App;
use glam::Vec2;
use rand::rng;
use sim_core::{config::Config, engine::Engine, types::NodeId};

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`Engine`] and its fixed run [`Config`].
/// - An editable config draft, applied to the engine on Reset.
/// - UI configuration (pan/zoom, timing).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and enough time has passed, call
///    [`Viewer::step_once`].
/// 3. Render the active nodes and the connection lines growing out of
///    the frontier.
///
/// ### Fields
/// - `engine` - Current simulation run.
/// - `cfg` - Draft configuration edited through the UI; the engine
///   only picks it up when a new run starts.
/// - `preset` - Name of the last preset loaded into the draft.
///
/// - `rng` - Random number generator driving spawn rolls and colors.
///
/// - `running` - Whether the simulation is currently auto-advancing.
/// - `zoom` - Zoom factor for world-to-screen coordinate mapping.
/// - `pan` - Screen-space pan offset in pixels.
///
/// - `step_interval` - Target time between automatic steps (seconds).
/// - `last_step_time` - Time stamp of the last step (egui time).
/// - `last_step_dt` - Actual time delta between the last two steps
///   (for display only).
pub struct Viewer {
    engine: Engine,
    cfg: Config,
    preset: &'static str,

    rng: rand::rngs::ThreadRng,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a new viewer running the `"starburst"` preset.
    ///
    /// The camera starts zoomed out far enough to show the whole
    /// domain square in a typical window, with no pan.
    pub fn new() -> Self {
        let mut rng = rng();
        let cfg = Config::default();
        let engine = Engine::new(&cfg, &mut rng);
        let step_interval = cfg.step_delay;

        Self {
            engine,
            cfg,
            preset: Config::PRESETS[0],
            rng,
            running: false,
            zoom: 0.6,
            pan: egui::vec2(0.0, 0.0),
            step_interval,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        }
    }

    /// Starts a fresh run from the current config draft.
    ///
    /// This keeps the camera settings, but:
    /// - Replaces the engine with a new one built from `cfg`.
    /// - Re-seeds the step interval from the draft's `step_delay`.
    /// - Stops auto-running.
    fn reset(&mut self) {
        self.engine = Engine::new(&self.cfg, &mut self.rng);
        self.step_interval = self.cfg.step_delay;
        self.running = false;
    }

    /// Advances the simulation by a single step.
    fn step_once(&mut self) {
        self.engine.step(&mut self.rng);
    }

    /// Converts a world-space position to screen-space.
    ///
    /// The domain center is mapped to the center of `rect`, scaled by
    /// `zoom` and offset by `pan`. World y grows downward, matching
    /// the screen.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let half = self.engine.config().window_size * 0.5;
        egui::pos2(
            center.x + (p.x - half) * self.zoom + self.pan.x,
            center.y + (p.y - half) * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] (up to
    /// floating point rounding), using the same `zoom`, `pan`, and
    /// `rect` center.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let half = self.engine.config().window_size * 0.5;
        let x = (p.x - center.x - self.pan.x) / self.zoom + half;
        let y = (p.y - center.y - self.pan.y) / self.zoom + half;
        Vec2::new(x, y)
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, presets, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.0..=1.0)
                        .speed(0.01),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                egui::ComboBox::from_label("Preset")
                    .selected_text(self.preset)
                    .show_ui(ui, |ui| {
                        for name in Config::PRESETS {
                            if ui.selectable_value(&mut self.preset, name, name).changed()
                                && let Some(cfg) = Config::preset(name)
                            {
                                self.cfg = cfg;
                                self.reset();
                            }
                        }
                    });

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (time step, population counts).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("nodes = {}", self.engine.tree.nodes.len()));
                ui.label(format!("active = {}", self.engine.active.len()));
                ui.label(format!("frontier = {}", self.engine.frontier.len()));
            });
        });
    }

    /// Builds the right-hand panel editing the config draft.
    ///
    /// Edits do not touch the running engine; they take effect the
    /// next time Reset starts a run.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");
                ui.label("(applied on Reset)");

                ui.separator();
                ui.label("Domain");
                Self::labeled_drag_f32(
                    ui,
                    "window_size:",
                    &mut self.cfg.window_size,
                    100.0..=4000.0,
                    10.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "offset.x:",
                    &mut self.cfg.root_offset.x,
                    -2000.0..=2000.0,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "offset.y:",
                    &mut self.cfg.root_offset.y,
                    -2000.0..=2000.0,
                    1.0,
                );

                ui.separator();
                ui.label("Wind");
                Self::labeled_drag_f32(ui, "wind.x:", &mut self.cfg.wind.x, -50.0..=50.0, 0.5);
                Self::labeled_drag_f32(ui, "wind.y:", &mut self.cfg.wind.y, -50.0..=50.0, 0.5);

                ui.separator();
                ui.label("Growth");
                Self::labeled_drag_f32(
                    ui,
                    "root_probability:",
                    &mut self.cfg.root_probability,
                    0.0..=10.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "root_range_coefficient:",
                    &mut self.cfg.root_range_coefficient,
                    0.0..=1.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "probability_loss_rate:",
                    &mut self.cfg.probability_loss_rate,
                    1.0..=2.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "child_probability_decay:",
                    &mut self.cfg.child_probability_decay,
                    1.0..=5.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "child_range_decay:",
                    &mut self.cfg.child_range_decay,
                    1.0..=5.0,
                    0.05,
                );
                ui.horizontal(|ui| {
                    ui.label("age_coefficient:");
                    ui.add(
                        egui::DragValue::new(&mut self.cfg.age_coefficient)
                            .range(0..=1000)
                            .speed(1.0),
                    );
                });
                ui.label("(0 = immortal)");

                ui.separator();
                ui.label("Display");
                Self::labeled_drag_f32(
                    ui,
                    "circle_size:",
                    &mut self.cfg.circle_size_coefficient,
                    0.0..=50.0,
                    0.5,
                );
                Self::labeled_drag_f32(
                    ui,
                    "line_width:",
                    &mut self.cfg.line_width,
                    0.0..=20.0,
                    0.5,
                );
                Self::labeled_drag_f32(
                    ui,
                    "redness:",
                    &mut self.cfg.color_intensity[0],
                    0.0..=1.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "greenness:",
                    &mut self.cfg.color_intensity[1],
                    0.0..=1.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "blueness:",
                    &mut self.cfg.color_intensity[2],
                    0.0..=1.0,
                    0.01,
                );

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                    self.preset = Config::PRESETS[0];
                }
            });
    }

    /// Recursively draws the connection lines of a node's subtree,
    /// each edge in its parent's color.
    fn draw_connections(&self, painter: &egui::Painter, rect: egui::Rect, id: NodeId) {
        let node = &self.engine.tree.nodes[id];
        let stroke_width = (self.engine.config().line_width * self.zoom).max(1.0);
        let color = egui::Color32::from_rgb(node.color[0], node.color[1], node.color[2]);

        for &child in &node.children {
            let a = self.world_to_screen(node.pos, rect);
            let b = self.world_to_screen(self.engine.tree.nodes[child].pos, rect);
            painter.line_segment([a, b], egui::Stroke::new(stroke_width, color));
            self.draw_connections(painter, rect, child);
        }
    }

    /// Builds the central panel where the pattern is drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                let delta = response.drag_delta();
                self.pan += delta;
            }

            // Zoom around the mouse cursor.
            if ui.ctx().input(|i| i.raw_scroll_delta.y != 0.0) {
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    let pointer_screen = response.hover_pos().unwrap_or(rect.center());

                    let world_before = self.screen_to_world(pointer_screen, rect);

                    let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                    let new_zoom = (self.zoom * factor).clamp(0.1, 10.0);
                    self.zoom = new_zoom;

                    let screen_after = self.world_to_screen(world_before, rect);

                    let delta = pointer_screen - screen_after;
                    self.pan += delta;
                }
            }

            // Domain outline.
            let w = self.engine.config().window_size;
            let top_left = self.world_to_screen(Vec2::ZERO, rect);
            let bottom_right = self.world_to_screen(Vec2::splat(w), rect);
            painter.rect_stroke(
                egui::Rect::from_two_pos(top_left, bottom_right),
                egui::CornerRadius::ZERO,
                egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
                egui::StrokeKind::Outside,
            );

            // Connection lines grow out of the frontier subtrees.
            for &id in &self.engine.frontier {
                self.draw_connections(&painter, rect, id);
            }

            // Active nodes, sized by their expand probability.
            let circle_size = self.engine.config().circle_size_coefficient;
            for &id in &self.engine.active {
                let node = &self.engine.tree.nodes[id];
                let p = self.world_to_screen(node.pos, rect);
                let r = (node.expand_probability * circle_size * self.zoom).max(1.0);
                let color = egui::Color32::from_rgb(node.color[0], node.color[1], node.color[2]);
                painter.circle_filled(p, r, color);
            }

            // Auto-run simulation if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    ///
    /// This method:
    /// - Renders the top control bar and status bar.
    /// - Renders the config side panel.
    /// - Draws the central simulation view and handles interactions.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
