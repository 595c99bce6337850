use egui::Context;

use crate::controller::{PlacementOutcome, Session};
use crate::model::BlockKind;
use crate::utils::GridCoord;

/// Frames-per-second averaged over roughly one second
#[derive(Default)]
pub struct FpsCounter {
    pub fps: f32,
    frame_count: u32,
    timer: f32,
}

impl FpsCounter {
    pub fn tick(&mut self, dt: f32) {
        self.frame_count += 1;
        self.timer += dt;
        if self.timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.timer;
            self.frame_count = 0;
            self.timer = 0.0;
        }
    }
}

/// What the debug window shows, sampled once per frame
#[derive(Clone, Debug)]
pub struct HudStats {
    pub fps: f32,
    pub position: glam::Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub blocks: usize,
    pub visible: usize,
    pub pointer_locked: bool,
    pub can_jump: bool,
    pub next_kind: BlockKind,
    pub last_placement: Option<PlacementOutcome>,
}

impl HudStats {
    pub fn sample(session: &Session, fps: f32, pointer_locked: bool) -> Self {
        Self {
            fps,
            position: session.player.position,
            yaw: session.player.yaw,
            pitch: session.player.pitch,
            blocks: session.world.len(),
            visible: session.world.visible().count(),
            pointer_locked,
            can_jump: session.player.can_jump,
            next_kind: session.placement.next_kind(),
            last_placement: session.last_placement,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let p = self.position;
        let mut lines = vec![
            format!("FPS: {:.0}", self.fps),
            format!("Pos: {:.1}, {:.1}, {:.1}", p.x, p.y, p.z),
            format!("Cell: {:?}", GridCoord::from_position(p)),
            format!("Yaw: {:.0} Pitch: {:.0}", self.yaw.to_degrees(), self.pitch.to_degrees()),
            format!("Blocks: {} ({} visible)", self.blocks, self.visible),
            format!("Next block: {}", self.next_kind.name()),
            format!("On ground: {}", if self.can_jump { "yes" } else { "no" }),
        ];
        if let Some(outcome) = self.last_placement {
            lines.push(format!("Last click: {}", describe(outcome)));
        }
        lines.push(if self.pointer_locked {
            "Esc - release mouse".to_string()
        } else {
            "Click to capture mouse".to_string()
        });
        lines
    }
}

fn describe(outcome: PlacementOutcome) -> String {
    match outcome {
        PlacementOutcome::Placed(c, kind) => format!("placed {} at {} {} {}", kind.name(), c.0, c.1, c.2),
        PlacementOutcome::CoolingDown => "too fast".to_string(),
        PlacementOutcome::NoTarget => "nothing in reach".to_string(),
        PlacementOutcome::Occupied(_) => "cell taken".to_string(),
        PlacementOutcome::TooClose(_) => "too close".to_string(),
    }
}

/// Build the HUD for this frame
pub fn build_ui(ctx: &Context, stats: &HudStats) {
    draw_crosshair(ctx);
    draw_debug_window(ctx, stats);
}

fn draw_crosshair(ctx: &Context) {
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::Foreground, egui::Id::new("crosshair")));
    let center = ctx.available_rect().center();
    let size = 10.0;
    let stroke = egui::Stroke::new(2.0, egui::Color32::WHITE);
    painter.line_segment(
        [egui::Pos2::new(center.x - size, center.y), egui::Pos2::new(center.x + size, center.y)],
        stroke,
    );
    painter.line_segment(
        [egui::Pos2::new(center.x, center.y - size), egui::Pos2::new(center.x, center.y + size)],
        stroke,
    );
}

fn draw_debug_window(ctx: &Context, stats: &HudStats) {
    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .default_size([160.0, 120.0])
        .show(ctx, |ui| {
            for line in stats.lines() {
                ui.label(egui::RichText::new(line).small());
            }
            ui.separator();
            ui.label(egui::RichText::new("WASD / arrows - Move").small());
            ui.label(egui::RichText::new("Space - Jump").small());
            ui.label(egui::RichText::new("Left click - Place block").small());
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::model::VoxelWorld;

    #[test]
    fn test_fps_counter_averages_over_a_second() {
        let mut fps = FpsCounter::default();
        for _ in 0..59 {
            fps.tick(1.0 / 60.0);
        }
        assert_eq!(fps.fps, 0.0);
        fps.tick(1.0 / 60.0 + 0.001);
        assert!((fps.fps - 60.0).abs() < 0.5);
    }

    #[test]
    fn test_hud_lines() {
        let session = Session::with_world(SessionConfig::default(), VoxelWorld::new());
        let mut stats = HudStats::sample(&session, 58.6, false);
        let lines = stats.lines();
        assert_eq!(lines[0], "FPS: 59");
        assert_eq!(lines[1], "Pos: 0.0, 10.0, 0.0");
        assert_eq!(lines[2], "Cell: GridCoord(0, 10, 0)");
        assert!(lines.iter().any(|l| l == "Next block: dirt"));
        assert_eq!(lines.last().map(String::as_str), Some("Click to capture mouse"));

        stats.last_placement = Some(PlacementOutcome::Placed(GridCoord(1, 2, 3), BlockKind::Stone));
        stats.pointer_locked = true;
        let lines = stats.lines();
        assert!(lines.iter().any(|l| l == "Last click: placed stone at 1 2 3"));
        assert_eq!(lines.last().map(String::as_str), Some("Esc - release mouse"));
    }

    #[test]
    fn test_build_ui_runs_headless() {
        let ctx = Context::default();
        let session = Session::with_world(SessionConfig::default(), VoxelWorld::new());
        let stats = HudStats::sample(&session, 60.0, true);
        let output = ctx.run(egui::RawInput::default(), |ctx| build_ui(ctx, &stats));
        assert!(!output.shapes.is_empty());
    }
}
