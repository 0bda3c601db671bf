use handcloud::{FrameState, GestureSignal, Phase};

/// Everything the HUD shows for one frame.
pub struct HudInfo {
    pub frame: FrameState,
    pub target_scale: f32,
    pub signal: Option<GestureSignal>,
    pub points: usize,
    pub render_frames: u64,
    pub video_frame: Option<u64>,
}

/// Draws the status overlay in the top-left corner.
pub fn draw_hud(ctx: &egui::Context, hud: &HudInfo) {
    egui::Window::new("Hand")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            let (label, color) = match hud.frame.phase {
                Phase::Tracking => ("TRACKING", egui::Color32::from_rgb(45, 247, 255)),
                Phase::Idle => ("NO HAND", egui::Color32::from_rgb(255, 170, 60)),
            };
            ui.colored_label(color, label);
            ui.separator();

            egui::Grid::new("hud_grid").num_columns(2).show(ui, |ui| {
                ui.label("scale");
                ui.label(format!(
                    "{:.3} -> {:.3}",
                    hud.frame.transform.scale, hud.target_scale
                ));
                ui.end_row();

                ui.label("rotation");
                ui.label(format!("{:.1}°", hud.frame.transform.rotation_y.to_degrees()));
                ui.end_row();

                match hud.signal {
                    Some(signal) => {
                        ui.label("pinch");
                        ui.label(format!("{:.3}", signal.pinch_distance));
                        ui.end_row();
                        ui.label("height");
                        ui.label(format!("{:.3}", signal.hand_height));
                        ui.end_row();
                    }
                    None => {
                        ui.label("pinch");
                        ui.label("-");
                        ui.end_row();
                    }
                }

                ui.label("points");
                ui.label(hud.points.to_string());
                ui.end_row();

                ui.label("frames");
                ui.label(match hud.video_frame {
                    Some(video) => format!("{} render / {} video", hud.render_frames, video),
                    None => format!("{} render / no video", hud.render_frames),
                });
                ui.end_row();
            });

            ui.separator();
            ui.small("cursor: wrist · wheel: finger gap · space: pinch · L: low confidence");
        });
}
