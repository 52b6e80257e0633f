use eframe::egui;

use crate::model::player_state::{MAX_HEALTH, MAX_KARMA};
use crate::ui::app::GameApp;

const HEALTH_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 50, 50);
const KARMA_POSITIVE: egui::Color32 = egui::Color32::from_rgb(50, 220, 50);
const KARMA_NEGATIVE: egui::Color32 = egui::Color32::from_rgb(220, 50, 50);

pub fn draw_right_panel(ctx: &egui::Context, app: &mut GameApp) {
    egui::SidePanel::right("right")
        .resizable(true)
        .default_width(340.0)
        .min_width(260.0)
        .show(ctx, |ui| {
            draw_status_bars(ui, app);
            ui.separator();
            draw_scene(ui, app);
        });
}

fn draw_status_bars(ui: &mut egui::Ui, app: &GameApp) {
    let Some(snapshot) = &app.ui.snapshot else {
        ui.label("Health and karma will appear here.");
        return;
    };

    let health_frac = snapshot.health as f32 / MAX_HEALTH as f32;
    ui.add(
        egui::ProgressBar::new(health_frac)
            .fill(HEALTH_COLOR)
            .text(format!("Health: {}", snapshot.health)),
    );

    // Karma spans [-100, 100]; shown on a single bar with its color keyed
    // to the sign.
    let karma_frac = (snapshot.karma + MAX_KARMA) as f32 / (2 * MAX_KARMA) as f32;
    let karma_color = if snapshot.karma >= 0 {
        KARMA_POSITIVE
    } else {
        KARMA_NEGATIVE
    };
    ui.add(
        egui::ProgressBar::new(karma_frac)
            .fill(karma_color)
            .text(format!("Karma: {}", snapshot.karma)),
    );
}

fn draw_scene(ui: &mut egui::Ui, app: &GameApp) {
    ui.heading("CURRENT SCENE");
    ui.add_space(4.0);

    if let Some(texture) = &app.scene {
        ui.add(
            egui::Image::new(texture)
                .fit_to_exact_size(egui::vec2(ui.available_width(), 320.0)),
        );
    } else if app.ui.image_pending {
        ui.label("Generating scene image…");
    } else {
        ui.label(egui::RichText::new("Scene image will appear here").weak());
    }
}
