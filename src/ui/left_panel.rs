use eframe::egui;

use crate::ui::app::{GameApp, LeftTab};
use crate::ui::settings_io;

pub fn draw_left_panel(ctx: &egui::Context, app: &mut GameApp) {
    egui::SidePanel::left("left")
        .resizable(false)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut app.ui.left_tab, LeftTab::Character, "Character");
                ui.selectable_value(&mut app.ui.left_tab, LeftTab::Options, "Options");
            });
            ui.separator();

            match app.ui.left_tab {
                LeftTab::Character => draw_character(ui, app),
                LeftTab::Options => draw_options(ui, app),
            }
        });
}

fn draw_character(ui: &mut egui::Ui, app: &GameApp) {
    let Some(snapshot) = &app.ui.snapshot else {
        ui.label("No life yet.");
        return;
    };

    ui.heading(&snapshot.name);
    ui.label(format!("Life {}", snapshot.lives));
    ui.label(format!("Turn {}", snapshot.turn));
    ui.separator();

    ui.heading("Inventory");
    if snapshot.inventory.is_empty() {
        ui.label("Empty");
    } else {
        egui::ScrollArea::vertical().show(ui, |ui| {
            for item in &snapshot.inventory {
                ui.label(format!("• {item}"));
            }
        });
    }
}

fn draw_options(ui: &mut egui::Ui, app: &mut GameApp) {
    let mut changed = false;

    ui.label("UI Scale");
    changed |= ui
        .add(egui::Slider::new(&mut app.settings.ui_scale, 0.75..=2.0))
        .changed();

    ui.separator();
    ui.label("Message colors");

    for key in ["Player", "Gamemaster", "System"] {
        let mut color = app.settings.color(key);
        ui.horizontal(|ui| {
            if ui.color_edit_button_srgba(&mut color).changed() {
                app.settings.set_color(key, color);
                changed = true;
            }
            ui.label(key);
        });
    }

    if changed {
        settings_io::save_settings(&app.settings);
    }
}
