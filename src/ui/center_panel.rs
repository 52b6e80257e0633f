use eframe::egui;

use crate::engine::protocol::EngineCommand;
use crate::ui::app::{GameApp, Phase};

pub fn draw_center_panel(ctx: &egui::Context, app: &mut GameApp) {
    let input_id = egui::Id::new("turn_input_box");

    // ---------- Input bar ----------
    egui::TopBottomPanel::bottom("turn_input").show(ctx, |ui| {
        ui.add_space(4.0);

        match app.ui.phase {
            Phase::NameEntry => {
                ui.label("Enter your character name:");
                let mut begin = false;

                ui.horizontal(|ui| {
                    let response = ui.add_sized(
                        [ui.available_width() - 70.0, 24.0],
                        egui::TextEdit::singleline(&mut app.ui.name_text)
                            .id(input_id)
                            .hint_text("Name…"),
                    );

                    if response.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter))
                    {
                        begin = true;
                    }
                    if ui.button("Begin").clicked() {
                        begin = true;
                    }
                });

                if begin {
                    let name = app.ui.name_text.trim().to_string();
                    if !name.is_empty() {
                        app.send_command(EngineCommand::StartGame { player_name: name });
                    }
                }
            }

            Phase::AwaitingInput | Phase::Processing => {
                let processing = app.ui.phase == Phase::Processing;
                if processing {
                    ui.label("The narrator is thinking…");
                } else {
                    ui.label("What do you want to do?");
                }

                let mut send_now = false;

                ui.horizontal(|ui| {
                    let response = ui.add_enabled(
                        !processing,
                        egui::TextEdit::singleline(&mut app.ui.input_text)
                            .id(input_id)
                            .hint_text("Say or do something…")
                            .desired_width(ui.available_width() - 70.0),
                    );

                    if response.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter))
                    {
                        send_now = true;
                    }
                    if ui.add_enabled(!processing, egui::Button::new("Send")).clicked() {
                        send_now = true;
                    }
                });

                if send_now && !processing {
                    let text = app.ui.input_text.trim().to_string();
                    if !text.is_empty() {
                        app.send_command(EngineCommand::SubmitAction(text));
                        app.ui.input_text.clear();
                    }
                    ui.memory_mut(|m| m.request_focus(input_id));
                }
            }
        }

        ui.add_space(4.0);
    });

    // ---------- Narrative history ----------
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .stick_to_bottom(app.ui.should_auto_scroll)
            .show(ui, |ui| {
                if app.ui.rendered_messages.is_empty() {
                    ui.label("Welcome to Samsara. Your story will appear here.");
                }
                for msg in &app.ui.rendered_messages {
                    app.draw_message(ui, msg);
                }
            });
    });
}
