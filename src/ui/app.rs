use std::sync::mpsc;

use eframe::egui;

use crate::engine::engine::Engine;
use crate::engine::image_client::SceneImage;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::message::Message;
use crate::model::snapshot::GameSnapshot;
use crate::ui::settings::UiSettings;
use crate::ui::settings_io;

/// AwaitingInput → ProcessingTurn → (DisplayingResult) → AwaitingInput,
/// looping until the window closes. Input is disabled while processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NameEntry,
    AwaitingInput,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeftTab {
    #[default]
    Character,
    Options,
}

pub struct UiState {
    pub input_text: String,
    pub name_text: String,
    pub rendered_messages: Vec<Message>,
    pub snapshot: Option<GameSnapshot>,
    pub phase: Phase,
    pub should_auto_scroll: bool,
    /// True while a turn is outstanding and a scene image may still arrive.
    pub image_pending: bool,
    pub left_tab: LeftTab,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            input_text: String::new(),
            name_text: String::new(),
            rendered_messages: Vec::new(),
            snapshot: None,
            phase: Phase::NameEntry,
            should_auto_scroll: false,
            image_pending: false,
            left_tab: LeftTab::default(),
        }
    }
}

pub struct GameApp {
    pub ui: UiState,
    pub settings: UiSettings,
    pub scene: Option<egui::TextureHandle>,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl GameApp {
    pub fn new() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx);
            engine.run();
        });

        Self {
            ui: UiState::default(),
            settings: settings_io::load_settings(),
            scene: None,
            cmd_tx,
            resp_rx,
        }
    }

    pub fn send_command(&mut self, cmd: EngineCommand) {
        self.ui.phase = Phase::Processing;
        self.ui.image_pending = true;
        let _ = self.cmd_tx.send(cmd);
    }

    pub fn draw_message(&self, ui: &mut egui::Ui, msg: &Message) {
        let color = self.settings.color(msg.speaker_key());
        let text = match msg {
            Message::Player(t) => format!("You: {t}"),
            Message::Gamemaster(t) => format!("Gamemaster: {t}"),
            Message::System(t) => t.clone(),
        };

        ui.add_space(6.0);
        ui.label(egui::RichText::new(text).color(color));
    }

    fn install_scene(&mut self, ctx: &egui::Context, image: Option<SceneImage>) {
        self.ui.image_pending = false;
        self.scene = image.map(|img| {
            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [img.width, img.height],
                &img.rgba,
            );
            ctx.load_texture("scene", color_image, egui::TextureOptions::LINEAR)
        });
    }
}

impl eframe::App for GameApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        while let Ok(resp) = self.resp_rx.try_recv() {
            match resp {
                EngineResponse::History(msgs) => {
                    self.ui.rendered_messages = msgs;
                    self.ui.should_auto_scroll = true;
                }
                EngineResponse::Snapshot(snapshot) => {
                    self.ui.snapshot = Some(snapshot);
                }
                EngineResponse::Scene(image) => {
                    self.install_scene(ctx, image);
                }
                EngineResponse::TurnFinished => {
                    self.ui.image_pending = false;
                    self.ui.phase = if self.ui.snapshot.is_some() {
                        Phase::AwaitingInput
                    } else {
                        Phase::NameEntry
                    };
                }
            }
        }

        crate::ui::left_panel::draw_left_panel(ctx, self);
        crate::ui::right_panel::draw_right_panel(ctx, self);
        crate::ui::center_panel::draw_center_panel(ctx, self);

        self.ui.should_auto_scroll = false;

        // Keep polling the response channel while a turn is outstanding.
        if self.ui.phase == Phase::Processing {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
