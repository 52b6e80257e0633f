use std::env;
use std::sync::mpsc::{Receiver, Sender};

use crate::engine::image_client::{Illustrator, ImageClient};
use crate::engine::llm_client::{Narrator, NarrativeClient};
use crate::engine::prompt_builder::{PromptBuilder, SYSTEM_INSTRUCTION};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::response_parser::parse_turn_response;
use crate::engine::story::{ElementKind, NarrativeElement};
use crate::engine::turbulence::{self, TurbulenceEvent};
use crate::model::game_state::{GameState, TurnOutcome};
use crate::model::message::Message;
use crate::model::situation::{Situation, SituationPool};
use crate::model::snapshot::GameSnapshot;

const SITUATIONS_FILE: &str = "situations.txt";

/// Runs on its own thread and owns all game state. Commands arrive from the
/// UI over one channel, responses go back over another; turns are resolved
/// strictly one at a time. Generic over its clients so turn resolution can
/// be exercised without the network.
pub struct Engine<N = NarrativeClient, I = ImageClient> {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    narrative: N,
    images: I,
    situations: SituationPool,
    state: Option<GameState>,
    messages: Vec<Message>,
}

impl Engine {
    pub fn new(rx: Receiver<EngineCommand>, tx: Sender<EngineResponse>) -> Self {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let situations = match SituationPool::load(SITUATIONS_FILE) {
            Ok(pool) => {
                log::info!("loaded {} situations from {SITUATIONS_FILE}", pool.len());
                pool
            }
            Err(e) => {
                log::warn!("could not load {SITUATIONS_FILE} ({e:#}), using built-in seeds");
                SituationPool::builtin()
            }
        };

        Self {
            rx,
            tx,
            narrative: NarrativeClient::new(api_key.clone()),
            images: ImageClient::new(api_key),
            situations,
            state: None,
            messages: Vec::new(),
        }
    }
}

impl<N: Narrator, I: Illustrator> Engine<N, I> {
    #[cfg(test)]
    fn with_clients(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        narrative: N,
        images: I,
    ) -> Self {
        Self {
            rx,
            tx,
            narrative,
            images,
            situations: SituationPool::builtin(),
            state: None,
            messages: Vec::new(),
        }
    }

    pub fn run(&mut self) {
        if !self.narrative.has_credentials() {
            log::warn!("OPENAI_API_KEY is not set; the narrator will be unavailable");
            self.push_system(
                "OPENAI_API_KEY is not set. The narrator cannot speak until \
                 it is provided.",
            );
            self.send_history();
        }

        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::StartGame { player_name } => self.start_game(player_name),
                EngineCommand::SubmitAction(text) => self.resolve_turn(text),
            }
            let _ = self.tx.send(EngineResponse::TurnFinished);
        }
    }

    fn start_game(&mut self, player_name: String) {
        let situation = self.situations.draw(&mut rand::thread_rng());
        log::info!("new game for {player_name}: {}", situation.0);

        let state = GameState::new(player_name, situation.clone());

        self.push_system(format!("A new life begins: {}", situation.0));
        self.narrate_awakening(&state, &situation);

        self.state = Some(state);
        self.send_snapshot();
        self.send_history();
        self.send_scene(&situation.0);
    }

    fn resolve_turn(&mut self, input: String) {
        let Some(mut state) = self.state.take() else {
            self.push_system("Choose a name to begin your first life.");
            self.send_history();
            return;
        };

        self.push_message(Message::Player(input.clone()));
        self.send_history();

        let element = self.generate_element(&state);
        let turbulence = self.generate_turbulence(&state);
        if turbulence.is_some() {
            self.push_system("An unexpected event interrupts the turn…");
            self.send_history();
        }

        let prompt = PromptBuilder::turn(&state, &input, element.as_ref(), turbulence.as_ref());

        let raw = match self.narrative.generate(SYSTEM_INSTRUCTION, &prompt) {
            Ok(raw) => raw,
            Err(e) => {
                // Recoverable: the turn was not consumed, the player may
                // submit the same action again.
                log::warn!("narrative call failed: {e:#}");
                self.push_system(format!(
                    "The narrator is unreachable ({e:#}). Nothing happened; \
                     try your action again."
                ));
                self.send_history();
                self.state = Some(state);
                return;
            }
        };

        let parsed = parse_turn_response(&raw);
        self.push_message(Message::Gamemaster(parsed.narrative.clone()));
        if let Some(event) = &parsed.delta.event {
            self.push_system(format!("Event: {event}"));
        }

        let outcome = state.apply_turn(input, parsed.narrative, parsed.delta);
        if let Some(summary) = parsed.turn_summary {
            state.turn_summary = summary;
        }

        let scene_description = match outcome {
            TurnOutcome::Alive => parsed.image_prompt,
            TurnOutcome::Died => {
                self.push_system(format!(
                    "You have died. Your karma of {} follows you into the \
                     next life…",
                    state.player.karma
                ));

                let next = self.situations.draw(&mut rand::thread_rng());
                state.reincarnate(next.clone());
                self.push_system(format!("A new life begins: {}", next.0));
                self.narrate_awakening(&state, &next);
                Some(next.0)
            }
        };

        self.state = Some(state);
        self.send_snapshot();
        self.send_history();

        if let Some(description) = scene_description {
            self.send_scene(&description);
        }
    }

    /// Opening narration for a fresh life. If the narrator is unavailable
    /// the raw situation seed is shown instead; the game never stalls here.
    fn narrate_awakening(&mut self, state: &GameState, situation: &Situation) {
        let prompt = PromptBuilder::opening(&state.player.name, &situation.0);
        let text = match self.narrative.generate(SYSTEM_INSTRUCTION, &prompt) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                log::warn!("opening narration failed: {e:#}");
                self.push_system(format!("The narrator is silent ({e:#})."));
                format!("You wake with no memories, somewhere in {}.", situation.0)
            }
        };

        self.push_message(Message::Gamemaster(text));
    }

    fn generate_element(&mut self, state: &GameState) -> Option<NarrativeElement> {
        let kind = ElementKind::pick(&mut rand::thread_rng());
        let prompt = PromptBuilder::element(state, kind);

        match self.narrative.generate_single(&prompt) {
            Ok(content) => Some(NarrativeElement {
                kind,
                content: content.trim().to_string(),
            }),
            Err(e) => {
                // The element only enriches the turn; proceed without it.
                log::warn!("story element generation failed: {e:#}");
                None
            }
        }
    }

    fn generate_turbulence(&mut self, state: &GameState) -> Option<TurbulenceEvent> {
        if !turbulence::should_trigger(state.turn, &mut rand::thread_rng()) {
            return None;
        }

        let chance = turbulence::lethal_chance(state.player.karma);
        let lethal = match self
            .narrative
            .generate_single(&PromptBuilder::lethality(state, chance))
        {
            Ok(verdict) => verdict.trim().eq_ignore_ascii_case("yes"),
            Err(e) => {
                log::warn!("lethality verdict failed: {e:#}");
                false
            }
        };

        match self
            .narrative
            .generate_single(&PromptBuilder::turbulence(state, lethal))
        {
            Ok(description) => Some(TurbulenceEvent {
                description: description.trim().to_string(),
                lethal,
            }),
            Err(e) => {
                log::warn!("turbulence generation failed: {e:#}");
                None
            }
        }
    }

    /// Image failures never block the turn: the narrative has already been
    /// sent by the time this runs.
    fn send_scene(&mut self, description: &str) {
        match self.images.generate(description) {
            Ok(image) => {
                let _ = self.tx.send(EngineResponse::Scene(Some(image)));
            }
            Err(e) => {
                log::warn!("scene image failed: {e:#}");
                let _ = self.tx.send(EngineResponse::Scene(None));
            }
        }
    }

    fn push_message(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    fn push_system(&mut self, text: impl Into<String>) {
        self.messages.push(Message::System(text.into()));
    }

    fn send_history(&self) {
        let _ = self
            .tx
            .send(EngineResponse::History(self.messages.clone()));
    }

    fn send_snapshot(&self) {
        if let Some(state) = &self.state {
            let _ = self
                .tx
                .send(EngineResponse::Snapshot(GameSnapshot::from(state)));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use anyhow::{bail, Result};

    use super::*;
    use crate::engine::image_client::SceneImage;

    /// Replays the same reply for every request.
    struct ScriptedNarrator(&'static str);

    impl Narrator for ScriptedNarrator {
        fn generate(&self, _system: &str, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn generate_single(&self, _prompt: &str) -> Result<String> {
            Ok("a stranger watches from the treeline".into())
        }

        fn has_credentials(&self) -> bool {
            true
        }
    }

    struct BrokenIllustrator;

    impl Illustrator for BrokenIllustrator {
        fn generate(&self, _description: &str) -> Result<SceneImage> {
            bail!("image service unreachable")
        }
    }

    const TURN_REPLY: &str = "\
START_LLM_GENERATED_CONTENT:
***health_change: -10
***gamemaster_message: The cliff path crumbles under your boots.
***image_prompt: a crumbling cliff path above a grey sea
END_LLM_GENERATED_CONTENT";

    #[test]
    fn image_failure_never_withholds_the_narrative() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let mut engine = Engine::with_clients(
            cmd_rx,
            resp_tx,
            ScriptedNarrator(TURN_REPLY),
            BrokenIllustrator,
        );

        cmd_tx
            .send(EngineCommand::StartGame {
                player_name: "Asha".into(),
            })
            .unwrap();
        cmd_tx
            .send(EngineCommand::SubmitAction("follow the cliff path".into()))
            .unwrap();
        drop(cmd_tx);
        engine.run();

        let responses: Vec<EngineResponse> = resp_rx.try_iter().collect();

        // The turn's narrative reached the UI and its delta was applied.
        let narrative_at = responses
            .iter()
            .rposition(|r| {
                matches!(r, EngineResponse::History(msgs)
                    if msgs.iter().any(|m| m.text().contains("cliff path crumbles")))
            })
            .unwrap();
        assert!(responses
            .iter()
            .any(|r| matches!(r, EngineResponse::Snapshot(s) if s.health == 90)));

        // The failed illustration arrives after it, as an explicit no-image.
        let scene_at = responses
            .iter()
            .rposition(|r| matches!(r, EngineResponse::Scene(None)))
            .unwrap();
        assert!(narrative_at < scene_at);
        assert!(!responses
            .iter()
            .any(|r| matches!(r, EngineResponse::Scene(Some(_)))));

        // Both commands completed, so the UI re-enables input.
        let finished = responses
            .iter()
            .filter(|r| matches!(r, EngineResponse::TurnFinished))
            .count();
        assert_eq!(finished, 2);
    }
}
