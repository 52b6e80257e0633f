use std::fmt::Write as _;

use crate::engine::story::{ElementKind, NarrativeElement};
use crate::engine::turbulence::TurbulenceEvent;
use crate::model::game_state::GameState;

/// How many resolved turns are replayed to the narrator each request.
/// History itself is unbounded; only the context window is capped.
pub const RECENT_HISTORY_TURNS: usize = 8;

/// Fixed system instruction describing the game's rules.
pub const SYSTEM_INSTRUCTION: &str = "\
You are a skilled dungeon master for a text-based RPG about reincarnation. \
Your job is to create an engaging, dynamic story that responds to player \
choices while maintaining appropriate challenge and consequences.

THE RULES OF THIS WORLD:
1. Health runs from 0 to 100. At 0 the player dies and reincarnates into a \
new life with a fresh body and an empty inventory.
2. Karma runs from -100 to 100. Karma follows the player across \
reincarnations; cruel choices lower it, kind ones raise it.
3. Inventory items are simple comma-separated names (e.g. \"rusty sword, \
health potion, map\"). Never use brackets or quotes in item lists.
4. Actions have clear consequences for health and karma.
5. Keep the story moving forward; be concise but descriptive.
6. Everything is written in the second person.";

/// Builds every prompt sent to the LLM.
/// This struct is intentionally dumb: it only formats text.
/// No parsing, no networking, no engine logic.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Opening narration for a freshly drawn situation.
    pub fn opening(player_name: &str, situation: &str) -> String {
        format!(
            "The player, {player_name}, has just reincarnated into a new \
             life and wakes up with no memories in the following setting: \
             {situation}.\n\
             Give the player a brief intro based on the setting and a few \
             directions they might go with their new life. Be concise yet \
             descriptive and ensure there are some unique choices which \
             could lead to action. Everything should be written in the \
             second person. Return only a player-facing message and \
             nothing else."
        )
    }

    /// The main per-turn prompt, ending with the strict response contract.
    pub fn turn(
        state: &GameState,
        player_input: &str,
        element: Option<&NarrativeElement>,
        turbulence: Option<&TurbulenceEvent>,
    ) -> String {
        let mut prompt = String::new();

        push_state_section(&mut prompt, state);
        push_history_section(&mut prompt, state);
        push_element_section(&mut prompt, element);
        push_turbulence_section(&mut prompt, turbulence);
        push_player_action(&mut prompt, player_input);
        push_format_contract(&mut prompt);

        prompt
    }

    /// Ask for a short narrative element of the given kind.
    pub fn element(state: &GameState, kind: ElementKind) -> String {
        format!(
            "You are a narrative designer for a text-based RPG. Based on \
             the current context, generate a {label}.\n\n\
             Current context:\n\
             Last gamemaster message: {last_message}\n\
             Player's last action: {last_action}\n\
             Current inventory: {inventory}\n\
             Current location/situation: {situation}\n\n\
             {instructions}\n\n\
             Return only the narrative element, nothing else. Be concise \
             but compelling.",
            label = kind.label(),
            last_message = state.last_narrative().unwrap_or(""),
            last_action = state.last_input().unwrap_or(""),
            inventory = inventory_line(state),
            situation = state.situation.0,
            instructions = kind.instructions(),
        )
    }

    /// Ask for a strict YES/NO lethality verdict on a turbulence event.
    pub fn lethality(state: &GameState, chance: f64) -> String {
        format!(
            "You are a fate-determining AI for a text-based RPG. Based on \
             the following context, determine if this sudden event should \
             be lethal.\n\n\
             Current game state:\n\
             - Player's karma: {karma} (-100 to 100)\n\
             - Current turn: {turn}\n\
             - Player's health: {health}\n\
             - Current inventory: {inventory}\n\
             - Last action: {last_action}\n\n\
             Mathematical chance of lethality based on karma: {chance:.1}%\n\n\
             Consider the player's recent choices, the story context, \
             dramatic timing, and items that might help survival.\n\n\
             Should this event be lethal? Respond with only 'YES' or 'NO'.",
            karma = state.player.karma,
            turn = state.turn,
            health = state.player.health,
            inventory = inventory_line(state),
            last_action = state.last_input().unwrap_or(""),
            chance = chance * 100.0,
        )
    }

    /// Ask for a one-sentence description of the turbulence event.
    pub fn turbulence(state: &GameState, lethal: bool) -> String {
        let lethality_instruction = if lethal {
            "IMPORTANT: This event MUST result in the player's death this turn."
        } else {
            "This event should create significant danger but survival should \
             be possible."
        };

        format!(
            "You are a dungeon master creating a dynamic event in a \
             text-based RPG. Generate a context-appropriate conflict or \
             challenge based on the current situation.\n\n\
             Current context:\n\
             Last gamemaster message: {last_message}\n\
             Player's last action: {last_action}\n\
             Current inventory: {inventory}\n\
             Current health: {health}\n\
             Karma: {karma}\n\n\
             {lethality_instruction}\n\n\
             Generate a single sentence describing a sudden event that \
             creates conflict or danger. It should feel natural within the \
             current context, create immediate tension, and not reveal \
             whether it is lethal. Return only the event description.",
            last_message = state.last_narrative().unwrap_or(""),
            last_action = state.last_input().unwrap_or(""),
            inventory = inventory_line(state),
            health = state.player.health,
            karma = state.player.karma,
        )
    }
}

fn inventory_line(state: &GameState) -> String {
    if state.player.inventory.is_empty() {
        "empty".to_string()
    } else {
        state.player.inventory.join(", ")
    }
}

fn push_state_section(prompt: &mut String, state: &GameState) {
    let _ = writeln!(
        prompt,
        "The player is named {name}. They have {health}/100 health and the \
         following items in their inventory: {inventory}. Their karma is \
         {karma} (scale of -100 to 100), which shapes their luck and \
         changes with their choices. This is life number {lives}, turn \
         {turn}, in this setting: {situation}.",
        name = state.player.name,
        health = state.player.health,
        inventory = inventory_line(state),
        karma = state.player.karma,
        lives = state.lives(),
        turn = state.turn,
        situation = state.situation.0,
    );
    prompt.push('\n');

    if !state.turn_summary.is_empty() {
        let _ = writeln!(
            prompt,
            "Summary of the player's turns so far: {}",
            state.turn_summary
        );
        prompt.push('\n');
    }
}

fn push_history_section(prompt: &mut String, state: &GameState) {
    let recent = state.recent_turns(RECENT_HISTORY_TURNS);
    if recent.is_empty() {
        return;
    }

    prompt.push_str("RECENT HISTORY:\n");
    for record in recent {
        let _ = writeln!(prompt, "Player: {}", record.input);
        let _ = writeln!(prompt, "Gamemaster: {}", record.narrative);
    }
    prompt.push('\n');
}

fn push_element_section(prompt: &mut String, element: Option<&NarrativeElement>) {
    let Some(element) = element else {
        return;
    };

    let _ = writeln!(prompt, "NARRATIVE ELEMENT: {}", element.content);
    let _ = writeln!(prompt, "ELEMENT TYPE: {}", element.kind.label());
    prompt.push_str(
        "Your response MUST incorporate and directly address the narrative \
         element above.\n\n",
    );
}

fn push_turbulence_section(prompt: &mut String, turbulence: Option<&TurbulenceEvent>) {
    let Some(event) = turbulence else {
        return;
    };

    let _ = writeln!(prompt, "SUDDEN EVENT: {}", event.description);
    if event.lethal {
        prompt.push_str(
            "IMPORTANT: This event is lethal. You MUST end this turn with \
             the player's death (set health_change low enough to reach 0) \
             and describe their demise in a narratively satisfying way.\n\n",
        );
    } else {
        prompt.push_str(
            "IMPORTANT: A sudden event has occurred! Incorporate it into \
             your response with appropriate consequences and challenges.\n\n",
        );
    }
}

fn push_player_action(prompt: &mut String, player_input: &str) {
    let _ = writeln!(prompt, "PLAYER ACTION: {player_input}");
    prompt.push('\n');
}

fn push_format_contract(prompt: &mut String) {
    prompt.push_str(
        "YOU MUST RESPOND IN THIS EXACT FORMAT AND NOTHING ELSE:\n\
         START_LLM_GENERATED_CONTENT:\n\
         ***health_change: [signed number, e.g. -10 or +5, 0 if unchanged]\n\
         ***karma_change: [signed number between -15 and +15, 0 if unchanged]\n\
         ***items_gained: [comma-separated item names, or none]\n\
         ***items_lost: [comma-separated item names, or none]\n\
         ***event: [one-line triggered event, or leave empty]\n\
         ***gamemaster_message: [your response to the player's action]\n\
         ***image_prompt: [brief scene description]\n\
         ***turn_summary: [running summary including this turn]\n\
         END_LLM_GENERATED_CONTENT\n",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::delta::TurnDelta;
    use crate::model::situation::Situation;

    fn game_with_turns(n: usize) -> GameState {
        let mut game = GameState::new("Asha", Situation("a desert".into()));
        for i in 0..n {
            game.apply_turn(
                format!("act {i}"),
                format!("reply {i}"),
                TurnDelta::default(),
            );
        }
        game
    }

    #[test]
    fn turn_prompt_carries_state_and_contract() {
        let game = game_with_turns(1);
        let prompt = PromptBuilder::turn(&game, "open the door", None, None);

        assert!(prompt.contains("named Asha"));
        assert!(prompt.contains("100/100 health"));
        assert!(prompt.contains("a desert"));
        assert!(prompt.contains("PLAYER ACTION: open the door"));
        assert!(prompt.contains("START_LLM_GENERATED_CONTENT:"));
        assert!(prompt.contains("***health_change:"));
        assert!(prompt.contains("END_LLM_GENERATED_CONTENT"));
    }

    #[test]
    fn history_window_is_bounded() {
        let game = game_with_turns(RECENT_HISTORY_TURNS + 4);
        let prompt = PromptBuilder::turn(&game, "wait", None, None);

        assert!(!prompt.contains("Player: act 0"));
        assert!(!prompt.contains("Player: act 3"));
        assert!(prompt.contains("Player: act 4"));
        assert!(prompt.contains("Player: act 11"));
    }

    #[test]
    fn lethal_turbulence_demands_death() {
        let game = game_with_turns(2);
        let event = TurbulenceEvent {
            description: "The ground splits open.".into(),
            lethal: true,
        };
        let prompt = PromptBuilder::turn(&game, "run", None, Some(&event));

        assert!(prompt.contains("SUDDEN EVENT: The ground splits open."));
        assert!(prompt.contains("MUST end this turn with the player's death"));
    }

    #[test]
    fn element_prompt_names_the_kind() {
        let game = game_with_turns(1);
        let prompt = PromptBuilder::element(&game, ElementKind::Choice);
        assert!(prompt.contains("generate a CHOICE"));
        assert!(prompt.contains("You must decide:"));
    }

    #[test]
    fn opening_prompt_frames_the_situation() {
        let prompt = PromptBuilder::opening("Asha", "a desert");
        assert!(prompt.contains("Asha"));
        assert!(prompt.contains("a desert"));
        assert!(prompt.contains("second person"));
    }
}
