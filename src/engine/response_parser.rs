use crate::model::delta::TurnDelta;

const BLOCK_START: &str = "START_LLM_GENERATED_CONTENT:";
const BLOCK_END: &str = "END_LLM_GENERATED_CONTENT";

const FALLBACK_NARRATIVE: &str =
    "The narrator pauses, lost in thought. Perhaps try that again.";

/// Everything extracted from one narrative reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTurn {
    pub narrative: String,
    pub delta: TurnDelta,
    pub image_prompt: Option<String>,
    pub turn_summary: Option<String>,
}

impl ParsedTurn {
    /// A reply that carried no usable structure: show it as-is, change nothing.
    fn prose_only(raw: &str) -> Self {
        let narrative = raw.trim();
        Self {
            narrative: if narrative.is_empty() {
                FALLBACK_NARRATIVE.to_string()
            } else {
                narrative.to_string()
            },
            delta: TurnDelta::default(),
            image_prompt: None,
            turn_summary: None,
        }
    }
}

/// Parse a narrative reply against the strict schema. The structured block
/// sits between the START/END markers as `***key: value` fields; a reply
/// without the block is treated as prose with a zero delta. Malformed
/// numeric fields parse to 0 rather than failing the turn.
pub fn parse_turn_response(raw: &str) -> ParsedTurn {
    let Some(start) = raw.find(BLOCK_START) else {
        return ParsedTurn::prose_only(raw);
    };
    let after_marker = &raw[start + BLOCK_START.len()..];
    let Some(end) = after_marker.find(BLOCK_END) else {
        return ParsedTurn::prose_only(raw);
    };
    let block = &after_marker[..end];

    let mut delta = TurnDelta::default();
    let mut narrative: Option<String> = None;
    let mut image_prompt = None;
    let mut turn_summary = None;

    for field in block.split("***").skip(1) {
        let Some((key, value)) = field.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim() {
            "health_change" => delta.health = parse_signed(value),
            "karma_change" => delta.karma = parse_signed(value),
            "items_gained" => delta.items_gained = parse_items(value),
            "items_lost" => delta.items_lost = parse_items(value),
            "event" => {
                if !value.is_empty() {
                    delta.event = Some(value.to_string());
                }
            }
            "gamemaster_message" => {
                if !value.is_empty() {
                    narrative = Some(value.to_string());
                }
            }
            "image_prompt" => {
                if !value.is_empty() {
                    image_prompt = Some(value.to_string());
                }
            }
            "turn_summary" => {
                if !value.is_empty() {
                    turn_summary = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    let narrative = narrative.unwrap_or_else(|| {
        // Keep any prose the model wrote outside the block.
        let preamble = raw[..start].trim();
        if preamble.is_empty() {
            FALLBACK_NARRATIVE.to_string()
        } else {
            preamble.to_string()
        }
    });

    ParsedTurn {
        narrative,
        delta,
        image_prompt,
        turn_summary,
    }
}

fn parse_signed(value: &str) -> i32 {
    value
        .trim()
        .trim_start_matches('+')
        .parse::<i32>()
        .unwrap_or(0)
}

fn parse_items(value: &str) -> Vec<String> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '\'' | '"' | '\\'))
        .collect();

    cleaned
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty() && !item.eq_ignore_ascii_case("none"))
        .map(str::to_string)
        .collect()
}
