use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

const IMAGE_GENERATIONS_URL: &str = "https://api.openai.com/v1/images/generations";
const IMAGE_MODEL: &str = "dall-e-3";

/// Scene illustrations are downscaled to fit the side panel.
const DISPLAY_SIZE: u32 = 320;

/// Keeps image prompts short and the art style consistent between turns.
const STYLE_GUIDANCE: &str =
    "Create a vivid, detailed illustration in a fantasy game art style. \
     Focus on dramatic lighting and rich colors.";
const MAX_PROMPT_LEN: usize = 800;

#[derive(Serialize)]
struct ImageGenerationRequest {
    model: String,
    prompt: String,
    n: u32,
    size: String,
}

/// Decoded RGBA pixels ready to hand to the UI thread.
#[derive(Debug, Clone)]
pub struct SceneImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// What the engine needs from a scene illustrator. The production
/// implementation is `ImageClient`.
pub trait Illustrator {
    fn generate(&self, description: &str) -> Result<SceneImage>;
}

/// Blocking client for the image-generation service. Every failure here is
/// non-fatal: the game continues without a picture.
pub struct ImageClient {
    http: Client,
    api_key: Option<String>,
    cache_dir: Option<PathBuf>,
}

impl ImageClient {
    pub fn new(api_key: Option<String>) -> Self {
        let cache_dir = dirs::cache_dir().map(|mut dir| {
            dir.push("samsara");
            dir.push("scenes");
            dir
        });

        Self {
            http: Client::new(),
            api_key,
            cache_dir,
        }
    }

    fn read_cache(&self, key: &str) -> Option<Vec<u8>> {
        let dir = self.cache_dir.as_ref()?;
        fs::read(dir.join(format!("{key}.png"))).ok()
    }

    fn write_cache(&self, key: &str, bytes: &[u8]) {
        let Some(dir) = &self.cache_dir else {
            return;
        };
        if fs::create_dir_all(dir).is_err() {
            return;
        }
        if let Err(e) = fs::write(dir.join(format!("{key}.png")), bytes) {
            log::debug!("could not cache scene image: {e}");
        }
    }
}

impl Illustrator for ImageClient {
    fn generate(&self, description: &str) -> Result<SceneImage> {
        let prompt = enhance_prompt(description);
        let key = prompt_key(&prompt);

        if let Some(bytes) = self.read_cache(&key) {
            log::debug!("scene image cache hit ({key})");
            if let Ok(img) = decode(&bytes) {
                return Ok(img);
            }
            // Corrupt cache entry, regenerate below.
        }

        let Some(api_key) = &self.api_key else {
            bail!("OPENAI_API_KEY is not set");
        };

        let req = ImageGenerationRequest {
            model: IMAGE_MODEL.into(),
            prompt,
            n: 1,
            size: "1024x1024".into(),
        };

        let resp: Value = self
            .http
            .post(IMAGE_GENERATIONS_URL)
            .bearer_auth(api_key)
            .json(&req)
            .send()
            .context("image service unreachable")?
            .error_for_status()
            .context("image service rejected the request")?
            .json()
            .context("image service returned an unreadable reply")?;

        let url = resp["data"][0]["url"]
            .as_str()
            .context("image service reply carried no image url")?;

        let bytes = self
            .http
            .get(url)
            .send()
            .context("failed to download generated image")?
            .error_for_status()
            .context("image download rejected")?
            .bytes()
            .context("failed to read image bytes")?
            .to_vec();

        self.write_cache(&key, &bytes);
        decode(&bytes)
    }
}

fn decode(bytes: &[u8]) -> Result<SceneImage> {
    let decoded = image::load_from_memory(bytes).context("could not decode scene image")?;
    let scaled = decoded.resize(
        DISPLAY_SIZE,
        DISPLAY_SIZE,
        image::imageops::FilterType::Triangle,
    );
    let rgba = scaled.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(SceneImage {
        width: width as usize,
        height: height as usize,
        rgba: rgba.into_raw(),
    })
}

fn enhance_prompt(description: &str) -> String {
    let mut prompt = description.trim().to_string();
    if prompt.len() > MAX_PROMPT_LEN {
        let mut cut = MAX_PROMPT_LEN;
        while !prompt.is_char_boundary(cut) {
            cut -= 1;
        }
        prompt.truncate(cut);
        prompt.push('…');
    }
    format!("{prompt}. {STYLE_GUIDANCE}")
}

// Cache filenames must survive toolchain upgrades, so the key is a fixed
// digest rather than the std hasher.
fn prompt_key(prompt: &str) -> String {
    format!("{:x}", md5::compute(prompt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhanced_prompt_carries_style_guidance() {
        let p = enhance_prompt("a misty harbor at dawn");
        assert!(p.starts_with("a misty harbor at dawn."));
        assert!(p.contains("fantasy game art style"));
    }

    #[test]
    fn overlong_prompts_are_truncated() {
        let long = "scene ".repeat(400);
        let p = enhance_prompt(&long);
        assert!(p.len() < long.len());
        assert!(p.contains('…'));
    }

    #[test]
    fn prompt_keys_are_stable_and_distinct() {
        // Fixed digest: existing cache files must stay addressable.
        assert_eq!(prompt_key("a"), "0cc175b9c0f1b6a831c399e269772661");
        assert_ne!(prompt_key("a"), prompt_key("b"));
    }
}
