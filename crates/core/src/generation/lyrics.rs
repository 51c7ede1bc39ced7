//! Prompt text and built-in lyrics.

/// Lyrics used when the provider cannot write any.
pub const FALLBACK_LYRICS: &str = "[Verse]
Light breaks over the silent hills
A drumbeat rising, the morning stills
Every step a spark in the dark
Every heartbeat leaves a mark

[Chorus]
Rise up, rise up, let the thunder roll
Voices together, a single soul
Hold the line and hear the call
We stand as one, we will not fall

[Bridge]
Echoes fading into the night
Carry the story into the light

[Outro]
Rise up, rise up, the song goes on";

/// Prompt for the key image the video starts from.
pub fn image_prompt(theme: &str) -> String {
    format!(
        "Cinematic key art for a music video about: {}. Dramatic lighting, rich color, high detail",
        theme.trim()
    )
}

/// Prompt for animating the key image.
pub fn video_prompt(theme: &str) -> String {
    format!(
        "{}. Slow cinematic camera movement, atmospheric motion",
        theme.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_trimmed_theme() {
        let theme = "  Epic battle scene with dramatic orchestra  ";
        assert!(image_prompt(theme).contains("about: Epic battle scene with dramatic orchestra."));
        assert!(video_prompt(theme).starts_with("Epic battle scene with dramatic orchestra."));
    }

    #[test]
    fn test_fallback_lyrics_is_structured() {
        assert!(FALLBACK_LYRICS.starts_with("[Verse]"));
        assert!(FALLBACK_LYRICS.contains("[Chorus]"));
    }
}
