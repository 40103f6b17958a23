//! Bilingual lyrics overlay. A pure view over the current track's lyric fields.

pub const NO_ENGLISH: &str = "No English lyrics available";
pub const NO_PORTUGUESE: &str = "Nenhuma letra em português disponível";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsPanel<'a> {
    /// Only the toggle affordance is shown.
    Collapsed,
    Expanded {
        english: &'a str,
        portuguese: &'a str,
    },
}

impl LyricsPanel<'_> {
    pub fn is_expanded(&self) -> bool {
        matches!(self, LyricsPanel::Expanded { .. })
    }
}

/// Resolve what the overlay shows. Blank text counts as absent.
pub fn lyrics_panel<'a>(
    lyrics_en: Option<&'a str>,
    lyrics_pt: Option<&'a str>,
    visible: bool,
) -> LyricsPanel<'a> {
    if !visible {
        return LyricsPanel::Collapsed;
    }
    LyricsPanel::Expanded {
        english: present(lyrics_en).unwrap_or(NO_ENGLISH),
        portuguese: present(lyrics_pt).unwrap_or(NO_PORTUGUESE),
    }
}

fn present(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_overlay_is_collapsed() {
        let panel = lyrics_panel(Some("la la"), Some("lá lá"), false);
        assert_eq!(panel, LyricsPanel::Collapsed);
        assert!(!panel.is_expanded());
    }

    #[test]
    fn missing_portuguese_uses_placeholder() {
        let panel = lyrics_panel(Some("Walking down the road"), None, true);
        assert_eq!(
            panel,
            LyricsPanel::Expanded {
                english: "Walking down the road",
                portuguese: NO_PORTUGUESE,
            }
        );
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let panel = lyrics_panel(Some("  \n "), Some(""), true);
        assert_eq!(
            panel,
            LyricsPanel::Expanded {
                english: NO_ENGLISH,
                portuguese: NO_PORTUGUESE,
            }
        );
    }
}
