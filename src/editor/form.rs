//! Field focus and text entry for the editor form.

use super::draft::Draft;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    Title,
    Artist,
    Album,
    /// Path of the audio file to attach; committed with Enter.
    AudioPath,
    Cover,
    LyricsEn,
    LyricsPt,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Title,
        Field::Artist,
        Field::Album,
        Field::AudioPath,
        Field::Cover,
        Field::LyricsEn,
        Field::LyricsPt,
    ];

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Artist => "Artist",
            Field::Album => "Album",
            Field::AudioPath => "Audio file",
            Field::Cover => "Cover",
            Field::LyricsEn => "Lyrics (EN)",
            Field::LyricsPt => "Lyrics (PT)",
        }
    }

    /// Lyric fields accept newlines.
    pub fn is_multiline(self) -> bool {
        matches!(self, Field::LyricsEn | Field::LyricsPt)
    }
}

impl Draft {
    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Current text of `field` as typed into the form.
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.fields.title,
            Field::Artist => &self.fields.artist,
            Field::Album => &self.fields.album,
            Field::AudioPath => &self.audio_input,
            Field::Cover => self.fields.cover.as_deref().unwrap_or(""),
            Field::LyricsEn => self.fields.lyrics_en.as_deref().unwrap_or(""),
            Field::LyricsPt => self.fields.lyrics_pt.as_deref().unwrap_or(""),
        }
    }

    fn text_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.fields.title,
            Field::Artist => &mut self.fields.artist,
            Field::Album => &mut self.fields.album,
            Field::AudioPath => &mut self.audio_input,
            Field::Cover => self.fields.cover.get_or_insert_with(String::new),
            Field::LyricsEn => self.fields.lyrics_en.get_or_insert_with(String::new),
            Field::LyricsPt => self.fields.lyrics_pt.get_or_insert_with(String::new),
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' && !self.focus.is_multiline() {
            return;
        }
        let field = self.focus;
        self.text_mut(field).push(c);
    }

    /// Insert a line break; ignored outside the lyric fields.
    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        let field = self.focus;
        self.text_mut(field).pop();
    }
}
