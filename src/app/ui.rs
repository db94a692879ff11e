//! Screen state outside the playfield: overlays, text readouts and the
//! game-over shake.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Start,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Score,
    HighScore,
    FinalScore,
}

/// Where the session pushes UI changes. The session never draws; it only
/// toggles overlays and sets text.
pub trait UiSink {
    fn set_overlay(&mut self, overlay: Overlay, visible: bool);

    fn is_overlay_visible(&self, overlay: Overlay) -> bool;

    fn set_text(&mut self, field: TextField, text: String);

    fn set_shaking(&mut self, shaking: bool);
}

/// Plain-data sink read back by the terminal renderer
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub start_overlay: bool,
    pub game_over_overlay: bool,
    pub score: String,
    pub high_score: String,
    pub final_score: String,
    pub shaking: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            start_overlay: true,
            game_over_overlay: false,
            score: "0".to_string(),
            high_score: "0".to_string(),
            final_score: "0".to_string(),
            shaking: false,
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Score => &self.score,
            TextField::HighScore => &self.high_score,
            TextField::FinalScore => &self.final_score,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiSink for UiState {
    fn set_overlay(&mut self, overlay: Overlay, visible: bool) {
        match overlay {
            Overlay::Start => self.start_overlay = visible,
            Overlay::GameOver => self.game_over_overlay = visible,
        }
    }

    fn is_overlay_visible(&self, overlay: Overlay) -> bool {
        match overlay {
            Overlay::Start => self.start_overlay,
            Overlay::GameOver => self.game_over_overlay,
        }
    }

    fn set_text(&mut self, field: TextField, text: String) {
        match field {
            TextField::Score => self.score = text,
            TextField::HighScore => self.high_score = text,
            TextField::FinalScore => self.final_score = text,
        }
    }

    fn set_shaking(&mut self, shaking: bool) {
        self.shaking = shaking;
    }
}
