//! Presentation surfaces driven by the dialogue engine.

/// Receives what the dialogue engine wants on screen.
pub trait DialogueView {
    /// The visible text of the current page changed.
    fn show_text(&mut self, speaker: &str, text: &str);

    /// A page was fully revealed.
    fn text_complete(&mut self, _speaker: &str, _text: &str) {}

    /// Hide the text surface.
    fn hide(&mut self);

    /// Offer choices.
    fn show_choices(&mut self, choices: &[String]);

    /// Remove any offered choices.
    fn clear_choices(&mut self);
}

/// One call recorded by [`TranscriptView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// A completed page.
    Text {
        /// Speaker.
        speaker: String,
        /// Page text as displayed.
        text: String,
    },
    /// Choices offered.
    Choices(Vec<String>),
    /// Choices removed.
    ClearChoices,
    /// Text surface hidden.
    Hide,
}

/// Records completed pages and choice changes.
///
/// Partial reveals only update [`TranscriptView::current_text`].
#[derive(Debug, Clone, Default)]
pub struct TranscriptView {
    events: Vec<ViewEvent>,
    current: String,
    choices: Vec<String>,
}

impl TranscriptView {
    /// An empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Take the recorded events.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    /// Text currently on screen.
    pub fn current_text(&self) -> &str {
        &self.current
    }

    /// Choices currently on screen.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Completed page texts in order.
    pub fn lines(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DialogueView for TranscriptView {
    fn show_text(&mut self, _speaker: &str, text: &str) {
        self.current = text.to_string();
    }

    fn text_complete(&mut self, speaker: &str, text: &str) {
        self.current = text.to_string();
        self.events.push(ViewEvent::Text {
            speaker: speaker.to_string(),
            text: text.to_string(),
        });
    }

    fn hide(&mut self) {
        self.current.clear();
        self.events.push(ViewEvent::Hide);
    }

    fn show_choices(&mut self, choices: &[String]) {
        self.choices = choices.to_vec();
        self.events.push(ViewEvent::Choices(choices.to_vec()));
    }

    fn clear_choices(&mut self) {
        if !self.choices.is_empty() {
            self.choices.clear();
            self.events.push(ViewEvent::ClearChoices);
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl DialogueView for NullView {
    fn show_text(&mut self, _speaker: &str, _text: &str) {}
    fn hide(&mut self) {}
    fn show_choices(&mut self, _choices: &[String]) {}
    fn clear_choices(&mut self) {}
}
