//! Incremental text reveal with paging.
//!
//! The typewriter is resumable step state: callers drive it with
//! [`Typewriter::tick`] once per frame. Long lines are split into pages
//! with [`paginate`]; finishing a non-final page waits for
//! [`Typewriter::next_page`] before continuing.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::chaos::CharTransform;
use crate::paging::{PageBudget, paginate};

/// How corrupted characters behave once revealed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptionMode {
    /// Every revealed character is re-transformed on every tick.
    #[default]
    Flicker,
    /// Each character is transformed once, when it is revealed.
    Frozen,
}

/// Typewriter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    /// Reveal speed. Zero or less reveals each page instantly.
    pub chars_per_second: f32,
    /// Page size.
    pub page_budget: PageBudget,
    /// Keep this many completed lines as a rolling log.
    pub history_lines: Option<usize>,
    /// Corruption behavior.
    pub corruption: CorruptionMode,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            chars_per_second: 40.0,
            page_budget: PageBudget::default(),
            history_lines: None,
            corruption: CorruptionMode::Flicker,
        }
    }
}

impl TypewriterConfig {
    /// Set the reveal speed.
    pub fn with_speed(mut self, chars_per_second: f32) -> Self {
        self.chars_per_second = chars_per_second;
        self
    }

    /// Set the page budget.
    pub fn with_page_budget(mut self, budget: PageBudget) -> Self {
        self.page_budget = budget;
        self
    }

    /// Keep a rolling log of the last `lines` lines.
    pub fn with_history(mut self, lines: usize) -> Self {
        self.history_lines = Some(lines);
        self
    }

    /// Set the corruption behavior.
    pub fn with_corruption(mut self, mode: CorruptionMode) -> Self {
        self.corruption = mode;
        self
    }
}

/// Something the owner must react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterEvent {
    /// A non-final page finished; waiting for [`Typewriter::next_page`].
    PageComplete {
        /// Index of the finished page.
        page: usize,
        /// Pages still to show.
        remaining: usize,
    },
    /// The final page finished.
    LineComplete,
}

/// Reveals one line at a time, a character per step.
#[derive(Debug, Clone, Default)]
pub struct Typewriter {
    config: TypewriterConfig,
    speaker: String,
    text: String,
    pages: Vec<String>,
    page: usize,
    page_chars: Vec<char>,
    revealed: usize,
    char_timer: f32,
    typing: bool,
    awaiting_page: bool,
    frozen: String,
    display: String,
    history: VecDeque<String>,
}

impl Typewriter {
    /// Create an idle typewriter.
    pub fn new(config: TypewriterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current settings.
    pub fn config(&self) -> &TypewriterConfig {
        &self.config
    }

    /// Start revealing a line.
    ///
    /// Returns an event right away when the first page is empty.
    pub fn show_line(&mut self, speaker: &str, text: &str) -> Option<TypewriterEvent> {
        self.speaker = speaker.to_string();
        self.text = text.to_string();
        self.pages = paginate(text, self.config.page_budget.max_chars());
        self.page = 0;
        self.start_page()
    }

    /// Advance the reveal by `dt` seconds.
    pub fn tick(&mut self, dt: f32, transform: &mut dyn CharTransform) -> Option<TypewriterEvent> {
        if !self.typing {
            return None;
        }
        let total = self.page_chars.len();
        if self.config.chars_per_second <= 0.0 {
            self.reveal_to(total, transform);
        } else {
            self.char_timer += dt.max(0.0);
            let delay = 1.0 / self.config.chars_per_second;
            let mut target = self.revealed;
            while self.char_timer >= delay && target < total {
                self.char_timer -= delay;
                target += 1;
            }
            self.reveal_to(target, transform);
        }
        self.refresh_display(transform);
        if self.revealed >= total {
            return Some(self.complete_page());
        }
        None
    }

    /// Finish the current page immediately. Safe to call when idle.
    pub fn skip(&mut self, transform: &mut dyn CharTransform) -> Option<TypewriterEvent> {
        if !self.typing {
            return None;
        }
        self.reveal_to(self.page_chars.len(), transform);
        self.refresh_display(transform);
        Some(self.complete_page())
    }

    /// Move past a completed non-final page.
    ///
    /// Returns `None` if no page is waiting; otherwise whatever starting
    /// the next page produced.
    pub fn next_page(&mut self) -> Option<Option<TypewriterEvent>> {
        if !self.awaiting_page {
            return None;
        }
        self.page += 1;
        Some(self.start_page())
    }

    /// Cancel any reveal without firing completion. Safe to call when idle.
    pub fn stop(&mut self) {
        self.typing = false;
        self.awaiting_page = false;
        self.char_timer = 0.0;
    }

    /// Drop the line and blank the display.
    pub fn clear(&mut self) {
        self.stop();
        self.pages.clear();
        self.page_chars.clear();
        self.revealed = 0;
        self.frozen.clear();
        self.display.clear();
    }

    /// Whether a page is being revealed.
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Whether a finished page is waiting for [`Typewriter::next_page`].
    pub fn is_awaiting_page(&self) -> bool {
        self.awaiting_page
    }

    /// The currently revealed text of the current page.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The speaker of the current line.
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    /// Index of the current page.
    pub fn page_index(&self) -> usize {
        self.page
    }

    /// Number of pages in the current line.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Completed lines kept in the rolling log, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// The rolling log plus the line in progress, one line each.
    ///
    /// Without a configured history this is just the display.
    pub fn transcript(&self) -> String {
        if self.config.history_lines.is_none() {
            return self.display.clone();
        }
        let mut lines: Vec<&str> = self.history().collect();
        if self.typing || self.awaiting_page {
            lines.push(&self.display);
        }
        lines.join("\n")
    }

    /// Forget the rolling log.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn start_page(&mut self) -> Option<TypewriterEvent> {
        let page = self.pages.get(self.page).cloned().unwrap_or_default();
        self.page_chars = page.chars().collect();
        self.revealed = 0;
        self.char_timer = 0.0;
        self.frozen.clear();
        self.display.clear();
        self.awaiting_page = false;
        self.typing = true;
        if self.page_chars.is_empty() {
            return Some(self.complete_page());
        }
        None
    }

    fn reveal_to(&mut self, target: usize, transform: &mut dyn CharTransform) {
        let target = target.min(self.page_chars.len());
        if self.config.corruption == CorruptionMode::Frozen {
            for &c in &self.page_chars[self.revealed..target] {
                self.frozen.push(transform.apply(c));
            }
        }
        self.revealed = target;
    }

    fn refresh_display(&mut self, transform: &mut dyn CharTransform) {
        self.display = match self.config.corruption {
            CorruptionMode::Frozen => self.frozen.clone(),
            CorruptionMode::Flicker => self.page_chars[..self.revealed]
                .iter()
                .map(|&c| transform.apply(c))
                .collect(),
        };
    }

    fn complete_page(&mut self) -> TypewriterEvent {
        self.typing = false;
        self.char_timer = 0.0;
        let remaining = self.pages.len().saturating_sub(self.page + 1);
        if remaining > 0 {
            self.awaiting_page = true;
            return TypewriterEvent::PageComplete {
                page: self.page,
                remaining,
            };
        }
        self.record_history();
        TypewriterEvent::LineComplete
    }

    fn record_history(&mut self) {
        let Some(limit) = self.config.history_lines else {
            return;
        };
        if limit == 0 {
            return;
        }
        let line = if self.speaker.is_empty() {
            self.text.clone()
        } else {
            format!("{}: {}", self.speaker, self.text)
        };
        self.history.push_back(line);
        while self.history.len() > limit {
            self.history.pop_front();
        }
    }
}
