//! Splitting long lines into pages that fit the text box.

use serde::{Deserialize, Serialize};

/// How many characters fit on one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageBudget {
    /// Share of the text box that is actually usable, in `0.0..=1.0`.
    pub visible_fraction: f32,
    /// Estimated characters per rendered line.
    pub chars_per_line: usize,
    /// Lines per text box.
    pub lines: usize,
    /// Upper bound regardless of the estimate.
    pub hard_cap: Option<usize>,
}

impl Default for PageBudget {
    fn default() -> Self {
        Self {
            visible_fraction: 0.85,
            chars_per_line: 48,
            lines: 4,
            hard_cap: None,
        }
    }
}

impl PageBudget {
    /// Set the usable share of the box.
    pub fn with_visible_fraction(mut self, fraction: f32) -> Self {
        self.visible_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Set the box geometry.
    pub fn with_box(mut self, chars_per_line: usize, lines: usize) -> Self {
        self.chars_per_line = chars_per_line;
        self.lines = lines;
        self
    }

    /// Cap the budget.
    pub fn with_hard_cap(mut self, cap: usize) -> Self {
        self.hard_cap = Some(cap);
        self
    }

    /// Characters per page. Never zero.
    pub fn max_chars(&self) -> usize {
        let area = self.chars_per_line.saturating_mul(self.lines) as f32;
        let estimate = (area * self.visible_fraction.clamp(0.0, 1.0)).floor() as usize;
        let capped = match self.hard_cap {
            Some(cap) => estimate.min(cap),
            None => estimate,
        };
        capped.max(1)
    }
}

/// Split `text` into pages of at most `max_chars` characters.
///
/// Paragraphs (`\n`) are kept together when they fit; otherwise pages break
/// between words. A word longer than a page is split mid-word. Text that
/// already fits comes back as a single unchanged page.
pub fn paginate(text: &str, max_chars: usize) -> Vec<String> {
    let max = max_chars.max(1);
    if text.chars().count() <= max {
        return vec![text.to_string()];
    }
    let mut pager = Pager::new(max);
    for paragraph in text.split('\n') {
        pager.push_paragraph(paragraph.trim_end_matches('\r'));
    }
    pager.finish()
}

struct Pager {
    max: usize,
    pages: Vec<String>,
    current: String,
    current_len: usize,
}

impl Pager {
    fn new(max: usize) -> Self {
        Self {
            max,
            pages: Vec::new(),
            current: String::new(),
            current_len: 0,
        }
    }

    fn push_paragraph(&mut self, paragraph: &str) {
        let len = paragraph.chars().count();
        if self.current_len > 0 {
            if self.current_len + 1 + len <= self.max {
                self.current.push('\n');
                self.current.push_str(paragraph);
                self.current_len += 1 + len;
                return;
            }
            self.flush();
        }
        if len <= self.max {
            self.current.push_str(paragraph);
            self.current_len = len;
        } else {
            for word in paragraph.split_whitespace() {
                self.push_word(word);
            }
        }
    }

    fn push_word(&mut self, word: &str) {
        let len = word.chars().count();
        if len > self.max {
            self.flush();
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(self.max) {
                self.flush();
                self.current = chunk.iter().collect();
                self.current_len = chunk.len();
            }
            return;
        }
        if self.current_len == 0 {
            self.current.push_str(word);
            self.current_len = len;
        } else if self.current_len + 1 + len <= self.max {
            self.current.push(' ');
            self.current.push_str(word);
            self.current_len += 1 + len;
        } else {
            self.flush();
            self.current.push_str(word);
            self.current_len = len;
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        self.current_len = 0;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        if self.pages.is_empty() {
            self.pages.push(String::new());
        }
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn budget_from_box_geometry() {
        let budget = PageBudget::default().with_box(40, 3).with_visible_fraction(0.5);
        assert_eq!(budget.max_chars(), 60);
        assert_eq!(budget.with_hard_cap(25).max_chars(), 25);
        assert_eq!(PageBudget::default().with_box(0, 0).max_chars(), 1);
    }

    #[test]
    fn oversized_box_saturates() {
        let budget = PageBudget::default().with_box(usize::MAX, 2);
        assert!(budget.max_chars() > 1);
        assert_eq!(budget.with_hard_cap(300).max_chars(), 300);
    }

    #[test]
    fn short_text_is_one_page() {
        assert_eq!(paginate("Hello there.", 50), vec!["Hello there."]);
        assert_eq!(paginate("", 50), vec![""]);
    }

    #[test]
    fn breaks_between_words() {
        let pages = paginate("the quick brown fox jumps over the lazy dog", 15);
        assert_eq!(pages, vec!["the quick brown", "fox jumps over", "the lazy dog"]);
    }

    #[test]
    fn paragraphs_break_first() {
        let pages = paginate("First line.\nSecond one here.", 20);
        assert_eq!(pages, vec!["First line.", "Second one here."]);
    }

    #[test]
    fn small_paragraphs_share_a_page() {
        let pages = paginate("a b\nc d\nthis paragraph is long", 12);
        assert_eq!(pages[0], "a b\nc d");
    }

    #[test]
    fn long_words_are_hard_split() {
        let pages = paginate("aaaaaaaaaa b", 4);
        assert_eq!(pages, vec!["aaaa", "aaaa", "aa b"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "äöü äöü äöü";
        assert_eq!(paginate(text, 11), vec![text]);
        assert_eq!(paginate(text, 7).len(), 2);
    }

    fn text_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(("[a-z]{1,10}", prop::bool::weighted(0.15)), 1..60).prop_map(
            |words| {
                let mut text = String::new();
                for (i, (word, newline)) in words.into_iter().enumerate() {
                    if i > 0 {
                        text.push(if newline { '\n' } else { ' ' });
                    }
                    text.push_str(&word);
                }
                text
            },
        )
    }

    proptest! {
        #[test]
        fn pages_reconstruct_words(text in text_strategy(), max in 10usize..80) {
            let pages = paginate(&text, max);
            let original: Vec<&str> = text.split_whitespace().collect();
            let rebuilt: Vec<&str> = pages.iter().flat_map(|p| p.split_whitespace()).collect();
            prop_assert_eq!(original, rebuilt);
        }

        #[test]
        fn pages_respect_budget(text in text_strategy(), max in 10usize..80) {
            let pages = paginate(&text, max);
            for page in &pages {
                prop_assert!(page.chars().count() <= max);
            }
            if text.chars().count() > max {
                prop_assert!(pages.len() >= 2);
            }
        }
    }
}
