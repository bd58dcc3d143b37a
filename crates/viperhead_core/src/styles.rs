//! crates/viperhead_core/src/styles.rs
//!
//! Art-style randomization for generation prompts.

use rand::seq::SliceRandom;

use crate::domain::ImagePrompt;

pub const ART_STYLES: [&str; 15] = [
    "in the style of Van Gogh's Starry Night",
    "as a Renaissance oil painting",
    "in cyberpunk neon style",
    "as a watercolor illustration",
    "in art deco style",
    "as a comic book illustration",
    "in minimalist Japanese ink style",
    "as a Pop Art piece",
    "in the style of Studio Ghibli",
    "as a surrealist Salvador Dali painting",
    "in pixel art style",
    "as a medieval tapestry",
    "in vaporwave aesthetic",
    "as a chalk pastel drawing",
    "in steampunk style",
];

pub const DEFAULT_SUBJECT: &str =
    "Generate an image of my black lab, except instead of his head, replace it with the head of a viper";

/// A prompt subject plus the style labels to pick from.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    subject: String,
    styles: Vec<String>,
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_SUBJECT)
    }
}

impl StyleCatalog {
    /// A catalog over the built-in art styles.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            styles: ART_STYLES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// A catalog that never applies a style.
    pub fn plain(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            styles: Vec::new(),
        }
    }

    pub fn with_styles<I, S>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.styles = styles.into_iter().map(Into::into).collect();
        self
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    /// Uniformly random style, or `None` for a plain catalog.
    pub fn pick(&self) -> Option<&str> {
        self.styles
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }

    /// Builds the next prompt, styled when the catalog has styles.
    pub fn prompt(&self) -> ImagePrompt {
        match self.pick() {
            Some(style) => ImagePrompt::new(compose(&self.subject, style)).with_style(style),
            None => ImagePrompt::new(self.subject.clone()),
        }
    }
}

pub fn compose(subject: &str, style: &str) -> String {
    format!("{subject}, {style}")
}
