// src/core/types.rs
use crate::core::alphabet::Alphabet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A word produced by the conversion tokenizer.
/// `index` is the word's 0-based position in the whole input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub index: usize,
    pub text: String,
}

impl Token {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self { index, text: text.into() }
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.text.chars()
    }

    /// Number of characters (not bytes) in the word.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// How a settled cell is shown: the sign image, or the letter as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormatTag {
    Png,
    Text,
}

impl FormatTag {
    pub fn as_str(self) -> &'static str {
        match self {
            FormatTag::Png => "PNG",
            FormatTag::Text => "TEXT",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A locatable sign image for one `(alphabet, asset key)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub alphabet: Alphabet,
    pub key: String,
    pub location: PathBuf,
}

/// Resolution state of a single glyph cell.
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellOutcome {
    Pending,
    ResolvedAsset,
    FallbackText,
}

impl CellOutcome {
    pub fn is_settled(self) -> bool {
        !matches!(self, CellOutcome::Pending)
    }
}

/// What the presentation layer should draw for a settled cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderInstruction {
    Asset { location: PathBuf, format: FormatTag },
    Fallback { text: String, format: FormatTag },
}

/// One character of one word, together with its asset resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlyphCell {
    source: char,
    display: String,
    asset: AssetRef,
    position: usize,
    word_len: usize,
    outcome: CellOutcome,
}

impl GlyphCell {
    /// Creates an unsettled cell. The display form and the asset key are
    /// derived from `(source, asset.alphabet)` by the caller.
    pub fn pending(
        source: char,
        display: String,
        asset: AssetRef,
        position: usize,
        word_len: usize,
    ) -> Self {
        Self {
            source,
            display,
            asset,
            position,
            word_len,
            outcome: CellOutcome::Pending,
        }
    }

    /// Moves the cell into a terminal state. A cell settles once;
    /// later calls are ignored and return `false`.
    pub fn settle(&mut self, available: bool) -> bool {
        if self.outcome.is_settled() {
            log::warn!(
                "Ignoring second settlement of cell {} ({:?})",
                self.position,
                self.source
            );
            return false;
        }
        self.outcome = if available {
            CellOutcome::ResolvedAsset
        } else {
            CellOutcome::FallbackText
        };
        true
    }

    /// The letter as shown (and copied) to the user.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn asset_key(&self) -> &str {
        &self.asset.key
    }

    pub fn asset(&self) -> &AssetRef {
        &self.asset
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 == self.word_len
    }

    pub fn outcome(&self) -> CellOutcome {
        self.outcome
    }

    pub fn format(&self) -> Option<FormatTag> {
        match self.outcome {
            CellOutcome::Pending => None,
            CellOutcome::ResolvedAsset => Some(FormatTag::Png),
            CellOutcome::FallbackText => Some(FormatTag::Text),
        }
    }

    /// `None` until the cell has settled.
    pub fn render(&self) -> Option<RenderInstruction> {
        match self.outcome {
            CellOutcome::Pending => None,
            CellOutcome::ResolvedAsset => Some(RenderInstruction::Asset {
                location: self.asset.location.clone(),
                format: FormatTag::Png,
            }),
            CellOutcome::FallbackText => Some(RenderInstruction::Fallback {
                text: self.display.clone(),
                format: FormatTag::Text,
            }),
        }
    }

    pub fn label(&self) -> String {
        format!("Letter {}", self.position + 1)
    }
}

/// A fully assembled word. Only built once every cell has settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordResult {
    pub index: usize,
    pub total: usize,
    pub alphabet: Alphabet,
    pub text: String,
    pub cells: Vec<GlyphCell>,
}

impl WordResult {
    /// "Word N of M", 1-based.
    pub fn label(&self) -> String {
        format!("Word {} of {}", self.index + 1, self.total)
    }

    pub fn alphabet_label(&self) -> &'static str {
        self.alphabet.settings().label
    }

    /// Display forms of every cell, in character order.
    pub fn display_text(&self) -> String {
        self.cells.iter().map(GlyphCell::display).collect()
    }

    pub fn asset_keys(&self) -> Vec<&str> {
        self.cells.iter().map(GlyphCell::asset_key).collect()
    }

    pub fn fallback_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.outcome() == CellOutcome::FallbackText)
            .count()
    }
}

/// Word and letter counts of the raw input, shown next to the text box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounters {
    pub words: usize,
    pub letters: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(available: Option<bool>) -> GlyphCell {
        let asset = AssetRef {
            alphabet: Alphabet::Latin,
            key: "A".to_string(),
            location: PathBuf::from("images/en/A.png"),
        };
        let mut cell = GlyphCell::pending('a', "A".to_string(), asset, 0, 2);
        if let Some(available) = available {
            cell.settle(available);
        }
        cell
    }

    #[test]
    fn pending_cell_has_no_render_instruction() {
        let cell = cell(None);
        assert_eq!(cell.outcome(), CellOutcome::Pending);
        assert!(cell.render().is_none());
        assert!(cell.format().is_none());
    }

    #[test]
    fn resolved_cell_renders_asset() {
        let cell = cell(Some(true));
        assert_eq!(
            cell.render(),
            Some(RenderInstruction::Asset {
                location: PathBuf::from("images/en/A.png"),
                format: FormatTag::Png,
            })
        );
    }

    #[test]
    fn fallback_cell_keeps_display_form() {
        let cell = cell(Some(false));
        assert_eq!(
            cell.render(),
            Some(RenderInstruction::Fallback {
                text: "A".to_string(),
                format: FormatTag::Text,
            })
        );
        assert_eq!(cell.display(), "A");
    }

    #[test]
    fn settlement_is_final() {
        let mut cell = cell(Some(false));
        assert!(!cell.settle(true));
        assert_eq!(cell.outcome(), CellOutcome::FallbackText);
    }

    #[test]
    fn labels_are_one_based() {
        let cell = cell(Some(true));
        assert_eq!(cell.label(), "Letter 1");
        assert!(!cell.is_last());

        let word = WordResult {
            index: 0,
            total: 3,
            alphabet: Alphabet::Latin,
            text: "a".to_string(),
            cells: vec![cell],
        };
        assert_eq!(word.label(), "Word 1 of 3");
        assert_eq!(word.alphabet_label(), "ENGLISH");
        assert_eq!(word.display_text(), "A");
    }

    #[test]
    fn token_length_counts_chars() {
        let token = Token::new(0, "أب");
        assert_eq!(token.len(), 2);
        assert_eq!(token.chars().collect::<Vec<_>>(), vec!['أ', 'ب']);
    }
}
