// src/core/assembler.rs
use crate::core::alphabet::Alphabet;
use crate::core::resolver::{resolve_cell, AssetProvider};
use crate::core::types::{GlyphCell, Token, WordResult};
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::time::Duration;

/// Resolves every character of `token` concurrently and returns the word
/// once all of its cells have settled.
///
/// `on_settled` sees each cell as soon as it settles, in settlement order.
/// The returned word always lists cells in character order.
pub async fn assemble_word<P, F>(
    provider: &P,
    token: &Token,
    alphabet: Alphabet,
    total_words: usize,
    timeout: Duration,
    mut on_settled: F,
) -> WordResult
where
    P: AssetProvider,
    F: FnMut(&GlyphCell),
{
    let word_len = token.len();
    let mut in_flight: FuturesUnordered<_> = token
        .chars()
        .enumerate()
        .map(|(position, c)| resolve_cell(provider, c, alphabet, position, word_len, timeout))
        .collect();

    let mut slots: Vec<Option<GlyphCell>> = (0..word_len).map(|_| None).collect();
    while let Some(cell) = in_flight.next().await {
        on_settled(&cell);
        let position = cell.position();
        slots[position] = Some(cell);
    }

    let cells: Vec<GlyphCell> = slots.into_iter().flatten().collect();
    debug_assert_eq!(cells.len(), word_len);

    WordResult {
        index: token.index,
        total: total_words,
        alphabet,
        text: token.text.clone(),
        cells,
    }
}
