use crate::config::SessionConfig;
use crate::core::alphabet::Alphabet;
use crate::core::assembler::assemble_word;
use crate::core::context::{Generation, SessionContext};
use crate::core::resolver::{AssetProvider, FsAssetProvider};
use crate::core::tokenizer;
use crate::core::types::{GlyphCell, RenderInstruction, SessionCounters, Token, WordResult};
use crate::error::ConversionError;
use futures_util::FutureExt;
use parking_lot::Mutex;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Everything the presentation layer needs to mirror a session.
/// Conversion events carry the generation they belong to.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Started {
        generation: u64,
        alphabet: Alphabet,
        words: usize,
    },
    CellSettled {
        generation: u64,
        word: usize,
        cell: GlyphCell,
        render: Option<RenderInstruction>,
    },
    WordCompleted {
        generation: u64,
        word: WordResult,
    },
    Finished {
        generation: u64,
        words: usize,
    },
    Failed {
        generation: u64,
        message: String,
    },
    Cleared {
        generation: u64,
    },
    CountersChanged {
        counters: SessionCounters,
    },
}

/// How a conversion ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOutcome {
    Completed { words: usize },
    /// The session was invalidated (alphabet switch, clear, or a newer
    /// conversion) before every word was appended.
    Superseded { emitted: usize },
}

#[derive(Debug, Default)]
struct OutputLog {
    words: Vec<WordResult>,
}

/// Output side shared by a session and the conversions it starts.
/// The generation check and the write happen under the same lock.
#[derive(Clone)]
struct Outlet {
    generation: Generation,
    log: Arc<Mutex<OutputLog>>,
    events: Option<UnboundedSender<SessionEvent>>,
}

impl Outlet {
    fn new() -> Self {
        Self {
            generation: Generation::new(),
            log: Arc::new(Mutex::new(OutputLog::default())),
            events: None,
        }
    }

    /// Drops all output and starts a new generation.
    fn reset(&self) -> u64 {
        let mut log = self.log.lock();
        log.words.clear();
        self.generation.advance()
    }

    fn send(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                log::trace!("Event receiver dropped");
            }
        }
    }

    /// Sends the event only while `tag` is still current.
    fn publish(&self, tag: u64, event: impl FnOnce() -> SessionEvent) -> bool {
        let _log = self.log.lock();
        if !self.generation.is_current(tag) {
            return false;
        }
        self.send(event());
        true
    }

    fn append(&self, tag: u64, word: WordResult) -> bool {
        let mut log = self.log.lock();
        if !self.generation.is_current(tag) {
            return false;
        }
        self.send(SessionEvent::WordCompleted {
            generation: tag,
            word: word.clone(),
        });
        log.words.push(word);
        true
    }
}

/// A conversion session: the explicit replacement for the converter page's
/// global state. Holds the selected alphabet, the input text with its
/// counters, and the ordered list of converted words.
pub struct ConversionSession<P> {
    provider: Arc<P>,
    config: SessionConfig,
    context: SessionContext,
    outlet: Outlet,
}

impl ConversionSession<FsAssetProvider> {
    /// Session backed by the on-disk asset tree named in `config`.
    pub fn from_config(config: SessionConfig) -> Self {
        let provider = FsAssetProvider::from_config(&config);
        Self::new(provider, config)
    }
}

impl<P: AssetProvider> ConversionSession<P> {
    pub fn new(provider: P, config: SessionConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            context: SessionContext::new(config.default_alphabet),
            config,
            outlet: Outlet::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Routes session events to the returned receiver. Conversions started
    /// earlier keep reporting to the previous subscriber.
    pub fn subscribe(&mut self) -> UnboundedReceiver<SessionEvent> {
        let (tx, rx) = unbounded_channel();
        self.outlet.events = Some(tx);
        rx
    }

    pub fn alphabet(&self) -> Alphabet {
        self.context.alphabet()
    }

    /// Selects an alphabet. Output and in-flight conversions are discarded
    /// even when the alphabet does not change.
    pub fn set_alphabet(&mut self, alphabet: Alphabet) {
        log::info!("Alphabet set to {alphabet}");
        self.context.set_alphabet(alphabet);
        self.invalidate();
    }

    pub fn input(&self) -> &str {
        self.context.input()
    }

    /// Replaces the input text. Counters update; conversion state does not.
    pub fn set_input(&mut self, text: impl Into<String>) -> SessionCounters {
        let counters = self.context.set_input(text);
        self.outlet.send(SessionEvent::CountersChanged { counters });
        counters
    }

    pub fn counters(&self) -> SessionCounters {
        self.context.counters()
    }

    /// Empties the input and discards all conversion state.
    pub fn clear(&mut self) {
        let counters = self.context.clear_input();
        self.invalidate();
        self.outlet.send(SessionEvent::CountersChanged { counters });
    }

    /// Discards output and makes every in-flight conversion stale.
    pub fn invalidate(&self) -> u64 {
        let generation = self.outlet.reset();
        log::debug!("Session invalidated, generation {generation}");
        self.outlet.send(SessionEvent::Cleared { generation });
        generation
    }

    pub fn generation(&self) -> u64 {
        self.outlet.generation.current()
    }

    /// Tokenizes `raw` and prepares a conversion of it. Previous output is
    /// discarded whether or not tokenizing succeeds.
    pub fn begin(&self, raw: &str) -> Result<Conversion<P>, ConversionError> {
        let tag = self.outlet.reset();
        let tokens = match tokenizer::tokenize(raw) {
            Ok(tokens) => tokens,
            Err(e) => {
                log::info!("Nothing to convert: {e}");
                self.outlet.send(SessionEvent::Failed {
                    generation: tag,
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        let alphabet = self.alphabet();
        log::info!(
            "Converting {} word(s) as {alphabet}, generation {tag}",
            tokens.len()
        );
        self.outlet.send(SessionEvent::Started {
            generation: tag,
            alphabet,
            words: tokens.len(),
        });

        Ok(Conversion {
            tag,
            alphabet,
            tokens,
            timeout: self.config.probe_timeout(),
            provider: Arc::clone(&self.provider),
            outlet: self.outlet.clone(),
        })
    }

    pub async fn convert(&self, raw: &str) -> Result<ConversionOutcome, ConversionError> {
        self.begin(raw)?.run().await
    }

    /// Converts the current input text.
    pub async fn convert_input(&self) -> Result<ConversionOutcome, ConversionError> {
        self.begin(self.context.input())?.run().await
    }

    /// Snapshot of the words emitted so far, in word order.
    pub fn words(&self) -> Vec<WordResult> {
        self.outlet.log.lock().words.clone()
    }

    pub fn emitted_words(&self) -> usize {
        self.outlet.log.lock().words.len()
    }

    /// Display form of one cell, both indexes 0-based.
    pub fn copy_cell(&self, word: usize, position: usize) -> Option<String> {
        let log = self.outlet.log.lock();
        log.words
            .get(word)
            .and_then(|w| w.cells.get(position))
            .map(|cell| cell.display().to_string())
    }

    /// Every emitted cell's display form, in document order.
    pub fn copy_all(&self) -> String {
        let log = self.outlet.log.lock();
        log.words
            .iter()
            .flat_map(|w| w.cells.iter())
            .map(GlyphCell::display)
            .collect()
    }
}

/// A tokenized conversion bound to one session generation.
pub struct Conversion<P> {
    tag: u64,
    alphabet: Alphabet,
    tokens: Vec<Token>,
    timeout: Duration,
    provider: Arc<P>,
    outlet: Outlet,
}

impl<P: AssetProvider> Conversion<P> {
    pub fn generation(&self) -> u64 {
        self.tag
    }

    /// Assembles the words one after another and appends each to the
    /// session output as it completes. Word N+1 starts only after word N
    /// has settled, so at most one word's probes are outstanding.
    pub async fn run(self) -> Result<ConversionOutcome, ConversionError> {
        let total = self.tokens.len();
        let mut emitted = 0;

        for token in &self.tokens {
            if !self.outlet.generation.is_current(self.tag) {
                return Ok(self.superseded(emitted));
            }

            let assembly = assemble_word(
                self.provider.as_ref(),
                token,
                self.alphabet,
                total,
                self.timeout,
                |cell| self.publish_cell(token.index, cell),
            );
            let word = match AssertUnwindSafe(assembly).catch_unwind().await {
                Ok(word) => word,
                Err(panic) => return Err(self.fail(emitted, panic_message(panic.as_ref()))),
            };

            if !self.outlet.append(self.tag, word) {
                return Ok(self.superseded(emitted));
            }
            emitted += 1;
        }

        self.outlet.publish(self.tag, || SessionEvent::Finished {
            generation: self.tag,
            words: emitted,
        });
        log::info!("Generation {} finished with {emitted} word(s)", self.tag);
        Ok(ConversionOutcome::Completed { words: emitted })
    }

    fn publish_cell(&self, word: usize, cell: &GlyphCell) {
        self.outlet.publish(self.tag, || SessionEvent::CellSettled {
            generation: self.tag,
            word,
            cell: cell.clone(),
            render: cell.render(),
        });
    }

    fn superseded(&self, emitted: usize) -> ConversionOutcome {
        log::warn!(
            "Generation {} is stale, discarding the rest of its results",
            self.tag
        );
        ConversionOutcome::Superseded { emitted }
    }

    fn fail(&self, emitted: usize, message: String) -> ConversionError {
        log::error!("Conversion failed after {emitted} word(s): {message}");
        let error = ConversionError::ConversionFailed { emitted, message };
        self.outlet.publish(self.tag, || SessionEvent::Failed {
            generation: self.tag,
            message: error.to_string(),
        });
        error
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
