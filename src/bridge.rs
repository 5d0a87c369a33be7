// src/bridge.rs
//! Line protocol for driving a session from another process.
//!
//! Commands arrive one per line: `ALPHABET <en|ar>`, `INPUT <text>`,
//! `CONVERT`, `CLEAR`, `COPY_ALL`, `COPY <word> <letter>` and `EXIT`.
//! Every [`SessionEvent`](crate::SessionEvent) is written as one JSON line the moment it is
//! sent, including while a conversion is still running. Commands keep
//! being read during a conversion, so `ALPHABET` or `CLEAR` cancel it.

use crate::core::alphabet::Alphabet;
use crate::core::engine::{ConversionOutcome, ConversionSession};
use crate::core::resolver::AssetProvider;
use crate::error::{BridgeError, ConversionError};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

type Running = LocalBoxFuture<'static, Result<ConversionOutcome, ConversionError>>;

/// Direct answers to a command, written after the events it caused.
#[derive(Debug, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
enum Reply {
    Copied { text: String },
    Error { message: String },
}

/// Serves commands from `input` until `EXIT` or end of input.
///
/// At end of input a running conversion is allowed to finish so piped
/// command files see their results. `EXIT` drops it instead.
pub async fn serve<P, R, W>(
    session: &mut ConversionSession<P>,
    input: R,
    mut output: W,
) -> Result<(), BridgeError>
where
    P: AssetProvider + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut events = session.subscribe();
    let mut lines = input.lines();
    let mut running: Option<Running> = None;
    let mut input_open = true;
    log::info!("Bridge ready");

    while input_open || running.is_some() {
        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                write_json(&mut output, &event).await?;
                output.flush().await?;
            }
            result = drive(&mut running), if running.is_some() => {
                running = None;
                match result {
                    Ok(outcome) => log::debug!("Conversion ended: {outcome:?}"),
                    // Already reported through a `failed` event.
                    Err(e) => log::debug!("Conversion ended with: {e}"),
                }
            }
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    log::debug!("Command stream closed");
                    input_open = false;
                    continue;
                };
                log::debug!("<- {line:?}");
                if line.trim() == "EXIT" {
                    break;
                }
                let reply = handle(session, &line, &mut running);

                while let Ok(event) = events.try_recv() {
                    write_json(&mut output, &event).await?;
                }
                if let Some(reply) = reply {
                    write_json(&mut output, &reply).await?;
                }
                output.flush().await?;
            }
        }
    }

    while let Ok(event) = events.try_recv() {
        write_json(&mut output, &event).await?;
    }
    output.flush().await?;
    log::info!("Bridge shutting down");
    Ok(())
}

/// Polls the running conversion; never resolves when there is none.
async fn drive(running: &mut Option<Running>) -> Result<ConversionOutcome, ConversionError> {
    match running {
        Some(conversion) => conversion.await,
        None => std::future::pending().await,
    }
}

fn handle<P>(
    session: &mut ConversionSession<P>,
    line: &str,
    running: &mut Option<Running>,
) -> Option<Reply>
where
    P: AssetProvider + 'static,
{
    let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
    match command.trim() {
        "ALPHABET" => match arg.parse::<Alphabet>() {
            Ok(alphabet) => {
                session.set_alphabet(alphabet);
                None
            }
            Err(e) => Some(Reply::Error { message: e.to_string() }),
        },
        "INPUT" => {
            session.set_input(arg);
            None
        }
        "CONVERT" => {
            // A newer conversion supersedes the running one.
            *running = match session.begin(session.input()) {
                Ok(conversion) => Some(conversion.run().boxed_local()),
                Err(e) => {
                    log::debug!("Conversion not started: {e}");
                    None
                }
            };
            None
        }
        "CLEAR" => {
            session.clear();
            None
        }
        "COPY_ALL" => Some(Reply::Copied { text: session.copy_all() }),
        "COPY" => Some(copy_cell(session, arg)),
        other => {
            log::warn!("Unknown command {other:?}");
            Some(Reply::Error {
                message: format!("unknown command {other:?}"),
            })
        }
    }
}

/// `COPY <word> <letter>`, both 0-based.
fn copy_cell<P: AssetProvider>(session: &ConversionSession<P>, arg: &str) -> Reply {
    let mut parts = arg.split_whitespace().map(str::parse::<usize>);
    match (parts.next(), parts.next()) {
        (Some(Ok(word)), Some(Ok(letter))) => match session.copy_cell(word, letter) {
            Some(text) => Reply::Copied { text },
            None => Reply::Error {
                message: format!("no cell {letter} in word {word}"),
            },
        },
        _ => Reply::Error {
            message: "usage: COPY <word> <letter>".to_string(),
        },
    }
}

async fn write_json<W, T>(output: &mut W, value: &T) -> Result<(), BridgeError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    output.write_all(line.as_bytes()).await?;
    Ok(())
}
