//! CSV input and output for replaying command scripts.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::{Command, Config, ConfigError, Event, EventId};

/// Errors that can occur when reading or writing csv files
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open csv file: {0}")]
    Open(#[source] csv::Error),

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized command '{command}'")]
    UnrecognizedCommand { line: usize, command: String },

    #[error("line {line}: invalid time offset {at}")]
    InvalidOffset { line: usize, at: f64 },

    #[error("config file has no rows")]
    MissingConfigRow,

    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("failed to write csv: {0}")]
    Write(#[source] csv::Error),
}

/// A command scheduled at an instant of the replay clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub at: DateTime<Utc>,
    pub command: Command,
}

#[derive(Debug, Deserialize)]
struct InputRow {
    /// Seconds after the session start.
    at: f64,
    command: String,
    correlation_id: String,
}

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    id: EventId,
    at: String,
    correlation_id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    amount: u64,
}

/// Read a command script from a csv file. Offsets are relative to `start`.
pub fn read_script(
    path: impl AsRef<Path>,
    start: DateTime<Utc>,
) -> Result<impl Iterator<Item = Result<ScriptStep, CsvError>>, CsvError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(CsvError::Open)?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(move |(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            let at = offset(row.at)
                .and_then(|offset| start.checked_add_signed(offset))
                .ok_or(CsvError::InvalidOffset { line, at: row.at })?;
            let command = parse_command(&row.command, row.correlation_id).ok_or_else(|| {
                CsvError::UnrecognizedCommand {
                    line,
                    command: row.command.clone(),
                }
            })?;
            Ok(ScriptStep { at, command })
        }))
}

/// Read a single-row config file and validate it.
pub fn read_config(path: impl AsRef<Path>) -> Result<Config, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(CsvError::Open)?;

    let config: Config = reader
        .deserialize()
        .next()
        .ok_or(CsvError::MissingConfigRow)?
        .map_err(|source| CsvError::Parse { line: 2, source })?;
    config.validate()?;
    Ok(config)
}

/// Write events to `writer` in csv format
pub fn write_events<'a, W: io::Write>(
    writer: W,
    events: impl IntoIterator<Item = &'a Event>,
) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(writer);

    for event in events {
        let row = OutputRow {
            id: event.id,
            at: event.at.to_rfc3339_opts(SecondsFormat::Millis, true),
            correlation_id: &event.correlation_id,
            kind: event.payload.name(),
            amount: event.payload.amount(),
        };
        writer.serialize(&row).map_err(CsvError::Write)?;
    }

    writer.flush().map_err(|e| CsvError::Write(e.into()))
}

fn offset(seconds: f64) -> Option<Duration> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Duration::try_milliseconds((seconds * 1000.0).round() as i64)
}

fn parse_command(name: &str, correlation_id: String) -> Option<Command> {
    let command = match name {
        "sync_state" => Command::SyncState { correlation_id },
        "settle" => Command::Settle { correlation_id },
        "unlock_crafting" => Command::UnlockCrafting { correlation_id },
        "start_craft" => Command::StartCraft { correlation_id },
        "claim_craft" => Command::ClaimCraft { correlation_id },
        "cancel_craft" => Command::CancelCraft { correlation_id },
        _ => return None,
    };
    Some(command)
}
