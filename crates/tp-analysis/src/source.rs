//! Event record input: the `EventSource` seam and its JSON-lines reader.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tp_core::{ErrorInfo, Event, Particle, TpError};

/// One input record: the full event plus an optional parton-level view.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Full particle history.
    pub event: Event,
    /// Parton-level projection whose mother links address `event`.
    pub partons: Option<Event>,
}

impl EventRecord {
    /// Wraps a record without a parton-level view.
    pub fn new(event: Event) -> Self {
        Self {
            event,
            partons: None,
        }
    }

    /// Attaches a parton-level view.
    pub fn with_partons(mut self, partons: Event) -> Self {
        self.partons = Some(partons);
        self
    }
}

/// Supplier of event records for the per-event loop.
pub trait EventSource {
    /// Returns the next record, `Ok(None)` once the source is exhausted.
    fn next_record(&mut self) -> Result<Option<EventRecord>, TpError>;
}

impl EventSource for std::vec::IntoIter<EventRecord> {
    fn next_record(&mut self) -> Result<Option<EventRecord>, TpError> {
        Ok(self.next())
    }
}

fn default_weight() -> f64 {
    1.0
}

/// Wire layout of one JSON line.
#[derive(Debug, Serialize, Deserialize)]
struct RecordLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    number: Option<u64>,
    #[serde(default = "default_weight")]
    weight: f64,
    particles: Vec<Particle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    partons: Option<Vec<Particle>>,
}

impl RecordLine {
    fn into_record(self) -> EventRecord {
        let (weight, number) = (self.weight, self.number);
        let stamp = move |event: Event| {
            let event = event.with_weight(weight);
            match number {
                Some(number) => event.with_number(number),
                None => event,
            }
        };
        EventRecord {
            event: stamp(Event::new(self.particles)),
            partons: self.partons.map(|partons| stamp(Event::new(partons))),
        }
    }
}

/// Reads one JSON object per line; blank lines are skipped.
#[derive(Debug)]
pub struct JsonLinesSource<R> {
    reader: R,
    line: usize,
    buffer: String,
}

impl JsonLinesSource<BufReader<File>> {
    /// Opens a JSON-lines file.
    pub fn open(path: &Path) -> Result<Self, TpError> {
        let file = File::open(path).map_err(|err| {
            TpError::Io(
                ErrorInfo::new("open-input", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Wraps any buffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buffer: String::new(),
        }
    }

    /// Number of lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> EventSource for JsonLinesSource<R> {
    fn next_record(&mut self) -> Result<Option<EventRecord>, TpError> {
        loop {
            self.buffer.clear();
            let read = self.reader.read_line(&mut self.buffer).map_err(|err| {
                TpError::Io(
                    ErrorInfo::new("read-input", err.to_string())
                        .with_context("line", (self.line + 1).to_string()),
                )
            })?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;
            let text = self.buffer.trim();
            if text.is_empty() {
                continue;
            }
            let line: RecordLine = serde_json::from_str(text).map_err(|err| {
                TpError::Serde(
                    ErrorInfo::new("parse-record", err.to_string())
                        .with_context("line", self.line.to_string()),
                )
            })?;
            return Ok(Some(line.into_record()));
        }
    }
}

/// Serializes a record as one JSON line (without the trailing newline).
pub fn record_to_json_line(record: &EventRecord) -> Result<String, TpError> {
    let line = RecordLine {
        number: record.event.number,
        weight: record.event.weight,
        particles: record.event.particles().to_vec(),
        partons: record
            .partons
            .as_ref()
            .map(|partons| partons.particles().to_vec()),
    };
    serde_json::to_string(&line)
        .map_err(|err| TpError::Serde(ErrorInfo::new("serialize-record", err.to_string())))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_records_and_skips_blank_lines() {
        let input = concat!(
            r#"{"number": 3, "weight": 0.5, "particles": [{"id": 21, "status": -23}]}"#,
            "\n\n",
            r#"{"particles": [{"id": 1, "status": 1}], "partons": [{"id": 1, "status": 62, "mother1": 1}]}"#,
            "\n",
        );
        let mut source = JsonLinesSource::from_reader(Cursor::new(input));

        let first = source.next_record().unwrap().unwrap();
        assert_eq!(first.event.number, Some(3));
        assert_eq!(first.event.weight, 0.5);
        assert!(first.partons.is_none());

        let second = source.next_record().unwrap().unwrap();
        assert_eq!(second.event.weight, 1.0);
        let partons = second.partons.unwrap();
        assert_eq!(partons.get(1).map(|p| p.mother1), Some(1));

        assert!(source.next_record().unwrap().is_none());
        assert_eq!(source.line(), 3);
    }

    #[test]
    fn parse_errors_carry_the_line_number() {
        let input = "{\"particles\": []}\nnot json\n";
        let mut source = JsonLinesSource::from_reader(Cursor::new(input));
        assert!(source.next_record().unwrap().is_some());
        let err = source.next_record().unwrap_err();
        assert_eq!(err.info().code, "parse-record");
        assert_eq!(err.info().context.get("line").map(String::as_str), Some("2"));
    }

    #[test]
    fn written_lines_read_back() {
        let record = EventRecord::new(
            Event::new(vec![Particle::new(22, 1).with_momentum(1.0, 2.0, 3.0, 3.8)])
                .with_number(9)
                .with_weight(2.0),
        );
        let line = record_to_json_line(&record).unwrap();
        let mut source = JsonLinesSource::from_reader(Cursor::new(line));
        assert_eq!(source.next_record().unwrap(), Some(record));
    }
}
