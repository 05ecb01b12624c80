/*!
The ingestion loop: reader → classifier → route table → exporter.

Messages are applied strictly one at a time in stream order. The [Translator] owns its
[RouteTable] and is its only writer; exporters and other readers only ever see snapshots.
*/
use crate::config::TranslatorConfig;
use crate::error::TranslatorError;
use crate::export::{NoopExporter, RouteExporter};
use crate::models::Route;
use crate::parser::{classify, ExabgpMessage};
use crate::reader::MessageReader;
use crate::table::{RouteTable, TableChange};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::io::BufRead;

/// Counters of one translator's lifetime.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorStats {
    /// Records decoded and handled.
    pub messages: u64,
    /// Lines or records dropped because they did not parse.
    pub parse_errors: u64,
    /// Announcements rejected because of their attributes.
    pub rejected_announcements: u64,
    pub upserted: u64,
    pub removed: u64,
    /// Snapshots that failed to export.
    pub export_errors: u64,
}

/// Single-writer translator of speaker messages into a route table.
///
/// Mutation goes through `&mut self`. Feeding it from several concurrent sources would need an
/// external mutex or a single-writer queue in front of it.
pub struct Translator<E = NoopExporter> {
    config: TranslatorConfig,
    table: RouteTable,
    exporter: E,
    stats: TranslatorStats,
}

impl Translator<NoopExporter> {
    pub fn new(config: TranslatorConfig) -> Translator<NoopExporter> {
        Translator::with_exporter(config, NoopExporter)
    }
}

impl<E: RouteExporter> Translator<E> {
    pub fn with_exporter(config: TranslatorConfig, exporter: E) -> Translator<E> {
        Translator {
            config,
            table: RouteTable::new(),
            exporter,
            stats: TranslatorStats::default(),
        }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    pub fn stats(&self) -> TranslatorStats {
        self.stats
    }

    /// Consistent copy of the table, reflecting every message handled so far.
    pub fn snapshot(&self) -> Vec<Route> {
        self.table.snapshot()
    }

    /// Handle one decoded record. Every failure is contained to the record: it is logged and the
    /// record (or the failing section of it) is dropped.
    pub fn handle_value(&mut self, value: Value) -> TableChange {
        let mut change = TableChange::default();
        let message = match ExabgpMessage::from_value(value) {
            Ok(m) => m,
            Err(e) => {
                warn!("dropping message: {}", e);
                self.stats.parse_errors += 1;
                return change;
            }
        };
        self.stats.messages += 1;

        for item in classify(&message, &self.config.nlri) {
            let result = item.and_then(|event| self.table.apply(&event));
            match result {
                Ok(c) => change.merge(c),
                Err(e) if e.is_attribute_error() => {
                    warn!("rejecting announcement: {}", e);
                    self.stats.rejected_announcements += 1;
                }
                Err(e) => {
                    warn!("dropping message section: {}", e);
                    self.stats.parse_errors += 1;
                }
            }
        }
        self.stats.upserted += change.upserted as u64;
        self.stats.removed += change.removed as u64;

        if change.is_changed() {
            debug!("route table now holds {} routes", self.table.len());
            self.export();
        }
        change
    }

    /// Decode and handle one line of speaker output.
    pub fn handle_line(&mut self, line: &str) -> Result<TableChange, TranslatorError> {
        let value = serde_json::from_str(line.trim()).inspect_err(|_| {
            self.stats.parse_errors += 1;
        })?;
        Ok(self.handle_value(value))
    }

    /// Read and handle messages until the input ends. Only a read failure of the input is
    /// returned as an error.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<TranslatorStats, TranslatorError> {
        let mut reader = MessageReader::new(input);
        let mut result = Ok(());
        for item in reader.by_ref() {
            match item {
                Ok(value) => {
                    self.handle_value(value);
                }
                Err(e) => {
                    error!("{}", e);
                    result = Err(e);
                    break;
                }
            }
        }
        self.stats.parse_errors += reader.parse_errors();
        info!(
            "ingestion stopped after {} lines, {} routes in table",
            reader.lines_read(),
            self.table.len()
        );
        result.map(|_| self.stats)
    }

    fn export(&mut self) {
        let routes = self.table.snapshot();
        if let Err(e) = self.exporter.export(&routes) {
            error!("{}", e);
            self.stats.export_errors += 1;
        }
    }
}
