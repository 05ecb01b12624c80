//! Translator configuration, read once at startup.
use std::fs::File;
use std::path::PathBuf;

/// NLRI family key ExaBGP uses for IPv4 Labeled-Unicast.
pub const DEFAULT_NLRI: &str = "ipv4 nlri-mpls";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorConfig {
    /// Address-family key of the Labeled-Unicast NLRI in update messages.
    pub nlri: String,
    /// Log destination. `None` logs to stderr, since the speaker reads the process's stdout.
    pub log_file: Option<PathBuf>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            nlri: DEFAULT_NLRI.to_string(),
            log_file: None,
        }
    }
}

impl TranslatorConfig {
    pub fn with_nlri<S: Into<String>>(self, nlri: S) -> TranslatorConfig {
        TranslatorConfig {
            nlri: nlri.into(),
            ..self
        }
    }

    pub fn with_log_file<P: Into<PathBuf>>(self, log_file: P) -> TranslatorConfig {
        TranslatorConfig {
            log_file: Some(log_file.into()),
            ..self
        }
    }

    /// Create (or truncate) the configured log file. `None` when logs go to stderr.
    pub fn open_log_file(&self) -> std::io::Result<Option<File>> {
        self.log_file.as_ref().map(File::create).transpose()
    }
}
