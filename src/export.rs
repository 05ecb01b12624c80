/*!
Downstream sinks for route table snapshots.

The translator hands a full, consistent snapshot to its [RouteExporter] after every message that
changed the table. Onward transmission to a controller is left to the exporter.
*/
use crate::error::TranslatorError;
use crate::models::Route;
use log::debug;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub trait RouteExporter {
    fn export(&mut self, routes: &[Route]) -> Result<(), TranslatorError>;
}

/// Exporter that discards snapshots.
#[derive(Debug, Default)]
pub struct NoopExporter;

impl RouteExporter for NoopExporter {
    fn export(&mut self, _routes: &[Route]) -> Result<(), TranslatorError> {
        Ok(())
    }
}

/// Exporter that keeps the last snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryExporter {
    pub routes: Vec<Route>,
    pub exports: usize,
}

impl RouteExporter for MemoryExporter {
    fn export(&mut self, routes: &[Route]) -> Result<(), TranslatorError> {
        self.routes = routes.to_vec();
        self.exports += 1;
        Ok(())
    }
}

/// Exporter that writes each snapshot as a JSON array to a file, replacing the previous one.
///
/// The snapshot is written to a sibling `.tmp` file first and renamed over the target, so readers
/// of the target never see a partially written snapshot.
#[derive(Debug)]
pub struct JsonFileExporter {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileExporter {
    pub fn new<P: AsRef<Path>>(path: P) -> JsonFileExporter {
        JsonFileExporter {
            path: path.as_ref().to_path_buf(),
            pretty: false,
        }
    }

    pub fn pretty(self, pretty: bool) -> JsonFileExporter {
        JsonFileExporter { pretty, ..self }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_snapshot(&self, tmp_path: &Path, routes: &[Route]) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(tmp_path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, routes)?;
        } else {
            serde_json::to_writer(&mut writer, routes)?;
        }
        writeln!(writer)?;
        writer.flush()
    }
}

impl RouteExporter for JsonFileExporter {
    fn export(&mut self, routes: &[Route]) -> Result<(), TranslatorError> {
        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        self.write_snapshot(&tmp_path, routes)
            .and_then(|_| fs::rename(&tmp_path, &self.path))
            .map_err(TranslatorError::ExportError)?;
        debug!("exported {} routes to {}", routes.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use smallvec::smallvec;

    fn route() -> Route {
        Route::new(
            "192.168.35.5/32".parse().unwrap(),
            "3.3.3.3".parse().unwrap(),
            None,
            Attributes {
                origin: Origin::IGP,
                multi_exit_disc: 0,
                local_pref: 100,
                as_path: None,
                communities: Some(vec![Community::new(100, 3)]),
                originator_id: None,
                cluster_list: None,
                next_hop: "0.0.0.0".parse().unwrap(),
            },
            smallvec![Label::new(18)],
        )
    }

    #[test]
    fn test_json_file_exporter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");
        let mut exporter = JsonFileExporter::new(&path);

        exporter.export(&[route()]).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["route-key"], "192.168.35.5/32_3.3.3.3");
        assert_eq!(value[0]["label-stack"][0]["label-value"], 18);
        assert_eq!(value[0]["attributes"]["next-hop"], "3.3.3.3");

        exporter.export(&[]).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!([]));
    }

    #[test]
    fn test_json_file_exporter_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = JsonFileExporter::new(dir.path().join("missing").join("routes.json"));
        let err = exporter.export(&[route()]).unwrap_err();
        assert!(matches!(err, TranslatorError::ExportError(_)));
    }

    #[test]
    fn test_memory_exporter() {
        let mut exporter = MemoryExporter::default();
        exporter.export(&[route()]).unwrap();
        assert_eq!(exporter.exports, 1);
        assert_eq!(exporter.routes, vec![route()]);
    }
}
