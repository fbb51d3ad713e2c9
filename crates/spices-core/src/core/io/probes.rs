use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

/// One row of a probe file: the alpha carbon key and its replacement particle.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProbeRecord {
    #[serde(rename = "ca-key")]
    pub ca_key: String,
    pub probe: String,
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Probe particle for '{0}' is empty")]
    EmptyProbe(String),
}

/// Reads probe records (`ca-key,probe` with a header row) into a map keyed by
/// alpha carbon key. A later row for the same key replaces an earlier one.
pub fn read_probes(reader: impl Read) -> Result<BTreeMap<String, String>, ProbeError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut probes = BTreeMap::new();
    for result in reader.deserialize::<ProbeRecord>() {
        let record = result?;
        if record.probe.is_empty() {
            return Err(ProbeError::EmptyProbe(record.ca_key));
        }
        probes.insert(record.ca_key, record.probe);
    }
    Ok(probes)
}

pub fn read_probes_from_path(path: &Path) -> Result<BTreeMap<String, String>, ProbeError> {
    let file = std::fs::File::open(path).map_err(|e| ProbeError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    read_probes(file)
}

pub fn write_probes(
    writer: impl Write,
    probes: &BTreeMap<String, String>,
) -> Result<(), ProbeError> {
    let mut writer = csv::Writer::from_writer(writer);
    for (ca_key, probe) in probes {
        writer.serialize(ProbeRecord {
            ca_key: ca_key.clone(),
            probe: probe.clone(),
        })?;
    }
    writer.flush().map_err(|e| ProbeError::Csv(e.into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn reads_probe_rows_keyed_by_alpha_carbon() {
        let content = "ca-key,probe\n[ALA]1:A.CA #2, Pr1\n[GLY]2:A.CA #6,Pr2\n";
        let probes = read_probes(content.as_bytes()).unwrap();
        assert_eq!(probes.len(), 2);
        assert_eq!(probes["[ALA]1:A.CA #2"], "Pr1");
    }

    #[test]
    fn empty_probe_particle_is_rejected() {
        let content = "ca-key,probe\n[ALA]1:A.CA #2,\n";
        assert!(matches!(
            read_probes(content.as_bytes()),
            Err(ProbeError::EmptyProbe(key)) if key == "[ALA]1:A.CA #2"
        ));
    }

    #[test]
    fn missing_column_is_a_csv_error() {
        let content = "ca-key\n[ALA]1:A.CA #2\n";
        assert!(matches!(read_probes(content.as_bytes()), Err(ProbeError::Csv(_))));
    }

    #[test]
    fn written_probes_read_back_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("probes.csv");
        let mut probes = BTreeMap::new();
        probes.insert("[CYS]3:B.CA #17".to_string(), "Pr9".to_string());
        write_probes(File::create(&path).unwrap(), &probes).unwrap();

        assert_eq!(read_probes_from_path(&path).unwrap(), probes);
        assert!(matches!(
            read_probes_from_path(&dir.path().join("missing.csv")),
            Err(ProbeError::Io { .. })
        ));
    }
}
