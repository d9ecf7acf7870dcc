use crate::{DatasetError, DatasetFingerprint, MedicineRecord};
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::info;

pub mod columns {
    pub const NAME: &str = "Medicine Name";
    pub const COMPOSITION: &str = "Composition";
    pub const USES: &str = "Uses";
    pub const SIDE_EFFECTS: &str = "Side_effects";
    pub const MANUFACTURER: &str = "Manufacturer";
    pub const STORAGE_CONDITION: &str = "Storage Condition";
    pub const STORAGE_TEMPERATURE: &str = "Storage Temperature (°C)";
    pub const STORAGE_HUMIDITY: &str = "Storage Humidity (%)";

    pub const REQUIRED: [&str; 8] = [
        NAME,
        COMPOSITION,
        USES,
        SIDE_EFFECTS,
        MANUFACTURER,
        STORAGE_CONDITION,
        STORAGE_TEMPERATURE,
        STORAGE_HUMIDITY,
    ];
}

#[derive(Debug, Deserialize)]
struct MedicineRow {
    #[serde(rename = "Medicine Name")]
    name: Option<String>,
    #[serde(rename = "Composition")]
    composition: Option<String>,
    #[serde(rename = "Uses")]
    uses: Option<String>,
    #[serde(rename = "Side_effects")]
    side_effects: Option<String>,
    #[serde(rename = "Manufacturer")]
    manufacturer: Option<String>,
    #[serde(rename = "Storage Condition")]
    storage_condition: Option<String>,
    #[serde(rename = "Storage Temperature (°C)")]
    storage_temperature: Option<String>,
    #[serde(rename = "Storage Humidity (%)")]
    storage_humidity: Option<String>,
}

impl MedicineRow {
    fn into_record(self, row: usize) -> Result<MedicineRecord, DatasetError> {
        Ok(MedicineRecord {
            name: required_text(self.name, row, columns::NAME)?,
            composition: required_text(self.composition, row, columns::COMPOSITION)?,
            uses: required_text(self.uses, row, columns::USES)?,
            side_effects: required_text(self.side_effects, row, columns::SIDE_EFFECTS)?,
            manufacturer: required_text(self.manufacturer, row, columns::MANUFACTURER)?,
            storage_condition: required_text(
                self.storage_condition,
                row,
                columns::STORAGE_CONDITION,
            )?,
            storage_temperature_c: required_number(
                self.storage_temperature,
                row,
                columns::STORAGE_TEMPERATURE,
            )?,
            storage_humidity_percent: required_number(
                self.storage_humidity,
                row,
                columns::STORAGE_HUMIDITY,
            )?,
        })
    }
}

fn required_text(value: Option<String>, row: usize, column: &str) -> Result<String, DatasetError> {
    let text = value.map(|raw| raw.trim().to_string()).unwrap_or_default();
    if text.is_empty() {
        return Err(DatasetError::EmptyField {
            row,
            column: column.to_string(),
        });
    }
    Ok(text)
}

fn required_number(value: Option<String>, row: usize, column: &str) -> Result<f64, DatasetError> {
    let text = required_text(value, row, column)?;
    text.parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or(DatasetError::InvalidNumber {
            row,
            column: column.to_string(),
            value: text,
        })
}

/// Medicine records in source row order. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct MedicineTable {
    records: Vec<MedicineRecord>,
    fingerprint: Option<DatasetFingerprint>,
}

impl MedicineTable {
    pub fn from_records(records: Vec<MedicineRecord>) -> Self {
        Self {
            records,
            fingerprint: None,
        }
    }

    /// Parses CSV with a header row. Every required column must be present and
    /// every row must carry a value for each of them.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in columns::REQUIRED {
            if !headers.iter().any(|header| header == column) {
                return Err(DatasetError::MissingColumn(column.to_string()));
            }
        }

        let mut records = Vec::new();
        for (position, row) in csv_reader.deserialize::<MedicineRow>().enumerate() {
            // header occupies line 1
            let line = position + 2;
            records.push(row?.into_record(line)?);
        }

        Ok(Self::from_records(records))
    }

    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        if !path.is_file() {
            return Err(DatasetError::NotFound(path.display().to_string()));
        }

        let bytes = fs::read(path)?;
        let mut table = Self::from_reader(bytes.as_slice())?;
        table.fingerprint = Some(DatasetFingerprint {
            source_path: path.to_string_lossy().to_string(),
            checksum: digest_bytes(&bytes),
            record_count: table.records.len(),
            loaded_at: Utc::now(),
        });

        info!(
            path = %path.display(),
            records = table.records.len(),
            "loaded medicine dataset"
        );
        Ok(table)
    }

    pub fn records(&self) -> &[MedicineRecord] {
        &self.records
    }

    pub fn get(&self, row: usize) -> Option<&MedicineRecord> {
        self.records.get(row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn fingerprint(&self) -> Option<&DatasetFingerprint> {
        self.fingerprint.as_ref()
    }
}

pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
