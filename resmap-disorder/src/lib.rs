//! # resmap-disorder
//!
//! Lookup of intrinsically-disordered regions for UniProt accessions,
//! merged across the three reference databases (DisProt, IDEAL, MobiDB).
//!
//! Each database is a tab-separated table with one row per annotated
//! protein and a `disorder_regions` column holding a raw, unmerged
//! `"start-end,start-end,…"` string. [DisorderDb] loads the three tables
//! once, explicitly, and answers per-accession queries by gathering the
//! matching rows and consolidating their regions through
//! `resmap_core::models::interval::consolidate_regions`.
//!
//! The lookup object is immutable after construction and queried through
//! `&self`; there is no module-level state and no caching, so region sets
//! are recomputed per query.
//!
//! ## Table format
//!
//! Tab-separated, optionally gzipped, with a header line naming at least
//! the `uniprot_id` and `disorder_regions` columns and optionally a
//! `db_id` column (MobiDB ships none; its hits report the accession
//! itself). The region field keeps its internal commas, which is why the
//! tables are tab- rather than comma-separated.
//!
use std::io::BufRead;
use std::path::Path;

use log::info;
use thiserror::Error;

use resmap_core::errors::RegionError;
use resmap_core::models::interval::consolidate_regions;
use resmap_core::models::ResidueInterval;
use resmap_core::utils::get_dynamic_reader;

#[derive(Debug, Error)]
pub enum DisorderError {
    #[error("Can't read table: {0}")]
    TableRead(String),

    #[error("Missing column `{column}` in table {table}")]
    MissingColumn { column: &'static str, table: String },

    #[error("Error parsing line: {0}")]
    ParsingError(String),

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The reference database a disorder annotation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisorderSource {
    DisProt,
    Ideal,
    MobiDb,
}

#[derive(Debug, Clone)]
struct DisorderRecord {
    db_id: Option<String>,
    uniprot_id: String,
    regions: String,
}

#[derive(Debug, Clone)]
struct DisorderTable {
    source: DisorderSource,
    records: Vec<DisorderRecord>,
}

impl DisorderTable {
    fn from_path(source: DisorderSource, path: &Path) -> Result<Self, DisorderError> {
        let reader = get_dynamic_reader(path)
            .map_err(|err| DisorderError::TableRead(format!("{}: {}", path.display(), err)))?;

        let mut lines = reader.lines();
        let header = lines
            .next()
            .ok_or_else(|| DisorderError::TableRead(format!("{}: empty table", path.display())))??;
        let columns: Vec<String> = header.split('\t').map(|c| c.trim().to_string()).collect();

        let find = |column: &'static str| -> Result<usize, DisorderError> {
            columns
                .iter()
                .position(|c| c == column)
                .ok_or(DisorderError::MissingColumn {
                    column,
                    table: path.display().to_string(),
                })
        };
        let uniprot_col = find("uniprot_id")?;
        let regions_col = find("disorder_regions")?;
        let id_col = columns.iter().position(|c| c == "db_id");

        let mut records = Vec::new();
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() <= uniprot_col.max(regions_col) {
                return Err(DisorderError::ParsingError(line));
            }
            records.push(DisorderRecord {
                db_id: id_col
                    .and_then(|col| parts.get(col))
                    .map(|id| id.trim().to_string()),
                uniprot_id: parts[uniprot_col].trim().to_string(),
                regions: parts[regions_col].trim().to_string(),
            });
        }

        Ok(DisorderTable { source, records })
    }

    /// Rows whose accession field contains any of the queried accessions.
    /// Substring matching, because table rows may carry compound IDs
    /// ("P12345-2", "P12345,P67890").
    fn matching<'a>(&'a self, uni_ids: &'a [&str]) -> impl Iterator<Item = &'a DisorderRecord> {
        self.records
            .iter()
            .filter(|record| uni_ids.iter().any(|id| record.uniprot_id.contains(id)))
    }
}

///
/// Disorder regions gathered for a set of accessions, with the identifiers
/// of the contributing database records.
///
#[derive(Debug, Clone, Default)]
pub struct DisorderAnnotation {
    /// Merged, length-filtered regions in UniProt numbering.
    pub regions: Vec<ResidueInterval>,
    pub disprot_ids: Vec<String>,
    pub ideal_ids: Vec<String>,
    pub mobidb_ids: Vec<String>,
}

///
/// An explicitly constructed lookup over the three disorder reference
/// databases. Build it once per run with [DisorderDb::from_paths] and pass
/// it to whatever needs disorder annotations.
///
#[derive(Debug, Clone)]
pub struct DisorderDb {
    disprot: DisorderTable,
    ideal: DisorderTable,
    mobidb: DisorderTable,
}

impl DisorderDb {
    ///
    /// Load the three annotation tables.
    ///
    /// # Arguments:
    /// - `disprot`: path to the DisProt table
    /// - `ideal`: path to the IDEAL table
    /// - `mobidb`: path to the MobiDB table
    ///
    pub fn from_paths(disprot: &Path, ideal: &Path, mobidb: &Path) -> Result<Self, DisorderError> {
        let disprot = DisorderTable::from_path(DisorderSource::DisProt, disprot)?;
        let ideal = DisorderTable::from_path(DisorderSource::Ideal, ideal)?;
        let mobidb = DisorderTable::from_path(DisorderSource::MobiDb, mobidb)?;

        info!(
            "loaded disorder tables: {} DisProt, {} IDEAL, {} MobiDB records",
            disprot.records.len(),
            ideal.records.len(),
            mobidb.records.len()
        );

        Ok(DisorderDb {
            disprot,
            ideal,
            mobidb,
        })
    }

    ///
    /// The merged disorder regions for the given accessions, keeping only
    /// regions at least `min_len` residues wide. No matching annotation
    /// yields an empty set, not an error.
    ///
    pub fn regions_for(
        &self,
        uni_ids: &[&str],
        min_len: u32,
    ) -> Result<Vec<ResidueInterval>, DisorderError> {
        Ok(self.annotations_for(uni_ids, min_len)?.regions)
    }

    ///
    /// As [DisorderDb::regions_for], also reporting which database records
    /// contributed. MobiDB rows carry no identifier of their own, so their
    /// hits report the row's accession.
    ///
    pub fn annotations_for(
        &self,
        uni_ids: &[&str],
        min_len: u32,
    ) -> Result<DisorderAnnotation, DisorderError> {
        let mut raw_regions: Vec<&str> = Vec::new();
        let mut annotation = DisorderAnnotation::default();

        for table in [&self.disprot, &self.ideal, &self.mobidb] {
            for record in table.matching(uni_ids) {
                if !record.regions.is_empty() {
                    raw_regions.push(&record.regions);
                }
                match table.source {
                    DisorderSource::DisProt => {
                        annotation.disprot_ids.extend(record.db_id.clone());
                    }
                    DisorderSource::Ideal => {
                        annotation.ideal_ids.extend(record.db_id.clone());
                    }
                    DisorderSource::MobiDb => {
                        annotation.mobidb_ids.push(
                            record
                                .db_id
                                .clone()
                                .unwrap_or_else(|| record.uniprot_id.clone()),
                        );
                    }
                }
            }
        }

        if !raw_regions.is_empty() {
            annotation.regions = consolidate_regions(&raw_regions.join(","), min_len)?;
        }
        Ok(annotation)
    }
}
