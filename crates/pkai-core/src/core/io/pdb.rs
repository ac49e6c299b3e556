use crate::core::io::traits::StructureFile;
use crate::core::models::atom::{Atom, element_symbol};
use crate::core::models::ids::ResidueKey;
use crate::core::models::protein::Protein;
use nalgebra::Point3;
use phf::{Set, phf_set};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// First characters of atom names that are kept: nitrogens, oxygens and sulfurs.
static RETAINED_ELEMENTS: Set<char> = phf_set! { 'N', 'O', 'S' };

const ATOM_RECORD: &str = "ATOM";

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error{}: {source}", path_suffix(.path))]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },
    #[error("Parse error{} on line {line}: {kind}", path_suffix(.path))]
    Parse {
        path: Option<PathBuf>,
        line: usize,
        kind: PdbParseErrorKind,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: &'static str, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: &'static str, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: &'static str },
    #[error("Line is too short for an ATOM record (need at least {required} columns, found {found})")]
    LineTooShort { required: usize, found: usize },
    #[error("Columns {columns} do not hold plain ASCII text")]
    NonAsciiField { columns: &'static str },
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in '{}'", p.display()))
        .unwrap_or_default()
}

impl From<io::Error> for PdbError {
    fn from(source: io::Error) -> Self {
        PdbError::Io { path: None, source }
    }
}

impl PdbError {
    /// Attaches the path of the file being read to the error.
    pub fn with_path(self, file: &Path) -> Self {
        match self {
            PdbError::Io { source, .. } => PdbError::Io {
                path: Some(file.to_path_buf()),
                source,
            },
            PdbError::Parse { line, kind, .. } => PdbError::Parse {
                path: Some(file.to_path_buf()),
                line,
                kind,
            },
        }
    }

    /// The 1-based line number of a parse error.
    pub fn line(&self) -> Option<usize> {
        match self {
            PdbError::Parse { line, .. } => Some(*line),
            PdbError::Io { .. } => None,
        }
    }
}

/// The raw fields of one `ATOM` record, before filtering.
#[derive(Debug, Clone, PartialEq)]
struct AtomRecord<'a> {
    name: &'a str,
    serial: usize,
    alt_loc: char,
    res_name: &'a str,
    chain_id: char,
    res_seq: isize,
    i_code: char,
    position: Point3<f64>,
}

impl AtomRecord<'_> {
    /// Whether the record belongs to the primary conformer of a non-inserted residue.
    fn is_primary_location(&self) -> bool {
        matches!(self.alt_loc, ' ' | 'A') && self.i_code == ' '
    }

    fn is_polar_heavy_atom(&self) -> bool {
        element_symbol(self.name).is_some_and(|c| RETAINED_ELEMENTS.contains(&c))
    }
}

const MIN_ATOM_LINE_LEN: usize = 54;

fn column<'a>(
    line: &'a str,
    start: usize,
    end: usize,
    columns: &'static str,
) -> Result<&'a str, PdbParseErrorKind> {
    if line.len() < end {
        return Err(PdbParseErrorKind::LineTooShort {
            required: end,
            found: line.len(),
        });
    }
    line.get(start..end)
        .ok_or(PdbParseErrorKind::NonAsciiField { columns })
}

fn column_char(line: &str, at: usize, columns: &'static str) -> Result<char, PdbParseErrorKind> {
    let field = column(line, at, at + 1, columns)?;
    field
        .chars()
        .next()
        .ok_or(PdbParseErrorKind::NonAsciiField { columns })
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    start: usize,
    end: usize,
    columns: &'static str,
) -> Result<T, PdbParseErrorKind> {
    let value = column(line, start, end, columns)?.trim();
    value.parse().map_err(|_| PdbParseErrorKind::InvalidInt {
        columns,
        value: value.to_string(),
    })
}

fn parse_float(
    line: &str,
    start: usize,
    end: usize,
    columns: &'static str,
) -> Result<f64, PdbParseErrorKind> {
    let value = column(line, start, end, columns)?.trim();
    value.parse().map_err(|_| PdbParseErrorKind::InvalidFloat {
        columns,
        value: value.to_string(),
    })
}

fn parse_atom_record(line: &str) -> Result<AtomRecord<'_>, PdbParseErrorKind> {
    if line.len() < MIN_ATOM_LINE_LEN {
        return Err(PdbParseErrorKind::LineTooShort {
            required: MIN_ATOM_LINE_LEN,
            found: line.len(),
        });
    }

    let name = column(line, 12, 16, "13-16")?.trim();
    if name.is_empty() {
        return Err(PdbParseErrorKind::MissingRequiredField { columns: "13-16" });
    }

    Ok(AtomRecord {
        name,
        serial: parse_int(line, 5, 11, "6-11")?,
        alt_loc: column_char(line, 16, "17")?,
        res_name: column(line, 17, 21, "18-21")?.trim(),
        chain_id: column_char(line, 21, "22")?,
        res_seq: parse_int(line, 22, 26, "23-26")?,
        i_code: column_char(line, 26, "27")?,
        position: Point3::new(
            parse_float(line, 30, 38, "31-38")?,
            parse_float(line, 38, 46, "39-46")?,
            parse_float(line, 46, 54, "47-54")?,
        ),
    })
}

fn is_atom_record(line: &str) -> bool {
    let tag = line.get(..6).unwrap_or(line);
    tag.trim_end() == ATOM_RECORD
}

/// Reader for the fixed-column PDB `ATOM` record layout.
///
/// Only `ATOM` records are consumed. A record is dropped when it describes an
/// alternate location other than blank or `A`, when it carries an insertion
/// code, or when its atom name does not start with `N`, `O` or `S`. Every
/// consumed record must still have well-formed numeric fields, even if it is
/// dropped afterwards.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Protein, Self::Error> {
        let mut protein = Protein::new();

        let mut records_read = 0usize;
        let mut skipped_locations = 0usize;
        let mut skipped_elements = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if !is_atom_record(&line) {
                continue;
            }
            records_read += 1;

            let record = parse_atom_record(&line).map_err(|kind| PdbError::Parse {
                path: None,
                line: line_num,
                kind,
            })?;

            if !record.is_primary_location() {
                skipped_locations += 1;
                continue;
            }
            if !record.is_polar_heavy_atom() {
                skipped_elements += 1;
                continue;
            }

            let key = ResidueKey::new(record.chain_id, record.res_seq);
            let (residue_id, _) = protein.add_residue(key, record.res_name);
            let atom = Atom::new(record.name, record.serial, record.position, key);

            if let Some(Some(replaced)) = protein.add_atom_to_residue(residue_id, atom) {
                warn!(
                    line = line_num,
                    serial = record.serial,
                    residue = %key,
                    replaced = %replaced.name,
                    "Duplicate atom serial within residue; keeping the later record."
                );
            }
        }

        debug!(
            records_read,
            skipped_locations,
            skipped_elements,
            residues = protein.residue_count(),
            titratable = protein.titratable_count(),
            "Finished reading PDB ATOM records."
        );

        Ok(protein)
    }

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Protein, Self::Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PdbError::from(e).with_path(path))?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader).map_err(|e| e.with_path(path))
    }
}
