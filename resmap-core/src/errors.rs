use thiserror::Error;

use crate::models::token::PosToken;

#[derive(Error, Debug)]
pub enum RegionError {
    #[error("Error parsing region: {0}")]
    Malformed(String),

    #[error("Region start {start} is past its end {end}")]
    ReversedBounds { start: u32, end: u32 },
}

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Mapped position streams differ in length: {pdb} PDB vs {uniprot} UniProt")]
    StreamLengthMismatch { pdb: usize, uniprot: usize },

    #[error("Position {0:?} not found in the mapping")]
    PositionNotFound(PosToken),

    #[error("Invalid position in target: {0:?}")]
    InvalidTarget(PosToken),

    #[error("Index {index} out of bounds for a mapping of {len} residues")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Mismatch in target length: {positions} positions vs {values} values")]
    TargetLengthMismatch { positions: usize, values: usize },

    #[error("{0} target positions left unplaced after gap filling")]
    LeftoverTarget(usize),
}
