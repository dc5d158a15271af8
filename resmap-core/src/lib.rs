//! # resmap-core
//!
//! Residue-numbering reconciliation between protein structure and sequence
//! coordinate systems.
//!
//! A protein chain carries two independent numberings: the one in its PDB
//! coordinate file (gappy, need not start at 1) and the one of its UniProt
//! sequence record (contiguous from 1). Preparing structure-derived
//! datasets for machine learning means constantly translating between the
//! two while keeping per-residue streams aligned. This crate holds the
//! data model and algorithms for that:
//!
//! - **[models::PosToken]** / normalization: one canonical representation
//!   for "a residue position or an explicit gap", replacing the int/float/
//!   string/NaN soup found in raw mapper output.
//! - **[models::CoordinateMapping]**: basis conversion of position lists
//!   between PDB and UniProt numbering, with gap propagation.
//! - **[models::ResidueInterval]**: interval extraction, merging, and
//!   consolidation of region-list strings.
//! - **[utils]**: null stripping, gap filling, and overlap bookkeeping
//!   over position streams.
//!
//! Everything here is pure and synchronous: each call owns its inputs and
//! allocates fresh outputs, so independent call sites can run concurrently
//! without locking.
//!
//! ## Example
//!
//! ```rust
//! use resmap_core::models::{CoordinateMapping, Direction, RawPos};
//! use resmap_core::utils::normalize_positions;
//!
//! // Two parallel SIFTS streams for one chain; the first two residues are
//! // unresolved in the structure.
//! let pdb = [RawPos::Null, RawPos::Null, RawPos::Int(3), RawPos::Int(4)];
//! let uni = [RawPos::Int(21), RawPos::Int(22), RawPos::Int(23), RawPos::Int(24)];
//! let mapping = CoordinateMapping::from_raw(&pdb, &uni).unwrap();
//!
//! let target = normalize_positions(&[RawPos::Int(3), RawPos::Null]);
//! let converted = mapping.change_basis(&target, Direction::PdbToUniprot).unwrap();
//! assert_eq!(converted[0].residue(), Some(23));
//! assert!(converted[1].is_missing());
//! ```
//!
pub mod errors;
pub mod models;
pub mod utils;
