use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use fxhash::FxHashSet;

use crate::errors::MappingError;
use crate::models::interval::ResidueInterval;
use crate::models::token::{PosToken, RawPos};

///
/// Normalize a stream of heterogeneous raw position values into tokens.
/// Output length always equals input length; no errors escape (degenerate
/// values become [PosToken::Empty]).
///
pub fn normalize_positions(values: &[RawPos]) -> Vec<PosToken> {
    values.iter().map(PosToken::from_raw).collect()
}

/// Count the missing residues in a token stream.
pub fn count_missing(positions: &[PosToken]) -> usize {
    positions.iter().filter(|token| token.is_missing()).count()
}

///
/// Drop every `Missing` token from a position stream, preserving order.
/// `Empty` tokens are not missing and survive.
///
pub fn strip_missing(positions: &[PosToken]) -> Vec<PosToken> {
    positions
        .iter()
        .copied()
        .filter(|token| !token.is_missing())
        .collect()
}

/// As [strip_missing], also returning the surviving original indices.
pub fn strip_missing_indexed(positions: &[PosToken]) -> (Vec<PosToken>, Vec<usize>) {
    let mut stripped = Vec::with_capacity(positions.len());
    let mut indices = Vec::with_capacity(positions.len());
    for (idx, token) in positions.iter().enumerate() {
        if !token.is_missing() {
            stripped.push(*token);
            indices.push(idx);
        }
    }
    (stripped, indices)
}

///
/// Fragment a position stream into its contiguous non-missing runs.
///
/// A run is flushed whenever one or more `Missing` tokens are hit, or at
/// the end of the stream. Empty runs are never emitted.
///
/// ```
/// use resmap_core::models::PosToken;
/// use resmap_core::utils::split_at_missing;
///
/// let stream = [
///     PosToken::Missing,
///     PosToken::Residue(1),
///     PosToken::Residue(2),
///     PosToken::Missing,
///     PosToken::Residue(8),
/// ];
/// let runs = split_at_missing(&stream);
/// assert_eq!(runs.len(), 2);
/// ```
///
pub fn split_at_missing(positions: &[PosToken]) -> Vec<Vec<PosToken>> {
    let (runs, _) = split_at_missing_indexed(positions);
    runs
}

/// As [split_at_missing], also returning the original indices of each run.
pub fn split_at_missing_indexed(positions: &[PosToken]) -> (Vec<Vec<PosToken>>, Vec<Vec<usize>>) {
    let mut runs = Vec::new();
    let mut index_runs = Vec::new();
    let mut run = Vec::new();
    let mut run_indices = Vec::new();

    for (idx, token) in positions.iter().enumerate() {
        if token.is_missing() {
            if !run.is_empty() {
                runs.push(std::mem::take(&mut run));
                index_runs.push(std::mem::take(&mut run_indices));
            }
        } else {
            run.push(*token);
            run_indices.push(idx);
        }
    }
    if !run.is_empty() {
        runs.push(run);
        index_runs.push(run_indices);
    }

    (runs, index_runs)
}

/// What to substitute for a query position absent from the target in
/// [fill_missing].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillValue {
    /// Substitute the missing marker.
    Null,
    /// Substitute the query position itself.
    FromQuery,
}

///
/// Re-express `target_pos` on the `query_pos` reference frame, substituting
/// for every query position that the target lacks.
///
/// The output always has exactly one token per query position.
///
/// ```
/// use resmap_core::models::PosToken;
/// use resmap_core::utils::{fill_missing, FillValue};
///
/// let query: Vec<u32> = (11..=18).collect();
/// let filled = fill_missing(&query, &[14, 15, 16, 17, 18], FillValue::Null);
/// assert_eq!(filled[..3], [PosToken::Missing, PosToken::Missing, PosToken::Missing]);
/// assert_eq!(filled[3], PosToken::Residue(14));
/// ```
///
pub fn fill_missing(query_pos: &[u32], target_pos: &[u32], fill: FillValue) -> Vec<PosToken> {
    let present: FxHashSet<u32> = target_pos.iter().copied().collect();

    query_pos
        .iter()
        .map(|&pos| {
            if present.contains(&pos) {
                PosToken::Residue(pos)
            } else {
                match fill {
                    FillValue::Null => PosToken::Missing,
                    FillValue::FromQuery => PosToken::Residue(pos),
                }
            }
        })
        .collect()
}

///
/// Align a value stream onto a reference frame.
///
/// `target` carries one value per entry of `target_pos` (positions in the
/// query's numbering, in query order). The result carries one token per
/// entry of `query_pos`: the matching target value where the query has
/// that position, `Missing` wherever the query has a gap or the target
/// lacks the query's position.
///
/// # Errors
/// - [MappingError::TargetLengthMismatch] if `target_pos` and `target`
///   differ in length.
/// - [MappingError::LeftoverTarget] if target positions remain unconsumed
///   after the sweep; the 1:1 correspondence with the query frame would be
///   broken.
///
pub fn add_gaps(
    query_pos: &[PosToken],
    target_pos: &[PosToken],
    target: &[PosToken],
) -> Result<Vec<PosToken>, MappingError> {
    if target_pos.len() != target.len() {
        return Err(MappingError::TargetLengthMismatch {
            positions: target_pos.len(),
            values: target.len(),
        });
    }

    let mut aligned = Vec::with_capacity(query_pos.len());
    let mut next = 0;
    for query in query_pos {
        if !query.is_missing() && next < target_pos.len() && target_pos[next] == *query {
            aligned.push(target[next]);
            next += 1;
        } else {
            aligned.push(PosToken::Missing);
        }
    }

    if next != target_pos.len() {
        return Err(MappingError::LeftoverTarget(target_pos.len() - next));
    }
    Ok(aligned)
}

///
/// Sorted, de-duplicated intersection of two position sets.
///
pub fn intersection(pos_x: &[u32], pos_y: &[u32]) -> Vec<u32> {
    // Probe the longer side against a set built from the shorter one.
    let (probe, keys): (&[u32], FxHashSet<u32>) = if pos_x.len() > pos_y.len() {
        (pos_x, pos_y.iter().copied().collect())
    } else {
        (pos_y, pos_x.iter().copied().collect())
    };

    let mut common: Vec<u32> = probe
        .iter()
        .copied()
        .filter(|pos| keys.contains(pos))
        .collect();
    common.sort_unstable();
    common.dedup();
    common
}

///
/// Intersect a position set with each region in turn, returning one sorted
/// overlap list per region.
///
pub fn overlap_with_regions(positions: &[u32], regions: &[ResidueInterval]) -> Vec<Vec<u32>> {
    regions
        .iter()
        .map(|region| {
            let mut hits: Vec<u32> = positions
                .iter()
                .copied()
                .filter(|pos| region.contains(*pos))
                .collect();
            hits.sort_unstable();
            hits.dedup();
            hits
        })
        .collect()
}

///
/// Cheap span-based overlap test between two position lists, assumed
/// contiguous (no internal gaps). Only the first and last positions are
/// inspected. With `ignore_boundary`, sharing a single terminal residue
/// does not count as overlap.
///
/// Either list being empty yields `false`.
///
pub fn spans_overlap(pos1: &[u32], pos2: &[u32], ignore_boundary: bool) -> bool {
    let (Some(&start1), Some(&end1)) = (pos1.first(), pos1.last()) else {
        return false;
    };
    let (Some(&start2), Some(&end2)) = (pos2.first(), pos2.last()) else {
        return false;
    };

    let boundary: i64 = if ignore_boundary { 0 } else { 1 };
    let overlap = (end1.min(end2) as i64) - (start1.max(start2) as i64) + boundary;
    overlap > 0
}

/// Sorted, de-duplicated union of two position lists.
pub fn merge_positions(pos1: &[u32], pos2: &[u32]) -> Vec<u32> {
    let mut merged: Vec<u32> = pos1.iter().chain(pos2.iter()).copied().collect();
    merged.sort_unstable();
    merged.dedup();
    merged
}

/// Whether the merged position lists would exceed `max_len` residues.
pub fn merged_exceeds_max_len(pos1: &[u32], pos2: &[u32], max_len: usize) -> bool {
    merge_positions(pos1, pos2).len() > max_len
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}
