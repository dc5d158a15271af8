use crate::errors::MappingError;
use crate::models::token::{PosToken, RawPos};
use crate::utils::normalize_positions;

/// Direction of a basis conversion between the two numbering systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    PdbToUniprot,
    UniprotToPdb,
}

///
/// A per-chain correspondence between PDB and UniProt residue numbering,
/// as produced by an external structure-to-sequence mapper (SIFTS or
/// PDBSWS). The two token streams are parallel: `pdb[i]` and `uni[i]`
/// denote the same physical residue, and either side may be missing at a
/// given index. Immutable once constructed.
///
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapping {
    pdb: Vec<PosToken>,
    uni: Vec<PosToken>,
}

impl CoordinateMapping {
    ///
    /// Create a mapping from two already-normalized token streams.
    /// Streams of unequal length are rejected.
    ///
    pub fn new(pdb: Vec<PosToken>, uni: Vec<PosToken>) -> Result<Self, MappingError> {
        if pdb.len() != uni.len() {
            return Err(MappingError::StreamLengthMismatch {
                pdb: pdb.len(),
                uniprot: uni.len(),
            });
        }
        Ok(CoordinateMapping { pdb, uni })
    }

    /// Create a mapping straight from raw mapper output, normalizing both
    /// streams first.
    pub fn from_raw(pdb: &[RawPos], uni: &[RawPos]) -> Result<Self, MappingError> {
        Self::new(normalize_positions(pdb), normalize_positions(uni))
    }

    /// Number of residues covered by the mapping.
    pub fn len(&self) -> usize {
        self.pdb.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pdb.is_empty()
    }

    pub fn pdb(&self) -> &[PosToken] {
        &self.pdb
    }

    pub fn uniprot(&self) -> &[PosToken] {
        &self.uni
    }

    /// (source, destination) streams for the given direction.
    fn oriented(&self, direction: Direction) -> (&[PosToken], &[PosToken]) {
        match direction {
            Direction::PdbToUniprot => (&self.pdb, &self.uni),
            Direction::UniprotToPdb => (&self.uni, &self.pdb),
        }
    }

    ///
    /// Re-express `target` in the other numbering system.
    ///
    /// Each `Missing` target token stays `Missing`: the conversion never
    /// invents a position for a residue absent from the structure. Every
    /// other token is located in the source-side stream and replaced by
    /// the destination-side token at the same index.
    ///
    /// # Arguments:
    /// - `target`: positions to convert, expressed in the source system
    /// - `direction`: [Direction::PdbToUniprot] or [Direction::UniprotToPdb]
    ///
    /// # Errors
    /// [MappingError::PositionNotFound] if a target token is absent from
    /// the source stream. That signals an upstream data-quality bug and is
    /// never masked with a default.
    ///
    pub fn change_basis(
        &self,
        target: &[PosToken],
        direction: Direction,
    ) -> Result<Vec<PosToken>, MappingError> {
        let (source, dest) = self.oriented(direction);

        let mut converted = Vec::with_capacity(target.len());
        for token in target {
            if token.is_missing() {
                converted.push(PosToken::Missing);
                continue;
            }
            let idx = source
                .iter()
                .position(|mapped| mapped == token)
                .ok_or(MappingError::PositionNotFound(*token))?;
            converted.push(dest[idx]);
        }

        Ok(converted)
    }

    ///
    /// Index-driven variant of [CoordinateMapping::change_basis] for
    /// callers that already know their alignment indices into the mapping.
    ///
    /// `target` must have had all `Missing` tokens stripped beforehand
    /// (see `utils::strip_missing_indexed`, which also yields the index
    /// list); any remaining one is a fatal [MappingError::InvalidTarget].
    ///
    pub fn change_basis_by_index(
        &self,
        target: &[PosToken],
        indices: &[usize],
        direction: Direction,
    ) -> Result<Vec<PosToken>, MappingError> {
        let (_, dest) = self.oriented(direction);

        if let Some(bad) = target.iter().find(|token| token.is_missing()) {
            return Err(MappingError::InvalidTarget(*bad));
        }

        indices
            .iter()
            .map(|&index| {
                dest.get(index)
                    .copied()
                    .ok_or(MappingError::IndexOutOfBounds {
                        index,
                        len: dest.len(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn tokens(raw: &[RawPos]) -> Vec<PosToken> {
        normalize_positions(raw)
    }

    #[fixture]
    fn gappy_mapping() -> CoordinateMapping {
        // PDB side has unresolved residues; UniProt side is contiguous.
        let pdb = tokens(&[
            RawPos::Null,
            RawPos::Null,
            RawPos::Null,
            RawPos::Int(11),
            RawPos::Int(12),
            RawPos::Int(13),
            RawPos::Null,
            RawPos::Null,
            RawPos::Int(16),
            RawPos::Int(17),
            RawPos::Int(18),
            RawPos::Int(19),
            RawPos::Int(20),
        ]);
        let uni = tokens(&(35..=47).map(RawPos::Int).collect::<Vec<_>>());
        CoordinateMapping::new(pdb, uni).unwrap()
    }

    #[fixture]
    fn full_mapping() -> CoordinateMapping {
        let pdb = tokens(&(8..=20).map(RawPos::Int).collect::<Vec<_>>());
        let uni = tokens(&(35..=47).map(RawPos::Int).collect::<Vec<_>>());
        CoordinateMapping::new(pdb, uni).unwrap()
    }

    #[rstest]
    fn test_change_basis_forward_propagates_gaps(gappy_mapping: CoordinateMapping) {
        let converted = gappy_mapping
            .change_basis(gappy_mapping.pdb(), Direction::PdbToUniprot)
            .unwrap();
        let expected = tokens(&[
            RawPos::Null,
            RawPos::Null,
            RawPos::Null,
            RawPos::Int(38),
            RawPos::Int(39),
            RawPos::Int(40),
            RawPos::Null,
            RawPos::Null,
            RawPos::Int(43),
            RawPos::Int(44),
            RawPos::Int(45),
            RawPos::Int(46),
            RawPos::Int(47),
        ]);
        assert_eq!(converted, expected);
    }

    #[rstest]
    fn test_change_basis_reverse(gappy_mapping: CoordinateMapping) {
        let forward = gappy_mapping
            .change_basis(gappy_mapping.pdb(), Direction::PdbToUniprot)
            .unwrap();
        let back = gappy_mapping
            .change_basis(&forward[2..9], Direction::UniprotToPdb)
            .unwrap();
        let expected = tokens(&[
            RawPos::Null,
            RawPos::Int(11),
            RawPos::Int(12),
            RawPos::Int(13),
            RawPos::Null,
            RawPos::Null,
            RawPos::Int(16),
        ]);
        assert_eq!(back, expected);
    }

    #[rstest]
    fn test_change_basis_round_trip(full_mapping: CoordinateMapping) {
        // With no missing values in the mapping, forward then reverse is
        // the identity on any target drawn from the mapped domain.
        let target: Vec<PosToken> = [10u32, 11, 14, 20].map(PosToken::from).to_vec();
        let forward = full_mapping
            .change_basis(&target, Direction::PdbToUniprot)
            .unwrap();
        let back = full_mapping
            .change_basis(&forward, Direction::UniprotToPdb)
            .unwrap();
        assert_eq!(back, target);
    }

    #[rstest]
    fn test_change_basis_position_not_found(full_mapping: CoordinateMapping) {
        let err = full_mapping
            .change_basis(&[PosToken::Residue(999)], Direction::PdbToUniprot)
            .unwrap_err();
        assert!(matches!(
            err,
            MappingError::PositionNotFound(PosToken::Residue(999))
        ));
    }

    #[rstest]
    fn test_change_basis_by_index(full_mapping: CoordinateMapping) {
        let target: Vec<PosToken> = (8u32..=20).map(PosToken::from).collect();
        let indices: Vec<usize> = (0..full_mapping.len()).collect();

        let converted = full_mapping
            .change_basis_by_index(&target, &indices, Direction::PdbToUniprot)
            .unwrap();
        let expected: Vec<PosToken> = (35u32..=47).map(PosToken::from).collect();
        assert_eq!(converted, expected);

        let back = full_mapping
            .change_basis_by_index(&converted[2..9], &indices[2..9], Direction::UniprotToPdb)
            .unwrap();
        let expected: Vec<PosToken> = (10u32..=16).map(PosToken::from).collect();
        assert_eq!(back, expected);
    }

    #[rstest]
    fn test_change_basis_by_index_rejects_missing(full_mapping: CoordinateMapping) {
        let err = full_mapping
            .change_basis_by_index(&[PosToken::Missing], &[0], Direction::PdbToUniprot)
            .unwrap_err();
        assert!(matches!(err, MappingError::InvalidTarget(PosToken::Missing)));
    }

    #[rstest]
    fn test_change_basis_by_index_out_of_bounds(full_mapping: CoordinateMapping) {
        let err = full_mapping
            .change_basis_by_index(&[PosToken::Residue(8)], &[99], Direction::PdbToUniprot)
            .unwrap_err();
        assert!(matches!(
            err,
            MappingError::IndexOutOfBounds { index: 99, len: 13 }
        ));
    }

    #[rstest]
    fn test_unequal_streams_rejected() {
        let err = CoordinateMapping::new(vec![PosToken::Residue(1)], vec![]).unwrap_err();
        assert!(matches!(
            err,
            MappingError::StreamLengthMismatch { pdb: 1, uniprot: 0 }
        ));
    }
}
