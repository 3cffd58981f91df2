//! Polynomial basis terms and the design matrix
//!
//! The cost models fitted by this toolkit are polynomials in the number of
//! task-local values `v` and the number of objects `o`, drawn from a fixed
//! vocabulary:
//!
//! | Name  | Column   | Rendered |
//! |-------|----------|----------|
//! | `1`   | 1        | `c`      |
//! | `o`   | o        | `c⋅o`    |
//! | `o2`  | o²       | `c⋅o²`   |
//! | `v`   | v        | `c⋅v`    |
//! | `vo`  | v·o      | `c⋅v⋅o`  |
//! | `vo2` | v·o²     | `c⋅v⋅o²` |

use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;

use crate::error::{AnalysisError, Result};

/// One named transform of `(values, objects)` into a design-matrix column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasisTerm {
    /// `1`
    Constant,
    /// `o`
    Objects,
    /// `o2`
    ObjectsSquared,
    /// `v`
    Values,
    /// `vo`
    ValuesObjects,
    /// `vo2`
    ValuesObjectsSquared,
}

impl BasisTerm {
    /// The whole vocabulary, in lookup order
    pub const ALL: [BasisTerm; 6] = [
        BasisTerm::Constant,
        BasisTerm::Objects,
        BasisTerm::ObjectsSquared,
        BasisTerm::Values,
        BasisTerm::ValuesObjects,
        BasisTerm::ValuesObjectsSquared,
    ];

    /// Default term list, highest order first
    pub const DEFAULT: [BasisTerm; 6] = [
        BasisTerm::ValuesObjectsSquared,
        BasisTerm::ValuesObjects,
        BasisTerm::Values,
        BasisTerm::ObjectsSquared,
        BasisTerm::Objects,
        BasisTerm::Constant,
    ];

    /// Short name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            BasisTerm::Constant => "1",
            BasisTerm::Objects => "o",
            BasisTerm::ObjectsSquared => "o2",
            BasisTerm::Values => "v",
            BasisTerm::ValuesObjects => "vo",
            BasisTerm::ValuesObjectsSquared => "vo2",
        }
    }

    /// Text appended after the coefficient when rendering an equation
    pub fn fragment(&self) -> &'static str {
        match self {
            BasisTerm::Constant => "",
            BasisTerm::Objects => "⋅o",
            BasisTerm::ObjectsSquared => "⋅o²",
            BasisTerm::Values => "⋅v",
            BasisTerm::ValuesObjects => "⋅v⋅o",
            BasisTerm::ValuesObjectsSquared => "⋅v⋅o²",
        }
    }

    /// Value of the term at one point
    pub fn evaluate(&self, values: f64, objects: f64) -> f64 {
        match self {
            BasisTerm::Constant => 1.0,
            BasisTerm::Objects => objects,
            BasisTerm::ObjectsSquared => objects * objects,
            BasisTerm::Values => values,
            BasisTerm::ValuesObjects => values * objects,
            BasisTerm::ValuesObjectsSquared => values * objects * objects,
        }
    }

    /// All valid names, for error messages
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.name()).collect()
    }

    /// Comma-separated names, the inverse of [`BasisTerm::parse_list`]
    pub fn join_names(terms: &[BasisTerm]) -> String {
        terms.iter().map(|t| t.name()).collect::<Vec<_>>().join(",")
    }

    /// Parse a comma-separated list such as `vo2,vo,v,o2,o,1`
    ///
    /// Order is kept and duplicates are passed through; a duplicate makes the
    /// design matrix singular, which the engine reports.
    pub fn parse_list(list: &str) -> Result<Vec<BasisTerm>> {
        let terms = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse::<BasisTerm>)
            .collect::<Result<Vec<_>>>()?;

        if terms.is_empty() {
            return Err(AnalysisError::InvalidArgument(format!(
                "no basis terms in {:?}",
                list
            )));
        }
        Ok(terms)
    }
}

impl FromStr for BasisTerm {
    type Err = AnalysisError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|t| t.name() == name)
            .copied()
            .ok_or_else(|| AnalysisError::UnknownTerm {
                name: name.to_string(),
                valid: Self::names(),
            })
    }
}

impl fmt::Display for BasisTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =================================================================================================
// Design matrix
// =================================================================================================

/// `[samples × terms]` matrix, column `j` holding `terms[j]` at every sample
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    pub matrix: DMatrix<f64>,
    pub terms: Vec<BasisTerm>,
}

impl DesignMatrix {
    /// Build the matrix from the `values` and `objects` columns
    pub fn build(terms: &[BasisTerm], values: &[f64], objects: &[f64]) -> Result<Self> {
        if values.len() != objects.len() {
            return Err(AnalysisError::ShapeMismatch {
                what: "objects column versus values column".to_string(),
                expected: values.len(),
                found: objects.len(),
            });
        }

        let matrix = DMatrix::from_fn(values.len(), terms.len(), |i, j| {
            terms[j].evaluate(values[i], objects[i])
        });

        Ok(Self {
            matrix,
            terms: terms.to_vec(),
        })
    }

    /// Number of samples
    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of terms
    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Display fragments, parallel to the columns
    pub fn fragments(&self) -> Vec<&'static str> {
        self.terms.iter().map(|t| t.fragment()).collect()
    }

    /// Term names, parallel to the columns
    pub fn term_names(&self) -> Vec<String> {
        self.terms.iter().map(|t| t.name().to_string()).collect()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_list() {
        let list = BasisTerm::join_names(&BasisTerm::DEFAULT);
        assert_eq!(list, "vo2,vo,v,o2,o,1");

        let terms = BasisTerm::parse_list(&list).unwrap();
        assert_eq!(
            terms,
            vec![
                BasisTerm::ValuesObjectsSquared,
                BasisTerm::ValuesObjects,
                BasisTerm::Values,
                BasisTerm::ObjectsSquared,
                BasisTerm::Objects,
                BasisTerm::Constant,
            ]
        );
    }

    #[test]
    fn test_parse_keeps_duplicates_and_order() {
        let terms = BasisTerm::parse_list("o, 1 ,o").unwrap();
        assert_eq!(terms, vec![BasisTerm::Objects, BasisTerm::Constant, BasisTerm::Objects]);
    }

    #[test]
    fn test_unknown_term() {
        match BasisTerm::parse_list("vo,o3") {
            Err(AnalysisError::UnknownTerm { name, valid }) => {
                assert_eq!(name, "o3");
                assert_eq!(valid, vec!["1", "o", "o2", "v", "vo", "vo2"]);
            }
            other => panic!("Expected unknown term, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_list_is_rejected() {
        assert!(matches!(
            BasisTerm::parse_list(" , "),
            Err(AnalysisError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_evaluate() {
        let (v, o) = (3.0, 4.0);
        assert_eq!(BasisTerm::Constant.evaluate(v, o), 1.0);
        assert_eq!(BasisTerm::Objects.evaluate(v, o), 4.0);
        assert_eq!(BasisTerm::ObjectsSquared.evaluate(v, o), 16.0);
        assert_eq!(BasisTerm::Values.evaluate(v, o), 3.0);
        assert_eq!(BasisTerm::ValuesObjects.evaluate(v, o), 12.0);
        assert_eq!(BasisTerm::ValuesObjectsSquared.evaluate(v, o), 48.0);
    }

    #[test]
    fn test_design_matrix_column_order_follows_terms() {
        let values = [1.0, 2.0];
        let objects = [3.0, 5.0];
        let design = DesignMatrix::build(
            &[BasisTerm::ValuesObjects, BasisTerm::Constant, BasisTerm::ObjectsSquared],
            &values,
            &objects,
        )
        .unwrap();

        assert_eq!(design.nrows(), 2);
        assert_eq!(design.ncols(), 3);
        assert_eq!(design.matrix, DMatrix::from_row_slice(2, 3, &[3.0, 1.0, 9.0, 10.0, 1.0, 25.0]));
        assert_eq!(design.fragments(), vec!["⋅v⋅o", "", "⋅o²"]);
        assert_eq!(design.term_names(), vec!["vo", "1", "o2"]);
    }

    #[test]
    fn test_design_matrix_is_reproducible() {
        let values: Vec<f64> = (0..50).map(|i| (i * 7 % 13) as f64).collect();
        let objects: Vec<f64> = (0..50).map(|i| (i * 11 % 17 + 1) as f64).collect();
        let terms = BasisTerm::DEFAULT.to_vec();

        let a = DesignMatrix::build(&terms, &values, &objects).unwrap();
        let b = DesignMatrix::build(&terms, &values, &objects).unwrap();
        let bits = |m: &DesignMatrix| m.matrix.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn test_design_matrix_rejects_ragged_columns() {
        assert!(matches!(
            DesignMatrix::build(&[BasisTerm::Constant], &[1.0, 2.0], &[1.0]),
            Err(AnalysisError::ShapeMismatch { .. })
        ));
    }
}
