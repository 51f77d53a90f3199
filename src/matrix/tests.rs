//! Row-Based Matrix Tests
//!
//! Validates lazy materialization, elementwise operations and reductions.
//!
//! ## Test Scopes
//! - **Access**: get/set, bounds, materialization on write only.
//! - **Elementwise**: row, broadcast, matrix and unary forms, in-place vs fresh.
//! - **Reductions**: NaN for unmaterialized rows, whole-matrix min/max.
//! - **Copy**: deep copies that preserve unmaterialized rows.
//! - **Concurrency**: racing first writers materialize a row exactly once.

#[cfg(test)]
mod tests {
    use crate::error::PsError;
    use crate::executor::{Binary, Unary};
    use crate::matrix::{DoubleMatrix, IntMatrix, RowBasedMatrix};
    use crate::vector::{Row, StorageKind};
    use proptest::prelude::*;

    // ============================================================
    // ACCESS TESTS
    // ============================================================

    #[test]
    fn test_set_then_get_on_unmaterialized_int_matrix() {
        let m = IntMatrix::new(1, 0, 10, 10);

        m.set(5, 3, 7).unwrap();

        assert_eq!(m.get(5, 3).unwrap(), 7);
        assert_eq!(m.get(5, 2).unwrap(), 0);
        let row = m.get_row(5).unwrap().expect("row 5 materialized");
        assert_eq!(row.kind(), StorageKind::Sparse);
        assert_eq!(row.size(), 1);
    }

    #[test]
    fn test_get_does_not_materialize() {
        let m = IntMatrix::new(1, 0, 3, 3);

        assert_eq!(m.get(2, 2).unwrap(), 0);
        assert!(!m.is_materialized(2).unwrap());
        assert_eq!(m.materialized_count(), 0);
    }

    #[test]
    fn test_out_of_range() {
        let m = IntMatrix::new(1, 0, 2, 4);

        assert_eq!(
            m.get(2, 0).unwrap_err(),
            PsError::OutOfRange {
                axis: "row",
                index: 2,
                bound: 2
            }
        );
        assert_eq!(
            m.set(0, 4, 1).unwrap_err(),
            PsError::OutOfRange {
                axis: "column",
                index: 4,
                bound: 4
            }
        );
        assert!(!m.is_materialized(0).unwrap());
    }

    #[test]
    fn test_init_empty_reports_first_allocation_only() {
        let m = DoubleMatrix::new(0, 0, 2, 2);

        assert!(m.init_empty(1).unwrap());
        assert!(!m.init_empty(1).unwrap());
        assert!(m.is_materialized(1).unwrap());
    }

    #[test]
    fn test_materialized_row_carries_identity() {
        let m = IntMatrix::new(42, 7, 3, 5);
        m.set(2, 0, 1).unwrap();

        let row = m.get_row(2).unwrap().unwrap();
        assert_eq!((row.matrix_id(), row.row_id(), row.clock(), row.dim()), (42, 2, 7, 5));
    }

    #[test]
    fn test_from_rows_takes_cols_from_first_row() {
        let m = RowBasedMatrix::from_rows(3, 1, vec![Row::vector(vec![1, 2, 3]), Row::vector(vec![4, 5, 6])]).unwrap();

        assert_eq!((m.num_rows(), m.num_cols()), (2, 3));
        assert_eq!(m.get(1, 2).unwrap(), 6);
        assert_eq!(m.get_row(1).unwrap().unwrap().row_id(), 1);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let err = RowBasedMatrix::from_rows(3, 1, vec![Row::vector(vec![1, 2]), Row::vector(vec![1])]).unwrap_err();
        assert!(matches!(err, PsError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_set_row_dimension_mismatch() {
        let m = IntMatrix::new(1, 0, 2, 3);
        let err = m.set_row(0, Row::vector(vec![1, 2])).unwrap_err();

        assert_eq!(
            err,
            PsError::DimensionMismatch {
                what: "row dimension",
                expected: 3,
                actual: 2
            }
        );
        assert!(!m.is_materialized(0).unwrap());
    }

    #[test]
    fn test_set_rows_is_all_or_nothing() {
        let mut m = IntMatrix::new(1, 0, 2, 2);
        m.set(0, 0, 9).unwrap();

        let err = m.set_rows(vec![Row::vector(vec![1, 1]), Row::vector(vec![1, 1, 1])]);
        assert!(err.is_err());
        assert_eq!(m.get(0, 0).unwrap(), 9);

        m.set_rows(vec![Row::vector(vec![1, 2]), Row::vector(vec![3, 4])]).unwrap();
        assert_eq!(m.get(1, 0).unwrap(), 3);
    }

    #[test]
    fn test_diag() {
        let m = IntMatrix::new(1, 0, 4, 3);
        m.set(0, 0, 5).unwrap();
        m.set(2, 2, 8).unwrap();

        let diag = m.diag();
        assert_eq!(diag.kind(), StorageKind::Dense);
        assert_eq!(diag.to_dense(), vec![5, 0, 8]);
    }

    // ============================================================
    // ELEMENTWISE TESTS
    // ============================================================

    #[test]
    fn test_inplace_broadcast_add_materializes_rows() {
        let m = IntMatrix::new(1, 0, 2, 4);
        m.set(0, 2, 5).unwrap();

        let ones = Row::vector(vec![1; 4]);
        let result = m.elementwise_vector(&ones, &Binary::add(true)).unwrap();

        assert!(result.is_inplace());
        assert_eq!(m.get_row(0).unwrap().unwrap().to_dense(), vec![1, 1, 6, 1]);
        assert_eq!(m.get_row(1).unwrap().unwrap().to_dense(), vec![1, 1, 1, 1]);
        assert!(m.is_materialized(1).unwrap());
    }

    #[test]
    fn test_broadcast_not_inplace_leaves_source() {
        let m = IntMatrix::new(9, 3, 2, 2);
        m.set(0, 0, 2).unwrap();

        let result = m.elementwise_vector(&Row::vector(vec![3, 3]), &Binary::mul(false)).unwrap();

        assert!(!result.is_inplace());
        assert_eq!(result.get(0, 0).unwrap(), 6);
        assert_eq!(m.get(0, 0).unwrap(), 2);
        assert_eq!((result.matrix_id(), result.clock()), (9, 3));
    }

    #[test]
    fn test_broadcast_rejects_wrong_dimension_before_mutating() {
        let m = IntMatrix::new(1, 0, 2, 3);
        let err = m.elementwise_vector(&Row::vector(vec![1, 1]), &Binary::add(true)).unwrap_err();

        assert!(matches!(err, PsError::DimensionMismatch { .. }));
        assert_eq!(m.materialized_count(), 0);
    }

    #[test]
    fn test_single_row_not_inplace_keeps_other_rows_in_their_slots() {
        let m = IntMatrix::new(1, 0, 4, 2);
        m.set(0, 0, 10).unwrap();
        m.set(3, 1, 30).unwrap();

        let result = m.elementwise_row(1, &Row::vector(vec![1, 2]), &Binary::add(false)).unwrap();

        assert_eq!(result.get(0, 0).unwrap(), 10);
        assert_eq!(result.get(1, 0).unwrap(), 1);
        assert_eq!(result.get(1, 1).unwrap(), 2);
        assert!(!result.is_materialized(2).unwrap());
        assert_eq!(result.get(3, 1).unwrap(), 30);
    }

    #[test]
    fn test_single_row_inplace_only_touches_target() {
        let m = IntMatrix::new(1, 0, 3, 2);
        let result = m.elementwise_row(2, &Row::vector(vec![4, 4]), &Binary::add(true)).unwrap();

        assert!(result.is_inplace());
        assert_eq!(m.get(2, 1).unwrap(), 4);
        assert!(!m.is_materialized(0).unwrap());
        assert!(!m.is_materialized(1).unwrap());
    }

    #[test]
    fn test_matrix_add_materializes_both_sides() {
        let a = IntMatrix::new(1, 0, 2, 3);
        let b = IntMatrix::new(2, 0, 2, 3);
        a.set(0, 1, 4).unwrap();
        b.set(1, 2, 6).unwrap();

        let result = a.elementwise_matrix(&b, &Binary::add(false)).unwrap();

        assert_eq!(result.get(0, 1).unwrap(), 4);
        assert_eq!(result.get(1, 2).unwrap(), 6);
        assert_eq!(result.matrix_id(), 1);
        assert_eq!(a.materialized_count(), 2);
        assert_eq!(b.materialized_count(), 2);
    }

    #[test]
    fn test_matrix_inplace_with_itself() {
        let m = IntMatrix::new(1, 0, 2, 2);
        m.set(0, 0, 3).unwrap();

        m.elementwise_matrix(&m, &Binary::add(true)).unwrap();

        assert_eq!(m.get(0, 0).unwrap(), 6);
    }

    #[test]
    fn test_matrix_shape_mismatch() {
        let a = IntMatrix::new(1, 0, 2, 3);
        let b = IntMatrix::new(1, 0, 3, 3);
        let c = IntMatrix::new(1, 0, 2, 4);

        assert!(a.elementwise_matrix(&b, &Binary::add(false)).is_err());
        assert!(a.elementwise_matrix(&c, &Binary::add(false)).is_err());
    }

    #[test]
    fn test_unary_inplace_and_fresh() {
        let m = DoubleMatrix::new(1, 0, 2, 2);
        m.set(0, 1, -2.0).unwrap();

        let fresh = m.elementwise_unary(&Unary::abs(false));
        assert_eq!(fresh.get(0, 1).unwrap(), 2.0);
        assert_eq!(m.get(0, 1).unwrap(), -2.0);

        m.elementwise_unary(&Unary::scalar_add(1.0, true));
        assert_eq!(m.get(0, 1).unwrap(), -1.0);
        assert_eq!(m.get(1, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_applied_into_owned_copies_inplace_result() {
        let m = IntMatrix::new(1, 0, 1, 1);
        let owned = m.elementwise_unary(&Unary::scalar_add(1.0, true)).into_owned();

        m.set(0, 0, 5).unwrap();
        assert_eq!(owned.get(0, 0).unwrap(), 1);
    }

    // ============================================================
    // REDUCTION TESTS
    // ============================================================

    #[test]
    fn test_unmaterialized_rows_reduce_to_nan() {
        let m = DoubleMatrix::new(1, 0, 3, 2);
        m.set(0, 0, 1.0).unwrap();
        m.set(0, 1, 3.0).unwrap();
        m.init_empty(2).unwrap();

        let min = m.min_axis(1).unwrap().to_dense();
        let max = m.max_axis(1).unwrap().to_dense();
        let sum = m.sum_axis(1).unwrap().to_dense();
        let avg = m.average_axis(1).unwrap().to_dense();

        assert_eq!((min[0], max[0], sum[0], avg[0]), (1.0, 3.0, 4.0, 2.0));
        assert!(min[1].is_nan() && max[1].is_nan() && sum[1].is_nan());
        assert!(m.std_axis(1).unwrap().to_dense()[1].is_nan());
        assert!(m.norm_axis(1).unwrap().to_dense()[1].is_nan());
        // A materialized but empty row has data: its sum is zero.
        assert_eq!(sum[2], 0.0);
    }

    #[test]
    fn test_reduction_rejects_other_axes() {
        let m = IntMatrix::new(1, 0, 1, 1);

        assert_eq!(m.sum_axis(0).unwrap_err(), PsError::UnsupportedAxis { axis: 0 });
        assert!(m.norm_axis(2).is_err());
    }

    #[test]
    fn test_whole_matrix_min_max() {
        let m = IntMatrix::new(1, 0, 3, 2);
        m.set(0, 0, 4).unwrap();
        m.set(0, 1, 9).unwrap();
        m.set(2, 0, -3).unwrap();
        m.set(2, 1, 2).unwrap();

        assert_eq!(m.min(), -3.0);
        assert_eq!(m.max(), 9.0);
    }

    #[test]
    fn test_whole_matrix_min_max_without_rows_is_nan() {
        let m = IntMatrix::new(1, 0, 3, 2);

        assert!(m.min().is_nan());
        assert!(m.max().is_nan());
    }

    // ============================================================
    // COPY TESTS
    // ============================================================

    #[test]
    fn test_copy_preserves_unmaterialized_rows() {
        let m = IntMatrix::new(1, 0, 3, 3);
        m.set(1, 1, 2).unwrap();

        let copy = m.copy();

        assert!(!copy.is_materialized(0).unwrap());
        assert!(copy.is_materialized(1).unwrap());
        copy.set(1, 1, 5).unwrap();
        assert_eq!(m.get(1, 1).unwrap(), 2);
    }

    // ============================================================
    // CONCURRENCY TESTS
    // ============================================================

    #[test]
    fn test_racing_writers_materialize_once() {
        let m = IntMatrix::new(1, 0, 1, 64);

        let allocations: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| usize::from(m.init_empty(0).unwrap())))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(allocations, 1);
    }

    #[test]
    fn test_concurrent_writers_on_one_row_lose_nothing() {
        let m = IntMatrix::new(1, 0, 1, 64);

        std::thread::scope(|s| {
            for t in 0..8 {
                let m = &m;
                s.spawn(move || {
                    for j in (t..64).step_by(8) {
                        m.set(0, j, j as i32 + 1).unwrap();
                    }
                });
            }
        });

        let row = m.get_row(0).unwrap().unwrap();
        assert_eq!(row.size(), 64);
        assert_eq!(m.get(0, 63).unwrap(), 64);
    }

    // ============================================================
    // PROPERTY TESTS
    // ============================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_copy_is_deep(
            writes in prop::collection::vec((0usize..6, 0usize..5, -9i32..9), 0..30),
        ) {
            let m = IntMatrix::new(1, 0, 6, 5);
            for (i, j, v) in &writes {
                m.set(*i, *j, *v).unwrap();
            }

            let copy = m.copy();
            for i in 0..6 {
                prop_assert_eq!(copy.is_materialized(i).unwrap(), m.is_materialized(i).unwrap());
                for j in 0..5 {
                    prop_assert_eq!(copy.get(i, j).unwrap(), m.get(i, j).unwrap());
                }
            }

            copy.elementwise_unary(&Unary::scalar_add(100.0, true));
            for i in 0..6 {
                for j in 0..5 {
                    prop_assert!(m.get(i, j).unwrap() < 100);
                }
            }
        }
    }
}
