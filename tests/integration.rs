//! End-to-end scenarios, exercising a full construct/match/substitute
//! round trip through the public API rather than any one module in
//! isolation.

use datashape_core::matcher::match_type;
use datashape_core::scalar::ScalarKind;
use datashape_core::subst::substitute;
use datashape_core::symtable::{Binding, EllipsisCapture};
use datashape_core::term::Term;

#[test]
fn fixed_dim_chain_layout() {
    // "10 * 2 * int64" -> datasize 160, align 8
    let t = Term::fixed_dim(
        10,
        None,
        Term::fixed_dim(2, None, Term::scalar(ScalarKind::Int64)).unwrap(),
    )
    .unwrap();
    assert_eq!(t.datasize(), Some(160));
    assert_eq!(t.align(), Some(8));
}

#[test]
fn record_field_layout() {
    // "{a: int32, b: float64}" -> offsets 0/8, size 16, align 8
    let rec = Term::record(
        vec![Box::from("a"), Box::from("b")],
        vec![Term::scalar(ScalarKind::Int32), Term::scalar(ScalarKind::Float64)],
        vec![Default::default(); 2],
        None,
        false,
    )
    .unwrap();
    assert_eq!(rec.datasize(), Some(16));
    assert_eq!(rec.align(), Some(8));
}

#[test]
fn match_then_substitute_round_trip() {
    // "N * M * float64" matched against "3 * 4 * float64", then the same
    // bindings substituted back into an independent copy of the pattern.
    let pattern = Term::symbolic_dim(
        "N",
        Term::symbolic_dim("M", Term::scalar(ScalarKind::Float64)).unwrap(),
    )
    .unwrap();
    let candidate = Term::fixed_dim(
        3,
        None,
        Term::fixed_dim(4, None, Term::scalar(ScalarKind::Float64)).unwrap(),
    )
    .unwrap();

    let bindings = match_type(&pattern, &candidate).unwrap().unwrap();
    assert_eq!(bindings.get("N"), Some(&Binding::Shape(3)));
    assert_eq!(bindings.get("M"), Some(&Binding::Shape(4)));

    let resolved = substitute(&pattern, &bindings, true).unwrap();
    assert_eq!(resolved, candidate);
}

#[test]
fn named_ellipsis_capture_and_resubstitution() {
    // "...batch * N * float64" vs "2 * 3 * 4 * float64"
    let pattern = Term::ellipsis_dim(
        Some("batch"),
        Term::symbolic_dim("N", Term::scalar(ScalarKind::Float64)).unwrap(),
    )
    .unwrap();
    let candidate = Term::fixed_dim(
        2,
        None,
        Term::fixed_dim(
            3,
            None,
            Term::fixed_dim(4, None, Term::scalar(ScalarKind::Float64)).unwrap(),
        )
        .unwrap(),
    )
    .unwrap();

    let bindings = match_type(&pattern, &candidate).unwrap().unwrap();
    assert_eq!(
        bindings.get("batch"),
        Some(&Binding::Ellipsis(EllipsisCapture::FixedSeq(vec![2, 3])))
    );

    let resolved = substitute(&pattern, &bindings, true).unwrap();
    assert_eq!(resolved, candidate);
}

#[test]
fn elemwise_function_typecheck() {
    // "...*N*float64 -> ...*N*float64" applied to "2*3*4*float64"
    let input = Term::ellipsis_dim(
        Some("batch"),
        Term::symbolic_dim("N", Term::scalar(ScalarKind::Float64)).unwrap(),
    )
    .unwrap();
    let output = Term::ellipsis_dim(
        Some("batch"),
        Term::symbolic_dim("N", Term::scalar(ScalarKind::Float64)).unwrap(),
    )
    .unwrap();
    let signature = Term::function(vec![input], vec![output], true).unwrap();

    let arg = Term::fixed_dim(
        2,
        None,
        Term::fixed_dim(
            3,
            None,
            Term::fixed_dim(4, None, Term::scalar(ScalarKind::Float64)).unwrap(),
        )
        .unwrap(),
    )
    .unwrap();

    let spec = datashape_core::apply::typecheck(&signature, &[arg.clone()]).unwrap();
    assert_eq!(spec.nin, 1);
    assert_eq!(spec.nout, 1);
    assert_eq!(spec.outer_dims, 2);
    assert_eq!(spec.types, vec![arg.clone(), arg]);
}

#[test]
fn var_dim_offsets_describe_ragged_shape() {
    // "var * var * float32" with outer offsets [0, 2] and inner [0, 3, 5]
    use datashape_core::offset_table::OffsetTable;

    let outer = OffsetTable::new(vec![0, 2]).unwrap();
    let inner = OffsetTable::new(vec![0, 3, 5]).unwrap();
    assert_eq!(outer.nitems(), 1);
    assert_eq!(inner.nitems(), 2);
    assert_eq!(inner.list_bounds(0).unwrap(), (0, 3));
    assert_eq!(inner.list_bounds(1).unwrap(), (3, 5));

    let t = Term::var_dim(
        Some(outer),
        Vec::new(),
        Term::var_dim(Some(inner), Vec::new(), Term::scalar(ScalarKind::Float32)).unwrap(),
    )
    .unwrap();
    assert!(t.access().is_concrete());
}

#[test]
fn ragged_ellipsis_capture_resubstitutes_with_a_new_dtype() {
    // "...batch * float32" vs "var * var * float32" (outer offsets [0, 2],
    // inner offsets [0, 3, 5]), then "...batch * int16" replayed against
    // the capture to rebuild the same ragged shape around a new dtype.
    use datashape_core::offset_table::OffsetTable;

    let outer = OffsetTable::new(vec![0, 2]).unwrap();
    let inner = OffsetTable::new(vec![0, 3, 5]).unwrap();
    let candidate = Term::var_dim(
        Some(outer),
        Vec::new(),
        Term::var_dim(Some(inner), Vec::new(), Term::scalar(ScalarKind::Float32)).unwrap(),
    )
    .unwrap();

    let pattern = Term::ellipsis_dim(Some("batch"), Term::scalar(ScalarKind::Float32)).unwrap();
    let bindings = match_type(&pattern, &candidate).unwrap().unwrap();
    assert!(matches!(
        bindings.get("batch"),
        Some(Binding::Ellipsis(EllipsisCapture::VarSeq { count: 2, .. }))
    ));

    let retyped_pattern = Term::ellipsis_dim(Some("batch"), Term::scalar(ScalarKind::Int16)).unwrap();
    let rebuilt = substitute(&retyped_pattern, &bindings, true).unwrap();

    let expected_outer = OffsetTable::new(vec![0, 2]).unwrap();
    let expected_inner = OffsetTable::new(vec![0, 3, 5]).unwrap();
    let expected = Term::var_dim(
        Some(expected_outer),
        Vec::new(),
        Term::var_dim(Some(expected_inner), Vec::new(), Term::scalar(ScalarKind::Int16)).unwrap(),
    )
    .unwrap();
    assert_eq!(rebuilt, expected);
}

#[test]
fn structural_equality_is_value_based_not_identity_based() {
    let a = Term::fixed_dim(3, None, Term::scalar(ScalarKind::Int32)).unwrap();
    let b = Term::fixed_dim(3, None, Term::scalar(ScalarKind::Int32)).unwrap();
    assert_eq!(a, b);

    use std::collections::HashSet;
    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}
