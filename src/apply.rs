//! Typechecking a call against a `Function` signature (spec §4.9).
//!
//! This only specifies the interface a host's `apply`/typecheck frontend
//! would drive: match every input, merge the resulting bindings, then
//! substitute them into both the inputs and the outputs so the caller gets
//! back the fully instantiated signature. The host-language glue that
//! actually invokes a kernel once types line up is out of scope here (spec
//! Non-goals).

use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::flags::TypeFlags;
use crate::matcher::match_type;
use crate::subst::substitute;
use crate::symtable::{Binding, EllipsisCapture, SymbolTable};
use crate::term::{Tag, Term};

/// The instantiated result of matching a call against a `Function`
/// signature (spec §4.9). `types` lists the instantiated inputs followed
/// by the instantiated outputs, so `types.len() == nargs == nin + nout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplySpec {
    /// Union of every instantiated type's flags.
    pub flags: TypeFlags,
    /// Number of leading dimensions absorbed by the signature's named
    /// ellipsis (0 if the signature has none).
    pub outer_dims: usize,
    /// Number of inputs.
    pub nin: usize,
    /// Number of outputs.
    pub nout: usize,
    /// `nin + nout`.
    pub nargs: usize,
    /// Instantiated inputs, then instantiated outputs.
    pub types: Vec<Term>,
}

/// Match `signature`'s inputs against `args` in order, merge the bindings,
/// and substitute them into both inputs and outputs, all of which must
/// come out fully concrete (spec §4.9 "a call's result type must be
/// resolvable").
pub fn typecheck(signature: &Term, args: &[Term]) -> Result<ApplySpec> {
    let Tag::Function(f) = signature.tag() else {
        return Err(Error::type_err("typecheck requires a Function term"));
    };
    if f.inputs.len() != args.len() {
        return Err(Error::invalid_argument("argument count does not match signature arity"));
    }

    let mut table = SymbolTable::new();
    for (input, arg) in f.inputs.iter().zip(args.iter()) {
        let bindings = match_type(input, arg)?
            .ok_or_else(|| Error::type_err("argument does not match the declared input type"))?;
        table = table
            .merge(bindings)
            .ok_or_else(|| Error::type_err("arguments imply inconsistent bindings"))?;
    }

    let inputs: Vec<Term> = f.inputs.iter().map(|i| substitute(i, &table, true)).collect::<Result<_>>()?;
    let outputs: Vec<Term> = f.outputs.iter().map(|o| substitute(o, &table, true)).collect::<Result<_>>()?;

    let outer_dims = match find_ellipsis_name(&f.inputs).or_else(|| find_ellipsis_name(&f.outputs)) {
        Some(name) => outer_dims(&table, &name)?,
        None => 0,
    };

    let flags = inputs
        .iter()
        .chain(outputs.iter())
        .fold(TypeFlags::empty(), |acc, t| acc.union(t.flags()));

    let nin = inputs.len();
    let nout = outputs.len();
    let mut types = inputs;
    types.extend(outputs);

    Ok(ApplySpec {
        flags,
        outer_dims,
        nin,
        nout,
        nargs: nin + nout,
        types,
    })
}

fn find_ellipsis_name(terms: &[Term]) -> Option<alloc::boxed::Box<str>> {
    terms.iter().find_map(find_ellipsis_name_in)
}

fn find_ellipsis_name_in(t: &Term) -> Option<alloc::boxed::Box<str>> {
    match t.tag() {
        Tag::EllipsisDim(p) => p.name.clone(),
        Tag::FixedDim(p) => find_ellipsis_name_in(&p.inner),
        Tag::VarDim(p) => find_ellipsis_name_in(&p.inner),
        Tag::SymbolicDim(p) => find_ellipsis_name_in(&p.inner),
        _ => None,
    }
}

/// Read back the number of leading dimensions a named ellipsis absorbed
/// during [`typecheck`] (spec §4.9 "outer dimensions", used to size the
/// broadcasting loop a host driver runs over the call). The count is known
/// regardless of capture kind; only the *shapes* of a `VarDim`/`Array`
/// capture stay unknown until the host walks the actual buffer.
pub fn outer_dims(table: &SymbolTable, name: &str) -> Result<usize> {
    match table.get(name) {
        Some(Binding::Ellipsis(EllipsisCapture::FixedSeq(shapes))) => Ok(shapes.len()),
        Some(Binding::Ellipsis(EllipsisCapture::ArraySeq(n))) => Ok(*n),
        Some(Binding::Ellipsis(EllipsisCapture::VarSeq { count, .. })) => Ok(*count),
        Some(_) => Err(Error::type_err("binding is not an ellipsis capture")),
        None => Err(Error::value("no such binding")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::ScalarKind;

    #[test]
    fn scenario_6_elemwise_signature_typechecks() {
        // "... * N * float64 -> ... * N * float64" applied to "2 * 3 * 4 * float64"
        let sig_inner_in = Term::symbolic_dim("N", Term::scalar(ScalarKind::Float64)).unwrap();
        let input = Term::ellipsis_dim(Some("batch"), sig_inner_in).unwrap();
        let sig_inner_out = Term::symbolic_dim("N", Term::scalar(ScalarKind::Float64)).unwrap();
        let output = Term::ellipsis_dim(Some("batch"), sig_inner_out).unwrap();
        let signature = Term::function(alloc::vec![input], alloc::vec![output], true).unwrap();

        let arg = Term::fixed_dim(
            2,
            None,
            Term::fixed_dim(3, None, Term::fixed_dim(4, None, Term::scalar(ScalarKind::Float64)).unwrap()).unwrap(),
        )
        .unwrap();

        let spec = typecheck(&signature, &[arg.clone()]).unwrap();
        assert_eq!(spec.outer_dims, 2);
        assert_eq!(spec.nin, 1);
        assert_eq!(spec.nout, 1);
        assert_eq!(spec.nargs, 2);
        assert_eq!(spec.types, alloc::vec![arg.clone(), arg]);
    }

    #[test]
    fn arity_mismatch_is_invalid_argument() {
        let signature = Term::function(
            alloc::vec![Term::scalar(ScalarKind::Int32)],
            alloc::vec![Term::scalar(ScalarKind::Int32)],
            false,
        )
        .unwrap();
        let err = typecheck(&signature, &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn inconsistent_typevar_bindings_fail() {
        let t = Term::typevar("T");
        let signature = Term::function(alloc::vec![t.clone(), t.clone()], alloc::vec![t], false).unwrap();
        let a = Term::scalar(ScalarKind::Int32);
        let b = Term::scalar(ScalarKind::Float64);
        let err = typecheck(&signature, &[a, b]).unwrap_err();
        assert!(matches!(err, Error::Type(_)));
    }
}
