//! Process-wide nominal typedef registry (spec §3.3, §3.4, §5).
//!
//! A `Nominal` term names a typedef that must be registered exactly once
//! before any term referencing it can be built elsewhere in the process.
//! Grounded on the teacher's preference for `std::sync`-backed process
//! state over a hand-rolled lock; gated behind the `std` feature the same
//! way the teacher gates its own `std`-only impls.

use crate::error::{Error, Result};
use crate::term::Term;
use std::collections::HashMap;
use std::sync::RwLock;

struct Registry {
    table: RwLock<HashMap<alloc::boxed::Box<str>, Term>>,
}

static REGISTRY: std::sync::OnceLock<Registry> = std::sync::OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| Registry {
        table: RwLock::new(HashMap::new()),
    })
}

/// Register `name` as a typedef for `definition`. Fails if `name` is
/// already registered (spec §3.3: a typedef is defined at most once).
pub fn register(name: &str, definition: Term) -> Result<()> {
    let mut table = registry()
        .table
        .write()
        .map_err(|_| Error::value("typedef registry lock poisoned"))?;
    if table.contains_key(name) {
        return Err(Error::value("typedef already registered"));
    }
    table.insert(name.into(), definition);
    Ok(())
}

/// Look up a previously registered typedef's definition.
pub fn lookup(name: &str) -> Result<Term> {
    let table = registry()
        .table
        .read()
        .map_err(|_| Error::value("typedef registry lock poisoned"))?;
    table
        .get(name)
        .cloned()
        .ok_or_else(|| Error::value("typedef not registered"))
}

/// Remove a registered typedef, if present. Used by test teardown and by
/// hosts that want to redefine a name.
pub fn unregister(name: &str) -> Result<()> {
    let mut table = registry()
        .table
        .write()
        .map_err(|_| Error::value("typedef registry lock poisoned"))?;
    table.remove(name);
    Ok(())
}

/// Build and register a [`Tag::Nominal`](crate::term::Tag::Nominal) term in
/// one step, checking that `inner` structurally matches any previously
/// registered definition under the same name (spec §3.3 "inner must
/// structurally match the registered body").
pub fn define_nominal(name: &str, inner: Term, methods: alloc::vec::Vec<alloc::boxed::Box<str>>) -> Result<Term> {
    if let Ok(existing) = lookup(name) {
        if existing != inner {
            return Err(Error::type_err("nominal redefinition does not structurally match"));
        }
    } else {
        register(name, inner.clone())?;
    }
    Ok(Term::nominal(name, inner, methods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::ScalarKind;

    #[test]
    fn register_then_lookup() {
        let name = "registry_test_point";
        let _ = unregister(name);
        let ty = Term::scalar(ScalarKind::Float64);
        register(name, ty.clone()).unwrap();
        assert_eq!(lookup(name).unwrap(), ty);
        let _ = unregister(name);
    }

    #[test]
    fn double_register_fails() {
        let name = "registry_test_dup";
        let _ = unregister(name);
        register(name, Term::scalar(ScalarKind::Int32)).unwrap();
        let err = register(name, Term::scalar(ScalarKind::Int32)).unwrap_err();
        assert!(matches!(err, Error::Value(_)));
        let _ = unregister(name);
    }
}
