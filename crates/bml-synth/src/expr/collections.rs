//! List and map literal lowering.
//!
//! Literals become the immutable factory calls `List.of(...)` and
//! `Map.of(k1, v1, ...)`. `Map.of` is only overloaded up to ten pairs, so
//! larger literals use `Map.ofEntries(Map.entry(k, v), ...)`.

use bml_ast::{ElementExprPair, Expr};
use bml_target as java;

use super::ExprLowerer;
use crate::context::Result;

const MAP_OF_MAX_PAIRS: usize = 10;

pub fn lower_list(lowerer: &mut ExprLowerer<'_, '_>, elements: &[Expr<'_>]) -> Result<java::Expr> {
    let args = elements
        .iter()
        .map(|element| lowerer.lower(element))
        .collect::<Result<Vec<_>>>()?;
    lowerer.ctx().require("List");
    Ok(java::Expr::static_call("List", "of", args))
}

/// Keys are written as identifiers in BML and become string keys.
pub fn lower_map(lowerer: &mut ExprLowerer<'_, '_>, pairs: &[ElementExprPair<'_>]) -> Result<java::Expr> {
    lowerer.ctx().require("Map");

    if pairs.len() > MAP_OF_MAX_PAIRS {
        let entries = pairs
            .iter()
            .map(|pair| {
                let value = lowerer.lower(pair.value)?;
                Ok(java::Expr::static_call(
                    "Map",
                    "entry",
                    vec![java::Expr::string(pair.name.name), value],
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(java::Expr::static_call("Map", "ofEntries", entries));
    }

    let mut args = Vec::with_capacity(pairs.len() * 2);
    for pair in pairs {
        args.push(java::Expr::string(pair.name.name));
        args.push(lowerer.lower(pair.value)?);
    }
    Ok(java::Expr::static_call("Map", "of", args))
}
