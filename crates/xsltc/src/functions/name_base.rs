//! Operand handling shared by `name()`, `local-name()` and `namespace-uri()`.

use crate::ast::Expression;
use crate::codegen::runtime::REFERENCE_TO_NODE_SET;
use crate::codegen::{ClassGenerator, MethodGenerator, Translate};
use crate::error::{Error, ErrorCode};
use crate::symbols::SymbolTable;
use crate::types::Type;

/// Determine the operand type of a call with `args`.
///
/// Zero arguments operate on the context node; a single argument must be a
/// node, a node-set or a reference.
pub fn check_operand(
    function: &str,
    args: &[Expression],
    symbols: &SymbolTable,
) -> Result<Type, Error> {
    let ty = match args {
        [] => Type::Node,
        [arg] => arg.type_check(symbols)?,
        _ => {
            return Err(Error::static_err(
                ErrorCode::XPST0017,
                format!("{function}() takes zero or one argument, got {}", args.len()),
            ));
        }
    };
    if !ty.is_node_like() {
        return Err(Error::static_err(
            ErrorCode::XPTY0004,
            format!("argument of {function}() must be a node or node-set, found {ty}"),
        ));
    }
    Ok(ty)
}

/// Push the DOM receiver followed by one node handle.
///
/// Node-set and reference operands are reduced to their first node.
pub fn emit_operand(
    param: Option<&Expression>,
    param_type: Type,
    class_gen: &mut ClassGenerator,
    method_gen: &mut MethodGenerator,
) -> Result<(), Error> {
    method_gen.append(method_gen.load_dom());

    let Some(param) = param else {
        method_gen.append(method_gen.load_context_node());
        return Ok(());
    };

    match param_type {
        Type::Node => param.translate(class_gen, method_gen)?,
        Type::Reference => {
            param.translate(class_gen, method_gen)?;
            let idx = REFERENCE_TO_NODE_SET.intern(class_gen)?;
            method_gen.append(REFERENCE_TO_NODE_SET.invoke(idx));
            let next = method_gen.next_node(class_gen)?;
            method_gen.append(next);
        }
        _ => {
            param.translate(class_gen, method_gen)?;
            param.start_iterator(param_type, class_gen, method_gen)?;
            let next = method_gen.next_node(class_gen)?;
            method_gen.append(next);
        }
    }
    Ok(())
}
