use super::super::ast::{Node, NodeKind};
use super::super::symbol::Symbol;
use super::symbol_table::SymbolTable;
use super::types::*;

/// Static type of an expression, or one of the poisoned types `error` and
/// `unknown` when it has none. An absent expression is an `error`.
pub fn get_expression_type(node: Option<&Node>, table: &SymbolTable) -> TypeName {
    match node {
        Some(node) => type_of(node, table),
        None => ERROR.to_string(),
    }
}

pub fn type_of(node: &Node, table: &SymbolTable) -> TypeName {
    match *node.get_kind() {
        NodeKind::IntLiteral => INT.to_string(),
        NodeKind::BooleanLiteral => BOOLEAN.to_string(),
        NodeKind::Identifier => {
            table.get_symbol(node.get_value())
                .map(|symbol| symbol.get_type().to_string())
                .unwrap_or_else(|| ERROR.to_string())
        },
        NodeKind::This => THIS.to_string(),
        NodeKind::NewObject => node.get_value().to_string(),
        NodeKind::NewArray => INT_ARRAY.to_string(),
        NodeKind::ArrayAccess => {
            match node.first_child() {
                Some(array) if type_of(array, table) == INT_ARRAY => INT.to_string(),
                _ => ERROR.to_string(),
            }
        },
        // The operand is validated by the checker.
        NodeKind::Length => INT.to_string(),
        // Resolved by name only; the receiver is ignored.
        NodeKind::MethodCall => {
            table.get_symbol(node.get_value())
                .and_then(Symbol::as_method)
                .map(|method| method.return_type.clone())
                .unwrap_or_else(|| ERROR.to_string())
        },
        NodeKind::AddExpression
        | NodeKind::SubExpression
        | NodeKind::MultExpression => binary_type(node, table, INT, INT),
        NodeKind::AndExpression
        | NodeKind::OrExpression => binary_type(node, table, BOOLEAN, BOOLEAN),
        NodeKind::LessThanExpression
        | NodeKind::EqualExpression => comparison_type(node, table),
        NodeKind::NotExpression => {
            match node.first_child() {
                Some(operand) if type_of(operand, table) == BOOLEAN => BOOLEAN.to_string(),
                _ => ERROR.to_string(),
            }
        },
        _ => UNKNOWN.to_string(),
    }
}

fn operands(node: &Node) -> Option<(&Node, &Node)> {
    match node.get_children() {
        [lhs, rhs, ..] => Some((lhs, rhs)),
        _ => None,
    }
}

fn binary_type(node: &Node, table: &SymbolTable, operand: &str, result: &str) -> TypeName {
    match operands(node) {
        Some((lhs, rhs)) if type_of(lhs, table) == operand && type_of(rhs, table) == operand => {
            result.to_string()
        },
        _ => ERROR.to_string(),
    }
}

fn comparison_type(node: &Node, table: &SymbolTable) -> TypeName {
    if let Some((lhs, rhs)) = operands(node) {
        let lhs_type = type_of(lhs, table);
        let rhs_type = type_of(rhs, table);
        if lhs_type == rhs_type && (lhs_type == INT || lhs_type == BOOLEAN) {
            return BOOLEAN.to_string();
        }
    }
    ERROR.to_string()
}

#[cfg(test)]
use super::fixtures::*;
#[cfg(test)]
use super::context::SemanticContext;
#[cfg(test)]
use super::scan::AstScanner;

#[cfg(test)]
fn bound(root: &Node) -> SymbolTable {
    let mut ctx = SemanticContext::new();
    ctx.build_symbol_table(Some(root));
    ctx.table
}

#[test]
fn test_literals() {
    let table = SymbolTable::new();
    for value in &[0, 1, -7, 2147483647] {
        assert_eq!(type_of(&int(*value, 1), &table), "int");
    }
    assert_eq!(type_of(&boolean(true, 1), &table), "boolean");
    assert_eq!(type_of(&boolean(false, 1), &table), "boolean");
}

#[test]
fn test_absent_node_is_an_error() {
    assert_eq!(get_expression_type(None, &SymbolTable::new()), "error");
}

#[test]
fn test_identifiers_use_declared_type() {
    let table = bound(&adder_with(vec![]));
    assert_eq!(type_of(&ident("xs", 1), &table), "int[]");
    assert_eq!(type_of(&ident("flag", 1), &table), "boolean");
    assert_eq!(type_of(&ident("missing", 1), &table), "error");
    assert_eq!(type_of(&ident("Main", 1), &table), "class");
}

#[test]
fn test_objects_and_this() {
    let table = SymbolTable::new();
    assert_eq!(type_of(&leaf(NodeKind::NewObject, "Tree", 1), &table), "Tree");
    assert_eq!(type_of(&leaf(NodeKind::This, "", 1), &table), "this");
    assert_eq!(type_of(&leaf(NodeKind::NewArray, "", 1), &table), "int[]");
}

#[test]
fn test_arithmetic() {
    let table = SymbolTable::new();
    let sum = binary(NodeKind::AddExpression, int(1, 1), int(2, 1));
    assert_eq!(type_of(&sum, &table), "int");
    let mixed = binary(NodeKind::AddExpression, int(1, 1), boolean(true, 1));
    assert_eq!(type_of(&mixed, &table), "error");
    let nested = binary(NodeKind::MultExpression, sum, int(3, 1));
    assert_eq!(type_of(&nested, &table), "int");
    let lonely = Node::new(NodeKind::SubExpression, "", 1).with_child(int(1, 1));
    assert_eq!(type_of(&lonely, &table), "error");
}

#[test]
fn test_logic_and_comparison() {
    let table = SymbolTable::new();
    let and = binary(NodeKind::AndExpression, boolean(true, 1), boolean(false, 1));
    assert_eq!(type_of(&and, &table), "boolean");
    let bad_or = binary(NodeKind::OrExpression, boolean(true, 1), int(0, 1));
    assert_eq!(type_of(&bad_or, &table), "error");
    let less = binary(NodeKind::LessThanExpression, int(1, 1), int(2, 1));
    assert_eq!(type_of(&less, &table), "boolean");
    let equal = binary(NodeKind::EqualExpression, boolean(true, 1), boolean(true, 1));
    assert_eq!(type_of(&equal, &table), "boolean");
    let objects = binary(
        NodeKind::EqualExpression,
        leaf(NodeKind::NewObject, "A", 1),
        leaf(NodeKind::NewObject, "A", 1),
    );
    assert_eq!(type_of(&objects, &table), "error");
    assert_eq!(type_of(&unary(NodeKind::NotExpression, less), &table), "boolean");
    assert_eq!(type_of(&unary(NodeKind::NotExpression, int(1, 1)), &table), "error");
}

#[test]
fn test_array_access_chain() {
    let table = SymbolTable::new();
    let access = binary(NodeKind::ArrayAccess, leaf(NodeKind::NewArray, "", 1), int(0, 1));
    assert_eq!(type_of(&access, &table), "int");
    let not_array = binary(NodeKind::ArrayAccess, int(1, 1), int(0, 1));
    assert_eq!(type_of(&not_array, &table), "error");
    let empty = Node::new(NodeKind::ArrayAccess, "", 1);
    assert_eq!(type_of(&empty, &table), "error");
    let length = unary(NodeKind::Length, boolean(true, 1));
    assert_eq!(type_of(&length, &table), "int");
}

#[test]
fn test_method_calls_resolve_by_name() {
    let table = bound(&adder_with(vec![]));
    let add = call("add", leaf(NodeKind::This, "", 1), vec![], 1);
    assert_eq!(type_of(&add, &table), "int");
    let not_method = call("count", leaf(NodeKind::This, "", 1), vec![], 1);
    assert_eq!(type_of(&not_method, &table), "error");
    let missing = call("nope", leaf(NodeKind::This, "", 1), vec![], 1);
    assert_eq!(type_of(&missing, &table), "error");
}

#[test]
fn test_statements_are_unknown() {
    let table = SymbolTable::new();
    assert_eq!(type_of(&assign("x", int(1, 1), 1), &table), "unknown");
}
