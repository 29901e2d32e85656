//! Tree builders shared by the semantic tests.

use super::super::ast::{Node, NodeKind};

pub fn leaf(kind: NodeKind, value: &str, line: u32) -> Node {
    Node::new(kind, value, line)
}

pub fn type_node(name: &str, line: u32) -> Node {
    leaf(NodeKind::Other("Type".to_string()), name, line)
}

pub fn int(value: i64, line: u32) -> Node {
    leaf(NodeKind::IntLiteral, &value.to_string(), line)
}

pub fn boolean(value: bool, line: u32) -> Node {
    leaf(NodeKind::BooleanLiteral, &value.to_string(), line)
}

pub fn ident(name: &str, line: u32) -> Node {
    leaf(NodeKind::Identifier, name, line)
}

pub fn unary(kind: NodeKind, operand: Node) -> Node {
    let line = operand.get_lineno();
    Node::new(kind, "", line).with_child(operand)
}

pub fn binary(kind: NodeKind, lhs: Node, rhs: Node) -> Node {
    let line = lhs.get_lineno();
    Node::new(kind, "", line).with_child(lhs).with_child(rhs)
}

pub fn var(name: &str, tipe: &str, line: u32) -> Node {
    Node::new(NodeKind::VarDeclaration, name, line)
        .with_child(type_node(tipe, line))
}

pub fn array_var(name: &str, line: u32) -> Node {
    Node::new(NodeKind::ArrayDeclaration, name, line)
        .with_child(type_node("int[]", line))
}

pub fn param(name: &str, tipe: &str, line: u32) -> Node {
    Node::new(NodeKind::Parameter, name, line)
        .with_child(type_node(tipe, line))
}

pub fn method(name: &str, return_type: &str, params: Vec<Node>, body: Vec<Node>, line: u32) -> Node {
    Node::new(NodeKind::MethodDeclaration, name, line)
        .with_child(type_node(return_type, line))
        .with_child(Node::new(NodeKind::ParameterList, "", line).with_children(params))
        .with_children(body)
}

pub fn class(name: &str, parent: Option<&str>, members: Vec<Node>, line: u32) -> Node {
    let mut node = Node::new(NodeKind::ClassDeclaration, name, line);
    if let Some(parent) = parent {
        node.push_child(leaf(NodeKind::Extends, parent, line));
    }
    node.with_children(members)
}

pub fn program(classes: Vec<Node>) -> Node {
    Node::new(NodeKind::Other("Program".to_string()), "", 1).with_children(classes)
}

pub fn assign(name: &str, value: Node, line: u32) -> Node {
    Node::new(NodeKind::AssignStatement, name, line).with_child(value)
}

pub fn call(name: &str, receiver: Node, args: Vec<Node>, line: u32) -> Node {
    Node::new(NodeKind::MethodCall, name, line)
        .with_child(receiver)
        .with_child(Node::new(NodeKind::ExpressionList, "", line).with_children(args))
}

/// ```text
/// class Main {
///     int count;
///     int add(int a, int b) {
///         int sum;
///         sum = a + b;
///         return sum;
///     }
/// }
/// ```
pub fn adder_program() -> Node {
    program(vec![
        class("Main", None, vec![
            var("count", "int", 2),
            method("add", "int", vec![param("a", "int", 3), param("b", "int", 3)], vec![
                var("sum", "int", 4),
                assign("sum", binary(NodeKind::AddExpression, ident("a", 5), ident("b", 5)), 5),
                Node::new(NodeKind::Return, "", 6).with_child(ident("sum", 6)),
            ], 3),
        ], 1),
    ])
}

/// `adder_program` with extra statements appended to the body of `add`.
pub fn adder_with(statements: Vec<Node>) -> Node {
    program(vec![
        class("Main", None, vec![
            var("count", "int", 2),
            array_var("xs", 2),
            method("add", "int", vec![param("a", "int", 3), param("b", "int", 3)], vec![
                var("sum", "int", 4),
                var("flag", "boolean", 4),
            ].into_iter().chain(statements).collect(), 3),
        ], 1),
    ])
}
