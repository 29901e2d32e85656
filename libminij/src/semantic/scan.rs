use super::super::ast::{Node, NodeKind};
use super::super::symbol::{Parameter, Symbol};
use super::context::SemanticContext;

/// Names of the class and method around the node being bound, empty when
/// there is none. Passed down by value so siblings never see each other's
/// context.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Enclosing {
    pub class: String,
    pub method: String,
}

impl Enclosing {
    fn in_class(name: &str) -> Enclosing {
        Enclosing {
            class: name.to_string(),
            method: String::new(),
        }
    }

    fn in_method(&self, name: &str) -> Enclosing {
        Enclosing {
            class: self.class.clone(),
            method: name.to_string(),
        }
    }

    fn owner(&self) -> &str {
        if self.method.is_empty() {
            &self.class
        } else {
            &self.method
        }
    }
}

pub trait AstScanner {
    fn build_symbol_table(&mut self, root: Option<&Node>);
}

impl AstScanner for SemanticContext {

    fn build_symbol_table(&mut self, root: Option<&Node>) {
        if let Some(node) = root {
            self.scan_node(node, Enclosing::default());
        }
    }

}

impl SemanticContext {

    fn scan_node(&mut self, node: &Node, enclosing: Enclosing) {
        match *node.get_kind() {
            NodeKind::ClassDeclaration => {
                return self.scan_class(node);
            },
            NodeKind::MethodDeclaration => {
                return self.scan_method(node, &enclosing);
            },
            NodeKind::VarDeclaration | NodeKind::ArrayDeclaration => {
                self.scan_variable(node, &enclosing)
            },
            NodeKind::Parameter => {
                self.scan_parameter(node, &enclosing)
            },
            _ => (),
        }
        self.scan_children(node, &enclosing);
    }

    fn scan_children(&mut self, node: &Node, enclosing: &Enclosing) {
        for child in node.get_children() {
            self.scan_node(child, enclosing.clone());
        }
    }

    fn scan_class(&mut self, node: &Node) {
        let parent_class = node.get_children().iter()
            .find(|child| child.is(&NodeKind::Extends))
            .map(|extends| extends.get_value().to_string())
            .filter(|name| !name.is_empty());
        let scope = self.table.current_scope();
        self.declare(node, Symbol::class(node.get_value(), scope, parent_class));

        let members = Enclosing::in_class(node.get_value());
        self.with_scope(|ctx| ctx.scan_children(node, &members));
    }

    fn scan_method(&mut self, node: &Node, enclosing: &Enclosing) {
        let parameters = node.get_children().iter()
            .filter(|child| child.is(&NodeKind::ParameterList))
            .flat_map(|list| list.get_children())
            .filter(|param| param.is(&NodeKind::Parameter))
            .map(|param| Parameter::new(param.get_value(), type_annotation(param)))
            .collect();
        let scope = self.table.current_scope();
        self.declare(node, Symbol::method(
            node.get_value(),
            type_annotation(node),
            parameters,
            scope,
            enclosing.class.as_str(),
        ));

        let body = enclosing.in_method(node.get_value());
        self.with_scope(|ctx| ctx.scan_children(node, &body));
    }

    fn scan_variable(&mut self, node: &Node, enclosing: &Enclosing) {
        let is_array = node.is(&NodeKind::ArrayDeclaration);
        let scope = self.table.current_scope();
        self.declare(node, Symbol::variable(
            node.get_value(),
            type_annotation(node),
            scope,
            is_array,
            enclosing.owner(),
        ));
    }

    fn scan_parameter(&mut self, node: &Node, enclosing: &Enclosing) {
        let scope = self.table.current_scope();
        self.declare(node, Symbol::variable(
            node.get_value(),
            type_annotation(node),
            scope,
            false,
            enclosing.method.as_str(),
        ));
    }

    fn declare(&mut self, node: &Node, symbol: Symbol) {
        if let Err(error) = self.table.add_symbol(symbol) {
            self.diagnostics.report(node.get_lineno(), error);
        }
    }

}

/// Declarations carry their type as their first child.
fn type_annotation(node: &Node) -> String {
    node.first_child()
        .map(|tipe| tipe.get_value().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
use super::super::symbol::SymbolKind;
#[cfg(test)]
use super::diagnostic::{ErrorCategory, SemanticError};
#[cfg(test)]
use super::fixtures::*;

#[cfg(test)]
fn bind(root: &Node) -> SemanticContext {
    let mut ctx = SemanticContext::new();
    ctx.build_symbol_table(Some(root));
    ctx
}

#[test]
fn test_binds_classes_methods_and_variables() {
    let ctx = bind(&adder_program());
    let names: Vec<(&str, usize)> = ctx.table.symbols().iter()
        .map(|s| (s.get_name(), s.get_scope()))
        .collect();
    assert_eq!(names, vec![
        ("Main", 0),
        ("count", 1),
        ("add", 1),
        ("a", 2),
        ("b", 2),
        ("sum", 2),
    ]);
    assert!(ctx.diagnostics.is_empty());
}

#[test]
fn test_method_signature() {
    let ctx = bind(&adder_program());
    let add = ctx.table.get_symbol("add").unwrap().as_method().unwrap();
    assert_eq!(add.return_type, "int");
    assert_eq!(add.owning_class, "Main");
    assert_eq!(add.parameters, vec![
        Parameter::new("a", "int"),
        Parameter::new("b", "int"),
    ]);
}

#[test]
fn test_variable_owners() {
    let ctx = bind(&adder_program());
    match *ctx.table.get_symbol("count").unwrap().get_kind() {
        SymbolKind::Variable(ref var) => {
            assert_eq!(var.owner_scope, "Main");
            assert!(!var.is_array);
        },
        ref other => panic!("expected a variable, found {:?}", other),
    }
    match *ctx.table.get_symbol("a").unwrap().get_kind() {
        SymbolKind::Variable(ref var) => assert_eq!(var.owner_scope, "add"),
        ref other => panic!("expected a variable, found {:?}", other),
    }
}

#[test]
fn test_parameter_outside_method_has_no_owner() {
    let root = program(vec![
        class("Main", None, vec![param("loose", "int", 2)], 1),
    ]);
    let ctx = bind(&root);
    let loose = ctx.table.get_symbol("loose").unwrap();
    assert_eq!(loose.get_scope(), 1);
    match *loose.get_kind() {
        SymbolKind::Variable(ref var) => {
            assert_eq!(var.owner_scope, "");
            assert!(!var.is_array);
        },
        ref other => panic!("expected a variable, found {:?}", other),
    }
    match *ctx.table.get_symbol("Main").unwrap().get_kind() {
        SymbolKind::Class(_) => (),
        ref other => panic!("expected a class, found {:?}", other),
    }
}

#[test]
fn test_array_declaration_and_parent_class() {
    let root = program(vec![
        class("Base", None, vec![], 1),
        class("Derived", Some("Base"), vec![array_var("xs", 3)], 2),
    ]);
    let ctx = bind(&root);
    match *ctx.table.get_symbol("Derived").unwrap().get_kind() {
        SymbolKind::Class(ref class) => assert_eq!(class.parent_class, Some("Base".to_string())),
        ref other => panic!("expected a class, found {:?}", other),
    }
    match *ctx.table.get_symbol("Base").unwrap().get_kind() {
        SymbolKind::Class(ref class) => assert_eq!(class.parent_class, None),
        ref other => panic!("expected a class, found {:?}", other),
    }
    let xs = ctx.table.get_symbol("xs").unwrap();
    assert_eq!(xs.get_type(), "int[]");
    match *xs.get_kind() {
        SymbolKind::Variable(ref var) => {
            assert!(var.is_array);
            assert_eq!(var.owner_scope, "Derived");
        },
        ref other => panic!("expected a variable, found {:?}", other),
    }
}

#[test]
fn test_sibling_classes_share_depth() {
    let root = program(vec![
        class("A", None, vec![var("x", "int", 2)], 1),
        class("B", None, vec![var("y", "int", 4)], 3),
    ]);
    let ctx = bind(&root);
    assert_eq!(ctx.table.get_symbol("x").unwrap().get_scope(), 1);
    assert_eq!(ctx.table.get_symbol("y").unwrap().get_scope(), 1);
}

#[test]
fn test_duplicate_in_same_depth_keeps_first() {
    let root = program(vec![
        class("Main", None, vec![
            var("x", "int", 2),
            var("x", "boolean", 3),
        ], 1),
    ]);
    let ctx = bind(&root);
    assert_eq!(ctx.diagnostics.len(), 1);
    let diagnostic = ctx.diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.line, 3);
    assert_eq!(diagnostic.error, SemanticError::DuplicateIdentifier {
        name: "x".to_string(),
        scope: 1,
    });
    assert_eq!(ctx.diagnostics.count(ErrorCategory::DuplicateIdentifier), 1);
    assert_eq!(ctx.table.get_symbol("x").unwrap().get_type(), "int");
}

#[test]
fn test_same_name_in_sibling_classes_is_a_duplicate() {
    let root = program(vec![
        class("A", None, vec![var("x", "int", 2)], 1),
        class("B", None, vec![var("x", "int", 4)], 3),
    ]);
    let ctx = bind(&root);
    assert_eq!(ctx.diagnostics.count(ErrorCategory::DuplicateIdentifier), 1);
}

#[test]
fn test_scope_depth_returns_to_start() {
    let ctx = bind(&adder_program());
    assert_eq!(ctx.table.current_scope(), 0);
}

#[test]
fn test_absent_root_binds_nothing() {
    let mut ctx = SemanticContext::new();
    ctx.build_symbol_table(None);
    assert!(ctx.table.is_empty());
}
