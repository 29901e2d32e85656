use super::super::ast::{Node, NodeKind};
use super::super::symbol::Symbol;
use super::context::SemanticContext;
use super::diagnostic::SemanticError;
use super::infer::type_of;
use super::types::{TypeName, BOOLEAN, INT, INT_ARRAY};

pub trait TypeChecker {
    /// Checks every node of the tree against the bound symbol table. The
    /// walk never stops early: the result is `false` if any node failed.
    fn perform_semantic_analysis(&mut self, root: Option<&Node>) -> bool;
}

impl TypeChecker for SemanticContext {

    fn perform_semantic_analysis(&mut self, root: Option<&Node>) -> bool {
        match root {
            Some(node) => self.check_node(node),
            None => true,
        }
    }

}

impl SemanticContext {

    fn check_node(&mut self, node: &Node) -> bool {
        let mut result = self.check_rules(node);
        for child in node.get_children() {
            result = self.check_node(child) && result;
        }
        result
    }

    fn check_rules(&mut self, node: &Node) -> bool {
        match *node.get_kind() {
            NodeKind::Identifier => self.check_identifier(node),
            NodeKind::AssignStatement => self.check_assignment(node),
            NodeKind::ArrayAssignStatement => self.check_array_assignment(node),
            NodeKind::IfStatement | NodeKind::WhileStatement => self.check_condition(node),
            NodeKind::PrintStatement => self.check_print(node),
            NodeKind::MethodCall => self.check_method_call(node),
            NodeKind::Return => self.check_return(node),
            NodeKind::ArrayAccess => self.check_array_access(node),
            NodeKind::Length => self.check_length(node),
            _ => true,
        }
    }

    fn type_of(&self, node: &Node) -> TypeName {
        type_of(node, &self.table)
    }

    fn declared_type(&self, name: &str) -> Option<TypeName> {
        self.table.get_symbol(name).map(|symbol| symbol.get_type().to_string())
    }

    fn check_identifier(&mut self, node: &Node) -> bool {
        if self.table.is_undeclared_identifier(node.get_value()) {
            return self.fail(node.get_lineno(), SemanticError::UndeclaredIdentifier {
                name: node.get_value().to_string(),
            });
        }
        true
    }

    fn check_assignment(&mut self, node: &Node) -> bool {
        let name = node.get_value();
        let expected = match self.declared_type(name) {
            Some(tipe) => tipe,
            None => {
                return self.fail(node.get_lineno(), SemanticError::UndeclaredVariable {
                    name: name.to_string(),
                });
            },
        };
        let value = match node.first_child() {
            Some(value) => value,
            None => return true,
        };
        let found = self.type_of(value);
        if !self.table.check_types(&expected, &found) {
            return self.fail(node.get_lineno(), SemanticError::AssignmentMismatch {
                name: name.to_string(),
                expected: expected,
                found: found,
            });
        }
        true
    }

    fn check_array_assignment(&mut self, node: &Node) -> bool {
        let line = node.get_lineno();
        let declared = match self.declared_type(node.get_value()) {
            Some(tipe) => tipe,
            None => {
                return self.fail(line, SemanticError::UndeclaredArray {
                    name: node.get_value().to_string(),
                });
            },
        };

        let mut result = true;
        if declared != INT_ARRAY {
            result = self.fail(line, SemanticError::NotAnArray { found: declared });
        }
        if let Some(index) = node.child(0) {
            let index_type = self.type_of(index);
            if index_type != INT {
                result = self.fail(line, SemanticError::NonIntegerIndex { found: index_type });
            }
            if let Some(value) = node.child(1) {
                let value_type = self.type_of(value);
                if value_type != INT {
                    result = self.fail(line, SemanticError::ArrayElementMismatch { found: value_type });
                }
            }
        }
        result
    }

    fn check_condition(&mut self, node: &Node) -> bool {
        if let Some(condition) = node.first_child() {
            let found = self.type_of(condition);
            if found != BOOLEAN {
                return self.fail(node.get_lineno(), SemanticError::NonBooleanCondition { found: found });
            }
        }
        true
    }

    fn check_print(&mut self, node: &Node) -> bool {
        if let Some(argument) = node.first_child() {
            let found = self.type_of(argument);
            if found != INT {
                return self.fail(node.get_lineno(), SemanticError::NonIntegerPrint { found: found });
            }
        }
        true
    }

    fn check_method_call(&mut self, node: &Node) -> bool {
        let line = node.get_lineno();
        let name = node.get_value();
        let parameters = match self.table.get_symbol(name).and_then(Symbol::as_method) {
            Some(method) => method.parameters.clone(),
            None => {
                return self.fail(line, SemanticError::UndefinedMethod { name: name.to_string() });
            },
        };
        // The first child is the receiver, the second the argument list.
        let arguments = match node.child(1) {
            Some(list) if list.is(&NodeKind::ExpressionList) => list.get_children(),
            _ => return true,
        };
        if arguments.len() != parameters.len() {
            return self.fail(line, SemanticError::ArityMismatch {
                method: name.to_string(),
                expected: parameters.len(),
                found: arguments.len(),
            });
        }

        let mut result = true;
        for (position, (argument, parameter)) in arguments.iter().zip(&parameters).enumerate() {
            let found = self.type_of(argument);
            if !self.table.check_types(&parameter.tipe, &found) {
                result = self.fail(line, SemanticError::ArgumentMismatch {
                    method: name.to_string(),
                    position: position + 1,
                    expected: parameter.tipe.clone(),
                    found: found,
                });
            }
        }
        result
    }

    // TODO: thread the enclosing method through the walk so the returned
    // type can be compared with its declared return type.
    fn check_return(&mut self, node: &Node) -> bool {
        if let Some(value) = node.first_child() {
            trace!("return of '{}' at line {}", self.type_of(value), node.get_lineno());
        }
        true
    }

    fn check_array_access(&mut self, node: &Node) -> bool {
        let (array, index) = match node.get_children() {
            [array, index, ..] => (array, index),
            _ => return true,
        };
        let line = node.get_lineno();
        let mut result = true;
        let array_type = self.type_of(array);
        if array_type != INT_ARRAY {
            result = self.fail(line, SemanticError::ArrayAccessOnNonArray { found: array_type });
        }
        let index_type = self.type_of(index);
        if index_type != INT {
            result = self.fail(line, SemanticError::NonIntegerIndex { found: index_type });
        }
        result
    }

    fn check_length(&mut self, node: &Node) -> bool {
        if let Some(operand) = node.first_child() {
            let found = self.type_of(operand);
            if found != INT_ARRAY {
                return self.fail(node.get_lineno(), SemanticError::LengthOnNonArray { found: found });
            }
        }
        true
    }

}

#[cfg(test)]
use super::diagnostic::{Diagnostic, ErrorCategory};
#[cfg(test)]
use super::fixtures::*;
#[cfg(test)]
use super::scan::AstScanner;

#[cfg(test)]
fn check(root: &Node) -> (bool, Vec<Diagnostic>) {
    let mut ctx = SemanticContext::new();
    ctx.build_symbol_table(Some(root));
    let result = ctx.perform_semantic_analysis(Some(root));
    (result, ctx.diagnostics.iter().cloned().collect())
}

#[cfg(test)]
fn errors(root: &Node) -> Vec<SemanticError> {
    check(root).1.into_iter().map(|d| d.error).collect()
}

#[test]
fn test_well_typed_program_passes() {
    let (result, diagnostics) = check(&adder_program());
    assert!(result);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_absent_root_passes() {
    let mut ctx = SemanticContext::new();
    assert!(ctx.perform_semantic_analysis(None));
    assert!(ctx.diagnostics.is_empty());
}

#[test]
fn test_undeclared_identifier_reported_once() {
    let root = adder_with(vec![
        Node::new(NodeKind::PrintStatement, "", 7).with_child(ident("ghost", 7)),
    ]);
    let (result, diagnostics) = check(&root);
    assert!(!result);
    // The print check sees `error`, the identifier check reports the name.
    assert_eq!(diagnostics, vec![
        Diagnostic {
            line: 7,
            error: SemanticError::NonIntegerPrint { found: "error".to_string() },
        },
        Diagnostic {
            line: 7,
            error: SemanticError::UndeclaredIdentifier { name: "ghost".to_string() },
        },
    ]);
}

#[test]
fn test_repeated_undeclared_uses_are_not_deduplicated() {
    let root = adder_with(vec![
        binary(NodeKind::AddExpression, ident("ghost", 7), ident("ghost", 8)),
    ]);
    let (_, diagnostics) = check(&root);
    let lines: Vec<u32> = diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![7, 8]);
}

#[test]
fn test_independent_violations_are_all_reported() {
    let root = adder_with(vec![
        assign("sum", boolean(true, 7), 7),
        Node::new(NodeKind::WhileStatement, "", 9).with_child(int(1, 9)),
    ]);
    let (result, diagnostics) = check(&root);
    assert!(!result);
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].line, 7);
    assert_eq!(diagnostics[1].line, 9);
}

#[test]
fn test_assignment_type_mismatch() {
    let root = adder_with(vec![
        assign("sum", binary(NodeKind::AddExpression, int(1, 7), boolean(true, 7)), 7),
    ]);
    assert_eq!(errors(&root), vec![SemanticError::AssignmentMismatch {
        name: "sum".to_string(),
        expected: "int".to_string(),
        found: "error".to_string(),
    }]);
}

#[test]
fn test_assignment_to_undeclared_skips_type_check() {
    let root = adder_with(vec![assign("ghost", boolean(true, 7), 7)]);
    assert_eq!(errors(&root), vec![SemanticError::UndeclaredVariable {
        name: "ghost".to_string(),
    }]);
}

#[test]
fn test_assignment_of_subclass_is_rejected() {
    let root = program(vec![
        class("Animal", None, vec![], 1),
        class("Dog", Some("Animal"), vec![], 2),
        class("Main", None, vec![
            var("pet", "Animal", 4),
            assign("pet", leaf(NodeKind::NewObject, "Dog", 5), 5),
        ], 3),
    ]);
    assert_eq!(errors(&root), vec![SemanticError::AssignmentMismatch {
        name: "pet".to_string(),
        expected: "Animal".to_string(),
        found: "Dog".to_string(),
    }]);
}

#[test]
fn test_array_assignment() {
    let ok = Node::new(NodeKind::ArrayAssignStatement, "xs", 7)
        .with_child(int(0, 7))
        .with_child(ident("sum", 7));
    assert!(check(&adder_with(vec![ok])).0);

    let bad = Node::new(NodeKind::ArrayAssignStatement, "sum", 8)
        .with_child(boolean(true, 8))
        .with_child(leaf(NodeKind::NewArray, "", 8));
    assert_eq!(errors(&adder_with(vec![bad])), vec![
        SemanticError::NotAnArray { found: "int".to_string() },
        SemanticError::NonIntegerIndex { found: "boolean".to_string() },
        SemanticError::ArrayElementMismatch { found: "int[]".to_string() },
    ]);

    let undeclared = Node::new(NodeKind::ArrayAssignStatement, "ys", 9)
        .with_child(int(0, 9));
    assert_eq!(errors(&adder_with(vec![undeclared])), vec![
        SemanticError::UndeclaredArray { name: "ys".to_string() },
    ]);
}

#[test]
fn test_conditions_must_be_boolean() {
    let root = adder_with(vec![
        Node::new(NodeKind::IfStatement, "", 7)
            .with_child(binary(NodeKind::LessThanExpression, ident("a", 7), ident("b", 7))),
        Node::new(NodeKind::WhileStatement, "", 8).with_child(ident("sum", 8)),
    ]);
    assert_eq!(errors(&root), vec![
        SemanticError::NonBooleanCondition { found: "int".to_string() },
    ]);
}

#[test]
fn test_method_call_arity() {
    let root = adder_with(vec![
        assign("sum", call("add", leaf(NodeKind::This, "", 7), vec![int(1, 7)], 7), 7),
    ]);
    let (result, diagnostics) = check(&root);
    assert!(!result);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].error, SemanticError::ArityMismatch {
        method: "add".to_string(),
        expected: 2,
        found: 1,
    });
    let categories: Vec<ErrorCategory> = diagnostics.iter().map(|d| d.error.category()).collect();
    assert!(!categories.contains(&ErrorCategory::TypeMismatch));
}

#[test]
fn test_method_call_without_argument_list_skips_arity() {
    let stray = Node::new(NodeKind::MethodCall, "add", 7)
        .with_child(leaf(NodeKind::This, "", 7))
        .with_child(int(1, 7));
    let receiver_only = Node::new(NodeKind::MethodCall, "add", 8)
        .with_child(leaf(NodeKind::This, "", 8));
    let root = adder_with(vec![
        assign("sum", stray, 7),
        assign("sum", receiver_only, 8),
    ]);
    let (result, diagnostics) = check(&root);
    assert!(result);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_method_call_argument_types() {
    let root = adder_with(vec![
        assign("sum", call(
            "add",
            leaf(NodeKind::This, "", 7),
            vec![boolean(true, 7), ident("xs", 7)],
            7,
        ), 7),
    ]);
    assert_eq!(errors(&root), vec![
        SemanticError::ArgumentMismatch {
            method: "add".to_string(),
            position: 1,
            expected: "int".to_string(),
            found: "boolean".to_string(),
        },
        SemanticError::ArgumentMismatch {
            method: "add".to_string(),
            position: 2,
            expected: "int".to_string(),
            found: "int[]".to_string(),
        },
    ]);
}

#[test]
fn test_undefined_method() {
    let root = adder_with(vec![
        call("count", leaf(NodeKind::This, "", 7), vec![], 7),
    ]);
    assert_eq!(errors(&root), vec![
        SemanticError::UndefinedMethod { name: "count".to_string() },
    ]);
}

#[test]
fn test_call_without_argument_list_skips_arity() {
    let root = adder_with(vec![
        Node::new(NodeKind::MethodCall, "add", 7).with_child(leaf(NodeKind::This, "", 7)),
    ]);
    assert!(check(&root).0);
}

#[test]
fn test_return_type_is_not_validated() {
    let root = adder_with(vec![
        Node::new(NodeKind::Return, "", 7).with_child(boolean(true, 7)),
    ]);
    assert!(check(&root).0);
}

#[test]
fn test_array_access_and_length() {
    let root = adder_with(vec![
        Node::new(NodeKind::PrintStatement, "", 7)
            .with_child(binary(NodeKind::ArrayAccess, ident("xs", 7), int(0, 7))),
        Node::new(NodeKind::PrintStatement, "", 8)
            .with_child(unary(NodeKind::Length, ident("xs", 8))),
    ]);
    assert!(check(&root).0);

    let root = adder_with(vec![
        binary(NodeKind::ArrayAccess, ident("sum", 9), boolean(false, 9)),
        unary(NodeKind::Length, ident("flag", 10)),
    ]);
    assert_eq!(errors(&root), vec![
        SemanticError::ArrayAccessOnNonArray { found: "int".to_string() },
        SemanticError::NonIntegerIndex { found: "boolean".to_string() },
        SemanticError::LengthOnNonArray { found: "boolean".to_string() },
    ]);
}

#[test]
fn test_analysis_is_deterministic() {
    let root = adder_with(vec![
        assign("ghost", int(1, 7), 7),
        Node::new(NodeKind::IfStatement, "", 8).with_child(int(0, 8)),
    ]);
    assert_eq!(check(&root), check(&root));
}
