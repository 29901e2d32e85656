pub use self::context::SemanticContext;
pub use self::diagnostic::{Diagnostic, Diagnostics, ErrorCategory, SemanticError};
pub use self::infer::get_expression_type;
pub use self::scan::AstScanner;
pub use self::symbol_table::SymbolTable;
pub use self::type_check::TypeChecker;
use super::ast::Node;

mod context;
mod diagnostic;
#[cfg(test)]
mod fixtures;
mod infer;
mod scan;
mod symbol_table;
mod type_check;
pub mod types;

/// Result of analysing one compilation unit.
#[derive(Debug)]
pub struct Analysis {
    pub table: SymbolTable,
    pub diagnostics: Diagnostics,
}

impl Analysis {
    /// Succeeds when neither the binder nor the checker reported anything.
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Binds the tree, then checks it. Checking only starts once the table is
/// complete.
pub fn analyze(root: Option<&Node>) -> Analysis {
    let mut ctx = SemanticContext::new();
    ctx.build_symbol_table(root);
    info!(
        "symbol table built: {} symbols, {} binding diagnostics",
        ctx.table.len(),
        ctx.diagnostics.len()
    );
    let checked = ctx.perform_semantic_analysis(root);
    info!("semantic checks {}", if checked { "passed" } else { "failed" });
    ctx.into_analysis()
}

#[cfg(test)]
use self::fixtures::*;
#[cfg(test)]
use super::ast::NodeKind;

#[test]
fn test_analyze_clean_program() {
    let analysis = analyze(Some(&adder_program()));
    assert!(analysis.is_success());
    assert_eq!(analysis.table.len(), 6);
    assert_eq!(analysis.table.current_scope(), 0);
}

#[test]
fn test_analyze_absent_root() {
    let analysis = analyze(None);
    assert!(analysis.is_success());
    assert!(analysis.table.is_empty());
}

#[test]
fn test_duplicates_fail_the_unit() {
    let root = program(vec![
        class("Main", None, vec![var("x", "int", 2), var("x", "int", 3)], 1),
    ]);
    let analysis = analyze(Some(&root));
    assert!(!analysis.is_success());
    assert_eq!(analysis.diagnostics.count(ErrorCategory::DuplicateIdentifier), 1);
}

#[test]
fn test_binder_and_checker_diagnostics_are_ordered() {
    let root = program(vec![
        class("Main", None, vec![
            var("x", "int", 2),
            var("x", "boolean", 3),
            assign("x", boolean(true, 4), 4),
        ], 1),
    ]);
    let analysis = analyze(Some(&root));
    let lines: Vec<u32> = analysis.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![3, 4]);
    assert_eq!(
        analysis.diagnostics.iter().nth(1).unwrap().to_string(),
        "Semantic Error at line 4: Type mismatch in assignment to 'x'. Expected 'int', got 'boolean'"
    );
}

#[test]
fn test_expression_type_through_public_api() {
    let analysis = analyze(Some(&adder_program()));
    let sum = binary(NodeKind::AddExpression, ident("a", 1), ident("count", 1));
    assert_eq!(get_expression_type(Some(&sum), &analysis.table), "int");
}
