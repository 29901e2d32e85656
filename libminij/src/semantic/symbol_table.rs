use itertools::Itertools;
use std::fmt;
use super::super::symbol::{Scope, Symbol};
use super::diagnostic::SemanticError;
use super::types::{SemanticResult, INT_ARRAY};

/// Every symbol of a compilation unit in declaration order, plus the nesting
/// depth the binder is currently at.
///
/// Lookups by name are flat: the first symbol declared with a name wins
/// regardless of depth. Depth is only used to reject duplicates, so two
/// sibling classes share scope `1` for their members.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    current_scope: Scope,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            current_scope: 0,
        }
    }

    /// Inserts `symbol` unless its name is already taken at its depth, in
    /// which case the earlier declaration is kept.
    pub fn add_symbol(&mut self, symbol: Symbol) -> SemanticResult<()> {
        if self.is_duplicate_identifier(symbol.get_name(), symbol.get_scope()) {
            warn!(
                "rejecting duplicate {} '{}' in scope {}",
                symbol.kind_label(),
                symbol.get_name(),
                symbol.get_scope()
            );
            return Err(SemanticError::DuplicateIdentifier {
                name: symbol.get_name().to_string(),
                scope: symbol.get_scope(),
            });
        }
        debug!("adding {}", symbol);
        self.symbols.push(symbol);
        Ok(())
    }

    pub fn get_symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.get_name() == name)
    }

    pub fn is_symbol_in_table(&self, name: &str) -> bool {
        self.get_symbol(name).is_some()
    }

    pub fn is_symbol_in_scope(&self, name: &str, scope: Scope) -> bool {
        self.symbols.iter()
            .any(|s| s.get_name() == name && s.get_scope() == scope)
    }

    pub fn get_symbols_by_scope(&self, scope: Scope) -> Vec<&Symbol> {
        self.symbols.iter()
            .filter(|s| s.get_scope() == scope)
            .collect()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn enter_scope(&mut self) {
        self.current_scope += 1;
        trace!("entering scope {}", self.current_scope);
    }

    pub fn exit_scope(&mut self) {
        if self.current_scope > 0 {
            trace!("leaving scope {}", self.current_scope);
            self.current_scope -= 1;
        }
    }

    pub fn current_scope(&self) -> Scope {
        self.current_scope
    }

    /// Type compatibility is name equality. Subclasses are not compatible
    /// with their parent class.
    pub fn check_types(&self, expected: &str, actual: &str) -> bool {
        if expected == actual {
            return true;
        }
        if expected == INT_ARRAY && actual == INT_ARRAY {
            return true;
        }
        false
    }

    pub fn is_undeclared_identifier(&self, name: &str) -> bool {
        !self.is_symbol_in_table(name)
    }

    pub fn is_duplicate_identifier(&self, name: &str, scope: Scope) -> bool {
        self.is_symbol_in_scope(name, scope)
    }

    /// Renders the table as a Graphviz digraph with one cluster per scope
    /// depth.
    pub fn to_dot(&self) -> String {
        DotGraph { table: self }.to_string()
    }
}

struct DotGraph<'a> {
    table: &'a SymbolTable,
}

impl<'a> fmt::Display for DotGraph<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "digraph SymbolTable {{")?;
        writeln!(f, "  node [shape=record];")?;
        let by_scope = self.table.symbols.iter()
            .sorted_by_key(|s| s.get_scope())
            .chunk_by(|s| s.get_scope());
        for (scope, symbols) in &by_scope {
            writeln!(f, "  subgraph cluster_{} {{", scope)?;
            writeln!(f, "    label=\"Scope {}\";", scope)?;
            for symbol in symbols {
                writeln!(
                    f,
                    "    \"{}_{}_{}\" [label=\"{{{}|Name: {}|Type: {}}}\"];",
                    symbol.kind_label(),
                    escape_id(symbol.get_name()),
                    symbol.get_scope(),
                    symbol.kind_label(),
                    escape_record(symbol.get_name()),
                    escape_record(symbol.get_type())
                )?;
            }
            writeln!(f, "  }}")?;
        }
        writeln!(f, "}}")
    }
}

fn escape_id(id: &str) -> String {
    id.replace('\\', "\\\\").replace('"', "\\\"")
}

// `[` and `]` are fine inside record labels, but braces and bars are not.
fn escape_record(label: &str) -> String {
    label.chars().fold(String::new(), |mut acc, c| {
        if "{}|<>\"\\".contains(c) {
            acc.push('\\');
        }
        acc.push(c);
        acc
    })
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "===== SYMBOL TABLE =====")?;
        if self.symbols.is_empty() {
            return writeln!(f, "Symbol table is empty!");
        }
        for symbol in &self.symbols {
            writeln!(f, "{}", symbol)?;
        }
        writeln!(f, "=======================")
    }
}

#[cfg(test)]
fn sample_table() -> SymbolTable {
    let mut table = SymbolTable::new();
    table.add_symbol(Symbol::class("Main", 0, None)).unwrap();
    table.add_symbol(Symbol::variable("x", "int", 1, false, "Main")).unwrap();
    table.add_symbol(Symbol::variable("x", "boolean", 2, false, "run")).unwrap();
    table
}

#[test]
fn test_duplicate_in_same_scope_keeps_first() {
    let mut table = sample_table();
    let result = table.add_symbol(Symbol::variable("x", "int[]", 1, true, "Main"));
    assert_eq!(result, Err(SemanticError::DuplicateIdentifier {
        name: "x".to_string(),
        scope: 1,
    }));
    assert_eq!(table.len(), 3);
    assert_eq!(table.get_symbols_by_scope(1)[0].get_type(), "int");
}

#[test]
fn test_lookup_ignores_scope() {
    let table = sample_table();
    assert_eq!(table.get_symbol("x").unwrap().get_type(), "int");
    assert!(table.is_symbol_in_scope("x", 2));
    assert!(!table.is_symbol_in_scope("x", 3));
    assert!(table.is_undeclared_identifier("y"));
    assert!(!table.is_undeclared_identifier("Main"));
}

#[test]
fn test_scope_depth_floors_at_zero() {
    let mut table = SymbolTable::new();
    table.exit_scope();
    assert_eq!(table.current_scope(), 0);
    table.enter_scope();
    table.enter_scope();
    table.exit_scope();
    assert_eq!(table.current_scope(), 1);
}

#[test]
fn test_check_types_is_name_equality() {
    let mut table = SymbolTable::new();
    table.add_symbol(Symbol::class("Animal", 0, None)).unwrap();
    table.add_symbol(Symbol::class("Dog", 0, Some("Animal".to_string()))).unwrap();
    assert!(table.check_types("int[]", "int[]"));
    assert!(table.check_types("Dog", "Dog"));
    assert!(!table.check_types("Animal", "Dog"));
    assert!(!table.check_types("int", "error"));
}

#[test]
fn test_display_lists_symbols() {
    let out = sample_table().to_string();
    assert!(out.starts_with("===== SYMBOL TABLE =====\n"));
    assert!(out.contains("Class | Name: Main, Type: class, Scope: 0\n"));
    assert!(out.contains("Variable | Name: x, Type: boolean, Scope: 2\n"));
    assert_eq!(SymbolTable::new().to_string(), "===== SYMBOL TABLE =====\nSymbol table is empty!\n");
}

#[test]
fn test_dot_groups_by_scope() {
    let mut table = sample_table();
    table.add_symbol(Symbol::variable("y", "int[]", 1, true, "Main")).unwrap();
    let dot = table.to_dot();
    assert!(dot.starts_with("digraph SymbolTable {\n  node [shape=record];\n"));
    let cluster_0 = dot.find("subgraph cluster_0").unwrap();
    let cluster_1 = dot.find("subgraph cluster_1").unwrap();
    let cluster_2 = dot.find("subgraph cluster_2").unwrap();
    assert!(cluster_0 < cluster_1 && cluster_1 < cluster_2);
    assert_eq!(dot.matches("subgraph cluster_1").count(), 1);
    assert!(dot.contains("    \"Variable_y_1\" [label=\"{Variable|Name: y|Type: int[]}\"];\n"));
    assert!(dot.ends_with("}\n"));
}

#[test]
fn test_dot_escapes_unusual_names() {
    let mut table = SymbolTable::new();
    table.add_symbol(Symbol::variable("my \"x\"", "int", 0, false, "")).unwrap();
    let dot = table.to_dot();
    assert!(dot.contains(
        "    \"Variable_my \\\"x\\\"_0\" [label=\"{Variable|Name: my \\\"x\\\"|Type: int}\"];\n"
    ));
}
