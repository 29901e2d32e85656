use std::fmt;
use super::semantic::types::{CLASS, METHOD};

pub type Scope = usize;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub tipe: String,
}

impl Parameter {
    pub fn new<S, T>(name: S, tipe: T) -> Parameter
        where S: Into<String>, T: Into<String>
    {
        Parameter {
            name: name.into(),
            tipe: tipe.into(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassSymbol {
    pub parent_class: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MethodSymbol {
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    pub owning_class: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariableSymbol {
    pub is_array: bool,
    /// Enclosing method, or the enclosing class for fields.
    pub owner_scope: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SymbolKind {
    Generic,
    Class(ClassSymbol),
    Method(MethodSymbol),
    Variable(VariableSymbol),
}

/// A named entity recorded by the binder. `scope` is the nesting depth the
/// symbol was declared at, not a unique scope identity.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Symbol {
    name: String,
    tipe: String,
    scope: Scope,
    kind: SymbolKind,
}

impl Symbol {
    pub fn generic<S, T>(name: S, tipe: T, scope: Scope) -> Symbol
        where S: Into<String>, T: Into<String>
    {
        Symbol {
            name: name.into(),
            tipe: tipe.into(),
            scope: scope,
            kind: SymbolKind::Generic,
        }
    }

    pub fn class<S>(name: S, scope: Scope, parent_class: Option<String>) -> Symbol
        where S: Into<String>
    {
        Symbol {
            name: name.into(),
            tipe: CLASS.to_string(),
            scope: scope,
            kind: SymbolKind::Class(ClassSymbol { parent_class: parent_class }),
        }
    }

    pub fn method<S, R, C>(
        name: S,
        return_type: R,
        parameters: Vec<Parameter>,
        scope: Scope,
        owning_class: C,
    ) -> Symbol
        where S: Into<String>, R: Into<String>, C: Into<String>
    {
        Symbol {
            name: name.into(),
            tipe: METHOD.to_string(),
            scope: scope,
            kind: SymbolKind::Method(MethodSymbol {
                return_type: return_type.into(),
                parameters: parameters,
                owning_class: owning_class.into(),
            }),
        }
    }

    pub fn variable<S, T, O>(
        name: S,
        tipe: T,
        scope: Scope,
        is_array: bool,
        owner_scope: O,
    ) -> Symbol
        where S: Into<String>, T: Into<String>, O: Into<String>
    {
        Symbol {
            name: name.into(),
            tipe: tipe.into(),
            scope: scope,
            kind: SymbolKind::Variable(VariableSymbol {
                is_array: is_array,
                owner_scope: owner_scope.into(),
            }),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_type(&self) -> &str {
        &self.tipe
    }

    pub fn get_scope(&self) -> Scope {
        self.scope
    }

    pub fn get_kind(&self) -> &SymbolKind {
        &self.kind
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            SymbolKind::Generic => "Symbol",
            SymbolKind::Class(_) => "Class",
            SymbolKind::Method(_) => "Method",
            SymbolKind::Variable(_) => "Variable",
        }
    }

    pub fn as_method(&self) -> Option<&MethodSymbol> {
        match self.kind {
            SymbolKind::Method(ref method) => Some(method),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} | Name: {}, Type: {}, Scope: {}",
            self.kind_label(),
            self.name,
            self.tipe,
            self.scope
        )
    }
}

#[test]
fn test_declared_types_of_classes_and_methods() {
    let class = Symbol::class("Foo", 0, Some("Bar".to_string()));
    assert_eq!(class.get_type(), "class");
    let method = Symbol::method("run", "int", Vec::new(), 1, "Foo");
    assert_eq!(method.get_type(), "method");
    assert_eq!(method.as_method().unwrap().return_type, "int");
    assert!(class.as_method().is_none());
}

#[test]
fn test_display_symbol() {
    let var = Symbol::variable("xs", "int[]", 2, true, "main");
    assert_eq!(var.to_string(), "Variable | Name: xs, Type: int[], Scope: 2");
    let generic = Symbol::generic("g", "int", 0);
    assert_eq!(generic.to_string(), "Symbol | Name: g, Type: int, Scope: 0");
}
