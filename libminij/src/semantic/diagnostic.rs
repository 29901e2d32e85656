use std::error::Error;
use std::fmt;
use std::slice;
use super::super::symbol::Scope;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCategory {
    DuplicateIdentifier,
    UndeclaredIdentifier,
    TypeMismatch,
    ArityMismatch,
    StructuralMismatch,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SemanticError {
    DuplicateIdentifier { name: String, scope: Scope },
    UndeclaredIdentifier { name: String },
    UndeclaredVariable { name: String },
    UndeclaredArray { name: String },
    UndefinedMethod { name: String },
    AssignmentMismatch { name: String, expected: String, found: String },
    NotAnArray { found: String },
    NonIntegerIndex { found: String },
    ArrayElementMismatch { found: String },
    NonBooleanCondition { found: String },
    NonIntegerPrint { found: String },
    ArityMismatch { method: String, expected: usize, found: usize },
    ArgumentMismatch { method: String, position: usize, expected: String, found: String },
    ArrayAccessOnNonArray { found: String },
    LengthOnNonArray { found: String },
}

impl SemanticError {
    pub fn category(&self) -> ErrorCategory {
        match *self {
            SemanticError::DuplicateIdentifier { .. } => ErrorCategory::DuplicateIdentifier,
            SemanticError::UndeclaredIdentifier { .. }
            | SemanticError::UndeclaredVariable { .. }
            | SemanticError::UndeclaredArray { .. }
            | SemanticError::UndefinedMethod { .. } => ErrorCategory::UndeclaredIdentifier,
            SemanticError::AssignmentMismatch { .. }
            | SemanticError::NonIntegerIndex { .. }
            | SemanticError::ArrayElementMismatch { .. }
            | SemanticError::NonIntegerPrint { .. }
            | SemanticError::ArgumentMismatch { .. } => ErrorCategory::TypeMismatch,
            SemanticError::ArityMismatch { .. } => ErrorCategory::ArityMismatch,
            SemanticError::NotAnArray { .. }
            | SemanticError::NonBooleanCondition { .. }
            | SemanticError::ArrayAccessOnNonArray { .. }
            | SemanticError::LengthOnNonArray { .. } => ErrorCategory::StructuralMismatch,
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SemanticError::DuplicateIdentifier { ref name, scope } => {
                write!(f, "Duplicate identifier '{}' in scope {}", name, scope)
            }
            SemanticError::UndeclaredIdentifier { ref name } => {
                write!(f, "Undeclared identifier '{}'", name)
            }
            SemanticError::UndeclaredVariable { ref name } => {
                write!(f, "Assignment to undeclared variable '{}'", name)
            }
            SemanticError::UndeclaredArray { ref name } => {
                write!(f, "Assignment to undeclared array '{}'", name)
            }
            SemanticError::UndefinedMethod { ref name } => {
                write!(f, "Undefined method '{}'", name)
            }
            SemanticError::AssignmentMismatch { ref name, ref expected, ref found } => {
                write!(
                    f,
                    "Type mismatch in assignment to '{}'. Expected '{}', got '{}'",
                    name,
                    expected,
                    found
                )
            }
            SemanticError::NotAnArray { ref found } => {
                write!(f, "Type '{}' is not an array type", found)
            }
            SemanticError::NonIntegerIndex { ref found } => {
                write!(f, "Array index must be an integer, got '{}'", found)
            }
            SemanticError::ArrayElementMismatch { ref found } => {
                write!(f, "Cannot assign '{}' to element of int array", found)
            }
            SemanticError::NonBooleanCondition { ref found } => {
                write!(f, "Condition must be of type boolean, got '{}'", found)
            }
            SemanticError::NonIntegerPrint { ref found } => {
                write!(f, "Print statement requires integer expression, got '{}'", found)
            }
            SemanticError::ArityMismatch { ref method, expected, found } => {
                write!(
                    f,
                    "Method '{}' expects {} parameters but got {}",
                    method,
                    expected,
                    found
                )
            }
            SemanticError::ArgumentMismatch { ref method, position, ref expected, ref found } => {
                write!(
                    f,
                    "Parameter type mismatch in call to '{}'. Parameter {} expects '{}', got '{}'",
                    method,
                    position,
                    expected,
                    found
                )
            }
            SemanticError::ArrayAccessOnNonArray { ref found } => {
                write!(f, "Array access requires array type, got '{}'", found)
            }
            SemanticError::LengthOnNonArray { ref found } => {
                write!(f, "Length operator requires array type, got '{}'", found)
            }
        }
    }
}

impl Error for SemanticError {}

/// A semantic error tied to the source line of the node that caused it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub line: u32,
    pub error: SemanticError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Semantic Error at line {}: {}", self.line, self.error)
    }
}

/// Diagnostics in the order they were reported. Repeats are kept.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn report(&mut self, line: u32, error: SemanticError) {
        let diagnostic = Diagnostic {
            line: line,
            error: error,
        };
        debug!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> slice::Iter<Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn count(&self, category: ErrorCategory) -> usize {
        self.iter()
            .filter(|d| d.error.category() == category)
            .count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[test]
fn test_diagnostic_display() {
    let diagnostic = Diagnostic {
        line: 12,
        error: SemanticError::UndeclaredIdentifier { name: "y".to_string() },
    };
    assert_eq!(diagnostic.to_string(), "Semantic Error at line 12: Undeclared identifier 'y'");
}

#[test]
fn test_diagnostics_keep_repeats_in_order() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.report(3, SemanticError::UndeclaredIdentifier { name: "y".to_string() });
    diagnostics.report(1, SemanticError::UndeclaredIdentifier { name: "y".to_string() });
    diagnostics.report(2, SemanticError::ArityMismatch {
        method: "f".to_string(),
        expected: 2,
        found: 1,
    });
    let lines: Vec<u32> = diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![3, 1, 2]);
    assert_eq!(diagnostics.count(ErrorCategory::UndeclaredIdentifier), 2);
    assert_eq!(diagnostics.count(ErrorCategory::ArityMismatch), 1);
}
