use super::diagnostic::{Diagnostics, SemanticError};
use super::symbol_table::SymbolTable;
use super::Analysis;

/// State shared by the binder and the checker: the table the binder fills
/// in and every diagnostic reported so far.
#[derive(Debug, Default)]
pub struct SemanticContext {
    pub table: SymbolTable,
    pub diagnostics: Diagnostics,
}

impl SemanticContext {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn with_scope<F, R>(&mut self, mut f: F) -> R
        where F: FnMut(&mut SemanticContext) -> R
    {
        self.table.enter_scope();
        let result = f(self);
        self.table.exit_scope();
        result
    }

    pub fn into_analysis(self) -> Analysis {
        Analysis {
            table: self.table,
            diagnostics: self.diagnostics,
        }
    }

    /// Records `error` and returns `false` so checks can be folded into a
    /// pass/fail result.
    pub fn fail(&mut self, line: u32, error: SemanticError) -> bool {
        self.diagnostics.report(line, error);
        false
    }
}
