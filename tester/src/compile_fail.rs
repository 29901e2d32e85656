use libminij::compiler::{CompileError, Compiler};
use super::test_case::{TestCase, TestResult};

pub struct CompileFail {
    path: String
}

impl CompileFail {
    pub fn new(path: String) -> Box<dyn TestCase> {
        Box::new(CompileFail {
            path: path
        })
    }
}

impl TestCase for CompileFail {
    fn name(&self) -> &str {
        &self.path
    }

    fn expectation(&self) -> &'static str {
        "semantic-fail"
    }

    /// Only a semantic rejection counts; a tree that fails to parse is a
    /// broken fixture.
    fn execute(&self) -> TestResult {
        let compiler = Compiler::new();
        match compiler.compile(&self.path) {
            Err(CompileError::Semantic(_)) => Ok(()),
            Err(other) => Err(format!("Expected a semantic failure, got: {}", other)),
            Ok(_) => Err("Expected compilation failure".to_string()),
        }
    }
}
