use libminij::compiler::{CompileError, Compiler};
use super::test_case::{TestCase, TestResult};

pub struct CompilePass {
    path: String
}

impl CompilePass {
    pub fn new(path: String) -> Box<dyn TestCase> {
        Box::new(CompilePass {
            path: path
        })
    }
}

impl TestCase for CompilePass {
    fn name(&self) -> &str {
        &self.path
    }

    fn expectation(&self) -> &'static str {
        "semantic-pass"
    }

    fn execute(&self) -> TestResult {
        let compiler = Compiler::new();
        compiler.compile(&self.path)
            .map(|_| ())
            .map_err(|err| match err {
                CompileError::Semantic(ref analysis) => {
                    analysis.diagnostics.iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("\n")
                },
                other => other.to_string(),
            })
    }
}
