use std::error::Error;
use std::fmt;
use std::io;
use super::ast::Node;
use super::parser;
use super::semantic;
use super::semantic::Analysis;
use super::source_file::SourceFile;

pub const SUCCESS_EXIT_CODE: i32 = 0;

/// Why a compilation unit was rejected, in pipeline order.
#[derive(Debug)]
pub enum CompileError {
    Io(String, io::Error),
    Lexical(String),
    Syntax(String),
    Tree(String),
    Semantic(Analysis),
}

impl CompileError {
    pub fn exit_code(&self) -> i32 {
        match *self {
            CompileError::Io(..) | CompileError::Lexical(_) => 1,
            CompileError::Syntax(_) => 2,
            CompileError::Tree(_) => 3,
            CompileError::Semantic(_) => 4,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CompileError::Io(ref path, ref err) => write!(f, "Cannot read '{}': {}", path, err),
            CompileError::Lexical(ref msg) => write!(f, "Lexical error: {}", msg),
            CompileError::Syntax(ref msg) => write!(f, "Syntax error: {}", msg),
            CompileError::Tree(ref msg) => write!(f, "Tree construction error: {}", msg),
            CompileError::Semantic(ref analysis) => {
                write!(f, "Semantic analysis failed with {} errors", analysis.diagnostics.len())
            },
        }
    }
}

impl Error for CompileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            CompileError::Io(_, ref err) => Some(err),
            _ => None,
        }
    }
}

type CompilerResult = Result<Analysis, CompileError>;

pub struct Compiler {

}

impl Compiler {

    pub fn new() -> Compiler {
        Compiler {
        }
    }

    pub fn compile(&self, path: &str) -> CompilerResult {
        self.load_tree(path)
            .and_then(|root| self.analyze(&root))
    }

    pub fn load_tree(&self, path: &str) -> Result<Node, CompileError> {
        let source_file = SourceFile::load(path)
            .map_err(|err| CompileError::Io(path.to_string(), err))?;
        let text = source_file.text()
            .map_err(|err| CompileError::Lexical(err.to_string()))?;
        info!("read {} bytes from {}", source_file.body.len(), source_file.path);
        read_tree(text)
    }

    pub fn analyze(&self, root: &Node) -> CompilerResult {
        let analysis = semantic::analyze(Some(root));
        if analysis.is_success() {
            Ok(analysis)
        } else {
            Err(CompileError::Semantic(analysis))
        }
    }

}

pub fn read_tree(source: &str) -> Result<Node, CompileError> {
    let lexemes = parser::lex(source).map_err(CompileError::Lexical)?;
    debug!("lexed {} tokens", lexemes.len());
    let nodes = parser::parse(&lexemes).map_err(CompileError::Syntax)?;
    parser::build_tree(nodes).map_err(CompileError::Tree)
}

#[cfg(test)]
use std::io::Write;

#[cfg(test)]
fn compile_source(source: &str) -> CompilerResult {
    let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
    write!(tmpfile, "{}", source).unwrap();
    Compiler::new().compile(tmpfile.path().to_str().unwrap())
}

#[cfg(test)]
fn exit_code(result: CompilerResult) -> i32 {
    result.map(|_| SUCCESS_EXIT_CODE).unwrap_or_else(|err| err.exit_code())
}

#[test]
fn test_simple_compile() {
    let analysis = compile_source(r#"
        (Program "" 1
          (ClassDeclaration "Main" 1
            (VarDeclaration "x" 2 (Type "int" 2))
            (AssignStatement "x" 3 (Int "5" 3))))
    "#).unwrap();
    assert_eq!(analysis.table.len(), 2);
}

#[test]
fn test_semantic_failure() {
    let err = compile_source(r#"
        (Program "" 1
          (PrintStatement "" 2 (Boolean "true" 2)))
    "#).unwrap_err();
    assert_eq!(err.exit_code(), 4);
    match err {
        CompileError::Semantic(analysis) => assert_eq!(analysis.diagnostics.len(), 1),
        other => panic!("expected a semantic failure, found {}", other),
    }
}

#[test]
fn test_outcome_codes() {
    assert_eq!(exit_code(compile_source("(Program \"\" 1)")), 0);
    assert_eq!(exit_code(compile_source("(Program \"\" 1 $)")), 1);
    assert_eq!(exit_code(compile_source("(Program \"\" 1")), 2);
    assert_eq!(exit_code(compile_source("")), 3);
    assert_eq!(exit_code(compile_source("(Int \"1\" 1) (Int \"2\" 2)")), 3);
    assert_eq!(exit_code(Compiler::new().compile("/nonexistent/minij/input.tree")), 1);
}

#[test]
fn test_error_messages() {
    let err = read_tree("(Program 1)").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Syntax error: Unexpected IntLiteral(1) at line 1, expected a quoted value"
    );
    assert_eq!(read_tree("").unwrap_err().to_string(), "Tree construction error: No root node found");
}
