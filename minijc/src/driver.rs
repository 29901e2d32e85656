use colored::*;
use libminij::compiler::{CompileError, Compiler, SUCCESS_EXIT_CODE};
use libminij::semantic::{AstScanner, SemanticContext, TypeChecker};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug)]
pub struct Options {
    pub semantic: bool,
    pub print_symbols: bool,
    pub symbol_graph: Option<String>,
    pub print_tree: bool,
}

impl Options {
    fn wants_symbols(&self) -> bool {
        self.semantic || self.print_symbols || self.symbol_graph.is_some()
    }
}

pub struct Driver {
    compiler: Compiler,
    options: Options,
}

impl Driver {

    pub fn new(options: Options) -> Driver {
        debug!("{:?}", options);
        Driver {
            compiler: Compiler::new(),
            options: options,
        }
    }

    /// Runs every requested phase on `path` and returns the process exit
    /// code for it.
    pub fn run(&self, path: &str) -> i32 {
        match self.run_phases(path) {
            Ok(()) => SUCCESS_EXIT_CODE,
            Err(err) => {
                report(&err);
                err.exit_code()
            }
        }
    }

    fn run_phases(&self, path: &str) -> Result<(), CompileError> {
        let root = self.compiler.load_tree(path)?;
        println!("The compiler successfully generated a syntax tree for {}!", path);
        if self.options.print_tree {
            println!("{}", root);
        }
        if !self.options.wants_symbols() {
            return Ok(());
        }

        let mut ctx = SemanticContext::new();
        ctx.build_symbol_table(Some(&root));
        if self.options.print_symbols {
            print!("{}", ctx.table);
        }
        if let Some(ref graph_path) = self.options.symbol_graph {
            match fs::write(graph_path, ctx.table.to_dot()) {
                Ok(()) => {
                    println!("Generated DOT file: {}", graph_path);
                    render_pdf(graph_path);
                },
                Err(err) => eprintln!("Failed to write {}: {}", graph_path, err),
            }
        }
        if !self.options.semantic {
            for diagnostic in &ctx.diagnostics {
                eprintln!("{}", diagnostic);
            }
            return Ok(());
        }

        println!("Performing Semantic Analysis...");
        let checked = ctx.perform_semantic_analysis(Some(&root));
        let analysis = ctx.into_analysis();
        if !checked || !analysis.is_success() {
            return Err(CompileError::Semantic(analysis));
        }
        println!("{}", "Semantic analysis completed successfully!".green().bold());
        Ok(())
    }

}

/// `symboltable.dot` renders to `symboltable.pdf` next to it.
fn pdf_path(dot_path: &str) -> PathBuf {
    Path::new(dot_path).with_extension("pdf")
}

/// Runs Graphviz on the written graph. A missing `dot` only costs the PDF.
fn render_pdf(dot_path: &str) {
    let pdf = pdf_path(dot_path);
    let mut output = OsString::from("-o");
    output.push(&pdf);
    match Command::new("dot").arg("-Tpdf").arg(dot_path).arg(output).status() {
        Ok(status) if status.success() => println!("Generated PDF file: {}", pdf.display()),
        Ok(status) => warn!("dot exited with {} while rendering {}", status, dot_path),
        Err(err) => warn!("cannot run dot to render {}: {}", dot_path, err),
    }
}

fn report(err: &CompileError) {
    match *err {
        CompileError::Semantic(ref analysis) => {
            for diagnostic in &analysis.diagnostics {
                eprintln!("{}", diagnostic);
            }
            eprintln!("{}", "Semantic analysis failed with errors.".red().bold());
        },
        CompileError::Syntax(ref msg) => {
            eprintln!("{}", "Syntax errors found! See the logs below:".red().bold());
            eprintln!("\t@error {}", msg);
            eprintln!("End of syntax errors!");
        },
        ref other => {
            eprintln!("{}", other.to_string().red().bold());
        },
    }
}

#[test]
fn test_pdf_sits_next_to_the_graph() {
    assert_eq!(pdf_path("symboltable.dot"), PathBuf::from("symboltable.pdf"));
    assert_eq!(pdf_path("out/graph.gv"), PathBuf::from("out/graph.pdf"));
    assert_eq!(pdf_path("graph"), PathBuf::from("graph.pdf"));
}
