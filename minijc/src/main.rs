extern crate clap;
extern crate colored;
extern crate env_logger;
#[macro_use] extern crate log;
extern crate libminij;

mod driver;

use clap::{Arg, ArgAction, Command};
use driver::{Driver, Options};
use libminij::compiler::SUCCESS_EXIT_CODE;
use std::process;

fn main() {
    env_logger::init();

    let matches = Command::new("minijc")
        .version("0.1.0")
        .author("Kyle Phelps <kylep91@gmail.com>")
        .about("MiniJava symbol table and semantic analysis")
        .arg(Arg::new("INPUT")
            .required(true)
            .num_args(1..)
            .help("Sets the tree files to analyze, - reads stdin"))
        .arg(Arg::new("semantic")
            .long("semantic")
            .action(ArgAction::SetTrue)
            .help("Type checks the tree"))
        .arg(Arg::new("print-symbols")
            .long("print-symbols")
            .action(ArgAction::SetTrue)
            .help("Prints the symbol table"))
        .arg(Arg::new("symbol-graph")
            .long("symbol-graph")
            .value_name("FILE")
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("symboltable.dot")
            .help("Writes the symbol table as a Graphviz file"))
        .arg(Arg::new("print-tree")
            .long("print-tree")
            .action(ArgAction::SetTrue)
            .help("Prints the parsed tree"))
        .get_matches();

    let driver = Driver::new(Options {
        semantic: matches.get_flag("semantic"),
        print_symbols: matches.get_flag("print-symbols"),
        symbol_graph: matches.get_one::<String>("symbol-graph").cloned(),
        print_tree: matches.get_flag("print-tree"),
    });

    let mut exit_code = SUCCESS_EXIT_CODE;
    for path in matches.get_many::<String>("INPUT").into_iter().flatten() {
        let code = driver.run(path);
        if exit_code == SUCCESS_EXIT_CODE {
            exit_code = code;
        }
    }
    process::exit(exit_code);
}
