extern crate colored;
extern crate libminij;

mod collector;
mod compile_pass;
mod compile_fail;
mod test_case;

use colored::*;
use self::collector::collect_test_cases;
use std::env;
use std::process;

fn main() {
    let root = env::args().nth(1).unwrap_or_else(|| "tests".to_string());
    let test_cases = match collect_test_cases(&root) {
        Ok(test_cases) => test_cases,
        Err(err) => {
            println!("{}", format!("Cannot collect tests from `{}`: {}", root, err).red().bold());
            process::exit(1);
        }
    };
    let mut failures = Vec::new();
    println!("{}", "Running `minij` semantic analysis tests...".blue().bold());
    println!("");
    let test_case_count = test_cases.len();
    for test_case in test_cases {
        let result = test_case.execute();
        if let Err(ref err) = result {
            failures.push(test_case.name().to_string());
            println!("{}", format!("Error in `{}` ({}):", test_case.name(), test_case.expectation()).red().bold());
            println!("{}", err);
            println!("");
        }
    }
    if failures.is_empty() {
        println!("{}", format!("{} tests passed!", test_case_count).green().bold());
    } else {
        println!("{}", format!("{} tests failed:", failures.len()).red().bold());
        for failure in &failures {
            println!("\t{}", failure.red());
        }
    }
    println!("");
    if !failures.is_empty() {
        process::exit(1);
    }
}
