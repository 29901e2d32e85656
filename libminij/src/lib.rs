extern crate itertools;
#[macro_use] extern crate log;
extern crate nom;
#[cfg(test)]
extern crate tempfile;

pub mod ast;
pub mod compiler;
pub mod parser;
pub mod semantic;
pub mod source_file;
pub mod symbol;
