use super::diagnostic::SemanticError;

/// Static types are nominal and spelled the way the surface syntax spells
/// them; class types are the class name itself.
pub type TypeName = String;

pub type SemanticResult<T> = Result<T, SemanticError>;

pub const INT: &str = "int";
pub const BOOLEAN: &str = "boolean";
pub const INT_ARRAY: &str = "int[]";
pub const CLASS: &str = "class";
pub const METHOD: &str = "method";

// `this` is not resolved to its class.
pub const THIS: &str = "this";

// Poisoned types produced when inference fails.
pub const ERROR: &str = "error";
pub const UNKNOWN: &str = "unknown";
