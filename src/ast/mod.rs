/// Reflection model module
/// Contains everything a file parse produces besides the file itself
///
/// Submodules:
/// - docblock: Structured documentation comments and their tags
/// - elements: Includes, constants, functions, classes, interfaces and their members
pub mod docblock;
pub mod elements;
