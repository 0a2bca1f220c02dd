pub mod diagnostic;
pub mod driver;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod printer;
pub mod scanner;
pub mod scope;
pub mod statement;
pub mod token;
