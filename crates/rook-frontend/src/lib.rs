pub mod expand;
pub mod lex;
pub mod parse;
pub mod resolve;

#[cfg(test)]
mod testing;
