// src/lang/mod.rs

//! The command language: text lines in, drawing operations out.

mod error;
mod parser;

pub use error::ParseError;
pub use parser::{parse_str, BgRect, FigurePos, Parser, ParserState};
