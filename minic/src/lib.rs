pub mod compile;
pub mod config;
pub mod error;
pub mod grammer;
pub mod util;

pub use compile::{program2listing, Listing};
pub use config::Config;
pub use error::Error;
pub use grammer::ast::Program;
pub use grammer::lexer::Lexer;
pub use grammer::parsercore::Parser;

use log::info;
use std::io::Read;

/// Read a whole program. Errors swallowed by list recovery are returned next to the tree.
pub fn parse<R: Read>(reader: R, config: &Config) -> Result<(Program, Vec<Error>), Error> {
    let lexer = Lexer::new(reader, config.buffer_size)?;
    let (program, recovered) = Parser::new(lexer)?.parse()?;
    info!(
        "parsed {} method(s), {} recovered error(s)",
        program.0.len(),
        recovered.len()
    );
    Ok((program, recovered))
}
