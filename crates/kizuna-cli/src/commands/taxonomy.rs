//! Taxonomy command implementation.

use crate::error::Result;
use crate::output::Formatter;

/// Execute the taxonomy command.
pub fn execute_taxonomy(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_taxonomy()?);
    Ok(())
}
