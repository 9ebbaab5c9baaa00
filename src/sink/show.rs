//! Print prefixes to an output stream.

use std::io::Write;

use super::Extracted;
use crate::{Config, Result};

/// Print extracted prefixes.
///
/// Without suppression flags the raw text is echoed as-is. Otherwise each
/// non-suppressed family is printed, IPv4 first.
pub fn show<W: Write>(out: &mut W, extracted: &Extracted<'_>, config: &Config) -> Result<()> {
    if !config.splits_families() {
        out.write_all(extracted.text())?;
        out.write_all(b"\n")?;
        return Ok(());
    }

    let classified = extracted.classified();
    if !config.skip_v4 {
        for net in &classified.v4 {
            writeln!(out, "{}", net)?;
        }
    }
    if !config.skip_v6 {
        for net in &classified.v6 {
            writeln!(out, "{}", net)?;
        }
    }
    Ok(())
}
