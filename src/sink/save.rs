//! Write prefixes to files.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::{render_prefixes, Extracted};
use crate::{Config, Result};

/// Save extracted prefixes to the configured files.
///
/// When both families target the same file they are written into it in
/// sequence (IPv4 first). The last block written to a file never ends with a
/// newline; a block followed by another keeps its newline.
pub fn save(extracted: &Extracted<'_>, config: &Config) -> Result<()> {
    match (&config.save_v4, &config.save_v6) {
        (Some(v4), Some(v6)) if v4 == v6 => save_combined(v4, extracted, config),
        (v4, v6) => save_separate(v4.as_deref(), v6.as_deref(), extracted, config),
    }
}

fn save_combined(path: &Path, extracted: &Extracted<'_>, config: &Config) -> Result<()> {
    let mut file = File::create(path)?;

    if !config.splits_families() {
        file.write_all(extracted.text())?;
        log::info!("Wrote {} bytes to {:?}", extracted.text().len(), path);
        return Ok(());
    }

    let classified = extracted.classified();
    if !config.skip_v4 {
        file.write_all(&render_prefixes(&classified.v4, !config.skip_v6))?;
        log::info!("Wrote {} IPv4 prefixes to {:?}", classified.v4.len(), path);
    }
    if !config.skip_v6 {
        file.write_all(&render_prefixes(&classified.v6, false))?;
        log::info!("Wrote {} IPv6 prefixes to {:?}", classified.v6.len(), path);
    }
    Ok(())
}

fn save_separate(
    v4_path: Option<&Path>,
    v6_path: Option<&Path>,
    extracted: &Extracted<'_>,
    config: &Config,
) -> Result<()> {
    let write_v6 = v6_path.is_some() && !config.skip_v6;

    if let Some(path) = v4_path.filter(|_| !config.skip_v4) {
        let v4 = &extracted.classified().v4;
        let mut file = File::create(path)?;
        file.write_all(&render_prefixes(v4, write_v6))?;
        log::info!("Wrote {} IPv4 prefixes to {:?}", v4.len(), path);
    }

    if let Some(path) = v6_path.filter(|_| write_v6) {
        let v6 = &extracted.classified().v6;
        let mut file = File::create(path)?;
        file.write_all(&render_prefixes(v6, false))?;
        log::info!("Wrote {} IPv6 prefixes to {:?}", v6.len(), path);
    }

    Ok(())
}
