//! End-to-end run: load, extract, classify, hand off to a sink.

use std::io::Write;

use crate::classify::Classifier;
use crate::config::{Config, Mode};
use crate::extract::extract;
use crate::geodat::GeoDatabase;
use crate::sink::{self, Extracted, IpSetBackend, IpsetCommand};
use crate::{Error, Result};

/// Run the configured conversion, writing user-facing output to `out`.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    run_with_backend(config, out, &mut IpsetCommand::new())
}

/// Like [`run`], loading ipsets through `backend`.
pub fn run_with_backend<W, B>(config: &Config, out: &mut W, backend: &mut B) -> Result<()>
where
    W: Write,
    B: IpSetBackend + ?Sized,
{
    config.validate()?;

    if config.mode == Mode::IpSet {
        backend
            .probe()
            .map_err(|e| Error::Config(format!("ipset init failed: {}", e)))?;
    }

    let db = GeoDatabase::open(&config.database)?;
    let text = extract(&db, &config.category)?;
    log::info!(
        "Extracted {} bytes for category {:?} from {:?}",
        text.len(),
        config.category,
        config.database
    );

    let mut classifier = Classifier::new();
    if let Some(workers) = config.workers {
        classifier = classifier.with_workers(workers);
    }
    let extracted = Extracted::new(&text, &classifier);

    match config.mode {
        Mode::Show => sink::show(out, &extracted, config)?,
        Mode::Save => {
            sink::save(&extracted, config)?;
            writeln!(out, "OK")?;
        }
        Mode::IpSet => {
            sink::load_ipsets(backend, extracted.classified(), config)?;
            writeln!(out, "OK")?;
        }
    }

    if extracted.is_classified() && extracted.classified().dropped > 0 {
        log::debug!("Dropped {} unparsable lines", extracted.classified().dropped);
    }
    Ok(())
}
