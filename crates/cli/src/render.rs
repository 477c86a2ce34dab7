use quarkboard_core::config::AppConfig;
use quarkboard_core::{Emitter, compose};
use std::io::Write;
use std::path::PathBuf;

pub fn run(config: AppConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    let emitter = Emitter::new(config.provenance());
    let boot = quarkboard_runtime::boot(config)?;
    let composition = compose(&boot.template, &boot.registry)?;

    for failure in &composition.failures {
        eprintln!("plugin '{}' skipped: {}", failure.plugin, failure.reason);
    }

    let html = emitter.emit(&composition.document);
    match output {
        Some(path) => {
            std::fs::write(&path, &html)?;
            eprintln!("Wrote {} bytes to {}", html.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&html)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
