//! Skyline FEA command line driver
//!
//! Usage: `skyline-fea <model.json>`
//!
//! Reads a JSON model, runs it and prints the results as JSON on stdout.
//! `SKYLINE_FEA_MODE=check` stops after the data check; `RUST_LOG` controls
//! the log output on stderr.

use std::env;
use std::fs::File;
use std::io::BufReader;

use anyhow::{bail, Context, Result};

use skyline_fea::prelude::*;

fn solution_mode() -> Result<SolutionMode> {
    match env::var("SKYLINE_FEA_MODE") {
        Err(_) => Ok(SolutionMode::Execution),
        Ok(value) => match value.to_ascii_lowercase().as_str() {
            "check" | "datacheck" | "0" => Ok(SolutionMode::DataCheck),
            "run" | "execution" | "1" => Ok(SolutionMode::Execution),
            other => bail!("SKYLINE_FEA_MODE must be 'check' or 'run', got '{other}'"),
        },
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(path) = env::args().nth(1) else {
        bail!("usage: skyline-fea <model.json>");
    };

    let file = File::open(&path).with_context(|| format!("cannot open {path}"))?;
    let mut model = Model::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot load model from {path}"))?;

    let options = AnalysisOptions::default().with_mode(solution_mode()?);
    let results = model
        .analyze(&options)
        .with_context(|| format!("analysis of '{}' failed", model.title))?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
