use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::app_config::Config;
use crate::document::AnnotationDocument;
use crate::file_utils::FileManager;
use crate::repair::{self, AliasTable, RepairReport};

// @module: Application controller for annotation repair

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Where the repaired document was written
    pub output_path: PathBuf,

    /// Everything that was changed
    pub report: RepairReport,
}

impl RunSummary {
    pub fn duplicate_ids_fixed(&self) -> usize {
        self.report.id_fixes.len()
    }

    pub fn category_names_fixed(&self) -> usize {
        self.report.name_fixes.len()
    }
}

/// Main application controller: load, repair, save
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Alias table resolved from the configuration
    aliases: AliasTable,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let aliases = config.alias_table();
        debug!("Using {} category alias(es)", aliases.len());

        Ok(Self { config, aliases })
    }

    /// Input used when none is given explicitly
    pub fn default_input(&self) -> &Path {
        &self.config.input_path
    }

    /// Repair `input` and write it to `output`, or back over `input` when no
    /// output is given. Progress is printed to stdout.
    pub fn run(&self, input: &Path, output: Option<&Path>) -> Result<RunSummary> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(input, output, &mut out)
    }

    /// Same as [`Controller::run`], printing progress to `out`
    pub fn run_with_output<W: Write>(
        &self,
        input: &Path,
        output: Option<&Path>,
        out: &mut W,
    ) -> Result<RunSummary> {
        let output_path = output.unwrap_or(input).to_path_buf();

        writeln!(out, "Loading annotations from: {}", input.display())?;
        let mut document = AnnotationDocument::load(input)
            .with_context(|| format!("Failed to load annotations from {:?}", input))?;
        info!(
            "Loaded {} annotation(s) and {} category(ies)",
            document.annotations()?.len(),
            document.categories()?.len()
        );

        let report = repair::repair_document(&mut document, &self.aliases)
            .with_context(|| format!("Unexpected document structure in {:?}", input))?;

        writeln!(out, "\nChecking for duplicate annotation IDs...")?;
        for fix in &report.id_fixes {
            writeln!(out, "Fixed duplicate annotation ID: {}", fix)?;
        }
        writeln!(out, "Fixed {} duplicate annotation ID(s)", report.id_fixes.len())?;

        writeln!(out, "\nChecking for inconsistent category names...")?;
        for fix in &report.name_fixes {
            writeln!(out, "Fixed category name: {}", fix)?;
        }
        writeln!(out, "Fixed {} category name(s)", report.name_fixes.len())?;

        writeln!(out, "\nSaving annotations to: {}", output_path.display())?;
        if FileManager::file_exists(&output_path) {
            debug!("Replacing existing file {:?}", output_path);
        }
        document
            .save(&output_path)
            .with_context(|| format!("Failed to save annotations to {:?}", output_path))?;

        writeln!(out, "\nDone!")?;
        if report.is_clean() {
            info!("No integrity issues found");
        }

        Ok(RunSummary { output_path, report })
    }
}
