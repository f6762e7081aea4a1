/// Analyzer Renamer - turns the SimpleSerial analyzer template into a new analyzer
///
/// This library renames the template's source files and rewrites the class
/// names, macro guards, project name and display title they contain.

pub mod core;
pub mod utils;

// Re-export main types for convenience
pub use crate::core::apply::{apply_plan, ApplyError, ApplyOptions, ApplyReport, AppliedStep};
pub use crate::core::names::{AnalyzerName, AnalyzerTitle, NameError, TitleError};
pub use crate::core::plan::{PlanError, RenamePlan};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rename the template in `project_dir` with default settings
///
/// This is a convenience function for simple use cases; it plans and applies
/// in one go without rollback.
///
/// # Arguments
///
/// * `project_dir` - Directory holding `CMakeLists.txt` and `src`
/// * `name` - New analyzer base name, e.g. `Gamecube`
/// * `title` - New analyzer title, e.g. `GameCube Controller`
pub fn rename_analyzer<P: AsRef<std::path::Path>>(
    project_dir: P,
    name: &str,
    title: &str,
) -> anyhow::Result<ApplyReport> {
    let name = AnalyzerName::parse(name)?;
    let title = AnalyzerTitle::parse(title)?;
    let settings = config::Settings::default();

    app::run_rename(project_dir.as_ref(), &settings, &name, &title, ApplyOptions::default())
}

/// Template configuration
pub mod config {
    use anyhow::{Context, Result};
    use log::info;
    use serde::Deserialize;
    use std::path::{Path, PathBuf};

    /// Names and locations describing the template being renamed
    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    pub struct Settings {
        /// Base name used throughout the template
        pub template_name: String,
        /// Display title used in the template sources
        pub template_title: String,
        /// Source directory, relative to the project directory
        pub source_dir: PathBuf,
        /// Build description, relative to the project directory
        pub project_file: PathBuf,
        /// Source extensions to rename, without the dot
        pub extensions: Vec<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                template_name: "SimpleSerial".to_string(),
                template_title: "Simple Serial".to_string(),
                source_dir: PathBuf::from("src"),
                project_file: PathBuf::from("CMakeLists.txt"),
                extensions: vec!["cpp".to_string(), "h".to_string()],
            }
        }
    }

    impl Settings {
        /// Load settings from a JSON file; missing fields take their defaults
        pub fn load(path: &Path) -> Result<Self> {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
            let settings = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid JSON in configuration file {}", path.display()))?;
            info!("Loaded configuration from {}", path.display());
            Ok(settings)
        }
    }
}

/// Command-line application functionality
pub mod app {
    use crate::config::Settings;
    use crate::core::apply::{apply_plan, AppliedStep, ApplyError, ApplyOptions, ApplyReport};
    use crate::core::names::{AnalyzerName, AnalyzerTitle};
    use crate::core::plan::RenamePlan;
    use log::info;
    use std::path::Path;

    /// What happened to a plan handed to [`execute`]
    #[derive(Debug, Clone)]
    pub enum RunOutcome {
        /// Dry run requested; nothing was touched
        DryRun,
        /// Neither a project file nor any source was found
        NothingToDo,
        /// The plan was applied
        Applied(ApplyReport),
    }

    /// Apply `plan` unless this is a dry run or there is nothing to do
    ///
    /// # Arguments
    ///
    /// * `plan` - The plan to execute
    /// * `dry_run` - Only report, never touch the disk
    /// * `options` - Rollback behaviour
    /// * `on_step` - Progress callback, called after each completed step
    pub fn execute(
        plan: &RenamePlan,
        dry_run: bool,
        options: ApplyOptions,
        on_step: impl FnMut(&AppliedStep),
    ) -> Result<RunOutcome, ApplyError> {
        if dry_run {
            info!("Dry run, leaving {} source(s) untouched", plan.sources.len());
            return Ok(RunOutcome::DryRun);
        }

        if plan.is_empty() {
            info!("Nothing to rename");
            return Ok(RunOutcome::NothingToDo);
        }

        apply_plan(plan, options, on_step).map(RunOutcome::Applied)
    }

    /// Plan and apply a rename in one step
    ///
    /// # Arguments
    ///
    /// * `project_dir` - Directory holding the project file and sources
    /// * `settings` - Template configuration
    /// * `name` - Validated analyzer name
    /// * `title` - Validated analyzer title
    /// * `options` - Rollback behaviour
    ///
    /// # Returns
    ///
    /// The journal of completed steps
    pub fn run_rename(
        project_dir: &Path,
        settings: &Settings,
        name: &AnalyzerName,
        title: &AnalyzerTitle,
        options: ApplyOptions,
    ) -> anyhow::Result<ApplyReport> {
        let plan = RenamePlan::build(project_dir, settings, name, title)?;
        let report = match execute(&plan, false, options, |_| {})? {
            RunOutcome::Applied(report) => report,
            RunOutcome::DryRun | RunOutcome::NothingToDo => ApplyReport::default(),
        };
        Ok(report)
    }
}
