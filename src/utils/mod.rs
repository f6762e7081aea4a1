/// Utility modules for the analyzer renamer
///
/// This module contains utility functions for file handling, output formatting,
/// and the interactive prompts.

pub mod file_utils;
pub mod output_formatter;
pub mod prompt;
