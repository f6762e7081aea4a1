/// Literal substitution rules applied to the template files
///
/// Every rule is a plain substring replacement: no patterns, no word
/// boundaries, no escaping. Rules are applied in the order they were added.

use crate::core::names::{AnalyzerName, AnalyzerTitle};

/// Ordered list of literal `from -> to` replacements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitutions {
    rules: Vec<(String, String)>,
}

impl Substitutions {
    /// Rules for the build description (`CMakeLists.txt`)
    ///
    /// The display title is deliberately absent here; only source files
    /// carry it.
    pub fn for_project_file(template_name: &str, name: &AnalyzerName) -> Self {
        let upper = template_name.to_ascii_uppercase();
        let new_upper = name.upper();

        Self {
            rules: vec![
                (
                    format!("{}Analyzer", template_name),
                    format!("{}Analyzer", name),
                ),
                (
                    format!("{}ANALYZER", upper),
                    format!("{}ANALYZER", new_upper),
                ),
                (
                    format!("{}SimulationDataGenerator", template_name),
                    format!("{}SimulationDataGenerator", name),
                ),
            ],
        }
    }

    /// Rules for renamed `.cpp`/`.h` sources
    pub fn for_source_file(
        template_name: &str,
        template_title: &str,
        name: &AnalyzerName,
        title: &AnalyzerTitle,
    ) -> Self {
        let upper = template_name.to_ascii_uppercase();
        let new_upper = name.upper();

        Self {
            rules: vec![
                (
                    format!("{}Analyzer", template_name),
                    format!("{}Analyzer", name),
                ),
                (
                    format!("{}_ANALYZER_", upper),
                    format!("{}_ANALYZER_", new_upper),
                ),
                (
                    format!("{}_SIMULATION_DATA_GENERATOR", upper),
                    format!("{}_SIMULATION_DATA_GENERATOR", new_upper),
                ),
                (
                    format!("{}SimulationDataGenerator", template_name),
                    format!("{}SimulationDataGenerator", name),
                ),
                (template_title.to_string(), title.as_str().to_string()),
            ],
        }
    }

    /// Apply every rule in order
    pub fn apply(&self, content: &str) -> String {
        self.rules
            .iter()
            .fold(content.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
    }

    pub fn rules(&self) -> &[(String, String)] {
        &self.rules
    }
}

/// Compute the new name of a template source file
///
/// Every occurrence of the template name is removed and the new name is
/// prepended. A file that never mentions the template name simply gets the
/// prefix: `main.cpp` becomes `Foomain.cpp`.
pub fn rename_file_name(file_name: &str, template_name: &str, name: &AnalyzerName) -> String {
    let root = file_name.replace(template_name, "");
    format!("{}{}", name, root)
}
