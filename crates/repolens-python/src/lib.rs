pub mod heuristics;
pub mod lexer;
pub mod normalize;

use std::path::Path;

use anyhow::Result;
use tree_sitter::Language;

use repolens_core::profile::LanguageProfile;
use repolens_core::types::Extraction;

/// Python language profile using tree-sitter.
pub struct PythonProfile {
    language: Language,
}

impl PythonProfile {
    pub fn new() -> Result<Self> {
        let language: Language = tree_sitter_python::LANGUAGE.into();
        Ok(Self { language })
    }
}

impl LanguageProfile for PythonProfile {
    fn language(&self) -> &'static str {
        "python"
    }

    fn file_extensions(&self) -> &[&str] {
        &["py"]
    }

    fn normalize(&self, path: &Path, content: &str) -> Result<Vec<String>> {
        let tokens = lexer::classify_tokens(&self.language, path, content)?;
        Ok(normalize::normalize_tokens(&tokens))
    }

    fn is_function(&self, line: &str) -> bool {
        heuristics::is_function(line)
    }

    fn is_loop(&self, line: &str) -> bool {
        heuristics::is_loop(line)
    }

    fn is_import(&self, line: &str) -> bool {
        heuristics::is_import(line)
    }

    fn extract_packages(&self, line: &str) -> Extraction {
        heuristics::extract_packages(line)
    }

    fn extract_parameters(&self, line: &str) -> Extraction {
        heuristics::extract_parameters(line)
    }

    fn extract_variables(&self, line: &str) -> Extraction {
        heuristics::extract_variables(line)
    }
}
