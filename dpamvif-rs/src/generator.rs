//! End-to-end VIF generation: load, merge, re-indent, write.

use std::fs;
use std::path::PathBuf;

use tracing::{error, info};

use crate::constants::XML_INDENT;
use crate::error::{Error, Result};
use crate::merge::merge_ports;
use crate::node::{document_element, NodeRef};
use crate::progress::{ProgressSink, TextProgressBar};
use crate::settings::PortSettingsIndex;
use crate::xml::{indent, parse_file, print_to_string};

/// Validated generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Path of the input USB-IF VIF XML file.
    pub input_vif: PathBuf,
    /// Path the merged VIF is written to.
    pub output_vif: PathBuf,
    /// Path of the DPAM settings XML file.
    pub settings: PathBuf,
    /// Indent string for output re-indentation.
    pub indent: String,
}

impl GeneratorConfig {
    /// Starts building a configuration.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }
}

/// Builder for [`GeneratorConfig`]; `build` fails with
/// [`Error::MissingArgument`] naming the first required field that was not
/// supplied.
#[derive(Debug, Default)]
pub struct GeneratorConfigBuilder {
    input_vif: Option<PathBuf>,
    output_vif: Option<PathBuf>,
    settings: Option<PathBuf>,
    indent: Option<String>,
}

impl GeneratorConfigBuilder {
    /// Sets the input VIF path. Required.
    pub fn input_vif(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_vif = Some(path.into());
        self
    }

    /// Sets the output path. Required.
    pub fn output_vif(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_vif = Some(path.into());
        self
    }

    /// Sets the settings document path. Required.
    pub fn settings(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings = Some(path.into());
        self
    }

    /// Overrides the output indent string.
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = Some(indent.into());
        self
    }

    /// Validates presence of the required fields.
    pub fn build(self) -> Result<GeneratorConfig> {
        let input_vif = self.input_vif.ok_or(Error::MissingArgument("input_vif"))?;
        let output_vif = self
            .output_vif
            .ok_or(Error::MissingArgument("output_vif"))?;
        let settings = self.settings.ok_or(Error::MissingArgument("settings"))?;
        Ok(GeneratorConfig {
            input_vif,
            output_vif,
            settings,
            indent: self.indent.unwrap_or_else(|| XML_INDENT.to_string()),
        })
    }
}

/// Merges a settings document into a VIF document and writes the result.
pub struct VifGenerator {
    config: GeneratorConfig,
    progress: Box<dyn ProgressSink>,
}

impl VifGenerator {
    /// Creates a generator with the default textual progress bar.
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_progress(config, Box::new(TextProgressBar::default()))
    }

    /// Creates a generator with an injected progress sink.
    pub fn with_progress(config: GeneratorConfig, progress: Box<dyn ProgressSink>) -> Self {
        VifGenerator { config, progress }
    }

    /// Runs the whole pipeline.
    ///
    /// On any error nothing is written: the output is serialized to memory
    /// first and only then flushed to the output path.
    pub fn generate(&mut self) -> Result<()> {
        info!(
            input_vif = %self.config.input_vif.display(),
            output_vif = %self.config.output_vif.display(),
            settings = %self.config.settings.display(),
            "generating DPAM VIF file"
        );
        self.progress.set_value(0);

        // Namespace prefixes resolve per document at parse time; the fixed
        // namespace set needs no runtime registration.
        self.progress.set_value(10);

        let input_vif = self.load_input_vif()?;
        self.progress.set_value(30);

        let settings = self.load_settings()?;
        self.progress.set_value(50);

        let index = PortSettingsIndex::from_settings(&settings);
        merge_ports(&input_vif, &index).inspect_err(|e| error!("merge failed: {}", e))?;
        self.progress.set_value(80);

        if let Some(doc) = document_element(&input_vif) {
            indent(&doc, &self.config.indent);
        }
        let output = print_to_string(&input_vif);
        fs::write(&self.config.output_vif, output)?;
        self.progress.set_value(100);

        info!("generation complete");
        Ok(())
    }

    fn load_input_vif(&self) -> Result<NodeRef> {
        parse_file(&self.config.input_vif).map_err(|e| {
            let err = Error::InvalidInputVif {
                path: self.config.input_vif.clone(),
                reason: e.to_string(),
            };
            error!("{}", err);
            err
        })
    }

    fn load_settings(&self) -> Result<NodeRef> {
        parse_file(&self.config.settings).map_err(|e| {
            let err = Error::InvalidSettings {
                path: self.config.settings.clone(),
                reason: e.to_string(),
            };
            error!("{}", err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_input_vif() {
        let err = GeneratorConfig::builder()
            .output_vif("out.xml")
            .settings("settings.xml")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingArgument("input_vif")));
    }

    #[test]
    fn builder_requires_output_vif() {
        let err = GeneratorConfig::builder()
            .input_vif("in.xml")
            .settings("settings.xml")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingArgument("output_vif")));
    }

    #[test]
    fn builder_requires_settings() {
        let err = GeneratorConfig::builder()
            .input_vif("in.xml")
            .output_vif("out.xml")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingArgument("settings")));
    }

    #[test]
    fn builder_defaults_the_indent() {
        let config = GeneratorConfig::builder()
            .input_vif("in.xml")
            .output_vif("out.xml")
            .settings("settings.xml")
            .build()
            .unwrap();
        assert_eq!(config.indent, XML_INDENT);

        let config = GeneratorConfig::builder()
            .input_vif("in.xml")
            .output_vif("out.xml")
            .settings("settings.xml")
            .indent("\t")
            .build()
            .unwrap();
        assert_eq!(config.indent, "\t");
    }
}
