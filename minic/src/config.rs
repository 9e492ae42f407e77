use crate::error::Error;
use crate::grammer::buffer::MIN_WINDOW;
use crate::grammer::lexer::DEFAULT_WINDOW;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;

/// Slots addressable by a load or store operand
pub const MAX_SLOTS: usize = u16::MAX as usize + 1;

/// Compiler settings, loadable from YAML. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Owner class of every emitted method
    pub class_name: String,
    /// `.source` directive. Derived from `class_name` when unset.
    pub source_name: Option<String>,
    pub buffer_size: usize,
    /// Local slots available to one method
    pub max_slots: usize,
    /// Locals reserved above the variables for spilled temporaries
    pub temp_pad: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            class_name: "MainJasmin".to_string(),
            source_name: None,
            buffer_size: DEFAULT_WINDOW,
            max_slots: 100,
            temp_pad: 2,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
        let config: Config = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|e| Error::Config(path.to_string(), e))?;
        Ok(config.normalized())
    }

    pub fn from_yaml(text: &str) -> Result<Self, Error> {
        let config: Config =
            serde_yaml::from_str(text).map_err(|e| Error::Config("<inline>".to_string(), e))?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        self.buffer_size = self.buffer_size.max(MIN_WINDOW);
        self.max_slots = self.max_slots.min(MAX_SLOTS);
        self
    }

    pub fn source_name(&self) -> String {
        self.source_name
            .clone()
            .unwrap_or_else(|| format!("{}.java", self.class_name))
    }
}
