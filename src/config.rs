use std::{
    fmt, fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    str::FromStr,
};

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::errors::{FileOperation, IoError};

const DEFAULT_INDENT_WIDTH: usize = 4;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(ueki::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(ueki::config::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid indent unit: '{value}'")]
    #[diagnostic(
        code(ueki::config::invalid_indent_unit),
        help("Use 'auto' or a positive number of spaces")
    )]
    InvalidIndentUnit { value: String },

    #[error("invalid extensionless policy: '{value}'")]
    #[diagnostic(
        code(ueki::config::invalid_extensionless_policy),
        help("Valid policies are: ['dir', 'file']")
    )]
    InvalidExtensionlessPolicy { value: String },
}

/// Width of one nesting level in indentation-format input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "IndentSetting")]
pub enum IndentUnit {
    /// Take the leading-space count of the first indented line.
    #[default]
    Auto,
    Fixed(NonZeroUsize),
}
impl IndentUnit {
    /// Resolves the unit against the leading-space counts of the non-root lines.
    pub fn resolve(self, mut indents: impl Iterator<Item = usize>) -> usize {
        match self {
            Self::Fixed(width) => width.get(),
            Self::Auto => indents
                .find(|&spaces| spaces > 0)
                .unwrap_or(DEFAULT_INDENT_WIDTH),
        }
    }
}
impl FromStr for IndentUnit {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }

        value
            .trim()
            .parse::<NonZeroUsize>()
            .map(Self::Fixed)
            .map_err(|_| ConfigError::InvalidIndentUnit {
                value: value.to_string(),
            })
    }
}
impl fmt::Display for IndentUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Fixed(width) => write!(f, "{}", width),
        }
    }
}

/// Raw toml shape of `indent-unit`: either `"auto"` or an integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum IndentSetting {
    Width(i64),
    Word(String),
}
impl TryFrom<IndentSetting> for IndentUnit {
    type Error = ConfigError;

    fn try_from(value: IndentSetting) -> Result<Self, Self::Error> {
        match value {
            IndentSetting::Width(width) => width.to_string().parse(),
            IndentSetting::Word(word) => word.parse(),
        }
    }
}

/// How to classify a name that has neither a trailing `/` nor a `.`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ExtensionlessPolicy {
    #[default]
    #[serde(rename = "dir", alias = "directory")]
    Directory,
    #[serde(rename = "file")]
    File,
}
impl FromStr for ExtensionlessPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dir" | "directory" => Ok(Self::Directory),
            "file" => Ok(Self::File),
            _ => Err(ConfigError::InvalidExtensionlessPolicy {
                value: value.to_string(),
            }),
        }
    }
}

/// What to do when a target path already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    #[default]
    SkipExisting,
    Overwrite,
}

/// The slice of [`Config`] the parser needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub indent_unit: IndentUnit,
    pub extensionless: ExtensionlessPolicy,
}

/// Settings for a single run, threaded explicitly into the parser and the materializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub force_overwrite: bool,
    pub quiet: bool,
    pub debug: bool,
    pub dump_only: bool,
    pub output_directory: PathBuf,
    pub indent_unit: IndentUnit,
    pub extensionless: ExtensionlessPolicy,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            force_overwrite: false,
            quiet: false,
            debug: false,
            dump_only: false,
            output_directory: PathBuf::from("."),
            indent_unit: IndentUnit::Auto,
            extensionless: ExtensionlessPolicy::Directory,
        }
    }
}
impl Config {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            indent_unit: self.indent_unit,
            extensionless: self.extensionless,
        }
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        if self.force_overwrite {
            ConflictPolicy::Overwrite
        } else {
            ConflictPolicy::SkipExisting
        }
    }
}
impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        let defaults = Config::default();

        Self {
            force_overwrite: file.force_overwrite.unwrap_or(defaults.force_overwrite),
            quiet: file.quiet.unwrap_or(defaults.quiet),
            debug: file.debug.unwrap_or(defaults.debug),
            dump_only: defaults.dump_only,
            output_directory: file.output_directory.unwrap_or(defaults.output_directory),
            indent_unit: file.indent_unit.unwrap_or(defaults.indent_unit),
            extensionless: file.extensionless.unwrap_or(defaults.extensionless),
        }
    }
}

/// Optional toml file supplying defaults; every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub force_overwrite: Option<bool>,
    pub quiet: Option<bool>,
    pub debug: Option<bool>,
    pub output_directory: Option<PathBuf>,
    pub indent_unit: Option<IndentUnit>,
    pub extensionless: Option<ExtensionlessPolicy>,
}
impl ConfigFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source: err,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ConfigFile, ConfigError> {
        ConfigFile::parse(content, Path::new("ueki.toml"))
    }

    #[test]
    fn test_indent_unit_from_str() {
        assert_eq!("auto".parse::<IndentUnit>().unwrap(), IndentUnit::Auto);
        assert_eq!(
            "2".parse::<IndentUnit>().unwrap(),
            IndentUnit::Fixed(NonZeroUsize::new(2).unwrap())
        );
        assert!(matches!(
            "0".parse::<IndentUnit>(),
            Err(ConfigError::InvalidIndentUnit { .. })
        ));
        assert!(matches!(
            "tabs".parse::<IndentUnit>(),
            Err(ConfigError::InvalidIndentUnit { .. })
        ));
    }

    #[test]
    fn test_indent_unit_resolve() {
        assert_eq!(IndentUnit::Auto.resolve([0, 0, 2, 4].into_iter()), 2);
        assert_eq!(IndentUnit::Auto.resolve([0, 0].into_iter()), 4);
        assert_eq!(
            IndentUnit::Fixed(NonZeroUsize::new(3).unwrap()).resolve([2].into_iter()),
            3
        );
    }

    #[test]
    fn test_extensionless_policy_from_str() {
        assert_eq!(
            "dir".parse::<ExtensionlessPolicy>().unwrap(),
            ExtensionlessPolicy::Directory
        );
        assert_eq!(
            "File".parse::<ExtensionlessPolicy>().unwrap(),
            ExtensionlessPolicy::File
        );
        assert!("folder".parse::<ExtensionlessPolicy>().is_err());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let file = parse(
            r#"
            force-overwrite = true
            output-directory = "out"
            indent-unit = 2
            extensionless = "file"
            "#,
        )
        .unwrap();

        let config = Config::from(file);

        assert!(config.force_overwrite);
        assert!(!config.quiet);
        assert_eq!(config.output_directory, PathBuf::from("out"));
        assert_eq!(
            config.indent_unit,
            IndentUnit::Fixed(NonZeroUsize::new(2).unwrap())
        );
        assert_eq!(config.extensionless, ExtensionlessPolicy::File);
        assert_eq!(config.conflict_policy(), ConflictPolicy::Overwrite);
    }

    #[test]
    fn test_config_file_accepts_auto_indent() {
        let file = parse(r#"indent-unit = "auto""#).unwrap();

        assert_eq!(file.indent_unit, Some(IndentUnit::Auto));
    }

    #[test]
    fn test_config_file_rejects_bad_values() {
        assert!(matches!(
            parse("indent-unit = 0"),
            Err(ConfigError::ParseToml { .. })
        ));
        assert!(matches!(
            parse("colour = true"),
            Err(ConfigError::ParseToml { .. })
        ));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.conflict_policy(), ConflictPolicy::SkipExisting);
        assert_eq!(config.parse_options(), ParseOptions::default());
        assert_eq!(config.output_directory, PathBuf::from("."));
    }
}
