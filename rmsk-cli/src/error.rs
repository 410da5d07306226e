//! Error handling for the rmsk CLI

use std::path::PathBuf;
use thiserror::Error;

/// User-facing failures of the rmsk CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid window '{window}': {message}")]
    InvalidWindow { window: String, message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Invalid name filter '{pattern}': {message}")]
    InvalidFilter { pattern: String, message: String },

    #[error("Parsing error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Rendering error: {message}")]
    Rendering { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_window<S: Into<String>>(window: S, message: S) -> Self {
        Self::InvalidWindow {
            window: window.into(),
            message: message.into(),
        }
    }

    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat { message: message.into() }
    }

    pub fn invalid_filter<S: Into<String>>(pattern: S, message: S) -> Self {
        Self::InvalidFilter {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn parse<S: Into<String>>(file: S, message: S) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn rendering<S: Into<String>>(message: S) -> Self {
        Self::Rendering { message: message.into() }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(format!("TOML serialization error: {}", err))
    }
}

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file\n\
                 • Input must be bigRmsk text (bigBed converted with bigBedToBed)",
                path.display()
            ));
        }

        CliError::InvalidWindow { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Use the form chrom:start-end, e.g. chr1:10000-20000\n\
                 • Coordinates are zero-based and the end must exceed the start",
            );
        }

        CliError::InvalidFormat { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Use an output file ending in .svg or .png\n\
                 • Use --format to choose the output format explicitly",
            );
        }

        CliError::InvalidFilter { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Without --regex the filter is a wildcard such as 'Alu*'\n\
                 • With --regex the pattern must be a valid regular expression",
            );
        }

        CliError::Parse { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Each line needs the 14 tab-separated bigRmsk fields\n\
                 • Block sizes and starts are comma-separated lists",
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your rmsk.toml configuration file\n\
                 • Use 'rmsk config --example' to generate a sample configuration\n\
                 • Verify that all configuration values are valid",
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
