use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for pixel-transfer operations
#[derive(Error, Diagnostic, Debug)]
pub enum TransferError {
    #[error("IO error: {0}")]
    #[diagnostic(code(pixel_transfer::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(pixel_transfer::io))]
    Io { path: PathBuf, message: String },

    #[error("Image error with {path}: {message}")]
    #[diagnostic(code(pixel_transfer::image))]
    Image { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(pixel_transfer::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Unsupported {role} image mode: {mode}{}", .path.as_ref().map(|p| format!(" ({})", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(pixel_transfer::mode),
        help("Base images must be RGB or RGBA, goal images must be RGBA")
    )]
    UnsupportedMode {
        role: ImageRole,
        mode: String,
        path: Option<PathBuf>,
    },

    #[error("No majority colour: no pixel has alpha >= {threshold}")]
    #[diagnostic(
        code(pixel_transfer::tint),
        help("Lower the tint threshold or pass an explicit --colour")
    )]
    NoMajorityColour { threshold: u8 },

    #[error("Invalid colour: {input}")]
    #[diagnostic(
        code(pixel_transfer::colour),
        help("Use a colour name, #RGB, #RRGGBB, #RRGGBBAA, rgb(r, g, b) or hsl(h, s%, l%)")
    )]
    Colour { input: String },

    #[error("Run cancelled")]
    #[diagnostic(code(pixel_transfer::cancelled))]
    Cancelled,

    #[error("{failed} of {total} image pairs failed")]
    #[diagnostic(code(pixel_transfer::batch))]
    Batch { failed: usize, total: usize },
}

/// Which side of a pair an image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Base,
    Goal,
}

impl std::fmt::Display for ImageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageRole::Base => write!(f, "base"),
            ImageRole::Goal => write!(f, "goal"),
        }
    }
}

impl TransferError {
    /// Shorthand for a configuration error with help text.
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        TransferError::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Attach the offending file to a mode error raised on in-memory images.
    pub fn with_paths(self, base: &std::path::Path, goal: &std::path::Path) -> Self {
        match self {
            TransferError::UnsupportedMode {
                role,
                mode,
                path: None,
            } => {
                let path = match role {
                    ImageRole::Base => base,
                    ImageRole::Goal => goal,
                };
                TransferError::UnsupportedMode {
                    role,
                    mode,
                    path: Some(path.to_path_buf()),
                }
            }
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransferError>;
