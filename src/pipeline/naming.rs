//! Output path derivation.
//!
//! Results land at `{out}/{options}/{base stem}/{goal stem}_{w}x{h}.png`,
//! where `{options}` encodes every option that changes pixels so that runs
//! with different settings never overwrite each other.

use std::path::{Path, PathBuf};

use crate::config::TransferConfig;

/// Extension of every written file.
pub const OUTPUT_EXTENSION: &str = "png";

/// File name up to its first `.`, without any directory.
pub fn stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name,
    }
}

/// Join `{stem}` (plus `_{w}x{h}` when both are known) onto `out`.
pub fn out_name(original: &Path, out: &Path, width: Option<u32>, height: Option<u32>) -> PathBuf {
    let mut name = stem(original);
    if let (Some(width), Some(height)) = (width, height) {
        name.push_str(&format!("_{}x{}", width, height));
    }
    out.join(name)
}

/// Full output file path for a goal image: `out_name` plus `.png`.
pub fn output_file(goal: &Path, out: &Path, width: u32, height: u32) -> PathBuf {
    let mut path = out_name(goal, out, Some(width), Some(height)).into_os_string();
    path.push(".");
    path.push(OUTPUT_EXTENSION);
    PathBuf::from(path)
}

/// Subdirectory name for the active options, e.g. `t_red_b1.5_m40`.
///
/// Tokens appear in a fixed order (tint, brightness, contrast, sharpness,
/// merge) and only when the option differs from its neutral value. Empty
/// when every option is neutral.
pub fn option_dir(config: &TransferConfig) -> String {
    let mut tokens: Vec<String> = Vec::new();

    if config.tint() {
        match config.colour() {
            Some(colour) => tokens.push(format!("t_{}", colour.spec)),
            None => tokens.push("t".to_string()),
        }
    }
    if config.brightness() != 1.0 {
        tokens.push(format!("b{}", format_factor(config.brightness())));
    }
    if config.contrast() != 1.0 {
        tokens.push(format!("c{}", format_factor(config.contrast())));
    }
    if config.sharpness() != 1.0 {
        tokens.push(format!("s{}", format_factor(config.sharpness())));
    }
    if config.merge() > 0 {
        tokens.push(format!("m{}", config.merge()));
    }

    tokens.join("_")
}

/// Root directory for this run: `{out}/{options}`.
pub fn run_dir(config: &TransferConfig) -> PathBuf {
    let options = option_dir(config);
    if options.is_empty() {
        config.out_root().to_path_buf()
    } else {
        config.out_root().join(options)
    }
}

/// Factors always show a decimal point: `2.0`, `0.5`, `1.25`. Outside
/// `1e-4..1e16` they switch to exponent form with a signed two-digit
/// exponent, e.g. `1e+16` or `2.5e-05`.
fn format_factor(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => match exponent.parse::<i32>() {
                Ok(exponent) => {
                    let sign = if exponent < 0 { '-' } else { '+' };
                    format!("{}e{}{:02}", mantissa, sign, exponent.abs())
                }
                Err(_) => formatted,
            },
            None => formatted,
        };
    }

    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
