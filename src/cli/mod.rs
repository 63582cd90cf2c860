pub mod colours;
pub mod completions;
pub mod transfer;

use std::ffi::OsString;

use clap::{Parser, Subcommand};

/// pixel-transfer - Move alpha and colour from goal images onto base images
#[derive(Parser, Debug)]
#[command(name = "pixel-transfer")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub transfer: transfer::TransferArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the colours of an image by frequency
    Colours(colours::ColoursArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Two-letter short flags and the long aliases clap registers for them.
const SHORT_ALIASES: &[(&str, &str)] = &[
    ("-bf", "--bf"),
    ("-gf", "--gf"),
    ("-ct", "--ct"),
    ("-sh", "--sh"),
];

/// Rewrite two-letter short flags into their long aliases.
///
/// clap reads `-bf` as the clustered shorts `-b -f`, so these are mapped
/// before parsing. `-bf=*.png` forms are rewritten too. Nothing after a
/// `--` separator is touched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut positional_only = false;
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            if positional_only {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                positional_only = true;
                return arg;
            }
            for (short, long) in SHORT_ALIASES {
                if text == *short {
                    return OsString::from(*long);
                }
                if let Some(value) = text.strip_prefix(short).and_then(|rest| rest.strip_prefix('=')) {
                    return OsString::from(format!("{}={}", long, value));
                }
            }
            arg
        })
        .collect()
}
