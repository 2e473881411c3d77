// SPDX-License-Identifier: MPL-2.0
//! Command-line parsing for the batch tool.

use crate::domain::watermark::Anchor;
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: photo_watermark [OPTIONS] <INPUT_DIRECTORY>

Stamps each image in INPUT_DIRECTORY with its capture date and writes the
results to a sibling <INPUT_DIRECTORY>_watermark directory.

Options:
      --font-size <PX>       Font size in pixels [default: 24]
      --font-color <COLOR>   Color name or #RRGGBB [default: black]
      --position <ANCHOR>    topLeft, top, topRight, left, center, right,
                             bottomLeft, bottom or bottomRight [default: bottomRight]
      --text <TEXT>          Fixed watermark text instead of capture dates
      --opacity <0-100>      Text opacity in percent [default: 100]
      --rotation <DEG>       Rotation in degrees, -180 to 180 [default: 0]
      --font <FAMILY>        Font family to try first
      --template <NAME>      Start from a saved template
      --config-dir <PATH>    Directory holding settings.toml and templates.toml
  -h, --help                 Print help
  -V, --version              Print version
";

/// Options of a batch run. `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub input_directory: PathBuf,
    pub font_size: Option<u32>,
    pub font_color: Option<String>,
    pub position: Option<Anchor>,
    pub text: Option<String>,
    pub opacity: Option<i32>,
    pub rotation: Option<i32>,
    pub font: Option<String>,
    pub template: Option<String>,
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    Run(Args),
}

/// Parses the process arguments.
///
/// # Errors
///
/// Returns [`Error::Usage`] for malformed, unknown or missing arguments.
pub fn parse_env() -> Result<Command> {
    parse(pico_args::Arguments::from_env())
}

/// Parses an explicit argument list, program name excluded.
///
/// # Errors
///
/// Returns [`Error::Usage`] for malformed, unknown or missing arguments.
pub fn parse_from<I, S>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    parse(pico_args::Arguments::from_vec(
        args.into_iter().map(Into::into).collect(),
    ))
}

fn parse(mut args: pico_args::Arguments) -> Result<Command> {
    if args.contains(["-h", "--help"]) {
        return Ok(Command::Help);
    }
    if args.contains(["-V", "--version"]) {
        return Ok(Command::Version);
    }

    let mut parsed = Args {
        font_size: args.opt_value_from_str("--font-size")?,
        font_color: args.opt_value_from_str("--font-color")?,
        position: args.opt_value_from_fn("--position", str::parse::<Anchor>)?,
        text: args.opt_value_from_str("--text")?,
        opacity: args.opt_value_from_str("--opacity")?,
        rotation: args.opt_value_from_str("--rotation")?,
        font: args.opt_value_from_str("--font")?,
        template: args.opt_value_from_str("--template")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        ..Args::default()
    };

    let remaining = args.finish();
    let mut remaining = remaining.into_iter();
    let Some(input) = remaining.next() else {
        return Err(Error::Usage("missing <INPUT_DIRECTORY>".into()));
    };
    let input_str = input.to_string_lossy();
    if input_str.starts_with('-') && input_str.len() > 1 {
        return Err(Error::Usage(format!("unknown option '{input_str}'")));
    }
    if let Some(extra) = remaining.next() {
        return Err(Error::Usage(format!(
            "unexpected argument '{}'",
            extra.to_string_lossy()
        )));
    }

    parsed.input_directory = PathBuf::from(input);
    Ok(Command::Run(parsed))
}
