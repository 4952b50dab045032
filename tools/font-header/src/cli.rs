//! Command line parsing and [`Action`] construction.

use std::{ffi::OsString, path::PathBuf};

use clap::{Arg, ArgMatches, Command, value_parser};

/// The number of positional arguments `font-header` accepts.
const ARGUMENT_COUNT: usize = 3;

/// The action to carry out.
#[derive(Debug)]
pub enum Action {
    /// Generate a header with a specific configuration.
    Generate(GenerateConfig),
    /// Print the usage line and exit with a failure.
    Usage(String),
}

/// Description of the header to generate.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct GenerateConfig {
    /// The path to the font to embed.
    pub input: PathBuf,
    /// The path to which the header should be written.
    pub output: PathBuf,
    /// The name of the generated array.
    pub identifier: String,
}

/// Parses `args`, including the binary name, to construct an [`Action`].
///
/// Exactly three positional arguments produce [`Action::Generate`]; anything else produces
/// [`Action::Usage`]. Arguments beginning with `-` are treated as values.
pub fn get_action<I, T>(args: I) -> Action
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = command_parser();

    let args = args.into_iter().map(Into::into).collect::<Vec<OsString>>();
    if args.len() != ARGUMENT_COUNT + 1 {
        return Action::Usage(command.render_usage().to_string());
    }

    match command.try_get_matches_from_mut(args) {
        Ok(matches) => Action::Generate(parse_arguments(&matches)),
        Err(_) => Action::Usage(command.render_usage().to_string()),
    }
}

/// Parses the arguments required to produce a valid [`GenerateConfig`].
pub fn parse_arguments(matches: &ArgMatches) -> GenerateConfig {
    let input = matches
        .get_one::<PathBuf>("input_font")
        .cloned()
        .unwrap_or_else(|| unreachable!("`input_font` is a required argument"));

    let output = matches
        .get_one::<PathBuf>("output_header")
        .cloned()
        .unwrap_or_else(|| unreachable!("`output_header` is a required argument"));

    let identifier = matches
        .get_one::<String>("variable_name")
        .cloned()
        .unwrap_or_else(|| unreachable!("`variable_name` is a required argument"));

    GenerateConfig {
        input,
        output,
        identifier,
    }
}

/// Returns the command parser for `font-header`.
pub fn command_parser() -> Command {
    let input_font = Arg::new("input_font")
        .value_name("input_font")
        .help("Font file whose bytes are embedded")
        .value_parser(value_parser!(PathBuf))
        .allow_hyphen_values(true)
        .required(true);

    let output_header = Arg::new("output_header")
        .value_name("output_header")
        .help("Header file to create or replace")
        .value_parser(value_parser!(PathBuf))
        .allow_hyphen_values(true)
        .required(true);

    let variable_name = Arg::new("variable_name")
        .value_name("variable_name")
        .help("Name of the generated array; the size constant is named `<variable_name>_size`")
        .allow_hyphen_values(true)
        .required(true);

    Command::new("font-header")
        .about("Embeds a font file into a C++ header as a static byte array")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(input_font)
        .arg(output_header)
        .arg(variable_name)
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::{Action, GenerateConfig, command_parser, get_action};

    #[test]
    fn command_is_valid() {
        command_parser().debug_assert();
    }

    #[test]
    fn three_arguments() {
        let Action::Generate(config) =
            get_action(["font-header", "Inter.ttf", "out/Inter.h", "INTER_REGULAR_DATA"])
        else {
            panic!("expected a generate action");
        };

        assert_eq!(
            config,
            GenerateConfig {
                input: Path::new("Inter.ttf").to_path_buf(),
                output: Path::new("out/Inter.h").to_path_buf(),
                identifier: "INTER_REGULAR_DATA".to_owned(),
            }
        );
    }

    #[test]
    fn hyphenated_values() {
        let Action::Generate(config) = get_action(["font-header", "-font.ttf", "-o.h", "-x"]) else {
            panic!("expected a generate action");
        };

        assert_eq!(config.input, Path::new("-font.ttf"));
        assert_eq!(config.output, Path::new("-o.h"));
        assert_eq!(config.identifier, "-x");
    }

    #[test]
    fn too_few_arguments() {
        let Action::Usage(usage) = get_action(["font-header", "a", "b"]) else {
            panic!("expected a usage action");
        };

        assert!(usage.starts_with("Usage: font-header <input_font>"));
        assert!(usage.contains("<input_font> <output_header> <variable_name>"));
    }

    #[test]
    fn too_many_arguments() {
        assert!(matches!(
            get_action(["font-header", "a", "b", "c", "d"]),
            Action::Usage(_)
        ));
    }

    #[test]
    fn help_and_version_are_not_flags() {
        for flag in ["--help", "-h", "--version", "-V"] {
            assert!(matches!(
                get_action(["font-header", flag]),
                Action::Usage(_)
            ));
        }
    }

    #[test]
    fn separator_counts_as_argument() {
        assert!(matches!(
            get_action(["font-header", "--", "a", "b", "c"]),
            Action::Usage(_)
        ));
    }

    #[test]
    fn flag_does_not_replace_positional() {
        assert!(matches!(
            get_action(["font-header", "-v", "a", "b", "c"]),
            Action::Usage(_)
        ));
    }
}
