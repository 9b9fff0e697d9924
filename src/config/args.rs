//! Command-line parsing.
//!
//! The clap command is generated from [`OPTIONS`], so the parser, the usage
//! text and the schema cannot drift apart. Parsing records only the options
//! that were actually given; that record is the command-line layer applied
//! on top of the config file.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::parser::ValueSource;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::config::defaults::ORIGIN_SEPARATOR;
use crate::config::options::{OptionId, OptionKind, OPTIONS};
use crate::config::schema::{optional, Config};
use crate::config::store::ConfigError;

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print usage and exit.
    Help,
    /// Print version information and exit.
    Version,
    /// Resolve the configuration and run the gateway.
    Run(CommandLine),
}

/// A value given explicitly on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Str(String),
    Bool(bool),
    Uint(u64),
    List(Vec<String>),
}

/// The explicit command-line layer.
///
/// `overrides` holds one entry per option present in this invocation; its
/// key set is the provenance record consulted during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    config_file: Option<PathBuf>,
    overrides: BTreeMap<OptionId, OptionValue>,
}

impl CommandLine {
    /// Path passed with `--config`, if any.
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Whether `id` was given explicitly.
    pub fn is_explicit(&self, id: OptionId) -> bool {
        self.overrides.contains_key(&id)
    }

    /// Options given explicitly, in schema id order.
    pub fn explicit(&self) -> impl Iterator<Item = OptionId> + '_ {
        self.overrides.keys().copied()
    }

    /// Value given explicitly for `id`.
    pub fn value(&self, id: OptionId) -> Option<&OptionValue> {
        self.overrides.get(&id)
    }

    /// Override `config` with every explicitly given option.
    ///
    /// An empty value clears an optional field. A port of zero keeps the
    /// current port. Repeated options replace the current value as a whole.
    pub fn apply_to(&self, config: &mut Config) {
        for (id, value) in &self.overrides {
            match (id, value) {
                (OptionId::NatsUrl, OptionValue::Str(v)) => config.nats_url = v.clone(),
                (OptionId::NatsCreds, OptionValue::Str(v)) => {
                    config.nats_creds = optional(v.clone())
                }
                (OptionId::RequestTimeout, OptionValue::Uint(v)) => config.request_timeout = *v,
                (OptionId::Debug, OptionValue::Bool(v)) => config.debug = *v,
                (OptionId::Trace, OptionValue::Bool(v)) => config.trace = *v,
                (OptionId::Addr, OptionValue::Str(v)) => config.addr = optional(v.clone()),
                (OptionId::Port, OptionValue::Uint(v)) => {
                    if let Ok(port) = u16::try_from(*v) {
                        if port > 0 {
                            config.port = port;
                        }
                    }
                }
                (OptionId::WsPath, OptionValue::Str(v)) => config.ws_path = v.clone(),
                (OptionId::ApiPath, OptionValue::Str(v)) => config.api_path = v.clone(),
                (OptionId::HeaderAuth, OptionValue::Str(v)) => {
                    config.header_auth = optional(v.clone())
                }
                (OptionId::AllowOrigin, OptionValue::List(origins)) => {
                    config.allow_origin = optional(origins.join(ORIGIN_SEPARATOR))
                }
                (OptionId::ApiEncoding, OptionValue::Str(v)) => config.api_encoding = v.clone(),
                (OptionId::Tls, OptionValue::Bool(v)) => config.tls = *v,
                (OptionId::TlsCert, OptionValue::Str(v)) => config.tls_cert = v.clone(),
                (OptionId::TlsKey, OptionValue::Str(v)) => config.tls_key = v.clone(),
                // help, version and config never reach the override map
                _ => {}
            }
        }
    }
}

/// Build the clap command from the option table.
pub fn command() -> Command {
    OPTIONS.iter().fold(
        Command::new("resgate")
            .disable_help_flag(true)
            .disable_version_flag(true),
        |cmd, spec| {
            let id = spec.id.as_str();
            let mut arg = Arg::new(id).long(spec.long).help(spec.help);
            if let Some(short) = spec.short {
                arg = arg.short(short);
            }
            if let Some(value_name) = spec.value_name {
                arg = arg.value_name(value_name);
            }
            arg = match spec.kind {
                OptionKind::Bool => arg
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(bool))
                    .num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true")
                    .overrides_with(id),
                OptionKind::Str => arg
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(String))
                    .overrides_with(id),
                OptionKind::Uint => arg
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(u64))
                    .overrides_with(id),
                OptionKind::Repeated => arg
                    .action(ArgAction::Append)
                    .value_parser(value_parser!(String)),
            };
            cmd.arg(arg)
        },
    )
}

/// Parse `args` (including the program name) into an [`Invocation`].
pub fn parse<I, T>(args: I) -> Result<Invocation, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command()
        .try_get_matches_from(args)
        .map_err(|err| ConfigError::Argument {
            message: format!("Error parsing command arguments: {}", summary(&err)),
            show_usage: true,
        })?;

    let mut overrides = BTreeMap::new();
    for spec in OPTIONS {
        let id = spec.id.as_str();
        if matches.value_source(id) != Some(ValueSource::CommandLine) {
            continue;
        }
        if let Some(value) = explicit_value(&matches, id, spec.kind) {
            overrides.insert(spec.id, value);
        }
    }

    if let Some(OptionValue::Uint(port)) = overrides.get(&OptionId::Port) {
        if *port >= 1 << 16 {
            return Err(ConfigError::Argument {
                message: format!("Invalid port \"{port}\": must be less than 65536"),
                show_usage: true,
            });
        }
    }

    if switched_on(&overrides, OptionId::Help) {
        return Ok(Invocation::Help);
    }
    if switched_on(&overrides, OptionId::Version) {
        return Ok(Invocation::Version);
    }
    overrides.remove(&OptionId::Help);
    overrides.remove(&OptionId::Version);

    let config_file = match overrides.remove(&OptionId::ConfigFile) {
        Some(OptionValue::Str(path)) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => None,
    };

    Ok(Invocation::Run(CommandLine {
        config_file,
        overrides,
    }))
}

/// First line of a clap error, without clap's own `error:` prefix.
fn summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.trim_start_matches("error: ").to_string()
}

fn switched_on(overrides: &BTreeMap<OptionId, OptionValue>, id: OptionId) -> bool {
    matches!(overrides.get(&id), Some(OptionValue::Bool(true)))
}

fn explicit_value(matches: &ArgMatches, id: &str, kind: OptionKind) -> Option<OptionValue> {
    match kind {
        OptionKind::Bool => matches.get_one::<bool>(id).map(|v| OptionValue::Bool(*v)),
        OptionKind::Str => matches
            .get_one::<String>(id)
            .map(|v| OptionValue::Str(v.clone())),
        OptionKind::Uint => matches.get_one::<u64>(id).map(|v| OptionValue::Uint(*v)),
        OptionKind::Repeated => matches
            .get_many::<String>(id)
            .map(|values| OptionValue::List(values.cloned().collect())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> CommandLine {
        let argv = std::iter::once("resgate").chain(args.iter().copied());
        match parse(argv).unwrap() {
            Invocation::Run(cli) => cli,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_command_is_consistent() {
        command().debug_assert();
    }

    #[test]
    fn test_records_only_given_options() {
        let cli = run(&["--port", "9000", "-D"]);
        let explicit: Vec<_> = cli.explicit().collect();
        assert_eq!(explicit, vec![OptionId::Port, OptionId::Debug]);
        assert!(!cli.is_explicit(OptionId::Trace));
        assert_eq!(cli.config_file(), None);
    }

    #[test]
    fn test_short_and_long_aliases_share_one_option() {
        let short = run(&["-n", "nats://10.0.0.1:4222"]);
        let long = run(&["--nats", "nats://10.0.0.1:4222"]);
        assert_eq!(short, long);
        assert_eq!(
            short.value(OptionId::NatsUrl),
            Some(&OptionValue::Str("nats://10.0.0.1:4222".into()))
        );
    }

    #[test]
    fn test_combined_debug_trace() {
        let cli = run(&["-DV"]);
        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert!(config.debug);
        assert!(config.trace);
    }

    #[test]
    fn test_boolean_takes_optional_value() {
        let cli = run(&["--debug=false", "--tls=true", "-V"]);
        assert_eq!(cli.value(OptionId::Debug), Some(&OptionValue::Bool(false)));
        assert_eq!(cli.value(OptionId::Tls), Some(&OptionValue::Bool(true)));
        assert_eq!(cli.value(OptionId::Trace), Some(&OptionValue::Bool(true)));

        let mut config = Config {
            debug: true,
            ..Config::default()
        };
        cli.apply_to(&mut config);
        assert!(!config.debug);
        assert!(config.tls);
        assert!(config.trace);
    }

    #[test]
    fn test_boolean_value_must_be_attached() {
        // a detached value is a stray positional argument
        assert!(parse(["resgate", "--debug", "false"]).is_err());
        assert!(parse(["resgate", "--debug=maybe"]).is_err());
    }

    #[test]
    fn test_help_switched_off_runs() {
        let cli = run(&["--help=false", "--version=false"]);
        assert!(!cli.is_explicit(OptionId::Help));
        assert!(!cli.is_explicit(OptionId::Version));
    }

    #[test]
    fn test_repeated_origins_keep_order() {
        let cli = run(&[
            "--alloworigin",
            "https://b.example.com",
            "--alloworigin",
            "https://a.example.com",
        ]);
        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert_eq!(
            config.allow_origin.as_deref(),
            Some("https://b.example.com;https://a.example.com")
        );
    }

    #[test]
    fn test_explicit_empty_is_recorded() {
        let cli = run(&["--creds", "", "-u", ""]);
        assert!(cli.is_explicit(OptionId::NatsCreds));
        assert!(cli.is_explicit(OptionId::HeaderAuth));

        let mut config = Config {
            nats_creds: Some("/etc/nats.creds".into()),
            header_auth: Some("auth.user.login".into()),
            ..Config::default()
        };
        cli.apply_to(&mut config);
        assert_eq!(config.nats_creds, None);
        assert_eq!(config.header_auth, None);
    }

    #[test]
    fn test_config_file_path() {
        let cli = run(&["-c", "/etc/resgate.json"]);
        assert_eq!(cli.config_file(), Some(Path::new("/etc/resgate.json")));
        assert!(!cli.is_explicit(OptionId::ConfigFile));
    }

    #[test]
    fn test_last_value_wins() {
        let cli = run(&["--port", "9000", "-p", "9001"]);
        assert_eq!(cli.value(OptionId::Port), Some(&OptionValue::Uint(9001)));
    }

    #[test]
    fn test_port_out_of_range() {
        let err = parse(["resgate", "--port", "65536"]).unwrap_err();
        match err {
            ConfigError::Argument { message, show_usage } => {
                assert_eq!(message, "Invalid port \"65536\": must be less than 65536");
                assert!(show_usage);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_port_zero_keeps_current() {
        let cli = run(&["--port", "0"]);
        assert!(cli.is_explicit(OptionId::Port));
        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_port_checked_before_help() {
        assert!(parse(["resgate", "-h", "-p", "70000"]).is_err());
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse(["resgate", "--help"]).unwrap(), Invocation::Help);
        assert_eq!(parse(["resgate", "-h", "-v"]).unwrap(), Invocation::Help);
        assert_eq!(parse(["resgate", "-v"]).unwrap(), Invocation::Version);
    }

    #[test]
    fn test_unknown_option_shows_usage() {
        let err = parse(["resgate", "--bogus"]).unwrap_err();
        assert!(matches!(err, ConfigError::Argument { show_usage: true, .. }));
    }

    #[test]
    fn test_non_numeric_port_rejected() {
        assert!(parse(["resgate", "--port", "http"]).is_err());
    }
}
