//! Command-line option schema.
//!
//! One [`OptionSpec`] per recognized option. Each record carries every
//! spelling of the option, so aliases never need their own dispatch. The
//! table is shared by the argument parser and the usage text and does not
//! know about default values.

use std::fmt::Write as _;

use crate::config::defaults::CONFIG_DOCS_URL;

/// Identifies one recognized option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionId {
    Help,
    Version,
    ConfigFile,
    NatsUrl,
    Addr,
    Port,
    WsPath,
    ApiPath,
    HeaderAuth,
    Tls,
    TlsCert,
    TlsKey,
    ApiEncoding,
    RequestTimeout,
    NatsCreds,
    AllowOrigin,
    Debug,
    Trace,
}

impl OptionId {
    /// Stable identifier used as the clap argument id.
    pub fn as_str(self) -> &'static str {
        spec(self).long
    }
}

/// Primitive kind of an option's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// A single string value.
    Str,
    /// A flag; `--flag=false` switches it off explicitly.
    Bool,
    /// A single unsigned integer value.
    Uint,
    /// A string value that may be given several times.
    Repeated,
}

/// Usage text section an option is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Server,
    Logging,
    Common,
}

impl Section {
    const ALL: [Section; 3] = [Section::Server, Section::Logging, Section::Common];

    fn title(self) -> &'static str {
        match self {
            Section::Server => "Server Options",
            Section::Logging => "Logging Options",
            Section::Common => "Common Options",
        }
    }
}

/// Declaration of a single option.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub id: OptionId,
    /// Primary name, spelled `--long`.
    pub long: &'static str,
    /// Optional single-character alias, spelled `-s`.
    pub short: Option<char>,
    pub kind: OptionKind,
    /// Placeholder shown in usage for options taking a value.
    pub value_name: Option<&'static str>,
    pub help: &'static str,
    pub section: Section,
}

macro_rules! option {
    (
        $id:ident,
        $long:literal,
        $short:expr,
        $kind:ident,
        $value:expr,
        $section:ident,
        $help:literal $(,)?
    ) => {
        OptionSpec {
            id: OptionId::$id,
            long: $long,
            short: $short,
            kind: OptionKind::$kind,
            value_name: $value,
            help: $help,
            section: Section::$section,
        }
    };
}

/// Every option the gateway accepts, in usage order.
pub const OPTIONS: &[OptionSpec] = &[
    option!(
        NatsUrl,
        "nats",
        Some('n'),
        Str,
        Some("url"),
        Server,
        "NATS Server URL (default: nats://127.0.0.1:4222)",
    ),
    option!(
        Addr,
        "addr",
        Some('i'),
        Str,
        Some("host"),
        Server,
        "Bind to HOST address (default: 0.0.0.0)",
    ),
    option!(
        Port,
        "port",
        Some('p'),
        Uint,
        Some("port"),
        Server,
        "HTTP port for client connections (default: 8080)",
    ),
    option!(
        WsPath,
        "wspath",
        Some('w'),
        Str,
        Some("path"),
        Server,
        "WebSocket path for clients (default: /)",
    ),
    option!(
        ApiPath,
        "apipath",
        Some('a'),
        Str,
        Some("path"),
        Server,
        "Web resource path for clients (default: /api/)",
    ),
    option!(
        RequestTimeout,
        "reqtimeout",
        Some('r'),
        Uint,
        Some("milliseconds"),
        Server,
        "Timeout duration for NATS requests (default: 3000)",
    ),
    option!(
        HeaderAuth,
        "headauth",
        Some('u'),
        Str,
        Some("method"),
        Server,
        "Resource method for header authentication",
    ),
    option!(
        Tls,
        "tls",
        None,
        Bool,
        None,
        Server,
        "Enable TLS for HTTP (default: false)",
    ),
    option!(
        TlsCert,
        "tlscert",
        None,
        Str,
        Some("file"),
        Server,
        "HTTP server certificate file",
    ),
    option!(
        TlsKey,
        "tlskey",
        None,
        Str,
        Some("file"),
        Server,
        "Private key for HTTP server certificate",
    ),
    option!(
        ApiEncoding,
        "apiencoding",
        None,
        Str,
        Some("type"),
        Server,
        "Encoding for web resources: json, jsonflat (default: json)",
    ),
    option!(
        NatsCreds,
        "creds",
        None,
        Str,
        Some("file"),
        Server,
        "NATS User Credentials file",
    ),
    option!(
        AllowOrigin,
        "alloworigin",
        None,
        Repeated,
        Some("origin"),
        Server,
        "Allowed origin(s) for CORS: *, sop, <origin> (default: *)",
    ),
    option!(
        ConfigFile,
        "config",
        Some('c'),
        Str,
        Some("file"),
        Server,
        "Configuration file",
    ),
    option!(
        Debug,
        "debug",
        Some('D'),
        Bool,
        None,
        Logging,
        "Enable debugging output",
    ),
    option!(
        Trace,
        "trace",
        Some('V'),
        Bool,
        None,
        Logging,
        "Enable trace logging",
    ),
    option!(
        Help,
        "help",
        Some('h'),
        Bool,
        None,
        Common,
        "Show this message",
    ),
    option!(
        Version,
        "version",
        Some('v'),
        Bool,
        None,
        Common,
        "Show version",
    ),
];

/// Look up the declaration of an option.
pub fn spec(id: OptionId) -> &'static OptionSpec {
    OPTIONS
        .iter()
        .find(|spec| spec.id == id)
        .unwrap_or_else(|| unreachable!("option {id:?} missing from OPTIONS"))
}

/// Render the usage message from the option table.
pub fn usage() -> String {
    let mut out = String::from("\nUsage: resgate [options]\n");

    for section in Section::ALL {
        let _ = write!(out, "\n{}:\n", section.title());
        for spec in OPTIONS.iter().filter(|spec| spec.section == section) {
            let _ = writeln!(out, "    {:<33}{}", spelling(spec), spec.help);
        }
        if section == Section::Logging {
            let _ = writeln!(out, "    {:<33}{}", "-DV", "Debug and trace");
        }
    }

    let _ = write!(out, "\n{:<37}{}\n", "Configuration Documentation:", CONFIG_DOCS_URL);
    out
}

fn spelling(spec: &OptionSpec) -> String {
    let short = match spec.short {
        Some(c) => format!("-{c}, "),
        None => "    ".to_string(),
    };
    match spec.value_name {
        Some(value) => format!("{short}--{} <{value}>", spec.long),
        None => format!("{short}--{}", spec.long),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_spellings_are_unique() {
        let mut seen = HashSet::new();
        for spec in OPTIONS {
            assert!(seen.insert(spec.long.to_string()), "duplicate --{}", spec.long);
            if let Some(c) = spec.short {
                assert!(seen.insert(c.to_string()), "duplicate -{c}");
            }
        }
    }

    #[test]
    fn test_every_id_is_declared_once() {
        let ids: HashSet<_> = OPTIONS.iter().map(|spec| spec.id).collect();
        assert_eq!(ids.len(), OPTIONS.len());
        assert_eq!(spec(OptionId::Addr).short, Some('i'));
        assert_eq!(OptionId::NatsCreds.as_str(), "creds");
    }

    #[test]
    fn test_value_names_match_kind() {
        for spec in OPTIONS {
            assert_eq!(
                spec.kind == OptionKind::Bool,
                spec.value_name.is_none(),
                "--{}",
                spec.long
            );
        }
    }

    #[test]
    fn test_usage_lists_every_option() {
        let text = usage();
        for spec in OPTIONS {
            assert!(text.contains(&format!("--{}", spec.long)), "--{} missing", spec.long);
        }
        assert!(text.contains("-DV"));
        assert!(text.contains("Logging Options:"));
        assert!(text.contains("-n, --nats <url>"));
        assert!(text.contains(CONFIG_DOCS_URL));
        assert!(text.contains("*, sop, <origin>"));
    }
}
