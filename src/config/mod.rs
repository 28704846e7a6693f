//! Configuration management

use crate::transport::path;
use crate::types::MirrorError;
use crate::ui::ColorMode;
use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Port used when the remote spec names none
pub const DEFAULT_PORT: u16 = 22;

const REMOTE_SPEC: &str = r"^([^\s:@]+)(?::([^\s:@]+))?@([^\s:/]+)(?::(\d+)?)?(\S*)?";

/// Command line arguments
#[derive(Debug, Parser)]
#[command(
    name = "sftp-mirror",
    version,
    about = "Mirror a local directory onto an SFTP server",
    long_about = "Makes the remote directory an exact copy of the local one: new files \
                  are uploaded, changed files re-sent and remote-only files deleted."
)]
pub struct Cli {
    /// Local directory to mirror
    #[arg(value_name = "LOCAL_PATH")]
    pub local_path: PathBuf,

    /// Remote target: user[:password]@host[:port][/path]
    #[arg(value_name = "REMOTE")]
    pub remote: String,

    /// Show what would be copied or deleted without doing it
    #[arg(short, long)]
    pub simulate: bool,

    /// Never upload local paths matching PATTERN
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN", action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Leave paths matching PATTERN alone on both sides
    #[arg(short, long = "ignore", value_name = "PATTERN", action = ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Parsed `user[:password]@host[:port][/path]`
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub user: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    /// Cleaned remote root; `.` is the login directory
    pub path: String,
}

impl RemoteTarget {
    /// Parse a remote spec
    ///
    /// # Example
    /// ```
    /// use sftp_mirror::config::RemoteTarget;
    ///
    /// let target = RemoteTarget::parse("deploy@example.com:2222/var/www/")?;
    /// assert_eq!(target.user, "deploy");
    /// assert_eq!(target.port, 2222);
    /// assert_eq!(target.path, "/var/www");
    /// # Ok::<(), sftp_mirror::types::MirrorError>(())
    /// ```
    pub fn parse(spec: &str) -> Result<Self, MirrorError> {
        let caps = remote_spec()?
            .captures(spec)
            .ok_or_else(|| MirrorError::Config("Invalid remote path specification".to_string()))?;

        let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();

        let port = match group(4) {
            "" => DEFAULT_PORT,
            digits => digits
                .parse::<u16>()
                .map_err(|_| MirrorError::Config(format!("Invalid remote port {}", digits)))?,
        };

        Ok(Self {
            user: group(1).to_string(),
            password: caps.get(2).map(|m| m.as_str().to_string()),
            host: group(3).to_string(),
            port,
            path: path::clean(group(5)),
        })
    }
}

fn remote_spec() -> Result<&'static Regex, MirrorError> {
    static PATTERN: OnceLock<Result<Regex, String>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(REMOTE_SPEC).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| MirrorError::Config(e.clone()))
}

// Keeps passwords out of logs
impl fmt::Debug for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTarget")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("path", &self.path)
            .finish()
    }
}

impl fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}:{}", self.user, self.host, self.port, self.path)
    }
}

/// Validated run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute local root
    pub local_root: Utf8PathBuf,

    pub remote: RemoteTarget,

    /// Report planned work without touching the remote side
    pub simulate: bool,

    /// Patterns applied to the local listing only
    pub exclude: Vec<String>,

    /// Patterns applied to both listings
    pub ignore: Vec<String>,

    pub color: ColorMode,

    /// 0 = warnings only, 1 = info, 2 = debug, 3+ = trace
    pub verbosity: u8,
}

impl Config {
    /// Configuration with no filters, plain output and quiet logging
    pub fn new(local_root: Utf8PathBuf, remote: RemoteTarget) -> Self {
        Self {
            local_root,
            remote,
            simulate: false,
            exclude: Vec::new(),
            ignore: Vec::new(),
            color: ColorMode::Plain,
            verbosity: 0,
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = MirrorError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let remote = RemoteTarget::parse(&cli.remote)?;

        let absolute = std::path::absolute(&cli.local_path).map_err(|e| {
            MirrorError::Config(format!(
                "Cannot resolve local path {}: {}",
                cli.local_path.display(),
                e
            ))
        })?;
        let local_root = Utf8PathBuf::from_path_buf(absolute).map_err(|p| {
            MirrorError::Config(format!("Local path is not valid UTF-8: {}", p.display()))
        })?;

        Ok(Self {
            local_root,
            remote,
            simulate: cli.simulate,
            exclude: cli.exclude,
            ignore: cli.ignore,
            color: ColorMode::detect(cli.no_color),
            verbosity: cli.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn test_parse_full_remote_spec() {
        let target = RemoteTarget::parse("alice:s3cret@files.example.org:2022/srv/site")
            .expect("spec should parse");

        assert_eq!(target.user, "alice");
        assert_eq!(target.password.as_deref(), Some("s3cret"));
        assert_eq!(target.host, "files.example.org");
        assert_eq!(target.port, 2022);
        assert_eq!(target.path, "/srv/site");
    }

    #[test]
    fn test_parse_minimal_remote_spec() {
        let target = RemoteTarget::parse("bob@host").expect("spec should parse");

        assert_eq!(target.password, None);
        assert_eq!(target.port, DEFAULT_PORT);
        assert_eq!(target.path, ".");
    }

    #[test]
    fn test_parse_relative_path_after_empty_port() {
        let target = RemoteTarget::parse("bob@host:backups/./daily/").expect("spec should parse");
        assert_eq!(target.port, DEFAULT_PORT);
        assert_eq!(target.path, "backups/daily");
    }

    #[test]
    fn test_parse_path_without_port() {
        let target = RemoteTarget::parse("bob@host/var/../srv").expect("spec should parse");
        assert_eq!(target.host, "host");
        assert_eq!(target.path, "/srv");
    }

    #[test]
    fn test_parse_rejects_missing_user() {
        let err = RemoteTarget::parse("host:/path").expect_err("spec should be rejected");
        assert_eq!(err.to_string(), "Invalid remote path specification");
        assert!(err.is_precondition());
    }

    #[test]
    fn test_parse_rejects_port_overflow() {
        let err = RemoteTarget::parse("bob@host:70000/x").expect_err("port should be rejected");
        assert_eq!(err.to_string(), "Invalid remote port 70000");
    }

    #[test]
    fn test_debug_hides_password() {
        let target = RemoteTarget::parse("bob:hunter2@host").expect("spec should parse");
        let debug = format!("{:?}", target);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_cli_collects_repeated_patterns() {
        let cli = parse_cli(&[
            "sftp-mirror",
            "-s",
            "-x",
            "*.log",
            "--exclude",
            "/target",
            "-i",
            ".git",
            "-vv",
            "site",
            "me@host:/www",
        ]);

        assert!(cli.simulate);
        assert_eq!(cli.exclude, vec!["*.log", "/target"]);
        assert_eq!(cli.ignore, vec![".git"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.remote, "me@host:/www");
    }

    #[test]
    fn test_config_from_cli_makes_local_root_absolute() {
        let cli = parse_cli(&["sftp-mirror", "--no-color", "site", "me@host:/www"]);
        let config = Config::try_from(cli).expect("config should validate");

        assert!(config.local_root.is_absolute());
        assert!(config.local_root.ends_with("site"));
        assert_eq!(config.color, ColorMode::Plain);
        assert_eq!(config.remote.path, "/www");
        assert!(!config.simulate);
    }

    #[test]
    fn test_config_from_cli_propagates_remote_errors() {
        let cli = parse_cli(&["sftp-mirror", "site", "not-a-remote"]);
        assert!(matches!(Config::try_from(cli), Err(MirrorError::Config(_))));
    }
}
