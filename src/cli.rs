use std::path::{Path, PathBuf};

mod plan;
mod sequence;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use curriculum::{Config, DomainMapper, DomainRanks, read_rows_from_path};
use plan::Plan;
use sequence::Sequence;
use tracing::{debug, instrument};

/// The configuration file looked for in the working directory when no
/// `--config` is given.
const DEFAULT_CONFIG_FILE: &str = "curriculum.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a configuration file [default: ./curriculum.toml, if present]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = load_config(self.config.as_deref())?;
        self.command.run(config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Build a curriculum for every student
    Plan(Plan),

    /// Show the inferred domain transitions and unit sequence
    Sequence(Sequence),

    /// Write a default configuration file
    Init(Init),
}

impl Command {
    fn run(self, config: Config) -> anyhow::Result<()> {
        match self {
            Self::Plan(command) => command.run(config)?,
            Self::Sequence(command) => command.run(&config)?,
            Self::Init(command) => command.run()?,
        }
        Ok(())
    }
}

/// Options for reading the domain-order table, shared by several commands.
#[derive(Debug, clap::Args)]
pub struct DomainOrderArgs {
    /// The domain-order table: one row per domain, standards in mastery order
    #[arg(short, long, value_name = "FILE")]
    domain_order: PathBuf,

    /// Field delimiter of the input and output tables [default: from config]
    #[arg(long, value_name = "CHAR")]
    delimiter: Option<char>,

    /// Column holding each row's domain [default: from config]
    #[arg(long, value_name = "INDEX")]
    domain_column: Option<usize>,
}

impl DomainOrderArgs {
    /// Applies command-line overrides to the configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(column) = self.domain_column {
            config.domain_column = column;
        }
    }

    /// Reads the domain-order table and infers its sequence.
    #[instrument(level = "debug", skip_all)]
    fn load_mapper(&self, config: &Config, ranks: &DomainRanks) -> anyhow::Result<DomainMapper> {
        let rows = read_rows_from_path(&self.domain_order, config.delimiter)?;
        let mapper = DomainMapper::with_domain_column(&rows, ranks, config.domain_column)
            .with_context(|| format!("Invalid domain order in {}", self.domain_order.display()))?;
        Ok(mapper)
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load(path).map_err(anyhow::Error::msg),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                debug!("using {DEFAULT_CONFIG_FILE}");
                Config::load(default).map_err(anyhow::Error::msg)
            } else {
                Ok(Config::default())
            }
        }
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// Where to write the configuration file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    path: PathBuf,
}

impl Init {
    #[instrument]
    fn run(self) -> anyhow::Result<()> {
        if self.path.exists() {
            anyhow::bail!(
                "Configuration already exists (found existing {})",
                self.path.display()
            );
        }

        Config::default()
            .save(&self.path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", self.path.display()))?;

        println!("Created {}", self.path.display());
        println!();
        println!("Next steps:");
        println!("  curriculum plan --domain-order domain_order.csv --students student_tests.csv");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_plan_command() {
        let cli = Cli::try_parse_from([
            "curriculum",
            "-vv",
            "plan",
            "--domain-order",
            "domain_order.csv",
            "--students",
            "student_tests.csv",
            "--max-length",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Plan(_)));
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from([
            "curriculum",
            "sequence",
            "-d",
            "domain_order.csv",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["curriculum"]).is_err());
    }

    #[test]
    fn overrides_apply_to_config() {
        let args = DomainOrderArgs {
            domain_order: PathBuf::from("domain_order.csv"),
            delimiter: Some(';'),
            domain_column: None,
        };
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.delimiter, ';');
        assert_eq!(config.domain_column, 0);
    }

    #[test]
    fn load_explicit_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("custom.toml");
        let mut config = Config::default();
        config.set_rank("PK", -1);
        config.save(&path).unwrap();

        assert_eq!(load_config(Some(&path)).unwrap(), config);
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("curriculum.toml");

        Init { path: path.clone() }.run().unwrap();
        assert!(Config::load(&path).is_ok());
        assert!(Init { path }.run().is_err());
    }
}
