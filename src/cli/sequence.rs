use clap::Parser;
use curriculum::{Config, DomainMapper};
use tracing::instrument;

use super::{DomainOrderArgs, terminal::Paint};

#[derive(Debug, Parser)]
#[command(about = "Show the inferred domain transitions and unit sequence")]
pub struct Sequence {
    #[command(flatten)]
    domain_order: DomainOrderArgs,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Sequence {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut config = config.clone();
        self.domain_order.apply(&mut config);

        let ranks = config.ranks();
        let mapper = self.domain_order.load_mapper(&config, &ranks)?;

        match self.format {
            OutputFormat::Table => Self::output_table(&mapper),
            OutputFormat::Json => Self::output_json(&mapper)?,
        }
        Ok(())
    }

    fn output_table(mapper: &DomainMapper) {
        println!("{}", "Domains".heading());
        for (domain, next) in mapper.transition_map().iter() {
            let next = next.map_or_else(|| "(end)".muted(), ToString::to_string);
            println!("  {domain} → {next}");
        }

        println!();
        println!("{}", "Sequence".heading());
        for (index, unit) in mapper.order_map().sequence().enumerate() {
            println!("  {:>3}. {unit}", index + 1);
        }

        println!();
        println!("{}", format!("{} units", mapper.order_map().len()).muted());
    }

    fn output_json(mapper: &DomainMapper) -> anyhow::Result<()> {
        use serde_json::json;

        let transitions: serde_json::Map<String, serde_json::Value> = mapper
            .transition_map()
            .iter()
            .map(|(domain, next)| (domain.to_string(), json!(next.map(ToString::to_string))))
            .collect();

        let sequence: Vec<String> = mapper
            .order_map()
            .sequence()
            .map(ToString::to_string)
            .collect();

        let output = json!({
            "domains": mapper.transition_map().domains().iter().map(ToString::to_string).collect::<Vec<_>>(),
            "transitions": transitions,
            "sequence": sequence,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
