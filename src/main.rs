use clap::Parser;
use exemplar::adapters::generator::ValueGenerator;
use exemplar::adapters::json_schema::{load_schema_file, SchemaExtractor};
use exemplar::adapters::output::{to_pretty_json, write_json};
use exemplar::adapters::value_source::FakeSource;
use exemplar::cli::Cli;
use exemplar::config::Settings;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only JSON
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    let document = load_schema_file(&cli.schema)?;
    let model = match &cli.model {
        Some(name) => SchemaExtractor::definition(&document, name)?,
        None => SchemaExtractor::from_document(&document)?,
    };

    if cli.print_schema {
        println!("{}", to_pretty_json(&serde_json::to_value(&model)?)?);
        return Ok(());
    }

    let mut source = match cli.seed {
        Some(seed) => FakeSource::seeded(seed),
        None => FakeSource::from_entropy(),
    };
    let generator = ValueGenerator::new(settings.generator);

    info!(
        "Generating {} example(s) for {}",
        cli.count,
        model.name().unwrap_or("<anonymous>")
    );
    let value = exemplar::generate_many(&generator, &model, cli.count, &mut source)?;
    write_json(&value, cli.output.as_deref())?;

    Ok(())
}
