use clap::Parser;
use std::io::Read;
use tan_adapter::utils::logger;
use tan_adapter::{CatalogGenerator, CategorySource, ContactPlacement, GeneratorOptions};

#[derive(Parser)]
#[command(name = "render-catalog")]
#[command(about = "Render an upstream directory response as a catalog document")]
struct Args {
    /// Upstream JSON file; reads stdin when omitted
    input: Option<String>,

    #[arg(long, value_enum, default_value_t = CategorySource::Categories)]
    category_source: CategorySource,

    #[arg(long, value_enum, default_value_t = ContactPlacement::Provider)]
    contact_placement: ContactPlacement,

    #[arg(long)]
    catalog_categories: bool,

    /// Pretty-print the output
    #[arg(short, long)]
    pretty: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let api_data: serde_json::Value = serde_json::from_str(&raw)?;

    let generator = CatalogGenerator::new(GeneratorOptions {
        category_source: args.category_source,
        contact_placement: args.contact_placement,
        catalog_categories: args.catalog_categories,
        ..GeneratorOptions::default()
    });
    let catalog = generator.generate(&api_data);
    tracing::info!(
        "📦 Rendered {} providers",
        catalog.message.catalog.providers.len()
    );

    let output = if args.pretty {
        serde_json::to_string_pretty(&catalog)?
    } else {
        serde_json::to_string(&catalog)?
    };
    println!("{}", output);
    Ok(())
}
