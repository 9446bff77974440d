use anyhow::Context;
use app_codegen::{GenerateOptions, GenerateReport};
use app_config::Config;

mod check;

fn main() {
    app_logger::init();

    let config = Config::global();

    app_logger::debug!(config = ?*config, "Running with config");

    if let Err(e) = run(config) {
        app_logger::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let options = GenerateOptions::from(&config.generator);

    let report = app_codegen::generate(&options).with_context(|| {
        format!("Failed to generate lazy extractors into {:?}", options.output)
    })?;
    app_logger::info!(
        classes = report.table.len(),
        listed = report.module.listed.len(),
        bytes = report.bytes(),
        "Generated {:?}",
        report.output
    );

    if !config.run.check_url.is_empty() {
        check_urls(&options, &report, &config.run.check_url)?;
    }

    Ok(())
}

fn check_urls(
    options: &GenerateOptions,
    report: &GenerateReport,
    urls: &[String],
) -> anyhow::Result<()> {
    let plugins = app_registry::plugins::discover(&options.plugins_dir)
        .with_context(|| format!("Failed to load plugins from {:?}", options.plugins_dir))?;
    let ordered = app_codegen::order_classes(&report.table)
        .context("Failed to order classes for matching")?;

    let lines = check::claims_report(&plugins, &ordered, urls);
    for line in lines {
        println!("{line}");
    }

    Ok(())
}
