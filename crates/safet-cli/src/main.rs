// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;

use anyhow::{Context, Result};
use config::Config;
use safet_nav::NavController;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `safet --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let log_path = config.log_path()?;
    if options.print_log_path {
        println!("{}", log_path.display());
        return Ok(());
    }

    let tree = config.nav_tree()?;
    let pages = config.pages(&tree);
    safet_tui::validate_pages(&tree, &pages).with_context(|| {
        format!(
            "invalid [[page]] entries in {}; add one page per view index",
            options.config_path.display()
        )
    })?;
    let shell_options = config.shell_options()?;

    if options.print_tree {
        let json = serde_json::to_string_pretty(tree.items()).context("serialize nav tree")?;
        println!("{json}");
        return Ok(());
    }
    if options.check_only {
        return Ok(());
    }

    logging::init_tracing(config.log_level(), &log_path)?;
    tracing::info!(
        config = %options.config_path.display(),
        items = tree.items().len(),
        pages = pages.len(),
        "starting dashboard"
    );

    let mut controller = NavController::new(tree, config.metrics());
    safet_tui::run_app(&mut controller, pages, shell_options)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_log_path: bool,
    print_example: bool,
    print_tree: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_log_path: false,
        print_example: false,
        print_tree: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-log-path" => {
                options.print_log_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--print-tree" => {
                options.print_tree = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("safet: point-of-sale dashboard");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-log-path         Print resolved log file path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --print-tree             Print the validated navigation tree as JSON");
    println!("  --check                  Validate config, menu and pages, then exit");
    println!("  --help                   Show this help");
}
