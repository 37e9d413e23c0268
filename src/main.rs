use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use ueki::config::{Config, ConfigFile, ExtensionlessPolicy, IndentUnit};

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("input")
                .help("Text file describing the tree to build")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("force")
                .short('f')
                .long("force")
                .help("Overwrite existing files and directories instead of skipping them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only report failures")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Print the parsed tree before building it and enable debug logging")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Directory under which the tree is created")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .help("Spaces per level for indentation-format input, or 'auto'")
                .value_name("auto|N"),
        )
        .arg(
            Arg::new("extensionless")
                .long("extensionless")
                .help("Treat names without a '.' as directories or files")
                .value_name("dir|file"),
        )
        .arg(
            Arg::new("dump")
                .long("dump")
                .help("Print the parsed tree and exit without writing anything")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Toml file with default options")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .get_matches();

    let config = build_config(&matches)?;

    init_logger(&config);

    let input = matches
        .get_one::<PathBuf>("input")
        .expect("input required");

    ueki::api::run(input, &config)?;

    Ok(())
}

/// Layers command-line flags over the optional config file over the defaults.
fn build_config(args: &ArgMatches) -> miette::Result<Config> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => Config::from(ConfigFile::from_file(path)?),
        None => Config::default(),
    };

    config.force_overwrite |= args.get_flag("force");
    config.quiet |= args.get_flag("quiet");
    config.debug |= args.get_flag("debug");
    config.dump_only = args.get_flag("dump");

    if let Some(output) = args.get_one::<PathBuf>("output") {
        config.output_directory = output.clone();
    }

    if let Some(indent) = args.get_one::<String>("indent") {
        config.indent_unit = indent.parse::<IndentUnit>()?;
    }

    if let Some(policy) = args.get_one::<String>("extensionless") {
        config.extensionless = policy.parse::<ExtensionlessPolicy>()?;
    }

    Ok(config)
}

fn init_logger(config: &Config) {
    let level = if config.debug {
        "debug"
    } else if config.quiet {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
