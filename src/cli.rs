use std::path::PathBuf;

use anyhow::Result;
use clap::{
    Arg, ArgAction, ArgMatches, Command, command, crate_authors, crate_description, crate_name,
    crate_version,
};
use log::info;

use crate::constants::{
    CONFIG_HELP, DEFAULT_CONFIG_PATH, DRY_RUN_HELP, LOCAL_LOGGING_HELP, LOG_FILE_DEFAULT,
    LOG_FILE_HELP, OUTPUT_HELP, RESOURCE_ROOT_HELP, SOURCE_BASE_HELP, TEST_PACK_HELP,
    VERBOSE_HELP,
};
use crate::errors::generic_error;
use crate::logging::LogLevel;
use crate::utils::find_project_folder;
use crate::workflow::{
    BootstrapOptions, ConfigOptions, GenerateOptions, bootstrap_samples, generate_test_packs,
    list_test_packs,
};

/// Builds the command-line interface
///
/// Defines the following global arguments:
/// - `config`: Path to the configuration file
/// - `verbose`: Increase verbosity level
/// - `log_file`: Name of the log file
/// - `log_locally`: Keep the log file in the current directory
///
/// and the `generate`, `list` and `bootstrap` subcommands.
pub fn build_command() -> Command {
    // define arg for reading from a specific config file
    let arg_config = Arg::new("config")
        .short('c')
        .long("config")
        .help(CONFIG_HELP)
        .default_value(DEFAULT_CONFIG_PATH)
        .global(true);

    // define arg for verbosity level
    let arg_verbose = Arg::new("verbose")
        .short('v')
        .long("verbose")
        .help(VERBOSE_HELP)
        .action(ArgAction::Count)
        .global(true);

    // define arg for log file
    let log_file = Arg::new("log_file")
        .short('l')
        .long("log-file")
        .help(LOG_FILE_HELP)
        .default_value(LOG_FILE_DEFAULT)
        .global(true);

    // define arg for local logging
    let log_locally = Arg::new("log_locally")
        .short('L')
        .long("log-locally")
        .help(LOCAL_LOGGING_HELP)
        .action(ArgAction::SetTrue)
        .global(true);

    let generate = Command::new("generate")
        .about("Generates the test packs from the sample files")
        .arg(
            Arg::new("resource_root")
                .short('r')
                .long("resource-root")
                .help(RESOURCE_ROOT_HELP),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help(OUTPUT_HELP),
        )
        .arg(
            Arg::new("dry")
                .short('n')
                .long("dry")
                .help(DRY_RUN_HELP)
                .action(ArgAction::SetTrue),
        );

    let list = Command::new("list")
        .about("Lists the test packs and their samples")
        .arg(
            Arg::new("resource_root")
                .short('r')
                .long("resource-root")
                .help(RESOURCE_ROOT_HELP),
        )
        .arg(
            Arg::new("test_pack")
                .short('t')
                .long("test-pack")
                .help(TEST_PACK_HELP),
        );

    let bootstrap = Command::new("bootstrap")
        .about("Copies raw samples into the resource root and seeds blank expectations")
        .arg(
            Arg::new("resource_root")
                .short('r')
                .long("resource-root")
                .help(RESOURCE_ROOT_HELP),
        )
        .arg(
            Arg::new("source_base")
                .help(SOURCE_BASE_HELP)
                .required(true),
        );

    command!()
        .author(crate_authors!())
        .about(crate_description!())
        .name(crate_name!())
        .version(crate_version!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(arg_config)
        .arg(log_file)
        .arg(log_locally)
        .arg(arg_verbose)
        .subcommand(generate)
        .subcommand(list)
        .subcommand(bootstrap)
}

/// Parses the process arguments
pub fn get_matches() -> ArgMatches {
    build_command().get_matches()
}

/// Gets the verbosity level from the command-line arguments
///
/// This function counts the occurrences of the "verbose" flag and converts
/// it to a LogLevel value.
///
/// # Examples
/// ```
/// use testpack_gen::cli::{build_command, get_verbosity};
/// use testpack_gen::logging::LogLevel;
///
/// let matches = build_command().get_matches_from(["tpgen", "-vv", "list"]);
/// assert_eq!(get_verbosity(&matches), LogLevel::Trace);
/// ```
pub fn get_verbosity(matches: &ArgMatches) -> LogLevel {
    let verbose_count = matches.get_count("verbose");
    LogLevel::from_occurrences(verbose_count)
}

/// Path of the log file, in the config directory unless local logging is requested
pub fn get_log_file(matches: &ArgMatches) -> crate::errors::Result<PathBuf> {
    let filename = matches
        .get_one::<String>("log_file")
        .cloned()
        .unwrap_or_else(|| LOG_FILE_DEFAULT.to_string());
    if matches.get_flag("log_locally") {
        Ok(PathBuf::from(filename))
    } else {
        let folder = find_project_folder()?;
        Ok(folder.config_dir().join(filename))
    }
}

/// Collects the configuration options shared by all subcommands
pub fn get_config_options(matches: &ArgMatches, sub_matches: &ArgMatches) -> ConfigOptions {
    let path_arg = |name: &str| {
        sub_matches
            .try_get_one::<String>(name)
            .ok()
            .flatten()
            .map(PathBuf::from)
    };

    ConfigOptions {
        config_path: PathBuf::from(
            matches
                .get_one::<String>("config")
                .map(String::as_str)
                .unwrap_or(DEFAULT_CONFIG_PATH),
        ),
        resource_root: path_arg("resource_root"),
        output: path_arg("output"),
    }
}

/// Runs the subcommand selected on the command line
///
/// # Errors
/// Returns the first error raised by the subcommand
pub fn execute(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("generate", sub_matches)) => {
            let context = generate_test_packs(GenerateOptions {
                config: get_config_options(matches, sub_matches),
                dry_run: sub_matches.get_flag("dry"),
            })?;
            info!(
                "Resolved {} samples: {} written, {} transformed, {} copied",
                context.stats.entries_resolved,
                context.stats.files_written,
                context.stats.files_transformed,
                context.stats.files_copied
            );
            Ok(())
        }
        Some(("list", sub_matches)) => list_test_packs(
            &get_config_options(matches, sub_matches),
            sub_matches.get_one::<String>("test_pack").map(String::as_str),
        ),
        Some(("bootstrap", sub_matches)) => {
            let source_base = sub_matches
                .get_one::<String>("source_base")
                .map(PathBuf::from)
                .ok_or_else(|| generic_error("Source base argument not found"))?;
            bootstrap_samples(BootstrapOptions {
                config: get_config_options(matches, sub_matches),
                source_base,
            })?;
            Ok(())
        }
        Some((name, _)) => Err(generic_error(&format!("Unknown command: {name}")).into()),
        None => Err(generic_error("No command given").into()),
    }
}
