use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkrank")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkrank")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("run")
                .about(
                    "Download a crawl bundle, extract it and score its link graph end to end.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The crawl bundle URL (must name a .zip file)")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-d --"dir" <PATH>)
                        .required(false)
                        .help("Working directory for the bundle and its extraction")
                        .default_value("."),
                )
                .arg(
                    arg!(-w --"workers" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async map workers in the worker pool.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"probe-timeout" <SECS>)
                        .required(false)
                        .help("Liveness probe timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the score report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv")
                        .value_parser(["text", "json", "csv"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("score")
                .about("Score link records from an already-extracted directory or a manifest file.")
                .arg(
                    arg!(-m --"manifest" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of WAT file paths")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("dir"),
                )
                .arg(
                    arg!(-d --"dir" <PATH>)
                        .required(false)
                        .help("Directory of extracted WAT files")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("manifest"),
                )
                .arg(
                    arg!(-w --"workers" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async map workers in the worker pool.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"probe-timeout" <SECS>)
                        .required(false)
                        .help("Liveness probe timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the score report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv")
                        .value_parser(["text", "json", "csv"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("probe")
                .about("Check whether a single URL is live or stale.")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The URL to probe")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"probe-timeout" <SECS>)
                        .required(false)
                        .help("Liveness probe timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                ),
        )
}
