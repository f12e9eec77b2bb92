use crate::CLAP_STYLING;
use clap::{arg, command};

fn with_redirect_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(<CSV>)
            .required(true)
            .help("Path to the crawl export CSV"),
    )
    .arg(
        arg!(-f --"format" <FORMAT>)
            .required(false)
            .help("Report format: text, json")
            .value_parser(["text", "json"])
            .default_value("text"),
    )
    .arg(
        arg!(-o --"output" <PATH>)
            .required(false)
            .help("Save report to a file, or into a directory under a default name (default: print to stdout)"),
    )
    .arg(
        arg!(-c --"config" <PATH>)
            .required(false)
            .help("JSON file with audit thresholds"),
    )
    .arg(
        arg!(--"slow-threshold" <SECS>)
            .required(false)
            .help("Redirects slower than this many seconds are reported (default: 1.0)")
            .value_parser(clap::value_parser!(f64)),
    )
    .arg(
        arg!(--"long-chain-threshold" <HOPS>)
            .required(false)
            .help("Chains with more hops than this are reported (default: 3)")
            .value_parser(clap::value_parser!(usize)),
    )
    .arg(
        arg!(--"max-hops" <N>)
            .required(false)
            .help("Stop following a chain after this many hops (default: 10)")
            .value_parser(clap::value_parser!(usize)),
    )
    .arg(
        arg!(--"reject-duplicates")
            .required(false)
            .help("Fail when a source URL redirects more than once in the export")
            .action(clap::ArgAction::SetTrue),
    )
}

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("crawlscope")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("crawlscope")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Enable debug logging")
                .required(false)
                .global(true)
                .conflicts_with("quiet"),
        )
        .subcommand_required(false)
        .subcommand(with_redirect_args(
            command!("audit").about(
                "Run every SEO audit over a crawl export: content, duplicates, links, \
                redirects, 404s and meta descriptions.",
            ),
        ))
        .subcommand(with_redirect_args(
            command!("redirects")
                .about("Resolve redirect chains and report long chains, loops, 302s and slow hops"),
        ))
}
