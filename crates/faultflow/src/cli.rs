//! Subcommands generated from the action flag tables

use clap::{Arg, ArgMatches, Command};
use faultflow_cloud::{ActionFlags, ActionSpec};

pub const TYPE: &str = "type";

/// One provider scope (`aliyun`, `aws`) with a subcommand per resource kind
pub fn provider_command(provider: &'static str, specs: &[&'static ActionSpec]) -> Command {
    specs.iter().fold(
        Command::new(provider)
            .about(format!("{} fault actions", provider))
            .subcommand_required(true)
            .arg_required_else_help(true),
        |command, spec| command.subcommand(action_command(spec)),
    )
}

pub fn action_command(spec: &'static ActionSpec) -> Command {
    let command = Command::new(spec.kind)
        .about(spec.short)
        .long_about(spec.long)
        .after_help(format!("Examples:\n{}", spec.example));

    spec.all_flags().into_iter().fold(command, |command, flag| {
        let help = if flag.name == TYPE {
            spec.type_usage()
        } else {
            flag.usage.to_string()
        };
        command.arg(
            Arg::new(flag.name)
                .long(flag.name)
                .value_name("VALUE")
                .help(help),
        )
    })
}

/// Flags given on the command line, keyed by their spec name
pub fn collect_flags(spec: &ActionSpec, matches: &ArgMatches) -> ActionFlags {
    spec.all_flags()
        .into_iter()
        .filter_map(|flag| {
            matches
                .get_one::<String>(flag.name)
                .map(|value| (flag.name, value.clone()))
        })
        .collect()
}
