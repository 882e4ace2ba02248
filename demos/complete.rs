use std::collections::HashMap;
use std::rc::Rc;

use argot::{
    CommandLineParser, Destination, Error, Kind, MemoryStore, Parameter, ParserConfig, RuleSet,
    ScanMode,
};

fn print_usage(program: &str, rule_set: &RuleSet) {
    println!("usage: {program} [OPTIONS] COMMAND ..");

    for rule in rule_set.iter().filter(|rule| !rule.behaviour().hidden) {
        let left = match rule.kind() {
            Kind::Option => {
                let mut aliases: Vec<String> = rule
                    .aliases()
                    .iter()
                    .map(|alias| format!("-{alias}"))
                    .collect();
                aliases.push(format!("--{}", rule.name()));
                aliases.join(", ")
            }
            Kind::PositionalArgument => rule.name().to_ascii_uppercase(),
            Kind::EnvBinding => format!("${}", rule.env_var().unwrap_or_default()),
            Kind::SubCommand => rule.display_name().to_string(),
        };
        println!(" {left:<24}{}", rule.help().unwrap_or_default());
    }
}

fn main() {
    let mut verbosity: usize = 0;
    let mut region = String::default();
    let mut labels: HashMap<String, String> = HashMap::default();
    let mut token = String::default();

    // Stands in for a parsed configuration file.
    let config_file = MemoryStore::named("deploy.ini").with("region", "eu-west");

    let mut parser = CommandLineParser::new("deploy")
        .about("Deploy services to a region.")
        .config(
            ParserConfig::default()
                .mode(ScanMode::default().allow_combined_options(true))
                .env_prefix("DEPLOY_"),
        )
        .add(
            Parameter::option("verbose")
                .alias("v")
                .help("Increase the logging verbosity.")
                .store(Destination::Count(&mut verbosity)),
        )
        .add(
            Parameter::option("region")
                .alias("r")
                .env_var("REGION")
                .choices(vec!["eu-west", "us-east"])
                .default("us-east")
                .help("The region to deploy to.")
                .store(Destination::Str(&mut region)),
        )
        .add(
            Parameter::option("label")
                .alias("l")
                .repeatable(true)
                .help("Labels as key=value pairs.")
                .store(Destination::StrMap(&mut labels)),
        )
        .add(
            Parameter::env("token", "TOKEN")
                .hidden(true)
                .store(Destination::Str(&mut token)),
        )
        .add(Parameter::sub_command("up").help("Start services."))
        .add(Parameter::sub_command("down").help("Stop services."))
        .store(Rc::new(config_file));

    let parsed = match parser.parse() {
        Ok(parsed) => parsed,
        Err(Error::HelpRequested) => {
            if let Ok(rule_set) = parser.rules() {
                print_usage(parser.program(), &rule_set);
            }
            std::process::exit(0);
        }
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(error.exit_code());
        }
    };

    let mut services: Vec<String> = Vec::default();
    let mut dry_run = false;

    if let Some(dispatch) = parsed.sub_command() {
        let mut sub_parser = CommandLineParser::fork(dispatch)
            .add(
                Parameter::option("dry-run")
                    .alias("n")
                    .help("Only print what would happen.")
                    .store(Destination::Set(&mut dry_run)),
            )
            .add(
                Parameter::argument("services")
                    .repeatable(true)
                    .required(true)
                    .help("The services to act on.")
                    .store(Destination::StrList(&mut services)),
            );

        if let Err(error) = sub_parser.parse_tokens(dispatch.tokens().as_slice()) {
            if error.is_help() {
                if let Ok(rule_set) = sub_parser.rules() {
                    print_usage(dispatch.program(), &rule_set);
                }
            } else {
                eprintln!("{error}");
            }

            std::process::exit(error.exit_code());
        }
    }

    drop(parser);

    println!("verbosity: {verbosity}");
    println!("region: {region}");
    println!("labels: {labels:?}");
    println!("token set: {}", !token.is_empty());

    match parsed.sub_command() {
        Some(dispatch) => println!(
            "{} {services:?} (dry run: {dry_run})",
            dispatch.command()
        ),
        None => println!("no command given"),
    }
}
