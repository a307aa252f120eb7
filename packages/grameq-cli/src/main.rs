mod cli;
mod error;
mod tuning;

use std::{fs, path::Path, process::ExitCode};

use clap::Parser;
use grameq::{analyze, CheckConfig, EquivalenceChecker, Grammar, NonTerminal};
use log::info;

use cli::Cli;
use error::CliError;

fn read_grammar(path: &Path) -> Result<Grammar, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })?;

    Ok(Grammar::parse(&text))
}

fn describe(name: &str, grammar: &Grammar, start: &str) -> Result<(), CliError> {
    let start = NonTerminal::try_from(start)?;

    println!("{}:\n{}", name, grammar.definition(&start));
    println!("{}", analyze(grammar));

    Ok(())
}

fn run(cli: &Cli) -> Result<bool, CliError> {
    let first = read_grammar(&cli.first)?;
    let second = read_grammar(&cli.second)?;

    if cli.verbose {
        describe("Grammar 1", &first, &cli.start1)?;
        describe("Grammar 2", &second, &cli.start2)?;
    }

    let (max_depth, max_len) = tuning::bounds(&first, &second, cli.max_depth, cli.max_len);
    info!("checking with max depth {} and max length {}", max_depth, max_len);

    let mut config = CheckConfig::new(max_depth, max_len)
        .with_structural_filter(cli.structural_filter)
        .with_candidate_limit(cli.candidate_limit)
        .with_step_limit(cli.step_limit);
    if cli.unify_bounds {
        config = config.unify_bounds();
    }

    let report = EquivalenceChecker::new(config).check(&first, &second, &cli.start1, &cli.start2)?;
    print!("{}", report);

    Ok(report.is_equivalent())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::from(2)
        }
    }
}
