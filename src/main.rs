#[macro_use]
extern crate clap;

use std::io::{self, BufRead};
use std::process;

use anyhow::{anyhow, Context, Result};
use clap::{AppSettings, ArgMatches};
use log::LevelFilter;

use editor_calc::tok::{collect_tokens, GreedyTokenizer, Token};
use editor_calc::{Calculator, Config, Node};

fn main() {
    let matches = clap_app!(editor_calc =>
        (version: crate_version!())
        (about: "Finds and evaluates the arithmetic expression in a line of text")
        (@arg PRECISION: -p --precision +takes_value "Significant digits kept from each operation, 1 to 28")
        (@arg DEPTH: --depth +takes_value "Nesting levels allowed, counting parentheses, calls and chained operators")
        (@arg VERBOSE: -v ... "Logs scanner attempts, repeat for parser decisions")
        (@subcommand calc =>
            (about: "Print the value of the expression found in each line")
            (@setting AllowLeadingHyphen)
            (@arg INPUT: "Line to calculate, lines are read from stdin otherwise")
        )
        (@subcommand ast =>
            (about: "Print the tree of a whole expression")
            (@setting AllowLeadingHyphen)
            (@arg INPUT: "Expression to parse, lines are read from stdin otherwise")
        )
        (@subcommand tokenize =>
            (about: "Print the tokens of each line with their spans")
            (@setting AllowLeadingHyphen)
            (@arg INPUT: "Line to tokenize, lines are read from stdin otherwise")
        )
    )
    .setting(AppSettings::SubcommandRequiredElseHelp)
    .get_matches();

    init_logging(matches.occurrences_of("VERBOSE"));

    match run(&matches) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("error: {:#}", error);
            process::exit(2);
        }
    }
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG still wins when set
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn config(matches: &ArgMatches) -> Result<Config> {
    let mut config = Config::default();
    if let Some(precision) = matches.value_of("PRECISION") {
        let precision = precision
            .parse()
            .with_context(|| format!("invalid precision '{}'", precision))?;
        config = config.with_precision(precision);
    }
    if let Some(depth) = matches.value_of("DEPTH") {
        let depth = depth
            .parse()
            .with_context(|| format!("invalid depth '{}'", depth))?;
        config = config.with_max_depth(depth);
    }
    Ok(config)
}

/// Handles every input line, returning whether all of them succeeded.
fn run(matches: &ArgMatches) -> Result<bool> {
    let calculator = Calculator::new(config(matches)?);
    let (command, arguments) = matches.subcommand();
    let arguments = arguments.ok_or_else(|| anyhow!("no subcommand given"))?;

    let lines: Vec<String> = match arguments.value_of("INPUT") {
        Some(input) => vec![String::from(input)],
        None => io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<_>>()
            .context("could not read stdin")?,
    };

    let mut succeeded = true;
    for line in &lines {
        let outcome = match command {
            "calc" => calc(&calculator, line),
            "ast" => ast(&calculator, line),
            "tokenize" => {
                tokenize(line);
                Ok(())
            }
            other => Err(anyhow!("unknown subcommand {}", other)),
        };

        if let Err(error) = outcome {
            eprintln!("error: {:#}", error);
            succeeded = false;
        }
    }
    Ok(succeeded)
}

fn calc(calculator: &Calculator, line: &str) -> Result<()> {
    let calculation = calculator.calculate(line)?;
    log::info!(
        "evaluated {:?} found at char {}",
        calculation.expression(line),
        calculation.skip
    );
    println!("{}", calculation.result);
    Ok(())
}

fn ast(calculator: &Calculator, line: &str) -> Result<()> {
    let tree = calculator
        .parse(line)
        .with_context(|| format!("could not parse {:?}", line))?;
    println!("{}", render_tree(&tree)?);
    Ok(())
}

#[cfg(feature = "serde")]
fn render_tree(tree: &Node) -> Result<String> {
    serde_json::to_string_pretty(tree).context("could not serialize tree")
}

#[cfg(not(feature = "serde"))]
fn render_tree(tree: &Node) -> Result<String> {
    Ok(format!("{:#?}", tree))
}

fn tokenize(line: &str) {
    let mut tabs = 0usize;
    for token_and_span in collect_tokens(&mut GreedyTokenizer::new(line)) {
        // outdent before a ), indent after a (
        if token_and_span.token == Token::CloseParen {
            tabs = tabs.saturating_sub(1);
        }

        println!("{}{}", "\t".repeat(tabs), token_and_span);

        if token_and_span.token == Token::OpenParen {
            tabs += 1;
        }
    }
}
