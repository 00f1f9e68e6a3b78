use std::{
    fs,
    io::{self, BufRead, BufReader},
    iter,
};

use anyhow::{anyhow, bail, Context};
use clap::{App, Arg};
use log::{info, warn};

use kaleidoscope_front::{logger, ASTNode, Driver, Parser, PrecedenceTable};

fn main() -> anyhow::Result<()> {
    let matches = App::new("kaleidoscope")
        .version(env!("CARGO_PKG_VERSION"))
        .about("parses kaleidoscope source and reports each top-level unit")
        .arg(
            Arg::with_name("INPUT")
                .help("source file to parse, reads standard input when omitted")
                .index(1),
        )
        .arg(
            Arg::with_name("inspect-tree")
                .long("inspect-tree")
                .help("print the tree of every parsed unit to stdout"),
        )
        .arg(
            Arg::with_name("precedence")
                .short("p")
                .long("precedence")
                .value_name("OP=PREC")
                .help("add or override a binary operator")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("no-prompt")
                .long("no-prompt")
                .help("don't print the prompt when reading standard input"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("log more, repeat for more detail"),
        )
        .get_matches();

    logger::init(matches.occurrences_of("verbose"))?;

    let mut operator_precedence = PrecedenceTable::default();
    for value in matches.values_of("precedence").into_iter().flatten() {
        let (op, precedence) = parse_precedence(value)?;
        operator_precedence.insert(op, precedence);
    }

    let input: Box<dyn Iterator<Item = char>> = match matches.value_of("INPUT") {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path))?;
            Box::new(source.chars().collect::<Vec<char>>().into_iter())
        }
        None => Box::new(stdin_chars()),
    };
    let prompt = !matches.is_present("INPUT") && !matches.is_present("no-prompt");
    let inspect_tree = matches.is_present("inspect-tree");

    if prompt {
        eprint!("ready> ");
    }
    let driver = Driver::new(Parser::new(input, operator_precedence));
    let (mut parsed, mut failed) = (0usize, 0usize);

    for res in driver {
        match res {
            Ok(node) => {
                parsed += 1;
                eprintln!("{}", describe(&node));
                if inspect_tree {
                    println!("{}", node);
                }
            }
            Err(err) => {
                failed += 1;
                eprintln!("Error: {}", err);
            }
        }
        if prompt {
            eprint!("ready> ");
        }
    }

    info!("parsed {} top-level units with {} errors", parsed, failed);
    Ok(())
}

fn describe(node: &ASTNode) -> &'static str {
    match node {
        ASTNode::Extern(_) => "Parsed an extern.",
        ASTNode::Function(function) if function.is_anonymous() => "Parsed a top-level expr.",
        ASTNode::Function(_) => "Parsed a function definition.",
    }
}

/// standard input, pulled a line at a time so interactive use works
fn stdin_chars() -> impl Iterator<Item = char> {
    BufReader::new(io::stdin())
        .lines()
        .map_while(|line| match line {
            Ok(line) => Some(line),
            Err(err) => {
                warn!("stopped reading standard input: {}", err);
                None
            }
        })
        .flat_map(|line| line.chars().chain(iter::once('\n')).collect::<Vec<char>>())
}

/// parses `OP=PREC`, e.g. `/=40`
fn parse_precedence(value: &str) -> anyhow::Result<(char, i32)> {
    let (op, precedence) = value
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("expected OP=PREC, found '{}'", value))?;

    let mut chars = op.chars();
    let op = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => bail!("operator must be a single character, found '{}'", op),
    };

    let precedence: i32 = precedence
        .parse()
        .with_context(|| format!("invalid precedence '{}' for '{}'", precedence, op))?;
    if precedence <= 0 {
        bail!("precedence for '{}' must be positive, found {}", op, precedence);
    }

    Ok((op, precedence))
}
