use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, LevelFilter};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tartak::lexer::{ErrorPolicy, Importer, LexerState, TokenizeOptions};
use tartak::parser::{matches, Pattern};
use tartak::printer::print_pattern;

mod cli;

use cli::{Action, Cli, Errors};

impl From<Errors> for ErrorPolicy {
    fn from(errors: Errors) -> Self {
        match errors {
            Errors::Throw => ErrorPolicy::Throw,
            Errors::Save => ErrorPolicy::Save,
            Errors::Drop => ErrorPolicy::Drop,
        }
    }
}

fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
        }
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("cannot read the standard input")?;
            Ok(source)
        }
    }
}

fn importer(rules: &Path) -> Result<Importer> {
    Importer::open(rules).with_context(|| format!("cannot read {}", rules.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .parse_default_env()
        .init();
    match cli.action {
        Action::Lex {
            rules,
            source,
            output_path,
            indent,
            errors,
        } => {
            let mut lexer = importer(&rules)?.make()?;
            lexer.feed(read_source(source.as_deref())?);
            lexer.tokenize(TokenizeOptions::new(indent, errors.into()))?;
            let dump = lexer.dumps().to_json()?;
            match output_path {
                Some(path) => fs::write(&path, dump)
                    .with_context(|| format!("cannot write {}", path.display()))?,
                None => println!("{}", dump),
            }
        }
        Action::Match {
            tokens,
            pattern,
            strip,
        } => {
            let state = LexerState::from_json(&read_source(Some(tokens.as_path()))?)
                .with_context(|| format!("{} is not a lexer dump", tokens.display()))?;
            let pattern: Pattern = pattern.parse()?;
            let mut stream = state.tokens;
            for group in &strip {
                stream = stream.remove(Some(group.as_str()), None);
            }
            debug!("matching `{}` against {} tokens", pattern, stream.len());
            let (matched, count) = matches(&pattern, &stream)?;
            if matched {
                println!("matched {} tokens", count);
            } else {
                match stream.get(count as isize) {
                    Some(token) => println!(
                        "no match: unexpected `{}` at {}",
                        token.value(),
                        token.location()
                    ),
                    None => println!("no match: unexpected end of input"),
                }
                std::process::exit(1);
            }
        }
        Action::Export { rules } => {
            print!("{}", importer(&rules)?.make()?.export());
        }
        Action::Show { pattern } => {
            let pattern: Pattern = pattern.parse()?;
            print_pattern(&pattern)?;
        }
    }
    Ok(())
}
