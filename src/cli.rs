use clap::{ArgAction, Parser as CliParser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(CliParser)]
#[command(author, version, about, long_about=None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log more (repeat for even more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub action: Action,
}

/// What to do with input no rule recognises
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Errors {
    /// Stop with an error
    Throw,
    /// Keep it as an invalid token
    Save,
    /// Skip it
    Drop,
}

#[derive(Subcommand)]
pub enum Action {
    /// Tokenize a file and dump the lexer state as JSON
    Lex {
        /// The lexer definition, in the rule language
        #[arg(id = "rules")]
        rules: PathBuf,
        /// The file to tokenize (standard input if omitted)
        source: Option<PathBuf>,
        /// Where to write the dump (standard output if omitted)
        #[arg(short = 'o', long = "output")]
        output_path: Option<PathBuf>,
        /// Emit line-leading whitespace as tokens
        #[arg(long)]
        indent: bool,
        /// What to do with unrecognised input
        #[arg(long, value_enum, default_value_t = Errors::Throw)]
        errors: Errors,
    },
    /// Match a pattern against a dumped token stream
    Match {
        /// A lexer state dumped by `lex`
        #[arg(id = "tokens")]
        tokens: PathBuf,
        /// The pattern, in pattern notation
        pattern: String,
        /// Remove the tokens of this group before matching
        #[arg(long = "strip", value_name = "GROUP")]
        strip: Vec<String>,
    },
    /// Print a lexer definition in normalised form
    Export {
        /// The lexer definition, in the rule language
        #[arg(id = "rules")]
        rules: PathBuf,
    },
    /// Print the tree of a pattern
    Show {
        /// The pattern, in pattern notation
        pattern: String,
    },
}
