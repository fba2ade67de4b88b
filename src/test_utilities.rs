use crate::lexer::{Lexer, Rule};

/// A lexer for a tiny language with `if` and `pass` keywords, names,
/// three operators and integer literals, fed with `input`.
pub(crate) fn default_lexer(input: &str) -> Lexer {
    let mut lexer = Lexer::new();
    lexer
        .append(Rule::string("if", "if", Some("keyword")).unwrap())
        .append(Rule::string("pass", "pass", Some("keyword")).unwrap())
        .append(Rule::regex("[a-zA-Z_][a-zA-Z0-9_]*", "name", Some("name")).unwrap())
        .append(Rule::string("==", "eq", Some("operator")).unwrap())
        .append(Rule::string("=", "assign", Some("operator")).unwrap())
        .append(Rule::string(":", "colon", Some("operator")).unwrap())
        .append(Rule::regex("(0|[1-9][0-9]*)", "dec", Some("int")).unwrap())
        .append(Rule::regex("0x[0-9a-fA-F]+", "hex", Some("int")).unwrap())
        .append(Rule::regex("0o[0-7]+", "oct", Some("int")).unwrap())
        .feed(input);
    lexer
}
