use super::{Flags, Lexer, Rule};
use crate::error::Result;
use crate::stream::TokenStream;
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{ErrorPolicy, TokenizeOptions};
    use crate::test_utilities::default_lexer;

    fn tokenized() -> Lexer {
        let mut lexer = default_lexer("if x == 0:\n  pass $");
        lexer.set_flag("string-sgl-triple", true).unwrap();
        lexer
            .tokenize(TokenizeOptions::new(false, ErrorPolicy::Save))
            .unwrap();
        lexer
    }

    #[test]
    fn json_shape() {
        let mut lexer = default_lexer("if");
        lexer.tokenize(TokenizeOptions::default()).unwrap();
        let dumped: serde_json::Value = serde_json::from_str(&lexer.dumps().to_json().unwrap()).unwrap();
        assert_eq!(
            dumped["tokens"],
            serde_json::json!([
                {"line": 0, "char": 0, "t_group": "keyword", "t_type": "if", "value": "if"}
            ])
        );
        assert_eq!(dumped["flags"]["string-single"], serde_json::json!(true));
        assert_eq!(
            dumped["rules"][2],
            serde_json::json!({
                "kind": "regex",
                "pattern": "[a-zA-Z_][a-zA-Z0-9_]*",
                "name": "name",
                "group": "name"
            })
        );
    }

    #[test]
    fn json_round_trip() {
        let lexer = tokenized();
        let state = LexerState::from_json(&lexer.dumps().to_json().unwrap()).unwrap();
        let loaded = Lexer::loads(state);
        assert_eq!(loaded, lexer);
        assert_eq!(loaded.tokens(), lexer.tokens());
        assert_eq!(loaded.raw_tokens(), lexer.raw_tokens());
        assert_eq!(loaded.tokens()[5].location(), lexer.tokens()[5].location());
    }

    #[test]
    fn binary_round_trip() {
        let lexer = tokenized();
        let bytes = lexer.dumps().to_bytes().unwrap();
        let loaded = Lexer::loads(LexerState::from_bytes(&bytes).unwrap());
        assert_eq!(loaded, lexer);
        assert_eq!(loaded.raw_tokens(), lexer.raw_tokens());
    }

    #[test]
    fn rules_are_validated_on_load() {
        let text = r#"{
            "flags": {},
            "rules": [{"kind": "regex", "pattern": "(", "name": "broken", "group": "x"}],
            "tokens": [],
            "raw": []
        }"#;
        assert!(LexerState::from_json(text).is_err());
    }
}

/// # Summary
///
/// A serialisable snapshot of a [`Lexer`]: its flags and rules, and the
/// token streams of its last tokenization.
///
/// Tokens are written as `{line, char, t_group, t_type, value}` records and
/// rules as `{kind, pattern, name, group}`; rules are rebuilt (and their
/// patterns checked) when a state is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexerState {
    #[serde(default)]
    pub flags: Flags,
    pub rules: Vec<Rule>,
    pub tokens: TokenStream,
    pub raw: TokenStream,
}

impl LexerState {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl Lexer {
    /// Take a snapshot of this lexer and its output.
    pub fn dumps(&self) -> LexerState {
        LexerState {
            flags: self.flags().clone(),
            rules: self.rules().to_vec(),
            tokens: self.tokens().copy(),
            raw: self.raw_tokens().copy(),
        }
    }

    /// Rebuild a lexer from a snapshot. The input text is not part of the
    /// snapshot: the lexer must be fed again before being tokenized.
    pub fn loads(state: LexerState) -> Self {
        let mut lexer = Self::new();
        for rule in state.rules {
            lexer.append(rule);
        }
        *lexer.flags_mut() = state.flags;
        lexer.set_streams(state.tokens, state.raw);
        lexer
    }
}
