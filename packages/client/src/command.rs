//! Parsing of the commands typed at the prompt.

use serde_json::json;

use crate::error::ClientError;

pub const HELP: &str = "\
Commands:
  light <index> <message>  light an empty candle, or rewrite your own
  blow <index>             blow out your own candle
  help                     show this help
  quit                     leave";

/// A command typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Light { index: usize, message: String },
    Blow { index: usize },
    Help,
    Quit,
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Result<Self, ClientError> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match verb {
            "light" => {
                let (index, message) = rest.split_once(char::is_whitespace).ok_or_else(|| {
                    ClientError::InvalidCommand("Usage: light <index> <message>".to_string())
                })?;
                let message = message.trim();
                if message.is_empty() {
                    return Err(ClientError::InvalidCommand(
                        "Usage: light <index> <message>".to_string(),
                    ));
                }
                Ok(Command::Light {
                    index: parse_index(index)?,
                    message: message.to_string(),
                })
            }
            "blow" => Ok(Command::Blow {
                index: parse_index(rest)?,
            }),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(ClientError::InvalidCommand(format!(
                "Unknown command '{}'. Type 'help' for a list of commands.",
                verb
            ))),
        }
    }

    /// Wire request for commands that talk to the server
    pub fn to_request(&self) -> Option<String> {
        match self {
            Command::Light { index, message } => {
                Some(json!({ "i": index, "message": message }).to_string())
            }
            Command::Blow { index } => Some(json!({ "i": index, "message": null }).to_string()),
            Command::Help | Command::Quit => None,
        }
    }
}

fn parse_index(value: &str) -> Result<usize, ClientError> {
    value
        .trim()
        .parse()
        .map_err(|_| ClientError::InvalidCommand(format!("'{}' is not a candle number", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_light() {
        // テスト項目: light コマンドはメッセージの空白を保ったまま解析される
        // when (操作):
        let command = Command::parse("light 3 happy  birthday").unwrap();

        // then (期待する結果):
        assert_eq!(
            command,
            Command::Light {
                index: 3,
                message: "happy  birthday".to_string()
            }
        );
    }

    #[test]
    fn test_parse_blow_help_quit() {
        // テスト項目: blow / help / quit が解析される
        // then (期待する結果):
        assert_eq!(Command::parse("blow 0").unwrap(), Command::Blow { index: 0 });
        assert_eq!(Command::parse("help").unwrap(), Command::Help);
        assert_eq!(Command::parse(" quit ").unwrap(), Command::Quit);
        assert_eq!(Command::parse("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_invalid() {
        // テスト項目: 不正な入力はエラーになる
        // given (前提条件):
        let inputs = ["light", "light 1", "light x hello", "blow", "blow -1", "dance"];

        for input in inputs {
            // when (操作):
            let result = Command::parse(input);

            // then (期待する結果):
            assert!(
                matches!(result, Err(ClientError::InvalidCommand(_))),
                "input should be rejected: {}",
                input
            );
        }
    }

    #[test]
    fn test_to_request() {
        // テスト項目: サーバーに送る JSON が正しく作られる
        // given (前提条件):
        let light = Command::Light {
            index: 1,
            message: "hi".to_string(),
        };
        let blow = Command::Blow { index: 1 };

        // when (操作):
        let light: serde_json::Value =
            serde_json::from_str(&light.to_request().unwrap()).unwrap();
        let blow: serde_json::Value = serde_json::from_str(&blow.to_request().unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(light, json!({"i": 1, "message": "hi"}));
        assert_eq!(blow, json!({"i": 1, "message": null}));
        assert_eq!(Command::Help.to_request(), None);
    }
}
