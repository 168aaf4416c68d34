//! Raw token parsing.
//!
//! [`parse_command_input`] turns the argument list handed over by the shell
//! into a [`CommandInput`]: directives (`[name]`), unbound words (command name
//! parts and positional values) and option aliases with their values.
//!
//! # Example
//!
//! ```
//! use argbind_core::parse_command_input;
//!
//! let input = parse_command_input(["[debug]", "div", "-D", "13", "--divisor", "8"]);
//! assert_eq!(input.directives, vec!["debug"]);
//! assert_eq!(input.unbound_arguments, vec!["div"]);
//! assert_eq!(input.options.len(), 2);
//! assert_eq!(input.options[0].alias, "D");
//! assert_eq!(input.options[1].values, vec!["8"]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Directive that asks the host to print the parsed input instead of running.
pub const PREVIEW_DIRECTIVE: &str = "preview";
/// Directive that asks the host to enable diagnostic output.
pub const DEBUG_DIRECTIVE: &str = "debug";

/// One option as typed on the command line, with every value given for it.
///
/// # Examples
///
/// ```
/// use argbind_core::CommandOptionInput;
///
/// let switch = CommandOptionInput::new("v");
/// assert!(switch.values.is_empty());
/// assert_eq!(switch.to_string(), "-v");
///
/// let option = CommandOptionInput::with_values("input", ["a.txt", "b.txt"]);
/// assert_eq!(option.to_string(), "--input a.txt b.txt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOptionInput {
    /// Long or short alias without leading dashes.
    pub alias: String,
    /// Values in the order they appeared. Empty for a bare switch.
    pub values: Vec<String>,
}

impl CommandOptionInput {
    /// Creates an option input without values.
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            values: Vec::new(),
        }
    }

    /// Creates an option input carrying the given values.
    pub fn with_values<I, S>(alias: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            alias: alias.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandOptionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alias.chars().count() > 1 {
            write!(f, "--{}", self.alias)?;
        } else {
            write!(f, "-{}", self.alias)?;
        }
        for value in &self.values {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}

/// Structured form of one command-line invocation.
///
/// Produced once per invocation by [`parse_command_input`] and only read
/// afterwards. An alias occurs at most once in [`options`](Self::options).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInput {
    /// Words not bound to a directive or option: command name parts and
    /// positional values.
    pub unbound_arguments: Vec<String>,
    /// Directive names, brackets stripped.
    pub directives: Vec<String>,
    /// Options in first-seen order.
    pub options: Vec<CommandOptionInput>,
}

impl CommandInput {
    /// Creates an input from already separated parts.
    pub fn new<I, S>(unbound_arguments: I, options: Vec<CommandOptionInput>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            unbound_arguments: unbound_arguments.into_iter().map(Into::into).collect(),
            directives: Vec::new(),
            options,
        }
    }

    /// Adds directives to an input built with [`new`](Self::new).
    pub fn with_directives<I, S>(mut self, directives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directives
            .extend(directives.into_iter().map(Into::into));
        self
    }

    /// Returns `true` when nothing at all was passed.
    pub fn is_empty(&self) -> bool {
        self.unbound_arguments.is_empty() && self.directives.is_empty() && self.options.is_empty()
    }

    /// Checks whether a directive was given (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::parse_command_input;
    ///
    /// let input = parse_command_input(["[Preview]", "run"]);
    /// assert!(input.has_directive("preview"));
    /// assert!(input.is_preview_directive_specified());
    /// assert!(!input.is_debug_directive_specified());
    /// ```
    pub fn has_directive(&self, name: &str) -> bool {
        self.directives
            .iter()
            .any(|directive| directive.eq_ignore_ascii_case(name))
    }

    /// `[debug]` was given.
    pub fn is_debug_directive_specified(&self) -> bool {
        self.has_directive(DEBUG_DIRECTIVE)
    }

    /// `[preview]` was given.
    pub fn is_preview_directive_specified(&self) -> bool {
        self.has_directive(PREVIEW_DIRECTIVE)
    }

    /// `--help`, `-h` or `-?` was given.
    pub fn is_help_option_specified(&self) -> bool {
        self.options.iter().any(|option| {
            option.alias == "h" || option.alias == "?" || option.alias.eq_ignore_ascii_case("help")
        })
    }

    /// `--version` was given.
    pub fn is_version_option_specified(&self) -> bool {
        self.options
            .iter()
            .any(|option| option.alias.eq_ignore_ascii_case("version"))
    }

    /// Finds the option input registered under `alias` (exact match).
    pub fn option(&self, alias: &str) -> Option<&CommandOptionInput> {
        self.options.iter().find(|option| option.alias == alias)
    }
}

impl fmt::Display for CommandInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self
            .unbound_arguments
            .iter()
            .cloned()
            .chain(self.directives.iter().map(|d| format!("[{d}]")))
            .chain(self.options.iter().map(ToString::to_string))
            .collect::<Vec<_>>();
        f.write_str(&parts.join(" "))
    }
}

/// Parses raw command-line tokens.
///
/// Never fails: anything that is not an option marker lands either in the
/// directives, the unbound arguments, or the values of the last opened
/// option. Once the first option marker is seen every later plain token is
/// an option value, so directives and command words must come first.
pub fn parse_command_input<I, S>(tokens: I) -> CommandInput
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unbound_arguments = Vec::new();
    let mut directives = Vec::new();
    let mut options: Vec<CommandOptionInput> = Vec::new();

    // Option aliases and values come in pairs, so the last alias stays open.
    let mut last_alias: Option<usize> = None;

    for token in tokens {
        let token = token.as_ref();

        if let Some(alias) = token.strip_prefix("--") {
            last_alias = register_alias(&mut options, alias);
        } else if let Some(stack) = token.strip_prefix('-') {
            for c in stack.chars() {
                last_alias = register_alias(&mut options, &c.to_string());
            }
        } else if let Some(index) = last_alias {
            options[index].values.push(token.to_string());
        } else if let Some(directive) = token
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            directives.push(directive.to_string());
        } else {
            unbound_arguments.push(token.to_string());
        }
    }

    CommandInput {
        unbound_arguments,
        directives,
        options,
    }
}

/// Registers `alias` if unseen. A blank alias is registered but does not open
/// an option context, so the returned index is `None` for it.
fn register_alias(options: &mut Vec<CommandOptionInput>, alias: &str) -> Option<usize> {
    let index = match options.iter().position(|option| option.alias == alias) {
        Some(index) => index,
        None => {
            options.push(CommandOptionInput::new(alias));
            options.len() - 1
        }
    };
    (!alias.trim().is_empty()).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_input() {
        let input = parse_command_input(Vec::<String>::new());
        assert!(input.unbound_arguments.is_empty());
        assert!(input.directives.is_empty());
        assert!(input.options.is_empty());
        assert!(input.is_empty());
    }

    #[test]
    fn test_parse_long_option_with_value() {
        let input = parse_command_input(["--option", "value"]);
        assert_eq!(
            input.options,
            vec![CommandOptionInput::with_values("option", ["value"])]
        );
        assert!(input.unbound_arguments.is_empty());
    }

    #[test]
    fn test_parse_long_option_with_multiple_values() {
        let input = parse_command_input(["--option", "value1", "value2"]);
        assert_eq!(
            input.options,
            vec![CommandOptionInput::with_values("option", ["value1", "value2"])]
        );
    }

    #[test]
    fn test_parse_repeated_alias_merges_values() {
        let input = parse_command_input(["--option", "a", "-x", "--option", "b"]);
        assert_eq!(
            input.options,
            vec![
                CommandOptionInput::with_values("option", ["a", "b"]),
                CommandOptionInput::new("x"),
            ]
        );
    }

    #[test]
    fn test_parse_stacked_short_options() {
        let input = parse_command_input(["-ab", "value"]);
        assert_eq!(
            input.options,
            vec![
                CommandOptionInput::new("a"),
                CommandOptionInput::with_values("b", ["value"]),
            ]
        );
    }

    #[test]
    fn test_parse_switches_without_values() {
        let input = parse_command_input(["--switch1", "--switch2"]);
        assert_eq!(
            input.options,
            vec![
                CommandOptionInput::new("switch1"),
                CommandOptionInput::new("switch2"),
            ]
        );
    }

    #[test]
    fn test_parse_multi_word_command_name() {
        let input = parse_command_input(["long", "command", "name"]);
        assert_eq!(input.unbound_arguments, vec!["long", "command", "name"]);
        assert!(input.options.is_empty());
        assert!(input.directives.is_empty());
    }

    #[test]
    fn test_parse_directive_before_options() {
        let input = parse_command_input(["[debug]", "-o", "value"]);
        assert_eq!(input.directives, vec!["debug"]);
        assert_eq!(
            input.options,
            vec![CommandOptionInput::with_values("o", ["value"])]
        );
    }

    #[test]
    fn test_parse_bracketed_token_after_option_is_a_value() {
        let input = parse_command_input(["-o", "[debug]"]);
        assert!(input.directives.is_empty());
        assert_eq!(input.options[0].values, vec!["[debug]"]);
    }

    #[test]
    fn test_parse_command_words_then_options() {
        let input = parse_command_input(["log", "entry", "warn", "--at", "2024-01-01"]);
        assert_eq!(input.unbound_arguments, vec!["log", "entry", "warn"]);
        assert_eq!(input.options[0].alias, "at");
    }

    #[test]
    fn test_parse_bare_double_dash_keeps_unbound_region_open() {
        let input = parse_command_input(["--", "file.txt"]);
        assert_eq!(input.unbound_arguments, vec!["file.txt"]);
        assert_eq!(input.options, vec![CommandOptionInput::new("")]);
    }

    #[test]
    fn test_display_renders_all_parts() {
        let input = parse_command_input(["div", "[preview]", "-D", "13", "--divisor", "8"]);
        assert_eq!(input.to_string(), "div [preview] -D 13 --divisor 8");
    }

    #[test]
    fn test_built_input_equals_parsed_input() {
        let built = CommandInput::new(
            ["deploy"],
            vec![CommandOptionInput::with_values("env", ["prod"])],
        )
        .with_directives(["debug"]);
        assert_eq!(built, parse_command_input(["[debug]", "deploy", "--env", "prod"]));
        assert!(built.is_debug_directive_specified());
        assert_eq!(built.to_string(), "deploy [debug] --env prod");
    }

    #[test]
    fn test_option_lookup_is_exact() {
        let input = parse_command_input(["-v", "--Name", "x"]);
        assert_eq!(input.option("Name").unwrap().values, vec!["x"]);
        assert!(input.option("name").is_none());
        assert!(input.option("v").unwrap().values.is_empty());
        assert!(input.option("x").is_none());
    }

    #[test]
    fn test_help_and_version_detection() {
        assert!(parse_command_input(["div", "-h"]).is_help_option_specified());
        assert!(parse_command_input(["--HELP"]).is_help_option_specified());
        assert!(parse_command_input(["--version"]).is_version_option_specified());
        assert!(!parse_command_input(["div"]).is_help_option_specified());
    }
}
