//! Writes parsed input onto a command instance.
//!
//! Options are bound first, matched by alias. Positional values are what is
//! left of the unbound arguments once the command name is stripped; they
//! fill the arguments in [`sorted_arguments`](CommandSchema::sorted_arguments)
//! order.

use std::any::Any;

use thiserror::Error;
use tracing::{debug, trace};

use crate::{CommandArgumentSchema, CommandInput, CommandOptionSchema, CommandSchema, Error};

/// Binding failures that are not conversion failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// Required options absent from the input, by primary alias.
    #[error("one or more required options were not set: {}", .names.join(", "))]
    MissingOptions {
        /// Primary aliases in declaration order.
        names: Vec<String>,
    },
    /// Required arguments that received no value.
    #[error("one or more required arguments were not set: {}", .names.join(", "))]
    MissingArguments {
        /// Argument names in declaration order.
        names: Vec<String>,
    },
    /// The instance is not of the schema's command type.
    #[error("command instance is not of type [{expected}]")]
    InstanceMismatch {
        /// Expected command type.
        expected: &'static str,
    },
}

/// Binds `input` onto `command` following `schema`.
///
/// Unknown option aliases are ignored. Fields not mentioned in the input
/// keep whatever value `command` already had. Fails on the first
/// conversion error, or when required options or arguments stay unset.
///
/// # Examples
///
/// ```
/// use argbind_core::*;
///
/// #[derive(Debug, Default)]
/// struct DivideCommand {
///     dividend: f64,
///     divisor: f64,
/// }
///
/// let schema = CommandSchema::new::<DivideCommand>("div")
///     .with_option(
///         CommandOptionSchema::new("dividend", FieldBinding::new(|c: &mut DivideCommand| &mut c.dividend))
///             .with_short_name('D')
///             .required(),
///     )
///     .with_option(
///         CommandOptionSchema::new("divisor", FieldBinding::new(|c: &mut DivideCommand| &mut c.divisor))
///             .with_short_name('d')
///             .required(),
///     );
///
/// let input = parse_command_input(["div", "-D", "13", "--divisor", "8"]);
/// let mut command = DivideCommand::default();
/// initialize_command(&mut command, &schema, &input).unwrap();
/// assert_eq!(command.dividend, 13.0);
/// assert_eq!(command.divisor, 8.0);
///
/// let input = parse_command_input(["div", "-D", "13"]);
/// let err = initialize_command(&mut DivideCommand::default(), &schema, &input).unwrap_err();
/// assert_eq!(err.to_string(), "one or more required options were not set: divisor");
/// ```
pub fn initialize_command(
    command: &mut dyn Any,
    schema: &CommandSchema,
    input: &CommandInput,
) -> Result<(), Error> {
    if (*command).type_id() != schema.command_type {
        return Err(BindingError::InstanceMismatch {
            expected: schema.type_name,
        }
        .into());
    }

    bind_options(command, schema, input)?;
    bind_arguments(command, schema, input)?;

    debug!(command = %schema.name, "Command initialized");
    Ok(())
}

fn bind_options(command: &mut dyn Any, schema: &CommandSchema, input: &CommandInput) -> Result<(), Error> {
    let mut unset_required: Vec<&CommandOptionSchema> =
        schema.options.iter().filter(|option| option.is_required).collect();

    for option_input in &input.options {
        let Some(option) = schema.find_option(&option_input.alias) else {
            trace!(alias = %option_input.alias, "Ignoring unknown option");
            continue;
        };

        option.binding.assign(command, &option_input.values)?;
        debug!(
            option = %option,
            values = ?option_input.values,
            value_type = option.binding.value_type,
            "Bound option"
        );

        unset_required.retain(|required| !std::ptr::eq(*required, option));
    }

    if !unset_required.is_empty() {
        return Err(BindingError::MissingOptions {
            names: unset_required
                .iter()
                .map(|option| option.primary_alias())
                .collect(),
        }
        .into());
    }

    Ok(())
}

fn bind_arguments(command: &mut dyn Any, schema: &CommandSchema, input: &CommandInput) -> Result<(), Error> {
    let mut positional = positional_arguments(schema, &input.unbound_arguments);
    let mut unset_required: Vec<&CommandArgumentSchema> = schema
        .arguments
        .iter()
        .filter(|argument| argument.is_required)
        .collect();

    for argument in schema.sorted_arguments() {
        if positional.is_empty() {
            break;
        }

        let take = if argument.binding.is_sequence() {
            positional.len()
        } else {
            1
        };
        let (values, rest) = positional.split_at(take);

        argument.binding.assign(command, values)?;
        debug!(
            argument = %argument.name,
            values = ?values,
            value_type = argument.binding.value_type,
            "Bound argument"
        );

        positional = rest;
        unset_required.retain(|required| !std::ptr::eq(*required, argument));
    }

    if !positional.is_empty() {
        trace!(unused = ?positional, "Positional values left over");
    }

    if !unset_required.is_empty() {
        return Err(BindingError::MissingArguments {
            names: unset_required
                .iter()
                .map(|argument| argument.name.clone())
                .collect(),
        }
        .into());
    }

    Ok(())
}

/// Drops the leading tokens that spell out the command name.
///
/// A token is dropped while it is a prefix of what is left of the name;
/// the rest of the name is trimmed after each one.
fn positional_arguments<'a>(schema: &CommandSchema, unbound_arguments: &'a [String]) -> &'a [String] {
    let mut remaining_name = schema.name.trim();
    let mut skipped = 0;

    for token in unbound_arguments {
        if remaining_name.is_empty() {
            break;
        }
        match remaining_name.strip_prefix(token.as_str()) {
            Some(rest) => {
                remaining_name = rest.trim();
                skipped += 1;
            }
            None => break,
        }
    }

    &unbound_arguments[skipped..]
}
