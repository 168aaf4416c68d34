//! Schema validation and the validated [`SchemaSet`].
//!
//! Catches declaration mistakes such as two options sharing a short name,
//! or two commands sharing a name, before any input is bound.
//!
//! # Examples
//!
//! ```
//! use argbind_core::*;
//!
//! #[derive(Default)]
//! struct Hello {
//!     name: String,
//! }
//!
//! let schema = CommandSchema::new::<Hello>("hello")
//!     .with_option(CommandOptionSchema::new("name", FieldBinding::new(|c: &mut Hello| &mut c.name)).with_short_name('n'));
//! assert!(validate_schema(&schema).is_empty());
//!
//! // Invalid: long name carrying its dashes
//! let bad = CommandSchema::new::<Hello>("hello")
//!     .with_option(CommandOptionSchema::new("--name", FieldBinding::new(|c: &mut Hello| &mut c.name)));
//! assert!(!validate_schema(&bad).is_empty());
//! ```

use std::any::{Any, TypeId};
use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{CommandOptionSchema, CommandSchema, FieldBinding};

/// Declaration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The definition set is empty.
    #[error("there are no commands defined")]
    NoCommands,
    /// Two commands share a name (compared case-insensitively).
    #[error("command type [{existing}] has the same name as command type [{duplicate}]: '{name}'")]
    DuplicateCommand {
        /// Shared name.
        name: String,
        /// Type declared first.
        existing: &'static str,
        /// Type declared later.
        duplicate: &'static str,
    },
    /// Two options or arguments of one command share a name.
    #[error("command type [{command_type}] has options/arguments defined with the same name: {name}")]
    DuplicateName {
        /// Command type.
        command_type: &'static str,
        /// Shared name.
        name: String,
    },
    /// Two options of one command share a short name.
    #[error("command type [{command_type}] has options with the same short name: {short_name}")]
    DuplicateShortName {
        /// Command type.
        command_type: &'static str,
        /// Shared short name.
        short_name: char,
    },
    /// An option has neither a long nor a short name.
    #[error("command type [{command_type}] has an option without a name or short name")]
    MissingOptionName {
        /// Command type.
        command_type: &'static str,
    },
    /// A long name is empty, starts with a dash or contains whitespace.
    #[error("command type [{command_type}] has an invalid option name: {name:?}")]
    InvalidOptionName {
        /// Command type.
        command_type: &'static str,
        /// Offending name.
        name: String,
    },
    /// A short name is a dash or whitespace.
    #[error("command type [{command_type}] has an invalid short name: {short_name:?}")]
    InvalidShortName {
        /// Command type.
        command_type: &'static str,
        /// Offending short name.
        short_name: char,
    },
    /// A positional argument has an empty name.
    #[error("command type [{command_type}] has an argument without a name")]
    EmptyArgumentName {
        /// Command type.
        command_type: &'static str,
    },
    /// A field binding points into another type than the command's.
    #[error("command type [{command_type}] binds '{field}' to a field of [{owner}]")]
    BindingOwnerMismatch {
        /// Command type.
        command_type: &'static str,
        /// Option alias or argument name.
        field: String,
        /// Type the binding writes into.
        owner: &'static str,
    },
}

/// Validates a single command schema.
///
/// Checks option names, short names and argument names, name uniqueness
/// across options and arguments, short-name uniqueness across options, and
/// that every binding writes into the command type. Stops at the first
/// problem, so the result holds at most one error.
pub fn validate_schema(schema: &CommandSchema) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let command_type = schema.type_name;

    let mut names: HashSet<&str> = HashSet::new();
    let mut short_names: HashSet<char> = HashSet::new();

    for option in &schema.options {
        if let Err(err) = validate_option(command_type, option) {
            errors.push(err);
            return errors;
        }

        if let Err(err) = check_owner(schema, &option.primary_alias(), &option.binding) {
            errors.push(err);
            return errors;
        }

        if let Some(name) = option.name.as_deref() {
            if !names.insert(name) {
                errors.push(SchemaError::DuplicateName {
                    command_type,
                    name: name.to_string(),
                });
                return errors;
            }
        }

        if let Some(short_name) = option.short_name {
            if !short_names.insert(short_name) {
                errors.push(SchemaError::DuplicateShortName {
                    command_type,
                    short_name,
                });
                return errors;
            }
        }
    }

    for argument in &schema.arguments {
        if argument.name.trim().is_empty() {
            errors.push(SchemaError::EmptyArgumentName { command_type });
            return errors;
        }

        if let Err(err) = check_owner(schema, &argument.name, &argument.binding) {
            errors.push(err);
            return errors;
        }

        if !names.insert(argument.name.as_str()) {
            errors.push(SchemaError::DuplicateName {
                command_type,
                name: argument.name.clone(),
            });
            return errors;
        }
    }

    errors
}

fn validate_option(
    command_type: &'static str,
    option: &CommandOptionSchema,
) -> Result<(), SchemaError> {
    if option.name.is_none() && option.short_name.is_none() {
        return Err(SchemaError::MissingOptionName { command_type });
    }

    if let Some(name) = option.name.as_deref() {
        if name.is_empty() || name.starts_with('-') || name.chars().any(char::is_whitespace) {
            return Err(SchemaError::InvalidOptionName {
                command_type,
                name: name.to_string(),
            });
        }
    }

    if let Some(short_name) = option.short_name {
        if short_name == '-' || short_name.is_whitespace() {
            return Err(SchemaError::InvalidShortName {
                command_type,
                short_name,
            });
        }
    }

    Ok(())
}

fn check_owner(schema: &CommandSchema, field: &str, binding: &FieldBinding) -> Result<(), SchemaError> {
    if binding.owner == schema.command_type {
        return Ok(());
    }
    Err(SchemaError::BindingOwnerMismatch {
        command_type: schema.type_name,
        field: field.to_string(),
        owner: binding.owner_name,
    })
}

/// Validates command definitions and collects them into a [`SchemaSet`].
///
/// Fails on the first problem in declaration order: an empty definition
/// set, a command name used twice (ignoring case), or any error reported by
/// [`validate_schema`].
///
/// # Examples
///
/// ```
/// use argbind_core::*;
///
/// #[derive(Default)]
/// struct Build;
/// #[derive(Default)]
/// struct Test;
///
/// let set = build_schemas([
///     CommandSchema::new::<Build>("build"),
///     CommandSchema::new::<Test>("test"),
/// ])
/// .unwrap();
/// assert_eq!(set.len(), 2);
///
/// let err = build_schemas([
///     CommandSchema::new::<Build>("build"),
///     CommandSchema::new::<Test>("BUILD"),
/// ])
/// .unwrap_err();
/// assert!(matches!(err, SchemaError::DuplicateCommand { .. }));
/// ```
pub fn build_schemas<I>(definitions: I) -> Result<SchemaSet, SchemaError>
where
    I: IntoIterator<Item = CommandSchema>,
{
    let schemas: Vec<CommandSchema> = definitions.into_iter().collect();
    if schemas.is_empty() {
        return Err(SchemaError::NoCommands);
    }

    for (index, schema) in schemas.iter().enumerate() {
        if let Some(existing) = schemas[..index]
            .iter()
            .find(|other| other.name.to_lowercase() == schema.name.to_lowercase())
        {
            return Err(SchemaError::DuplicateCommand {
                name: schema.name.clone(),
                existing: existing.type_name,
                duplicate: schema.type_name,
            });
        }

        if let Some(err) = validate_schema(schema).into_iter().next() {
            debug!(command = %schema.name, error = %err, "Rejected command schema");
            return Err(err);
        }

        debug!(
            command = %schema.name,
            command_type = schema.type_name,
            options = schema.options.len(),
            arguments = schema.arguments.len(),
            "Validated command schema"
        );
    }

    Ok(SchemaSet { schemas })
}

/// Validated, immutable set of command schemas.
///
/// Only obtainable through [`build_schemas`]. The set is `Send + Sync` and
/// can be shared freely once built.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct SchemaSet {
    schemas: Vec<CommandSchema>,
}

impl SchemaSet {
    /// Schemas in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, CommandSchema> {
        self.schemas.iter()
    }

    /// Schemas in declaration order.
    pub fn as_slice(&self) -> &[CommandSchema] {
        &self.schemas
    }

    /// Number of schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Always `false` for a set produced by [`build_schemas`].
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Finds a command by exact name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&CommandSchema> {
        let name = name.to_lowercase();
        self.schemas
            .iter()
            .find(|schema| schema.name.to_lowercase() == name)
    }

    /// Finds the schema declared for command type `C`.
    pub fn find_by_type<C: Any>(&self) -> Option<&CommandSchema> {
        let command_type = TypeId::of::<C>();
        self.schemas
            .iter()
            .find(|schema| schema.command_type == command_type)
    }

    /// The nameless default command, if one is declared.
    pub fn default_command(&self) -> Option<&CommandSchema> {
        self.schemas.iter().find(|schema| schema.is_default())
    }
}

impl<'a> IntoIterator for &'a SchemaSet {
    type Item = &'a CommandSchema;
    type IntoIter = std::slice::Iter<'a, CommandSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.schemas.iter()
    }
}
