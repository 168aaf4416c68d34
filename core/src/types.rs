//! Command schema definitions.
//!
//! A [`CommandSchema`] describes one command type: its (possibly multi-word)
//! name, the options it accepts and its positional arguments. Schemas are
//! declared in code with the `with_*` builder methods and validated once by
//! [`build_schemas`](crate::build_schemas).
//!
//! Every option and argument carries a [`FieldBinding`] that knows how to
//! convert values and store them in the right field of the command.
//!
//! # Examples
//!
//! ```
//! use argbind_core::*;
//!
//! #[derive(Default)]
//! struct DivideCommand {
//!     dividend: f64,
//!     divisor: f64,
//! }
//!
//! let schema = CommandSchema::new::<DivideCommand>("div")
//!     .with_description("Divides one number by another")
//!     .with_option(
//!         CommandOptionSchema::new("dividend", FieldBinding::new(|c: &mut DivideCommand| &mut c.dividend))
//!             .with_short_name('D')
//!             .required(),
//!     )
//!     .with_option(
//!         CommandOptionSchema::new("divisor", FieldBinding::new(|c: &mut DivideCommand| &mut c.divisor))
//!             .with_short_name('d')
//!             .required(),
//!     );
//!
//! assert_eq!(schema.name, "div");
//! assert!(schema.find_option("D").is_some());
//! assert!(schema.find_option("DIVISOR").is_some());
//! assert!(schema.find_option("x").is_none());
//! ```

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::{BindingError, Error, FromValues, Strategy, ValueShape};

type FieldWriter = dyn Fn(&mut dyn Any, &[String]) -> Result<(), Error> + Send + Sync;

/// Typed accessor for one field of a command type.
///
/// Created from a projection closure such as `|c: &mut MyCommand| &mut
/// c.field`. The field type decides how values are converted (see
/// [`FromValues`]); the binding records that decision so it can be
/// inspected without a command instance.
///
/// # Examples
///
/// ```
/// use argbind_core::{FieldBinding, Strategy, ValueShape};
///
/// #[derive(Default)]
/// struct Concat {
///     inputs: Vec<String>,
/// }
///
/// let binding = FieldBinding::new(|c: &mut Concat| &mut c.inputs);
/// assert_eq!(binding.shape, ValueShape::Sequence);
/// assert_eq!(binding.strategy, Strategy::Passthrough);
///
/// let mut command = Concat::default();
/// binding.assign(&mut command, &["a".to_string(), "b".to_string()]).unwrap();
/// assert_eq!(command.inputs, vec!["a", "b"]);
/// ```
#[derive(Clone, Serialize)]
pub struct FieldBinding {
    /// Command type the field belongs to.
    #[serde(skip)]
    pub owner: TypeId,
    /// Name of [`owner`](Self::owner).
    pub owner_name: &'static str,
    /// Name of the field type.
    pub value_type: &'static str,
    /// Whether the field takes one value or all of them.
    pub shape: ValueShape,
    /// Conversion rule of the field (of its elements, for sequences).
    pub strategy: Strategy,
    #[serde(skip)]
    write: Arc<FieldWriter>,
}

impl FieldBinding {
    /// Creates a binding from a field projection.
    pub fn new<C, T, F>(project: F) -> Self
    where
        C: Any,
        T: FromValues + 'static,
        F: for<'a> Fn(&'a mut C) -> &'a mut T + Send + Sync + 'static,
    {
        let write = move |command: &mut dyn Any, values: &[String]| -> Result<(), Error> {
            let command = command
                .downcast_mut::<C>()
                .ok_or(BindingError::InstanceMismatch {
                    expected: type_name::<C>(),
                })?;
            *project(command) = T::from_values(values)?;
            Ok(())
        };

        Self {
            owner: TypeId::of::<C>(),
            owner_name: type_name::<C>(),
            value_type: type_name::<T>(),
            shape: T::SHAPE,
            strategy: T::STRATEGY,
            write: Arc::new(write),
        }
    }

    /// Converts `values` and stores the result in `command`.
    ///
    /// Fails with [`BindingError::InstanceMismatch`] when `command` is not
    /// the owning type, or with a
    /// [`ConversionError`](crate::ConversionError) when the values do not
    /// convert.
    pub fn assign(&self, command: &mut dyn Any, values: &[String]) -> Result<(), Error> {
        (self.write)(command, values)
    }

    /// Returns `true` when the field consumes every remaining value.
    pub fn is_sequence(&self) -> bool {
        self.shape == ValueShape::Sequence
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("owner", &self.owner_name)
            .field("value_type", &self.value_type)
            .field("shape", &self.shape)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

/// Schema for a named option (`--name` / `-n`).
///
/// # Examples
///
/// ```
/// use argbind_core::{CommandOptionSchema, FieldBinding};
///
/// #[derive(Default)]
/// struct Cmd {
///     verbose: bool,
/// }
///
/// let option = CommandOptionSchema::new("verbose", FieldBinding::new(|c: &mut Cmd| &mut c.verbose))
///     .with_short_name('v');
/// assert_eq!(option.aliases(), vec!["verbose", "v"]);
/// assert!(option.matches_alias("VERBOSE"));
/// assert!(option.matches_alias("v"));
/// assert!(!option.matches_alias("V"));
/// assert_eq!(option.to_string(), "--verbose|-v");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CommandOptionSchema {
    /// Long name, without leading dashes.
    pub name: Option<String>,
    /// One-character short name.
    pub short_name: Option<char>,
    /// Binding fails unless the option is given.
    pub is_required: bool,
    /// Help text.
    pub description: Option<String>,
    /// Target field.
    pub binding: FieldBinding,
}

impl CommandOptionSchema {
    /// Creates an option with a long name.
    pub fn new(name: &str, binding: FieldBinding) -> Self {
        Self {
            name: Some(name.to_string()),
            short_name: None,
            is_required: false,
            description: None,
            binding,
        }
    }

    /// Creates an option that only has a short name.
    pub fn short(short_name: char, binding: FieldBinding) -> Self {
        Self {
            name: None,
            short_name: Some(short_name),
            is_required: false,
            description: None,
            binding,
        }
    }

    /// Sets the short name.
    pub fn with_short_name(mut self, short_name: char) -> Self {
        self.short_name = Some(short_name);
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Long name then short name, whichever are present.
    pub fn aliases(&self) -> Vec<String> {
        self.name
            .iter()
            .cloned()
            .chain(self.short_name.map(String::from))
            .collect()
    }

    /// Alias used in messages: the long name if any, else the short name.
    pub fn primary_alias(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.short_name.map(String::from))
            .unwrap_or_default()
    }

    /// Matches an input alias: long names ignore case, short names do not.
    pub fn matches_alias(&self, alias: &str) -> bool {
        let long = self
            .name
            .as_deref()
            .is_some_and(|name| name.to_lowercase() == alias.to_lowercase());
        let short = self.short_name.is_some_and(|short| {
            let mut chars = alias.chars();
            chars.next() == Some(short) && chars.next().is_none()
        });
        long || short
    }
}

impl fmt::Display for CommandOptionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_required {
            f.write_str("*")?;
        }
        let aliases = self
            .name
            .iter()
            .map(|name| format!("--{name}"))
            .chain(self.short_name.map(|short| format!("-{short}")))
            .collect::<Vec<_>>();
        f.write_str(&aliases.join("|"))
    }
}

/// Schema for a positional argument.
///
/// Arguments fill in ascending [`order`](Self::order); equal orders fall
/// back to the name, compared case-insensitively.
#[derive(Debug, Clone, Serialize)]
pub struct CommandArgumentSchema {
    /// Name used in messages and help.
    pub name: String,
    /// Slot position.
    pub order: i32,
    /// Binding fails unless a value reaches this argument.
    pub is_required: bool,
    /// Help text.
    pub description: Option<String>,
    /// Target field.
    pub binding: FieldBinding,
}

impl CommandArgumentSchema {
    /// Creates an optional argument.
    pub fn new(name: &str, order: i32, binding: FieldBinding) -> Self {
        Self {
            name: name.to_string(),
            order,
            is_required: false,
            description: None,
            binding,
        }
    }

    /// Marks the argument as required.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

impl fmt::Display for CommandArgumentSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_required {
            f.write_str("*")?;
        }
        f.write_str(&self.name)
    }
}

/// Schema for one command type.
///
/// The name may span several words (`"log entry"`). An empty name marks the
/// default command, used when no other name matches.
#[derive(Debug, Clone, Serialize)]
pub struct CommandSchema {
    /// Identity of the command type.
    #[serde(skip)]
    pub command_type: TypeId,
    /// Name of the command type.
    pub type_name: &'static str,
    /// Command name as typed, words separated by single spaces.
    pub name: String,
    /// Help text.
    pub description: Option<String>,
    /// Options in declaration order.
    pub options: Vec<CommandOptionSchema>,
    /// Positional arguments in declaration order.
    pub arguments: Vec<CommandArgumentSchema>,
}

impl CommandSchema {
    /// Creates an empty schema for command type `C`.
    pub fn new<C: Any>(name: &str) -> Self {
        Self {
            command_type: TypeId::of::<C>(),
            type_name: type_name::<C>(),
            name: name.to_string(),
            description: None,
            options: Vec::new(),
            arguments: Vec::new(),
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds an option.
    pub fn with_option(mut self, option: CommandOptionSchema) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a positional argument.
    pub fn with_argument(mut self, argument: CommandArgumentSchema) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Returns `true` for the nameless default command.
    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    /// Finds the option an input alias refers to.
    pub fn find_option(&self, alias: &str) -> Option<&CommandOptionSchema> {
        self.options.iter().find(|option| option.matches_alias(alias))
    }

    /// Arguments in the order they take positional values.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::{CommandArgumentSchema, CommandSchema, FieldBinding};
    ///
    /// #[derive(Default)]
    /// struct CopyCommand {
    ///     source: String,
    ///     target: String,
    ///     extra: Vec<String>,
    /// }
    ///
    /// let schema = CommandSchema::new::<CopyCommand>("copy")
    ///     .with_argument(CommandArgumentSchema::new("extra", 9, FieldBinding::new(|c: &mut CopyCommand| &mut c.extra)))
    ///     .with_argument(CommandArgumentSchema::new("target", 1, FieldBinding::new(|c: &mut CopyCommand| &mut c.target)))
    ///     .with_argument(CommandArgumentSchema::new("source", 0, FieldBinding::new(|c: &mut CopyCommand| &mut c.source)));
    ///
    /// let names: Vec<_> = schema.sorted_arguments().iter().map(|a| a.name.as_str()).collect();
    /// assert_eq!(names, vec!["source", "target", "extra"]);
    /// ```
    pub fn sorted_arguments(&self) -> Vec<&CommandArgumentSchema> {
        let mut arguments: Vec<&CommandArgumentSchema> = self.arguments.iter().collect();
        arguments.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        arguments
    }
}
