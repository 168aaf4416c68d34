//! Declarative command-line argument binding.
//!
//! The crate turns raw command-line tokens into populated command values:
//!
//! - [`parse_command_input`] splits tokens into directives, unbound words
//!   and option values ([`CommandInput`]).
//! - [`CommandSchema`] declares a command: its name, [`CommandOptionSchema`]s
//!   and [`CommandArgumentSchema`]s, each bound to a field through a
//!   [`FieldBinding`]. [`build_schemas`] validates the declarations into a
//!   [`SchemaSet`].
//! - [`SchemaSet::resolve`] (or [`match_schema`]) picks the command the
//!   unbound words name.
//! - [`initialize_command`] converts values ([`convert`], [`FromValues`])
//!   and writes them onto a command instance, checking required fields.
//!
//! # Example
//!
//! ```
//! use argbind_core::*;
//!
//! #[derive(Debug, Default)]
//! struct ConcatCommand {
//!     inputs: Vec<String>,
//!     separator: String,
//! }
//!
//! #[derive(Debug, Default)]
//! struct SumCommand {
//!     numbers: Vec<i64>,
//! }
//!
//! let schemas = build_schemas([
//!     CommandSchema::new::<ConcatCommand>("concat")
//!         .with_option(
//!             CommandOptionSchema::new("inputs", FieldBinding::new(|c: &mut ConcatCommand| &mut c.inputs))
//!                 .with_short_name('i')
//!                 .required(),
//!         )
//!         .with_option(
//!             CommandOptionSchema::new("separator", FieldBinding::new(|c: &mut ConcatCommand| &mut c.separator))
//!                 .with_short_name('s'),
//!         ),
//!     CommandSchema::new::<SumCommand>("sum").with_argument(CommandArgumentSchema::new(
//!         "numbers",
//!         0,
//!         FieldBinding::new(|c: &mut SumCommand| &mut c.numbers),
//!     )),
//! ])
//! .unwrap();
//!
//! let input = parse_command_input(["sum", "1", "2", "39"]);
//! let schema = schemas.resolve(&input.unbound_arguments).unwrap();
//! assert_eq!(schema.name, "sum");
//!
//! let mut command = SumCommand::default();
//! initialize_command(&mut command, schema, &input).unwrap();
//! assert_eq!(command.numbers.iter().sum::<i64>(), 42);
//! ```

mod bind;
pub mod convert;
mod error;
mod input;
mod resolve;
mod types;
mod validate;

pub use bind::{BindingError, initialize_command};
pub use convert::{
    ConversionError, DecimalSeparatorError, EnumValue, FormatConvention, FromValue, FromValues,
    ParseFormatted, Strategy, TimeSpanFormatError, ValueShape, convert,
};
pub use rust_decimal::Decimal;
pub use error::{Error, Result};
pub use input::{
    CommandInput, CommandOptionInput, DEBUG_DIRECTIVE, PREVIEW_DIRECTIVE, parse_command_input,
};
pub use resolve::match_schema;
pub use types::*;
pub use validate::{SchemaError, SchemaSet, build_schemas, validate_schema};
