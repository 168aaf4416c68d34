//! Demo commands bound through `argbind-core`.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use argbind_core::{
    CommandArgumentSchema, CommandOptionSchema, CommandSchema, EnumValue, FieldBinding, SchemaError,
    SchemaSet, build_schemas, from_value,
};
use chrono::{DateTime, FixedOffset};

/// A command the binary can run once its fields are bound.
pub trait DemoCommand: Any {
    /// Runs the command and returns what it prints.
    fn execute(&self) -> Result<String, String>;
}

type Factory = fn() -> Box<dyn DemoCommand>;

/// Validated demo schemas plus a constructor per command type.
pub struct Registry {
    schemas: SchemaSet,
    factories: HashMap<TypeId, Factory>,
}

impl Registry {
    /// Validated schemas.
    pub fn schemas(&self) -> &SchemaSet {
        &self.schemas
    }

    /// Creates a default instance of the command `schema` describes.
    pub fn instantiate(&self, schema: &CommandSchema) -> Option<Box<dyn DemoCommand>> {
        self.factories
            .get(&schema.command_type)
            .map(|factory| factory())
    }
}

fn create<C: DemoCommand + Default>() -> Box<dyn DemoCommand> {
    Box::new(C::default())
}

fn factory<C: DemoCommand + Default>() -> (TypeId, Factory) {
    (TypeId::of::<C>(), create::<C>)
}

/// Builds the demo registry.
pub fn registry() -> Result<Registry, SchemaError> {
    let schemas = build_schemas([
        GreetCommand::schema(),
        DivideCommand::schema(),
        ConcatCommand::schema(),
        SumCommand::schema(),
        LogEntryCommand::schema(),
    ])?;

    let factories = HashMap::from([
        factory::<GreetCommand>(),
        factory::<DivideCommand>(),
        factory::<ConcatCommand>(),
        factory::<SumCommand>(),
        factory::<LogEntryCommand>(),
    ]);

    Ok(Registry { schemas, factories })
}

#[derive(Debug, Default)]
pub struct GreetCommand {
    name: Option<String>,
}

impl GreetCommand {
    fn schema() -> CommandSchema {
        CommandSchema::new::<Self>("")
            .with_description("Prints a greeting")
            .with_option(
                CommandOptionSchema::new("name", FieldBinding::new(|c: &mut Self| &mut c.name))
                    .with_short_name('n')
                    .with_description("Who to greet"),
            )
    }
}

impl DemoCommand for GreetCommand {
    fn execute(&self) -> Result<String, String> {
        Ok(format!("Hello, {}!", self.name.as_deref().unwrap_or("world")))
    }
}

#[derive(Debug, Default)]
pub struct DivideCommand {
    dividend: f64,
    divisor: f64,
}

impl DivideCommand {
    fn schema() -> CommandSchema {
        CommandSchema::new::<Self>("div")
            .with_description("Divides one number by another")
            .with_option(
                CommandOptionSchema::new("dividend", FieldBinding::new(|c: &mut Self| &mut c.dividend))
                    .with_short_name('D')
                    .required()
                    .with_description("The number to divide"),
            )
            .with_option(
                CommandOptionSchema::new("divisor", FieldBinding::new(|c: &mut Self| &mut c.divisor))
                    .with_short_name('d')
                    .required()
                    .with_description("The number to divide by"),
            )
    }
}

impl DemoCommand for DivideCommand {
    fn execute(&self) -> Result<String, String> {
        if self.divisor == 0.0 {
            return Err("division by zero".to_string());
        }
        Ok((self.dividend / self.divisor).to_string())
    }
}

#[derive(Debug)]
pub struct ConcatCommand {
    inputs: Vec<String>,
    separator: String,
}

impl Default for ConcatCommand {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            separator: " ".to_string(),
        }
    }
}

impl ConcatCommand {
    fn schema() -> CommandSchema {
        CommandSchema::new::<Self>("concat")
            .with_description("Joins strings")
            .with_option(
                CommandOptionSchema::new("inputs", FieldBinding::new(|c: &mut Self| &mut c.inputs))
                    .with_short_name('i')
                    .required()
                    .with_description("Strings to join"),
            )
            .with_option(
                CommandOptionSchema::new("separator", FieldBinding::new(|c: &mut Self| &mut c.separator))
                    .with_short_name('s')
                    .with_description("Placed between inputs (default: a space)"),
            )
    }
}

impl DemoCommand for ConcatCommand {
    fn execute(&self) -> Result<String, String> {
        Ok(self.inputs.join(&self.separator))
    }
}

#[derive(Debug, Default)]
pub struct SumCommand {
    numbers: Vec<f64>,
}

impl SumCommand {
    fn schema() -> CommandSchema {
        CommandSchema::new::<Self>("sum")
            .with_description("Adds numbers")
            .with_argument(
                CommandArgumentSchema::new("numbers", 0, FieldBinding::new(|c: &mut Self| &mut c.numbers))
                    .with_description("Numbers to add"),
            )
    }
}

impl DemoCommand for SumCommand {
    fn execute(&self) -> Result<String, String> {
        Ok(self.numbers.iter().fold(0.0_f64, |acc, n| acc + n).to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

from_value!(enum LogLevel { Trace, Debug, Info, Warn, Error });

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.variant_name().to_uppercase())
    }
}

#[derive(Debug, Default)]
pub struct LogEntryCommand {
    level: LogLevel,
    message: Vec<String>,
    at: Option<DateTime<FixedOffset>>,
}

impl LogEntryCommand {
    fn schema() -> CommandSchema {
        CommandSchema::new::<Self>("log entry")
            .with_description("Formats a log line")
            .with_argument(
                CommandArgumentSchema::new("level", 0, FieldBinding::new(|c: &mut Self| &mut c.level))
                    .required()
                    .with_description("Severity"),
            )
            .with_argument(
                CommandArgumentSchema::new("message", 1, FieldBinding::new(|c: &mut Self| &mut c.message))
                    .with_description("Message words"),
            )
            .with_option(
                CommandOptionSchema::new("at", FieldBinding::new(|c: &mut Self| &mut c.at))
                    .with_description("Timestamp, with or without offset"),
            )
    }
}

impl DemoCommand for LogEntryCommand {
    fn execute(&self) -> Result<String, String> {
        let message = self.message.join(" ");
        Ok(match self.at {
            Some(at) => format!("[{at}] {} {message}", self.level),
            None => format!("{} {message}", self.level),
        })
    }
}
