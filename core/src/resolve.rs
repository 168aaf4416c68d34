//! Picks the command an invocation refers to.

use tracing::{debug, trace};

use crate::{CommandSchema, SchemaSet};

/// Finds the most specific schema whose name starts the unbound arguments.
///
/// The unbound arguments are joined with single spaces. A schema matches
/// when the joined text starts with its name, so the nameless default
/// command matches anything. Among matches the longest name wins.
/// Comparison is case-sensitive.
///
/// # Examples
///
/// ```
/// use argbind_core::{CommandSchema, match_schema};
///
/// struct Log;
/// struct LogEntry;
/// struct Fallback;
///
/// let schemas = [
///     CommandSchema::new::<Fallback>(""),
///     CommandSchema::new::<Log>("log"),
///     CommandSchema::new::<LogEntry>("log entry"),
/// ];
///
/// let words = |s: &str| s.split(' ').map(String::from).collect::<Vec<_>>();
/// assert_eq!(match_schema(&words("log entry warn"), &schemas).unwrap().name, "log entry");
/// assert_eq!(match_schema(&words("log entries"), &schemas).unwrap().name, "log");
/// assert_eq!(match_schema(&words("other"), &schemas).unwrap().name, "");
/// ```
pub fn match_schema<'a>(
    unbound_arguments: &[String],
    schemas: &'a [CommandSchema],
) -> Option<&'a CommandSchema> {
    let candidate = unbound_arguments.join(" ");

    let matched = schemas
        .iter()
        .filter(|schema| candidate.starts_with(schema.name.as_str()))
        .inspect(|schema| trace!(command = %schema.name, "Candidate command"))
        .max_by_key(|schema| schema.name.len());

    match matched {
        Some(schema) => debug!(input = %candidate, command = %schema.name, "Resolved command"),
        None => debug!(input = %candidate, "No command matches input"),
    }

    matched
}

impl SchemaSet {
    /// Resolves the command for the given unbound arguments.
    ///
    /// See [`match_schema`].
    pub fn resolve(&self, unbound_arguments: &[String]) -> Option<&CommandSchema> {
        match_schema(unbound_arguments, self.as_slice())
    }
}
