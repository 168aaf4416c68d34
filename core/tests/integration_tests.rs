use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use argbind_core::*;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
enum Mode {
    #[default]
    Fast,
    Safe,
}

from_value!(enum Mode { Fast, Safe });

#[derive(Debug, Default)]
struct DeployCommand {
    environment: String,
    targets: Vec<String>,
    mode: Mode,
    dry_run: bool,
    retries: Option<u8>,
    timeout: Option<Duration>,
    config: Option<PathBuf>,
    tags: HashSet<String>,
}

#[derive(Debug, Default)]
struct DeployStatusCommand {
    since: Option<NaiveDate>,
    verbose: bool,
}

#[derive(Debug, Default)]
struct RootCommand {
    version: bool,
}

fn deploy_schema() -> CommandSchema {
    CommandSchema::new::<DeployCommand>("deploy")
        .with_description("Deploys services")
        .with_argument(
            CommandArgumentSchema::new(
                "environment",
                0,
                FieldBinding::new(|c: &mut DeployCommand| &mut c.environment),
            )
            .required(),
        )
        .with_argument(CommandArgumentSchema::new(
            "targets",
            1,
            FieldBinding::new(|c: &mut DeployCommand| &mut c.targets),
        ))
        .with_option(
            CommandOptionSchema::new("mode", FieldBinding::new(|c: &mut DeployCommand| &mut c.mode))
                .with_short_name('m'),
        )
        .with_option(
            CommandOptionSchema::new("dry-run", FieldBinding::new(|c: &mut DeployCommand| &mut c.dry_run))
                .with_short_name('n'),
        )
        .with_option(
            CommandOptionSchema::new("retries", FieldBinding::new(|c: &mut DeployCommand| &mut c.retries))
                .with_short_name('r'),
        )
        .with_option(CommandOptionSchema::new(
            "timeout",
            FieldBinding::new(|c: &mut DeployCommand| &mut c.timeout),
        ))
        .with_option(
            CommandOptionSchema::new("config", FieldBinding::new(|c: &mut DeployCommand| &mut c.config))
                .with_short_name('c'),
        )
        .with_option(
            CommandOptionSchema::new("tag", FieldBinding::new(|c: &mut DeployCommand| &mut c.tags))
                .with_short_name('t'),
        )
}

fn schemas() -> SchemaSet {
    build_schemas([
        CommandSchema::new::<RootCommand>("").with_option(CommandOptionSchema::new(
            "version",
            FieldBinding::new(|c: &mut RootCommand| &mut c.version),
        )),
        deploy_schema(),
        CommandSchema::new::<DeployStatusCommand>("deploy status")
            .with_option(CommandOptionSchema::new(
                "since",
                FieldBinding::new(|c: &mut DeployStatusCommand| &mut c.since),
            ))
            .with_option(
                CommandOptionSchema::short('v', FieldBinding::new(|c: &mut DeployStatusCommand| &mut c.verbose)),
            ),
    ])
    .expect("schemas should be valid")
}

static SCHEMAS: LazyLock<SchemaSet> = LazyLock::new(schemas);

fn bind<C: Default + 'static>(tokens: &[&str]) -> Result<C> {
    let input = parse_command_input(tokens);
    let schema = SCHEMAS
        .resolve(&input.unbound_arguments)
        .expect("some command should match");
    let mut command = C::default();
    initialize_command(&mut command, schema, &input)?;
    Ok(command)
}

#[test]
fn deploy_binds_every_field_type() {
    let command: DeployCommand = bind(&[
        "deploy", "prod", "api", "worker", "-m", "SAFE", "-nr", "3", "--timeout", "00:01:30",
        "--config", "deploy.toml", "-t", "blue", "green", "blue",
    ])
    .unwrap();

    assert_eq!(command.environment, "prod");
    assert_eq!(command.targets, vec!["api", "worker"]);
    assert_eq!(command.mode, Mode::Safe);
    assert!(command.dry_run);
    assert_eq!(command.retries, Some(3));
    assert_eq!(command.timeout, Some(Duration::from_secs(90)));
    assert_eq!(command.config, Some(PathBuf::from("deploy.toml")));
    assert_eq!(
        command.tags,
        HashSet::from(["blue".to_string(), "green".to_string()])
    );
}

#[test]
fn deploy_defaults_stay_when_not_given() {
    let command: DeployCommand = bind(&["deploy", "staging"]).unwrap();
    assert_eq!(command.environment, "staging");
    assert!(command.targets.is_empty());
    assert_eq!(command.mode, Mode::Fast);
    assert!(!command.dry_run);
    assert_eq!(command.retries, None);
}

#[test]
fn deploy_requires_environment() {
    let err = bind::<DeployCommand>(&["deploy", "--mode", "fast"]).unwrap_err();
    assert!(matches!(
        err,
        Error::Binding(BindingError::MissingArguments { ref names }) if names == &["environment"]
    ));
}

#[test]
fn longer_command_name_wins() {
    let command: DeployStatusCommand =
        bind(&["deploy", "status", "--since", "2024-03-01", "-v"]).unwrap();
    assert_eq!(command.since, NaiveDate::from_ymd_opt(2024, 3, 1));
    assert!(command.verbose);
}

#[test]
fn short_alias_is_case_sensitive() {
    let command: DeployStatusCommand = bind(&["deploy", "status", "-V"]).unwrap();
    assert!(!command.verbose);
}

#[test]
fn default_command_handles_bare_options() {
    let command: RootCommand = bind(&["--version"]).unwrap();
    assert!(command.version);
}

#[test]
fn switch_accepts_explicit_literal() {
    let command: DeployCommand = bind(&["deploy", "dev", "--dry-run", "false"]).unwrap();
    assert!(!command.dry_run);
}

#[test]
fn conversion_errors_name_the_value_and_type() {
    let err = bind::<DeployCommand>(&["deploy", "dev", "--retries", "300"]).unwrap_err();
    assert_eq!(err.to_string(), "can't convert value [300] to type [u8]");

    let err = bind::<DeployCommand>(&["deploy", "dev", "--timeout", "soon"]).unwrap_err();
    assert!(matches!(err, Error::Conversion(ConversionError::InvalidValue { .. })));
}

#[test]
fn schema_set_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let env = format!("env{i}");
                let command: DeployCommand = bind(&["deploy", env.as_str()]).unwrap();
                command.environment
            })
        })
        .collect();

    let mut environments: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    environments.sort();
    assert_eq!(environments, vec!["env0", "env1", "env2", "env3"]);
}

#[test]
fn schema_metadata_serializes() {
    let json = serde_json::to_value(&*SCHEMAS).unwrap();
    let deploy = &json[1];
    assert_eq!(deploy["name"], "deploy");
    assert_eq!(deploy["arguments"][1]["binding"]["shape"], "sequence");
    assert_eq!(deploy["options"][0]["binding"]["strategy"], "enumeration");
    assert_eq!(deploy["options"][2]["binding"]["strategy"], "nullable");
}

#[test]
fn invalid_declarations_are_rejected() {
    let err = build_schemas([
        deploy_schema(),
        CommandSchema::new::<DeployStatusCommand>("DEPLOY"),
    ])
    .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateCommand { .. }));

    let err = build_schemas([deploy_schema().with_option(
        CommandOptionSchema::short('m', FieldBinding::new(|c: &mut DeployCommand| &mut c.dry_run)),
    )])
    .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateShortName { short_name: 'm', .. }));
}
