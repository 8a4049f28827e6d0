//! Behaviour-driven tests for plugin registration.

use std::str::FromStr;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::action::{ActionSpec, Arguments, Callable, Choices, ParameterSpec, Primitive};
use crate::error::RegistryError;
use crate::format::Format;
use crate::plugin::{Plugin, PluginMetadata};
use crate::semantic::{SemanticType, TypeExpr};

// ---------------------------------------------------------------------------
// Typed wrappers for Gherkin step parameters
// ---------------------------------------------------------------------------

/// A quoted string value from a Gherkin feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuotedString(String);

impl FromStr for QuotedString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim_matches('"').to_owned()))
    }
}

impl QuotedString {
    fn as_str(&self) -> &str {
        &self.0
    }

    fn items(&self) -> impl Iterator<Item = &str> {
        self.0.split(',').map(str::trim).filter(|item| !item.is_empty())
    }

    fn expr(&self) -> TypeExpr {
        self.0.parse().expect("valid type expression")
    }
}

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TestWorld {
    plugin: Option<Plugin>,
    outcome: Option<Result<(), RegistryError>>,
}

impl TestWorld {
    fn plugin(&self) -> &Plugin {
        self.plugin.as_ref().expect("plugin should be created")
    }

    fn plugin_mut(&mut self) -> &mut Plugin {
        self.plugin.as_mut().expect("plugin should be created")
    }
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn noop(id: &str, arity: usize) -> Callable {
    Callable::new(id, arity, |_: &Arguments| Ok(Vec::new()))
}

fn register_method(plugin: &mut Plugin, id: &str, input: &str) -> Result<(), RegistryError> {
    let spec = ActionSpec::new(noop(id, 1), "Method", "Behaviour fixture.")
        .input("data", TypeExpr::leaf(input))
        .output("out", TypeExpr::leaf("A"));
    plugin.methods().register_function(spec)
}

fn register_directory_format(plugin: &mut Plugin, name: &str) {
    let file = format!("{name}File");
    plugin
        .register_formats([
            Format::file(file.as_str()).with_views(["str"]),
            Format::single_file_directory(name, "data.txt", file.as_str()).with_views(["str"]),
        ])
        .expect("register directory format");
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("a plugin named {name}")]
fn given_plugin(world: &mut TestWorld, name: QuotedString) {
    let plugin = Plugin::new(PluginMetadata::new(name.as_str(), "0.0.0-dev"))
        .expect("valid plugin metadata");
    world.plugin = Some(plugin);
}

#[given("the semantic types {names} are registered")]
fn given_types(world: &mut TestWorld, names: QuotedString) {
    world
        .plugin_mut()
        .register_semantic_types(names.items().map(SemanticType::plain))
        .expect("register semantic types");
}

#[given("the container type {name} over {domain} is registered")]
fn given_container(world: &mut TestWorld, name: QuotedString, domain: QuotedString) {
    world
        .plugin_mut()
        .register_semantic_types([SemanticType::container(name.as_str(), domain.expr())])
        .expect("register container type");
}

#[given("the directory format {name} is registered")]
fn given_directory_format(world: &mut TestWorld, name: QuotedString) {
    register_directory_format(world.plugin_mut(), name.as_str());
}

#[given("{expr} is already bound to {format}")]
fn given_binding(world: &mut TestWorld, expr: QuotedString, format: QuotedString) {
    world
        .plugin_mut()
        .register_semantic_type_to_format(&expr.expr(), format.as_str())
        .expect("bind semantic type");
}

#[given("method {id} with input type {input} is registered")]
fn given_method(world: &mut TestWorld, id: QuotedString, input: QuotedString) {
    register_method(world.plugin_mut(), id.as_str(), input.as_str()).expect("register method");
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("{expr} is bound to {format}")]
fn when_binding(world: &mut TestWorld, expr: QuotedString, format: QuotedString) {
    let result = world
        .plugin_mut()
        .register_semantic_type_to_format(&expr.expr(), format.as_str());
    world.outcome = Some(result);
}

#[when("method {id} with input type {input} is registered")]
fn when_method(world: &mut TestWorld, id: QuotedString, input: QuotedString) {
    let result = register_method(world.plugin_mut(), id.as_str(), input.as_str());
    world.outcome = Some(result);
}

#[when("method {id} with a str parameter {param} restricted to {choices} is registered")]
fn when_method_with_choices(
    world: &mut TestWorld,
    id: QuotedString,
    param: QuotedString,
    choices: QuotedString,
) {
    let spec = ActionSpec::new(noop(id.as_str(), 1), "Method", "Behaviour fixture.")
        .parameter(
            param.as_str(),
            ParameterSpec::new(Primitive::Str).with_choices(Choices::new(choices.items())),
        )
        .output("out", TypeExpr::leaf("A"));
    let result = world.plugin_mut().methods().register_function(spec);
    world.outcome = Some(result);
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("registration succeeds")]
fn then_success(world: &mut TestWorld) {
    let outcome = world.outcome.as_ref().expect("registration attempted");
    assert!(outcome.is_ok(), "expected success, got {outcome:?}");
}

#[then("registration fails with {kind}")]
fn then_failure(world: &mut TestWorld, kind: QuotedString) {
    let err = world
        .outcome
        .as_ref()
        .expect("registration attempted")
        .as_ref()
        .expect_err("expected registration failure");
    let matched = match kind.as_str() {
        "conflicting_binding" => matches!(err, RegistryError::ConflictingBinding { .. }),
        "already_bound" => matches!(err, RegistryError::AlreadyBound { .. }),
        "duplicate_action" => matches!(err, RegistryError::DuplicateAction { .. }),
        "signature" => matches!(err, RegistryError::Signature { .. }),
        other => panic!(
            "unsupported error kind: '{other}' \
             (supported: conflicting_binding, already_bound, duplicate_action, signature)"
        ),
    };
    assert!(matched, "expected {}, got: {err}", kind.as_str());
}

#[then("{expr} resolves to format {format}")]
fn then_resolves(world: &mut TestWorld, expr: QuotedString, format: QuotedString) {
    let bound = world.plugin().format_for(&expr.expr()).map(Format::name);
    assert_eq!(bound, Some(format.as_str()));
}

#[then("{expr} has no format")]
fn then_unbound(world: &mut TestWorld, expr: QuotedString) {
    assert!(world.plugin().format_for(&expr.expr()).is_none());
}

#[then("parameter {param} of {id} offers {count} choices")]
fn then_choices(world: &mut TestWorld, param: QuotedString, id: QuotedString, count: usize) {
    let signature = world
        .plugin()
        .actions()
        .signature(id.as_str())
        .expect("action registered");
    let spec = signature
        .parameter(param.as_str())
        .expect("parameter declared");
    assert_eq!(spec.choices().map(Choices::len), Some(count));
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/plugin_registration.feature")]
fn plugin_registration_behaviour(world: TestWorld) {
    let _ = world;
}
