//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `augment_core` linkage and print its version.
//! - Run one augmentation end to end and print the resulting routing table.
//! - Initialize file logging when `AUGMENT_LOG_DIR` names an absolute path.

use augment_core::{
    default_log_level, implementation_fn, init_logging, Augmentable, AugmentationRegistry,
    AugmentedObject, Augmenter, CapabilitySet, InterfaceDescriptor, InvokeResult, OperationError,
    RegistrationError, Route, SharedObject, SharedRegistry, TypeDescriptor,
};
use log::info;
use serde_json::{json, Value};
use std::any::Any;
use std::process::ExitCode;
use std::sync::Arc;

const LOG_DIR_ENV: &str = "AUGMENT_LOG_DIR";

struct Greeter {
    descriptor: TypeDescriptor,
    capabilities: CapabilitySet,
}

impl Augmentable for Greeter {
    fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    fn operations(&self) -> Vec<String> {
        vec!["greet".to_string(), "quit".to_string()]
    }

    fn invoke(&self, operation: &str, args: &[Value]) -> InvokeResult {
        match operation {
            "greet" => {
                let name = args.first().and_then(Value::as_str).unwrap_or("world");
                Ok(json!(format!("hello, {name}")))
            }
            "quit" => Err(OperationError::failed("quit", "demo session cannot quit").into()),
            other => Err(OperationError::unsupported(other).into()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn demo_registry() -> Result<AugmentationRegistry, RegistrationError> {
    let mut registry = AugmentationRegistry::new();
    registry.register(
        "shouts",
        InterfaceDescriptor::new("Shouts", ["greet", "shout"]),
        |_base, _value| {
            implementation_fn(|base, _operation, args| {
                let greeting = base.invoke("greet", args)?;
                Ok(json!(greeting.as_str().unwrap_or_default().to_uppercase()))
            })
        },
    )?;
    registry.register(
        "quitSuppressed",
        InterfaceDescriptor::new("SuppressesQuit", ["quit"]),
        |_base, _value| implementation_fn(|_base, _operation, _args| Ok(Value::Null)),
    )?;
    Ok(registry)
}

fn main() -> ExitCode {
    println!("augment_core version={}", augment_core::core_version());

    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("augment_cli logging disabled: {err}");
        }
    }

    let registry = match demo_registry() {
        Ok(registry) => SharedRegistry::from_registry(registry),
        Err(err) => {
            eprintln!("augment_cli registration failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    match serde_json::to_string(&registry.snapshot().descriptors()) {
        Ok(entries) => println!("registry entries={entries}"),
        Err(err) => eprintln!("augment_cli cannot encode registry: {err}"),
    }

    let greeter_type = TypeDescriptor::new("Greeter");
    let augmenter = Augmenter::with_registry(greeter_type.clone(), registry);

    let greeter: SharedObject = Arc::new(Greeter {
        descriptor: greeter_type,
        capabilities: CapabilitySet::new()
            .with("shouts", true)
            .with("quitSuppressed", true),
    });

    let report = augmenter.augment_with_report(greeter);
    info!(
        "event=cli_demo module=augment_cli status=ok augmented={}",
        report.is_augmented()
    );
    match serde_json::to_string(&report.outcome) {
        Ok(outcome) => println!("augment outcome={outcome}"),
        Err(err) => eprintln!("augment_cli cannot encode outcome: {err}"),
    }

    if let Some(proxy) = AugmentedObject::inspect(&report.object) {
        let intercepted: Vec<&str> = proxy.routing().intercepted_operations().collect();
        println!("intercepted={}", intercepted.join(","));
        for operation in proxy.operations() {
            match proxy.route(&operation) {
                Route::Extension {
                    capability,
                    interface,
                } => println!("route {operation} -> {interface} (capability {capability})"),
                Route::Delegate => println!("route {operation} -> delegate"),
            }
        }
    }

    for operation in ["greet", "quit"] {
        match report.object.invoke(operation, &[json!("augment")]) {
            Ok(value) => println!("{operation} = {value}"),
            Err(err) => println!("{operation} failed: {err}"),
        }
    }

    ExitCode::SUCCESS
}
