use augment_core::{
    global_registry, implementation_fn, same_object, Augmentable, AugmentOutcome, AugmentedObject,
    Augmenter, CapabilitySet, InterfaceDescriptor, InterfaceImplementation, InvokeResult,
    OperationError, Route, SharedObject, SharedRegistry, TypeDescriptor,
};
use serde_json::{json, Value};
use std::any::Any;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

struct Sensor {
    descriptor: TypeDescriptor,
    capabilities: CapabilitySet,
}

fn sensor_type() -> TypeDescriptor {
    TypeDescriptor::new("Sensor")
}

fn sensor(capabilities: CapabilitySet) -> SharedObject {
    Arc::new(Sensor {
        descriptor: sensor_type(),
        capabilities,
    })
}

impl Augmentable for Sensor {
    fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    fn operations(&self) -> Vec<String> {
        vec!["read".to_string(), "label".to_string()]
    }

    fn invoke(&self, operation: &str, _args: &[Value]) -> InvokeResult {
        match operation {
            "read" => Ok(json!(21)),
            "label" => Ok(json!("sensor")),
            other => Err(OperationError::unsupported(other).into()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn constant(
    value: Value,
) -> impl Fn(&SharedObject, &Value) -> Arc<dyn InterfaceImplementation> + Send + Sync + 'static {
    move |_base, _capability| {
        let value = value.clone();
        implementation_fn(move |_base, _operation, _args| Ok(value.clone()))
    }
}

#[test]
fn earliest_registered_extension_wins_shared_operations() {
    let augmenter = Augmenter::new(sensor_type());
    augmenter
        .register(
            "calibrated",
            InterfaceDescriptor::new("Calibrated", ["read"]),
            constant(json!("calibrated")),
        )
        .expect("first registration");
    augmenter
        .register(
            "smoothed",
            InterfaceDescriptor::new("Smoothed", ["read", "average"]),
            constant(json!("smoothed")),
        )
        .expect("second registration");

    let caps = CapabilitySet::new()
        .with("smoothed", true)
        .with("calibrated", true);
    let augmented = augmenter.augment(sensor(caps));

    assert_eq!(augmented.invoke("read", &[]).expect("read"), json!("calibrated"));
    assert_eq!(augmented.invoke("average", &[]).expect("average"), json!("smoothed"));
    assert_eq!(augmented.invoke("label", &[]).expect("label"), json!("sensor"));

    let proxy = AugmentedObject::inspect(&augmented).expect("augmented object");
    assert_eq!(proxy.routing().shadowed().len(), 1);
    assert_eq!(proxy.routing().shadowed()[0].winner, "Calibrated");
}

#[test]
fn inactive_earlier_entry_does_not_shadow_later_one() {
    let augmenter = Augmenter::new(sensor_type());
    augmenter
        .register(
            "calibrated",
            InterfaceDescriptor::new("Calibrated", ["read"]),
            constant(json!("calibrated")),
        )
        .expect("first registration");
    augmenter
        .register(
            "smoothed",
            InterfaceDescriptor::new("Smoothed", ["read"]),
            constant(json!("smoothed")),
        )
        .expect("second registration");

    let caps = CapabilitySet::new()
        .with("calibrated", false)
        .with("smoothed", true);
    let augmented = augmenter.augment(sensor(caps));

    assert_eq!(augmented.invoke("read", &[]).expect("read"), json!("smoothed"));
    let proxy = AugmentedObject::inspect(&augmented).expect("augmented object");
    assert_eq!(
        proxy.route("read"),
        Route::Extension {
            capability: "smoothed",
            interface: "Smoothed"
        }
    );
}

#[test]
fn every_augment_call_builds_a_fresh_proxy() {
    let augmenter = Augmenter::new(sensor_type());
    augmenter
        .register(
            "calibrated",
            InterfaceDescriptor::new("Calibrated", ["read"]),
            constant(json!(20)),
        )
        .expect("registration");
    let base = sensor(CapabilitySet::new().with("calibrated", true));

    let first = augmenter.augment_with_report(base.clone());
    let second = augmenter.augment_with_report(base.clone());

    assert!(!same_object(&first.object, &second.object));
    match (&first.outcome, &second.outcome) {
        (
            AugmentOutcome::Augmented { proxy_id: a, .. },
            AugmentOutcome::Augmented { proxy_id: b, .. },
        ) => assert_ne!(a, b),
        other => panic!("unexpected outcomes: {other:?}"),
    }
    assert!(same_object(
        AugmentedObject::inspect(&first.object)
            .expect("augmented")
            .delegate(),
        &base
    ));
}

#[test]
fn concurrent_augmentation_reads_shared_registry() {
    let registry = SharedRegistry::new();
    registry
        .register(
            "calibrated",
            InterfaceDescriptor::new("Calibrated", ["read"]),
            constant(json!("calibrated")),
        )
        .expect("registration");
    let augmenter = Augmenter::with_registry(sensor_type(), registry);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let augmenter = augmenter.clone();
            thread::spawn(move || {
                let caps = CapabilitySet::new().with("calibrated", true);
                let augmented = augmenter.augment(sensor(caps));
                augmented.invoke("read", &[]).expect("read")
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("augment thread"), json!("calibrated"));
    }
}

#[test]
fn global_registry_backs_global_augmenters() {
    let capability = "globalRoutingPrecedenceTest";
    global_registry()
        .register(
            capability,
            InterfaceDescriptor::new("GlobalLabel", ["label"]),
            constant(json!("global")),
        )
        .expect("global registration");

    let augmenter = Augmenter::global(sensor_type());
    assert!(augmenter.registry().ptr_eq(&global_registry()));

    let augmented = augmenter.augment(sensor(CapabilitySet::new().with(capability, true)));
    assert_eq!(augmented.invoke("label", &[]).expect("label"), json!("global"));
}

#[test]
fn factory_can_register_into_its_own_registry() {
    let registry = SharedRegistry::new();
    let reentrant = registry.clone();
    registry
        .register(
            "calibrated",
            InterfaceDescriptor::new("Calibrated", ["read"]),
            move |_base, _value| {
                // Ignored on repeat runs: the pair is already registered.
                let _ = reentrant.register(
                    "smoothed",
                    InterfaceDescriptor::new("Smoothed", ["average"]),
                    constant(json!("smoothed")),
                );
                implementation_fn(|_base, _operation, _args| Ok(json!("calibrated")))
            },
        )
        .expect("registration");
    let augmenter = Augmenter::with_registry(sensor_type(), registry.clone());

    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let augmented = augmenter.augment(sensor(CapabilitySet::new().with("calibrated", true)));
        let read = augmented.invoke("read", &[]).map_err(|err| err.to_string());
        let _ = sender.send(read);
    });

    let read = receiver
        .recv_timeout(Duration::from_secs(5))
        .expect("augment should return while its factory registers");
    assert_eq!(read.expect("read"), json!("calibrated"));
    assert_eq!(registry.len(), 2);
}

#[test]
fn factory_can_augment_through_the_same_registry() {
    let registry = SharedRegistry::new();
    registry
        .register(
            "smoothed",
            InterfaceDescriptor::new("Smoothed", ["average"]),
            constant(json!("smoothed")),
        )
        .expect("inner registration");
    let nested = Augmenter::with_registry(sensor_type(), registry.clone());
    registry
        .register(
            "calibrated",
            InterfaceDescriptor::new("Calibrated", ["read"]),
            move |_base, _value| {
                let helper = nested.augment(sensor(CapabilitySet::new().with("smoothed", true)));
                implementation_fn(move |_base, _operation, _args| helper.invoke("average", &[]))
            },
        )
        .expect("outer registration");
    let augmenter = Augmenter::with_registry(sensor_type(), registry);

    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let augmented = augmenter.augment(sensor(CapabilitySet::new().with("calibrated", true)));
        let read = augmented.invoke("read", &[]).map_err(|err| err.to_string());
        let _ = sender.send(read);
    });

    let read = receiver
        .recv_timeout(Duration::from_secs(5))
        .expect("nested augment should not block");
    assert_eq!(read.expect("read"), json!("smoothed"));
}
