use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use bowl::prelude::*;

#[derive(Debug, Default, Clone)]
struct Object {
    name: Option<String>,
}

fn counter() -> Arc<AtomicU32> {
    Arc::new(AtomicU32::new(0))
}

#[test]
fn parameters_bag() {
    let mut bowl = Container::new();
    bowl.set_parameter("foo", "bar");

    assert_eq!(*bowl.parameter::<&str>("foo").unwrap(), "bar");

    bowl.parameters_mut().remove("foo");
    assert!(!bowl.parameters().has("foo"));
    assert!(matches!(
        bowl.parameter::<&str>("foo"),
        Err(BowlError::UndefinedParameter(_))
    ));
}

#[test]
fn shared_producer_runs_once_until_reset() {
    let calls = counter();

    let mut bowl = Container::new();
    bowl.share("test", {
        let calls = calls.clone();
        move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Object::default())
        }
    });

    let a: Arc<Object> = bowl.get("test").unwrap();
    let b: Arc<Object> = bowl.get("test").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let c: Arc<Object> = bowl.reset("test").unwrap().get("test").unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn factory_producer_runs_per_call_and_ignores_reset() {
    let calls = counter();

    let mut bowl = Container::new();
    bowl.factory("test", {
        let calls = calls.clone();
        move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Object::default())
        }
    });

    let a: Arc<Object> = bowl.get("test").unwrap();
    bowl.reset("test").unwrap();
    let b: Arc<Object> = bowl.get("test").unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(bowl.lifecycle_of("test").unwrap(), Lifecycle::Factory);
}

#[test]
fn extend_sets_name() {
    let mut bowl = Container::new();
    bowl.share("test", |_| Ok(Object::default()));
    bowl.extend("test", |_, object: Arc<Object>| {
        let mut object = Arc::unwrap_or_clone(object);
        object.name = Some("foo".into());
        Ok(object)
    })
    .unwrap();

    let object: Arc<Object> = bowl.get("test").unwrap();
    assert_eq!(object.name.as_deref(), Some("foo"));
}

#[test]
fn untyped_extension_wraps_value() {
    let mut bowl = Container::new();
    bowl.factory("n", |_| Ok(2u64));
    bowl.extend_any("n", |_, base| {
        let n = base.downcast_ref::<u64>().copied().unwrap_or_default();
        Ok(Arc::new(n * 21) as Instance)
    })
    .unwrap();

    assert_eq!(*bowl.get::<u64>("n").unwrap(), 42);
}

#[test]
fn tagged_group_resolves_lazily() {
    let calls = counter();

    let mut bowl = Container::new();
    bowl.factory_tagged(
        "a",
        {
            let calls = calls.clone();
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("A")
            }
        },
        ["tag"],
    )
    .share_tagged("b", |_| Ok("B"), ["tag"]);

    let tagged = bowl.get_tagged_services("tag").unwrap();
    assert_eq!(tagged.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let values: Vec<&str> = tagged
        .into_iter()
        .map(|v| *v.unwrap().downcast_ref::<&str>().unwrap())
        .collect();
    assert_eq!(values, ["A", "B"]);

    tagged.resolve_all().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn undefined_lookups_do_not_mutate() {
    let mut bowl = Container::new();

    assert!(matches!(bowl.get::<()>("missing"), Err(BowlError::UndefinedService(_))));
    assert!(matches!(
        bowl.get_tagged_services("missing"),
        Err(BowlError::UndefinedTag(_))
    ));
    assert!(matches!(bowl.env("missing"), Err(BowlError::UndefinedEnvironment(_))));

    assert!(bowl.service_names().is_empty());
    assert!(bowl.tag_names().is_empty());
    assert!(bowl.environment_names().is_empty());
    assert_eq!(bowl.active_environment(), None);
}

#[test]
fn environment_lifecycle() {
    let mut bowl = Container::new();
    bowl.share("test", |_| Ok(Object::default()));
    bowl.configure("dev", |dev| {
        dev.set_parameter("debug", true);
        dev.share("test", |_| {
            Ok(Object {
                name: Some("dev".into()),
            })
        });
    })
    .configure("prod", |prod| {
        prod.set_parameter("debug", false);
    });

    bowl.env("dev").unwrap();
    assert!(*bowl.parameter::<bool>("debug").unwrap());
    assert_eq!(
        bowl.get::<Object>("test").unwrap().name.as_deref(),
        Some("dev")
    );

    match bowl.env("prod") {
        Err(BowlError::AlreadyActivated { active, requested }) => {
            assert_eq!(active, "dev");
            assert_eq!(requested, "prod");
        }
        other => panic!("Expected AlreadyActivated, got: {other:?}"),
    }
    assert!(*bowl.parameter::<bool>("debug").unwrap());

    bowl.env("dev").unwrap();
    assert_eq!(bowl.active_environment(), Some("dev"));
}

#[test]
fn environment_services_keep_identity_after_merge() {
    let mut bowl = Container::new();
    bowl.configure("dev", |dev| {
        dev.share_tagged("cache", |_| Ok(Object::default()), ["infra"]);
    });
    bowl.env("dev").unwrap();

    let by_name = bowl.get_any("cache").unwrap();
    let by_tag = bowl.get_tagged_services("infra").unwrap().resolve_all().unwrap();
    assert!(Arc::ptr_eq(&by_name, &by_tag[0]));
}

#[test]
fn cross_environment_tags_keep_base_first() {
    let mut bowl = Container::new();
    bowl.share_tagged("base.a", |_| Ok("base.a"), ["listener"])
        .share_tagged("base.b", |_| Ok("base.b"), ["listener"]);
    bowl.configure("dev", |dev| {
        dev.share_tagged("dev.a", |_| Ok("dev.a"), ["listener"]);
    });

    bowl.env("dev").unwrap();

    let listeners: Vec<&str> = bowl
        .get_tagged_services("listener")
        .unwrap()
        .iter_as::<&str>()
        .map(|v| *v.unwrap())
        .collect();
    assert_eq!(listeners, ["base.a", "base.b", "dev.a"]);
}

#[test]
fn producers_see_current_dependency_values() {
    let mut bowl = Container::new();
    bowl.factory("child", |_| {
        Ok(Object {
            name: Some("foo".into()),
        })
    })
    .factory("parent", |c| {
        let child: Arc<Object> = c.get("child")?;
        Ok(child.name.clone().unwrap_or_default())
    });

    assert_eq!(bowl.get::<String>("parent").unwrap().as_str(), "foo");

    bowl.factory("child", |_| {
        Ok(Object {
            name: Some("bar".into()),
        })
    });
    assert_eq!(bowl.get::<String>("parent").unwrap().as_str(), "bar");
}

#[test]
fn custom_service_definition() {
    struct Constant(Instance);

    impl Service for Constant {
        fn get(&self, _container: &Container) -> Result<Instance> {
            Ok(self.0.clone())
        }

        fn reset(&self, _container: &Container) -> Result<()> {
            Ok(())
        }

        fn producer(&self) -> Producer {
            let value = self.0.clone();
            Arc::new(move |_: &Container| Ok(value.clone()))
        }

        fn set_producer(&self, _producer: Producer) {}

        fn lifecycle(&self) -> Lifecycle {
            Lifecycle::Shared
        }
    }

    let mut bowl = Container::new();
    bowl.register_service("answer", Arc::new(Constant(Arc::new(42i32))), ["numbers"]);

    assert_eq!(*bowl.get::<i32>("answer").unwrap(), 42);
    assert_eq!(bowl.get_tagged_services("numbers").unwrap().len(), 1);
}

#[test]
fn container_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Container>();
}
