//! Basic example of the Bowl container.
//!
//! Run with `RUST_LOG=bowl_container=debug` to see registrations and
//! environment activation.

use std::sync::Arc;

use bowl::prelude::*;
use tracing_subscriber::EnvFilter;

// === Define your types ===

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

struct ConsoleLogger {
    prefix: String,
}

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[{}] {msg}", self.prefix);
    }
}

struct Database {
    url: String,
    logger: Arc<Box<dyn Logger>>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

trait Handler: Send + Sync {
    fn handle(&self) -> String;
}

struct UserHandler {
    db: Arc<Database>,
}

impl Handler for UserHandler {
    fn handle(&self) -> String {
        self.db.query("SELECT * FROM users")
    }
}

struct HealthHandler;

impl Handler for HealthHandler {
    fn handle(&self) -> String {
        "ok".to_string()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut bowl = Container::new();
    bowl.set_parameter("db.url", String::from("postgres://localhost/app"));

    bowl.share("logger", |_| {
        Ok(Box::new(ConsoleLogger { prefix: "LOG".into() }) as Box<dyn Logger>)
    })
    .share("db", |c| {
        let url: Arc<String> = c.parameter("db.url")?;
        Ok(Database {
            url: url.to_string(),
            logger: c.get("logger")?,
        })
    })
    .factory_tagged(
        "handler.users",
        |c| Ok(Box::new(UserHandler { db: c.get("db")? }) as Box<dyn Handler>),
        ["http.handler"],
    )
    .factory_tagged(
        "handler.health",
        |_| Ok(Box::new(HealthHandler) as Box<dyn Handler>),
        ["http.handler"],
    );

    // Decorate the logger with a louder prefix
    bowl.extend("logger", |_, _inner: Arc<Box<dyn Logger>>| {
        Ok(Box::new(ConsoleLogger { prefix: "LOUD".into() }) as Box<dyn Logger>)
    })?;

    bowl.configure("test", |env| {
        env.set_parameter("db.url", String::from("sqlite::memory:"));
    });

    if std::env::args().any(|arg| arg == "--test-env") {
        bowl.env("test")?;
    }

    println!("{bowl:?}");

    for handler in bowl.get_tagged_services("http.handler")?.iter_as::<Box<dyn Handler>>() {
        println!("{}", handler?.handle());
    }

    Ok(())
}
