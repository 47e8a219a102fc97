use envelope_rpc::{Configuration, ServiceConfig, ServiceProxy};
use envelope_rpc_transport::DefaultConnector;
use serde::Deserialize;
use serde_json::json;

/// A hand-written wrapper: one method per remote operation.
struct Greeter {
    proxy: ServiceProxy,
}

#[derive(Debug, Deserialize)]
struct Echoed {
    call: String,
    echo: Vec<serde_json::Value>,
}

impl Greeter {
    fn hello(&self, name: &str, times: u32) -> envelope_rpc::Result<Echoed> {
        self.proxy.call("hello", (name, times))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1:9000".to_string());
    let secret = std::env::var("SECRET").unwrap_or_else(|_| "s3cret".to_string());

    let mut configuration = Configuration::default();
    configuration.service(
        "Echo",
        ServiceConfig::new("example-client", secret, format!("tcp://{host}")),
    );
    let factory = envelope_rpc::global::install(configuration, DefaultConnector::default())?;

    let greeter = Greeter {
        proxy: factory.proxy_for("Services\\Echo\\Greeter"),
    };
    let echoed = greeter.hello("world", 3)?;
    log::info!("{} echoed {:?}", echoed.call, echoed.echo);

    let untyped = factory.call("Services\\Echo\\Clock", "now", vec![json!("utc")])?;
    println!("{untyped}");
    Ok(())
}
