use std::sync::atomic::AtomicUsize;

use envelope_rpc::{RequestEnvelope, SignerRegistry};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{Framed, LinesCodec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    static I: AtomicUsize = AtomicUsize::new(0);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name_fn(|| {
            format!(
                "app-{}",
                I.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            )
        })
        .worker_threads(2)
        .enable_all()
        .build()?;

    runtime.block_on(run_main())
}

async fn run_main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let listener = TcpListener::bind(
        std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0:9000".to_string()),
    )
    .await?;
    let secret = std::env::var("SECRET").unwrap_or_else(|_| "s3cret".to_string());
    log::info!("listening on {}", listener.local_addr()?);

    loop {
        let (stream, address) = listener.accept().await?;
        log::debug!("new connection {address}");
        tokio::spawn(serve_connection(stream, secret.clone()));
    }
}

/// One line in, one line out. Clients open a connection per call, but a connection that
/// keeps sending gets answered in order.
async fn serve_connection(stream: TcpStream, secret: String) {
    let signers = SignerRegistry::default();
    let mut framed = Framed::new(stream, LinesCodec::new());
    while let Some(line) = framed.next().await {
        let response = match line {
            Ok(request) => respond(&request, &secret, &signers),
            Err(e) => {
                log::warn!("bad frame: {e:?}");
                return;
            }
        };
        if let Err(e) = framed.send(response.to_string()).await {
            log::warn!("failed to respond: {e:?}");
            return;
        }
    }
}

fn respond(request: &str, secret: &str, signers: &SignerRegistry) -> Value {
    let envelope: RequestEnvelope = match serde_json::from_str(request) {
        Ok(envelope) => envelope,
        Err(e) => return json!({"ok": false, "error": format!("malformed request: {e}")}),
    };
    match envelope.verify(secret, signers) {
        Ok(true) => {
            log::info!("{} {} from {}", envelope.service, envelope.call, envelope.app_id);
            json!({"ok": true, "data": {"call": envelope.call, "echo": envelope.args}})
        }
        Ok(false) => json!({
            "ok": false,
            "error": "signature mismatch",
            "trace": format!("{} {}", envelope.service, envelope.call),
        }),
        Err(e) => json!({"ok": false, "error": e.to_string()}),
    }
}
