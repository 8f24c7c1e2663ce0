//! # Example: routing
//!
//! Walks through the three fates a failure can receive.
//!
//! ```text
//! 1. ordinary producer failure   → on_error
//! 2. fatal producer failure      → Err(BridgeError) to the attached caller
//! 3. failure after disposal      → ambient handler (undeliverable)
//! 4. on_next failure, detached   → ambient handler (undeliverable)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=rxbridge=debug cargo run --example routing --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use rxbridge::{
    Bridge, BridgeConfig, Failure, FnSubscriber, HandlerContext, ProducerContext, ProducerError,
    ProducerFn, ProducerRef, Subscription, Undeliverable,
};
use tracing_subscriber::EnvFilter;

fn ticker(name: &'static str, fail_with: Failure) -> ProducerRef<u32> {
    ProducerFn::arc(name, move |ctx: ProducerContext<u32>| {
        let fail_with = fail_with.clone();
        async move {
            for i in 0..3 {
                ctx.send(i).await?;
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            Err::<(), ProducerError>(fail_with.into())
        }
    })
}

fn printer(label: &'static str) -> FnSubscriber<u32> {
    FnSubscriber::new(move |v: u32| {
        println!("[{label}] next {v}");
        Ok(())
    })
    .with_error(move |e: Failure| {
        println!("[{label}] on_error: {e}");
        Ok(())
    })
    .named(label)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let handler = |ctx: &HandlerContext, err: Undeliverable| {
        println!(
            "[ambient] producer={} sub={} origin={} {err}",
            ctx.producer, ctx.subscription, ctx.origin
        );
    };
    let bridge = Bridge::builder(BridgeConfig::default())
        .with_handler(Arc::new(handler))
        .build();

    #[cfg(feature = "logging")]
    let _writer = rxbridge::LogWriter::new().spawn(bridge.bus());

    // 1. ordinary failure reaches on_error
    let outcome = bridge
        .subscribe(
            ticker("ordinary", Failure::domain("feed closed")),
            Arc::new(printer("ordinary")),
        )
        .await?;
    println!("outcome: {}", outcome.as_label());

    // 2. fatal failure is rethrown to this caller
    match bridge
        .subscribe(
            ticker("fatal", Failure::linkage("missing symbol")),
            Arc::new(printer("fatal")),
        )
        .await
    {
        Ok(outcome) => println!("outcome: {}", outcome.as_label()),
        Err(err) => println!("rethrown: {} ({})", err.as_message(), err.as_label()),
    }

    // 3. failure raised after the subscriber disposed
    let disposer = printer("disposer").with_subscribe(|s: Subscription| s.dispose());
    let late: ProducerRef<u32> = ProducerFn::arc("late", |ctx: ProducerContext<u32>| async move {
        if ctx.is_cancelled() {
            return Err(Failure::domain("cleanup failed").into());
        }
        ctx.send(0).await?;
        Ok::<(), ProducerError>(())
    });
    let outcome = bridge.subscribe(late, Arc::new(disposer)).await?;
    println!("outcome: {}", outcome.as_label());

    // 4. on_next fails with nobody attached
    let picky = FnSubscriber::new(|v: u32| {
        if v == 1 {
            return Err(Failure::domain("cannot handle 1"));
        }
        println!("[picky] next {v}");
        Ok(())
    });
    let handle = bridge.subscribe_detached(
        ticker("detached", Failure::domain("unused")),
        Arc::new(picky),
    );
    println!("detached outcome: {}", handle.join().await.as_label());

    Ok(())
}
