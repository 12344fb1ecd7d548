//! Login Flow
//!
//! This demo drives a login table with per-state async handlers.
//!
//! Key concepts:
//! - Declaring a table with the `state_table!` macro
//! - Per-state handlers that move the machine
//! - A run that ends when a handler stops advancing the state
//! - Failures surfacing as a `TransitionError` with the active state
//!
//! Run with: cargo run --example login_flow
//! Set `RUST_LOG=stepwise=trace` to see every state entry.

use futures_util::FutureExt;
use serde_json::json;
use stepwise::effects::{HandlerFailure, HandlerSpec, RunStrategy, TransitionRunner};
use stepwise::state_table;
use tracing_subscriber::EnvFilter;

// Credentials checked by the `inProgress` handler
struct Directory {
    password: &'static str,
}

// What each run carries from handler to handler
#[derive(Debug, Default)]
struct Session {
    password: String,
    attempts: u32,
    user: Option<String>,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    println!("=== Login Flow ===\n");

    let table = state_table! {
        "initial" => { "ATTEMPT_LOGIN" => "inProgress" },
        "inProgress" => {
            "LOGIN_ERROR" => "error",
            "LOGOUT_ERROR" => "error",
            "LOGIN_SUCCESSFUL" => "loggedIn",
            "LOGOUT_SUCCESSFUL" => "loggedOut",
        },
        "loggedIn" => { "ATTEMPT_LOGOUT" => "inProgress" },
        "loggedOut" => { "ATTEMPT_LOGIN" => "inProgress" },
        "error" => { "ATTEMPT_LOGIN" => "inProgress", "CLEAR_ERROR" => "loggedOut" },
    };

    let handlers = HandlerSpec::per_state()
        .on_sync("initial", |session: Session, machine, _: &Directory| {
            machine.transition("ATTEMPT_LOGIN");
            Ok(session)
        })
        .on("inProgress", |mut session, machine, directory| {
            async move {
                // Stand-in for a call to an identity provider
                tokio::task::yield_now().await;
                session.attempts += 1;

                if session.password == directory.password {
                    machine.transition("LOGIN_SUCCESSFUL");
                    session.user = Some("admin".to_string());
                    Ok(session)
                } else if session.attempts < 3 {
                    machine.transition("LOGIN_ERROR");
                    Ok(session)
                } else {
                    machine.transition("LOGIN_ERROR");
                    Err(HandlerFailure::new("too many attempts")
                        .with_data(json!({ "attempts": session.attempts })))
                }
            }
            .boxed()
        })
        .on_sync("error", |session, machine, _| {
            machine.transition("ATTEMPT_LOGIN");
            Ok(session)
        })
        .on_sync("loggedIn", |session, _, _| Ok(session));

    let runner = match TransitionRunner::builder()
        .table(table)
        .handler(handlers)
        .strategy(RunStrategy::Chained)
        .build()
    {
        Ok(runner) => runner,
        Err(error) => {
            eprintln!("invalid setup: {error}");
            return;
        }
    };

    let directory = Directory { password: "hunter2" };

    println!("1. Correct password:");
    let session = Session {
        password: "hunter2".to_string(),
        ..Session::default()
    };
    match runner.run(session, None, &directory).await {
        Ok(session) => println!(
            "   logged in as {:?} after {} attempt(s)\n",
            session.user, session.attempts
        ),
        Err(error) => println!("   failed: {error}\n"),
    }

    println!("2. Wrong password:");
    let session = Session {
        password: "letmein".to_string(),
        ..Session::default()
    };
    match runner.run(session, None, &directory).await {
        Ok(session) => println!("   unexpectedly logged in: {session:?}\n"),
        Err(error) => println!("   failed: {error}, data: {:?}\n", error.data),
    }

    println!("3. Starting from an undeclared state:");
    match runner.run(Session::default(), Some("limbo"), &directory).await {
        Ok(_) => println!("   unexpectedly succeeded\n"),
        Err(error) => println!("   failed: {error}\n"),
    }

    println!("=== Demo Complete ===");
}
