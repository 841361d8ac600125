#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod prelude;
mod quantity;
mod session;
mod tables;

use clap::{Parser, crate_version};

use crate::{api::ApiError, cli::Args, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let result = Args::parse().command.run().await;
    if let Err(error) = &result
        && is_session_expired(error)
    {
        error!("the session has expired, run `enertrack login` to sign in again");
    }
    result?;

    info!("done!");
    Ok(())
}

fn is_session_expired(error: &Error) -> bool {
    error.chain().any(|cause| {
        matches!(cause.downcast_ref::<ApiError>(), Some(ApiError::SessionExpired { .. }))
    })
}
