// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Add, All, Delete, Get, Keygen, Serve, Types, Update, Version};
use tokio_util::sync::CancellationToken;

command_enum! {
    (Add, Add),
    (All, All),
    (Delete, Delete),
    (Get, Get),
    (Keygen, Keygen),
    (Serve, Serve),
    (Types, Types),
    (Update, Update),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Ctrl-C flips the token; ops check it before starting blocking work.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let ctx = match cli::op::OpContext::new(args.remote, args.key, cancel) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: failed to create API client: {}", e);
            std::process::exit(1);
        }
    };

    match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
