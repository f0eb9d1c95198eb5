use batchjudge_cli::{cmd::Args, util};
use clap::Parser;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let args = Args::parse_from(util::rewrite_legacy_flags(std::env::args_os()));
    args.exec().await.unwrap_or_else(|e| {
        // Show what the failing program printed before the error itself.
        if let Some(stderr) = util::failing_program_stderr(&e) {
            eprintln!("{}", stderr.trim_end());
        }
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    });
}
