use crate::{
    config::Config, copy_to_bucket, download_object, logging, ApiResponse, Engine,
    LocalFsStore, RawfetchError, ReqwestTransport,
};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "rawfetch", version, about = "Fetch raw file content from hosted repositories")]
pub struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a file and print its raw text to stdout
    Fetch { url: String },
    /// Upload a directory tree into a bucket, skipping objects that already exist
    Upload(UploadArgs),
    /// Download a single object from a bucket into a local directory
    Download(DownloadArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
struct UploadArgs {
    local_dir: PathBuf,
    bucket: String,
    destination: String,
}

#[derive(Args)]
struct DownloadArgs {
    bucket: String,
    destination: String,
    local_dir: PathBuf,
    /// Object name under the destination prefix
    #[arg(long, default_value = "Mkradar.db")]
    name: String,
}

pub fn run() {
    let cli = Cli::parse();
    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };
    logging::init(&cfg.log_filter);

    let code = execute(cli, &cfg, &mut std::io::stdout().lock());
    std::process::exit(code);
}

/// Run one subcommand and return the process exit code: 0 on success,
/// 1 when the fetch core failed, 2 for anything else.
pub fn execute(cli: Cli, cfg: &Config, out: &mut dyn Write) -> i32 {
    let res = dispatch(cli.cmd, cfg, out).and_then(|_| out.flush().map_err(Into::into));
    match res {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_code(&e)
        }
    }
}

fn exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<RawfetchError>() {
        Some(e) if e.is_fatal() => 1,
        _ => 2,
    }
}

fn dispatch(cmd: Command, cfg: &Config, out: &mut dyn Write) -> anyhow::Result<()> {
    match cmd {
        Command::Fetch { url } => {
            let transport = ReqwestTransport::with_timeout(Duration::from_millis(cfg.timeout_ms))?;
            let engine = Engine::from_env(&transport);
            let text = engine.fetch_text(&url)?;
            write!(out, "{text}")?;
            Ok(())
        }
        Command::Upload(args) => {
            let res = open_store(cfg).map(|store| {
                copy_to_bucket(&store, &args.local_dir, &args.bucket, &args.destination)
            });
            finish(out, res)
        }
        Command::Download(args) => {
            let res = open_store(cfg).map(|store| {
                let downloaded = download_object(
                    &store,
                    &args.bucket,
                    &args.destination,
                    &args.local_dir,
                    &args.name,
                );
                serde_json::json!({ "downloaded": downloaded })
            });
            finish(out, res)
        }
        Command::Config => print_json(out, ApiResponse::ok(cfg)),
    }
}

fn open_store(cfg: &Config) -> anyhow::Result<LocalFsStore> {
    LocalFsStore::with_root(&cfg.store_root)
        .with_context(|| format!("opening store at {}", cfg.store_root.display()))
}

/// Print the JSON envelope for `res`; an error is still returned so the
/// exit code reflects it.
fn finish<T: serde::Serialize>(out: &mut dyn Write, res: anyhow::Result<T>) -> anyhow::Result<()> {
    match res {
        Ok(v) => print_json(out, ApiResponse::ok(v)),
        Err(e) => {
            print_json(out, ApiResponse::<()>::err(format!("{e:#}")))?;
            Err(e)
        }
    }
}

fn print_json<T: serde::Serialize>(out: &mut dyn Write, val: T) -> anyhow::Result<()> {
    // pretty JSON output
    writeln!(out, "{}", serde_json::to_string_pretty(&val)?)?;
    Ok(())
}
