//! confpatch CLI
//!
//! Entry point for the `confpatch` command-line tool.

use clap::{Parser, Subcommand};
use confpatch::patch::load_document;
use confpatch::{
    docker_network_defaults, ensure_daemon_running, ConfigPatcher, DockerCliProbe, PatchError,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "confpatch")]
#[command(about = "Patch the Docker daemon configuration safely and idempotently", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the network overrides to the daemon config
    Apply {
        /// Path to the daemon config file (default: ~/.docker/daemon.json)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output the patch result in JSON format
        #[arg(long)]
        json: bool,

        /// Print the merged document without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Skip the daemon health check
        #[arg(long)]
        skip_probe: bool,
    },

    /// Show the current config and the overrides apply would set
    Show {
        /// Path to the daemon config file (default: ~/.docker/daemon.json)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            config,
            json,
            dry_run,
            skip_probe,
        } => {
            run_apply(config, json, dry_run, skip_probe);
        }
        Commands::Show { config, json } => {
            run_show(config, json);
        }
    }
}

fn resolve_config_path(config: Option<PathBuf>) -> PathBuf {
    match config {
        Some(path) => path,
        None => match default_config_path(std::env::var("HOME").ok()) {
            Ok(path) => path,
            Err(e) => exit_with(e),
        },
    }
}

/// Default target: the per-user daemon config under `$HOME`. Refuses to
/// guess a relative path when `HOME` is unset.
fn default_config_path(home: Option<String>) -> Result<PathBuf, PatchError> {
    match home {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home).join(".docker/daemon.json")),
        _ => Err(PatchError::Filesystem {
            path: PathBuf::from("~/.docker/daemon.json"),
            detail: "HOME is not set; pass --config <path>".to_string(),
        }),
    }
}

fn run_apply(config_path: Option<PathBuf>, json: bool, dry_run: bool, skip_probe: bool) {
    let path = resolve_config_path(config_path);
    let overrides = docker_network_defaults();
    let patcher = ConfigPatcher::new();

    if dry_run {
        match patcher.preview(&path, &overrides) {
            Ok(merged) => match serde_json::to_string_pretty(&merged) {
                Ok(rendered) => println!("{}", rendered),
                Err(e) => {
                    eprintln!("Error serializing output: {}", e);
                    process::exit(1);
                }
            },
            Err(e) => exit_with(e),
        }
        return;
    }

    // Confirm the daemon is up before touching the file at all.
    if !skip_probe {
        let probe = DockerCliProbe::new();
        if let Err(e) = ensure_daemon_running(&probe) {
            eprintln!("Error: {}", e);
            eprintln!("Start Docker and retry, or pass --skip-probe to patch anyway.");
            process::exit(e.exit_code());
        }
    }

    match patcher.apply(&path, &overrides) {
        Ok(result) => {
            if json {
                match result.to_json() {
                    Ok(rendered) => println!("{}", rendered),
                    Err(e) => {
                        eprintln!("Error serializing output: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                print!("{}", result.to_human());
                println!();
                println!("Restart Docker for the changes to take effect.");
            }
        }
        Err(e) => exit_with(e),
    }
}

fn run_show(config_path: Option<PathBuf>, json: bool) {
    let path = resolve_config_path(config_path);
    let overrides = docker_network_defaults();

    let current = match load_document(&path) {
        Ok(doc) => doc,
        Err(e) => exit_with(e),
    };

    if json {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "config": current,
            "overrides": overrides.to_value(),
        });
        match serde_json::to_string_pretty(&output) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("Config: {}", path.display());
        if path.exists() {
            match serde_json::to_string_pretty(&current) {
                Ok(rendered) => println!("{}", rendered),
                Err(e) => {
                    eprintln!("Error serializing output: {}", e);
                    process::exit(1);
                }
            }
        } else {
            println!("  (no file; treated as an empty document)");
        }
        println!();
        println!("Overrides `apply` would set:");
        for (key, value) in overrides.iter() {
            println!("  {} = {}", key, value);
        }
    }
}

fn exit_with(e: PatchError) -> ! {
    eprintln!("Error: {}", e);
    process::exit(e.exit_code());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_under_home() {
        let path = default_config_path(Some("/home/op".to_string())).unwrap();
        assert_eq!(path, PathBuf::from("/home/op/.docker/daemon.json"));
    }

    #[test]
    fn test_missing_home_is_filesystem_error() {
        let err = default_config_path(None).unwrap_err();
        assert!(matches!(err, PatchError::Filesystem { .. }));
        assert!(err.to_string().contains("--config"));
    }

    #[test]
    fn test_empty_home_is_filesystem_error() {
        let err = default_config_path(Some(String::new())).unwrap_err();
        assert!(matches!(err, PatchError::Filesystem { .. }));
    }
}
