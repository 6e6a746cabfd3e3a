//! Driver de linha de comando: lê um fluxo emtsv da entrada padrão e escreve o GATE XML na saída padrão.
//!
//! A configuração opcional vem do arquivo JSON apontado por `GATECONV_CONFIG`;
//! o nível de log segue `RUST_LOG` (padrão `info`).

use std::io::{self, BufWriter};
use std::process::ExitCode;

use gateconv_core::{convert_reader, ConverterOptions};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn load_options() -> gateconv_core::Result<ConverterOptions> {
    match std::env::var_os("GATECONV_CONFIG") {
        Some(path) => {
            info!(path = %path.to_string_lossy(), "carregando configuração");
            ConverterOptions::from_path(path)
        }
        None => Ok(ConverterOptions::default()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let options = match load_options() {
        Ok(options) => options,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    match convert_reader(stdin.lock(), BufWriter::new(stdout.lock()), &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("conversão abortada: {}", e);
            ExitCode::FAILURE
        }
    }
}
