use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use lu_translator::{
    JsonFileExporter, NoopExporter, RouteExporter, Translator, TranslatorConfig, DEFAULT_NLRI,
};

/// lu-translator reads ExaBGP JSON messages on stdin and maintains the table of BGP
/// Labeled-Unicast routes they describe.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    /// NLRI family key of Labeled-Unicast routes in update messages
    #[clap(short, long, default_value = DEFAULT_NLRI)]
    nlri: String,

    /// Write logs to this file instead of stderr
    #[clap(short, long)]
    log_file: Option<PathBuf>,

    /// Log filter (e.g. `info`, `lu_translator=debug`), overridden by RUST_LOG when set
    #[clap(long, default_value = "debug")]
    log_level: String,

    /// Write a JSON snapshot of the route table to this file after every change
    #[clap(short, long)]
    export: Option<PathBuf>,

    /// Pretty-print exported JSON
    #[clap(long)]
    pretty: bool,
}

fn init_logger(config: &TranslatorConfig, log_level: &str) -> std::io::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(log_level).parse_default_env();
    if let Some(file) = config.open_log_file()? {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn run<E: RouteExporter>(config: TranslatorConfig, exporter: E) -> i32 {
    let mut translator = Translator::with_exporter(config, exporter);
    let stdin = std::io::stdin();
    match translator.run(stdin.lock()) {
        Ok(stats) => {
            info!("input closed: {:?}", stats);
            0
        }
        Err(e) => {
            error!("shutting down: {}", e);
            1
        }
    }
}

fn main() {
    let opts: Opts = Opts::parse();

    let mut config = TranslatorConfig::default().with_nlri(opts.nlri.as_str());
    if let Some(path) = &opts.log_file {
        config = config.with_log_file(path);
    }

    if let Err(e) = init_logger(&config, &opts.log_level) {
        eprintln!("unable to open log file: {}", e);
        std::process::exit(1);
    }
    info!("translating {:?} routes", config.nlri);

    let code = match &opts.export {
        Some(path) => run(config, JsonFileExporter::new(path).pretty(opts.pretty)),
        None => run(config, NoopExporter),
    };
    std::process::exit(code);
}
