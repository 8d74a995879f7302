// File: crates/cppman/src/main.rs

mod args;
mod error;
mod project;
mod scaffold;

use args::Args;
use cppman_args::Parser;
use project::ProjectPlan;
use scaffold::ScaffoldConfig;

fn main() {
    // Respects RUST_LOG if set; otherwise only warnings are logged.
    init_logging();

    // Non-UTF-8 tokens are converted lossily and left for the parser to report.
    let argv: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let program = argv.first().map(String::as_str).unwrap_or("cppman");

    let registry = args::registry();
    let mut parser = Parser::new(&registry);
    parser.parse(argv.iter().skip(1));

    let Some(request) = Args::from_parser(&parser) else {
        println!("{}", args::usage(program));
        std::process::exit(1);
    };

    let cfg = ScaffoldConfig::from_env();
    log::debug!("templates root: {}", cfg.templates_root.display());

    let plan = match ProjectPlan::resolve(&request, &cfg) {
        Ok(p) => p,
        Err(e) => {
            println!("{e}");
            std::process::exit(e.exit_code());
        }
    };

    println!("Project name....: {}", plan.name);
    println!("Project language: {} ({})", plan.language, plan.standard);
    println!("Project template: {}\n", plan.template.display());

    if let Err(e) = scaffold::create_project(&plan, &cfg) {
        eprintln!("cppman: {e}");
        std::process::exit(e.exit_code());
    }

    println!("Project {} created successfully!", plan.name);
}

fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    // No timestamps, so output is stable across runs.
    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(buf, "[{}] {}", record.level(), record.args())
    });

    let _ = builder.try_init();
}
