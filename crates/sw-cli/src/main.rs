use std::fs;

use clap::{Args, Parser, Subcommand};
use sw_core::{EvalOutcome, WardenError};
use sw_runtime::{process_teardown, VmConfig, WardenVm};

#[derive(Debug, Parser)]
#[command(name = "sw-cli")]
#[command(about = "Bounded script sandbox CLI")]
struct Cli {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    #[arg(long = "file")]
    file: String,
    #[arg(long = "label")]
    label: Option<String>,
    #[arg(long = "discard-value")]
    discard_value: bool,
    #[arg(long = "stack-bytes", default_value_t = VmConfig::DEFAULT_THREAD_STACK_BYTES)]
    stack_bytes: usize,
    #[arg(long = "heap-bytes", default_value_t = VmConfig::DEFAULT_HEAP_BUDGET_BYTES)]
    heap_bytes: usize,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("{}", error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<(), WardenError> {
    match cli.command {
        Mode::Run(args) => run_script(args),
    }
}

fn run_script(args: RunArgs) -> Result<(), WardenError> {
    let source = fs::read_to_string(&args.file).map_err(|error| {
        WardenError::new(
            "CLI_READ",
            format!("cannot read \"{}\": {}", args.file, error),
        )
    })?;

    let config = VmConfig::new(args.stack_bytes, args.heap_bytes)?;
    let vm = WardenVm::initialize(config)?;
    let label = args.label.unwrap_or_else(|| args.file.clone());
    let outcome = vm.eval(&label, Some(&source), !args.discard_value);
    vm.stop();
    process_teardown();

    match outcome? {
        EvalOutcome::Value(text) | EvalOutcome::Fault(text) => println!("{}", text),
        EvalOutcome::NoResult => {}
    }
    Ok(())
}
