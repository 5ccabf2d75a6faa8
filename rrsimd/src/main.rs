//! # Round-Robin Simulator
//!
//! Main entry point for the simulator binary.

use rrsimd::{
    init_tracing, LogConfig, RunMode, RunSummary, SimRuntime, SimRuntimeConfig, SimRuntimeError,
    Workload,
};
use sim_scheduler::SchedulerConfig;
use std::env;
use std::fs;
use std::io;
use std::process;
use std::time::Duration;
use trace_renderer::{presenter_for, PresenterKind};

/// Everything the command line selects
#[derive(Debug)]
struct CliOptions {
    runtime: SimRuntimeConfig,
    logging: LogConfig,
    interactive: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let options = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    if let Err(e) = init_tracing(&options.logging) {
        eprintln!("Failed to initialise logging: {}", e);
        process::exit(1);
    }

    let presenter_kind = options.runtime.presenter;
    let summary = run(options).unwrap_or_else(|e| {
        eprintln!("Simulation error: {}", e);
        process::exit(1);
    });

    if let Err(e) = print_summary(&summary, presenter_kind) {
        eprintln!("Failed to write summary: {}", e);
        process::exit(1);
    }
}

fn run(options: CliOptions) -> Result<RunSummary, SimRuntimeError> {
    let presenter = presenter_for(options.runtime.presenter, io::stdout());

    let mut runtime = if options.interactive {
        let stdin = io::stdin();
        let workload = Workload::prompt(stdin.lock(), io::stdout())?;
        SimRuntime::with_workload(options.runtime, &workload, presenter)?
    } else {
        SimRuntime::new(options.runtime, presenter)?
    };

    runtime.run()
}

fn print_summary(summary: &RunSummary, kind: PresenterKind) -> io::Result<()> {
    match kind {
        PresenterKind::Json => {
            let line = serde_json::to_string(summary)?;
            println!("{}", line);
        }
        PresenterKind::Plain | PresenterKind::Styled => print!("{}", summary),
    }
    Ok(())
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut runtime = SimRuntimeConfig::default();
    let mut logging = LogConfig::default();
    let mut interactive = false;
    let mut quantum = runtime.scheduler.quantum_ticks;
    let mut capacity = runtime.scheduler.queue_capacity;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--quantum" | "-q" => {
                let value = next_value(args, &mut i, "--quantum")?;
                quantum = value
                    .parse()
                    .map_err(|_| format!("Invalid quantum value: {}", value))?;
            }
            "--capacity" | "-c" => {
                let value = next_value(args, &mut i, "--capacity")?;
                capacity = value
                    .parse()
                    .map_err(|_| format!("Invalid capacity value: {}", value))?;
            }
            "--mode" | "-m" => {
                runtime.mode = match next_value(args, &mut i, "--mode")? {
                    "live" => RunMode::Live,
                    "drain" => RunMode::Drain,
                    other => return Err(format!("Invalid mode: {}", other)),
                };
            }
            "--presenter" | "-p" => {
                runtime.presenter = next_value(args, &mut i, "--presenter")?
                    .parse()
                    .map_err(|e| format!("{}", e))?;
            }
            "--delay-ms" => {
                let value = next_value(args, &mut i, "--delay-ms")?;
                let millis: u64 = value
                    .parse()
                    .map_err(|_| format!("Invalid delay-ms value: {}", value))?;
                runtime.tick_delay = Duration::from_millis(millis);
            }
            "--max-ticks" => {
                let value = next_value(args, &mut i, "--max-ticks")?;
                runtime.max_ticks = value
                    .parse()
                    .map_err(|_| format!("Invalid max-ticks value: {}", value))?;
            }
            "--workload" | "-w" => {
                let path = next_value(args, &mut i, "--workload")?;
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read workload file: {}", e))?;
                runtime.workload = Some(text);
            }
            "--interactive" | "-i" => {
                interactive = true;
            }
            "--log-level" => {
                logging.level = Some(next_value(args, &mut i, "--log-level")?.to_string());
            }
            "--log-json" => {
                logging.json = true;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    if interactive && runtime.workload.is_some() {
        return Err("--interactive and --workload are mutually exclusive".to_string());
    }

    runtime.scheduler = SchedulerConfig::new(quantum, capacity).map_err(|e| e.to_string())?;

    Ok(CliOptions {
        runtime,
        logging,
        interactive,
    })
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing value for {}", flag))
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -q, --quantum <TICKS>     Time quantum in ticks (default 4)");
    eprintln!("  -c, --capacity <N>        Ready queue capacity (default 10)");
    eprintln!("  -m, --mode <MODE>         live (default) or drain");
    eprintln!("  -p, --presenter <KIND>    plain (default), styled or json");
    eprintln!("  --delay-ms <MS>           Pause between ticks in live mode (default 1000)");
    eprintln!("  --max-ticks <N>           Maximum ticks to run (default 100, 0 = unlimited)");
    eprintln!("  -w, --workload <FILE>     Workload file (`pid burst` per line)");
    eprintln!("  -i, --interactive         Prompt for the workload on stdin");
    eprintln!("  --log-level <FILTER>      Log filter, overrides RUST_LOG (default warn)");
    eprintln!("  --log-json                Emit logs as JSON lines on stderr");
    eprintln!("  -h, --help                Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --mode drain --presenter plain", program);
    eprintln!(
        "  {} --workload demos/mixed.rr --quantum 2 --delay-ms 200",
        program
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("rrsimd")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_defaults() {
        let options = parse_args(&args(&[])).unwrap();
        assert_eq!(options.runtime.mode, RunMode::Live);
        assert_eq!(options.runtime.max_ticks, 100);
        assert_eq!(options.runtime.scheduler, SchedulerConfig::default());
        assert!(!options.interactive);
        assert_eq!(options.logging, LogConfig::default());
    }

    #[test]
    fn test_all_flags() {
        let options = parse_args(&args(&[
            "--quantum",
            "2",
            "--capacity",
            "5",
            "--mode",
            "drain",
            "--presenter",
            "json",
            "--delay-ms",
            "50",
            "--max-ticks",
            "0",
            "--log-level",
            "debug",
            "--log-json",
        ]))
        .unwrap();

        assert_eq!(options.runtime.scheduler.quantum_ticks, 2);
        assert_eq!(options.runtime.scheduler.queue_capacity, 5);
        assert_eq!(options.runtime.mode, RunMode::Drain);
        assert_eq!(options.runtime.presenter, PresenterKind::Json);
        assert_eq!(options.runtime.tick_delay, Duration::from_millis(50));
        assert_eq!(options.runtime.max_ticks, 0);
        assert_eq!(options.logging.level.as_deref(), Some("debug"));
        assert!(options.logging.json);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_args(&args(&["--quantum", "0"])).is_err());
        assert!(parse_args(&args(&["--quantum", "-1"])).is_err());
        assert!(parse_args(&args(&["--mode", "batch"])).is_err());
        assert!(parse_args(&args(&["--presenter", "html"])).is_err());
        assert!(parse_args(&args(&["--max-ticks"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_missing_workload_file() {
        let result = parse_args(&args(&["--workload", "/nonexistent/workload.rr"]));
        assert!(result.unwrap_err().contains("Failed to read workload file"));
    }
}
