//! SpiceGen CLI - check, reformat and wrap SPICE netlists from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use spicegen::{
    discover_netlist_files, LoadReport, Netlist, ParseOptions, SpiceGenCore, SpiceGenError,
    WriteMode, WriteOptions,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "spicegen")]
#[command(about = "SPICE netlist builder, checker and formatter", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a netlist file, or every netlist in a directory, and summarize it
    Check {
        /// Path to a .cir/.sp file or a directory
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Fail on lines that are not R/L/C, X, directives or comments
        #[arg(long)]
        strict: bool,
    },

    /// Load a netlist and write it back in canonical form
    Format {
        /// Netlist to read
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Where to write the formatted netlist
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,

        /// Write in one buffered pass instead of header/subcircuits/instances passes
        #[arg(long)]
        single_pass: bool,

        /// Fail on unrecognized lines
        #[arg(long)]
        strict: bool,
    },

    /// Wrap a sub-circuit file into a netlist holding one instance of it
    Wrap {
        /// Sub-circuit file starting with its .SUBCIRCUIT line
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Nodes the instance connects to
        #[arg(long, num_args = 1.., required = true)]
        nodes: Vec<String>,

        /// Instance suffix (defaults to the sub-circuit name)
        #[arg(long)]
        suffix: Option<String>,

        /// Override the sub-circuit name from the header line
        #[arg(long)]
        name: Option<String>,

        /// Where to write the netlist
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts and CI
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Check {
            path,
            format,
            strict,
        } => handle_check(&path, format, strict),
        Commands::Format {
            file,
            output,
            single_pass,
            strict,
        } => handle_format(&file, &output, single_pass, strict),
        Commands::Wrap {
            file,
            nodes,
            suffix,
            name,
            output,
        } => handle_wrap(&file, nodes, suffix, name, &output),
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

struct CheckResult {
    file: PathBuf,
    netlist: Netlist,
    report: LoadReport,
}

fn handle_check(path: &Path, format: OutputFormat, strict: bool) -> i32 {
    let files = if path.is_dir() {
        match discover_netlist_files(path) {
            Ok(files) => files,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    } else {
        vec![path.to_path_buf()]
    };

    let options = ParseOptions {
        strict,
        ..ParseOptions::default()
    };

    let mut results = Vec::new();
    for file in files {
        match SpiceGenCore::load_netlist(&file, options.clone()) {
            Ok((netlist, report)) => results.push(CheckResult {
                file,
                netlist,
                report,
            }),
            Err(e) => {
                eprintln!("Error: {}: {}", file.display(), e);
                return 1;
            }
        }
    }

    match format {
        OutputFormat::Human => output_human(&results),
        OutputFormat::Json => output_json(&results),
    }
    0
}

fn output_human(results: &[CheckResult]) {
    for result in results {
        println!("\nFile: {}", result.file.display());
        println!("{}", "─".repeat(60));

        let netlist = &result.netlist;
        if netlist.is_empty() {
            println!("  Empty netlist");
        }

        if !netlist.subcircuits().is_empty() {
            println!("\n  SUBCIRCUITS:");
            for sub in netlist.subcircuits() {
                println!(
                    "    - {} ({} nodes, {} devices, {} inner)",
                    sub.name(),
                    sub.external_nodes().len(),
                    sub.devices().len(),
                    sub.subcircuits().len()
                );
            }
        }

        println!("\n  Instances:");
        for (label, count) in netlist.counter().iter() {
            if count > 0 {
                println!("    {:<10} {}", label, count);
            }
        }
        println!("    {:<10} {}", "Total", netlist.total_instance_count());

        if !result.report.unrecognized.is_empty() {
            println!("\n  UNRECOGNIZED:");
            for issue in &result.report.unrecognized {
                println!("    - line {}: {}", issue.line, issue.text);
            }
        }
    }
}

fn output_json(results: &[CheckResult]) {
    let output = serde_json::json!({
        "results": results.iter().map(|r| {
            serde_json::json!({
                "file": r.file.display().to_string(),
                "subcircuits": r.netlist.subcircuit_names(),
                "netlist": r.netlist,
                "unrecognized": r.report.unrecognized,
                "lines_read": r.report.lines_read,
            })
        }).collect::<Vec<_>>(),
        "summary": {
            "total_files": results.len(),
            "total_instances": results.iter().map(|r| r.netlist.total_instance_count()).sum::<u64>(),
            "unrecognized": results.iter().map(|r| r.report.unrecognized.len()).sum::<usize>(),
        }
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn write_options(single_pass: bool) -> WriteOptions {
    WriteOptions {
        mode: if single_pass {
            WriteMode::Buffered
        } else {
            WriteMode::ThreePass
        },
        ..WriteOptions::default()
    }
}

fn handle_format(file: &Path, output: &Path, single_pass: bool, strict: bool) -> i32 {
    let parse = ParseOptions {
        strict,
        ..ParseOptions::default()
    };

    match SpiceGenCore::reformat(file, output, parse, &write_options(single_pass)) {
        Ok(report) => {
            for issue in &report.unrecognized {
                eprintln!("Warning: {}", issue);
            }
            println!("Wrote {}", output.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_wrap(
    file: &Path,
    nodes: Vec<String>,
    suffix: Option<String>,
    name: Option<String>,
    output: &Path,
) -> i32 {
    match wrap(file, nodes, suffix, name, output) {
        Ok(line) => {
            println!("{}", line);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn wrap(
    file: &Path,
    nodes: Vec<String>,
    suffix: Option<String>,
    name: Option<String>,
    output: &Path,
) -> Result<String, SpiceGenError> {
    let options = ParseOptions {
        name,
        suffix,
        ..ParseOptions::default()
    };
    let (subcircuit, report) = SpiceGenCore::load_subcircuit(file, options)?;
    for issue in &report.unrecognized {
        eprintln!("Warning: {}", issue);
    }

    let subcircuit = if subcircuit.suffix().is_empty() {
        let name = subcircuit.name().to_string();
        subcircuit.with_suffix(name)
    } else {
        subcircuit
    };
    let name = subcircuit.name().to_string();

    let mut netlist = Netlist::new();
    netlist.add_subcircuit(subcircuit)?;
    let line = netlist.create_subcircuit_instance(&name, nodes)?.to_string();

    SpiceGenCore::write_netlist(output, &netlist, &WriteOptions::default())?;
    Ok(line)
}
