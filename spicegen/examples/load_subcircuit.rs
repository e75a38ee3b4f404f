use spicegen::prelude::*;
use std::path::PathBuf;

fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/filter.cir"));

    match SpiceGenCore::load_subcircuit(&path, ParseOptions::default()) {
        Ok((subcircuit, report)) => {
            println!("{}", subcircuit.start_line());
            for line in subcircuit.netlist().device_lines() {
                println!("  {}", line);
            }
            for nested in subcircuit.subcircuits() {
                println!("  (inner) {}", nested.start_line());
            }
            println!("{}", subcircuit.end_line());
            for issue in &report.unrecognized {
                eprintln!("warning: {}", issue);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
