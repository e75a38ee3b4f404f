use spicegen::prelude::*;
use std::path::Path;

fn main() -> Result<(), SpiceGenError> {
    let mut opamp = SubCircuit::new("OPAMP", ["inp", "inn", "out"], "AMP")
        .with_comment("Ideal-ish opamp macro model");
    opamp.create_rlc_instance("R", ["inp", "inn"], 1e6)?;
    opamp.create_rlc_instance("R", ["out", "0"], 75.0)?;

    let mut netlist = Netlist::new();
    netlist.add_subcircuit(opamp)?;
    netlist.create_subcircuit_instance("OPAMP", ["vin", "fb", "vout"])?;
    netlist.create_rlc_instance("R", ["vout", "fb"], 10e3)?;
    netlist.create_rlc_instance("R", ["fb", "0"], 1e3)?;

    let path = Path::new("amplifier.cir");
    SpiceGenCore::write_netlist(path, &netlist, &WriteOptions::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
