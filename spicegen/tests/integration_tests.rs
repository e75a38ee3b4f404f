//! Integration tests for SpiceGen: build, write, load back

use chrono::NaiveDate;
use spicegen::prelude::*;
use spicegen::{Destination, NetlistWriter};

fn fixed_options(mode: WriteMode) -> WriteOptions {
    WriteOptions {
        timestamp: NaiveDate::from_ymd_opt(2024, 1, 31).and_then(|d| d.and_hms_opt(23, 59, 0)),
        mode,
        ..WriteOptions::default()
    }
}

/// Two-stage amplifier: a filter with a nested RC cell, plus an opamp.
fn build_amplifier(with_comments: bool) -> Netlist {
    let mut rc = SubCircuit::new("RC", ["a", "b"], "RC");
    rc.create_rlc_instance("R", ["a", "b"], 1000.0).unwrap();
    rc.create_rlc_instance("C", ["b", "0"], 4.7e-9).unwrap();

    let mut filter = SubCircuit::new("FILTER", ["in", "out"], "FLT");
    if with_comments {
        filter = filter.with_comment("RC ladder");
    }
    filter.add_subcircuit(rc).unwrap();
    filter.create_subcircuit_instance("RC", ["in", "mid"]).unwrap();
    filter.create_subcircuit_instance("RC", ["mid", "out"]).unwrap();
    filter.create_rlc_instance("L", ["out", "0"], 1e-6).unwrap();

    let mut opamp = SubCircuit::new("OPAMP", ["inp", "inn", "out"], "AMP");
    opamp.create_rlc_instance("R", ["inp", "inn"], 1e6).unwrap();
    opamp.create_rlc_instance("R", ["out", "0"], 75.0).unwrap();

    let mut netlist = Netlist::new();
    netlist.add_subcircuit(filter).unwrap();
    netlist.add_subcircuit(opamp).unwrap();
    netlist
        .create_subcircuit_instance("FILTER", ["vin", "f1"])
        .unwrap();
    netlist
        .create_subcircuit_instance("OPAMP", ["f1", "fb", "vout"])
        .unwrap();
    netlist
        .create_subcircuit_instance("OPAMP", ["vout", "fb2", "vout2"])
        .unwrap();
    netlist.create_rlc_instance("R", ["vout", "fb"], 10e3).unwrap();
    netlist
}

fn assert_same_structure(a: &SubCircuit, b: &SubCircuit) {
    assert_eq!(a.name(), b.name());
    assert_eq!(a.external_nodes(), b.external_nodes());
    assert_eq!(a.netlist().device_lines(), b.netlist().device_lines());
    assert_eq!(a.subcircuits().len(), b.subcircuits().len());
    for (x, y) in a.subcircuits().iter().zip(b.subcircuits()) {
        assert_same_structure(x, y);
    }
}

#[test]
fn test_netlist_roundtrip_is_byte_identical() {
    let netlist = build_amplifier(false);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("amp.cir");
    let options = fixed_options(WriteMode::ThreePass);

    SpiceGenCore::write_netlist(&path, &netlist, &options).unwrap();
    let (loaded, report) =
        SpiceGenCore::load_netlist(&path, ParseOptions::default()).expect("Should load back");

    assert!(report.is_clean(), "Unexpected lines: {:?}", report.unrecognized);
    assert_eq!(loaded, netlist);
    assert_eq!(
        NetlistWriter::new(&loaded, &options).render().unwrap(),
        std::fs::read_to_string(&path).unwrap()
    );
}

#[test]
fn test_roundtrip_ignores_comments() {
    let netlist = build_amplifier(true);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("amp.cir");

    SpiceGenCore::write_netlist(&path, &netlist, &fixed_options(WriteMode::Buffered)).unwrap();
    let (loaded, _) = SpiceGenCore::load_netlist(&path, ParseOptions::default()).unwrap();

    assert_eq!(loaded.subcircuit_names(), netlist.subcircuit_names());
    for (a, b) in netlist.subcircuits().iter().zip(loaded.subcircuits()) {
        assert_same_structure(a, b);
    }
    assert_eq!(loaded.device_lines(), netlist.device_lines());
    assert_eq!(loaded.subcircuit("FILTER").unwrap().comment(), None);
}

#[test]
fn test_subcircuit_roundtrip_through_file() {
    let netlist = build_amplifier(false);
    let filter = netlist.subcircuit("FILTER").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filter.cir");
    let mut dest = Destination::new(std::fs::File::create(&path).unwrap());
    spicegen::writer::write_subcircuit(filter, &mut dest).unwrap();
    dest.close().unwrap();

    let loaded = spicegen::load_subcircuit(&path).unwrap();
    assert_same_structure(filter, &loaded);
    assert_eq!(loaded.source_path(), Some(path.as_path()));
}

#[test]
fn test_load_first_subcircuit_of_netlist_file() {
    let netlist = build_amplifier(false);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("amp.cir");
    spicegen::write_netlist(&path, &netlist).unwrap();

    let loaded = spicegen::load_subcircuit(&path).unwrap();
    assert_same_structure(netlist.subcircuit("FILTER").unwrap(), &loaded);
}

#[test]
fn test_loaded_subcircuit_is_annotated_when_nested() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("rc.cir");
    std::fs::write(
        &source,
        ".SUBCIRCUIT RC a b\nR1 a b 1.000000e+03\n.ENDS RC\n",
    )
    .unwrap();

    let rc = spicegen::load_subcircuit(&source).unwrap();
    let mut stage = SubCircuit::new("STAGE", ["x", "y"], "ST");
    stage.add_subcircuit(rc).unwrap();
    stage.create_subcircuit_instance("RC", ["x", "y"]).unwrap();

    let mut netlist = Netlist::new();
    netlist.add_subcircuit(stage).unwrap();

    let options = fixed_options(WriteMode::Buffered);
    let text = NetlistWriter::new(&netlist, &options).render().unwrap();
    assert!(text.contains(&format!(
        "*** Inner subcircuit\n*** subcircuit loaded from : {}\n.SUBCIRCUIT RC a b\n",
        source.display()
    )));
}

#[test]
fn test_write_to_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing_dir").join("out.cir");

    let result = SpiceGenCore::write_netlist(
        &path,
        &build_amplifier(false),
        &fixed_options(WriteMode::ThreePass),
    );
    assert!(matches!(result, Err(SpiceGenError::Io(_))));
    assert!(!path.exists());
}

#[test]
fn test_reformat() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.cir");
    let output = dir.path().join("out.cir");
    std::fs::write(
        &input,
        "* hand written\n.SUBCKT DIV top mid\nR7 top mid 1e3\nR9 mid 0 1e3\n.ENDS\nX_D_00001 vcc out DIV\n",
    )
    .unwrap();

    let options = fixed_options(WriteMode::ThreePass);
    let report =
        SpiceGenCore::reformat(&input, &output, ParseOptions::default(), &options).unwrap();
    assert!(report.is_clean());

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains(
        "*** subcircuits\n\
         .SUBCIRCUIT DIV top mid\n\
         R1 top mid 1.000000e+03\n\
         R2 mid 0 1.000000e+03\n\
         .ENDS DIV\n\
         *** Instances\n\
         X_D_00001 vcc out DIV\n"
    ));
}

#[test]
fn test_multiline_comment_roundtrip() {
    let mut note = SubCircuit::new("A", ["x"], "A").with_comment("note\nR9 x 0 1");
    note.create_rlc_instance("C", ["x", "0"], 1e-9).unwrap();

    let mut netlist = Netlist::new();
    netlist.add_subcircuit(note).unwrap();
    netlist.create_subcircuit_instance("A", ["n1"]).unwrap();

    let options = fixed_options(WriteMode::Buffered);
    let text = NetlistWriter::new(&netlist, &options).render().unwrap();
    assert!(text.contains("*** note\n*** R9 x 0 1\n.SUBCIRCUIT A x\n"));

    let mut parser = SpiceParser::new(ParseOptions::default());
    let loaded = parser
        .parse_netlist(text.as_bytes(), std::path::Path::new("memory.cir"))
        .unwrap();
    assert!(parser.report().is_clean());
    assert_eq!(loaded.device_lines(), vec!["X_A_00001 n1 A"]);
    assert_same_structure(netlist.subcircuit("A").unwrap(), loaded.subcircuit("A").unwrap());
}
