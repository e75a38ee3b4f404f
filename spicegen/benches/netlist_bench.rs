use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spicegen::prelude::*;
use spicegen::NetlistWriter;
use std::path::Path;

fn ladder(stages: usize) -> Netlist {
    let mut cell = SubCircuit::new("RC", ["a", "b"], "RC");
    cell.create_rlc_instance("R", ["a", "b"], 1e3).unwrap();
    cell.create_rlc_instance("C", ["b", "0"], 1e-9).unwrap();

    let mut netlist = Netlist::new();
    netlist.add_subcircuit(cell).unwrap();
    for i in 0..stages {
        let from = format!("n{}", i);
        let to = format!("n{}", i + 1);
        netlist.create_subcircuit_instance("RC", [from, to]).unwrap();
    }
    netlist
}

fn bench_build_and_render(c: &mut Criterion) {
    let options = WriteOptions::default();

    c.bench_function("build_and_render_1000", |b| {
        b.iter(|| {
            let netlist = ladder(black_box(1000));
            NetlistWriter::new(&netlist, &options).render()
        });
    });
}

fn bench_parse_netlist(c: &mut Criterion) {
    let text = NetlistWriter::new(&ladder(1000), &WriteOptions::default())
        .render()
        .unwrap();

    c.bench_function("parse_netlist_1000", |b| {
        b.iter(|| {
            SpiceParser::new(ParseOptions::default())
                .parse_netlist(black_box(text.as_bytes()), Path::new("bench.cir"))
        });
    });
}

criterion_group!(benches, bench_build_and_render, bench_parse_netlist);
criterion_main!(benches);
