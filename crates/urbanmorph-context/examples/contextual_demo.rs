//! Contextual statistics over a toy block of nine tessellation cells
//!
//! Run with `cargo run --example contextual_demo` (add
//! `RUST_LOG=urbanmorph_context=debug` to watch the classifier decide).

use urbanmorph_context::contextual_characteristics;
use urbanmorph_core::execution::serial;
use urbanmorph_core::{AttributeTable, Characteristic, Result};
use urbanmorph_graph::ContiguityGraph;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // a 3x3 block of tessellation cells with two characteristics
    let mut builder = AttributeTable::builder(vec![
        Characteristic::new("cell_area"),
        Characteristic::with_floor("meshedness", 0.0),
    ]);
    let cells: [(u64, f64, f64); 9] = [
        (1, 210.0, 0.12),
        (2, 180.0, 0.15),
        (3, 950.0, 0.02),
        (4, 240.0, 0.18),
        (5, 205.0, 0.22),
        (6, 860.0, 0.04),
        (7, 220.0, 0.16),
        (8, 195.0, 0.19),
        (9, 1100.0, -0.01), // spurious negative, floored at ingestion
    ];
    for (id, area, meshedness) in cells {
        builder.push_row(id, &[area, meshedness])?;
    }
    let table = builder.build();

    // rook contiguity of the 3x3 grid, raised to second order
    let mut edges = Vec::new();
    for r in 0..3u64 {
        for c in 0..3u64 {
            let id = r * 3 + c + 1;
            if c < 2 {
                edges.push((id, id + 1));
            }
            if r < 2 {
                edges.push((id, id + 3));
            }
        }
    }
    let graph = ContiguityGraph::from_edges(1..=9, edges)?.higher_order(2)?;

    let result = contextual_characteristics(&table, &graph, &serial())?;

    println!("{result}");
    println!();
    result.write_csv(std::io::stdout())?;
    Ok(())
}
