//! Getting Started
//!
//! Finds the busiest blocks of a small set of Athens points of interest,
//! first by point count, then by keyword diversity with disjoint results.

use loci::prelude::*;
use std::error::Error;

fn main() -> std::result::Result<(), Box<dyn Error>> {
    env_logger::init();
    println!("=== Loci - Getting Started ===\n");

    let points = vec![
        Poi::new("1", 23.7275, 37.9838)
            .with_name("Syntagma Cafe")
            .with_keywords(["coffee", "wifi"]),
        Poi::new("2", 23.7281, 37.9842)
            .with_name("Ermou Books")
            .with_keywords(["books"]),
        Poi::new("3", 23.7269, 37.9835)
            .with_name("Plaka Taverna")
            .with_keywords(["food", "wine"]),
        Poi::new("4", 23.7263, 37.9761)
            .with_name("Acropolis Museum")
            .with_keywords(["museum", "art"]),
        Poi::new("5", 23.7257, 37.9757)
            .with_name("Makrygianni Bar")
            .with_keywords(["beer"]),
        Poi::new("6", 23.7402, 37.9796)
            .with_name("Kolonaki Gallery")
            .with_keywords(["art"]),
    ];
    println!("✓ Loaded {} points\n", points.len());

    // 1. Densest windows
    println!("1. Top areas by point count");
    println!("---------------------------");
    let output = BcaSearch::new(0.002, 3).run(&points)?;
    for area in &output.areas {
        println!("   {} score={} points={}", area.id, area.score, area.len());
    }
    println!(
        "   {} blocks popped over {} occupied cells\n",
        output.stats.blocks_popped, output.stats.occupied_cells
    );

    // 2. Diverse, non-overlapping windows
    println!("2. Disjoint areas by distinct keywords");
    println!("--------------------------------------");
    let config = SearchConfig::default()
        .with_eps(0.002)
        .with_k(3)
        .with_distinct(true)
        .with_score(ScoreKind::DistinctKeywords);
    config.validate()?;
    let areas = BcaSearch::from_config(&config).run(&points)?.areas;

    let relevance = discounted_relevance(&areas, config.decay_constant)?;
    for (area, rel) in areas.iter().zip(&relevance) {
        println!("   {} score={} relevance={:.3}", area.id, area.score, rel);
    }

    // 3. Output
    println!("\n3. Result lines");
    println!("---------------");
    let mut out = Vec::new();
    ResultWriter::default().write_to(&areas, &mut out)?;
    print!("{}", String::from_utf8(out)?);

    Ok(())
}
