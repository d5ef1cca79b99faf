use std::collections::BTreeMap;

use crate::color::{self, LabColor, colorimeter};
use crate::conflicts::{ConflictDetector, ConflictPair, conflict_map};
use crate::tinter::TargetColor;
use crate::{CheckArgs, ConflictsArgs, Result, catalog};

pub(crate) fn convert(target: TargetColor) -> Result<()> {
    let lab = target.to_lab();
    let rgb = color::lab_to_rgb(lab);
    println!("hex:    {}", color::rgb_to_hex(rgb));
    println!("rgb:    {rgb}");
    println!("lab:    {lab}");
    println!("hsl:    {}", color::rgb_to_hsl(rgb));
    println!("hue:    {:.2}°", color::hue_angle(lab));
    println!("chroma: {:.2}", color::chroma(lab));
    if !lab.is_in_range() {
        println!("note:   outside the LAB range, RGB values are clamped");
    }
    Ok(())
}

pub(crate) fn delta_e(first: TargetColor, second: TargetColor) -> Result<()> {
    let delta_e = color::delta_e_2000(first.to_lab(), second.to_lab());
    println!("{delta_e:.4}");
    Ok(())
}

pub(crate) fn conflicts(args: &ConflictsArgs, verbose: bool) -> Result<()> {
    let colors = catalog::read_catalog(&args.catalog)?;
    let usable = colors.iter().filter(|color| color.resolve_lab().is_some()).count();
    if verbose {
        println!(
            "{}: {} colors, {} usable, threshold {}",
            args.catalog.display(),
            colors.len(),
            usable,
            args.threshold
        );
    }

    let detector = ConflictDetector::new(args.threshold).with_lightness_pruning(args.prune);
    let pairs = detector.find_all_conflicts(&colors);
    if verbose {
        println!("{}: found {} conflicting pairs", args.catalog.display(), pairs.len());
    }

    if args.map {
        let map: BTreeMap<_, _> = conflict_map(&pairs).into_iter().collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&pairs)?);
    } else {
        for pair in &pairs {
            println!("{}", describe_pair(pair));
        }
    }
    Ok(())
}

pub(crate) fn check(args: &CheckArgs, verbose: bool) -> Result<()> {
    let mut candidate = args.color.to_lab();
    if args.compensate {
        candidate = colorimeter::compensate(candidate);
        if verbose {
            println!("compensated reading: {candidate}");
        }
    }
    let colors = catalog::read_catalog(&args.catalog)?;
    if verbose {
        println!("{}: {} colors", args.catalog.display(), colors.len());
    }

    match ConflictDetector::new(args.threshold).find_conflict(candidate, &colors) {
        Some(conflict) => println!(
            "conflict: {} {} ({}) ΔE {:.2}",
            conflict.id, conflict.name, conflict.hex, conflict.delta_e
        ),
        None => println!("no conflict below ΔE {}", args.threshold),
    }
    Ok(())
}

pub(crate) fn packet(bytes: &[u8]) -> Result<()> {
    let capture = colorimeter::capture(bytes)?;
    println!("raw:         {}", capture.raw);
    println!("compensated: {}", capture.lab);
    println!("hex:         {}", capture.hex);
    Ok(())
}

fn describe_pair(pair: &ConflictPair) -> String {
    format!(
        "ΔE {:>5.2}  {} {}{}  <->  {} {}{}",
        pair.delta_e,
        pair.first.id,
        pair.first.name,
        hex_suffix(&pair.first.hex, pair.first.lab),
        pair.second.id,
        pair.second.name,
        hex_suffix(&pair.second.hex, pair.second.lab),
    )
}

fn hex_suffix(hex: &str, lab: LabColor) -> String {
    if hex.is_empty() {
        format!(" [{lab}]")
    } else {
        format!(" ({hex})")
    }
}
