//! Shared test utilities and fixture generators
#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Handedness code for raw row `i`: two left-handed shooters for every right-handed one
pub fn hand_for(i: usize) -> &'static str {
    if i % 3 == 0 {
        "R"
    } else {
        "L"
    }
}

/// Create a raw roster table with all 18 expected columns and `rows` distinct players.
///
/// Heights cycle through 170..=199 cm and weights through 70..=109 kg, so
/// every row is inside the default bounds.
pub fn create_raw_roster(rows: usize) -> DataFrame {
    let idx: Vec<usize> = (0..rows).collect();
    let heights: Vec<i64> = idx.iter().map(|i| 170 + (*i as i64 % 30)).collect();
    let weights: Vec<i64> = idx.iter().map(|i| 70 + ((*i as i64 * 7) % 40)).collect();

    raw_roster_from(
        &heights.iter().map(|h| Some(*h)).collect::<Vec<_>>(),
        &weights.iter().map(|w| Some(*w)).collect::<Vec<_>>(),
        &idx.iter().map(|i| Some(hand_for(*i))).collect::<Vec<_>>(),
    )
}

/// Create a raw roster table from explicit height, weight and handedness values.
pub fn raw_roster_from(
    heights_cm: &[Option<i64>],
    weights_kg: &[Option<i64>],
    hands: &[Option<&str>],
) -> DataFrame {
    let rows = heights_cm.len();
    assert_eq!(rows, weights_kg.len());
    assert_eq!(rows, hands.len());

    let idx: Vec<i64> = (0..rows as i64).collect();
    let player_ids: Vec<i64> = idx.iter().map(|i| 8_470_000 + i).collect();
    let first_names: Vec<String> = idx.iter().map(|i| format!("Player{}", i)).collect();
    let headshots: Vec<String> = idx
        .iter()
        .map(|i| format!("https://assets.nhle.com/mugs/{}.png", 8_470_000 + i))
        .collect();
    let inches: Vec<Option<i64>> = heights_cm
        .iter()
        .map(|h| h.map(|cm| (cm as f64 / 2.54).round() as i64))
        .collect();
    let pounds: Vec<Option<i64>> = weights_kg
        .iter()
        .map(|w| w.map(|kg| (kg as f64 * 2.2046).round() as i64))
        .collect();
    let provinces: Vec<Option<&str>> = idx
        .iter()
        .map(|i| if i % 4 == 0 { None } else { Some("ON") })
        .collect();

    df! {
        "team_code" => vec!["TOR"; rows],
        "season" => vec![20232024i64; rows],
        "position_type" => vec!["forwards"; rows],
        "player_id" => player_ids,
        "headshot" => headshots,
        "first_name" => first_names,
        "last_name" => vec!["Skater"; rows],
        "sweater_number" => idx.iter().map(|i| i % 99 + 1).collect::<Vec<i64>>(),
        "position_code" => vec!["C"; rows],
        "shoots_catches" => hands.to_vec(),
        "height_in_inches" => inches,
        "weight_in_pounds" => pounds,
        "height_in_centimeters" => heights_cm.to_vec(),
        "weight_in_kilograms" => weights_kg.to_vec(),
        "birth_date" => vec!["1995-03-14"; rows],
        "birth_city" => vec!["Toronto"; rows],
        "birth_country" => vec!["CAN"; rows],
        "birth_state_province" => provinces,
    }
    .unwrap()
}

/// Create a small labeled feature table for trainer tests
pub fn create_labeled_features() -> DataFrame {
    df! {
        "weight_in_kilograms" => [80.0f64, 92.0, 85.0, 77.0, 95.0, 88.0, 83.0, 90.0, 79.0, 86.0],
        "height_in_centimeters" => [183.0f64, 191.0, 186.0, 178.0, 193.0, 188.0, 181.0, 190.0, 180.0, 185.0],
        "shoots_left" => [true, false, true, true, false, true, false, true, true, false],
    }
    .unwrap()
}

/// Create a temporary directory with the given table written as CSV
pub fn create_temp_csv(df: &mut DataFrame, name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join(name);

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with the given table written as Parquet
pub fn create_temp_parquet(df: &mut DataFrame, name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join(name);

    let mut file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, parquet_path)
}
