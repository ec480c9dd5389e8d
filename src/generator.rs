//! Synthetic request-data generator for exercising the allocator without a
//! real form export.

use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;

const CLASS_GROUPS: [&str; 8] = ["P4A", "P4B", "P5A", "P5B", "P6A", "P6B", "P7A", "P7B"];

const CLUB_CATALOGUE: [&str; 14] = [
    "Football (Monday) - Teacher A",
    "Netball (Tuesday) - Teacher B",
    "Hockey (Monday) - Teacher C",
    "Hockey (Tuesday) - Teacher D",
    "Fitness Club (Monday) - Teacher E",
    "Spanish (Friday) - Teacher F",
    "French (Tuesday) - Teacher G",
    "Art and Craft (Monday) - Teacher H",
    "ICT Club (Tuesday) - Teacher I",
    "Art and Craft (Friday) - Teacher J",
    "Needlecraft (Monday) - Teacher K",
    "iMovie Club (Friday) - Teacher L",
    "Art and Craft (Friday) - Teacher M",
    "Scripture Union (Tuesday) - Teacher N",
];

const TERMS: usize = 3;
const CHOICES_PER_TERM: usize = 3;

/// Writes `count` synthetic rows in the shape the intake reader consumes:
/// header, then timestamped responses spaced one minute apart with random
/// class groups and club picks. A fixed `seed` reproduces the same file.
pub fn write_rows<W: Write>(
    writer: W,
    count: usize,
    seed: Option<u64>,
    base: NaiveDateTime,
) -> Result<(), csv::Error> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut header = vec!["Timestamp", "Full Name", "Class"];
    for _ in 0..TERMS {
        header.extend(["First Choice", "Second Choice", "Third Choice"]);
    }
    csv_writer.write_record(&header)?;

    for index in 0..count {
        let submitted = base + Duration::minutes(index as i64);
        let mut row = vec![
            format!("{} CET", submitted.format("%Y/%m/%d %I:%M:%S %p")),
            format!("Person {index}"),
            CLASS_GROUPS[rng.gen_range(0..CLASS_GROUPS.len())].to_string(),
        ];
        for _ in 0..TERMS * CHOICES_PER_TERM {
            row.push(CLUB_CATALOGUE[rng.gen_range(0..CLUB_CATALOGUE.len())].to_string());
        }
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
