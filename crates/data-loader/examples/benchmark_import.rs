use data_loader::{MovieIndex, DEFAULT_BATCH_SIZE};
use std::path::Path;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let export = Path::new("data/movie_ids.json");

    println!("Importing TMDb export into an in-memory index...\n");

    let index = MovieIndex::open_in_memory()?;
    let start = Instant::now();
    let report = index.import_from_file(export, DEFAULT_BATCH_SIZE)?;
    let elapsed = start.elapsed();

    println!("\n=== Import Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Lines read: {}", report.lines_read);
    println!("Imported: {}", report.imported);
    println!("Skipped: {}", report.skipped);
    println!("\nPerformance: {:.0} movies/second",
             report.imported as f64 / elapsed.as_secs_f64());
    Ok(())
}
