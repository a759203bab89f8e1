//--------------------------------------------------------------------
// main.rs
//--------------------------------------------------------------------
// Provides the main function
//--------------------------------------------------------------------

#[macro_use] extern crate log;
extern crate path_svg_loader;
extern crate path_triangulator;

use std::error::Error;
use std::io::prelude::*;
use std::io;
use path_triangulator::*;

const STROKE_WIDTH: Coord = 1.0;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().init();

    // The file can be given on the command line, otherwise it is asked for
    let file = match std::env::args().nth(1) {
        Some(file) => file,
        None => {
            print!("Enter address of the path definition file: ");
            io::stdout().flush()?;

            let mut file = String::new();
            io::stdin().read_line(&mut file)?;
            file.trim().to_owned()
        }
    };

    let data = std::fs::read_to_string(&file)?;
    let path = path_svg_loader::path_from_string(&data)?;
    info!("Loaded {} path commands from {}", path.len(), file);

    let then = std::time::Instant::now();

    let mut processor = LoopBlinnProcessor::new(ProcessorOptions::default());
    processor.proceed(&path)?;

    let mut batches = BatchProcessor::new();
    batches.add_decomposition(&processor, 0);
    for polyline in flatten_path(&path) {
        batches.add_stroke(&polyline, STROKE_WIDTH, 1);
    }
    batches.finish_batching();

    let now = std::time::Instant::now();

    info!("{} polygons, {} triangles, {} stroke lines",
        processor.polygons().len(), processor.triangle_count(), batches.lines().len());
    for &kind in BatchType::ALL.iter() {
        let count = batches.batch_count(kind);
        if count > 0 { info!("{}: {} batches", kind, count); }
    }
    info!("Total processing time: {:?}", now.duration_since(then));
    Ok(())
}
