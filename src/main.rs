//! Information entry point for the archery engine

fn main() {
    println!("Archery Engine v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Arrow performance estimation and spine compatibility engine for bow tuning.");
    println!("The library is designed to be used from Rust or through the archery-cli tool.");
    println!();
    println!("To use as a Rust library:");
    println!("  Add to Cargo.toml: archery-engine = \"0.1\"");
    println!();
    println!("To use from the command line:");
    println!("  archery-cli spine --draw-weight 60 --bow-type compound");
    println!("  archery-cli performance --draw-weight 70 --gpi 9.5 --point-weight 100");
    println!("  archery-cli info");
}
