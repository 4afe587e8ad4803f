use clap::Parser;
use vhull_preprocess::prelude::*;

fn main() {
    let args = Cli::parse();
    println!("{args:?}");

    let (renderer, context) = BatchContext::from_cli(args);

    if let Err(error) = preprocess(&renderer, &context) {
        eprintln!("Preprocessing failed: {error}");
        std::process::exit(1);
    }
}
