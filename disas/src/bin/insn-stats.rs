//! Print the mnemonic frequencies of a listing written by `armdis`.

use std::{error::Error, fs};

use armdis::Statistics;
use bpaf::*;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let path = positional::<String>("LISTING")
        .help("Listing to analyze")
        .to_options()
        .version(env!("CARGO_PKG_VERSION"))
        .descr("Count the frequency of instructions in a listing")
        .run();

    let text = fs::read_to_string(&path)?;
    let stats = Statistics::from_listing(&text);
    log::debug!("{path}: {} instructions", stats.total());
    print!("{stats}");

    Ok(())
}
