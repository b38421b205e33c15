use std::env;

use pricetag::{Extractor, Settings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let url = args.get(1).ok_or("Please provide a product URL as an argument")?;

    let settings = Settings::load()?;
    let extractor = Extractor::from_settings(&settings)?;

    let product = extractor.extract(url);
    println!("{}", serde_json::to_string_pretty(&product)?);

    Ok(())
}
