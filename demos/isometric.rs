//! Extrude an SVG drawing and print the result.
//!
//! `cargo run --example isometric -- drawing.svg [--debug] [--steps]`
//!
//! Set `RUST_LOG=isoextrude=debug` (with `--features tracing`) to follow the
//! stages.

use isoextrude::{Options, transform};

const SAMPLE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 120 120">
  <rect x="10" y="10" width="40" height="30" fill="steelblue" data-height="25"/>
  <circle cx="80" cy="40" r="15" fill="tomato" data-elevation="10"/>
  <g data-height="8" fill="seagreen">
    <polygon points="20,70 60,70 60,100 40,110 20,100"/>
  </g>
</svg>"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let debug = args.iter().any(|a| a == "--debug");
    let steps = args.iter().any(|a| a == "--steps");
    let input = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(|path| std::fs::read_to_string(path).expect("Failed to read file"))
        .unwrap_or_else(|| SAMPLE.to_string());

    let options = Options::default().with_debug(debug);
    match transform(&input, &options) {
        Ok(result) => {
            if steps {
                for step in &result.steps {
                    println!("<!-- {} -->\n{}", step.name, step.svg);
                }
            } else if let Some(svg) = result.svg_debug.filter(|_| debug) {
                println!("{svg}");
            } else {
                println!("{}", result.svg);
            }
        }
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
