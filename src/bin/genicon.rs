use std::path::PathBuf;

use memo_icons::generator::{IconSpec, OutputFormat, write_icon};
use memo_icons::icon::{add_border, render_procedural_icon};
use memo_icons::logger;

// Preview the procedural memo at one size (default 1024).
fn main() {
    logger::init();
    let size = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<u32>() {
            Ok(s) if s > 0 => s,
            _ => {
                eprintln!("usage: genicon [SIZE]");
                std::process::exit(2);
            }
        },
        None => 1024,
    };

    let mut img = render_procedural_icon(size);
    add_border(&mut img, size);
    let spec = IconSpec {
        size,
        path: PathBuf::from("assets").join(format!("icon_{size}.png")),
        format: OutputFormat::Png,
    };
    if let Err(e) = write_icon(&img, &spec) {
        logger::log_error("failed to save icon png", &e);
        std::process::exit(1);
    }
    println!("Wrote {}", spec.path.display());
}
