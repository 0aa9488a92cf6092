use memo_icons::config::GeneratorConfig;
use memo_icons::generator::{generate_all, summary};
use memo_icons::logger::{self, log_error};

fn main() {
    logger::init();
    let cfg = GeneratorConfig::default();

    log::info!("generating PWA icons into {}", cfg.output_root.display());
    match generate_all(&cfg) {
        Ok(generated) => {
            println!("{}", summary(&generated, &cfg));
        }
        Err(e) => {
            log_error("icon generation failed", &e);
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
