//! ink_wall — interactive entry point.

use std::path::PathBuf;

use ink_canvas::BlendMode;
use ink_wall::app::{run, AppConfig};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Ink Wall — Skeletal Joint Trail Installation          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Mode: pointer simulation  (hold the left mouse button to draw)");
    println!();

    let cfg = match parse_args(std::env::args().skip(1)) {
        Ok(cfg) => cfg,
        Err(msg) => {
            eprintln!("{}", msg);
            print_usage();
            std::process::exit(2);
        }
    };

    println!("  Scanning brushes in {} …", cfg.brush_dir.display());
    println!("  Opening visualizer window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<AppConfig, String> {
    let mut cfg = AppConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--erase" => cfg.mode = BlendMode::Erase,
            "--kaleidoscope" => cfg.kaleidoscope.enabled = true,
            "--brushes" => {
                let dir = args.next().ok_or("--brushes needs a directory")?;
                cfg.brush_dir = PathBuf::from(dir);
            }
            "--fade" => {
                let v = args.next().ok_or("--fade needs a value")?;
                cfg.fade = v
                    .parse::<f32>()
                    .map_err(|_| format!("bad fade value \"{}\"", v))?
                    .clamp(0.0, 1.0);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument \"{}\"", other)),
        }
    }

    Ok(cfg)
}

fn print_usage() {
    println!("Usage: ink_wall [options]");
    println!();
    println!("  --brushes <dir>   brush PNG directory (default assets/brushes)");
    println!("  --fade <0..1>     per-frame wash-out toward white (default 0.002)");
    println!("  --erase           start in erase blending mode");
    println!("  --kaleidoscope    start with the kaleidoscope enabled");
    println!("  -h, --help        this message");
}
