//! List output size presets.

use logomark_layout_model::placement::AnchorPreset;
use logomark_layout_model::size::OutputSize;

pub fn run() -> anyhow::Result<()> {
    println!("Output sizes");
    println!("{}", "=".repeat(40));
    for (key, size) in OutputSize::preset_keys().zip(OutputSize::presets()) {
        match size.target() {
            Some((w, h)) => println!("  {key:<12} {w:>5} x {h:<5} {}", size.label),
            None => println!("  {key:<12} {:>13} {}", "source", size.label),
        }
    }
    println!("  {:<12} {:>13} Any other size, e.g. 800x600", "WxH", "custom");

    println!();
    println!("Anchors");
    println!("{}", "=".repeat(40));
    for preset in AnchorPreset::ALL {
        println!("  {preset}");
    }

    Ok(())
}
