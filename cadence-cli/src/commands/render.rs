//! Print a single render frame.

use anyhow::Result;
use cadence_core::RenderFrame;
use cadence_types::Phase;

/// Run the render command.
pub fn run(phase: Phase, progress: f64, text: Option<&str>) -> Result<()> {
    let frame = RenderFrame::new(phase, progress, text);
    println!("{}", serde_json::to_string(&frame)?);
    Ok(())
}
