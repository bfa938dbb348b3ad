// Example runner for the `gesture_vision` library: stages a synthetic camera
// scene, seeds the palette from it, and isolates a follow-up frame.

use gesture_vision::core_modules::frame::Frame;
use gesture_vision::core_modules::pixel::pixel::Pixel;
use gesture_vision::core_modules::utils::frame_export;
use gesture_vision::frame_pipeline::FramePipeline;
use gesture_vision::pipeline::PixelFormat;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const SKIN: Pixel = Pixel {
    red: 224,
    green: 172,
    blue: 105,
    alpha: 255,
};
const BACKDROP: Pixel = Pixel {
    red: 40,
    green: 44,
    blue: 52,
    alpha: 255,
};

/// A frame with a hand-sized skin patch centered at (cx, cy) over a flat
/// backdrop.
fn staged_frame(cx: u32, cy: u32) -> Frame {
    let mut frame = Frame::new(WIDTH, HEIGHT, PixelFormat::Rgb24);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            frame.set_pixel(x, y, BACKDROP);
        }
    }
    for y in cy.saturating_sub(90)..(cy + 90).min(HEIGHT) {
        for x in cx.saturating_sub(70)..(cx + 70).min(WIDTH) {
            frame.set_pixel(x, y, SKIN);
        }
    }
    frame
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let pipeline = FramePipeline::new();
    let mut completed = pipeline.subscribe_completed();

    // The user holds their hand over the frame center for calibration.
    let (_, result) = pipeline.initialize(staged_frame(WIDTH / 2, HEIGHT / 2)).await?;
    result?;

    // The hand moves; everything that is not hand goes black.
    let (isolated, result) = pipeline.isolate(staged_frame(200, 150)).await?;
    result?;

    // Both the calibration pass and the follow-up committed.
    for _ in 0..2 {
        if let Some(event) = completed.recv().await {
            log::info!("downstream notified for frame {}", event.frame_id);
        }
    }

    let output = std::env::temp_dir().join("isolated_hand.png");
    frame_export::save(&output, &isolated)?;
    println!("Isolated frame written to {}", output.display());

    pipeline.shutdown().await;
    Ok(())
}
