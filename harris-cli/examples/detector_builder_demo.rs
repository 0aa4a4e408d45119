use harris_cli::{draw, io};
use harris_core::Image;
use harris_detect::DetectorBuilder;
use std::time::Instant;

/// Checkerboard of `square`-pixel cells, dark and light
fn checkerboard(width: usize, height: usize, square: usize) -> Image {
    Image::from_fn(width, height, 1, |x, y, _| {
        if (x / square + y / square) % 2 == 0 { 0.1 } else { 0.9 }
    })
    .expect("non-empty image")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🎯 Harris DetectorBuilder API Demo");
    println!("==================================\n");

    let img = checkerboard(160, 128, 16);
    println!("📷 Synthetic checkerboard: {}x{}", img.width(), img.height());

    let demos = vec![
        ("sensitive", DetectorBuilder::new().preset_sensitive()),
        ("balanced", DetectorBuilder::new().preset_balanced()),
        ("strict", DetectorBuilder::new().preset_strict()),
        (
            "custom",
            DetectorBuilder::new().sigma(1.5).threshold(20.0).window(5).threads(4),
        ),
    ];

    for (name, builder) in demos {
        println!("\n⚙️  {}", name);
        println!("   Config: {}", builder.summary());
        let detector = builder.build()?;

        let start = Instant::now();
        let points = detector.detect(&img)?;
        println!("   ⏱️  Time: {:.2?}", start.elapsed());
        println!("   🎯 Detected {} corners", points.len());

        let mut canvas = io::to_rgb8(&img);
        draw::mark_corners(&mut canvas, &points, draw::CORNER_COLOR);
        let path = format!("checkerboard_corners_{}.png", name);
        canvas.save(&path)?;
        println!("   💾 Saved: {}", path);
    }

    Ok(())
}
