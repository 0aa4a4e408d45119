#[cfg(feature = "serde")]
use harris_detect::{DetectorConfig, HarrisDetector};
#[cfg(feature = "serde")]
use harris_core::Image;

#[cfg(feature = "serde")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔧 Harris Configuration Serialization Demo");
    println!("==========================================\n");

    let configs = [
        DetectorConfig::sensitive_preset().with_metadata("Texture", "Dense corners on weak texture"),
        DetectorConfig::balanced_preset(),
        DetectorConfig::strict_preset().with_metadata("Outdoor", "Noisy panorama frames"),
    ];

    println!("📄 JSON / TOML round trip");
    for (i, cfg) in configs.iter().enumerate() {
        let json_path = format!("harris_config_{}.json", i);
        let toml_path = format!("harris_config_{}.toml", i);
        cfg.save_json(&json_path)?;
        cfg.save_toml(&toml_path)?;

        let from_json = DetectorConfig::load_json(&json_path)?;
        let from_toml = DetectorConfig::load_toml(&toml_path)?;
        assert_eq!(&from_json, cfg);
        assert_eq!(&from_toml, cfg);
        println!("   ✅ {}", from_json.summary());
    }

    println!("\n🎯 Detection with loaded configurations");
    let img = Image::from_fn(64, 64, 1, |x, y, _| if x >= 32 && y >= 32 { 1.0 } else { 0.0 })?;
    for i in 0..configs.len() {
        let cfg = DetectorConfig::load_toml(format!("harris_config_{}.toml", i))?;
        let name = cfg.name.clone().unwrap_or_default();
        let points = HarrisDetector::new(cfg)?.detect(&img)?;
        println!("   • {}: {} corners", name, points.len());
    }

    Ok(())
}

#[cfg(not(feature = "serde"))]
fn main() {
    println!("This demo requires the serde feature:");
    println!("cargo run --example config_serialization_demo --features serde");
}
