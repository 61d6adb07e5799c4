use weight_scale::logging::{init_logging, LoggingConfig};
use weight_scale::{Color, ScaleStyle, WeightPicker, WeightRange, WindowOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig {
        env_filter: Some("weight_scale=debug,custom_style=info".to_string()),
        ..LoggingConfig::default()
    });

    // A tighter ring in dark colors, using the bon-generated builder
    let style = ScaleStyle::builder()
        .radius(320.0)
        .scale_width(120.0)
        .ring_color(Color::new(0x20, 0x24, 0x2c))
        .background_color(Color::new(0x10, 0x12, 0x16))
        .normal_line_color(Color::new(0x60, 0x66, 0x70))
        .five_step_line_color(Color::new(0x3d, 0xa5, 0xff))
        .ten_step_line_color(Color::WHITE)
        .text_color(Color::WHITE)
        .indicator_color(Color::new(0xff, 0x8c, 0x00))
        .indicator_length(40.0)
        .build();

    let mut picker = WeightPicker::new(WeightRange::new(40, 180, 70), style)
        .on_weight_change(|weight| log::info!("selected {weight} kg"));
    if let Some(path) = std::env::args().nth(1) {
        picker = picker.with_font_file(path)?;
    }

    println!("Drag the scale left or right; the selected weight is logged.");
    picker.show(
        WindowOptions::builder()
            .title("Weight Picker (custom style)")
            .width(360)
            .height(520)
            .build(),
    )?;
    Ok(())
}
