use std::env;
use std::process;

use weight_scale::logging::{init_logging, LoggingConfig};
use weight_scale::{ScaleError, ScaleStyle, WeightPicker, WeightRange, WindowOptions};

struct Args {
    range: WeightRange,
    scale_width: f64,
    title: String,
    font: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        range: WeightRange::default(),
        scale_width: 150.0,
        title: "Weight Picker".to_string(),
        font: None,
    };
    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--range" => {
                let values: Vec<Option<i32>> =
                    (0..3).map(|_| it.next().and_then(|v| v.parse().ok())).collect();
                if let [Some(min), Some(max), Some(initial)] = values.as_slice() {
                    args.range = WeightRange::new(*min, *max, *initial);
                } else {
                    log::warn!("--range expects MIN MAX INITIAL, keeping {:?}", args.range);
                }
            }
            "--scale-width" => match it.next().and_then(|v| v.parse().ok()) {
                Some(width) => args.scale_width = width,
                None => log::warn!("--scale-width expects a number"),
            },
            "--title" => {
                if let Some(title) = it.next() {
                    args.title = title;
                }
            }
            "--font" => args.font = it.next(),
            other => log::warn!("ignoring unknown argument {other}"),
        }
    }
    args
}

fn run(args: Args) -> Result<(), ScaleError> {
    let style = ScaleStyle::builder().scale_width(args.scale_width).build();
    let mut picker =
        WeightPicker::new(args.range, style).on_weight_change(|weight| log::info!("weight: {weight}"));
    if let Some(path) = &args.font {
        picker = picker.with_font_file(path)?;
    }

    let options = WindowOptions::builder().title(args.title).build();
    picker.show(options)
}

fn main() {
    init_logging(LoggingConfig::default());
    let args = parse_args();
    if let Err(err) = run(args) {
        eprintln!("weight-scale: {err}");
        process::exit(1);
    }
}
